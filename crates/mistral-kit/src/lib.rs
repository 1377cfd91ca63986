//! # mistral-kit
//!
//! Transport-agnostic building blocks for tool-calling chat
//! applications: conversation types, a tool registry, the conversation
//! engine, message ordering, and retrieval utilities.
//!
//! This crate contains **zero** HTTP code — the Mistral
//! chat-completions transport, embeddings client, and network tools
//! live in the sibling `mistral-kit-http` crate, which implements
//! [`ChatTransport`].
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────────────────┐
//!  │   mistral-kit-http   │  reqwest transport, SSE, embeddings
//!  └──────────┬───────────┘
//!             │ implements ChatTransport
//!             ▼
//!  ┌──────────────────────┐
//!  │      mistral-kit     │  ← you are here
//!  │ (engine, tools, rag) │
//!  └──────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mistral_kit::engine::{ChatEngine, EngineConfig, ExecuteContext};
//! use mistral_kit::tool::ToolRegistry;
//! use mistral_kit::tools::calculator_tool;
//!
//! # async fn example(transport: Arc<dyn mistral_kit::ChatTransport>) {
//! let mut registry = ToolRegistry::new();
//! registry.register(calculator_tool());
//!
//! let engine = ChatEngine::new(transport, registry, EngineConfig::default());
//! engine.execute("What is 15% of 200?", ExecuteContext::default()).await;
//! println!("{:?}", engine.messages());
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chat`] | Messages, roles, attachments, and tool-call requests |
//! | [`engine`] | The tool-calling conversation loop |
//! | [`error`] | Unified [`ChatError`] across transports |
//! | [`ordering`] | Stable first-seen display ordering |
//! | [`rag`] | Chunking, cosine similarity, and document search |
//! | [`tool`] | Tool specs, handlers, registry, and outcomes |
//! | [`tools`] | Built-in calculator and date/time tools |
//! | [`transport`] | The [`ChatTransport`] trait and wire outcome |
//! | [`wire`] | Chat-completions request construction |

#![warn(missing_docs)]

pub mod chat;
pub mod engine;
pub mod error;
pub mod ordering;
pub mod rag;
pub mod tool;
pub mod tools;
pub mod transport;
pub mod wire;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

pub use chat::{ChatAttachment, ChatMessage, Role, ToolCallRequest};
pub use engine::{ChatEngine, EngineConfig, ExecuteContext, Termination};
pub use error::ChatError;
pub use ordering::MessageOrder;
pub use tool::{JsonSchema, ToolHandler, ToolRegistry, ToolSpec};
pub use transport::{ChatOutcome, ChatTransport};

//! Unified error type for chat operations.
//!
//! Every transport maps its native failures into [`ChatError`], giving
//! callers a single type to match against regardless of which backend is
//! in use. The engine stores the most recent fatal error as observable
//! state, so `ChatError` is `Clone`.
//!
//! Tool handlers return their own lighter [`ToolError`](crate::tool::ToolError);
//! the engine never converts a tool failure into a `ChatError` — tool
//! failures are absorbed into the conversation as error results.

/// The unified error type returned by transport and validation operations.
///
/// Variants are `#[non_exhaustive]` — new error kinds may be added in
/// minor releases without breaking downstream matches (always include a
/// wildcard arm).
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ChatError {
    /// An HTTP-level failure (transport error, unexpected status code).
    ///
    /// `status` is `None` when the request never received a response
    /// (e.g. DNS failure, connection reset).
    #[error("HTTP error (status={status:?}): {message}")]
    Http {
        /// The HTTP status code, if one was received.
        status: Option<http::StatusCode>,
        /// A human-readable description of the failure.
        message: String,
    },

    /// The API key or token was rejected or could not be encoded.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The request was malformed (missing fields, invalid parameters).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be parsed.
    #[error("Response format error: {message}")]
    Format {
        /// What went wrong during parsing.
        message: String,
        /// The raw response body, for diagnostics.
        raw: String,
    },

    /// The completion response contained no choices.
    #[error("Response contained no choices")]
    NoChoices,

    /// Tool arguments failed JSON Schema validation.
    #[error("Schema validation error: {message}")]
    SchemaValidation {
        /// Concatenated validation error messages.
        message: String,
    },

    /// The in-flight request was cancelled.
    ///
    /// The engine treats this as silent termination, never as a stored
    /// error.
    #[error("Request cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format {
            message: err.to_string(),
            raw: String::new(),
        }
    }
}

//! Semantic document search over embedded chunks.
//!
//! [`semantic_search_tool`] builds a `search_docs` tool from a fixed
//! corpus of embedded chunks and an injected query-embedding function.
//! General queries ("summarize this", "what is this about?") skip the
//! embedding round trip and return leading chunks verbatim, since
//! summary phrasing rarely matches document vocabulary.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::similarity::cosine_similarity;
use crate::tool::{ToolError, ToolHandler, ToolSpec};

/// A chunk of document text paired with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedChunk {
    /// Stable chunk identifier.
    pub id: String,
    /// The chunk's text.
    pub text: String,
    /// Embedding vector for `text`.
    pub embedding: Vec<f32>,
    /// Source file name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Arbitrary extra metadata.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

/// Async function that embeds a query string.
pub type EmbedQueryFn = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, ToolError>> + Send>>
        + Send
        + Sync,
>;

/// Options for [`semantic_search_tool`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of leading chunks returned for general queries.
    pub context_chunks_for_general: usize,
    /// Default number of ranked matches for semantic queries.
    pub default_limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            context_chunks_for_general: 5,
            default_limit: 3,
        }
    }
}

/// Phrasings that ask about the document as a whole rather than a
/// specific fact inside it.
static GENERAL_QUERY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(what|what's|whats)\s+(is\s+)?this(\s+about)?",
        r"(?i)^(give|provide|show|tell)\s+me\s+a\s+(summary|overview|brief|synopsis)",
        r"(?i)^(summarize|summarise|analyze|analyse)",
        r"(?i)^(explain|describe)\s+(this|the\s+document|the\s+content)",
        r"(?i)^(what\s+)?(does|is)\s+(this|the\s+document|it)\s+(about|say|contain)",
        r"(?i)^(get|show|return)\s+(all|full|entire)\s+(content|document|text)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

fn is_general_query(query: &str) -> bool {
    GENERAL_QUERY_PATTERNS.iter().any(|p| p.is_match(query))
}

const PREVIEW_CHARS: usize = 220;

fn preview(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds a `search_docs` tool over the given corpus.
///
/// The handler owns its chunks; rebuilding the tool is how a new corpus
/// reaches the conversation. `embed_query` is only invoked for
/// non-general queries.
pub fn semantic_search_tool(
    chunks: Vec<EmbeddedChunk>,
    embed_query: EmbedQueryFn,
    options: SearchOptions,
) -> SemanticSearchTool {
    SemanticSearchTool {
        chunks: Arc::new(chunks),
        embed_query,
        options,
    }
}

/// The `search_docs` tool handler. Build with [`semantic_search_tool`].
pub struct SemanticSearchTool {
    chunks: Arc<Vec<EmbeddedChunk>>,
    embed_query: EmbedQueryFn,
    options: SearchOptions,
}

impl std::fmt::Debug for SemanticSearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticSearchTool")
            .field("chunks", &self.chunks.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ToolHandler for SemanticSearchTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "search_docs",
            "Search and analyze uploaded documents. ALWAYS use this tool for ANY questions \
             about uploaded files, including: document summaries, content analysis, finding \
             specific information, or answering questions based on the document. This is the \
             ONLY tool that can access uploaded document content.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The user's question or request about the document \
                                        (e.g., 'summarize this', 'what is this about?', \
                                        'find information about X')"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Number of matches to return",
                        "default": 3
                    }
                },
                "required": ["query"]
            }),
        )
    }

    fn run<'a>(
        &'a self,
        args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send + 'a>> {
        Box::pin(async move {
            if self.chunks.is_empty() {
                return Err(ToolError::new(
                    "No documents have been uploaded yet. Ask the user to upload a document first.",
                ));
            }

            let query = args["query"]
                .as_str()
                .ok_or_else(|| ToolError::new("query is required"))?
                .to_string();
            let limit = args["limit"]
                .as_u64()
                .map(|n| n as usize)
                .unwrap_or(self.options.default_limit);

            let normalized = query.trim();

            if is_general_query(normalized) {
                let context: Vec<Value> = self
                    .chunks
                    .iter()
                    .take(self.options.context_chunks_for_general)
                    .map(|chunk| {
                        serde_json::json!({
                            "chunkId": chunk.id,
                            "fileName": chunk.file_name,
                            "text": chunk.text,
                            "metadata": chunk.metadata,
                        })
                    })
                    .collect();
                let returned = context.len();
                return Ok(serde_json::json!({
                    "query": query,
                    "queryType": "general",
                    "context": context,
                    "totalChunks": self.chunks.len(),
                    "note": format!(
                        "Returning first {returned} chunks for general query. \
                         Total document has {} chunks.",
                        self.chunks.len()
                    ),
                }));
            }

            let query_embedding = (self.embed_query)(normalized.to_string()).await?;
            if query_embedding.is_empty() {
                return Err(ToolError::new("Failed to embed query"));
            }

            let mut ranked: Vec<(f32, &EmbeddedChunk)> = self
                .chunks
                .iter()
                .map(|chunk| {
                    let similarity = cosine_similarity(&query_embedding, &chunk.embedding)
                        .map_err(|e| ToolError::new(e.to_string()))?;
                    Ok((similarity, chunk))
                })
                .collect::<Result<_, ToolError>>()?;
            ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
            ranked.truncate(limit);

            let matches: Vec<Value> = ranked
                .into_iter()
                .map(|(similarity, chunk)| {
                    serde_json::json!({
                        "chunkId": chunk.id,
                        "fileName": chunk.file_name,
                        "preview": preview(&chunk.text),
                        "fullText": chunk.text,
                        "similarity": similarity,
                        "metadata": chunk.metadata,
                    })
                })
                .collect();

            Ok(serde_json::json!({
                "query": query,
                "queryType": "semantic",
                "matches": matches,
                "totalChunks": self.chunks.len(),
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            id: id.into(),
            text: text.into(),
            embedding,
            file_name: Some("doc.txt".into()),
            metadata: Value::Null,
        }
    }

    fn fixed_embedder(embedding: Vec<f32>) -> EmbedQueryFn {
        Arc::new(move |_query| {
            let embedding = embedding.clone();
            Box::pin(async move { Ok(embedding) })
        })
    }

    #[test]
    fn test_general_query_detection() {
        assert!(is_general_query("summarize this document"));
        assert!(is_general_query("What is this about?"));
        assert!(is_general_query("give me a summary"));
        assert!(is_general_query("show all content"));
        assert!(!is_general_query("find the section on pricing"));
        assert!(!is_general_query("who wrote chapter 3"));
    }

    #[test]
    fn test_preview_collapses_whitespace() {
        let text = "a  b\n\nc".to_string() + &"x".repeat(300);
        let p = preview(&text);
        assert!(p.starts_with("a b c"));
        assert!(p.chars().count() <= PREVIEW_CHARS);
    }

    #[tokio::test]
    async fn test_empty_corpus_is_an_error() {
        let tool = semantic_search_tool(vec![], fixed_embedder(vec![1.0]), SearchOptions::default());
        let err = tool
            .run(serde_json::json!({"query": "anything"}))
            .await
            .unwrap_err();
        assert!(err.message.contains("upload"));
    }

    #[tokio::test]
    async fn test_general_query_returns_leading_chunks() {
        let chunks: Vec<EmbeddedChunk> = (0..8)
            .map(|i| chunk(&format!("c{i}"), &format!("chunk {i}"), vec![1.0, 0.0]))
            .collect();
        let tool = semantic_search_tool(chunks, fixed_embedder(vec![1.0, 0.0]), SearchOptions::default());

        let out = tool
            .run(serde_json::json!({"query": "summarize this"}))
            .await
            .unwrap();
        assert_eq!(out["queryType"], "general");
        assert_eq!(out["context"].as_array().unwrap().len(), 5);
        assert_eq!(out["totalChunks"], 8);
        assert_eq!(out["context"][0]["chunkId"], "c0");
    }

    #[tokio::test]
    async fn test_semantic_query_ranks_by_similarity() {
        let chunks = vec![
            chunk("far", "unrelated", vec![0.0, 1.0]),
            chunk("near", "relevant", vec![1.0, 0.0]),
            chunk("mid", "partial", vec![1.0, 1.0]),
        ];
        let tool = semantic_search_tool(chunks, fixed_embedder(vec![1.0, 0.0]), SearchOptions::default());

        let out = tool
            .run(serde_json::json!({"query": "find the relevant part", "limit": 2}))
            .await
            .unwrap();
        assert_eq!(out["queryType"], "semantic");
        let matches = out["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["chunkId"], "near");
        assert_eq!(matches[1]["chunkId"], "mid");
    }

    #[tokio::test]
    async fn test_default_limit_is_three() {
        let chunks: Vec<EmbeddedChunk> = (0..6)
            .map(|i| chunk(&format!("c{i}"), "text", vec![1.0, i as f32]))
            .collect();
        let tool = semantic_search_tool(chunks, fixed_embedder(vec![1.0, 0.0]), SearchOptions::default());
        let out = tool
            .run(serde_json::json!({"query": "find topic x"}))
            .await
            .unwrap();
        assert_eq!(out["matches"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_query_embedding_is_an_error() {
        let chunks = vec![chunk("c0", "text", vec![1.0])];
        let tool = semantic_search_tool(chunks, fixed_embedder(vec![]), SearchOptions::default());
        let err = tool
            .run(serde_json::json!({"query": "find topic x"}))
            .await
            .unwrap_err();
        assert!(err.message.contains("embed"));
    }

    #[tokio::test]
    async fn test_missing_query_is_an_error() {
        let chunks = vec![chunk("c0", "text", vec![1.0])];
        let tool = semantic_search_tool(chunks, fixed_embedder(vec![1.0]), SearchOptions::default());
        let err = tool.run(serde_json::json!({})).await.unwrap_err();
        assert!(err.message.contains("query"));
    }
}

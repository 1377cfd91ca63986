//! Retrieval utilities: chunking, similarity, and document search.

mod chunk;
mod search;
mod similarity;

pub use chunk::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP_CHUNK_SIZE, chunk_text,
    chunk_text_with_overlap,
};
pub use search::{
    EmbedQueryFn, EmbeddedChunk, SearchOptions, SemanticSearchTool, semantic_search_tool,
};
pub use similarity::{SimilarityError, cosine_similarity};

//! Text embeddings.

mod service;
mod types;

pub use service::EmbeddingService;
pub use types::{EmbeddingData, EmbeddingInput, EmbeddingResponse};

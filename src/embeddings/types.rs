//! Embedding request and response types.

use serde::{Deserialize, Serialize};

use crate::types::common::null_to_default;
use crate::types::ChatCompletionUsage;

/// Text to embed: one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl Default for EmbeddingInput {
    fn default() -> Self {
        EmbeddingInput::Single(String::new())
    }
}

impl EmbeddingInput {
    pub fn is_empty(&self) -> bool {
        match self {
            EmbeddingInput::Single(s) => s.is_empty(),
            EmbeddingInput::Batch(v) => v.is_empty(),
        }
    }
}

impl From<String> for EmbeddingInput {
    fn from(s: String) -> Self {
        EmbeddingInput::Single(s)
    }
}

impl From<&str> for EmbeddingInput {
    fn from(s: &str) -> Self {
        EmbeddingInput::Single(s.to_string())
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(v: Vec<String>) -> Self {
        EmbeddingInput::Batch(v)
    }
}

/// A single embedding vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingData {
    #[serde(default, deserialize_with = "null_to_default")]
    pub embedding: Vec<f64>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub index: usize,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
}

impl EmbeddingData {
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub data: Vec<EmbeddingData>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub usage: ChatCompletionUsage,
}

impl EmbeddingResponse {
    pub fn first(&self) -> Option<&EmbeddingData> {
        self.data.first()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

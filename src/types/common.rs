//! Small wire items shared by several endpoints.

use serde::{Deserialize, Deserializer, Serialize};

/// `{"url": "..."}`, used for images, videos and multi-part message content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
}

impl UrlItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// `{"id": "..."}`, returned by endpoints that only echo an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
}

/// Token usage reported with completions and embeddings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionUsage {
    #[serde(default, deserialize_with = "null_to_default")]
    pub prompt_tokens: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub completion_tokens: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_tokens: i64,
}

/// Treat an explicit JSON `null` like a missing field.
pub fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

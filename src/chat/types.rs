//! Chat completion response types.

use serde::{Deserialize, Serialize};

use crate::types::common::null_to_default;
use crate::types::{ChatCompletionMessage, ChatCompletionUsage};

pub const FINISH_REASON_STOP: &str = "stop";
pub const FINISH_REASON_STOP_SEQUENCE: &str = "stop_sequence";
pub const FINISH_REASON_TOOL_CALLS: &str = "tool_calls";
pub const FINISH_REASON_LENGTH: &str = "length";
pub const FINISH_REASON_SENSITIVE: &str = "sensitive";
pub const FINISH_REASON_NETWORK_ERROR: &str = "network_error";

pub const STATUS_FAILED: &str = "failed";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_REQUIRES_ACTION: &str = "requires_action";

/// Search hit attached to a completion when the web search tool ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionWebSearch {
    #[serde(default, deserialize_with = "null_to_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub media: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub content: String,
}

/// A completion choice. Streamed chunks fill `delta`; full responses fill `message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChoice {
    #[serde(default, deserialize_with = "null_to_default")]
    pub index: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub finish_reason: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub delta: ChatCompletionMessage,
    #[serde(default, deserialize_with = "null_to_default")]
    pub message: ChatCompletionMessage,
}

/// Response of `chat/completions`, and the shape of every streamed chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub created: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub usage: ChatCompletionUsage,
    #[serde(default, deserialize_with = "null_to_default")]
    pub web_search: Vec<ChatCompletionWebSearch>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub status: String,
}

impl ChatCompletionResponse {
    /// Text of the first choice: its message, or its delta for a streamed chunk.
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .map(|c| {
                if c.message.content.is_empty() {
                    c.delta.content.as_str()
                } else {
                    c.message.content.as_str()
                }
            })
            .unwrap_or("")
    }

    pub fn finish_reason(&self) -> &str {
        self.choices
            .first()
            .map(|c| c.finish_reason.as_str())
            .unwrap_or("")
    }
}

//! Chat messages: plain text messages and multi-part (text + image) messages.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::common::{null_to_default, UrlItem};
use super::tool::ChatCompletionToolCall;

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";
pub const ROLE_TOOL: &str = "tool";

/// Plain message with text content.
///
/// Also used for the `delta` and `message` of a completion choice, which is
/// why every field tolerates being absent or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionMessage {
    #[serde(default, deserialize_with = "null_to_default")]
    pub role: String,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub content: String,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tool_calls: Vec<ChatCompletionToolCall>,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub tool_call_id: String,
}

impl ChatCompletionMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ROLE_SYSTEM, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }

    /// Result of a tool invocation, answering the call with `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ROLE_TOOL.to_string(),
            content: content.into(),
            tool_call_id: tool_call_id.into(),
            ..Default::default()
        }
    }
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatCompletionMultiContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: UrlItem },
}

impl ChatCompletionMultiContent {
    pub fn text(text: impl Into<String>) -> Self {
        ChatCompletionMultiContent::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ChatCompletionMultiContent::ImageUrl {
            image_url: UrlItem::new(url),
        }
    }

    /// Inline a local image as base64.
    pub fn image_from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::image_url(
            base64::engine::general_purpose::STANDARD.encode(bytes),
        ))
    }
}

/// Message whose content is an ordered list of parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionMultiMessage {
    pub role: String,
    pub content: Vec<ChatCompletionMultiContent>,
}

impl ChatCompletionMultiMessage {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: ChatCompletionMultiContent) -> Self {
        self.content.push(part);
        self
    }
}

/// Any message accepted by the chat endpoint.
///
/// The wire form has no discriminator: a string `content` is a plain
/// message, an array `content` is a multi-part one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatMessage {
    MultiPart(ChatCompletionMultiMessage),
    Plain(ChatCompletionMessage),
}

impl From<ChatCompletionMessage> for ChatMessage {
    fn from(m: ChatCompletionMessage) -> Self {
        ChatMessage::Plain(m)
    }
}

impl From<ChatCompletionMultiMessage> for ChatMessage {
    fn from(m: ChatCompletionMultiMessage) -> Self {
        ChatMessage::MultiPart(m)
    }
}

/// Character settings for role-play models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionMeta {
    pub user_info: String,
    pub bot_info: String,
    pub user_name: String,
    pub bot_name: String,
}

//! Wire types shared across endpoints.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`common`] | `{url}` / `{id}` items, token usage |
//! | [`message`] | Plain and multi-part chat messages |
//! | [`string_or`] | String-or-value union used by hyper-parameters |
//! | [`tool`] | Chat tools and response-side tool calls |

pub mod common;
pub mod message;
pub mod string_or;
pub mod tool;

pub use common::{ChatCompletionUsage, IdItem, UrlItem};
pub use message::{
    ChatCompletionMessage, ChatCompletionMeta, ChatCompletionMultiContent,
    ChatCompletionMultiMessage, ChatMessage,
};
pub use string_or::StringOr;
pub use tool::{
    ChatCompletionTool, ChatCompletionToolCall, ChatCompletionToolCallFunction,
    ChatCompletionToolCodeInterpreter, ChatCompletionToolDrawingTool, ChatCompletionToolFunction,
    ChatCompletionToolRetrieval, ChatCompletionToolWebBrowser, ChatCompletionToolWebSearch,
};

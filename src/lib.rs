//! # zhipu-rs
//!
//! Async client for the Zhipu AI open platform (`open.bigmodel.cn`).
//!
//! ## Overview
//!
//! Every endpoint is exposed as a service created from a [`Client`]. A
//! service collects its parameters through consuming setters and performs
//! the call with `execute().await`. Requests are signed with a short-lived
//! token derived from the API key, so the key's secret never leaves the
//! process.
//!
//! ## Key Features
//!
//! - **Streaming chat**: server-sent chunks are decoded, handed to a
//!   callback and reduced into one final response ([`pipeline`])
//! - **Batches**: JSONL request files and result files ([`batch`])
//! - **Tools**: function, retrieval, web search and built-in tools ([`types::tool`])
//! - **Cancellation**: every in-flight call observes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zhipu_rs::types::ChatCompletionMessage;
//! use zhipu_rs::Client;
//!
//! #[tokio::main]
//! async fn main() -> zhipu_rs::Result<()> {
//!     // Reads ZHIPUAI_API_KEY, ZHIPUAI_BASE_URL and ZHIPUAI_DEBUG.
//!     let client = Client::from_env()?;
//!
//!     let res = client
//!         .chat_completion("glm-4-flash")
//!         .add_message(ChatCompletionMessage::user("Hello"))
//!         .on_chunk(|chunk| {
//!             print!("{}", chunk.content());
//!             Ok(())
//!         })
//!         .execute()
//!         .await?;
//!
//!     println!("\n{:?}", res.usage);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client handle, builder and configuration |
//! | [`chat`] | Chat completions, plain and streaming |
//! | [`pipeline`] | Stream decoding and chunk reduction |
//! | [`batch`] | Batch JSONL codec and batch job endpoints |
//! | [`types`] | Messages, tools and shared wire items |
//! | [`embeddings`] | Text embeddings |
//! | [`images`] | Image generation |
//! | [`videos`] | Video generation and async task results |
//! | [`files`] | File upload, listing, documents and download |
//! | [`fine_tuning`] | Fine-tuning jobs |
//! | [`knowledge`] | Knowledge bases |
//! | [`transport`] | Request signing and HTTP plumbing |

pub mod batch;
pub mod chat;
pub mod client;
pub mod embeddings;
pub mod files;
pub mod fine_tuning;
pub mod images;
pub mod knowledge;
pub mod pipeline;
pub mod transport;
pub mod types;
pub mod utils;
pub mod videos;

pub use client::{Client, ClientBuilder};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream of fallible items.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{ApiError, Error, ErrorContext};

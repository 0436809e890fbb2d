//! Chat completion.
//!
//! ```rust,no_run
//! use zhipu_rs::types::ChatCompletionMessage;
//!
//! # async fn run() -> zhipu_rs::Result<()> {
//! let client = zhipu_rs::Client::from_env()?;
//! let res = client
//!     .chat_completion("glm-4-flash")
//!     .add_message(ChatCompletionMessage::user("Hello"))
//!     .on_chunk(|chunk| {
//!         if let Some(choice) = chunk.choices.first() {
//!             print!("{}", choice.delta.content);
//!         }
//!         Ok(())
//!     })
//!     .execute()
//!     .await?;
//! println!("\n{} tokens", res.usage.total_tokens);
//! # Ok(())
//! # }
//! ```

mod service;
pub mod types;

pub use service::{ChatCompletionService, ChatCompletionStreamHandler};
pub use types::{ChatCompletionChoice, ChatCompletionResponse, ChatCompletionWebSearch};

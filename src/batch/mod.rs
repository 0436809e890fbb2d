//! Batch jobs.
//!
//! A batch job runs many requests offline. The requests are uploaded as a
//! JSON Lines file (one [`BatchRecord`] per line) and the results come back
//! as another JSON Lines file (one [`BatchResult`] per line).
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchSupport`] | Request builders that can become a batch line |
//! | [`BatchFileWriter`] | Writes request lines |
//! | [`BatchResultReader`] | Reads result lines, tolerating blank lines |
//! | [`BatchCreateService`] etc. | Job endpoints |
//!
//! ## Example
//!
//! ```rust,no_run
//! use zhipu_rs::batch::{BatchFileWriter, BatchResultReader, BatchResult};
//! use zhipu_rs::chat::ChatCompletionResponse;
//! use zhipu_rs::types::ChatCompletionMessage;
//!
//! # fn main() -> zhipu_rs::Result<()> {
//! let client = zhipu_rs::Client::from_env()?;
//! let mut writer = BatchFileWriter::new(Vec::new());
//! for (i, question) in ["1+1?", "2+2?"].iter().enumerate() {
//!     let req = client
//!         .chat_completion("glm-4-flash")
//!         .add_message(ChatCompletionMessage::user(*question));
//!     writer.write(&format!("req-{i}"), &req)?;
//! }
//! let _jsonl = writer.into_inner();
//!
//! let results = std::fs::File::open("output.jsonl")?;
//! for result in BatchResultReader::<_, ChatCompletionResponse>::new(results) {
//!     let result: BatchResult<ChatCompletionResponse> = result?;
//!     println!("{}: {}", result.custom_id, result.response.body.content());
//! }
//! # Ok(())
//! # }
//! ```

mod codec;
mod service;

pub use codec::{
    BatchFileWriter, BatchRecord, BatchResult, BatchResultReader, BatchResultResponse,
    BatchSupport, BATCH_COMPLETION_WINDOW_24H, BATCH_ENDPOINT_V4_CHAT_COMPLETIONS,
    BATCH_ENDPOINT_V4_EMBEDDINGS, BATCH_ENDPOINT_V4_IMAGES_GENERATIONS,
    BATCH_ENDPOINT_V4_VIDEOS_GENERATIONS,
};
pub use service::{
    BatchCancelService, BatchCreateService, BatchGetService, BatchItem, BatchListResponse,
    BatchListService, BatchRequestCounts,
};

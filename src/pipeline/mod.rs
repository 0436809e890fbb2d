//! Streaming chat completion pipeline.
//!
//! ```text
//! Raw Bytes → decode_chunks → ChatCompletionAccumulator → final response
//!                  │                    │
//!              `data:` lines        per-chunk handler
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decode`] | Line splitting and `data:` payload decoding |
//! | [`accumulate`] | Fold of chunks into one response |

pub mod accumulate;
pub mod decode;

pub use accumulate::ChatCompletionAccumulator;
pub use decode::{classify_line, decode_chunks, LineBuffer, SseLine, DATA_PREFIX, DONE_SIGNAL};

use crate::chat::types::ChatCompletionResponse;
use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::StreamExt;

/// Decode a raw chat stream, fold every chunk and hand it to `on_chunk`.
///
/// The handler runs inline, before the next line is read. Its first error,
/// or the first decode error, ends processing and is returned.
pub async fn reduce_stream<F>(
    input: BoxStream<'static, Bytes>,
    mut on_chunk: F,
) -> Result<ChatCompletionResponse>
where
    F: FnMut(&ChatCompletionResponse) -> Result<()>,
{
    let mut chunks = decode_chunks::<ChatCompletionResponse>(input);
    let mut acc = ChatCompletionAccumulator::new();

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        acc.apply(&chunk);
        on_chunk(&chunk)?;
    }

    tracing::debug!(chunks = acc.chunks(), "chat stream finished");
    Ok(acc.finish())
}

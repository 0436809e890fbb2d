//! Server-sent event decoding (Bytes -> JSON chunks).
//!
//! The chat endpoint streams one JSON object per `data:` line and ends with
//! `data: [DONE]`. Lines are trimmed; blank lines, comments and any line
//! without the `data:` marker are skipped.

use crate::{BoxStream, Error};
use bytes::{Bytes, BytesMut};
use futures::{stream, StreamExt};
use serde::de::DeserializeOwned;

pub const DATA_PREFIX: &str = "data:";
pub const DONE_SIGNAL: &str = "[DONE]";

/// Classification of one stream line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Nothing to decode on this line.
    Skip,
    /// The end-of-stream sentinel.
    Done,
    /// A JSON payload with the marker stripped.
    Data(&'a str),
}

pub fn classify_line(line: &str) -> SseLine<'_> {
    let Some(rest) = line.trim().strip_prefix(DATA_PREFIX) else {
        return SseLine::Skip;
    };
    match rest.trim() {
        DONE_SIGNAL => SseLine::Done,
        "" => SseLine::Skip,
        data => SseLine::Data(data),
    }
}

/// Accumulates raw bytes and hands out complete `\n`-terminated lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: BytesMut,
    // Bytes already known to hold no newline.
    scanned: usize,
}

impl LineBuffer {
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn next_line(&mut self) -> Option<String> {
        let Some(idx) = self.buf[self.scanned..].iter().position(|b| *b == b'\n') else {
            self.scanned = self.buf.len();
            return None;
        };
        let line = self.buf.split_to(self.scanned + idx + 1);
        self.scanned = 0;
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Whatever is left once the input has ended.
    pub fn take_rest(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        self.scanned = 0;
        let rest = self.buf.split();
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

struct DecodeState {
    input: BoxStream<'static, Bytes>,
    lines: LineBuffer,
    finished: bool,
}

/// Decode a raw event stream into typed chunks.
///
/// The stream ends at the sentinel or at end of input. A final line without
/// a trailing newline is decoded like any other, so a body cut off in the
/// middle of a chunk yields [`Error::Serialization`] rather than ending
/// quietly. A chunk that fails to decode is yielded as
/// [`Error::Serialization`] and nothing follows it.
pub fn decode_chunks<T>(input: BoxStream<'static, Bytes>) -> BoxStream<'static, T>
where
    T: DeserializeOwned + Send + 'static,
{
    let state = DecodeState {
        input,
        lines: LineBuffer::default(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            let line = match st.lines.next_line() {
                Some(line) => line,
                None if st.finished => return None,
                None => match st.input.next().await {
                    Some(Ok(bytes)) => {
                        st.lines.push(&bytes);
                        continue;
                    }
                    Some(Err(e)) => {
                        st.finished = true;
                        st.lines = LineBuffer::default();
                        return Some((Err(e), st));
                    }
                    None => {
                        // An unterminated last line is still a line.
                        st.finished = true;
                        match st.lines.take_rest() {
                            Some(rest) => rest,
                            None => return None,
                        }
                    }
                },
            };

            match classify_line(&line) {
                SseLine::Skip => continue,
                SseLine::Done => {
                    tracing::trace!("stream sentinel received");
                    return None;
                }
                SseLine::Data(data) => {
                    let item = serde_json::from_str::<T>(data).map_err(Error::from);
                    if item.is_err() {
                        st.finished = true;
                        st.lines = LineBuffer::default();
                    }
                    return Some((item, st));
                }
            }
        }
    }))
}

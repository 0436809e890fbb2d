//! JSON Lines codec for batch request files and batch result files.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{BufReader, Read, Write};

use crate::Result;

pub const BATCH_ENDPOINT_V4_CHAT_COMPLETIONS: &str = "/v4/chat/completions";
pub const BATCH_ENDPOINT_V4_IMAGES_GENERATIONS: &str = "/v4/images/generations";
pub const BATCH_ENDPOINT_V4_EMBEDDINGS: &str = "/v4/embeddings";
pub const BATCH_ENDPOINT_V4_VIDEOS_GENERATIONS: &str = "/v4/videos/generations";

pub const BATCH_COMPLETION_WINDOW_24H: &str = "24h";

/// A request builder that can be written as one line of a batch file.
pub trait BatchSupport {
    fn batch_method(&self) -> &str {
        "POST"
    }

    /// Endpoint path, e.g. [`BATCH_ENDPOINT_V4_CHAT_COMPLETIONS`].
    fn batch_url(&self) -> &str;

    /// Request body as it would be sent right now.
    fn batch_body(&self) -> Result<Map<String, Value>>;
}

/// One line of a batch request file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord<B = Value> {
    pub body: B,
    pub custom_id: String,
    pub method: String,
    pub url: String,
}

/// Writes batch request lines, one complete JSON object per call.
pub struct BatchFileWriter<W: Write> {
    w: W,
    written: usize,
}

impl<W: Write> BatchFileWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w, written: 0 }
    }

    pub fn write<S: BatchSupport + ?Sized>(&mut self, custom_id: &str, request: &S) -> Result<()> {
        let record = BatchRecord {
            body: request.batch_body()?,
            custom_id: custom_id.to_string(),
            method: request.batch_method().to_string(),
            url: request.batch_url().to_string(),
        };
        serde_json::to_writer(&mut self.w, &record)?;
        self.w.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        Ok(self.w.flush()?)
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResultResponse<T> {
    pub status_code: i64,
    pub body: T,
}

/// One line of a batch result file. `T` is the response type of the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult<T> {
    #[serde(default)]
    pub id: String,
    pub custom_id: String,
    pub response: BatchResultResponse<T>,
}

/// Reads batch results one at a time.
///
/// Whitespace and blank lines between records are skipped.
pub struct BatchResultReader<R: Read, T> {
    inner: serde_json::StreamDeserializer<'static, serde_json::de::IoRead<BufReader<R>>, BatchResult<T>>,
}

impl<R: Read, T: DeserializeOwned> BatchResultReader<R, T> {
    pub fn new(r: R) -> Self {
        Self {
            inner: serde_json::Deserializer::from_reader(BufReader::new(r)).into_iter(),
        }
    }

    /// Next record, or `None` at end of input.
    pub fn read(&mut self) -> Result<Option<BatchResult<T>>> {
        Ok(self.inner.next().transpose()?)
    }
}

impl<R: Read, T: DeserializeOwned> Iterator for BatchResultReader<R, T> {
    type Item = Result<BatchResult<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}

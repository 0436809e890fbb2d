use bytes::Bytes;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::client::Client;
use crate::error::{Error, ErrorContext};
use crate::transport::HttpRequest;
use crate::types::common::null_to_default;
use crate::utils::BodyBuilder;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreateKnowledgeSuccessInfo {
    #[serde(rename = "fileName", default, deserialize_with = "null_to_default")]
    pub filename: String,
    #[serde(rename = "documentId", default, deserialize_with = "null_to_default")]
    pub document_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreateKnowledgeFailedInfo {
    #[serde(rename = "fileName", default, deserialize_with = "null_to_default")]
    pub filename: String,
    #[serde(rename = "failReason", default, deserialize_with = "null_to_default")]
    pub fail_reason: String,
}

/// Upload result. Knowledge uploads fill the `*_infos` lists; other
/// purposes fill the file fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreateResponse {
    #[serde(rename = "successInfos", default, deserialize_with = "null_to_default")]
    pub success_infos: Vec<FileCreateKnowledgeSuccessInfo>,
    #[serde(rename = "failedInfos", default, deserialize_with = "null_to_default")]
    pub failed_infos: Vec<FileCreateKnowledgeFailedInfo>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub bytes: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub purpose: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
}

enum FileSource {
    Path(PathBuf),
    Memory { data: Bytes, filename: String },
}

/// `POST files` (multipart)
pub struct FileCreateService {
    client: Client,
    purpose: String,
    source: Option<FileSource>,
    custom_separator: Option<String>,
    sentence_size: Option<u32>,
    knowledge_id: Option<String>,
}

impl FileCreateService {
    pub(crate) fn new(client: Client, purpose: impl Into<String>) -> Self {
        Self {
            client,
            purpose: purpose.into(),
            source: None,
            custom_separator: None,
            sentence_size: None,
            knowledge_id: None,
        }
    }

    /// Upload a file from disk; the remote name is the path's file name.
    pub fn local_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(FileSource::Path(path.into()));
        self
    }

    /// Upload in-memory content, e.g. a batch file built with
    /// [`crate::batch::BatchFileWriter`].
    pub fn file(mut self, data: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        self.source = Some(FileSource::Memory {
            data: data.into(),
            filename: filename.into(),
        });
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn custom_separator(mut self, separator: impl Into<String>) -> Self {
        self.custom_separator = Some(separator.into());
        self
    }

    pub fn sentence_size(mut self, size: u32) -> Self {
        self.sentence_size = Some(size);
        self
    }

    pub fn knowledge_id(mut self, knowledge_id: impl Into<String>) -> Self {
        self.knowledge_id = Some(knowledge_id.into());
        self
    }

    async fn file_part(source: FileSource) -> Result<Part> {
        match source {
            FileSource::Memory { data, filename } => {
                Ok(Part::stream(reqwest::Body::from(data)).file_name(filename))
            }
            FileSource::Path(path) => {
                let filename = file_name_of(&path)?;
                let file = tokio::fs::File::open(&path).await?;
                let len = file.metadata().await?.len();
                let body = reqwest::Body::wrap_stream(tokio_util::io::ReaderStream::new(file));
                Ok(Part::stream_with_length(body, len).file_name(filename))
            }
        }
    }

    pub async fn execute(self) -> Result<FileCreateResponse> {
        let source = self.source.ok_or_else(|| {
            Error::validation_with_context(
                "no file specified",
                ErrorContext::new()
                    .with_field_path("file")
                    .with_source("file_create"),
            )
        })?;

        let mut form = Form::new().text("purpose", self.purpose);
        if let Some(sep) = self.custom_separator {
            form = form.text("custom_separator", sep);
        }
        if let Some(size) = self.sentence_size {
            form = form.text("sentence_size", size.to_string());
        }
        if let Some(id) = self.knowledge_id {
            form = form.text("knowledge_id", id);
        }
        form = form.part("file", Self::file_part(source).await?);

        self.client
            .send_json(HttpRequest::post("files").multipart(form))
            .await
    }
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::validation_with_context(
                "local file has no usable file name",
                ErrorContext::new()
                    .with_field_path("file")
                    .with_details(path.display().to_string())
                    .with_source("file_create"),
            )
        })
}

/// `PUT document/{document_id}`
pub struct FileEditService {
    client: Client,
    document_id: String,
    knowledge_type: Option<i64>,
    custom_separator: Vec<String>,
    sentence_size: Option<u32>,
}

impl FileEditService {
    pub(crate) fn new(client: Client, document_id: impl Into<String>) -> Self {
        Self {
            client,
            document_id: document_id.into(),
            knowledge_type: None,
            custom_separator: Vec::new(),
            sentence_size: None,
        }
    }

    /// One of the `KNOWLEDGE_TYPE_*` constants.
    pub fn knowledge_type(mut self, knowledge_type: i64) -> Self {
        self.knowledge_type = Some(knowledge_type);
        self
    }

    pub fn custom_separator<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_separator = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn sentence_size(mut self, size: u32) -> Self {
        self.sentence_size = Some(size);
        self
    }

    pub async fn execute(self) -> Result<()> {
        // Numeric settings travel as strings on this endpoint.
        let body = BodyBuilder::new()
            .optional(
                "knowledge_type",
                self.knowledge_type.map(|t| t.to_string()).as_ref(),
            )
            .non_empty("custom_separator", &self.custom_separator)
            .optional(
                "sentence_size",
                self.sentence_size.map(|s| s.to_string()).as_ref(),
            )
            .build()?;
        let req = HttpRequest::put("document/{document_id}")
            .path_param("document_id", self.document_id)
            .json(body);
        self.client.send_empty(req).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailInfo {
    #[serde(default, deserialize_with = "null_to_default")]
    pub embedding_code: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub embedding_msg: String,
}

/// A document inside a knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListKnowledgeItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub length: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub sentence_size: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub custom_separator: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub embedding_stat: i64,
    #[serde(rename = "failInfo", default, skip_serializing_if = "Option::is_none")]
    pub fail_info: Option<FileFailInfo>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub word_num: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub parse_image: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListFineTuneItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub bytes: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub purpose: String,
}

/// File listing. Knowledge listings fill `total`/`list`; other purposes fill `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub total: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub list: Vec<FileListKnowledgeItem>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub data: Vec<FileListFineTuneItem>,
}

/// `GET files`
pub struct FileListService {
    client: Client,
    purpose: String,
    knowledge_id: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
    after: Option<String>,
    order_asc: Option<bool>,
}

impl FileListService {
    pub(crate) fn new(client: Client, purpose: impl Into<String>) -> Self {
        Self {
            client,
            purpose: purpose.into(),
            knowledge_id: None,
            page: None,
            limit: None,
            after: None,
            order_asc: None,
        }
    }

    pub fn knowledge_id(mut self, knowledge_id: impl Into<String>) -> Self {
        self.knowledge_id = Some(knowledge_id.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn order(mut self, ascending: bool) -> Self {
        self.order_asc = Some(ascending);
        self
    }

    pub async fn execute(self) -> Result<FileListResponse> {
        let req = HttpRequest::get("files")
            .query("purpose", self.purpose)
            .query_opt("knowledge_id", self.knowledge_id)
            .query_opt("page", self.page)
            .query_opt("limit", self.limit)
            .query_opt("after", self.after)
            .query_opt(
                "order",
                self.order_asc.map(|asc| if asc { "asc" } else { "desc" }),
            );
        self.client.send_json(req).await
    }
}

/// `GET document/{document_id}`
pub struct FileGetService {
    client: Client,
    document_id: String,
}

impl FileGetService {
    pub(crate) fn new(client: Client, document_id: impl Into<String>) -> Self {
        Self {
            client,
            document_id: document_id.into(),
        }
    }

    pub async fn execute(self) -> Result<FileListKnowledgeItem> {
        let req = HttpRequest::get("document/{document_id}")
            .path_param("document_id", self.document_id);
        self.client.send_json(req).await
    }
}

/// `DELETE document/{document_id}`
pub struct FileDeleteService {
    client: Client,
    document_id: String,
}

impl FileDeleteService {
    pub(crate) fn new(client: Client, document_id: impl Into<String>) -> Self {
        Self {
            client,
            document_id: document_id.into(),
        }
    }

    pub async fn execute(self) -> Result<()> {
        let req = HttpRequest::delete("document/{document_id}")
            .path_param("document_id", self.document_id);
        self.client.send_empty(req).await
    }
}

/// `GET files/{file_id}/content`
///
/// Content is copied as it arrives. A non-success status fails with
/// [`Error::Status`] before anything is written.
pub struct FileDownloadService {
    client: Client,
    file_id: String,
}

impl FileDownloadService {
    pub(crate) fn new(client: Client, file_id: impl Into<String>) -> Self {
        Self {
            client,
            file_id: file_id.into(),
        }
    }

    /// Copy the content into `out`, returning the number of bytes written.
    pub async fn write_to<W>(self, out: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let req = HttpRequest::get("files/{file_id}/content").path_param("file_id", self.file_id);
        let mut body = self.client.send_raw(req, false).await?;
        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;
        Ok(written)
    }

    /// Save the content to `path`, creating or truncating it.
    pub async fn save_to(self, path: impl AsRef<Path>) -> Result<u64> {
        let mut file = tokio::fs::File::create(path.as_ref()).await?;
        self.write_to(&mut file).await
    }
}

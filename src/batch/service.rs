//! Batch job endpoints: create, get, cancel, list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::batch::codec::BATCH_COMPLETION_WINDOW_24H;
use crate::client::Client;
use crate::transport::HttpRequest;
use crate::types::common::null_to_default;
use crate::utils::BodyBuilder;
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequestCounts {
    #[serde(default, deserialize_with = "null_to_default")]
    pub total: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub completed: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub failed: i64,
}

/// A batch job as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default)]
    pub object: Value,
    #[serde(default, deserialize_with = "null_to_default")]
    pub endpoint: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub input_file_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub completion_window: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub output_file_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub error_file_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub in_progress_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub expires_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub finalizing_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub completed_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub failed_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub expired_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cancelling_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cancelled_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub request_counts: BatchRequestCounts,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchListResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub data: Vec<BatchItem>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub first_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub last_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub has_more: bool,
}

/// `POST batches`
pub struct BatchCreateService {
    client: Client,
    input_file_id: String,
    endpoint: String,
    completion_window: String,
    metadata: Option<Value>,
}

impl BatchCreateService {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            input_file_id: String::new(),
            endpoint: String::new(),
            completion_window: BATCH_COMPLETION_WINDOW_24H.to_string(),
            metadata: None,
        }
    }

    /// Id of an uploaded file with purpose `batch`.
    pub fn input_file_id(mut self, id: impl Into<String>) -> Self {
        self.input_file_id = id.into();
        self
    }

    /// One of the `BATCH_ENDPOINT_*` paths.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn completion_window(mut self, window: impl Into<String>) -> Self {
        self.completion_window = window.into();
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub async fn execute(self) -> Result<BatchItem> {
        let body = BodyBuilder::new()
            .required("input_file_id", &self.input_file_id)
            .required("endpoint", &self.endpoint)
            .required("completion_window", &self.completion_window)
            .optional("metadata", self.metadata.as_ref())
            .build_requiring(&["input_file_id", "endpoint"])?;
        self.client
            .send_json(HttpRequest::post("batches").json(body))
            .await
    }
}

/// `GET batches/{batch_id}`
pub struct BatchGetService {
    client: Client,
    batch_id: String,
}

impl BatchGetService {
    pub(crate) fn new(client: Client, batch_id: impl Into<String>) -> Self {
        Self {
            client,
            batch_id: batch_id.into(),
        }
    }

    pub async fn execute(self) -> Result<BatchItem> {
        let req = HttpRequest::get("batches/{batch_id}").path_param("batch_id", self.batch_id);
        self.client.send_json(req).await
    }
}

/// `POST batches/{batch_id}/cancel`
pub struct BatchCancelService {
    client: Client,
    batch_id: String,
}

impl BatchCancelService {
    pub(crate) fn new(client: Client, batch_id: impl Into<String>) -> Self {
        Self {
            client,
            batch_id: batch_id.into(),
        }
    }

    pub async fn execute(self) -> Result<()> {
        let req = HttpRequest::post("batches/{batch_id}/cancel")
            .path_param("batch_id", self.batch_id)
            .json(serde_json::json!({}));
        self.client.send_empty(req).await
    }
}

/// `GET batches`
pub struct BatchListService {
    client: Client,
    after: Option<String>,
    limit: Option<u32>,
}

impl BatchListService {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            after: None,
            limit: None,
        }
    }

    /// Cursor: list batches after this id.
    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub async fn execute(self) -> Result<BatchListResponse> {
        let req = HttpRequest::get("batches")
            .query_opt("after", self.after)
            .query_opt("limit", self.limit);
        self.client.send_json(req).await
    }
}

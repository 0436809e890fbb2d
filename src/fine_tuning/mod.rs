//! Fine-tuning jobs: create, inspect, list, follow events, cancel and delete.
//!
//! Hyper-parameters accept either a number or the string
//! [`HYPER_PARAMETER_AUTO`], modelled with [`StringOr`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::Client;
use crate::error::ApiError;
use crate::transport::HttpRequest;
use crate::types::common::null_to_default;
use crate::types::StringOr;
use crate::utils::BodyBuilder;
use crate::Result;

pub const HYPER_PARAMETER_AUTO: &str = "auto";

pub const FINE_TUNE_STATUS_CREATE: &str = "create";
pub const FINE_TUNE_STATUS_VALIDATING_FILES: &str = "validating_files";
pub const FINE_TUNE_STATUS_QUEUED: &str = "queued";
pub const FINE_TUNE_STATUS_RUNNING: &str = "running";
pub const FINE_TUNE_STATUS_SUCCEEDED: &str = "succeeded";
pub const FINE_TUNE_STATUS_FAILED: &str = "failed";
pub const FINE_TUNE_STATUS_CANCELLED: &str = "cancelled";

/// A fine-tuning job. Returned by create, get, cancel and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineTuneItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub request_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub fine_tuned_model: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub training_file: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub validation_file: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub error: ApiError,
}

impl FineTuneItem {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status.as_str(),
            FINE_TUNE_STATUS_SUCCEEDED | FINE_TUNE_STATUS_FAILED | FINE_TUNE_STATUS_CANCELLED
        )
    }
}

/// `POST fine_tuning/jobs`
pub struct FineTuneCreateService {
    client: Client,
    model: String,
    training_file: String,
    validation_file: Option<String>,
    suffix: Option<String>,
    request_id: Option<String>,
    learning_rate_multiplier: Option<StringOr<f64>>,
    batch_size: Option<StringOr<i64>>,
    n_epochs: Option<StringOr<i64>>,
}

impl FineTuneCreateService {
    pub(crate) fn new(
        client: Client,
        model: impl Into<String>,
        training_file: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            training_file: training_file.into(),
            validation_file: None,
            suffix: None,
            request_id: None,
            learning_rate_multiplier: None,
            batch_size: None,
            n_epochs: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn training_file(mut self, training_file: impl Into<String>) -> Self {
        self.training_file = training_file.into();
        self
    }

    pub fn validation_file(mut self, validation_file: impl Into<String>) -> Self {
        self.validation_file = Some(validation_file.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn learning_rate_multiplier(mut self, value: f64) -> Self {
        self.learning_rate_multiplier = Some(StringOr::value(value));
        self
    }

    pub fn learning_rate_multiplier_auto(mut self) -> Self {
        self.learning_rate_multiplier = Some(StringOr::string(HYPER_PARAMETER_AUTO));
        self
    }

    pub fn batch_size(mut self, value: i64) -> Self {
        self.batch_size = Some(StringOr::value(value));
        self
    }

    pub fn batch_size_auto(mut self) -> Self {
        self.batch_size = Some(StringOr::string(HYPER_PARAMETER_AUTO));
        self
    }

    pub fn n_epochs(mut self, value: i64) -> Self {
        self.n_epochs = Some(StringOr::value(value));
        self
    }

    pub fn n_epochs_auto(mut self) -> Self {
        self.n_epochs = Some(StringOr::string(HYPER_PARAMETER_AUTO));
        self
    }

    fn build_body(&self) -> Result<Map<String, Value>> {
        let hyperparameters = BodyBuilder::new()
            .optional(
                "learning_rate_multiplier",
                self.learning_rate_multiplier.as_ref(),
            )
            .optional("batch_size", self.batch_size.as_ref())
            .optional("n_epochs", self.n_epochs.as_ref());

        BodyBuilder::new()
            .required("model", &self.model)
            .required("training_file", &self.training_file)
            .optional("validation_file", self.validation_file.as_ref())
            .optional("suffix", self.suffix.as_ref())
            .optional("request_id", self.request_id.as_ref())
            .nested("hyperparameters", hyperparameters)
            .build()
    }

    pub async fn execute(self) -> Result<FineTuneItem> {
        let body = self.build_body()?;
        self.client
            .send_json(HttpRequest::post("fine_tuning/jobs").json(body))
            .await
    }
}

/// `GET fine_tuning/jobs/{job_id}`
pub struct FineTuneGetService {
    client: Client,
    job_id: String,
}

impl FineTuneGetService {
    pub(crate) fn new(client: Client, job_id: impl Into<String>) -> Self {
        Self {
            client,
            job_id: job_id.into(),
        }
    }

    pub async fn execute(self) -> Result<FineTuneItem> {
        let req = HttpRequest::get("fine_tuning/jobs/{job_id}").path_param("job_id", self.job_id);
        self.client.send_json(req).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineTuneListResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub data: Vec<FineTuneItem>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
}

/// `GET fine_tuning/jobs`
pub struct FineTuneListService {
    client: Client,
    limit: Option<u32>,
    after: Option<String>,
}

impl FineTuneListService {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            limit: None,
            after: None,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub async fn execute(self) -> Result<FineTuneListResponse> {
        let req = HttpRequest::get("fine_tuning/jobs")
            .query_opt("limit", self.limit)
            .query_opt("after", self.after);
        self.client.send_json(req).await
    }
}

/// Training metrics carried by a progress event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FineTuneEventData {
    #[serde(default, deserialize_with = "null_to_default")]
    pub acc: f64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub loss: f64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub current_steps: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub remaining_time: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub elapsed_time: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_steps: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub epoch: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub trained_tokens: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub learning_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FineTuneEventItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "null_to_default")]
    pub event_type: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub level: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub data: FineTuneEventData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FineTuneEventListResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub data: Vec<FineTuneEventItem>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub has_more: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub object: String,
}

/// `GET fine_tuning/jobs/{job_id}/events`
pub struct FineTuneEventListService {
    client: Client,
    job_id: String,
    limit: Option<u32>,
    after: Option<String>,
}

impl FineTuneEventListService {
    pub(crate) fn new(client: Client, job_id: impl Into<String>) -> Self {
        Self {
            client,
            job_id: job_id.into(),
            limit: None,
            after: None,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub async fn execute(self) -> Result<FineTuneEventListResponse> {
        let req = HttpRequest::get("fine_tuning/jobs/{job_id}/events")
            .path_param("job_id", self.job_id)
            .query_opt("limit", self.limit)
            .query_opt("after", self.after);
        self.client.send_json(req).await
    }
}

/// `POST fine_tuning/jobs/{job_id}/cancel`
pub struct FineTuneCancelService {
    client: Client,
    job_id: String,
}

impl FineTuneCancelService {
    pub(crate) fn new(client: Client, job_id: impl Into<String>) -> Self {
        Self {
            client,
            job_id: job_id.into(),
        }
    }

    pub async fn execute(self) -> Result<FineTuneItem> {
        let req = HttpRequest::post("fine_tuning/jobs/{job_id}/cancel")
            .path_param("job_id", self.job_id);
        self.client.send_json(req).await
    }
}

/// `DELETE fine_tuning/jobs/{job_id}`
pub struct FineTuneDeleteService {
    client: Client,
    job_id: String,
}

impl FineTuneDeleteService {
    pub(crate) fn new(client: Client, job_id: impl Into<String>) -> Self {
        Self {
            client,
            job_id: job_id.into(),
        }
    }

    pub async fn execute(self) -> Result<FineTuneItem> {
        let req =
            HttpRequest::delete("fine_tuning/jobs/{job_id}").path_param("job_id", self.job_id);
        self.client.send_json(req).await
    }
}

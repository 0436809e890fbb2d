//! Video generation and polling of asynchronous task results.
//!
//! Video generation is asynchronous: [`VideoGenerationService`] returns a
//! task id, and [`AsyncResultService`] reports its status until it is
//! [`VIDEO_STATUS_SUCCESS`] or [`VIDEO_STATUS_FAIL`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::batch::{BatchSupport, BATCH_ENDPOINT_V4_VIDEOS_GENERATIONS};
use crate::client::Client;
use crate::transport::HttpRequest;
use crate::types::common::null_to_default;
use crate::utils::BodyBuilder;
use crate::Result;

pub const VIDEO_STATUS_PROCESSING: &str = "PROCESSING";
pub const VIDEO_STATUS_SUCCESS: &str = "SUCCESS";
pub const VIDEO_STATUS_FAIL: &str = "FAIL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoGenerationResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub request_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub task_status: String,
}

/// `POST videos/generations`
pub struct VideoGenerationService {
    client: Client,
    model: String,
    prompt: String,
    image_url: Option<String>,
    user_id: Option<String>,
    request_id: Option<String>,
}

impl VideoGenerationService {
    pub(crate) fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            prompt: String::new(),
            image_url: None,
            user_id: None,
            request_id: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Start frame, as a URL or base64 data.
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    fn build_body(&self) -> Result<Map<String, Value>> {
        BodyBuilder::new()
            .required("model", &self.model)
            .required("prompt", &self.prompt)
            .optional("user_id", self.user_id.as_ref())
            .optional("image_url", self.image_url.as_ref())
            .optional("request_id", self.request_id.as_ref())
            .build()
    }

    pub async fn execute(self) -> Result<VideoGenerationResponse> {
        let body = self.build_body()?;
        self.client
            .send_json(HttpRequest::post("videos/generations").json(body))
            .await
    }
}

impl BatchSupport for VideoGenerationService {
    fn batch_url(&self) -> &str {
        BATCH_ENDPOINT_V4_VIDEOS_GENERATIONS
    }

    fn batch_body(&self) -> Result<Map<String, Value>> {
        self.build_body()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncResultVideo {
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cover_image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncResultResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub task_status: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub request_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub video_result: Vec<AsyncResultVideo>,
}

impl AsyncResultResponse {
    pub fn is_finished(&self) -> bool {
        self.task_status == VIDEO_STATUS_SUCCESS || self.task_status == VIDEO_STATUS_FAIL
    }
}

/// `GET async-result/{id}`
pub struct AsyncResultService {
    client: Client,
    id: String,
}

impl AsyncResultService {
    pub(crate) fn new(client: Client, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
        }
    }

    pub async fn execute(self) -> Result<AsyncResultResponse> {
        let req = HttpRequest::get("async-result/{id}").path_param("id", self.id);
        self.client.send_json(req).await
    }
}

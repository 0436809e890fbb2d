//! Image generation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::batch::{BatchSupport, BATCH_ENDPOINT_V4_IMAGES_GENERATIONS};
use crate::client::Client;
use crate::transport::HttpRequest;
use crate::types::common::null_to_default;
use crate::types::UrlItem;
use crate::utils::BodyBuilder;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub created: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub data: Vec<UrlItem>,
}

/// `POST images/generations`
pub struct ImageGenerationService {
    client: Client,
    model: String,
    prompt: String,
    size: Option<String>,
    user_id: Option<String>,
}

impl ImageGenerationService {
    pub(crate) fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            prompt: String::new(),
            size: None,
            user_id: None,
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

    /// e.g. `1024x1024`.
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    fn build_body(&self) -> Result<Map<String, Value>> {
        BodyBuilder::new()
            .required("model", &self.model)
            .required("prompt", &self.prompt)
            .optional("size", self.size.as_ref())
            .optional("user_id", self.user_id.as_ref())
            .build()
    }

    pub async fn execute(self) -> Result<ImageGenerationResponse> {
        let body = self.build_body()?;
        self.client
            .send_json(HttpRequest::post("images/generations").json(body))
            .await
    }
}

impl BatchSupport for ImageGenerationService {
    fn batch_url(&self) -> &str {
        BATCH_ENDPOINT_V4_IMAGES_GENERATIONS
    }

    fn batch_body(&self) -> Result<Map<String, Value>> {
        self.build_body()
    }
}

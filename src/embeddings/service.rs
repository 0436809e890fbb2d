//! Embedding endpoint.

use serde_json::{Map, Value};

use super::types::{EmbeddingInput, EmbeddingResponse};
use crate::batch::{BatchSupport, BATCH_ENDPOINT_V4_EMBEDDINGS};
use crate::client::Client;
use crate::transport::HttpRequest;
use crate::utils::BodyBuilder;
use crate::Result;

/// `POST embeddings`
pub struct EmbeddingService {
    client: Client,
    model: String,
    input: EmbeddingInput,
    dimensions: Option<usize>,
}

impl EmbeddingService {
    pub(crate) fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            input: EmbeddingInput::default(),
            dimensions: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn input(mut self, input: impl Into<EmbeddingInput>) -> Self {
        self.input = input.into();
        self
    }

    /// Output vector size, for models that support truncation.
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    fn build_body(&self) -> Result<Map<String, Value>> {
        BodyBuilder::new()
            .required("model", &self.model)
            .required("input", &self.input)
            .optional("dimensions", self.dimensions.as_ref())
            .build()
    }

    pub async fn execute(self) -> Result<EmbeddingResponse> {
        let body = self.build_body()?;
        if self.input.is_empty() {
            tracing::warn!(model = %self.model, "embedding request with empty input");
        }
        self.client
            .send_json(HttpRequest::post("embeddings").json(body))
            .await
    }
}

impl BatchSupport for EmbeddingService {
    fn batch_url(&self) -> &str {
        BATCH_ENDPOINT_V4_EMBEDDINGS
    }

    fn batch_body(&self) -> Result<Map<String, Value>> {
        self.build_body()
    }
}

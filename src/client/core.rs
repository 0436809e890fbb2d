use crate::batch::{BatchCancelService, BatchCreateService, BatchGetService, BatchListService};
use crate::chat::ChatCompletionService;
use crate::client::builder::ClientBuilder;
use crate::client::config::ClientConfig;
use crate::embeddings::EmbeddingService;
use crate::files::{
    FileCreateService, FileDeleteService, FileDownloadService, FileEditService, FileGetService,
    FileListService,
};
use crate::fine_tuning::{
    FineTuneCancelService, FineTuneCreateService, FineTuneDeleteService, FineTuneEventListService,
    FineTuneGetService, FineTuneListService,
};
use crate::images::ImageGenerationService;
use crate::knowledge::{
    KnowledgeCapacityService, KnowledgeCreateService, KnowledgeDeleteService, KnowledgeEditService,
    KnowledgeListService,
};
use crate::transport::{HttpRequest, HttpTransport};
use crate::videos::{AsyncResultService, VideoGenerationService};
use crate::{BoxStream, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Handle to the platform. Cheap to clone; every service borrows a clone.
#[derive(Clone)]
pub struct Client {
    transport: Arc<HttpTransport>,
    cancel: CancellationToken,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build a client purely from `ZHIPUAI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub(crate) fn from_parts(transport: Arc<HttpTransport>, cancel: CancellationToken) -> Self {
        Self { transport, cancel }
    }

    /// A client sharing this one's connection pool whose requests stop when `token` fires.
    ///
    /// Cancelled calls return [`crate::Error::Cancelled`], including streams
    /// that are already being read.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cancel: token,
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, req: HttpRequest) -> Result<T> {
        self.transport.send_json(req, &self.cancel).await
    }

    pub(crate) async fn send_empty(&self, req: HttpRequest) -> Result<()> {
        self.transport.send_empty(req, &self.cancel).await
    }

    pub(crate) async fn send_raw(
        &self,
        req: HttpRequest,
        accept_stream: bool,
    ) -> Result<BoxStream<'static, Bytes>> {
        self.transport.send_raw(req, &self.cancel, accept_stream).await
    }

    // Chat, embeddings, generation.

    pub fn chat_completion(&self, model: impl Into<String>) -> ChatCompletionService {
        ChatCompletionService::new(self.clone(), model)
    }

    pub fn embedding(&self, model: impl Into<String>) -> EmbeddingService {
        EmbeddingService::new(self.clone(), model)
    }

    pub fn image_generation(&self, model: impl Into<String>) -> ImageGenerationService {
        ImageGenerationService::new(self.clone(), model)
    }

    pub fn video_generation(&self, model: impl Into<String>) -> VideoGenerationService {
        VideoGenerationService::new(self.clone(), model)
    }

    pub fn async_result(&self, id: impl Into<String>) -> AsyncResultService {
        AsyncResultService::new(self.clone(), id)
    }

    // Batches.

    pub fn batch_create(&self) -> BatchCreateService {
        BatchCreateService::new(self.clone())
    }

    pub fn batch_get(&self, batch_id: impl Into<String>) -> BatchGetService {
        BatchGetService::new(self.clone(), batch_id)
    }

    pub fn batch_cancel(&self, batch_id: impl Into<String>) -> BatchCancelService {
        BatchCancelService::new(self.clone(), batch_id)
    }

    pub fn batch_list(&self) -> BatchListService {
        BatchListService::new(self.clone())
    }

    // Files.

    pub fn file_create(&self, purpose: impl Into<String>) -> FileCreateService {
        FileCreateService::new(self.clone(), purpose)
    }

    pub fn file_list(&self, purpose: impl Into<String>) -> FileListService {
        FileListService::new(self.clone(), purpose)
    }

    pub fn file_get(&self, document_id: impl Into<String>) -> FileGetService {
        FileGetService::new(self.clone(), document_id)
    }

    pub fn file_edit(&self, document_id: impl Into<String>) -> FileEditService {
        FileEditService::new(self.clone(), document_id)
    }

    pub fn file_delete(&self, document_id: impl Into<String>) -> FileDeleteService {
        FileDeleteService::new(self.clone(), document_id)
    }

    pub fn file_download(&self, file_id: impl Into<String>) -> FileDownloadService {
        FileDownloadService::new(self.clone(), file_id)
    }

    // Fine-tuning.

    pub fn fine_tune_create(
        &self,
        model: impl Into<String>,
        training_file: impl Into<String>,
    ) -> FineTuneCreateService {
        FineTuneCreateService::new(self.clone(), model, training_file)
    }

    pub fn fine_tune_get(&self, job_id: impl Into<String>) -> FineTuneGetService {
        FineTuneGetService::new(self.clone(), job_id)
    }

    pub fn fine_tune_list(&self) -> FineTuneListService {
        FineTuneListService::new(self.clone())
    }

    pub fn fine_tune_events(&self, job_id: impl Into<String>) -> FineTuneEventListService {
        FineTuneEventListService::new(self.clone(), job_id)
    }

    pub fn fine_tune_cancel(&self, job_id: impl Into<String>) -> FineTuneCancelService {
        FineTuneCancelService::new(self.clone(), job_id)
    }

    pub fn fine_tune_delete(&self, job_id: impl Into<String>) -> FineTuneDeleteService {
        FineTuneDeleteService::new(self.clone(), job_id)
    }

    // Knowledge bases.

    pub fn knowledge_create(&self, name: impl Into<String>, embedding_id: i64) -> KnowledgeCreateService {
        KnowledgeCreateService::new(self.clone(), name, embedding_id)
    }

    pub fn knowledge_edit(&self, knowledge_id: impl Into<String>) -> KnowledgeEditService {
        KnowledgeEditService::new(self.clone(), knowledge_id)
    }

    pub fn knowledge_list(&self) -> KnowledgeListService {
        KnowledgeListService::new(self.clone())
    }

    pub fn knowledge_delete(&self, knowledge_id: impl Into<String>) -> KnowledgeDeleteService {
        KnowledgeDeleteService::new(self.clone(), knowledge_id)
    }

    pub fn knowledge_capacity(&self) -> KnowledgeCapacityService {
        KnowledgeCapacityService::new(self.clone())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", self.config())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

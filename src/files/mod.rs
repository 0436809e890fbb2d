//! File management: uploads for fine-tuning, batches and knowledge bases,
//! knowledge documents, and downloads of file content.

mod service;

pub use service::{
    FileCreateKnowledgeFailedInfo, FileCreateKnowledgeSuccessInfo, FileCreateResponse,
    FileCreateService, FileDeleteService, FileDownloadService, FileEditService, FileFailInfo,
    FileGetService, FileListFineTuneItem, FileListKnowledgeItem, FileListResponse,
    FileListService,
};

pub const FILE_PURPOSE_FINE_TUNE: &str = "fine-tune";
pub const FILE_PURPOSE_RETRIEVAL: &str = "retrieval";
pub const FILE_PURPOSE_BATCH: &str = "batch";

pub const KNOWLEDGE_TYPE_ARTICLE: i64 = 1;
pub const KNOWLEDGE_TYPE_QA_DOCUMENT: i64 = 2;
pub const KNOWLEDGE_TYPE_QA_SPREADSHEET: i64 = 3;
pub const KNOWLEDGE_TYPE_PRODUCT_DATABASE_SPREADSHEET: i64 = 4;
pub const KNOWLEDGE_TYPE_CUSTOM: i64 = 5;

//! Knowledge bases used by the retrieval tool.
//!
//! Documents inside a knowledge base are managed through [`crate::files`].

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::transport::HttpRequest;
use crate::types::common::null_to_default;
use crate::types::IdItem;
use crate::utils::BodyBuilder;
use crate::Result;

pub const KNOWLEDGE_EMBEDDING_ID_EMBEDDING_2: i64 = 3;

/// `POST knowledge`
pub struct KnowledgeCreateService {
    client: Client,
    name: String,
    embedding_id: i64,
    description: Option<String>,
}

impl KnowledgeCreateService {
    pub(crate) fn new(client: Client, name: impl Into<String>, embedding_id: i64) -> Self {
        Self {
            client,
            name: name.into(),
            embedding_id,
            description: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn embedding_id(mut self, embedding_id: i64) -> Self {
        self.embedding_id = embedding_id;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub async fn execute(self) -> Result<IdItem> {
        let body = BodyBuilder::new()
            .required("name", &self.name)
            .required("embedding_id", &self.embedding_id)
            .optional("description", self.description.as_ref())
            .build_requiring(&["name"])?;
        self.client
            .send_json(HttpRequest::post("knowledge").json(body))
            .await
    }
}

/// `PUT knowledge/{knowledge_id}`; only the fields set are changed.
pub struct KnowledgeEditService {
    client: Client,
    knowledge_id: String,
    name: Option<String>,
    description: Option<String>,
    embedding_id: Option<i64>,
}

impl KnowledgeEditService {
    pub(crate) fn new(client: Client, knowledge_id: impl Into<String>) -> Self {
        Self {
            client,
            knowledge_id: knowledge_id.into(),
            name: None,
            description: None,
            embedding_id: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn embedding_id(mut self, embedding_id: i64) -> Self {
        self.embedding_id = Some(embedding_id);
        self
    }

    pub async fn execute(self) -> Result<()> {
        let body = BodyBuilder::new()
            .optional("name", self.name.as_ref())
            .optional("description", self.description.as_ref())
            .optional("embedding_id", self.embedding_id.as_ref())
            .build()?;
        let req = HttpRequest::put("knowledge/{knowledge_id}")
            .path_param("knowledge_id", self.knowledge_id)
            .json(body);
        self.client.send_empty(req).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub background: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub embedding_id: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub custom_identifier: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub word_num: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub length: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub document_size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeListResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub list: Vec<KnowledgeItem>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total: i64,
}

/// `GET knowledge`
pub struct KnowledgeListService {
    client: Client,
    page: Option<u32>,
    size: Option<u32>,
}

impl KnowledgeListService {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            page: None,
            size: None,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub async fn execute(self) -> Result<KnowledgeListResponse> {
        let req = HttpRequest::get("knowledge")
            .query_opt("page", self.page)
            .query_opt("size", self.size);
        self.client.send_json(req).await
    }
}

/// `DELETE knowledge/{knowledge_id}`
pub struct KnowledgeDeleteService {
    client: Client,
    knowledge_id: String,
}

impl KnowledgeDeleteService {
    pub(crate) fn new(client: Client, knowledge_id: impl Into<String>) -> Self {
        Self {
            client,
            knowledge_id: knowledge_id.into(),
        }
    }

    pub async fn execute(self) -> Result<()> {
        let req = HttpRequest::delete("knowledge/{knowledge_id}")
            .path_param("knowledge_id", self.knowledge_id);
        self.client.send_empty(req).await
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeCapacityItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub word_num: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub length: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeCapacityResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub used: KnowledgeCapacityItem,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total: KnowledgeCapacityItem,
}

impl KnowledgeCapacityResponse {
    /// Characters still available, never negative.
    pub fn remaining_length(&self) -> i64 {
        (self.total.length - self.used.length).max(0)
    }
}

/// `GET knowledge/capacity`
pub struct KnowledgeCapacityService {
    client: Client,
}

impl KnowledgeCapacityService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn execute(self) -> Result<KnowledgeCapacityResponse> {
        self.client
            .send_json(HttpRequest::get("knowledge/capacity"))
            .await
    }
}

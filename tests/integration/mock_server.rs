//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use tokio::sync::Mutex;
use zhipu_rs::Client;

pub const TEST_API_KEY: &str = "test-key-id.test-key-secret";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

/// Route library logs to the test output; filter with `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl MockServerFixture {
    pub async fn new() -> Self {
        init_tracing();
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Client pointed at the mock server
    pub fn client(&self) -> Client {
        Client::builder()
            .api_key(TEST_API_KEY)
            .base_url(&self.base_url)
            .build()
            .expect("client should build against mock server")
    }

    /// Streaming chat response built from complete `data:` lines
    pub async fn mock_sse_stream(&self, chunks: &[&str]) -> Mock {
        let body = chunks
            .iter()
            .map(|chunk| {
                if chunk.starts_with("data:") {
                    format!("{chunk}\n\n")
                } else {
                    format!("data: {chunk}\n\n")
                }
            })
            .collect::<String>();
        self.mock_sse_raw(&body).await
    }

    /// Streaming chat response with a verbatim body
    pub async fn mock_sse_raw(&self, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", "/chat/completions")
            .match_header("accept", "text/event-stream")
            .match_body(Matcher::PartialJson(serde_json::json!({"stream": true})))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }

    /// JSON response for any method and path
    pub async fn mock_json(&self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// JSON response that only matches when the request body contains `partial`
    pub async fn mock_json_matching(
        &self,
        method: &str,
        path: &str,
        partial: serde_json::Value,
        body: &str,
    ) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .match_body(Matcher::PartialJson(partial))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// JSON response that only matches the given query pairs
    pub async fn mock_get_with_query(
        &self,
        path: &str,
        query: Vec<(&str, &str)>,
        body: &str,
    ) -> Mock {
        let matchers = query
            .into_iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
            .collect();
        let mut server = self.server.lock().await;
        server
            .mock("GET", path)
            .match_query(Matcher::AllOf(matchers))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Error response with an arbitrary body
    pub async fn mock_error_response(
        &self,
        method: &str,
        path: &str,
        status: usize,
        error_body: &str,
    ) -> Mock {
        self.mock_json(method, path, status, error_body).await
    }
}

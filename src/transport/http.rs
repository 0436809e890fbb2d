use crate::client::config::ClientConfig;
use crate::error::{ApiError, ApiErrorResponse, ErrorContext};
use crate::transport::{auth, HttpRequest, RequestBody, TransportError};
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::{stream, Future, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use std::time::{Instant, SystemTime};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Shared HTTP plumbing: URL building, signing, cancellation and response decoding.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig, client: Option<reqwest::Client>) -> Result<Self> {
        let client = match client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder()
                    .pool_idle_timeout(Some(std::time::Duration::from_secs(90)));
                if let Some(timeout) = config.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| {
                    Error::Transport(TransportError::Other(format!(
                        "failed to build HTTP client: {e}"
                    )))
                })?
            }
        };
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_url(&self, req: &HttpRequest) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::configuration_with_context(
                    "base url cannot carry a path",
                    ErrorContext::new()
                        .with_field_path("base_url")
                        .with_source("http_transport"),
                )
            })?;
            segments.pop_if_empty();
            for seg in req.path.split('/').filter(|s| !s.is_empty()) {
                match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = req
                            .path_params
                            .iter()
                            .find(|(k, _)| k == name)
                            .map(|(_, v)| v.as_str())
                            .filter(|v| !v.is_empty())
                            .ok_or_else(|| {
                                Error::validation_with_context(
                                    format!("missing path parameter `{name}`"),
                                    ErrorContext::new()
                                        .with_field_path(name)
                                        .with_details(req.path.clone())
                                        .with_source("http_transport"),
                                )
                            })?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(seg);
                    }
                }
            }
        }
        if !req.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&req.query);
        }
        Ok(url)
    }

    /// Sign and send; any status is returned to the caller.
    async fn send(
        &self,
        req: HttpRequest,
        cancel: &CancellationToken,
        accept_stream: bool,
    ) -> Result<reqwest::Response> {
        let url = self.build_url(&req)?;
        let token = auth::sign_token(&self.config.api_key, SystemTime::now())?;
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::debug!(
            method = %req.method,
            path = %req.path,
            request_id = %request_id,
            "sending request"
        );

        let mut builder = self
            .client
            .request(req.method.clone(), url)
            .bearer_auth(token)
            .header("x-request-id", &request_id);
        if accept_stream {
            builder = builder.header(reqwest::header::ACCEPT, "text/event-stream");
        }
        builder = match req.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => {
                if self.config.debug {
                    tracing::info!(request_id = %request_id, body = %body, "request body");
                }
                builder.json(&body)
            }
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let started = Instant::now();
        let resp = guarded(cancel, builder.send())
            .await?
            .map_err(TransportError::Http)?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(
                request_id = %request_id,
                http_status = status.as_u16(),
                duration_ms = started.elapsed().as_millis() as u64,
                "response received"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                method = %req.method,
                path = %req.path,
                http_status = status.as_u16(),
                duration_ms = started.elapsed().as_millis() as u64,
                "request failed"
            );
        }
        Ok(resp)
    }

    async fn read_body(resp: reqwest::Response, cancel: &CancellationToken) -> Result<Bytes> {
        Ok(guarded(cancel, resp.bytes())
            .await?
            .map_err(TransportError::Http)?)
    }

    /// Turn a non-success response into a structured API error.
    async fn api_error(resp: reqwest::Response, cancel: &CancellationToken) -> Error {
        let status = resp.status();
        let body = match Self::read_body(resp, cancel).await {
            Ok(body) => body,
            Err(e) => return e,
        };
        let error = serde_json::from_slice::<ApiErrorResponse>(&body)
            .ok()
            .map(|r| r.error)
            .filter(|e| !e.code.is_empty() || !e.message.is_empty())
            .unwrap_or_else(|| ApiError {
                code: String::new(),
                message: status.to_string(),
            });
        Error::Api {
            status: status.as_u16(),
            error,
        }
    }

    /// One-shot JSON request; non-success bodies become [`Error::Api`].
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        req: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let resp = self.send(req, cancel, false).await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, cancel).await);
        }
        let body = Self::read_body(resp, cancel).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Like [`HttpTransport::send_json`] for endpoints whose success body is ignored.
    pub async fn send_empty(&self, req: HttpRequest, cancel: &CancellationToken) -> Result<()> {
        let resp = self.send(req, cancel, false).await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, cancel).await);
        }
        Self::read_body(resp, cancel).await?;
        Ok(())
    }

    /// Raw mode: the body is handed over as bytes.
    ///
    /// Non-success responses yield [`Error::Status`] with the status line only;
    /// the body is not inspected.
    pub async fn send_raw(
        &self,
        req: HttpRequest,
        cancel: &CancellationToken,
        accept_stream: bool,
    ) -> Result<BoxStream<'static, Bytes>> {
        let resp = self.send(req, cancel, accept_stream).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.to_string(),
            });
        }
        let bytes = resp
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Ok(cancellable(Box::pin(bytes), cancel.clone()))
    }
}

/// Run `fut` unless `cancel` fires first.
pub(crate) async fn guarded<F: Future>(cancel: &CancellationToken, fut: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        out = fut => Ok(out),
    }
}

/// End a byte stream with [`Error::Cancelled`] as soon as `cancel` fires.
pub(crate) fn cancellable(
    input: BoxStream<'static, Bytes>,
    cancel: CancellationToken,
) -> BoxStream<'static, Bytes> {
    Box::pin(stream::unfold(Some((input, cancel)), |state| async move {
        let (mut input, cancel) = match state {
            Some(state) => state,
            None => return None,
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Some((Err(Error::Cancelled), None)),
            item = input.next() => item.map(|item| (item, Some((input, cancel)))),
        }
    }))
}

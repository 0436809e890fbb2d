use crate::client::config::{
    ClientConfig, DEFAULT_BASE_URL, ENV_API_KEY, ENV_BASE_URL, ENV_DEBUG, ENV_HTTP_TIMEOUT_SECS,
};
use crate::client::core::Client;
use crate::error::{Error, ErrorContext};
use crate::transport::{ApiKey, HttpTransport};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Builder for [`Client`].
///
/// Anything not set explicitly is read from the environment:
/// - `ZHIPUAI_API_KEY` (`<id>.<secret>`, required)
/// - `ZHIPUAI_BASE_URL` (default `https://open.bigmodel.cn/api/paas/v4`)
/// - `ZHIPUAI_DEBUG` (log request bodies)
/// - `ZHIPUAI_HTTP_TIMEOUT_SECS` (whole-request timeout)
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    debug: Option<bool>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the base URL (also used to point at mock servers in tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client; timeouts set here are then ignored.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<Client> {
        let raw_key = self
            .api_key
            .or_else(|| std::env::var(ENV_API_KEY).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or(Error::ApiKeyMissing)?;
        let api_key = ApiKey::parse(&raw_key)?;

        let raw_base = self
            .base_url
            .or_else(|| std::env::var(ENV_BASE_URL).ok())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw_base.trim()).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base url: {e}"),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(raw_base.clone())
                    .with_source("client_builder"),
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::configuration_with_context(
                "base url cannot carry a path",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(raw_base)
                    .with_source("client_builder"),
            ));
        }

        let debug = self
            .debug
            .or_else(|| std::env::var(ENV_DEBUG).ok().and_then(|v| parse_bool(&v)))
            .unwrap_or(false);

        let timeout = self.timeout.or_else(|| {
            std::env::var(ENV_HTTP_TIMEOUT_SECS)
                .ok()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        });

        let config = ClientConfig {
            base_url,
            api_key,
            debug,
            timeout,
        };
        tracing::debug!(
            base_url = %config.base_url,
            key_id = %config.api_key.id(),
            debug = config.debug,
            "client configured"
        );

        let transport = HttpTransport::new(config, self.http_client)?;
        Ok(Client::from_parts(Arc::new(transport), CancellationToken::new()))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

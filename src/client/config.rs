use crate::transport::ApiKey;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

pub const ENV_API_KEY: &str = "ZHIPUAI_API_KEY";
pub const ENV_BASE_URL: &str = "ZHIPUAI_BASE_URL";
pub const ENV_DEBUG: &str = "ZHIPUAI_DEBUG";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "ZHIPUAI_HTTP_TIMEOUT_SECS";

/// Resolved, immutable client settings.
///
/// Built once by [`crate::ClientBuilder`]; tokens are derived from it per request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) api_key: ApiKey,
    pub(crate) debug: bool,
    pub(crate) timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

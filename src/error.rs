use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "base_url", "tools[0].function.parameters")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected format, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "client_builder", "body_builder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Error payload returned by the platform on non-success responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Envelope of [`ApiError`]: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: ApiError,
}

/// Unified error type for the Zhipu client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: API key is missing")]
    ApiKeyMissing,

    #[error("Configuration error: API key must be `<id>.<secret>`")]
    ApiKeyMalformed,

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    /// Non-success response whose body carried a structured error.
    #[error("{error}")]
    Api { status: u16, error: ApiError },

    /// Non-success response in raw mode (streaming, downloads); the body is not decoded.
    #[error("HTTP error: {status}")]
    Status { status: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Returned by a caller-supplied stream handler.
    #[error("Stream handler error: {0}")]
    Handler(#[source] anyhow::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Token signing error: {0}")]
    Signing(String),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// Platform error code, if this error came from a structured error body.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Error::Api { error, .. } => Some(error.code.as_str()),
            _ => None,
        }
    }

    /// Platform error message, or this error's display text when none was returned.
    pub fn api_message(&self) -> String {
        match self {
            Error::Api { error, .. } => error.message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a failed response, for both structured and raw-mode failures.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Status { status } => status
                .split_whitespace()
                .next()
                .and_then(|code| code.parse().ok()),
            Error::Transport(crate::transport::TransportError::Http(e)) => {
                e.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

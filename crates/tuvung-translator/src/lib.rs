use serde::Deserialize;
use tuvung_types::{ErrorKind, InvalidQuery, Query};

pub mod google;
pub mod openai;
pub mod prompt;

pub use google::GoogleTranslateClient;
pub use openai::{ChatCompletion, OpenAiClient};

pub type ProviderId = String;

/// A single external provider answering lookup requests
#[async_trait::async_trait]
pub trait ProviderClient: Send + Sync {
    /// Send one request for `query` and return the unparsed payload
    async fn call(&self, query: &Query) -> Result<RawResponse, ProviderError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

/// Unparsed provider output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub provider: ProviderId,
    pub text: String,
}

impl RawResponse {
    pub fn new(provider: impl Into<ProviderId>, text: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            text: text.into(),
        }
    }
}

/// What a provider's payload can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Free text embedding a full record: pinyin, translation, example
    Rich,
    /// A bare translated string
    TranslationOnly,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub shape: ResponseShape,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] InvalidQuery),

    #[error("Missing credential for {0}")]
    MissingCredential(String),

    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error: HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The request could not be built, e.g. a bad endpoint URL
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Classify a non-2xx status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ProviderError::Unauthenticated(message),
            429 => ProviderError::RateLimited,
            _ => ProviderError::Rejected { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::InvalidQuery(_) => ErrorKind::InvalidQuery,
            ProviderError::MissingCredential(_) => ErrorKind::MissingCredential,
            ProviderError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            ProviderError::Network(_) => ErrorKind::NetworkFailure,
            ProviderError::RateLimited
            | ProviderError::Rejected { .. }
            | ProviderError::InvalidRequest(_) => ErrorKind::ProviderRejected,
            ProviderError::Malformed(_) => ErrorKind::MalformedResponse,
        }
    }

    /// Likely to succeed if the same request is sent again
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Network(_) | ProviderError::RateLimited => true,
            ProviderError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return ProviderError::Malformed(e.to_string());
        }

        if e.is_builder() {
            return ProviderError::InvalidRequest(e.to_string());
        }

        match e.status() {
            Some(status) => ProviderError::from_status(status.as_u16(), e.to_string()),
            None => ProviderError::Network(e.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Turn a failed HTTP response into a [`ProviderError`], keeping the
/// provider's own error message when the body carries one
pub(crate) async fn error_from_response(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::from_status(status, error_message(status, &body))
}

fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => body.trim().to_string(),
    }
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProviderError::from_status(401, "bad key").kind(),
            ErrorKind::Unauthenticated
        );
        assert_eq!(
            ProviderError::from_status(403, "forbidden").kind(),
            ErrorKind::Unauthenticated
        );
        assert_eq!(ProviderError::from_status(429, ""), ProviderError::RateLimited);
        assert_eq!(
            ProviderError::from_status(503, "overloaded").kind(),
            ErrorKind::ProviderRejected
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Network("timeout".into()).is_transient());
        assert!(ProviderError::RateLimited.is_transient());
        assert!(ProviderError::from_status(502, "bad gateway").is_transient());
        assert!(!ProviderError::from_status(400, "bad request").is_transient());
        assert!(!ProviderError::Unauthenticated("bad key".into()).is_transient());
        assert!(!ProviderError::Malformed("not json".into()).is_transient());
    }

    #[test]
    fn test_builder_error_is_permanent() {
        let e = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        assert!(e.is_builder());

        let error = ProviderError::from(e);
        assert!(matches!(error, ProviderError::InvalidRequest(_)));
        assert_eq!(error.kind(), ErrorKind::ProviderRejected);
        assert!(!error.is_transient());
    }

    #[test]
    fn test_error_message_prefers_payload() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(401, body), "Incorrect API key provided");
        assert_eq!(error_message(500, "  "), "HTTP 500");
        assert_eq!(error_message(502, "upstream down\n"), "upstream down");
    }
}

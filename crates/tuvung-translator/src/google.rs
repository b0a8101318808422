use async_trait::async_trait;
use tuvung_config::fallback::FallbackConfig;
use tuvung_types::{Direction, Query};

use crate::{
    ProviderClient, ProviderError, ProviderMetadata, RawResponse, ResponseShape,
    build_http_client, error_from_response,
};

const PROVIDER_NAME: &str = "google";

/// Google-Translate-compatible fallback provider.
///
/// Returns a bare translation: no pinyin, no example sentence.
#[derive(Clone)]
pub struct GoogleTranslateClient {
    client: reqwest::Client,
    config: FallbackConfig,
}

impl GoogleTranslateClient {
    pub fn new(config: FallbackConfig) -> Result<Self, ProviderError> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }

    /// (source, target) language codes for a query direction
    pub fn language_pair(&self, direction: Direction<'_>) -> (&str, &str) {
        match direction {
            Direction::Forward(_) => (
                self.config.chinese_code.as_str(),
                self.config.vietnamese_code.as_str(),
            ),
            Direction::Reverse(_) => (
                self.config.vietnamese_code.as_str(),
                self.config.chinese_code.as_str(),
            ),
        }
    }
}

/// Concatenate the translated segments of a `translate_a/single` payload.
///
/// The payload is a nested array whose first element lists
/// `[translated, original, ...]` segments.
pub fn extract_translation(json: &serde_json::Value) -> Result<String, ProviderError> {
    let segments = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProviderError::Malformed("No translation segments in response".to_string()))?;

    let translated = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
        .collect::<String>();

    Ok(translated)
}

#[async_trait]
impl ProviderClient for GoogleTranslateClient {
    async fn call(&self, query: &Query) -> Result<RawResponse, ProviderError> {
        let direction = query.direction()?;
        let (source_lang, target_lang) = self.language_pair(direction);

        let mut params = vec![
            ("client", "gtx"),
            ("sl", source_lang),
            ("tl", target_lang),
            ("dt", "t"),
            ("q", direction.text()),
        ];
        if let Some(key) = self.config.api_key.as_deref() {
            params.push(("key", key));
        }

        let response = self
            .client
            .get(&self.config.api_url)
            .header("User-Agent", "Mozilla/5.0")
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let json: serde_json::Value = response.json().await?;
        let translated = extract_translation(&json)?;

        tracing::info!(
            "Translated with Google ({} -> {}): {} chars",
            source_lang,
            target_lang,
            translated.chars().count()
        );
        Ok(RawResponse::new(PROVIDER_NAME, translated))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Google Translate".to_string(),
            requires_api_key: false,
            shape: ResponseShape::TranslationOnly,
        }
    }
}

//! Google Translate API provider for machine translation
//!
//! Talks to the Google Translate v2 REST API, one text per request.
//!
//! # Authentication
//!
//! The provider loads the API key from the `GOOGLE_TRANSLATE_API_KEY`
//! environment variable (a `.env` file is honoured by the binary).

use crate::mt::error::{TranslationError, TranslationResult};
use crate::mt::translator::{MachineTranslator, validate_locale};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Google Translate API v2 provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    /// Create a new provider with an explicit API key
    ///
    /// Fails with `ConfigError` if the key is blank or the HTTP client cannot be built.
    pub fn new(api_key: String) -> TranslationResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslationError::ConfigError(
                "API key cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                TranslationError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a provider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> TranslationResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            TranslationError::ConfigError(format!("{} environment variable not set", API_KEY_ENV))
        })?;

        Self::new(api_key)
    }

    fn parse_response(body: &str) -> TranslationResult<String> {
        let response: TranslateResponse = serde_json::from_str(body)
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;

        response
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| {
                TranslationError::InvalidResponse("empty 'data.translations' array".to_string())
            })
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        let len = text.chars().count();
        if len > Self::MAX_CHARS_PER_STRING {
            return Err(TranslationError::TextTooLong {
                len,
                max: Self::MAX_CHARS_PER_STRING,
            });
        }

        let body = json!({
            "q": [text],
            "source": source_locale,
            "target": target_locale,
            "format": "text"
        });

        let url = format!("{}?key={}", self.base_url, self.api_key);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                body: text,
            });
        }

        Self::parse_response(&text)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

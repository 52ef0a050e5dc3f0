//! Machine Translation trait and locale helpers
//!
//! `MachineTranslator` is the seam between the batch and whatever backend does the actual
//! translation work (Google Translate, the mock, ...). The batch only ever translates one
//! text at a time so that a failure stays scoped to a single key.
//!
//! # Example
//!
//! ```ignore
//! use arb_translate::mt::{GoogleTranslateProvider, MachineTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("Goodbye", "en", "fr").await?;
//!     println!("{}", result); // "Au revoir"
//!     Ok(())
//! }
//! ```

use crate::mt::error::{TranslationError, TranslationResult};
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// Implementations must be shareable across worker tasks; the orchestrator holds a single
/// `Arc<dyn MachineTranslator>` for the whole batch.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "en")
    /// * `target_locale` - Target language code as understood by the backend (e.g., "fr", "zh-CN")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(TranslationError)` - If the backend failed for any reason
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String>;

    /// Name of this translation provider, used in log lines
    fn provider_name(&self) -> &str;
}

/// Validate that a locale code only contains alphanumerics, hyphens and underscores
pub fn validate_locale(locale: &str) -> TranslationResult<()> {
    if locale.is_empty() {
        return Err(TranslationError::InvalidLocale(
            "Locale code is empty".to_string(),
        ));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TranslationError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}

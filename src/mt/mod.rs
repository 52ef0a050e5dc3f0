/// Machine Translation Module
///
/// The batch talks to translation backends only through the `MachineTranslator` trait.
/// Two providers ship with the crate:
///
/// 1. **Google Translate** - Google Translate v2 REST API, keyed by `GOOGLE_TRANSLATE_API_KEY`
/// 2. **Mock** - deterministic offline translator for tests and `--mock` runs
///
/// # Example
///
/// ```ignore
/// use arb_translate::mt::{MachineTranslator, MockMode, MockTranslator};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = MockTranslator::new(MockMode::Suffix);
///     let translated = provider.translate("Goodbye", "en", "fr").await?;
///     println!("{}", translated); // "Goodbye_fr"
///     Ok(())
/// }
/// ```
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod translator;

pub use error::{TranslationError, TranslationResult};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockTranslator};
pub use translator::MachineTranslator;

use thiserror::Error;

/// Error types for machine translation backends
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Transport-level failure talking to the backend (DNS, TLS, timeout, ...)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    /// Backend answered with a non-success HTTP status
    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },
    /// Backend answered successfully but the payload was not understood
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    /// Locale code rejected before any request was made
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Provider misconfiguration (missing API key, bad client setup)
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Input text is larger than the backend accepts
    #[error("Text exceeds maximum length of {max} characters ({len})")]
    TextTooLong { len: usize, max: usize },
    /// Backend refused the text for any other reason
    #[error("Translation rejected: {0}")]
    Rejected(String),
}

/// Result type for translation calls
pub type TranslationResult<T> = Result<T, TranslationError>;

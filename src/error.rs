//! Error handling

/// Errors produced while processing a media library.
#[derive(Debug)]
pub enum AltpressError {
    /// The WordPress API answered with a non-success status.
    WordPress(String),
    /// An image could not be downloaded for the model.
    ImageDownload(String),
    /// Gemini rejected the request with a non-retryable status.
    Gemini {
        /// HTTP status code returned by the API.
        status: u16,
        /// Response body, when one was readable.
        message: String,
    },
    /// Gemini still reported a rate limit after all retries.
    RateLimited {
        /// Retries performed before giving up.
        retries: u32,
    },
    /// Gemini still reported an overload after all retries.
    Overloaded {
        /// Retries performed before giving up.
        retries: u32,
    },
    /// Transport-level HTTP failure.
    Http(reqwest::Error),
    /// Ledger file I/O failure.
    Io(std::io::Error),
    /// Invalid configuration value.
    Config(String),
}

impl std::fmt::Display for AltpressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WordPress(message) => write!(f, "{message}"),
            Self::ImageDownload(message) => write!(f, "{message}"),
            Self::Gemini { status, message } => {
                write!(f, "Gemini API error {status}: {message}")
            }
            Self::RateLimited { retries } => {
                write!(f, "Rate limit still exceeded after {retries} retries")
            }
            Self::Overloaded { retries } => {
                write!(f, "Service still overloaded after {retries} retries")
            }
            Self::Http(err) => write!(f, "HTTP error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Config(message) => write!(f, "Invalid configuration: {message}"),
        }
    }
}

impl std::error::Error for AltpressError {}

impl From<reqwest::Error> for AltpressError {
    fn from(err: reqwest::Error) -> Self {
        AltpressError::Http(err)
    }
}

impl From<std::io::Error> for AltpressError {
    fn from(err: std::io::Error) -> Self {
        AltpressError::Io(err)
    }
}

impl From<url::ParseError> for AltpressError {
    fn from(err: url::ParseError) -> Self {
        AltpressError::Config(err.to_string())
    }
}

//! Config handling

use std::time::Duration;

use tracing::log::LevelFilter;
use url::Url;

/// Connection settings for one WordPress site.
#[derive(Clone, Debug)]
pub struct WordPressConfig {
    /// Site root, eg `https://example.org`.
    pub base_url: Url,
    /// User the alt text updates are made as.
    pub username: String,
    /// Application password for that user.
    pub app_password: String,
}

/// Connection and retry settings for the Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key sent as the `x-goog-api-key` header.
    pub api_key: String,
    /// Model name, eg `gemini-2.5-flash`.
    pub model: String,
    /// API root; overridable so tests can point at a local server.
    pub api_base: Url,
    /// Base delay of the exponential rate-limit backoff.
    pub retry_base_delay: Duration,
    /// Fixed delay between overload retries.
    pub overload_delay: Duration,
}

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

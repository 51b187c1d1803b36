//! Shared constants for the processing pipeline
//!

use std::time::Duration;

/// Media items requested per WordPress page.
pub const MEDIA_PAGE_SIZE: u32 = 100;

/// Cumulative failed images after which a run is aborted.
pub const STOP_AFTER_FAILURES: u64 = 2;

/// Rate-limit retries after the initial request before giving up.
pub const MAX_RATE_LIMIT_RETRIES: u32 = 5;

/// Overload retries before giving up, so a run cannot hang forever.
pub const MAX_OVERLOAD_RETRIES: u32 = 30;

/// Base delay of the exponential rate-limit backoff.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Fixed delay between overload retries.
pub const OVERLOAD_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Gemini model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Root of the Gemini API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Upper bound the prompt imposes on generated alt text, in characters.
pub const ALT_TEXT_MAX_CHARS: usize = 125;

/// Header row of the audit ledger.
pub const LEDGER_HEADER: &str = "id,url,altText";

/// Default path of the audit ledger file.
pub const DEFAULT_LEDGER_PATH: &str = "image_alt_texts.csv";

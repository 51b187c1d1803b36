//! CLI parser
use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::config::{GeminiConfig, WordPressConfig};
use crate::constants;
use crate::error::AltpressError;

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, short, help = "Simulate the run without calling the model or updating WordPress")]
    /// Log intended actions only; nothing is generated or written back.
    pub dry_run: bool,

    #[clap(long, short, value_name = "N")]
    /// Stop once this many images have been processed.
    pub limit: Option<u64>,

    #[clap(long, help = "Enable debug logging", env = "ALTPRESS_DEBUG")]
    /// Enable debug logging. Env: ALTPRESS_DEBUG
    pub debug: bool,

    #[clap(long, env = "WP_BASE_URL")]
    /// Base URL of the WordPress site, eg `https://example.org`.
    /// Env: WP_BASE_URL
    pub wp_url: String,

    #[clap(long, env = "WP_USER")]
    /// WordPress user the alt text updates are made as.
    /// Env: WP_USER
    pub wp_user: String,

    #[clap(long, env = "WP_APPLICATION_PASSWORD", hide_env_values = true)]
    /// Application password for that user.
    /// Env: WP_APPLICATION_PASSWORD
    pub wp_app_password: String,

    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    /// Gemini API key.
    /// Env: GEMINI_API_KEY
    pub gemini_api_key: String,

    #[clap(long, default_value = constants::DEFAULT_MODEL)]
    /// Gemini model used for generation.
    pub model: String,

    #[clap(long, default_value = constants::DEFAULT_LEDGER_PATH)]
    /// Path of the CSV ledger recording generated alt text.
    pub ledger: PathBuf,
}

impl CliOptions {
    /// WordPress client configuration built from the parsed options.
    pub fn wordpress_config(&self) -> Result<WordPressConfig, AltpressError> {
        let base_url = Url::parse(&self.wp_url)?;
        Ok(WordPressConfig {
            base_url,
            username: self.wp_user.clone(),
            app_password: self.wp_app_password.clone(),
        })
    }

    /// Gemini client configuration built from the parsed options.
    pub fn gemini_config(&self) -> Result<GeminiConfig, AltpressError> {
        let api_base = Url::parse(constants::GEMINI_API_BASE)?;
        Ok(GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.model.clone(),
            api_base,
            retry_base_delay: constants::RETRY_BASE_DELAY,
            overload_delay: constants::OVERLOAD_RETRY_DELAY,
        })
    }
}

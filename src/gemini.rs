//! Gemini client that turns one image into one piece of alt text.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::warn;

use crate::config::GeminiConfig;
use crate::constants::{ALT_TEXT_MAX_CHARS, MAX_OVERLOAD_RETRIES, MAX_RATE_LIMIT_RETRIES};
use crate::error::AltpressError;
use crate::wordpress::MediaImage;

/// Client for single-turn multimodal generation calls.
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Builds a client from the given configuration.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Downloads the image, asks the model for alt text, and returns the
    /// trimmed result. `Ok(None)` means the model answered without text.
    ///
    /// Rate limits (429) are retried with exponential backoff up to
    /// [`MAX_RATE_LIMIT_RETRIES`] times; overloads (503) are retried at a
    /// fixed delay up to [`MAX_OVERLOAD_RETRIES`] times. Any other failure
    /// ends the call immediately.
    pub async fn generate_alt_text(
        &self,
        image: &MediaImage,
    ) -> Result<Option<String>, AltpressError> {
        let image_response = self.client.get(&image.url).send().await?;
        if !image_response.status().is_success() {
            return Err(AltpressError::ImageDownload(format!(
                "Failed to fetch image #{} from WordPress: {}",
                image.id,
                image_response.status()
            )));
        }
        let image_bytes = image_response.bytes().await?;

        let request = GenerateContentRequest::for_image(image, &image_bytes);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.as_str().trim_end_matches('/'),
            self.config.model
        );

        let mut rate_limit_retries = 0;
        let mut overload_retries = 0;

        loop {
            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.config.api_key)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            match status.as_u16() {
                503 if overload_retries < MAX_OVERLOAD_RETRIES => {
                    overload_retries += 1;
                    warn!(
                        "Service overloaded. Retrying again in {:?}...",
                        self.config.overload_delay
                    );
                    sleep(self.config.overload_delay).await;
                }
                503 => {
                    return Err(AltpressError::Overloaded {
                        retries: overload_retries,
                    });
                }
                429 if rate_limit_retries < MAX_RATE_LIMIT_RETRIES => {
                    let delay = backoff_delay(self.config.retry_base_delay, rate_limit_retries);
                    rate_limit_retries += 1;
                    warn!(
                        "Rate limit exceeded. Retrying attempt {} of {}...",
                        rate_limit_retries, MAX_RATE_LIMIT_RETRIES
                    );
                    sleep(delay).await;
                }
                429 => {
                    return Err(AltpressError::RateLimited {
                        retries: rate_limit_retries,
                    });
                }
                code if !status.is_success() => {
                    let message = response.text().await.unwrap_or_default();
                    return Err(AltpressError::Gemini {
                        status: code,
                        message,
                    });
                }
                _ => {
                    let parsed: GenerateContentResponse = response.json().await?;
                    return Ok(parsed.text());
                }
            }
        }
    }
}

/// Delay before rate-limit retry `attempt + 1`: 1s, 2s, 4s, 8s, 16s at the
/// default base delay.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.pow(attempt)
}

/// Instruction sent with every image. One tight paragraph so the model
/// starts with the alt text itself.
fn alt_text_prompt(title: &str) -> String {
    format!(
        "Analyze this image. \
         Write a short, descriptive, SEO-friendly and accessible alt text. \
         Use the image title \"{title}\" when it helps, but ignore it if it is \
         generic or meaningless (e.g. \"IMG_1234\", \"default.jpg\", \"image1.jpg\"). \
         Start directly with the text, without quotes or an introduction. \
         The alt text must be at most {ALT_TEXT_MAX_CHARS} characters long."
    )
}

// Request/response wire types; the Gemini REST API speaks camelCase JSON.

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateContentRequest {
    /// Single-turn request: the instruction text plus the image inline.
    fn for_image(image: &MediaImage, image_bytes: &[u8]) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: alt_text_prompt(&image.title),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: general_purpose::STANDARD.encode(image_bytes),
                        },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, trimmed; `None` when the
    /// model produced no text at all.
    fn text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let content = candidate.content?;
        let mut text = String::new();
        for part in content.parts {
            if let Some(part_text) = part.text {
                text.push_str(&part_text);
            }
        }
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

//! WordPress REST API client for the media library.

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};

use crate::config::WordPressConfig;
use crate::constants::MEDIA_PAGE_SIZE;
use crate::error::AltpressError;

/// One image attachment from the media library.
#[derive(Clone, Debug)]
pub struct MediaImage {
    /// Attachment id assigned by WordPress.
    pub id: u64,
    /// URL of the full-size image file.
    pub url: String,
    /// MIME type reported by WordPress, eg `image/jpeg`.
    pub mime_type: String,
    /// Rendered attachment title; empty when WordPress has none.
    pub title: String,
    /// Current alt text; empty when none has been set.
    pub alt_text: String,
}

impl MediaImage {
    /// Whether the attachment already carries alt text.
    pub fn has_alt_text(&self) -> bool {
        !self.alt_text.is_empty()
    }
}

/// One page of the media library listing.
#[derive(Clone, Debug)]
pub struct MediaPage {
    /// Images on this page, in API order.
    pub images: Vec<MediaImage>,
    /// 1-based page number from the `X-WP-Page` header; defaults to 1 when
    /// the header is missing or unparsable.
    pub page: u32,
    /// Total page count from the `X-WP-TotalPages` header; defaults to 1
    /// when the header is missing or unparsable.
    pub total_pages: u32,
}

/// Wire shape of a media item; the `_fields` query trims responses to this.
#[derive(Debug, Deserialize)]
struct MediaItem {
    id: u64,
    source_url: String,
    mime_type: String,
    #[serde(default)]
    title: RenderedField,
    #[serde(default)]
    alt_text: String,
}

#[derive(Debug, Default, Deserialize)]
struct RenderedField {
    #[serde(default)]
    rendered: String,
}

impl From<MediaItem> for MediaImage {
    fn from(item: MediaItem) -> Self {
        Self {
            id: item.id,
            url: item.source_url,
            mime_type: item.mime_type,
            title: item.title.rendered,
            alt_text: item.alt_text,
        }
    }
}

#[derive(Debug, Serialize)]
struct AltTextUpdate<'a> {
    alt_text: &'a str,
}

/// Client for the WordPress media endpoints.
#[derive(Debug)]
pub struct MediaClient {
    client: reqwest::Client,
    api_base: String,
    auth_header: String,
}

impl MediaClient {
    /// Builds a client; the Basic credential header is computed once here.
    pub fn new(config: &WordPressConfig) -> Self {
        let credentials = general_purpose::STANDARD
            .encode(format!("{}:{}", config.username, config.app_password));
        Self {
            client: reqwest::Client::new(),
            api_base: format!(
                "{}/wp-json/wp/v2",
                config.base_url.as_str().trim_end_matches('/')
            ),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// Fetches one page of image attachments, trimmed to the fields the
    /// pipeline needs. Listing is a public read and carries no credentials.
    pub async fn list_page(&self, page: u32) -> Result<MediaPage, AltpressError> {
        let url = format!(
            "{}/media?page={}&per_page={}&media_type=image&_fields=id,source_url,mime_type,title,alt_text",
            self.api_base, page, MEDIA_PAGE_SIZE
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AltpressError::WordPress(format!(
                "Failed to fetch images from WordPress: {}",
                response.status()
            )));
        }

        let page = header_number(response.headers(), "x-wp-page");
        let total_pages = header_number(response.headers(), "x-wp-totalpages");
        let items: Vec<MediaItem> = response.json().await?;

        Ok(MediaPage {
            images: items.into_iter().map(MediaImage::from).collect(),
            page,
            total_pages,
        })
    }

    /// Sets the alt text of one attachment.
    pub async fn update_alt_text(&self, id: u64, alt_text: &str) -> Result<(), AltpressError> {
        let url = format!("{}/media/{}", self.api_base, id);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .json(&AltTextUpdate { alt_text })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AltpressError::WordPress(format!(
                "Failed to update alt text for image #{}: {}",
                id,
                response.status()
            )));
        }

        Ok(())
    }
}

/// Parses a numeric pagination header, defaulting to 1 when the header is
/// missing or malformed.
fn header_number(headers: &reqwest::header::HeaderMap, name: &str) -> u32 {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(1)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use url::Url;

    fn test_config(base_url: &str) -> WordPressConfig {
        WordPressConfig {
            base_url: Url::parse(base_url).expect("test URL"),
            username: "editor".to_string(),
            app_password: "abcd efgh".to_string(),
        }
    }

    #[test]
    fn media_item_parses_the_wordpress_shape() {
        let json = r#"{
            "id": 42,
            "source_url": "https://example.org/wp-content/uploads/cat.jpg",
            "mime_type": "image/jpeg",
            "title": { "rendered": "A cat" },
            "alt_text": "A sleeping cat"
        }"#;
        let image: MediaImage = serde_json::from_str::<MediaItem>(json)
            .expect("media item")
            .into();
        assert_eq!(image.id, 42);
        assert_eq!(image.url, "https://example.org/wp-content/uploads/cat.jpg");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.title, "A cat");
        assert_eq!(image.alt_text, "A sleeping cat");
        assert!(image.has_alt_text());
    }

    #[test]
    fn media_item_defaults_missing_title_and_alt_text() {
        let json = r#"{
            "id": 7,
            "source_url": "https://example.org/a.png",
            "mime_type": "image/png"
        }"#;
        let image: MediaImage = serde_json::from_str::<MediaItem>(json)
            .expect("media item")
            .into();
        assert_eq!(image.title, "");
        assert_eq!(image.alt_text, "");
        assert!(!image.has_alt_text());
    }

    #[test]
    fn update_body_serialises_only_the_alt_text_field() {
        let body = serde_json::to_value(AltTextUpdate {
            alt_text: "A red bicycle",
        })
        .expect("serialise");
        assert_eq!(body, serde_json::json!({ "alt_text": "A red bicycle" }));
    }

    #[test]
    fn auth_header_is_the_basic_credential() {
        let client = MediaClient::new(&test_config("https://example.org"));
        // base64("editor:abcd efgh")
        assert_eq!(client.auth_header, "Basic ZWRpdG9yOmFiY2QgZWZnaA==");
    }

    #[test]
    fn api_base_handles_trailing_slashes_and_subpaths() {
        let client = MediaClient::new(&test_config("https://example.org"));
        assert_eq!(client.api_base, "https://example.org/wp-json/wp/v2");

        let client = MediaClient::new(&test_config("https://example.org/blog/"));
        assert_eq!(client.api_base, "https://example.org/blog/wp-json/wp/v2");
    }

    #[test]
    fn pagination_headers_default_to_one() {
        let mut headers = reqwest::header::HeaderMap::new();
        assert_eq!(header_number(&headers, "x-wp-totalpages"), 1);

        headers.insert("x-wp-totalpages", "17".parse().expect("header value"));
        assert_eq!(header_number(&headers, "x-wp-totalpages"), 17);

        headers.insert("x-wp-page", "not-a-number".parse().expect("header value"));
        assert_eq!(header_number(&headers, "x-wp-page"), 1);
    }
}

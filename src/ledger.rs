//! Local audit ledger of generated alt text.
//!
//! One CSV row per image ever processed, with a spreadsheet hyperlink so the
//! file can be reviewed directly in a sheet. Append-only; an id is never
//! written twice. The read-modify-append is unsynchronised, which is fine for
//! the single sequential writer this pipeline has.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::constants::LEDGER_HEADER;
use crate::error::AltpressError;
use crate::wordpress::MediaImage;

/// Appends processed images to a local CSV file for human review.
#[derive(Clone, Debug)]
pub struct AltTextLedger {
    path: PathBuf,
}

impl AltTextLedger {
    /// A ledger backed by the given file; created on first write.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Records one image. The text defaults to the image's existing alt text
    /// when none is supplied. Ids already present in the file are left
    /// untouched.
    pub fn record(&self, image: &MediaImage, alt_text: Option<&str>) -> Result<(), AltpressError> {
        if !self.path.exists() {
            fs::write(&self.path, format!("{LEDGER_HEADER}\n"))?;
        }

        let id = image.id.to_string();
        let data = fs::read_to_string(&self.path)?;
        if data
            .lines()
            .any(|line| line.split(',').next() == Some(id.as_str()))
        {
            return Ok(());
        }

        let alt_text = alt_text.unwrap_or(image.alt_text.as_str());
        let mut file = fs::OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(ledger_row(image, alt_text).as_bytes())?;
        Ok(())
    }
}

/// One CSV row: the id, a spreadsheet hyperlink embedding URL and title, and
/// the alt text with embedded double quotes doubled.
fn ledger_row(image: &MediaImage, alt_text: &str) -> String {
    format!(
        "{},\"=HYPERLINK(\"\"{}\"\";\"\"{}\"\")\",\"{}\"\n",
        image.id,
        image.url,
        image.title,
        alt_text.replace('"', "\"\"")
    )
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn image(id: u64, alt_text: &str) -> MediaImage {
        MediaImage {
            id,
            url: format!("https://example.org/uploads/{id}.jpg"),
            mime_type: "image/jpeg".to_string(),
            title: format!("Image {id}"),
            alt_text: alt_text.to_string(),
        }
    }

    fn ledger_in(dir: &tempfile::TempDir) -> AltTextLedger {
        AltTextLedger::new(dir.path().join("alt_texts.csv"))
    }

    #[test]
    fn first_record_creates_the_file_with_a_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = ledger_in(&dir);

        ledger
            .record(&image(3, ""), Some("A lighthouse at dusk"))
            .expect("record");

        let data = fs::read_to_string(dir.path().join("alt_texts.csv")).expect("read");
        assert_eq!(
            data,
            "id,url,altText\n\
             3,\"=HYPERLINK(\"\"https://example.org/uploads/3.jpg\"\";\"\"Image 3\"\")\",\"A lighthouse at dusk\"\n"
        );
    }

    #[test]
    fn an_id_is_never_written_twice() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = ledger_in(&dir);

        ledger.record(&image(5, ""), Some("First text")).expect("record");
        ledger.record(&image(5, ""), Some("Second text")).expect("record");
        ledger.record(&image(6, ""), Some("Other image")).expect("record");

        let data = fs::read_to_string(dir.path().join("alt_texts.csv")).expect("read");
        assert_eq!(data.lines().count(), 3);
        assert!(data.contains("First text"));
        assert!(!data.contains("Second text"));
    }

    #[test]
    fn text_defaults_to_the_existing_alt_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = ledger_in(&dir);

        ledger
            .record(&image(8, "Already described"), None)
            .expect("record");

        let data = fs::read_to_string(dir.path().join("alt_texts.csv")).expect("read");
        assert!(data.contains("\"Already described\""));
    }

    #[test]
    fn double_quotes_in_the_text_are_doubled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = ledger_in(&dir);

        ledger
            .record(&image(2, ""), Some("A sign reading \"open\""))
            .expect("record");

        let data = fs::read_to_string(dir.path().join("alt_texts.csv")).expect("read");
        assert!(data.contains("\"A sign reading \"\"open\"\"\""));
    }
}

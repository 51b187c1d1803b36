//! The processing pipeline: paginate, filter, generate, persist, log.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::constants::STOP_AFTER_FAILURES;
use crate::error::AltpressError;
use crate::gemini::GeminiClient;
use crate::ledger::AltTextLedger;
use crate::wordpress::{MediaClient, MediaImage};

/// Switches controlling one run.
#[derive(Clone, Debug)]
pub struct ProcessOptions {
    /// Log intended actions without calling the model or updating WordPress.
    pub dry_run: bool,
    /// Stop once this many images have been processed.
    pub limit: Option<u64>,
    /// Abort the run once this many images have failed.
    pub stop_after_failures: u64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            limit: None,
            stop_after_failures: STOP_AFTER_FAILURES,
        }
    }
}

/// Counters accumulated over one run.
#[derive(Debug)]
pub struct RunStats {
    /// Images seen across all fetched pages.
    pub total: u64,
    /// Images skipped because they already had alt text.
    pub skipped: u64,
    /// Images whose alt text was generated, or would have been in a dry run.
    pub processed: u64,
    /// Images that errored during generation or update.
    pub failed: u64,
    /// Images for which the model returned no text.
    pub empty: u64,
    started: Instant,
}

impl RunStats {
    fn new() -> Self {
        Self {
            total: 0,
            skipped: 0,
            processed: 0,
            failed: 0,
            empty: 0,
            started: Instant::now(),
        }
    }

    /// Logs the final human-readable summary.
    pub fn log_summary(&self) {
        info!("Processing statistics:");
        info!("  Total images: {}", self.total);
        info!("  Skipped images (with alt text): {}", self.skipped);
        info!("  Processed images (alt text generated): {}", self.processed);
        info!("  Failed images (errors during processing): {}", self.failed);
        info!("  Empty results (model returned no text): {}", self.empty);
        info!(
            "  Total time taken: {}",
            format_elapsed(self.started.elapsed())
        );
    }
}

/// Walks the media library and generates alt text for every image that lacks
/// one. Returns the run's counters; a failed page listing aborts the run and
/// propagates.
pub async fn process_media(
    media: &MediaClient,
    generator: &GeminiClient,
    ledger: &AltTextLedger,
    options: &ProcessOptions,
) -> Result<RunStats, AltpressError> {
    let mut stats = RunStats::new();
    let mut page = 1;
    let mut total_pages = 1;

    info!("Start processing WordPress media library...");

    'pages: while page <= total_pages && !limit_reached(&stats, options) {
        let response = media.list_page(page).await?;
        total_pages = response.total_pages;
        stats.total += response.images.len() as u64;

        info!(
            "Processing page {} of {}. {} images found.",
            page,
            total_pages,
            response.images.len()
        );

        for image in &response.images {
            if limit_reached(&stats, options) {
                break;
            }

            if image.has_alt_text() {
                debug!("Image #{} already has alt text, skipping", image.id);
                stats.skipped += 1;
                record_best_effort(ledger, image, None);
                continue;
            }

            if options.dry_run {
                info!(
                    "DRY RUN: Would generate alt text for image #{} ({})",
                    image.id, image.url
                );
                stats.processed += 1;
                continue;
            }

            match generate_and_update(media, generator, ledger, image).await {
                Ok(Some(alt_text)) => {
                    stats.processed += 1;
                    info!("Alt text for #{} set: {:?}", image.id, alt_text);
                }
                Ok(None) => {
                    stats.empty += 1;
                    warn!("Model returned no text for image #{}", image.id);
                }
                Err(err) => {
                    stats.failed += 1;
                    error!("Could not process image #{}: {}", image.id, err);

                    if stats.failed >= options.stop_after_failures {
                        error!(
                            "Exceeded maximum error limit of {}. Stopping processing.",
                            options.stop_after_failures
                        );
                        break 'pages;
                    }
                }
            }
        }

        page += 1;
    }

    info!("Processing completed.");
    Ok(stats)
}

/// Generates alt text for one image and writes it back. `Ok(None)` is the
/// empty-result case: the model answered but produced no text.
async fn generate_and_update(
    media: &MediaClient,
    generator: &GeminiClient,
    ledger: &AltTextLedger,
    image: &MediaImage,
) -> Result<Option<String>, AltpressError> {
    let Some(alt_text) = generator.generate_alt_text(image).await? else {
        return Ok(None);
    };

    media.update_alt_text(image.id, &alt_text).await?;
    record_best_effort(ledger, image, Some(&alt_text));
    Ok(Some(alt_text))
}

/// Writes a ledger row, downgrading failures to a warning so audit problems
/// never abort image processing.
fn record_best_effort(ledger: &AltTextLedger, image: &MediaImage, alt_text: Option<&str>) {
    if let Err(err) = ledger.record(image, alt_text) {
        warn!("Could not record image #{} in the ledger: {}", image.id, err);
    }
}

fn limit_reached(stats: &RunStats, options: &ProcessOptions) -> bool {
    options.limit.is_some_and(|limit| stats.processed >= limit)
}

/// Renders a wall-clock duration the way a human reads it, eg
/// `2 minutes 5 seconds`.
fn format_elapsed(elapsed: Duration) -> String {
    let total_seconds = elapsed.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{} hour{}", hours, plural(hours)));
    }
    if minutes > 0 {
        parts.push(format!("{} minute{}", minutes, plural(minutes)));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{} second{}", seconds, plural(seconds)));
    }
    parts.join(" ")
}

fn plural(count: u64) -> &'static str {
    if count == 1 { "" } else { "s" }
}

use altpress::cli::CliOptions;
use altpress::config::setup_logging;
use altpress::gemini::GeminiClient;
use altpress::ledger::AltTextLedger;
use altpress::process::{ProcessOptions, process_media};
use altpress::wordpress::MediaClient;
use anyhow::{Context, Result};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliOptions::parse();

    let _ = setup_logging(cli.debug);

    let wordpress_config = cli
        .wordpress_config()
        .context("Invalid WordPress configuration")?;
    let gemini_config = cli.gemini_config().context("Invalid Gemini configuration")?;

    let media = MediaClient::new(&wordpress_config);
    let generator = GeminiClient::new(gemini_config);
    let ledger = AltTextLedger::new(cli.ledger.clone());

    let options = ProcessOptions {
        dry_run: cli.dry_run,
        limit: cli.limit,
        ..ProcessOptions::default()
    };

    let stats = process_media(&media, &generator, &ledger, &options)
        .await
        .context("Processing aborted")?;
    stats.log_summary();

    Ok(())
}

//! # News Digest
//!
//! Command-line entry point: searches each keyword, picks the first article
//! whose page can be fetched and extracted, summarizes it, and prints the
//! digest as Markdown on stdout.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... news_digest rust "climate change" -j ./json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` for per-candidate details.

use clap::Parser;
use news_digest::cli::Cli;
use news_digest::digest::DigestPipeline;
use news_digest::outputs::{DigestView, DigestViewModel, json, markdown};
use news_digest::summarizer::summarizer_from_config;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    let args = Cli::parse();
    debug!(keywords = ?args.keywords, config = ?args.config, "Parsed CLI arguments");

    // Fail fast on configuration problems, before any network call
    let config = args.digest_config()?;
    let summarizer = summarizer_from_config(&config.summarizer)?;
    let pipeline = DigestPipeline::from_config(&config, summarizer).inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;
    info!(
        workers = config.workers,
        page_size = config.page_size,
        max_pages = config.max_pages,
        summarizer = %config.summarizer.endpoint,
        "Pipeline configured"
    );

    let request = args.digest_request();
    let mut view_model = DigestViewModel::new(request.keywords.clone());
    pipeline.execute(&request, &mut view_model).await;

    let exit = match view_model.into_view() {
        Some(DigestView::Success(digest)) => {
            println!("{}", markdown::digest_to_markdown(&digest));

            if let Some(dir) = &args.json_output_dir {
                if let Err(e) = json::write_digest(&digest, dir).await {
                    error!(path = %dir, error = %e, "Failed to write digest JSON");
                }
            }
            if digest.articles.len() < digest.keywords.len() {
                warn!(
                    found = digest.articles.len(),
                    keywords = digest.keywords.len(),
                    "Some keywords produced no article"
                );
            }
            ExitCode::SUCCESS
        }
        Some(DigestView::Failure(message)) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
        None => ExitCode::FAILURE,
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(exit)
}

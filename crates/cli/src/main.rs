//! crawlback entry point.
//!
//! Recovers the archived copy of a page closest to a given month and prints
//! it to stdout. Logging goes to stderr so the page can be piped elsewhere.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crawlback_client::{Direction, Resolution, ResolveRequest, ResolvedPage, Resolver, validate_target};
use crawlback_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "crawlback")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch the archived copy of a page from the Common Crawl")]
#[command(
    long_about = "Fetch the archived copy of a page from the Common Crawl.\nSearches crawl by crawl from the target month until a capture is found.\nYEAR and MONTH use the formats YYYY and MM."
)]
pub struct Cli {
    /// Page URL, as it was crawled
    pub url: String,

    /// Target year (YYYY)
    #[arg(requires = "month")]
    pub year: Option<String>,

    /// Target month (MM)
    pub month: Option<String>,

    /// Shift the starting crawl by N positions (positive = older)
    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<i32>,

    /// Search toward newer crawls instead of older ones
    #[arg(long)]
    pub forward: bool,

    /// Retries of one crawl on transient server errors
    #[arg(long)]
    pub max_retry: Option<u32>,

    /// Seconds to wait before each retry
    #[arg(long)]
    pub retry_wait: Option<u64>,

    /// JSON file of `"url|YYYY-MM": "YYYY-MM"` month corrections
    #[arg(long)]
    pub match_file: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Layer command-line flags over loaded configuration.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(offset) = self.offset {
            config.month_offset = offset;
        }
        if self.forward {
            config.backward = false;
        }
        if let Some(max_retry) = self.max_retry {
            config.max_retry = max_retry;
        }
        if let Some(wait) = self.retry_wait {
            config.retry_wait_secs = wait;
        }
        if let Some(path) = &self.match_file {
            config.match_file = Some(path.clone());
        }
        config
    }
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Page content followed by the capture time marker.
fn render(page: &ResolvedPage) -> String {
    format!(
        "{}\n<!-- Retrieved on: {} -->\n",
        page.content,
        page.captured_at.format("%Y-%m-%d %H:%M:%S")
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = cli.apply(AppConfig::load()?);
    config.validate()?;

    let url = validate_target(&cli.url)?;
    let resolver = Resolver::from_config(&config)?;
    let matches = config.match_table()?;

    let request = ResolveRequest::new(url)
        .year_month(cli.year.as_deref(), cli.month.as_deref())
        .direction(Direction::from_backward(config.backward))
        .matches(matches.as_ref());

    tracing::debug!(url, target = ?request.target, direction = ?request.direction, "resolving");

    let resolution = match cli.deadline_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), resolver.resolve(&request))
            .await
            .unwrap_or_else(|_| {
                tracing::warn!("deadline of {}s reached for {}", secs, url);
                Resolution::NotFound
            }),
        None => resolver.resolve(&request).await,
    };

    match resolution.into_page() {
        Some(page) => print!("{}", render(&page)),
        None => tracing::info!(url, "no archived copy found"),
    }

    Ok(())
}

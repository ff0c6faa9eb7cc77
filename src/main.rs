//! # News Crawler CLI
//!
//! Thin command-line host over [`news_crawler::NewsDesk`]: parses arguments,
//! loads configuration, runs one operation and prints the result as JSON or
//! Markdown.
//!
//! ## Usage
//!
//! ```sh
//! news_crawler search "central bank" --source all --limit 5
//! news_crawler --format markdown fetch https://www.foxnews.com/politics/...
//! news_crawler batch https://www.reuters.com/a/ https://www.foxnews.com/b
//! news_crawler keywords "some text to rank" --count 3
//! news_crawler analyze https://www.reuters.com/world/...
//! news_crawler sources
//! ```
//!
//! Logs go to stderr (filter with `RUST_LOG`), so stdout stays parseable.

use clap::Parser;
use news_crawler::fetcher::Fetch;
use news_crawler::outputs::{json, markdown, write_output};
use news_crawler::{Config, NewsDesk};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;

use cli::{Cli, Command, OutputFormat};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("news_crawler starting up");

    let args = Cli::parse();
    debug!(?args.command, ?args.config, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref()).await?;
    args.apply_overrides(&mut config);
    config.validate()?;
    info!(
        delay_secs = config.request_delay_secs,
        fox_max_pages = config.fox_max_pages,
        reuters_max_pages = config.reuters_max_pages,
        "Configuration ready"
    );

    let desk = NewsDesk::from_config(&config);
    let rendered = run(&desk, &args).await?;
    write_output(&rendered, args.output.as_deref()).await?;

    let usage = desk.usage();
    info!(
        searches = usage.search_count,
        fetches = usage.fetch_count,
        analyses = usage.analysis_count,
        total = usage.total_requests,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "news_crawler finished"
    );
    Ok(())
}

/// Run the selected subcommand and render its result.
async fn run<F: Fetch>(desk: &NewsDesk<F>, args: &Cli) -> Result<String, Box<dyn Error>> {
    let format = args.format;
    let rendered = match &args.command {
        Command::Search { query, source, limit } => {
            let limit = limit.unwrap_or_else(|| desk.default_limit());
            let results = desk.search(query, *source, limit).await;
            if results.is_empty() {
                warn!(%query, "No results found");
            }
            match format {
                OutputFormat::Json => json::render(&results)?,
                OutputFormat::Markdown => markdown::summaries_to_markdown(&results),
            }
        }
        Command::Fetch { url } => {
            let article = desk.fetch_article(url).await?;
            match format {
                OutputFormat::Json => json::render(&article)?,
                OutputFormat::Markdown => markdown::article_to_markdown(&article),
            }
        }
        Command::Batch { urls } => {
            let progress = |done: usize, total: usize| info!(done, total, "Batch progress");
            let articles = desk.batch_fetch(urls, &progress).await;
            match format {
                OutputFormat::Json => json::render(&articles)?,
                OutputFormat::Markdown => markdown::articles_to_markdown(&articles),
            }
        }
        Command::Keywords { text, count } => {
            let keywords = desk.extract_keywords(text, *count);
            match format {
                OutputFormat::Json => json::render(&keywords)?,
                OutputFormat::Markdown => markdown::keywords_to_markdown(&keywords),
            }
        }
        Command::Analyze { url } => {
            let article = desk.fetch_article(url).await?;
            let report = desk.analyze(&article)?;
            match format {
                OutputFormat::Json => json::render(&report)?,
                OutputFormat::Markdown => markdown::report_to_markdown(&report),
            }
        }
        Command::Sources => {
            let sources = desk.sources();
            match format {
                OutputFormat::Json => json::render(&sources)?,
                OutputFormat::Markdown => markdown::sources_to_markdown(&sources),
            }
        }
    };
    Ok(rendered)
}

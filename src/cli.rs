//! Command-line interface definitions for the news crawler.
//!
//! Global options can be provided via flags or environment variables and
//! apply to every subcommand.

use clap::{Parser, Subcommand, ValueEnum};
use news_crawler::{Config, SourceSelector};
use std::path::PathBuf;

/// Command-line arguments for the news crawler.
///
/// # Examples
///
/// ```sh
/// # Newest five hits across both sources
/// news_crawler search "interest rates"
///
/// # Reuters only, as Markdown
/// news_crawler --format markdown search "interest rates" --source reuters --limit 10
///
/// # Analyze an article with a custom config, writing to a file
/// news_crawler -c config.yaml -o report.json analyze https://www.reuters.com/world/...
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "NEWS_CRAWLER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Base delay in seconds before each request (overrides the config file)
    #[arg(long, env = "NEWS_CRAWLER_DELAY", global = true)]
    pub delay: Option<f64>,

    /// Maximum Fox News search pages (overrides the config file)
    #[arg(long, global = true)]
    pub fox_max_pages: Option<usize>,

    /// Maximum Reuters search pages (overrides the config file)
    #[arg(long, global = true)]
    pub reuters_max_pages: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Search one or both sources, newest results first
    Search {
        query: String,
        /// fox, reuters or all
        #[arg(short, long, default_value = "all")]
        source: SourceSelector,
        /// Maximum number of results (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Fetch and extract one article
    Fetch { url: String },
    /// Fetch several articles, skipping failures
    Batch {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Rank the most frequent words of a text
    Keywords {
        text: String,
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
    /// Fetch an article and report statistics and keywords
    Analyze { url: String },
    /// List the supported sources
    Sources,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl Cli {
    /// Apply flag overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(delay) = self.delay {
            config.request_delay_secs = delay;
        }
        if let Some(pages) = self.fox_max_pages {
            config.fox_max_pages = pages;
        }
        if let Some(pages) = self.reuters_max_pages {
            config.reuters_max_pages = pages;
        }
    }
}

//! # News Crawler
//!
//! Search and extract news articles from Fox News and Reuters, and run simple
//! text analytics over what was extracted.
//!
//! ## Features
//!
//! - Rate-limited HTTP fetching with a jittered delay and rotating user agents
//! - Per-source search adapters that follow each site's pagination protocol
//! - Structured article extraction into ordered content blocks with inline links
//! - Cross-source search merging, newest first
//! - Keyword ranking and sentence/word statistics
//!
//! ## Architecture
//!
//! 1. **Fetching** ([`fetcher`]): one GET per call, `None` on any failure
//! 2. **Sources** ([`sources`]): Fox News (JSON API + HTML) and Reuters (JSON API + HTML)
//! 3. **Search** ([`search`]): merge and order per-source results
//! 4. **Analysis** ([`analysis`]): keywords and readability statistics
//! 5. **Facade** ([`desk`]): the operations a host calls, with usage and progress hooks
//!
//! ```no_run
//! # async fn run() -> news_crawler::Result<()> {
//! use news_crawler::{Config, NewsDesk, SourceSelector};
//!
//! let config = Config::load(None).await?;
//! let desk = NewsDesk::from_config(&config);
//! for hit in desk.search("economy", SourceSelector::All, 5).await {
//!     println!("{} {}", hit.date, hit.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod desk;
pub mod error;
pub mod fetcher;
pub mod hooks;
pub mod models;
pub mod outputs;
pub mod search;
pub mod sources;
pub mod utils;

pub use config::Config;
pub use desk::NewsDesk;
pub use error::{NewsError, Result};
pub use hooks::{ProgressObserver, UsageHook, UsageSnapshot, UsageStats};
pub use models::{AnalysisReport, Article, ArticleSummary, ContentBlock, RichText};
pub use sources::{SourceKind, SourceSelector};

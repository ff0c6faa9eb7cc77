//! News source adapters.
//!
//! Each adapter implements the uniform [`NewsSource`] contract over one site:
//!
//! 1. **Search**: walk the site's pagination protocol and return [`ArticleSummary`] hits
//! 2. **Extract**: fetch one article page and parse it into an [`Article`]
//!
//! # Supported Sources
//!
//! | Source | Module | Search transport | Pagination |
//! |--------|--------|------------------|------------|
//! | Fox News | [`foxnews`] | JSON search API | Server-driven `links.next` |
//! | Reuters | [`reuters`] | JSON search API | Client-driven `offset = page * size` |
//!
//! Article pages of both sites are server-rendered HTML and are parsed with
//! `scraper` using selectors hard-wired per source.
//!
//! # Failure Behavior
//!
//! Adapters never return errors. A search that fails part-way returns what it
//! collected so far; an extraction that cannot produce a trustworthy article
//! returns `None`.

use crate::fetcher::Fetch;
use crate::models::{Article, ArticleSummary};
use crate::utils::host_matches;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod foxnews;
pub mod reuters;

pub use foxnews::FoxNews;
pub use reuters::Reuters;

/// Uniform search/extract contract implemented by every source adapter.
// Adapter futures are awaited on the caller's task and need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait NewsSource {
    /// Which source this adapter serves.
    fn kind(&self) -> SourceKind;

    /// Search the source for `query`, following its pagination.
    ///
    /// # Returns
    ///
    /// Every summary collected before a terminal condition was reached;
    /// possibly empty, never an error.
    async fn search(&self, query: &str) -> Vec<ArticleSummary>;

    /// Fetch and parse the article at `url`.
    ///
    /// # Returns
    ///
    /// The structured article, or `None` when the page could not be fetched or
    /// parsed.
    async fn extract(&self, url: &str) -> Option<Article>;

    /// Returns true if this adapter can extract the given URL.
    fn can_handle(&self, url: &str) -> bool {
        self.kind().matches_url(url)
    }
}

/// Registry key of a known source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Fox,
    Reuters,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::Fox, SourceKind::Reuters];

    /// Short key used on the command line and in the catalog.
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::Fox => "fox",
            SourceKind::Reuters => "reuters",
        }
    }

    /// Display name stamped on summaries and metadata.
    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Fox => "Fox News",
            SourceKind::Reuters => "Reuters",
        }
    }

    /// Registrable domain that article URLs of this source live under.
    pub fn domain(self) -> &'static str {
        match self {
            SourceKind::Fox => "foxnews.com",
            SourceKind::Reuters => "reuters.com",
        }
    }

    pub fn matches_url(self, url: &str) -> bool {
        host_matches(url, self.domain())
    }

    /// Dispatch an article URL to the source that owns its domain.
    pub fn from_url(url: &str) -> Option<SourceKind> {
        Self::ALL.into_iter().find(|kind| kind.matches_url(url))
    }

    pub fn info(self) -> SourceInfo {
        match self {
            SourceKind::Fox => SourceInfo {
                key: self.key(),
                name: self.name(),
                url: "https://www.foxnews.com",
                description: "US 24-hour news channel",
                topics: &["politics", "economy", "society", "world", "health", "technology", "sports"],
            },
            SourceKind::Reuters => SourceInfo {
                key: self.key(),
                name: self.name(),
                url: "https://www.reuters.com",
                description: "Global news and media organization",
                topics: &["politics", "economy", "business", "world", "technology", "science"],
            },
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalog entry describing a supported source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub topics: &'static [&'static str],
}

/// Which adapters a search fans out to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSelector {
    Fox,
    Reuters,
    #[default]
    All,
}

impl SourceSelector {
    pub fn includes(self, kind: SourceKind) -> bool {
        match self {
            SourceSelector::All => true,
            SourceSelector::Fox => kind == SourceKind::Fox,
            SourceSelector::Reuters => kind == SourceKind::Reuters,
        }
    }
}

impl FromStr for SourceSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fox" => Ok(SourceSelector::Fox),
            "reuters" => Ok(SourceSelector::Reuters),
            "all" | "both" => Ok(SourceSelector::All),
            other => Err(format!("unknown source '{other}' (expected fox, reuters or all)")),
        }
    }
}

/// Tagged union over the concrete adapters, dispatching the [`NewsSource`] contract.
#[derive(Debug)]
pub enum SourceAdapter<F> {
    Fox(FoxNews<F>),
    Reuters(Reuters<F>),
}

impl<F: Fetch> NewsSource for SourceAdapter<F> {
    fn kind(&self) -> SourceKind {
        match self {
            SourceAdapter::Fox(s) => s.kind(),
            SourceAdapter::Reuters(s) => s.kind(),
        }
    }

    async fn search(&self, query: &str) -> Vec<ArticleSummary> {
        match self {
            SourceAdapter::Fox(s) => s.search(query).await,
            SourceAdapter::Reuters(s) => s.search(query).await,
        }
    }

    async fn extract(&self, url: &str) -> Option<Article> {
        match self {
            SourceAdapter::Fox(s) => s.extract(url).await,
            SourceAdapter::Reuters(s) => s.extract(url).await,
        }
    }
}

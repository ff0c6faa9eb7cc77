//! The crawler's public facade.
//!
//! [`NewsDesk`] owns one adapter per source plus the analyzer and exposes the
//! operations a host (the CLI, or a tool server) calls:
//!
//! | Operation | Result |
//! |-----------|--------|
//! | [`search`](NewsDesk::search) | merged, newest-first summaries from the selected sources |
//! | [`fetch_article`](NewsDesk::fetch_article) | one structured article, or an error value |
//! | [`batch_fetch`](NewsDesk::batch_fetch) | the articles that could be fetched, in input order |
//! | [`extract_keywords`](NewsDesk::extract_keywords) | ranked keywords of free text |
//! | [`analyze`](NewsDesk::analyze) | statistics and keywords of an article |
//!
//! # Concurrency
//!
//! A search fans out to the selected sources concurrently and waits for all of
//! them. Within one source, pages are fetched strictly one after another.
//! Batch fetches are sequential so the aggregate request rate stays bounded by
//! the fetcher's jittered delay.

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::error::{NewsError, Result};
use crate::fetcher::{Fetch, RateLimitedFetcher};
use crate::hooks::{Invocation, NoopHook, ProgressObserver, UsageHook, UsageSnapshot, UsageStats};
use crate::models::{AnalysisReport, Article, ArticleSummary, KeywordStat};
use crate::search::merge_results;
use crate::sources::{FoxNews, NewsSource, Reuters, SourceAdapter, SourceInfo, SourceKind, SourceSelector};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Search, fetch and analysis over every supported source.
pub struct NewsDesk<F> {
    adapters: Vec<SourceAdapter<F>>,
    analyzer: Analyzer,
    default_limit: usize,
    stats: UsageStats,
    hook: Arc<dyn UsageHook>,
}

impl NewsDesk<RateLimitedFetcher> {
    /// Build a desk whose adapters each own a [`RateLimitedFetcher`].
    pub fn from_config(config: &Config) -> Self {
        NewsDesk::new(
            FoxNews::new(RateLimitedFetcher::new(config), config.fox_max_pages),
            Reuters::new(RateLimitedFetcher::new(config), config.reuters_max_pages),
            config,
        )
    }
}

impl<F: Fetch> NewsDesk<F> {
    pub fn new(fox: FoxNews<F>, reuters: Reuters<F>, config: &Config) -> Self {
        Self {
            adapters: vec![SourceAdapter::Fox(fox), SourceAdapter::Reuters(reuters)],
            analyzer: Analyzer::new(config),
            default_limit: config.default_limit,
            stats: UsageStats::new(),
            hook: Arc::new(NoopHook),
        }
    }

    /// Attach a hook told about every completed top-level call, in addition
    /// to the desk's own counters.
    pub fn with_usage_hook(mut self, hook: Arc<dyn UsageHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Hooks are fire-and-forget: a panicking hook is logged and does not
    /// reach the caller.
    fn record(&self, invocation: Invocation) {
        self.stats.record(invocation);
        if panic::catch_unwind(AssertUnwindSafe(|| self.hook.record(invocation))).is_err() {
            warn!(?invocation, "Usage hook panicked");
        }
    }

    /// Call counts and uptime since the desk was built.
    pub fn usage(&self) -> UsageSnapshot {
        self.stats.snapshot()
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Catalog of the supported sources.
    pub fn sources(&self) -> Vec<SourceInfo> {
        self.adapters.iter().map(|a| a.kind().info()).collect()
    }

    /// Search the selected sources concurrently.
    ///
    /// # Returns
    ///
    /// At most `limit` summaries, newest first. No hits is an empty `Vec`.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&self, query: &str, selector: SourceSelector, limit: usize) -> Vec<ArticleSummary> {
        let searches = self
            .adapters
            .iter()
            .filter(|adapter| selector.includes(adapter.kind()))
            .map(|adapter| adapter.search(query));
        let batches = join_all(searches).await;
        debug!(sources = batches.len(), hits = batches.iter().map(Vec::len).sum::<usize>(), "All sources answered");

        let results = merge_results(batches, limit);
        info!(count = results.len(), "Search complete");
        self.record(Invocation::Search);
        results
    }

    async fn extract(&self, url: &str) -> Result<Article> {
        let Some(adapter) = self.adapters.iter().find(|adapter| adapter.can_handle(url)) else {
            return Err(NewsError::UnsupportedSource(url.to_string()));
        };
        adapter
            .extract(url)
            .await
            .ok_or_else(|| NewsError::FetchFailed(url.to_string()))
    }

    /// Fetch one article, dispatching on the URL's domain.
    ///
    /// # Errors
    ///
    /// - [`NewsError::UnsupportedSource`] when no adapter owns the domain
    /// - [`NewsError::FetchFailed`] when the page could not be fetched or parsed
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_article(&self, url: &str) -> Result<Article> {
        let result = self.extract(url).await;
        match &result {
            Ok(article) => info!(headline = %article.metadata.headline, "Fetched article"),
            Err(e) => warn!(error = %e, "Article fetch failed"),
        }
        self.record(Invocation::Fetch);
        result
    }

    /// Fetch many articles one after another.
    ///
    /// Failed URLs are logged and left out; successes keep their relative
    /// order. `progress` is told `(completed, total)` after each URL.
    #[instrument(level = "info", skip_all, fields(total = urls.len()))]
    pub async fn batch_fetch<P>(&self, urls: &[String], progress: &P) -> Vec<Article>
    where
        P: ProgressObserver,
    {
        let total = urls.len();
        let articles: Vec<Article> = stream::iter(urls.iter().enumerate())
            .then(|(i, url)| async move {
                let result = self.extract(url).await;
                if panic::catch_unwind(AssertUnwindSafe(|| progress.on_progress(i + 1, total))).is_err() {
                    warn!(completed = i + 1, total, "Progress observer panicked");
                }
                match result {
                    Ok(article) => {
                        debug!(%url, "Fetched article");
                        Some(article)
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "Skipping article");
                        None
                    }
                }
            })
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(fetched = articles.len(), failed = total - articles.len(), "Batch fetch complete");
        self.record(Invocation::Fetch);
        articles
    }

    /// Rank the most frequent words of `text`.
    pub fn extract_keywords(&self, text: &str, count: usize) -> Vec<KeywordStat> {
        self.analyzer.extract_keywords(text, count)
    }

    /// Statistics and keywords for an article.
    ///
    /// # Errors
    ///
    /// [`NewsError::InvalidArticle`] when the article has no content.
    pub fn analyze(&self, article: &Article) -> Result<AnalysisReport> {
        let report = self.analyzer.analyze(article);
        self.record(Invocation::Analysis);
        report
    }

    /// Which source would handle `url`, if any.
    pub fn source_for(&self, url: &str) -> Option<SourceKind> {
        self.adapters
            .iter()
            .find(|adapter| adapter.can_handle(url))
            .map(|adapter| adapter.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::ScriptedFetcher;
    use crate::hooks::NoProgress;
    use crate::sources::{foxnews, reuters};
    use serde_json::json;
    use std::cell::RefCell;

    const FOX_URL: &str = "https://www.foxnews.com/politics/story";
    const REUTERS_URL: &str = "https://www.reuters.com/world/story/";

    fn desk(fox: ScriptedFetcher, reuters: ScriptedFetcher) -> NewsDesk<ScriptedFetcher> {
        let config = Config::default();
        NewsDesk::new(FoxNews::new(fox, 3), Reuters::new(reuters, 3), &config)
    }

    fn fox_page() -> serde_json::Value {
        json!({
            "data": [
                { "type": "article", "attributes": { "title": "fox-new", "section": "politics", "publication_date": "2024-03-05T08:00:00Z" } },
                { "type": "article", "attributes": { "title": "fox-old", "section": "politics", "publication_date": "2024-03-01T08:00:00Z" } }
            ],
            "links": {}
        })
    }

    fn reuters_page() -> serde_json::Value {
        json!({ "result": { "articles": [
            { "title": "reuters-mid", "canonical_url": "/world/mid/", "published_time": "2024-03-03T08:00:00Z" }
        ] } })
    }

    fn empty_reuters_page() -> serde_json::Value {
        json!({ "result": { "articles": [] } })
    }

    const FOX_HTML: &str = r#"<html><body><h1 class="headline speakable">Fox story</h1>
        <div class="article-body"><p>Fox body text.</p></div></body></html>"#;
    const REUTERS_HTML: &str = r#"<html><body><h1>Reuters story</h1>
        <div data-testid="ArticleBody"><div data-testid="paragraph-0">Reuters body.</div></div></body></html>"#;

    #[tokio::test]
    async fn test_search_merges_sources() {
        let desk = desk(
            ScriptedFetcher::new()
                .json(foxnews::SEARCH_URL, fox_page())
                .json(foxnews::SEARCH_URL, fox_page()),
            ScriptedFetcher::new()
                .json(reuters::SEARCH_URL, reuters_page())
                .json(reuters::SEARCH_URL, empty_reuters_page())
                .json(reuters::SEARCH_URL, reuters_page())
                .json(reuters::SEARCH_URL, empty_reuters_page()),
        );
        let results = desk.search("economy", SourceSelector::All, 10).await;
        let titles: Vec<&str> = results.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["fox-new", "reuters-mid", "fox-old"]);

        let limited = desk.search("economy", SourceSelector::All, 1).await;
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].title, "fox-new");
    }

    #[tokio::test]
    async fn test_search_only_selected_source() {
        let desk = desk(
            ScriptedFetcher::new().json(foxnews::SEARCH_URL, fox_page()),
            ScriptedFetcher::new().json(reuters::SEARCH_URL, reuters_page()),
        );
        let results = desk.search("economy", SourceSelector::Reuters, 10).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, "Reuters");
    }

    #[tokio::test]
    async fn test_search_no_results_is_empty() {
        let desk = desk(ScriptedFetcher::new(), ScriptedFetcher::new());
        assert!(desk.search("nothing", SourceSelector::All, 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_article_dispatch_and_errors() {
        let desk = desk(
            ScriptedFetcher::new().html(FOX_URL, FOX_HTML),
            ScriptedFetcher::new().html(REUTERS_URL, REUTERS_HTML),
        );
        let fox = desk.fetch_article(FOX_URL).await.unwrap();
        assert_eq!(fox.metadata.headline, "Fox story");
        let reuters = desk.fetch_article(REUTERS_URL).await.unwrap();
        assert_eq!(reuters.metadata.headline, "Reuters story");

        assert!(matches!(
            desk.fetch_article("https://www.example.com/story").await,
            Err(NewsError::UnsupportedSource(_))
        ));
        assert!(matches!(
            desk.fetch_article("https://www.reuters.com/missing/").await,
            Err(NewsError::FetchFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_fetch_skips_failures_in_order() {
        let desk = desk(
            ScriptedFetcher::new().html(FOX_URL, FOX_HTML),
            ScriptedFetcher::new()
                .html(REUTERS_URL, REUTERS_HTML)
                .html("https://www.reuters.com/broken/", "<html><body>no body</body></html>"),
        );
        let urls: Vec<String> = [
            "https://www.example.com/unsupported",
            REUTERS_URL,
            "https://www.reuters.com/broken/",
            FOX_URL,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let seen = RefCell::new(Vec::new());
        let progress = |done: usize, total: usize| seen.borrow_mut().push((done, total));
        let articles = desk.batch_fetch(&urls, &progress).await;

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].metadata.url, REUTERS_URL);
        assert_eq!(articles[1].metadata.url, FOX_URL);
        assert_eq!(*seen.borrow(), vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[tokio::test]
    async fn test_usage_counts_top_level_calls() {
        let external = Arc::new(UsageStats::new());
        let desk = desk(
            ScriptedFetcher::new().html(FOX_URL, FOX_HTML),
            ScriptedFetcher::new(),
        )
        .with_usage_hook(external.clone());

        desk.search("q", SourceSelector::All, 5).await;
        let article = desk.fetch_article(FOX_URL).await.unwrap();
        let _ = desk.fetch_article("https://www.example.com/").await;
        desk.analyze(&article).unwrap();
        desk.batch_fetch(&[], &NoProgress).await;

        let snap = desk.usage();
        assert_eq!(snap.search_count, 1);
        assert_eq!(snap.fetch_count, 3);
        assert_eq!(snap.analysis_count, 1);
        assert_eq!(snap.total_requests, 5);
        assert_eq!(external.snapshot().total_requests, 5);
    }

    fn failing_progress(_done: usize, _total: usize) {
        panic!("progress failure");
    }

    struct PanickingHook;

    impl UsageHook for PanickingHook {
        fn record(&self, _invocation: Invocation) {
            panic!("hook failure");
        }
    }

    #[tokio::test]
    async fn test_panicking_hooks_do_not_affect_results() {
        let desk = desk(
            ScriptedFetcher::new()
                .json(foxnews::SEARCH_URL, fox_page())
                .html(FOX_URL, FOX_HTML),
            ScriptedFetcher::new(),
        )
        .with_usage_hook(Arc::new(PanickingHook));

        let results = desk.search("economy", SourceSelector::Fox, 10).await;
        assert_eq!(results.len(), 2);

        let urls = vec![FOX_URL.to_string()];
        let articles = desk.batch_fetch(&urls, &failing_progress).await;
        assert_eq!(articles.len(), 1);

        let snap = desk.usage();
        assert_eq!(snap.search_count, 1);
        assert_eq!(snap.fetch_count, 1);
    }

    #[test]
    fn test_sources_and_dispatch() {
        let desk = desk(ScriptedFetcher::new(), ScriptedFetcher::new());
        let keys: Vec<&str> = desk.sources().iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["fox", "reuters"]);
        assert_eq!(desk.source_for(FOX_URL), Some(SourceKind::Fox));
        assert_eq!(desk.source_for("https://example.com"), None);
        assert_eq!(desk.default_limit(), 5);
        assert_eq!(desk.extract_keywords("rates rates rise", 1)[0].word, "rates");
    }
}

//! Lightweight text analytics over extracted articles.
//!
//! - [`Analyzer::extract_keywords`]: stopword-filtered word frequency ranking
//! - [`Analyzer::analyze`]: sentence/word counts plus the top keywords of an article
//!
//! Keyword ranking is stable: words with equal counts keep the order in which
//! they first appeared in the text.

use crate::config::Config;
use crate::error::{NewsError, Result};
use crate::models::{AnalysisReport, Article, ArticleStats, KeywordStat};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

/// Keywords reported by [`Analyzer::analyze`].
const REPORT_KEYWORDS: usize = 10;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Remove HTML-like tags.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Stopword list and keyword cap, taken from [`Config`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    stopwords: HashSet<String>,
    max_keywords: usize,
}

impl Analyzer {
    pub fn new(config: &Config) -> Self {
        Self {
            stopwords: config.stopwords.iter().map(|w| w.to_lowercase()).collect(),
            max_keywords: config.max_keywords,
        }
    }

    /// Rank the most frequent words of `text`.
    ///
    /// The text is lower-cased and stripped of tags and punctuation; stopwords
    /// and words of two characters or fewer are ignored.
    ///
    /// # Returns
    ///
    /// At most `min(count, max_keywords)` entries, by descending count, ties in
    /// order of first occurrence.
    pub fn extract_keywords(&self, text: &str, count: usize) -> Vec<KeywordStat> {
        let lowered = text.to_lowercase();
        let without_tags = TAG_RE.replace_all(&lowered, "");
        let cleaned = NON_WORD_RE.replace_all(&without_tags, "");

        let mut ranking: Vec<KeywordStat> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for word in cleaned.split_whitespace() {
            if word.chars().count() <= 2 || self.stopwords.contains(word) {
                continue;
            }
            match index.get(word).copied() {
                Some(i) => ranking[i].count += 1,
                None => {
                    index.insert(word, ranking.len());
                    ranking.push(KeywordStat {
                        word: word.to_string(),
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-occurrence order among equal counts.
        ranking.sort_by(|a, b| b.count.cmp(&a.count));
        ranking.truncate(count.min(self.max_keywords));
        debug!(keywords = ranking.len(), "Extracted keywords");
        ranking
    }

    /// Compute readability statistics and keywords for an article.
    ///
    /// # Errors
    ///
    /// [`NewsError::InvalidArticle`] when the article has no content blocks.
    #[instrument(level = "info", skip_all, fields(url = %article.metadata.url))]
    pub fn analyze(&self, article: &Article) -> Result<AnalysisReport> {
        if article.content.is_empty() {
            warn!("Refusing to analyze an article without content");
            return Err(NewsError::InvalidArticle);
        }

        let full_text = strip_tags(&article.full_text());
        let sentence_count = SENTENCE_END_RE
            .split(&full_text)
            .filter(|s| !s.trim().is_empty())
            .count();
        let word_count = full_text.split_whitespace().count();
        let avg_sentence_length = if sentence_count == 0 {
            0.0
        } else {
            word_count as f64 / sentence_count as f64
        };

        Ok(AnalysisReport {
            title: article.metadata.headline.clone(),
            source: article.metadata.source.clone(),
            date: article.metadata.published_date.clone(),
            stats: ArticleStats {
                sentence_count,
                word_count,
                avg_sentence_length,
            },
            keywords: self.extract_keywords(&full_text, REPORT_KEYWORDS),
        })
    }
}

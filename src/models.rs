//! Data models for search results, extracted articles and analysis reports.
//!
//! This module defines the structures every source adapter normalizes into:
//! - [`ArticleSummary`]: One search hit, as listed by a source's search API
//! - [`Article`]: A fully extracted article, [`ArticleMetadata`] plus ordered [`ContentBlock`]s
//! - [`RichText`]: Block text with inline hyperlinks kept as [`InlineLink`] tokens
//! - [`KeywordStat`], [`ArticleStats`], [`AnalysisReport`]: Analyzer output
//!
//! All models are created fresh per request and never mutated once returned.
//! They serialize with serde so the CLI can emit them as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A search hit produced by a source adapter.
///
/// `date` keeps the source's own format; the aggregator decides how to order
/// summaries coming from different sources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleSummary {
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
    /// Publication date in the source-native format.
    pub date: String,
    pub category: String,
    /// Human readable source name, e.g. `"Reuters"`.
    pub source: String,
}

/// Header information extracted from an article page.
///
/// Fields that a page does not provide hold an adapter-specific default
/// (`"Unknown"`, `"Untitled"`, ...), never an error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleMetadata {
    pub url: String,
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    pub author: String,
    /// `YYYY-MM-DD HH:MM:SS` when the page carries a machine-readable timestamp.
    pub published_date: String,
    pub source: String,
    pub category: String,
}

/// A hyperlink embedded in block text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InlineLink {
    pub url: String,
    pub text: String,
}

/// One token of [`RichText`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Inline {
    Text(String),
    Link(InlineLink),
}

/// Block text as an ordered sequence of plain text and link tokens.
///
/// Links are separate tokens instead of markup inside the string, so a
/// renderer never has to re-parse the text to find them. Adjacent text tokens
/// are merged on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RichText(Vec<Inline>);

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append plain text, merging with a preceding text token.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.0.last_mut() {
            Some(Inline::Text(last)) => last.push_str(text),
            _ => self.0.push(Inline::Text(text.to_string())),
        }
    }

    pub fn push_link(&mut self, link: InlineLink) {
        self.0.push(Inline::Link(link));
    }

    /// Strip leading whitespace from the first text tokens and trailing
    /// whitespace from the last ones, dropping tokens left empty.
    pub fn trimmed(mut self) -> Self {
        while let Some(Inline::Text(first)) = self.0.first_mut() {
            let trimmed = first.trim_start();
            if trimmed.is_empty() {
                self.0.remove(0);
            } else {
                *first = trimmed.to_string();
                break;
            }
        }
        while let Some(Inline::Text(last)) = self.0.last_mut() {
            let trimmed = last.trim_end();
            if trimmed.is_empty() {
                self.0.pop();
            } else {
                let keep = trimmed.len();
                last.truncate(keep);
                break;
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &[Inline] {
        &self.0
    }

    pub fn links(&self) -> impl Iterator<Item = &InlineLink> {
        self.0.iter().filter_map(|token| match token {
            Inline::Link(link) => Some(link),
            Inline::Text(_) => None,
        })
    }

    /// Text with every link replaced by its display text.
    pub fn plain_text(&self) -> String {
        self.0
            .iter()
            .map(|token| match token {
                Inline::Text(text) => text.as_str(),
                Inline::Link(link) => link.text.as_str(),
            })
            .collect()
    }

    /// Markdown rendering: links become `[text](url)`.
    pub fn to_markdown(&self) -> String {
        self.0
            .iter()
            .map(|token| match token {
                Inline::Text(text) => text.clone(),
                Inline::Link(link) => format!("[{}]({})", link.text, link.url),
            })
            .collect()
    }

    /// Legacy marker rendering: links become `<x id='url'>text</x>`.
    pub fn to_markup(&self) -> String {
        self.0
            .iter()
            .map(|token| match token {
                Inline::Text(text) => text.clone(),
                Inline::Link(link) => format!("<x id='{}'>{}</x>", link.url, link.text),
            })
            .collect()
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        let mut rich = RichText::new();
        rich.push_text(text);
        rich
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_text())
    }
}

/// One ordered unit of an article body.
///
/// `order` is zero-based and gapless across an article; use
/// [`ContentBuilder`] to construct block lists so the invariant holds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        content: RichText,
        order: usize,
    },
    Quote {
        content: RichText,
        order: usize,
    },
    Image {
        image_url: String,
        caption: String,
        /// Photo credit (Fox News) or alt text (Reuters).
        #[serde(alias = "alt")]
        source: String,
        order: usize,
    },
    Subheading {
        content: String,
        order: usize,
    },
}

impl ContentBlock {
    pub fn order(&self) -> usize {
        match self {
            ContentBlock::Text { order, .. }
            | ContentBlock::Quote { order, .. }
            | ContentBlock::Image { order, .. }
            | ContentBlock::Subheading { order, .. } => *order,
        }
    }

    /// Plain text of text, quote and subheading blocks; `None` for images.
    pub fn text(&self) -> Option<String> {
        match self {
            ContentBlock::Text { content, .. } | ContentBlock::Quote { content, .. } => {
                Some(content.plain_text())
            }
            ContentBlock::Subheading { content, .. } => Some(content.clone()),
            ContentBlock::Image { .. } => None,
        }
    }
}

/// Accumulates content blocks, assigning each the next `order` slot.
#[derive(Debug, Default)]
pub struct ContentBuilder {
    blocks: Vec<ContentBlock>,
}

impl ContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_order(&self) -> usize {
        self.blocks.len()
    }

    /// Push a text block; empty text does not consume an order slot.
    pub fn text(&mut self, content: RichText) {
        if content.is_empty() {
            return;
        }
        let order = self.next_order();
        self.blocks.push(ContentBlock::Text { content, order });
    }

    pub fn quote(&mut self, content: RichText) {
        let order = self.next_order();
        self.blocks.push(ContentBlock::Quote { content, order });
    }

    pub fn image(&mut self, image_url: String, caption: String, source: String) {
        let order = self.next_order();
        self.blocks.push(ContentBlock::Image {
            image_url,
            caption,
            source,
            order,
        });
    }

    pub fn subheading(&mut self, content: String) {
        let order = self.next_order();
        self.blocks.push(ContentBlock::Subheading { content, order });
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn build(self) -> Vec<ContentBlock> {
        self.blocks
    }
}

/// A fully extracted article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub metadata: ArticleMetadata,
    pub content: Vec<ContentBlock>,
}

impl Article {
    /// Text of every text, quote and subheading block, space separated.
    pub fn full_text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::text)
            .fold(String::new(), |mut acc, text| {
                acc.push(' ');
                acc.push_str(&text);
                acc
            })
    }
}

/// A word and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeywordStat {
    pub word: String,
    pub count: usize,
}

/// Basic readability statistics of an article.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleStats {
    pub sentence_count: usize,
    pub word_count: usize,
    pub avg_sentence_length: f64,
}

/// Result of [`Analyzer::analyze`](crate::analysis::Analyzer::analyze).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisReport {
    pub title: String,
    pub source: String,
    pub date: String,
    pub stats: ArticleStats,
    pub keywords: Vec<KeywordStat>,
}

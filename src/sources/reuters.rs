//! Reuters adapter.
//!
//! Search uses Reuters' content API with client-driven pagination: page `n`
//! asks for `offset = n * PAGE_SIZE`, and the crawl stops at the first page
//! that returns no articles or when the page budget is spent. Nothing in the
//! response tells the crawler where the next page is.
//!
//! Extraction is stricter than for Fox News. The article body container
//! (`div[data-testid='ArticleBody']`) is required, and any structural surprise
//! while walking the body aborts the extraction, so a half-parsed page is never
//! presented as a complete article.
//!
//! # Body Markers
//!
//! The body is walked over *all* descendants in document order:
//! - `[data-testid^='paragraph-']`: text block; `a[data-testid='Link']` children become inline links
//! - `figure.primary-image__container`: image block from the largest `srcset` candidate
//! - `h2[data-testid='Heading']`: subheading block

use crate::fetcher::{Body, Fetch};
use crate::models::{
    Article, ArticleMetadata, ArticleSummary, ContentBlock, ContentBuilder, InlineLink, RichText,
};
use crate::sources::{NewsSource, SourceKind};
use crate::utils::{direct_text, element_text, first_path_segment, normalize_timestamp, now_timestamp};
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub const SEARCH_URL: &str = "https://www.reuters.com/pf/api/v3/content/fetch/articles-by-search-v2";
pub const BASE_URL: &str = "https://www.reuters.com";
pub const PAGE_SIZE: usize = 20;

/// Why an extraction was abandoned.
#[derive(Error, Debug, PartialEq)]
pub enum ExtractError {
    #[error("article body container not found")]
    MissingBody,
    #[error("invalid selector `{0}`")]
    Selector(String),
    #[error("image srcset has no usable candidate: {0:?}")]
    Srcset(String),
}

/// Reuters search and extraction.
#[derive(Debug)]
pub struct Reuters<F> {
    fetcher: F,
    max_pages: usize,
}

impl<F: Fetch> Reuters<F> {
    pub fn new(fetcher: F, max_pages: usize) -> Self {
        Self { fetcher, max_pages }
    }
}

impl<F: Fetch> NewsSource for Reuters<F> {
    fn kind(&self) -> SourceKind {
        SourceKind::Reuters
    }

    #[instrument(level = "info", skip(self))]
    async fn search(&self, query: &str) -> Vec<ArticleSummary> {
        let mut articles = Vec::new();

        for page in 0..self.max_pages {
            let offset = page * PAGE_SIZE;
            let search_query = search_query(query, offset);
            let params = [
                ("query", search_query.as_str()),
                ("d", "264"),
                ("mxId", "00000000"),
                ("_website", "reuters"),
            ];

            let body = self.fetcher.fetch(SEARCH_URL, &params).await;
            let Some(result) = body
                .as_ref()
                .and_then(Body::as_json)
                .filter(|v| v.is_object())
                .and_then(|v| v.get("result"))
            else {
                debug!(page, "Missing or malformed search page; stopping");
                break;
            };

            let hits = parse_search_page(result);
            if hits.is_empty() {
                debug!(page, "Empty search page; stopping");
                break;
            }
            debug!(page, offset, hits = hits.len(), "Parsed Reuters search page");
            articles.extend(hits);
        }

        info!(count = articles.len(), "Reuters search complete");
        articles
    }

    #[instrument(level = "info", skip(self))]
    async fn extract(&self, url: &str) -> Option<Article> {
        let body = self.fetcher.fetch(url, &[]).await?;
        let Some(html) = body.as_text() else {
            warn!("Expected an HTML document, got JSON");
            return None;
        };
        match parse_article(url, html) {
            Ok(article) => {
                info!(blocks = article.content.len(), headline = %article.metadata.headline, "Parsed Reuters article");
                Some(article)
            }
            Err(e) => {
                error!(error = %e, "Reuters article parsing failed");
                None
            }
        }
    }
}

/// The JSON-encoded `query` parameter for one result page.
pub fn search_query(query: &str, offset: usize) -> String {
    json!({
        "keyword": urlencoding::encode(query),
        "offset": offset,
        "orderby": "display_date:desc",
        "size": PAGE_SIZE,
        "website": "reuters",
    })
    .to_string()
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Map the `result` object of one search page to summaries.
pub fn parse_search_page(result: &Value) -> Vec<ArticleSummary> {
    let Some(items) = result.get("articles").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| ArticleSummary {
            title: str_field(item, "title").to_string(),
            description: str_field(item, "description").to_string(),
            url: format!("{BASE_URL}{}", str_field(item, "canonical_url")),
            thumbnail: item
                .get("thumbnail")
                .map(|thumb| str_field(thumb, "url"))
                .unwrap_or("")
                .to_string(),
            date: str_field(item, "published_time").to_string(),
            category: str_field(item, "category").to_string(),
            source: SourceKind::Reuters.name().to_string(),
        })
        .collect()
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>, ExtractError> {
    Ok(scope.select(&selector(css)?).next())
}

/// Parse a Reuters article page.
///
/// # Errors
///
/// [`ExtractError::MissingBody`] when the body container is absent, however
/// much metadata was found; any other error raised while walking the body.
pub fn parse_article(url: &str, html: &str) -> Result<Article, ExtractError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let category = select_first(root, "meta[property='article:section']")?
        .and_then(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| first_path_segment(url))
        .unwrap_or_else(|| "Uncategorized".to_string());

    let headline = select_first(root, "h1")?
        .map(element_text)
        .unwrap_or_else(|| "Untitled".to_string());

    let published_date = select_first(root, "time[datetime]")?
        .and_then(|time| time.value().attr("datetime"))
        .and_then(normalize_timestamp)
        .unwrap_or_else(now_timestamp);

    let author = root
        .select(&selector("a[rel='author']")?)
        .map(element_text)
        .collect::<Vec<_>>()
        .join(", ");

    let metadata = ArticleMetadata {
        url: url.to_string(),
        headline,
        subheadline: None,
        author,
        published_date,
        source: SourceKind::Reuters.name().to_string(),
        category,
    };

    let body = select_first(root, "div[data-testid='ArticleBody']")?.ok_or(ExtractError::MissingBody)?;
    let content = walk_body(body)?;

    Ok(Article { metadata, content })
}

fn walk_body(body: ElementRef<'_>) -> Result<Vec<ContentBlock>, ExtractError> {
    let caption_selector = selector("div[data-testid='Body']")?;
    let span_selector = selector("span")?;
    let img_selector = selector("img")?;

    let mut content = ContentBuilder::new();
    for element in body.descendants().skip(1).filter_map(ElementRef::wrap) {
        let el = element.value();
        let testid = el.attr("data-testid").unwrap_or("");

        if testid.starts_with("paragraph-") {
            content.text(paragraph(element));
        } else if el.name() == "figure" && el.classes().any(|c| c.contains("primary-image__container")) {
            let Some(img) = element.select(&img_selector).next() else {
                continue;
            };
            let Some(srcset) = img.value().attr("srcset") else {
                continue;
            };
            let image_url = largest_candidate(srcset)?;
            let alt = img.value().attr("alt").unwrap_or("Image").to_string();
            let caption = element
                .select(&caption_selector)
                .next()
                .and_then(|container| container.select(&span_selector).next())
                .map(element_text)
                .unwrap_or_default();
            content.image(image_url, caption, alt);
        } else if el.name() == "h2" && testid == "Heading" {
            content.subheading(element_text(element));
        }
    }
    Ok(content.build())
}

/// URL of the last (highest resolution) entry of a `srcset` list.
pub fn largest_candidate(srcset: &str) -> Result<String, ExtractError> {
    srcset
        .rsplit(',')
        .next()
        .and_then(|candidate| candidate.split_whitespace().next())
        .map(str::to_string)
        .ok_or_else(|| ExtractError::Srcset(srcset.to_string()))
}

/// Convert a paragraph to rich text.
///
/// Only direct text nodes and `a[data-testid='Link']` children contribute. A
/// link's display text is its own direct text, ignoring nested markup. Every
/// token is padded with a space and the result trimmed.
fn paragraph(element: ElementRef<'_>) -> RichText {
    let mut rich = RichText::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                rich.push_text(" ");
                rich.push_text(text.trim());
                rich.push_text(" ");
            }
            Node::Element(el) if el.name() == "a" && el.attr("data-testid") == Some("Link") => {
                let Some(anchor) = ElementRef::wrap(child) else { continue };
                if let Some(link) = resolve_link(el.attr("href"), direct_text(anchor)) {
                    rich.push_text(" ");
                    rich.push_link(link);
                    rich.push_text(" ");
                }
            }
            _ => {}
        }
    }
    rich.trimmed()
}

fn resolve_link(href: Option<&str>, text: String) -> Option<InlineLink> {
    let href = href.map(str::trim).filter(|h| !h.is_empty())?;
    if text.is_empty() {
        return None;
    }
    let url = Url::parse(BASE_URL).ok()?.join(href).ok()?;
    Some(InlineLink {
        url: url.to_string(),
        text,
    })
}

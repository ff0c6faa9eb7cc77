//! Fox News adapter.
//!
//! Search goes through the public `moxie.foxnews.com` JSON search API, whose
//! responses carry their own pagination signal in `links.next`. The crawler
//! follows that link page by page until it disappears or the configured page
//! budget is spent.
//!
//! Article pages are server-rendered HTML. Metadata is read with per-field
//! selectors that each fall back to a default, so a page with odd markup still
//! yields an article. The body is the direct children of `div.article-body`,
//! dispatched by element kind:
//!
//! | Element | Block |
//! |---------|-------|
//! | `p` | text, anchors kept as inline links |
//! | `blockquote` with `p.quote-text` | quote |
//! | `div.image-ct` with an `img` | image, caption and credit from caption spans |
//! | `h3` with `strong` | subheading |

use crate::fetcher::{Body, Fetch};
use crate::models::{Article, ArticleMetadata, ArticleSummary, ContentBuilder, InlineLink, RichText};
use crate::sources::{NewsSource, SourceKind};
use crate::utils::{element_text, normalize_timestamp};
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const SEARCH_URL: &str = "https://moxie.foxnews.com/search/web";
pub const BASE_URL: &str = "https://www.foxnews.com";

/// Sections whose hits are video-only placeholders rather than articles.
const NON_ARTICLE_SECTIONS: [&str; 2] = ["fox-news.video", "category"];

/// Fox News search and extraction.
#[derive(Debug)]
pub struct FoxNews<F> {
    fetcher: F,
    max_pages: usize,
}

impl<F: Fetch> FoxNews<F> {
    pub fn new(fetcher: F, max_pages: usize) -> Self {
        Self { fetcher, max_pages }
    }
}

impl<F: Fetch> NewsSource for FoxNews<F> {
    fn kind(&self) -> SourceKind {
        SourceKind::Fox
    }

    #[instrument(level = "info", skip(self))]
    async fn search(&self, query: &str) -> Vec<ArticleSummary> {
        let mut articles = Vec::new();
        let mut pages = 0;
        if self.max_pages == 0 {
            debug!("Page budget is zero; not searching");
            return articles;
        }
        // The API's offsets are one-based.
        let mut body = self
            .fetcher
            .fetch(SEARCH_URL, &[("fields", "web"), ("q", query), ("start", "1")])
            .await;

        while pages < self.max_pages {
            let Some(data) = body.as_ref().and_then(Body::as_json).filter(|v| v.is_object()) else {
                debug!(pages, "Missing or non-object search page; stopping");
                break;
            };

            let hits = parse_search_page(data);
            debug!(page = pages + 1, hits = hits.len(), "Parsed Fox News search page");
            articles.extend(hits);
            pages += 1;

            let Some(next) = next_page(data) else {
                debug!(pages, "No next link; stopping");
                break;
            };
            if pages >= self.max_pages {
                debug!(pages, "Page budget reached; stopping");
                break;
            }
            body = self.fetcher.fetch(&next, &[]).await;
        }

        info!(count = articles.len(), pages, "Fox News search complete");
        articles
    }

    #[instrument(level = "info", skip(self))]
    async fn extract(&self, url: &str) -> Option<Article> {
        let body = self.fetcher.fetch(url, &[]).await?;
        let Some(html) = body.as_text() else {
            warn!("Expected an HTML document, got JSON");
            return None;
        };
        let article = parse_article(url, html);
        info!(blocks = article.content.len(), headline = %article.metadata.headline, "Parsed Fox News article");
        Some(article)
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Map one search response page to summaries, skipping non-article hits.
pub fn parse_search_page(data: &Value) -> Vec<ArticleSummary> {
    let Some(items) = data.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| str_field(item, "type") == "article")
        .filter_map(|item| {
            let empty = Value::Null;
            let attributes = item.get("attributes").unwrap_or(&empty);
            let category = str_field(attributes, "section");
            if NON_ARTICLE_SECTIONS.contains(&category) {
                return None;
            }
            Some(ArticleSummary {
                title: str_field(attributes, "title").to_string(),
                description: str_field(attributes, "description").to_string(),
                url: str_field(attributes, "canonical_url").to_string(),
                thumbnail: str_field(attributes, "thumbnail").to_string(),
                date: str_field(attributes, "publication_date").to_string(),
                category: category.to_string(),
                source: SourceKind::Fox.name().to_string(),
            })
        })
        .collect()
}

/// The server-provided link to the next result page, if any.
pub fn next_page(data: &Value) -> Option<String> {
    data.get("links")
        .and_then(|links| links.get("next"))
        .and_then(Value::as_str)
        .filter(|next| !next.is_empty())
        .map(str::to_string)
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

fn select_text(document: &Html, css: &str, default: &str) -> String {
    select_first(document.root_element(), css)
        .map(element_text)
        .unwrap_or_else(|| default.to_string())
}

/// Parse a Fox News article page. Missing metadata falls back to defaults.
pub fn parse_article(url: &str, html: &str) -> Article {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let subheadline = select_text(&document, "h2.sub-headline.speakable", "");
    let published_date = select_first(root, "span.article-date time")
        .and_then(|time| {
            time.value()
                .attr("datetime")
                .and_then(normalize_timestamp)
                .or_else(|| Some(element_text(time)).filter(|t| !t.is_empty()))
        })
        .unwrap_or_else(|| "Unknown".to_string());

    let metadata = ArticleMetadata {
        url: url.to_string(),
        headline: select_text(&document, "h1.headline.speakable", "No Headline"),
        subheadline: Some(subheadline).filter(|s| !s.is_empty()),
        author: select_text(&document, ".author-byline a", "Unknown"),
        published_date,
        source: SourceKind::Fox.name().to_string(),
        category: select_text(&document, ".article-meta-upper .eyebrow a", "Unknown"),
    };

    let mut content = ContentBuilder::new();
    match select_first(root, "div.article-body") {
        Some(body) => {
            for element in body.children().filter_map(ElementRef::wrap) {
                push_block(&mut content, element);
            }
        }
        None => debug!(%url, "No article body container"),
    }

    Article {
        metadata,
        content: content.build(),
    }
}

fn push_block(content: &mut ContentBuilder, element: ElementRef<'_>) {
    match element.value().name() {
        "p" => content.text(paragraph(element)),
        "blockquote" => {
            if let Some(quote) = select_first(element, "p.quote-text") {
                content.quote(RichText::from(element_text(quote).as_str()));
            }
        }
        "div" if element.value().classes().any(|c| c == "image-ct") => {
            let Some(img) = select_first(element, "div.m picture img") else {
                return;
            };
            let image_url = img.value().attr("src").unwrap_or("").to_string();
            let mut spans = Selector::parse("div.info div.caption p span")
                .map(|selector| element.select(&selector).map(element_text).collect::<Vec<_>>())
                .unwrap_or_default()
                .into_iter();
            let caption = spans.next().unwrap_or_default();
            let credit = spans.next().unwrap_or_default();
            content.image(image_url, caption, credit);
        }
        "h3" => {
            if let Some(strong) = select_first(element, "strong") {
                content.subheading(element_text(strong));
            }
        }
        _ => {}
    }
}

/// Convert a paragraph to rich text.
///
/// Anchor children become inline links resolved against the site root; an
/// anchor missing its href or text is dropped. Other inline content is kept
/// verbatim.
fn paragraph(element: ElementRef<'_>) -> RichText {
    let mut rich = RichText::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => rich.push_text(text),
            Node::Element(el) if el.name() == "a" => {
                let Some(anchor) = ElementRef::wrap(child) else { continue };
                if let Some(link) = resolve_link(el.attr("href"), element_text(anchor)) {
                    rich.push_link(link);
                }
            }
            Node::Element(_) => {
                if let Some(inline) = ElementRef::wrap(child) {
                    rich.push_text(&inline.html());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::ScriptedFetcher;
    use crate::models::{ContentBlock, Inline};
    use serde_json::json;

    const ARTICLE_URL: &str = "https://www.foxnews.com/politics/senate-passes-bill";

    const ARTICLE_HTML: &str = r#"
<html><body>
  <div class="article-meta-upper"><span class="eyebrow"><a href="/politics">Politics</a></span></div>
  <h1 class="headline speakable">Senate passes bill</h1>
  <h2 class="sub-headline speakable">A late-night vote</h2>
  <div class="author-byline"><span>By <a href="/person/j">Jane Doe</a></span></div>
  <span class="article-date"><time datetime="2024-03-01T12:30:00-05:00">March 1, 2024 12:30pm EST</time></span>
  <div class="article-body">
    <p>The Senate <a href="/politics/budget">passed the budget</a> on <strong>Friday</strong>.</p>
    <p>   </p>
    <p>No <a href="">empty</a> links <a href="/x"> </a>here.</p>
    <blockquote class="quote"><p class="quote-text"> "We did it," she said. </p></blockquote>
    <div class="image-ct">
      <div class="m"><picture><img src="https://a57.foxnews.com/img.jpg" alt="x"></picture></div>
      <div class="info"><div class="caption"><p><span>Senators leave the chamber.</span><span>(AP Photo)</span></p></div></div>
    </div>
    <div class="image-ct"><div class="m">no image here</div></div>
    <div class="ad">Advertisement</div>
    <h3><strong>WHAT COMES NEXT</strong></h3>
    <h3>No strong marker</h3>
    <div class="image-ct">
      <div class="m"><picture><img src="https://a57.foxnews.com/two.jpg"></picture></div>
      <div class="info"><div class="caption"><p><span>Only a caption.</span></p></div></div>
    </div>
  </div>
</body></html>
"#;

    fn search_page(items: Value, next: Option<&str>) -> Value {
        match next {
            Some(next) => json!({ "data": items, "links": { "next": next } }),
            None => json!({ "data": items, "links": {} }),
        }
    }

    fn hit(title: &str, section: &str, kind: &str) -> Value {
        json!({
            "type": kind,
            "attributes": {
                "title": title,
                "description": format!("{title} description"),
                "canonical_url": format!("https://www.foxnews.com/{section}/{title}"),
                "thumbnail": "https://a57.foxnews.com/thumb.jpg",
                "publication_date": "2024-03-01T12:00:00Z",
                "section": section,
            }
        })
    }

    #[test]
    fn test_parse_search_page_filters_non_articles() {
        let page = search_page(
            json!([
                hit("one", "politics", "article"),
                hit("clip", "fox-news.video", "article"),
                hit("landing", "category", "article"),
                hit("video", "politics", "video"),
                hit("two", "world", "article"),
            ]),
            None,
        );
        let hits = parse_search_page(&page);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "one");
        assert_eq!(hits[0].category, "politics");
        assert_eq!(hits[0].source, "Fox News");
        assert_eq!(hits[0].date, "2024-03-01T12:00:00Z");
        assert_eq!(hits[1].url, "https://www.foxnews.com/world/two");
    }

    #[test]
    fn test_next_page() {
        assert_eq!(
            next_page(&search_page(json!([]), Some("https://moxie/next"))).as_deref(),
            Some("https://moxie/next")
        );
        assert_eq!(next_page(&search_page(json!([]), None)), None);
        assert_eq!(next_page(&search_page(json!([]), Some(""))), None);
    }

    #[tokio::test]
    async fn test_search_single_page_without_next_link() {
        let fetcher = ScriptedFetcher::new()
            .json(SEARCH_URL, search_page(json!([hit("one", "politics", "article")]), None));
        let fox = FoxNews::new(fetcher, 3);
        let hits = fox.search("budget").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(fox.fetcher.request_count(), 1);
        let (url, params) = &fox.fetcher.requests()[0];
        assert_eq!(url, SEARCH_URL);
        assert!(params.contains(&("q".to_string(), "budget".to_string())));
        assert!(params.contains(&("start".to_string(), "1".to_string())));
    }

    #[tokio::test]
    async fn test_search_follows_next_links_up_to_page_budget() {
        let fetcher = ScriptedFetcher::new()
            .json(SEARCH_URL, search_page(json!([hit("p1", "politics", "article")]), Some("https://moxie/p2")))
            .json("https://moxie/p2", search_page(json!([hit("p2", "politics", "article")]), Some("https://moxie/p3")))
            .json("https://moxie/p3", search_page(json!([hit("p3", "politics", "article")]), None));
        let fox = FoxNews::new(fetcher, 2);
        let hits = fox.search("q").await;
        let titles: Vec<&str> = hits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["p1", "p2"]);
        assert_eq!(fox.fetcher.request_count(), 2);
    }

    #[tokio::test]
    async fn test_search_with_zero_page_budget_sends_nothing() {
        let fetcher = ScriptedFetcher::new()
            .json(SEARCH_URL, search_page(json!([hit("p1", "politics", "article")]), None));
        let fox = FoxNews::new(fetcher, 0);
        assert!(fox.search("q").await.is_empty());
        assert_eq!(fox.fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn test_search_stops_on_failed_or_non_json_page() {
        let fetcher = ScriptedFetcher::new()
            .json(SEARCH_URL, search_page(json!([hit("p1", "politics", "article")]), Some("https://moxie/p2")))
            .html("https://moxie/p2", "<html>rate limited</html>");
        let fox = FoxNews::new(fetcher, 5);
        assert_eq!(fox.search("q").await.len(), 1);

        let fox = FoxNews::new(ScriptedFetcher::new(), 5);
        assert!(fox.search("q").await.is_empty());
    }

    #[test]
    fn test_parse_article_metadata() {
        let article = parse_article(ARTICLE_URL, ARTICLE_HTML);
        let meta = &article.metadata;
        assert_eq!(meta.url, ARTICLE_URL);
        assert_eq!(meta.headline, "Senate passes bill");
        assert_eq!(meta.subheadline.as_deref(), Some("A late-night vote"));
        assert_eq!(meta.author, "Jane Doe");
        assert_eq!(meta.published_date, "2024-03-01 12:30:00");
        assert_eq!(meta.category, "Politics");
        assert_eq!(meta.source, "Fox News");
    }

    #[test]
    fn test_parse_article_body_blocks() {
        let article = parse_article(ARTICLE_URL, ARTICLE_HTML);
        let orders: Vec<usize> = article.content.iter().map(ContentBlock::order).collect();
        assert_eq!(orders, (0..article.content.len()).collect::<Vec<_>>());
        assert_eq!(article.content.len(), 6);

        match &article.content[0] {
            ContentBlock::Text { content, order } => {
                assert_eq!(*order, 0);
                let links: Vec<&InlineLink> = content.links().collect();
                assert_eq!(links.len(), 1);
                assert_eq!(links[0].url, "https://www.foxnews.com/politics/budget");
                assert_eq!(links[0].text, "passed the budget");
                assert!(!content.plain_text().contains("<a"));
                assert_eq!(
                    content.plain_text(),
                    "The Senate passed the budget on <strong>Friday</strong>."
                );
            }
            other => panic!("expected text block, got {other:?}"),
        }

        match &article.content[1] {
            ContentBlock::Text { content, .. } => {
                assert_eq!(content.links().count(), 0);
                assert_eq!(content.tokens(), &[Inline::Text("No  links here.".to_string())]);
            }
            other => panic!("expected text block, got {other:?}"),
        }

        assert_eq!(article.content[2].text().as_deref(), Some("\"We did it,\" she said."));
        assert!(matches!(article.content[2], ContentBlock::Quote { .. }));

        assert_eq!(
            article.content[3],
            ContentBlock::Image {
                image_url: "https://a57.foxnews.com/img.jpg".to_string(),
                caption: "Senators leave the chamber.".to_string(),
                source: "(AP Photo)".to_string(),
                order: 3,
            }
        );
        assert_eq!(
            article.content[4],
            ContentBlock::Subheading {
                content: "WHAT COMES NEXT".to_string(),
                order: 4,
            }
        );
        assert_eq!(
            article.content[5],
            ContentBlock::Image {
                image_url: "https://a57.foxnews.com/two.jpg".to_string(),
                caption: "Only a caption.".to_string(),
                source: String::new(),
                order: 5,
            }
        );
    }

    #[test]
    fn test_parse_article_defaults_when_markup_missing() {
        let article = parse_article(ARTICLE_URL, "<html><body><p>nothing useful</p></body></html>");
        assert_eq!(article.metadata.headline, "No Headline");
        assert_eq!(article.metadata.author, "Unknown");
        assert_eq!(article.metadata.category, "Unknown");
        assert_eq!(article.metadata.published_date, "Unknown");
        assert_eq!(article.metadata.subheadline, None);
        assert!(article.content.is_empty());
    }

    #[test]
    fn test_date_falls_back_to_text() {
        let html = r#"<span class="article-date"><time>March 1, 2024</time></span>"#;
        let article = parse_article(ARTICLE_URL, html);
        assert_eq!(article.metadata.published_date, "March 1, 2024");
    }

    #[tokio::test]
    async fn test_extract_fetch_failure_is_none() {
        let fox = FoxNews::new(ScriptedFetcher::new(), 3);
        assert!(fox.extract(ARTICLE_URL).await.is_none());

        let fetcher = ScriptedFetcher::new().html(ARTICLE_URL, ARTICLE_HTML);
        let fox = FoxNews::new(fetcher, 3);
        let article = fox.extract(ARTICLE_URL).await.unwrap();
        assert_eq!(article.metadata.headline, "Senate passes bill");
    }
}

//! Markdown rendering of command results.
//!
//! Inline links inside text and quote blocks are rendered as `[text](url)`.

use crate::models::{AnalysisReport, Article, ArticleSummary, ContentBlock, KeywordStat};
use crate::sources::SourceInfo;
use std::fmt::Write;

/// Render search hits as a numbered list.
pub fn summaries_to_markdown(summaries: &[ArticleSummary]) -> String {
    if summaries.is_empty() {
        return "_No results._\n".to_string();
    }

    let mut md = String::from("# Search Results\n\n");
    for (i, s) in summaries.iter().enumerate() {
        let _ = writeln!(md, "{}. [{}]({})", i + 1, s.title, s.url);
        let _ = writeln!(md, "   - *{}* | {} | {}", s.source, s.category, s.date);
        if !s.description.is_empty() {
            let _ = writeln!(md, "   - {}", s.description);
        }
    }
    md
}

/// Render one article with its metadata header and body blocks.
pub fn article_to_markdown(article: &Article) -> String {
    let meta = &article.metadata;
    let mut md = format!("# {}\n\n", meta.headline);
    if let Some(sub) = &meta.subheadline {
        let _ = writeln!(md, "_{}_\n", sub);
    }
    let _ = writeln!(md, "**Source:** {}  ", meta.source);
    let _ = writeln!(md, "**Author:** {}  ", meta.author);
    let _ = writeln!(md, "**Published:** {}  ", meta.published_date);
    let _ = writeln!(md, "**Category:** {}  ", meta.category);
    let _ = writeln!(md, "**URL:** <{}>\n", meta.url);

    for block in &article.content {
        match block {
            ContentBlock::Text { content, .. } => {
                let _ = writeln!(md, "{}\n", content.to_markdown());
            }
            ContentBlock::Quote { content, .. } => {
                let _ = writeln!(md, "> {}\n", content.to_markdown());
            }
            ContentBlock::Image {
                image_url,
                caption,
                source,
                ..
            } => {
                let _ = writeln!(md, "![{}]({})", caption, image_url);
                match (caption.is_empty(), source.is_empty()) {
                    (true, true) => md.push('\n'),
                    (false, true) => {
                        let _ = writeln!(md, "*{}*\n", caption);
                    }
                    (true, false) => {
                        let _ = writeln!(md, "*{}*\n", source);
                    }
                    (false, false) => {
                        let _ = writeln!(md, "*{} ({})*\n", caption, source);
                    }
                }
            }
            ContentBlock::Subheading { content, .. } => {
                let _ = writeln!(md, "## {}\n", content);
            }
        }
    }
    md
}

/// Render several articles separated by horizontal rules.
pub fn articles_to_markdown(articles: &[Article]) -> String {
    articles
        .iter()
        .map(article_to_markdown)
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}

/// Render keyword counts as a table.
pub fn keywords_to_markdown(keywords: &[KeywordStat]) -> String {
    let mut md = String::from("| Keyword | Count |\n|---------|-------|\n");
    for k in keywords {
        let _ = writeln!(md, "| {} | {} |", k.word, k.count);
    }
    md
}

/// Render an analysis report.
pub fn report_to_markdown(report: &AnalysisReport) -> String {
    let mut md = format!("# Analysis: {}\n\n", report.title);
    let _ = writeln!(md, "**Source:** {}  ", report.source);
    let _ = writeln!(md, "**Published:** {}\n", report.date);
    md.push_str("## Statistics\n\n");
    let _ = writeln!(md, "- Sentences: {}", report.stats.sentence_count);
    let _ = writeln!(md, "- Words: {}", report.stats.word_count);
    let _ = writeln!(
        md,
        "- Average sentence length: {:.2} words\n",
        report.stats.avg_sentence_length
    );
    md.push_str("## Keywords\n\n");
    md.push_str(&keywords_to_markdown(&report.keywords));
    md
}

/// Render the source catalog.
pub fn sources_to_markdown(sources: &[SourceInfo]) -> String {
    let mut md = String::from("# Supported Sources\n\n");
    for s in sources {
        let _ = writeln!(md, "## {} (`{}`)\n", s.name, s.key);
        let _ = writeln!(md, "{}  ", s.description);
        let _ = writeln!(md, "<{}>\n", s.url);
        let _ = writeln!(md, "Topics: {}\n", s.topics.join(", "));
    }
    md
}

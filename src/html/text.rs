//! HTML to plain text using lol_html for streaming HTML processing

use lol_html::html_content::ContentType;
use lol_html::{doc_text, element, rewrite_str, RewriteStrSettings};

/// Errors during HTML conversion
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("HTML rewrite failed: {0}")]
    RewriteError(String),
}

/// Elements whose content is never readable text
const HIDDEN_ELEMENTS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe",
];

/// Elements that start a new line in rendered output
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "main", "aside", "nav", "li", "ul",
    "ol", "dl", "dt", "dd", "tr", "table", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
    "pre", "br", "hr",
];

/// Convert an HTML page into readable plain text.
///
/// Hidden content is dropped, block elements become line breaks, entities are
/// decoded and runs of whitespace are collapsed. Empty lines are removed.
pub fn html_to_text(html: &str) -> Result<String, HtmlError> {
    // First pass: strip hidden elements and mark block boundaries
    let mut handlers = Vec::with_capacity(HIDDEN_ELEMENTS.len() + BLOCK_ELEMENTS.len());
    for tag in HIDDEN_ELEMENTS {
        handlers.push(element!(*tag, |el| {
            el.remove();
            Ok(())
        }));
    }
    for tag in BLOCK_ELEMENTS {
        handlers.push(element!(*tag, |el| {
            el.before("\n", ContentType::Text);
            el.after("\n", ContentType::Text);
            Ok(())
        }));
    }

    let marked = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| HtmlError::RewriteError(e.to_string()))?;

    // Second pass: collect the remaining text nodes
    let mut raw = String::new();
    rewrite_str(
        &marked,
        RewriteStrSettings {
            document_content_handlers: vec![doc_text!(|chunk| {
                raw.push_str(chunk.as_str());
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| HtmlError::RewriteError(e.to_string()))?;

    let decoded = html_escape::decode_html_entities(&raw);

    let lines: Vec<String> = decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();

    Ok(lines.join("\n"))
}

//! HTML text and PDF-link extraction

use crate::fetchers::is_pdf_url;
use scraper::{Html, Node};
use url::Url;

/// Elements whose text is never visible
const SKIP_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Visible text and PDF links of one HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlDocument {
    /// Text nodes joined with single spaces
    pub visible_text: String,
    /// Absolute PDF links in document order, duplicates kept
    pub pdf_links: Vec<Url>,
}

/// Extract visible text and PDF links from HTML markup
///
/// Relative links are resolved against `base`. Malformed markup never
/// fails; the parser recovers and whatever text it finds is returned.
pub fn extract_html(markup: &str, base: &Url) -> HtmlDocument {
    let document = Html::parse_document(markup);
    let mut texts: Vec<&str> = Vec::new();
    let mut pdf_links = Vec::new();

    for node in document.tree.root().descendants() {
        match node.value() {
            // Whitespace-only nodes are kept; the line breaks between
            // elements stop the fact patterns from matching across them.
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                    Node::Element(element) => SKIP_ELEMENTS.contains(&element.name()),
                    _ => false,
                });
                if !hidden {
                    texts.push(text);
                }
            }
            Node::Element(element) if element.name() == "a" => {
                if let Some(link) = element.attr("href").and_then(|href| resolve_pdf_link(base, href)) {
                    pdf_links.push(link);
                }
            }
            _ => {}
        }
    }

    HtmlDocument {
        visible_text: texts.join(" "),
        pdf_links,
    }
}

fn resolve_pdf_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    is_pdf_url(&url).then_some(url)
}

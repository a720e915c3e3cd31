//! HTML metadata extraction
//!
//! Pulls the page title and meta description out of a document's `<head>`.
//! Parsing is lenient: malformed markup is repaired the way browsers do and
//! never produces an error.

use scraper::node::Element;
use scraper::{Html, Node};

/// Metadata extracted from a page's `<head>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// Text of the first child node of `<title>`, or empty
    pub title: String,

    /// `content` of `<meta name="description">`, or empty
    pub description: String,
}

/// Extracts the title and meta description from an HTML document
///
/// # Extraction Rules
///
/// - Only the first `<head>` element (document order) is searched, including
///   nested descendants.
/// - `<title>` yields the text of its first child node.
/// - `<meta name="description" content="...">` yields its `content`.
/// - When either appears more than once, the later one wins.
/// - Anything missing is left as an empty string.
///
/// # Example
///
/// ```
/// use url_meta_scraper::extract_metadata;
///
/// let html = r#"<html><head><title>T</title><meta name="description" content="D"></head></html>"#;
/// let metadata = extract_metadata(html);
/// assert_eq!(metadata.title, "T");
/// assert_eq!(metadata.description, "D");
/// ```
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    let mut metadata = PageMetadata::default();

    let head = document
        .tree
        .root()
        .descendants()
        .find(|node| matches!(node.value(), Node::Element(element) if element.name() == "head"));

    let Some(head) = head else {
        return metadata;
    };

    // Pre-order walk: children are pushed in reverse so they pop in order
    let mut stack: Vec<_> = head.children().rev().collect();
    while let Some(node) = stack.pop() {
        if let Node::Element(element) = node.value() {
            match element.name() {
                "title" => {
                    metadata.title = node
                        .first_child()
                        .and_then(|child| child.value().as_text())
                        .map(|text| String::from(&**text))
                        .unwrap_or_default();
                }
                "meta" => {
                    if let Some(content) = description_content(element) {
                        metadata.description = content.to_string();
                    }
                }
                _ => {}
            }
        }

        stack.extend(node.children().rev());
    }

    metadata
}

/// Returns the `content` attribute of a `<meta name="description">` element
fn description_content(element: &Element) -> Option<&str> {
    let is_description = element
        .attrs()
        .any(|(name, value)| name == "name" && value == "description");

    if !is_description {
        return None;
    }

    element
        .attrs()
        .filter(|(name, _)| *name == "content")
        .map(|(_, value)| value)
        .last()
}

// ABOUTME: Shared document helpers over dom_query: parsing, serialization and unwrapping.
// ABOUTME: Passes select with CSS and edit through NodeRef; this module holds the edits they share.

//! DOM utilities for HTML document manipulation.
//!
//! Documents are parsed into a `dom_query::Document`. Edits go through
//! `NodeRef`s taking `&self`, so a pass can hold a selection while it
//! rewrites the nodes in it.

pub use dom_query::{Document, Matcher, NodeRef, Selection};

/// Parses a complete HTML document; missing `html`/`head`/`body` are added.
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Serializes the whole document.
///
/// Nodes are written back as parsed: whitespace between them is kept and the
/// output is not re-indented.
pub fn to_html(doc: &Document) -> String {
    doc.html().to_string()
}

/// Replaces `node` with its own content, reparsed in its place.
pub fn unwrap(node: &NodeRef) {
    let inner = node.inner_html();
    node.replace_with_html(inner);
}

/// Unwraps every element `matcher` finds, outermost first, calling `each`
/// before each unwrap. Returns how many were unwrapped.
///
/// Unwrapping reparses the content, so nested matches are new nodes; they
/// are found again by selecting once per element counted up front.
pub fn unwrap_all(doc: &Document, matcher: &Matcher, mut each: impl FnMut(&NodeRef)) -> usize {
    let pending = doc.select_matcher(matcher).length();
    let mut unwrapped = 0;
    for _ in 0..pending {
        let matches = doc.select_matcher(matcher);
        let Some(node) = matches.nodes().first() else {
            break;
        };
        each(node);
        unwrap(node);
        unwrapped += 1;
    }
    unwrapped
}

/// True for a text node holding only whitespace.
pub fn is_blank_text(node: &NodeRef) -> bool {
    node.is_text() && node.text().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use pretty_assertions::assert_eq;

    static DIVS: Lazy<Matcher> = Lazy::new(|| Matcher::new("div").unwrap());

    #[test]
    fn parse_adds_document_skeleton() {
        let doc = parse("<p>x</p>");
        assert_eq!(to_html(&doc), "<html><head></head><body><p>x</p></body></html>");
    }

    #[test]
    fn serializer_keeps_parsed_whitespace() {
        let html = "<html><head></head><body>\n<div>\n    <p>a</p>\n</div>\n</body></html>";
        assert_eq!(to_html(&parse(html)), html);
    }

    #[test]
    fn unwrap_keeps_children_in_place() {
        let doc = parse("<body><p>a<span>b <i>c</i></span>d</p></body>");
        let span = doc.select("span");
        unwrap(&span.nodes()[0]);
        assert_eq!(doc.select("p").text().to_string(), "ab cd");
        assert!(!doc.select("span").exists());
        assert_eq!(doc.select("p i").length(), 1);
    }

    #[test]
    fn unwrap_all_reaches_nested_matches() {
        let doc = parse("<body><div><div><p>x</p></div></div><div>y</div></body>");
        let mut seen = 0;
        assert_eq!(unwrap_all(&doc, &DIVS, |_| seen += 1), 3);
        assert_eq!(seen, 3);
        assert_eq!(to_html(&doc), "<html><head></head><body><p>x</p>y</body></html>");
    }

    #[test]
    fn blank_text_detection() {
        let doc = parse("<body><p> </p><p>x</p></body>");
        let paragraphs = doc.select("p");
        let blank = paragraphs.nodes()[0].first_child().unwrap();
        let text = paragraphs.nodes()[1].first_child().unwrap();
        assert!(is_blank_text(&blank));
        assert!(!is_blank_text(&text));
    }
}

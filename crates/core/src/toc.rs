// ABOUTME: Rebuilds Word's flat MsoTocN paragraphs into one nested ordered list.
// ABOUTME: TocBuilder holds the level-comparison state; rebuild_toc feeds it from the document.

//! Table of contents reconstruction.
//!
//! Word exports its TOC as a run of sibling paragraphs classed `MsoToc1`,
//! `MsoToc2`, ... where the digit is the nesting depth. A single left-to-right
//! scan compares each entry's level with the previous one and emits list
//! markup accordingly:
//!
//! - same level: close the previous item
//! - one level up: close the nested list and its parent item
//! - deeper: open a new list (`<ol id="toc">` at the top)
//!
//! Only a decrease of one level per step is handled. Going from level 3
//! straight to level 1 pops a single list, and the parser repairs the rest.

use std::fmt;

use tracing::{debug, warn};

use crate::classify;
use crate::dom::{self, Document, NodeRef, Selection};

/// One piece of emitted list markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocToken {
    OpenList { top_level: bool },
    CloseItem,
    CloseListAndItem,
    OpenItem(String),
}

impl fmt::Display for TocToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TocToken::OpenList { top_level: true } => write!(f, "\n<ol id=\"toc\">\n"),
            TocToken::OpenList { top_level: false } => write!(f, "\n<ol>\n"),
            TocToken::CloseItem => write!(f, "</li>\n"),
            TocToken::CloseListAndItem => write!(f, "</ol>\n</li>\n"),
            TocToken::OpenItem(content) => write!(f, "<li>{}", content),
        }
    }
}

/// Level-comparison state of the TOC scan.
#[derive(Debug, Default)]
pub struct TocBuilder {
    previous_level: u8,
    open_lists: usize,
    tokens: Vec<TocToken>,
}

impl TocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry. `content` is `None` for an entry without a link: its
    /// level still drives the closing markup but no item is opened.
    pub fn push_entry(&mut self, level: u8, content: Option<String>) {
        use std::cmp::Ordering;

        match level.cmp(&self.previous_level) {
            Ordering::Equal => self.tokens.push(TocToken::CloseItem),
            Ordering::Less => {
                self.tokens.push(TocToken::CloseListAndItem);
                self.open_lists = self.open_lists.saturating_sub(1);
            }
            Ordering::Greater => {
                self.tokens.push(TocToken::OpenList {
                    top_level: self.previous_level == 0,
                });
                self.open_lists += 1;
            }
        }

        if let Some(content) = content {
            self.tokens.push(TocToken::OpenItem(content));
        }
        self.previous_level = level;
    }

    pub fn tokens(&self) -> &[TocToken] {
        &self.tokens
    }

    /// Lists opened and not yet closed by the scan.
    pub fn open_lists(&self) -> usize {
        self.open_lists
    }

    pub fn item_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| matches!(t, TocToken::OpenItem(_)))
            .count()
    }

    /// Renders the markup, closing every list the scan left open.
    pub fn finish(self) -> String {
        let mut out: String = self.tokens.iter().map(ToString::to_string).collect();
        for _ in 0..self.open_lists {
            out.push_str("</li>\n</ol>\n");
        }
        out
    }
}

fn toc_level_of(node: &NodeRef) -> Option<u8> {
    node.attr("class").and_then(|class| classify::toc_level(&class))
}

/// Flattens links of the shallow TOC levels to their text and strips the
/// outline and page numbers from it.
fn strip_page_numbers(doc: &Document) {
    for link in doc.select_matcher(&classify::TOC_LINK_MATCHER).nodes() {
        let text = classify::strip_toc_link_text(&link.text());
        link.set_text(text);
    }
}

/// Turns hard line breaks inside the entry into single spaces.
fn collapse_line_breaks(entry: &NodeRef) {
    let inner = entry.inner_html();
    if inner.contains('\n') {
        entry.set_html(inner.replace("\r\n", " ").replace('\n', " "));
    }
}

/// Rewrites the entry's links and returns the markup for its list item, or
/// `None` when the entry holds no link.
fn entry_content(entry: &NodeRef) -> Option<String> {
    let links = Selection::from(entry.clone()).select("a");
    let link = links.nodes().first()?;

    let inner = link.inner_html();
    let stripped = classify::strip_leading_page_number(&inner);
    if stripped != *inner {
        link.set_html(stripped);
    }

    for anchor in links.nodes() {
        if let Some(href) = anchor.attr("href").and_then(|href| classify::rewrite_toc_href(&href)) {
            anchor.set_attr("href", &href);
        }
    }

    Some(entry.inner_html().to_string())
}

/// Next sibling element of a TOC entry, skipping whitespace and comments.
/// Any other text ends the TOC.
fn next_entry<'a>(entry: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut next = entry.next_sibling();
    while let Some(sibling) = next {
        if sibling.is_element() {
            return Some(sibling);
        }
        if !sibling.is_comment() && !dom::is_blank_text(&sibling) {
            return None;
        }
        next = sibling.next_sibling();
    }
    None
}

/// Replaces the flat `MsoTocN` paragraphs with a nested `<ol id="toc">`.
///
/// Returns the number of list items written. Documents without an `MsoToc1`
/// entry are left untouched.
pub fn rebuild_toc(doc: &Document) -> usize {
    let Some(first) = doc
        .select_matcher(&classify::TOC_FIRST_MATCHER)
        .nodes()
        .first()
        .cloned()
    else {
        debug!("no table of contents found");
        return 0;
    };

    strip_page_numbers(doc);

    let mut builder = TocBuilder::new();
    let mut scanned = Vec::new();
    let mut current = Some(first.clone());

    while let Some(entry) = current {
        let Some(level) = toc_level_of(&entry) else {
            break;
        };
        collapse_line_breaks(&entry);

        let content = entry_content(&entry);
        if content.is_none() {
            warn!(entry = %entry.html(), "table of contents entry has no link");
        }
        builder.push_entry(level, content);

        current = next_entry(&entry);
        scanned.push(entry);
    }

    let items = builder.item_count();
    let markup = builder.finish();

    for entry in scanned.iter().skip(1) {
        entry.remove_from_parent();
    }
    first.replace_with_html(markup);
    doc.select_matcher(&classify::TOC_ENTRY_MATCHER).remove();

    debug!(items, "rebuilt table of contents");
    items
}

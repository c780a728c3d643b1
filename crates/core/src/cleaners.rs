// ABOUTME: Single-purpose rewrite passes that strip Word export artifacts from a document.
// ABOUTME: Each pass selects its targets with CSS, edits them in place, and returns how many it changed.

//! Transformation passes.
//!
//! Every pass selects its targets first and then edits them, so rewrites
//! never disturb the traversal. Running a pass twice in a row is a no-op:
//! what a pass removes cannot be found by it again.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::classify::{
    self, BLOCK_BREAK_MATCHER, HEADING_MATCHER, SECTION_MATCHER, UNWANTED_CLASS_MATCHER,
};
use crate::dom::{self, Document, Matcher, NodeRef, Selection};

/// Deletes `<meta name="Generator">`.
pub fn remove_generator_meta(doc: &Document) -> usize {
    let mut removed = 0;
    for meta in doc.select("meta[name]").nodes() {
        if meta.attr("name").is_some_and(|name| classify::is_generator_name(&name)) {
            meta.remove_from_parent();
            removed += 1;
        }
    }
    if removed > 0 {
        debug!(removed, "removed generator meta");
    }
    removed
}

/// Every `href` in the document.
fn link_targets(doc: &Document) -> HashSet<String> {
    doc.select("a[href]")
        .nodes()
        .iter()
        .filter_map(|a| a.attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Unwraps `<a name>` bookmarks nothing links to, keeping their content.
///
/// A `_Toc` bookmark also counts as linked from `#Toc...`, so bookmarks the
/// TOC rebuild pointed at survive later runs.
pub fn prune_abandoned_anchors(doc: &Document) -> usize {
    let targets = link_targets(doc);
    let mut removed = 0;
    for anchor in doc.select("a[name]").nodes() {
        let Some(name) = anchor.attr("name") else {
            continue;
        };
        let linked = classify::bookmark_hrefs(&name)
            .iter()
            .any(|href| targets.contains(href));
        if !linked {
            info!(anchor = %name, "<a name=\"{}\"> was removed, because it had no links to it", name);
            dom::unwrap(anchor);
            removed += 1;
        }
    }
    removed
}

/// Moves bookmark names onto headings as ids and strips outline numbers.
///
/// For each `h1`-`h6`, the first `<a name>` inside becomes the heading's `id`
/// (`_Toc123` -> `Toc123`) and is unwrapped. A leading number such as `2.1`
/// is then removed from the heading content, which is trimmed.
pub fn clean_headings(doc: &Document) -> usize {
    let mut changed = 0;
    for heading in doc.select_matcher(&HEADING_MATCHER).nodes() {
        let mut touched = false;

        let anchors = Selection::from(heading.clone()).select("a[name]");
        if let Some(anchor) = anchors.nodes().first() {
            if let Some(name) = anchor.attr("name") {
                heading.set_attr("id", &classify::toc_anchor_id(&name));
                dom::unwrap(anchor);
                touched = true;
            }
        }

        let inner = heading.inner_html();
        let stripped = classify::strip_numbering_prefix(&inner);
        if stripped != *inner {
            heading.set_html(stripped);
            touched = true;
        }

        if touched {
            changed += 1;
        }
    }
    changed
}

/// Drops the whole `class` attribute of elements carrying a generator class.
pub fn strip_unwanted_classes(doc: &Document) -> usize {
    let targets = doc.select_matcher(&UNWANTED_CLASS_MATCHER);
    targets.remove_attr("class");
    targets.length()
}

/// Unwraps `WordSectionN` containers.
pub fn unwrap_sections(doc: &Document) -> usize {
    dom::unwrap_all(doc, &SECTION_MATCHER, |section| {
        info!(
            "Removing {}.{}",
            section.node_name().unwrap_or_default(),
            section.attr("class").unwrap_or_default()
        );
    })
}

/// True if the paragraph has no visible text and no image.
pub fn is_empty_paragraph(p: &NodeRef) -> bool {
    let text = classify::strip_nbsp_artifacts(&p.text());
    text.trim().is_empty() && !Selection::from(p.clone()).select("img").exists()
}

/// Removes paragraphs that render as nothing.
pub fn remove_empty_paragraphs(doc: &Document) -> usize {
    let mut removed = 0;
    for p in doc.select("p").nodes() {
        if is_empty_paragraph(p) {
            info!("Removing empty paragraph.");
            p.remove_from_parent();
            removed += 1;
        }
    }
    removed
}

fn remove_matching(doc: &Document, css: &str) -> usize {
    let targets = doc.select(css);
    targets.remove();
    targets.length()
}

/// Removes a `<br>` directly after a table.
pub fn remove_trailing_table_breaks(doc: &Document) -> usize {
    remove_matching(doc, "table + br")
}

/// Removes a `<br>` directly after any block element.
pub fn remove_breaks_after_blocks(doc: &Document) -> usize {
    let breaks = doc.select_matcher(&BLOCK_BREAK_MATCHER);
    breaks.remove();
    breaks.length()
}

/// Counts of changes made by [`accept_tracked_changes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackedChanges {
    pub deletions: usize,
    pub insertions: usize,
}

static INSERTIONS: Lazy<Matcher> = Lazy::new(|| Matcher::new("ins").unwrap());

/// Accepts Word change tracking: deletions are dropped, insertions kept.
pub fn accept_tracked_changes(doc: &Document) -> TrackedChanges {
    let deletions = remove_matching(doc, "del");
    let insertions = dom::unwrap_all(doc, &INSERTIONS, |_| {});
    TrackedChanges {
        deletions,
        insertions,
    }
}

/// Shifts `h1`-`h5` one level down. `h6` stays, so it can end up sharing
/// its level with former `h5`s.
pub fn demote_headings(doc: &Document) -> usize {
    let headings = doc.select("h1, h2, h3, h4, h5");
    for heading in headings.nodes() {
        let level = heading
            .node_name()
            .and_then(|name| name[1..].parse::<u8>().ok());
        if let Some(level) = level {
            heading.rename(&format!("h{}", level + 1));
        }
    }
    headings.length()
}

/// Removes `<script>` elements from `<head>`.
pub fn remove_header_scripts(doc: &Document) -> usize {
    remove_matching(doc, "head script")
}

/// Appends a comment as the last child of `<html>`.
pub fn append_signature(doc: &Document, text: &str) -> bool {
    let html = doc.select("html");
    if !html.exists() {
        return false;
    }
    html.append_html(format!("<!-- {} -->", text.trim()));
    true
}

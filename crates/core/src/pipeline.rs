// ABOUTME: Runs the cleaning passes over one document in their fixed order.
// ABOUTME: remove_artifacts is the core composite; clean adds the optional passes from CleanOptions.

//! Pass orchestration.
//!
//! Order matters: anchors are pruned before headings consume the bookmarks
//! that remain, and sections are unwrapped before empty paragraphs are
//! looked for because unwrapping exposes new paragraphs.

use serde::Serialize;
use tracing::debug;

use crate::cleaners;
use crate::dom::Document;
use crate::options::{ArtifactOptions, CleanOptions};
use crate::toc;

/// How many nodes each pass touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub generator_meta: usize,
    pub anchors_unwrapped: usize,
    pub headings_cleaned: usize,
    pub classes_stripped: usize,
    pub sections_unwrapped: usize,
    pub toc_entries: usize,
    pub empty_paragraphs: usize,
    pub table_breaks: usize,
    pub tracked_deletions: usize,
    pub tracked_insertions: usize,
    pub header_scripts: usize,
    pub headings_demoted: usize,
    pub block_breaks: usize,
}

/// Strips Word export artifacts from `doc`.
///
/// Runs, in order: generator meta removal, anchor pruning, heading cleanup,
/// class stripping, section unwrapping, TOC rebuild (if enabled), empty
/// paragraph removal and removal of breaks trailing tables.
pub fn remove_artifacts(doc: &Document, opts: &ArtifactOptions) -> CleanReport {
    let mut report = CleanReport {
        generator_meta: cleaners::remove_generator_meta(doc),
        anchors_unwrapped: cleaners::prune_abandoned_anchors(doc),
        headings_cleaned: cleaners::clean_headings(doc),
        classes_stripped: cleaners::strip_unwanted_classes(doc),
        sections_unwrapped: cleaners::unwrap_sections(doc),
        ..CleanReport::default()
    };
    if opts.rebuild_toc {
        report.toc_entries = toc::rebuild_toc(doc);
    }
    report.empty_paragraphs = cleaners::remove_empty_paragraphs(doc);
    report.table_breaks = cleaners::remove_trailing_table_breaks(doc);

    debug!(?report, "removed word artifacts");
    report
}

/// Runs [`remove_artifacts`] followed by every optional pass enabled in `opts`.
pub fn clean(doc: &Document, opts: &CleanOptions) -> CleanReport {
    let mut report = remove_artifacts(doc, &opts.artifacts);

    if opts.accept_tracked_changes {
        let changes = cleaners::accept_tracked_changes(doc);
        report.tracked_deletions = changes.deletions;
        report.tracked_insertions = changes.insertions;
    }
    if opts.remove_header_scripts {
        report.header_scripts = cleaners::remove_header_scripts(doc);
    }
    if opts.demote_headings {
        report.headings_demoted = cleaners::demote_headings(doc);
    }
    if opts.remove_breaks_after_blocks {
        report.block_breaks = cleaners::remove_breaks_after_blocks(doc);
    }
    if let Some(signature) = &opts.signature {
        cleaners::append_signature(doc, signature);
    }
    report
}

// ABOUTME: Main library entry point for wordclean, a cleaner for HTML exported by MS Word.
// ABOUTME: Re-exports the public API: Cleaner, CleanerBuilder, Editor, CleanOptions, CleanReport, CleanError.

//! wordclean - strips MS Word export artifacts from HTML documents.
//!
//! Word's "Save as HTML" leaves generator tags, `Mso*` classes, section
//! wrappers, empty paragraphs and bookmark anchors behind, and flattens the
//! table of contents into numbered paragraphs. This crate removes those
//! artifacts and rebuilds the table of contents as a nested `<ol id="toc">`.
//!
//! # Example
//!
//! ```
//! use wordclean_core::Cleaner;
//!
//! let cleaner = Cleaner::builder().demote_headings(true).build();
//! let (html, report) =
//!     cleaner.clean_html(r##"<p><a href="#_Toc1">see</a></p><h1><a name="_Toc1">1. Intro</a></h1>"##);
//! assert_eq!(report.headings_cleaned, 1);
//! assert!(html.contains(r#"<h2 id="Toc1">Intro</h2>"#));
//! ```

pub mod classify;
pub mod cleaner;
pub mod cleaners;
pub mod dom;
pub mod editor;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod toc;

pub use crate::cleaner::{Cleaner, EditSummary, FileOutcome};
pub use crate::dom::Document;
pub use crate::editor::{declare_charset, is_html_file, Editor};
pub use crate::error::{CleanError, ErrorCode, Result};
pub use crate::options::{ArtifactOptions, CleanOptions, CleanerBuilder};
pub use crate::pipeline::{clean, remove_artifacts, CleanReport};

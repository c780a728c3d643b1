// ABOUTME: Cleaner applies one CleanOptions to strings, documents, files, folders and file lists.
// ABOUTME: Batch operations log per-file failures and continue, returning an EditSummary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::dom::{self, Document};
use crate::editor::{is_html_file, Editor};
use crate::error::{CleanError, Result};
use crate::options::{CleanOptions, CleanerBuilder};
use crate::pipeline::{self, CleanReport};

/// What happened to one file of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CleanReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a folder or list edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditSummary {
    pub files: Vec<FileOutcome>,
    pub edited: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl EditSummary {
    /// Adds the outcome of one edit.
    pub fn record(&mut self, path: &Path, result: Result<CleanReport>) {
        let path = path.display().to_string();
        match result {
            Ok(report) => {
                self.edited += 1;
                self.files.push(FileOutcome {
                    path,
                    report: Some(report),
                    error: None,
                });
            }
            Err(e) => {
                error!("{}", e);
                self.failed += 1;
                self.files.push(FileOutcome {
                    path,
                    report: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    pub fn skip(&mut self, path: &Path) {
        debug!("Skipping {}", path.display());
        self.skipped += 1;
    }

    /// Folds another summary into this one.
    pub fn merge(&mut self, other: EditSummary) {
        self.files.extend(other.files);
        self.edited += other.edited;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Configured entry point for cleaning Word HTML.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    opts: CleanOptions,
}

impl Cleaner {
    pub fn builder() -> CleanerBuilder {
        CleanerBuilder::new()
    }

    pub fn new(opts: CleanOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CleanOptions {
        &self.opts
    }

    /// Cleans a document in place.
    pub fn clean_document(&self, doc: &Document) -> CleanReport {
        pipeline::clean(doc, &self.opts)
    }

    /// Parses, cleans and re-serializes an HTML string.
    pub fn clean_html(&self, html: &str) -> (String, CleanReport) {
        let doc = dom::parse(html);
        let report = self.clean_document(&doc);
        (dom::to_html(&doc), report)
    }

    /// Cleans a file and writes it back in place.
    pub fn edit_file(&self, path: impl AsRef<Path>) -> Result<CleanReport> {
        let path = path.as_ref();
        self.edit_file_as(path, path)
    }

    /// Cleans `input` and writes the result to `output`.
    pub fn edit_file_as(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<CleanReport> {
        let mut editor = Editor::open(input, &self.opts.input_encoding)?;
        debug!(encoding = editor.encoding().name(), "decoded {}", editor.path().display());
        let report = editor.clean(&self.opts);
        editor.save_as(output, &self.opts.output_encoding)?;
        Ok(report)
    }

    /// Cleans every `.html`/`.htm` file directly inside `dir`, in path order.
    pub fn edit_folder(&self, dir: impl AsRef<Path>) -> Result<EditSummary> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir)
            .map_err(|e| CleanError::io(dir.display().to_string(), "read folder", Some(e.into())))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        info!("Editing {} files in {}", paths.len(), dir.display());
        let mut summary = EditSummary::default();
        for path in paths {
            if is_html_file(&path) {
                summary.record(&path, self.edit_file(&path));
            } else {
                summary.skip(&path);
            }
        }
        Ok(summary)
    }

    /// Cleans every file named in `list_file`, one path per line.
    ///
    /// Lines starting with `#` are comments; surrounding whitespace is
    /// ignored; missing and non-HTML paths are skipped.
    pub fn bulk_edit(&self, list_file: impl AsRef<Path>) -> Result<EditSummary> {
        let list_file = list_file.as_ref();
        let list = fs::read_to_string(list_file).map_err(|e| {
            CleanError::io(list_file.display().to_string(), "read list", Some(e.into()))
        })?;

        let mut summary = EditSummary::default();
        for line in list.lines() {
            if line.starts_with('#') {
                continue;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let path = Path::new(line);
            if path.is_file() && is_html_file(path) {
                summary.record(path, self.edit_file(path));
            } else {
                summary.skip(path);
            }
        }
        Ok(summary)
    }
}

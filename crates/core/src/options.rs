// ABOUTME: Configuration for wordclean: ArtifactOptions, CleanOptions and CleanerBuilder.
// ABOUTME: CleanOptions loads from JSON; CleanerBuilder provides a fluent API for constructing a Cleaner.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cleaner::Cleaner;
use crate::error::{CleanError, Result};

/// Options of the composite artifact-removal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactOptions {
    /// Rebuild the MsoTocN paragraphs into a nested list. When false they are
    /// left untouched.
    pub rebuild_toc: bool,
}

impl Default for ArtifactOptions {
    fn default() -> Self {
        Self { rebuild_toc: true }
    }
}

/// Everything a [`Cleaner`] does to each document.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "rebuild_toc": false, "demote_headings": true, "output_encoding": "windows-1252" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    #[serde(flatten)]
    pub artifacts: ArtifactOptions,
    pub accept_tracked_changes: bool,
    pub remove_header_scripts: bool,
    pub demote_headings: bool,
    pub remove_breaks_after_blocks: bool,
    /// Comment appended to `<html>` after cleaning.
    pub signature: Option<String>,
    /// Encoding label of input files, or `auto` to detect it.
    pub input_encoding: String,
    pub output_encoding: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            artifacts: ArtifactOptions::default(),
            accept_tracked_changes: false,
            remove_header_scripts: false,
            demote_headings: false,
            remove_breaks_after_blocks: false,
            signature: None,
            input_encoding: "utf-8".to_string(),
            output_encoding: "utf-8".to_string(),
        }
    }
}

impl CleanOptions {
    /// Parses options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CleanError::config("<json>", "parse options", Some(e.into())))
    }

    /// Reads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let json = fs::read_to_string(path)
            .map_err(|e| CleanError::io(&display, "read options", Some(e.into())))?;
        serde_json::from_str(&json)
            .map_err(|e| CleanError::config(&display, "parse options", Some(e.into())))
    }
}

/// Builder for constructing Cleaner instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct CleanerBuilder {
    opts: CleanOptions,
}

impl CleanerBuilder {
    /// Create a new CleanerBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: CleanOptions::default(),
        }
    }

    /// Start from a complete set of options, e.g. loaded from a file.
    pub fn options(mut self, opts: CleanOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn rebuild_toc(mut self, rebuild: bool) -> Self {
        self.opts.artifacts.rebuild_toc = rebuild;
        self
    }

    pub fn accept_tracked_changes(mut self, accept: bool) -> Self {
        self.opts.accept_tracked_changes = accept;
        self
    }

    pub fn remove_header_scripts(mut self, remove: bool) -> Self {
        self.opts.remove_header_scripts = remove;
        self
    }

    pub fn demote_headings(mut self, demote: bool) -> Self {
        self.opts.demote_headings = demote;
        self
    }

    pub fn remove_breaks_after_blocks(mut self, remove: bool) -> Self {
        self.opts.remove_breaks_after_blocks = remove;
        self
    }

    /// Append `<!-- text -->` to every cleaned document.
    pub fn signature(mut self, text: impl Into<String>) -> Self {
        self.opts.signature = Some(text.into());
        self
    }

    pub fn input_encoding(mut self, label: impl Into<String>) -> Self {
        self.opts.input_encoding = label.into();
        self
    }

    pub fn output_encoding(mut self, label: impl Into<String>) -> Self {
        self.opts.output_encoding = label.into();
        self
    }

    /// Build the Cleaner with the configured options.
    pub fn build(self) -> Cleaner {
        Cleaner::new(self.opts)
    }
}

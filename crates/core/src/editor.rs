// ABOUTME: File-level editor owning one parsed document: open with an encoding, edit, save.
// ABOUTME: Decodes with encoding_rs (or chardetng for "auto"), declares the output charset, refuses read-only files.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{info, warn};

use crate::cleaners::{self, TrackedChanges};
use crate::dom::{self, Document};
use crate::error::{CleanError, Result};
use crate::options::{ArtifactOptions, CleanOptions};
use crate::pipeline::{self, CleanReport};

/// Encoding label that asks for detection instead of a declared encoding.
pub const AUTO_ENCODING: &str = "auto";

/// Returns true for paths with an `.html` or `.htm` extension.
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

fn lookup_encoding(label: &str, path: &Path, op: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| CleanError::encoding(path.display().to_string(), op, label))
}

/// Decodes `bytes` with the encoding named by `label`, or a detected one for
/// `auto`. A byte order mark wins over the label.
pub fn decode(bytes: &[u8], label: &str, path: &Path) -> Result<(String, &'static Encoding)> {
    let encoding = if label.eq_ignore_ascii_case(AUTO_ENCODING) {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(None, true)
    } else {
        lookup_encoding(label, path, "decode")?
    };

    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(path = %path.display(), encoding = used.name(), "malformed input replaced");
    }
    Ok((decoded.into_owned(), used))
}

// The charset parameter of a Content-Type value
static CHARSET_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(charset\s*=\s*)[^\s;"']+"#).unwrap());

/// Points `<meta charset>` and `<meta http-equiv="Content-Type">` at
/// `encoding`. Returns how many declarations were rewritten.
pub fn declare_charset(doc: &Document, encoding: &'static Encoding) -> usize {
    let charset = encoding.name().to_ascii_lowercase();
    let mut rewritten = 0;

    for meta in doc.select("meta[charset]").nodes() {
        meta.set_attr("charset", &charset);
        rewritten += 1;
    }

    for meta in doc.select("meta[http-equiv][content]").nodes() {
        let is_content_type = meta
            .attr("http-equiv")
            .is_some_and(|equiv| equiv.trim().eq_ignore_ascii_case("content-type"));
        let Some(content) = meta.attr("content").filter(|_| is_content_type) else {
            continue;
        };
        if CHARSET_PARAM_RE.is_match(&content) {
            let updated = CHARSET_PARAM_RE
                .replace(&content, |caps: &Captures| format!("{}{}", &caps[1], charset));
            meta.set_attr("content", &updated);
            rewritten += 1;
        }
    }
    rewritten
}

/// One HTML file opened for editing.
pub struct Editor {
    path: PathBuf,
    document: Document,
    encoding: &'static Encoding,
}

impl Editor {
    /// Reads and parses `path`, decoding with `input_encoding`.
    pub fn open(path: impl AsRef<Path>, input_encoding: &str) -> Result<Editor> {
        let path = path.as_ref();
        info!("R: {}", path.display());
        let bytes = fs::read(path)
            .map_err(|e| CleanError::io(path.display().to_string(), "open", Some(e.into())))?;
        let (html, encoding) = decode(&bytes, input_encoding, path)?;
        Ok(Editor {
            path: path.to_path_buf(),
            document: dom::parse(&html),
            encoding,
        })
    }

    /// Wraps already decoded HTML; `path` is where [`Editor::save`] writes.
    pub fn from_html(path: impl Into<PathBuf>, html: &str) -> Editor {
        Editor {
            path: path.into(),
            document: dom::parse(html),
            encoding: encoding_rs::UTF_8,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The encoding the input was actually decoded with.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Cleanup after MS Word.
    pub fn remove_word_artifacts(&mut self, opts: &ArtifactOptions) -> CleanReport {
        pipeline::remove_artifacts(&self.document, opts)
    }

    /// Artifact removal plus the optional passes enabled in `opts`.
    pub fn clean(&mut self, opts: &CleanOptions) -> CleanReport {
        pipeline::clean(&self.document, opts)
    }

    pub fn accept_word_changes_tracked(&mut self) -> TrackedChanges {
        cleaners::accept_tracked_changes(&self.document)
    }

    pub fn demote_headings(&mut self) -> usize {
        cleaners::demote_headings(&self.document)
    }

    pub fn remove_break_after_block(&mut self) -> usize {
        cleaners::remove_breaks_after_blocks(&self.document)
    }

    pub fn remove_header_scripts(&mut self) -> usize {
        cleaners::remove_header_scripts(&self.document)
    }

    pub fn to_html(&self) -> String {
        dom::to_html(&self.document)
    }

    /// Serializes the document in `output_encoding`, first declaring that
    /// encoding in its charset meta tags. Characters the encoding cannot
    /// represent become numeric character references.
    pub fn to_bytes(&mut self, output_encoding: &str) -> Result<Vec<u8>> {
        let path = self.path.clone();
        self.encode_for(output_encoding, &path)
    }

    fn encode_for(&mut self, output_encoding: &str, target: &Path) -> Result<Vec<u8>> {
        let encoding = lookup_encoding(output_encoding, target, "encode")?.output_encoding();
        declare_charset(&self.document, encoding);
        let html = self.to_html();
        let (bytes, _, _) = encoding.encode(&html);
        Ok(bytes.into_owned())
    }

    /// Writes the document back to the file it was opened from.
    pub fn save(&mut self, output_encoding: &str) -> Result<()> {
        let path = self.path.clone();
        self.save_as(&path, output_encoding)
    }

    /// Writes the document to `path`, refusing existing read-only files.
    pub fn save_as(&mut self, path: impl AsRef<Path>, output_encoding: &str) -> Result<()> {
        let path = path.as_ref();
        info!("W: {}", path.display());

        if let Ok(meta) = fs::metadata(path) {
            if meta.permissions().readonly() {
                return Err(CleanError::read_only(path.display().to_string(), "save"));
            }
        }

        let bytes = self.encode_for(output_encoding, path)?;
        fs::write(path, bytes)
            .map_err(|e| CleanError::io(path.display().to_string(), "save", Some(e.into())))
    }
}

// ABOUTME: Error types for wordclean including the ErrorCode enum and CleanError struct.
// ABOUTME: Provides categorized file-level errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of editor failures.
///
/// The cleaning passes themselves never fail; these cover reading, decoding,
/// configuring and writing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Io,
    Encoding,
    Config,
    ReadOnly,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Io => "I/O error",
            ErrorCode::Encoding => "unsupported encoding",
            ErrorCode::Config => "invalid configuration",
            ErrorCode::ReadOnly => "read only",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for editor operations.
#[derive(Debug, thiserror::Error)]
pub struct CleanError {
    pub code: ErrorCode,
    pub path: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for CleanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wordclean: {} {}: {}", self.op, self.path, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl CleanError {
    fn new(
        code: ErrorCode,
        path: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            path: path.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Io error.
    pub fn io(path: impl Into<String>, op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Io, path, op, source)
    }

    /// Create an Encoding error for an unknown encoding label.
    pub fn encoding(path: impl Into<String>, op: impl Into<String>, label: &str) -> Self {
        Self::new(
            ErrorCode::Encoding,
            path,
            op,
            Some(anyhow::anyhow!("unknown encoding label {:?}", label)),
        )
    }

    /// Create a Config error.
    pub fn config(
        path: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Config, path, op, source)
    }

    /// Create a ReadOnly error.
    pub fn read_only(path: impl Into<String>, op: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReadOnly, path, op, None)
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }

    /// Returns true if this is an Encoding error.
    pub fn is_encoding(&self) -> bool {
        self.code == ErrorCode::Encoding
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }

    /// Returns true if this is a ReadOnly error.
    pub fn is_read_only(&self) -> bool {
        self.code == ErrorCode::ReadOnly
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CleanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_path_code_and_source() {
        let err = CleanError::encoding("a.html", "open", "klingon");
        assert!(err.is_encoding());
        assert_eq!(
            err.to_string(),
            "wordclean: open a.html: unsupported encoding: unknown encoding label \"klingon\""
        );
    }

    #[test]
    fn read_only_has_no_source() {
        let err = CleanError::read_only("b.html", "save");
        assert!(err.is_read_only());
        assert!(!err.is_io());
        assert_eq!(err.to_string(), "wordclean: save b.html: read only");
    }
}

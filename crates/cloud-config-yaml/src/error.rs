//! Error types for YAML parsing with source lines.

use thiserror::Error;

/// Result type alias for cloud-config-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a [`Node`](crate::Node) tree.
///
/// Messages never mention the line; it is carried separately and available
/// through [`Error::line`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The scanner or parser lost synchronization.
    #[error("{message}")]
    Syntax {
        message: String,
        line: usize,
        col: usize,
    },

    /// The input is not valid UTF-8.
    #[error("document is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    /// A `!!binary` scalar whose text is not base64.
    #[error("!!binary value contains invalid base64 data")]
    InvalidBinary { line: usize },

    /// The stream holds more than one document.
    #[error("expected a single document in the stream")]
    MultipleDocuments { line: usize },

    /// Aliases expand to more nodes than a document may hold.
    #[error("aliases expand to more than {limit} nodes")]
    AliasExpansion { line: usize, limit: usize },
}

impl Error {
    /// The 1-based line at which parsing failed.
    pub fn line(&self) -> usize {
        match self {
            Error::Syntax { line, .. }
            | Error::InvalidUtf8 { line }
            | Error::InvalidBinary { line }
            | Error::MultipleDocuments { line }
            | Error::AliasExpansion { line, .. } => *line,
        }
    }

    /// Convert a scanner failure on `content`.
    ///
    /// The line is derived from the marker's character index and capped at
    /// the last non-blank line: at end of input the scanner's own line
    /// counter already points past it.
    pub(crate) fn from_scan(err: &yaml_rust2::ScanError, content: &str) -> Self {
        let marker = err.marker();
        let line = 1 + content
            .chars()
            .take(marker.index())
            .filter(|c| *c == '\n')
            .count();
        Error::Syntax {
            message: err.info().to_string(),
            line: line.min(content.trim_end().lines().count().max(1)),
            // yaml-rust2 columns count from 0
            col: marker.col() + 1,
        }
    }
}

//! Error types for document conversion.

use thiserror::Error;

/// Result type for format operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors that can occur while reading, writing or converting documents.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The text could not be read under strict parsing.
    #[error("Malformed input at line {line}: {reason}")]
    Malformed {
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The parsed document violates a structural invariant.
    #[error("Invalid document: {0}")]
    InvalidDocument(#[from] DocumentError),

    /// JSON snapshot serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormatError {
    /// Build a [`FormatError::Malformed`] for the given line.
    #[must_use]
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Structural invariant violations of a [`crate::Document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// `currentPageId` names a page the document does not contain.
    #[error("Current page not found: {0:?}")]
    UnknownCurrentPage(String),

    /// Two pages share an id.
    #[error("Duplicate page id: {0}")]
    DuplicatePageId(String),

    /// Two shapes share an id (ids are unique document-wide).
    #[error("Duplicate shape id: {0}")]
    DuplicateShapeId(String),

    /// Two assets share an id.
    #[error("Duplicate asset id: {0}")]
    DuplicateAssetId(String),
}

/// Errors reported by a [`crate::host::CanvasHost`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The page does not exist in the host.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A page with this id already exists.
    #[error("Page already exists: {0}")]
    PageExists(String),

    /// A shape with this id already exists.
    #[error("Shape already exists: {0}")]
    ShapeExists(String),

    /// An asset with this id already exists.
    #[error("Asset already exists: {0}")]
    AssetExists(String),

    /// Host-specific failure.
    #[error("Host error: {0}")]
    Other(String),
}

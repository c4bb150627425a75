//! Filesystem persistence for documents.
//!
//! Thin wrappers around `std::fs`: I/O errors are returned unchanged as
//! [`FormatError::Io`].

use std::fs;
use std::path::Path;

use crate::format;
use crate::{Document, FormatConfig, FormatResult};

/// Save a document with the default configuration.
///
/// # Errors
///
/// Returns [`crate::FormatError::Io`] if the file cannot be written.
pub fn save(path: impl AsRef<Path>, document: &Document) -> FormatResult<()> {
    save_with(path, document, &FormatConfig::default())
}

/// Save a document, writing the title from `config`.
///
/// # Errors
///
/// Returns [`crate::FormatError::Io`] if the file cannot be written.
pub fn save_with(
    path: impl AsRef<Path>,
    document: &Document,
    config: &FormatConfig,
) -> FormatResult<()> {
    let path = path.as_ref();
    let text = format::serialize_with(document, config);
    fs::write(path, text)?;
    tracing::info!(
        "Saved {} pages, {} assets to {}",
        document.pages.len(),
        document.assets.len(),
        path.display()
    );
    Ok(())
}

/// Load a document leniently.
///
/// # Errors
///
/// Returns [`crate::FormatError::Io`] if the file cannot be read.
pub fn load(path: impl AsRef<Path>) -> FormatResult<Document> {
    load_with(path, &FormatConfig::default())
}

/// Load a document under `config.strictness`.
///
/// # Errors
///
/// Returns [`crate::FormatError::Io`] if the file cannot be read, and in
/// strict mode any error of [`format::deserialize_with`].
pub fn load_with(path: impl AsRef<Path>, config: &FormatConfig) -> FormatResult<Document> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let document = format::deserialize_with(&text, config)?;
    tracing::info!(
        "Loaded {} pages, {} assets from {}",
        document.pages.len(),
        document.assets.len(),
        path.display()
    );
    Ok(document)
}

/// Append text to an existing file, separated by a blank line.
///
/// # Errors
///
/// Returns [`crate::FormatError::Io`] if the file cannot be read or written.
pub fn append_content(path: impl AsRef<Path>, content: &str) -> FormatResult<()> {
    let path = path.as_ref();
    let current = fs::read_to_string(path)?;
    fs::write(path, format!("{current}\n\n{content}"))?;
    tracing::debug!("Appended {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Check whether a file's text contains `item` (a page id, shape id, ...).
///
/// # Errors
///
/// Returns [`crate::FormatError::Io`] if the file cannot be read.
pub fn contains_item(path: impl AsRef<Path>, item: &str) -> FormatResult<bool> {
    let content = fs::read_to_string(path)?;
    Ok(content.contains(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Asset, FormatError, Page, Shape};

    fn sample() -> Document {
        Document::new("page1")
            .with_page(
                Page::new("page1", "Page 1").with_shape(
                    Shape::new("shape1", "rect")
                        .with_position(10.0, 20.0)
                        .with_parent("page1")
                        .with_prop("color", "red"),
                ),
            )
            .with_asset(Asset::new("asset1", "image", "base64xyz"))
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.md");

        save(&path, &sample()).expect("save");
        assert!(path.exists());

        let loaded = load(&path).expect("load");
        assert_eq!(loaded, sample());
        let strict = load_with(&path, &FormatConfig::strict()).expect("strict load");
        assert_eq!(strict, sample());
    }

    #[test]
    fn test_save_with_title() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.md");
        save_with(&path, &sample(), &FormatConfig::new().with_title("Sprint Board"))
            .expect("save");
        assert!(contains_item(&path, "# Sprint Board").expect("read"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load(dir.path().join("missing.md"));
        assert!(matches!(result, Err(FormatError::Io(_))));
    }

    #[test]
    fn test_append_then_find() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.md");
        save(&path, &sample()).expect("save");

        assert!(contains_item(&path, "shape1").expect("read"));
        assert!(!contains_item(&path, "Meeting notes").expect("read"));

        append_content(&path, "Meeting notes").expect("append");
        assert!(contains_item(&path, "Meeting notes").expect("read"));
        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.ends_with("---\n\n\nMeeting notes"));

        // Appended prose after the assets does not disturb the document.
        assert_eq!(load(&path).expect("load"), sample());
    }

    #[test]
    fn test_append_to_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = append_content(dir.path().join("missing.md"), "x");
        assert!(matches!(result, Err(FormatError::Io(_))));
        let result = contains_item(dir.path().join("missing.md"), "x");
        assert!(matches!(result, Err(FormatError::Io(_))));
    }
}

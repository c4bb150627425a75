//! Canvas documents and their pages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Asset, DocumentError, FormatError, FormatResult, Shape};

/// A page of the canvas, owning its shapes in z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Identifier, unique within the document.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Shapes on this page, in order.
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Page {
    /// Create an empty page.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shapes: Vec::new(),
        }
    }

    /// Generate a fresh `page:<uuid>` identifier.
    #[must_use]
    pub fn generate_id() -> String {
        format!("page:{}", Uuid::new_v4())
    }

    /// Append a shape.
    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Get a shape on this page by ID.
    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }
}

/// The complete canvas document: pages, assets and the current-page pointer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Id of the page the editor shows; must name a page in `pages`.
    pub current_page_id: String,
    /// Pages, in order.
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Assets, in order.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Document {
    /// Create an empty document pointing at `current_page_id`.
    #[must_use]
    pub fn new(current_page_id: impl Into<String>) -> Self {
        Self {
            current_page_id: current_page_id.into(),
            pages: Vec::new(),
            assets: Vec::new(),
        }
    }

    /// Append a page.
    #[must_use]
    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    /// Append an asset.
    #[must_use]
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Get a page by ID.
    #[must_use]
    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Get the page `current_page_id` points at.
    #[must_use]
    pub fn current_page(&self) -> Option<&Page> {
        self.page(&self.current_page_id)
    }

    /// Get an asset by ID.
    #[must_use]
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Iterate over every shape of every page, in document order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.pages.iter().flat_map(|p| p.shapes.iter())
    }

    /// Total number of shapes across all pages.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.pages.iter().map(|p| p.shapes.len()).sum()
    }

    /// Check if the document has no pages and no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.assets.is_empty()
    }

    /// Check the structural invariants.
    ///
    /// An empty `current_page_id` is accepted only for a document without
    /// pages.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: an unknown current page, or a
    /// duplicated page, shape or asset id.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut page_ids = HashSet::new();
        let mut shape_ids = HashSet::new();
        for page in &self.pages {
            if !page_ids.insert(page.id.as_str()) {
                return Err(DocumentError::DuplicatePageId(page.id.clone()));
            }
            for shape in &page.shapes {
                if !shape_ids.insert(shape.id.as_str()) {
                    return Err(DocumentError::DuplicateShapeId(shape.id.clone()));
                }
            }
        }

        let mut asset_ids = HashSet::new();
        for asset in &self.assets {
            if !asset_ids.insert(asset.id.as_str()) {
                return Err(DocumentError::DuplicateAssetId(asset.id.clone()));
            }
        }

        let page_less = self.pages.is_empty() && self.current_page_id.is_empty();
        if !page_less && !page_ids.contains(self.current_page_id.as_str()) {
            return Err(DocumentError::UnknownCurrentPage(
                self.current_page_id.clone(),
            ));
        }
        Ok(())
    }

    /// Serialize the document to a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> FormatResult<String> {
        serde_json::to_string_pretty(self).map_err(FormatError::Json)
    }

    /// Deserialize a document from a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a document.
    pub fn from_json(json: &str) -> FormatResult<Self> {
        serde_json::from_str(json).map_err(FormatError::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new("page1")
            .with_page(
                Page::new("page1", "Page 1")
                    .with_shape(Shape::new("shape1", "geo").with_parent("page1"))
                    .with_shape(Shape::new("shape2", "text").with_parent("shape1")),
            )
            .with_page(Page::new("page2", "Page 2"))
            .with_asset(Asset::new("asset1", "image", "base64xyz"))
    }

    #[test]
    fn test_lookups() {
        let doc = sample();
        assert_eq!(doc.current_page().map(|p| p.name.as_str()), Some("Page 1"));
        assert!(doc.page("page2").is_some());
        assert!(doc.page("missing").is_none());
        assert_eq!(doc.asset("asset1").map(|a| a.data.as_str()), Some("base64xyz"));
        assert_eq!(doc.shape_count(), 2);
        let page = doc.page("page1").expect("page exists");
        assert_eq!(page.shape("shape2").map(|s| s.parent_id.as_str()), Some("shape1"));
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert_eq!(sample().validate(), Ok(()));
        assert_eq!(Document::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_unknown_current_page() {
        let mut doc = sample();
        doc.current_page_id = "nope".to_string();
        assert_eq!(
            doc.validate(),
            Err(DocumentError::UnknownCurrentPage("nope".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_empty_current_page_with_pages() {
        let mut doc = sample();
        doc.current_page_id.clear();
        assert!(matches!(
            doc.validate(),
            Err(DocumentError::UnknownCurrentPage(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let doc = sample().with_page(Page::new("page1", "Again"));
        assert_eq!(
            doc.validate(),
            Err(DocumentError::DuplicatePageId("page1".to_string()))
        );

        let doc = sample().with_page(
            Page::new("page3", "Page 3").with_shape(Shape::new("shape1", "geo")),
        );
        assert_eq!(
            doc.validate(),
            Err(DocumentError::DuplicateShapeId("shape1".to_string()))
        );

        let doc = sample().with_asset(Asset::new("asset1", "video", "x"));
        assert_eq!(
            doc.validate(),
            Err(DocumentError::DuplicateAssetId("asset1".to_string()))
        );
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let doc = sample();
        let json = doc.to_json().expect("serialize");
        assert!(json.contains("\"currentPageId\": \"page1\""));
        let back = Document::from_json(&json).expect("deserialize");
        assert_eq!(back, doc);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Document::from_json("{not json"),
            Err(FormatError::Json(_))
        ));
    }
}

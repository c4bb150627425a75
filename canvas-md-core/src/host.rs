//! Bridge between a live canvas editor and [`Document`] snapshots.
//!
//! The editor is reached only through the [`CanvasHost`] capability trait, so
//! the conversion logic runs the same against a real editor binding or the
//! in-memory [`MemoryCanvas`].

use crate::{Asset, Document, HostError, Page, Shape};

/// Identity of a page as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Page identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Capabilities a canvas editor exposes for import and export.
pub trait CanvasHost {
    /// All pages, in order.
    fn list_pages(&self) -> Vec<PageInfo>;

    /// Shapes on a page, in order. Unknown pages have no shapes.
    fn list_shapes_on_page(&self, page_id: &str) -> Vec<Shape>;

    /// All assets, in order.
    fn list_assets(&self) -> Vec<Asset>;

    /// Id of the page currently shown.
    fn current_page(&self) -> String;

    /// Create an empty page.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the page.
    fn create_page(&mut self, id: &str, name: &str) -> Result<(), HostError>;

    /// Attach shapes to a page, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if the page does not exist or a shape is refused.
    fn create_shapes(&mut self, page_id: &str, shapes: Vec<Shape>) -> Result<(), HostError>;

    /// Register an asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the asset.
    fn add_asset(&mut self, asset: Asset) -> Result<(), HostError>;

    /// Show a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page does not exist.
    fn set_current_page(&mut self, page_id: &str) -> Result<(), HostError>;
}

/// Read a point-in-time snapshot of the host.
///
/// The host is borrowed immutably for the whole read, so it cannot change
/// between listing pages and listing their shapes. Shapes without a parent
/// are attributed to their page.
#[must_use]
pub fn extract<H: CanvasHost + ?Sized>(host: &H) -> Document {
    let pages: Vec<Page> = host
        .list_pages()
        .into_iter()
        .map(|info| {
            let shapes = host
                .list_shapes_on_page(&info.id)
                .into_iter()
                .map(|mut shape| {
                    if shape.parent_id.is_empty() {
                        shape.parent_id.clone_from(&info.id);
                    }
                    shape
                })
                .collect();
            Page {
                id: info.id,
                name: info.name,
                shapes,
            }
        })
        .collect();

    let document = Document {
        current_page_id: host.current_page(),
        pages,
        assets: host.list_assets(),
    };
    tracing::debug!(
        pages = document.pages.len(),
        shapes = document.shape_count(),
        assets = document.assets.len(),
        "Extracted document from host"
    );
    document
}

/// Recreate a document inside the host.
///
/// Assets go first because shapes may reference them, then each page
/// followed by its shapes, then the current page. An empty current page id
/// is not applied.
///
/// # Errors
///
/// Stops at and returns the first error the host reports.
pub fn apply<H: CanvasHost + ?Sized>(document: &Document, host: &mut H) -> Result<(), HostError> {
    for asset in &document.assets {
        host.add_asset(asset.clone())?;
    }

    for page in &document.pages {
        host.create_page(&page.id, &page.name)?;
        if !page.shapes.is_empty() {
            host.create_shapes(&page.id, page.shapes.clone())?;
        }
    }

    if document.current_page_id.is_empty() {
        tracing::debug!("Document has no current page; leaving host selection unchanged");
    } else {
        host.set_current_page(&document.current_page_id)?;
    }

    tracing::info!(
        pages = document.pages.len(),
        shapes = document.shape_count(),
        assets = document.assets.len(),
        "Applied document to host"
    );
    Ok(())
}

/// In-memory canvas host.
///
/// Enforces the same id rules an editor would: page, shape and asset ids are
/// unique, and shapes and the current page must reference existing pages.
#[derive(Debug, Clone, Default)]
pub struct MemoryCanvas {
    pages: Vec<Page>,
    assets: Vec<Asset>,
    current_page: String,
}

impl MemoryCanvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of shapes across all pages.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.pages.iter().map(|p| p.shapes.len()).sum()
    }

    /// Check if the canvas holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.assets.is_empty()
    }

    fn has_shape(&self, shape_id: &str) -> bool {
        self.pages
            .iter()
            .any(|p| p.shapes.iter().any(|s| s.id == shape_id))
    }
}

impl CanvasHost for MemoryCanvas {
    fn list_pages(&self) -> Vec<PageInfo> {
        self.pages
            .iter()
            .map(|p| PageInfo {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect()
    }

    fn list_shapes_on_page(&self, page_id: &str) -> Vec<Shape> {
        self.pages
            .iter()
            .find(|p| p.id == page_id)
            .map(|p| p.shapes.clone())
            .unwrap_or_default()
    }

    fn list_assets(&self) -> Vec<Asset> {
        self.assets.clone()
    }

    fn current_page(&self) -> String {
        self.current_page.clone()
    }

    fn create_page(&mut self, id: &str, name: &str) -> Result<(), HostError> {
        if self.pages.iter().any(|p| p.id == id) {
            return Err(HostError::PageExists(id.to_string()));
        }
        self.pages.push(Page::new(id, name));
        if self.current_page.is_empty() {
            self.current_page = id.to_string();
        }
        Ok(())
    }

    fn create_shapes(&mut self, page_id: &str, shapes: Vec<Shape>) -> Result<(), HostError> {
        for (i, shape) in shapes.iter().enumerate() {
            let repeated = shapes[..i].iter().any(|s| s.id == shape.id);
            if repeated || self.has_shape(&shape.id) {
                return Err(HostError::ShapeExists(shape.id.clone()));
            }
        }
        let page = self
            .pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| HostError::PageNotFound(page_id.to_string()))?;
        page.shapes.extend(shapes);
        Ok(())
    }

    fn add_asset(&mut self, asset: Asset) -> Result<(), HostError> {
        if self.assets.iter().any(|a| a.id == asset.id) {
            return Err(HostError::AssetExists(asset.id));
        }
        self.assets.push(asset);
        Ok(())
    }

    fn set_current_page(&mut self, page_id: &str) -> Result<(), HostError> {
        if !self.pages.iter().any(|p| p.id == page_id) {
            return Err(HostError::PageNotFound(page_id.to_string()));
        }
        self.current_page = page_id.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the order of mutating calls.
    #[derive(Default)]
    struct RecordingHost {
        inner: MemoryCanvas,
        calls: Vec<String>,
    }

    impl CanvasHost for RecordingHost {
        fn list_pages(&self) -> Vec<PageInfo> {
            self.inner.list_pages()
        }
        fn list_shapes_on_page(&self, page_id: &str) -> Vec<Shape> {
            self.inner.list_shapes_on_page(page_id)
        }
        fn list_assets(&self) -> Vec<Asset> {
            self.inner.list_assets()
        }
        fn current_page(&self) -> String {
            self.inner.current_page()
        }
        fn create_page(&mut self, id: &str, name: &str) -> Result<(), HostError> {
            self.calls.push(format!("page {id}"));
            self.inner.create_page(id, name)
        }
        fn create_shapes(&mut self, page_id: &str, shapes: Vec<Shape>) -> Result<(), HostError> {
            self.calls.push(format!("shapes {page_id} x{}", shapes.len()));
            self.inner.create_shapes(page_id, shapes)
        }
        fn add_asset(&mut self, asset: Asset) -> Result<(), HostError> {
            self.calls.push(format!("asset {}", asset.id));
            self.inner.add_asset(asset)
        }
        fn set_current_page(&mut self, page_id: &str) -> Result<(), HostError> {
            self.calls.push(format!("current {page_id}"));
            self.inner.set_current_page(page_id)
        }
    }

    fn sample() -> Document {
        Document::new("p2")
            .with_page(
                Page::new("p1", "One")
                    .with_shape(Shape::new("s1", "geo").with_parent("p1"))
                    .with_shape(Shape::new("s2", "text").with_parent("s1")),
            )
            .with_page(Page::new("p2", "Two"))
            .with_asset(Asset::new("a1", "image", "data:x"))
    }

    #[test]
    fn test_apply_order() {
        let mut host = RecordingHost::default();
        apply(&sample(), &mut host).expect("apply");
        assert_eq!(
            host.calls,
            ["asset a1", "page p1", "shapes p1 x2", "page p2", "current p2"]
        );
    }

    #[test]
    fn test_extract_after_apply_reproduces_document() {
        let mut canvas = MemoryCanvas::new();
        apply(&sample(), &mut canvas).expect("apply");
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.shape_count(), 2);
        assert_eq!(extract(&canvas), sample());
    }

    #[test]
    fn test_extract_fills_missing_parent() {
        let mut canvas = MemoryCanvas::new();
        canvas.create_page("p", "P").expect("page");
        canvas
            .create_shapes("p", vec![Shape::new("s", "geo")])
            .expect("shapes");
        let doc = extract(&canvas);
        assert_eq!(doc.pages[0].shapes[0].parent_id, "p");
        assert_eq!(doc.current_page_id, "p");
    }

    #[test]
    fn test_memory_canvas_rejects_conflicts() {
        let mut canvas = MemoryCanvas::new();
        canvas.create_page("p", "P").expect("page");
        assert_eq!(
            canvas.create_page("p", "again"),
            Err(HostError::PageExists("p".to_string()))
        );
        assert_eq!(
            canvas.create_shapes("nope", vec![Shape::new("s", "geo")]),
            Err(HostError::PageNotFound("nope".to_string()))
        );
        assert_eq!(
            canvas.create_shapes("p", vec![Shape::new("s", "geo"), Shape::new("s", "geo")]),
            Err(HostError::ShapeExists("s".to_string()))
        );
        assert_eq!(canvas.shape_count(), 0);
        canvas
            .add_asset(Asset::new("a", "image", "x"))
            .expect("asset");
        assert_eq!(
            canvas.add_asset(Asset::new("a", "image", "y")),
            Err(HostError::AssetExists("a".to_string()))
        );
        assert_eq!(
            canvas.set_current_page("ghost"),
            Err(HostError::PageNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn test_apply_stops_at_first_error() {
        let mut canvas = MemoryCanvas::new();
        canvas.create_page("p1", "Existing").expect("page");
        let result = apply(&sample(), &mut canvas);
        assert_eq!(result, Err(HostError::PageExists("p1".to_string())));
        // The asset was already added before the page conflict.
        assert_eq!(canvas.list_assets().len(), 1);
    }

    #[test]
    fn test_apply_empty_document_leaves_host_empty() {
        let mut canvas = MemoryCanvas::new();
        apply(&Document::default(), &mut canvas).expect("apply");
        assert!(canvas.is_empty());
        assert_eq!(canvas.current_page(), "");
    }
}

//! Assets - opaque payloads referenced by shapes.

use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque binary or URL payload, e.g. the source of an image shape.
///
/// `data` is never interpreted while converting a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Identifier, unique within the document.
    pub id: String,
    /// Asset type (`image`, `video`, `bookmark`, ...).
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Payload: a URL or a base64 data URI.
    pub data: String,
}

impl Asset {
    /// Create an asset.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        asset_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            asset_type: asset_type.into(),
            data: data.into(),
        }
    }

    /// Generate a fresh `asset:<uuid>` identifier.
    #[must_use]
    pub fn generate_id() -> String {
        format!("asset:{}", Uuid::new_v4())
    }

    /// Create an asset whose payload is embedded as a base64 data URI.
    ///
    /// ```
    /// use canvas_md_core::Asset;
    ///
    /// let asset = Asset::embedded("asset1", "image", "image/png", b"\x89PNG");
    /// assert_eq!(asset.data, "data:image/png;base64,iVBORw==");
    /// ```
    #[must_use]
    pub fn embedded(
        id: impl Into<String>,
        asset_type: impl Into<String>,
        mime: &str,
        bytes: &[u8],
    ) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::new(id, asset_type, format!("data:{mime};base64,{payload}"))
    }

    /// Whether the payload is a base64 data URI.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.data_uri_parts()
            .is_some_and(|(meta, _)| meta.ends_with(";base64"))
    }

    /// MIME type of an embedded payload.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        let (meta, _) = self.data_uri_parts()?;
        let mime = meta.split(';').next().unwrap_or_default();
        (!mime.is_empty()).then_some(mime)
    }

    /// Decode the bytes of a base64 data URI payload.
    ///
    /// Returns `None` when the payload is not a base64 data URI (for example
    /// a plain URL) or the base64 text is invalid.
    #[must_use]
    pub fn decode_embedded(&self) -> Option<Vec<u8>> {
        let (meta, payload) = self.data_uri_parts()?;
        if !meta.ends_with(";base64") {
            return None;
        }
        match base64::engine::general_purpose::STANDARD.decode(payload) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!("Asset {} has invalid base64 payload: {e}", self.id);
                None
            }
        }
    }

    fn data_uri_parts(&self) -> Option<(&str, &str)> {
        self.data.strip_prefix("data:")?.split_once(',')
    }
}

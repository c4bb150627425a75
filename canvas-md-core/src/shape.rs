//! Shapes - the positioned, typed elements of a page.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Opaque, type-specific shape properties.
///
/// Keys keep their insertion order so a document serializes its props in the
/// order the host reported them.
pub type Props = Map<String, Value>;

/// A positioned, typed visual element.
///
/// `parent_id` names either another shape or the page that owns the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Identifier, unique within the document.
    pub id: String,
    /// Shape type (`geo`, `arrow`, `image`, ...).
    #[serde(rename = "type")]
    pub shape_type: String,
    /// X position in page coordinates.
    pub x: f64,
    /// Y position in page coordinates.
    pub y: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Parent shape or owning page id.
    pub parent_id: String,
    /// Type-specific properties, passed through untouched.
    #[serde(default)]
    pub props: Props,
}

impl Shape {
    /// Create a shape at the origin with no parent and no props.
    #[must_use]
    pub fn new(id: impl Into<String>, shape_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape_type: shape_type.into(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            parent_id: String::new(),
            props: Props::new(),
        }
    }

    /// Generate a fresh `shape:<uuid>` identifier.
    #[must_use]
    pub fn generate_id() -> String {
        format!("shape:{}", Uuid::new_v4())
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the rotation in radians.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the parent shape or page id.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = parent_id.into();
        self
    }

    /// Insert a property, replacing any previous value under `key`.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Get a property by key.
    #[must_use]
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }
}

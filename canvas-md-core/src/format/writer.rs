//! Document to text.

use serde_json::Value;

use super::{
    ASSETS_HEADING, INDENT, KEY_CURRENT_PAGE, KEY_DATA, KEY_ID, KEY_NAME, KEY_PARENT_ID,
    KEY_PROPS, KEY_ROTATION, KEY_TYPE, KEY_X, KEY_Y, PAGES_HEADING, SEPARATOR, SHAPES_HEADING,
    SHAPE_HEADING_PREFIX,
};
use crate::{Asset, Document, FormatConfig, Page, Shape};

/// Serialize a document with the default configuration.
///
/// ```
/// use canvas_md_core::{format, Document, Page};
///
/// let doc = Document::new("page1").with_page(Page::new("page1", "Page 1"));
/// let text = format::serialize(&doc);
/// assert!(text.starts_with("---\ncurrentPage: page1\n---\n"));
/// assert!(text.contains("\n### Page 1\n"));
/// ```
#[must_use]
pub fn serialize(document: &Document) -> String {
    serialize_with(document, &FormatConfig::default())
}

/// Serialize a document, taking the title from `config`.
///
/// Output is deterministic and never fails.
#[must_use]
pub fn serialize_with(document: &Document, config: &FormatConfig) -> String {
    let mut out = Emitter::default();

    out.line(SEPARATOR);
    out.scalar(KEY_CURRENT_PAGE, &document.current_page_id);
    out.line(SEPARATOR);
    out.blank();
    out.line(format!("# {}", heading_text(&config.title)));
    out.blank();
    out.line(format!("## {PAGES_HEADING}"));

    for page in &document.pages {
        write_page(&mut out, page);
    }

    out.blank();
    out.line(format!("## {ASSETS_HEADING}"));
    out.line(SEPARATOR);
    if document.assets.is_empty() {
        out.blank();
    }
    for (i, asset) in document.assets.iter().enumerate() {
        if i > 0 {
            out.line(SEPARATOR);
        }
        write_asset(&mut out, asset);
    }
    out.line(SEPARATOR);

    tracing::debug!(
        pages = document.pages.len(),
        shapes = document.shape_count(),
        assets = document.assets.len(),
        "Serialized document"
    );
    out.finish()
}

fn write_page(out: &mut Emitter, page: &Page) {
    out.blank();
    out.line(format!("### {}", heading_text(&page.name)));
    out.line(SEPARATOR);
    out.scalar(KEY_ID, &page.id);
    out.scalar(KEY_NAME, &page.name);
    out.line(SEPARATOR);
    out.blank();
    out.line(format!("#### {SHAPES_HEADING}"));

    for shape in &page.shapes {
        write_shape(out, shape);
    }
}

fn write_shape(out: &mut Emitter, shape: &Shape) {
    out.blank();
    out.line(format!(
        "##### {SHAPE_HEADING_PREFIX} {}",
        heading_text(&shape.id)
    ));
    out.line(SEPARATOR);
    out.scalar(KEY_ID, &shape.id);
    out.scalar(KEY_TYPE, &shape.shape_type);
    out.scalar(KEY_X, shape.x);
    out.scalar(KEY_Y, shape.y);
    out.scalar(KEY_ROTATION, shape.rotation);
    out.scalar(KEY_PARENT_ID, &shape.parent_id);
    out.line(SEPARATOR);
    out.line(format!("{KEY_PROPS}:"));
    for (key, value) in &shape.props {
        out.line(format!("{INDENT}{}: {}", key_text(key), prop_text(value)));
    }
    out.line(SEPARATOR);
}

fn write_asset(out: &mut Emitter, asset: &Asset) {
    out.line(format!("{}:", key_text(&asset.id)));
    out.line(format!("{INDENT}{KEY_TYPE}: {}", asset.asset_type));
    out.line(format!("{INDENT}{KEY_DATA}: {}", asset.data));
}

/// Line-oriented output buffer.
#[derive(Default)]
struct Emitter {
    out: String,
}

impl Emitter {
    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn scalar(&mut self, key: &str, value: impl std::fmt::Display) {
        self.line(format!("{key}: {value}"));
    }

    fn finish(self) -> String {
        self.out
    }
}

/// JSON-encode a prop value on a single line.
fn prop_text(value: &Value) -> String {
    // Display of a Value is its compact JSON encoding
    value.to_string()
}

/// Write a key verbatim unless the reader would split or trim it.
pub(crate) fn key_text(key: &str) -> String {
    if needs_quoting(key) {
        Value::String(key.to_string()).to_string()
    } else {
        key.to_string()
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty()
        || key.starts_with(['"', '#'])
        || key.ends_with(':')
        || key.contains(": ")
        || key.contains(['\n', '\r'])
        || key.trim() != key
        || key == SEPARATOR
}

/// Headings are never read back; keep them on one line.
fn heading_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

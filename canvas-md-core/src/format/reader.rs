//! Text to document.
//!
//! A single forward pass over the [`Lexer`] tokens. Headings move the reader
//! between contexts; every front-matter block is folded once by
//! [`FrontMatter::read`] and applied to whatever the current context names:
//! the document, the page just opened, the shape just opened, or the asset
//! list.

use serde_json::Value;

use super::front_matter::{Field, FieldValue, FrontMatter};
use super::lexer::{Lexer, Spanned, Token};
use super::{
    KEY_CURRENT_PAGE, KEY_DATA, KEY_ID, KEY_NAME, KEY_PARENT_ID, KEY_PROPS, KEY_ROTATION,
    KEY_TYPE, KEY_X, KEY_Y,
};
use crate::shape::Props;
use crate::{Asset, Document, FormatConfig, FormatError, FormatResult, Page, Shape};

/// Deserialize a document leniently.
///
/// Never fails: anything that cannot be read is replaced by an empty default
/// and reported through `tracing`.
///
/// ```
/// use canvas_md_core::format;
///
/// let doc = format::deserialize("---\ncurrentPage: page1\n---\n\n### Page 1\n---\nid: page1\n---\n");
/// assert_eq!(doc.current_page_id, "page1");
/// assert_eq!(doc.pages[0].id, "page1");
/// assert_eq!(doc.pages[0].name, "");
/// ```
#[must_use]
pub fn deserialize(text: &str) -> Document {
    let config = FormatConfig::default();
    Reader::new(&config).read(text).unwrap_or_else(|e| {
        tracing::warn!("Lenient read failed, returning empty document: {e}");
        Document::default()
    })
}

/// Deserialize a document under `config.strictness`.
///
/// # Errors
///
/// In strict mode, returns [`FormatError::Malformed`] for the first line the
/// serializer could not have produced, or [`FormatError::InvalidDocument`]
/// if the result fails [`Document::validate`]. Lenient mode never errors.
pub fn deserialize_with(text: &str, config: &FormatConfig) -> FormatResult<Document> {
    Reader::new(config).read(text)
}

/// What the next front-matter block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Nothing read yet: the first block is the document's.
    Start,
    /// Between elements; a block here has no owner.
    Between,
    /// A page heading was read on `line`, its block is next.
    PageMeta { line: usize },
    /// A shape heading was read on `line`; `meta` once its first block was read.
    Shape { line: usize, meta: bool },
    /// Inside the assets section.
    Assets,
    /// Blocks of a dropped element.
    Skip,
}

/// Shape values read from one block.
#[derive(Debug, Default)]
struct ShapeFields {
    id: Option<String>,
    shape_type: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    rotation: Option<f64>,
    parent_id: Option<String>,
    props: Option<Props>,
}

impl ShapeFields {
    fn apply(self, shape: &mut Shape) {
        if let Some(id) = self.id {
            shape.id = id;
        }
        if let Some(shape_type) = self.shape_type {
            shape.shape_type = shape_type;
        }
        if let Some(x) = self.x {
            shape.x = x;
        }
        if let Some(y) = self.y {
            shape.y = y;
        }
        if let Some(rotation) = self.rotation {
            shape.rotation = rotation;
        }
        if let Some(parent_id) = self.parent_id {
            shape.parent_id = parent_id;
        }
        if let Some(props) = self.props {
            shape.props.extend(props);
        }
    }
}

struct Reader<'c> {
    config: &'c FormatConfig,
    document: Document,
    context: Context,
    has_front_matter: bool,
}

impl<'c> Reader<'c> {
    fn new(config: &'c FormatConfig) -> Self {
        Self {
            config,
            document: Document::default(),
            context: Context::Start,
            has_front_matter: false,
        }
    }

    fn read(mut self, text: &str) -> FormatResult<Document> {
        let mut tokens = Lexer::new(text);
        while let Some(Spanned { line, token }) = tokens.next() {
            match token {
                Token::BlockStart => {
                    let block = FrontMatter::read(line, &mut tokens);
                    self.block(&block)?;
                }
                Token::PageStart(heading) => {
                    tracing::trace!(line, "Page {heading:?}");
                    self.enter(Context::PageMeta { line })?;
                    self.document.pages.push(Page::default());
                }
                Token::ShapeStart(heading) => {
                    if self.document.pages.is_empty() {
                        self.enter(Context::Skip)?;
                        self.degrade(line, format!("shape {heading:?} appears before any page"))?;
                    } else {
                        tracing::trace!(line, "Shape {heading:?}");
                        self.enter(Context::Shape { line, meta: false })?;
                        if let Some(page) = self.document.pages.last_mut() {
                            page.shapes.push(Shape::new("", ""));
                        }
                    }
                }
                Token::AssetsStart => self.enter(Context::Assets)?,
                Token::PagesStart
                | Token::ShapesStart
                | Token::Title(_)
                | Token::Heading { .. } => self.enter(Context::Between)?,
                Token::Text(text) => tracing::trace!(line, "Skipping prose {text:?}"),
                Token::Entry(_) | Token::Stray(_) | Token::BlockEnd { .. } => {
                    tracing::trace!(line, "Skipping block token outside a block");
                }
            }
        }
        self.enter(Context::Between)?;

        if !self.has_front_matter {
            self.degrade(1, "document front-matter with `currentPage` is missing")?;
        }
        self.finish()
    }

    fn finish(self) -> FormatResult<Document> {
        let document = self.document;
        if let Err(e) = document.validate() {
            if self.config.strictness.is_strict() {
                return Err(FormatError::InvalidDocument(e));
            }
            tracing::warn!("Deserialized document is inconsistent: {e}");
        }
        tracing::debug!(
            pages = document.pages.len(),
            shapes = document.shape_count(),
            assets = document.assets.len(),
            "Deserialized document"
        );
        Ok(document)
    }

    /// Switch context, reporting a heading whose block never came.
    fn enter(&mut self, next: Context) -> FormatResult<()> {
        match self.context {
            Context::PageMeta { line } => {
                self.degrade(line, "page heading has no front-matter block")?;
            }
            Context::Shape { line, meta: false } => {
                self.degrade(line, "shape heading has no front-matter block")?;
            }
            _ => {}
        }
        self.context = next;
        Ok(())
    }

    fn block(&mut self, block: &FrontMatter<'_>) -> FormatResult<()> {
        if !block.terminated {
            self.degrade(block.line, "front-matter block is not closed by `---`")?;
        }
        for (line, text) in &block.stray {
            self.degrade(*line, format!("expected `key: value`, found {text:?}"))?;
        }

        match self.context {
            Context::Start => {
                self.read_document_meta(block)?;
                self.has_front_matter = true;
                self.context = Context::Between;
            }
            Context::PageMeta { .. } => {
                self.read_page_meta(block)?;
                self.context = Context::Between;
            }
            Context::Shape { line, meta } => {
                let fields = self.read_shape(block, !meta)?;
                if let Some(shape) = self
                    .document
                    .pages
                    .last_mut()
                    .and_then(|p| p.shapes.last_mut())
                {
                    fields.apply(shape);
                }
                self.context = Context::Shape { line, meta: true };
            }
            Context::Assets => self.read_assets(block)?,
            Context::Skip => tracing::trace!(line = block.line, "Skipping block of dropped element"),
            Context::Between => {
                self.degrade(block.line, "front-matter block does not follow a heading")?;
            }
        }
        Ok(())
    }

    fn read_document_meta(&mut self, block: &FrontMatter<'_>) -> FormatResult<()> {
        let mut current = None;
        for field in &block.fields {
            match field.key.as_ref() {
                KEY_CURRENT_PAGE => current = Some(self.scalar(field)?),
                _ => self.unknown_key(field)?,
            }
        }
        if current.is_none() {
            self.degrade(block.line, format!("document block has no `{KEY_CURRENT_PAGE}`"))?;
        }
        self.document.current_page_id = current.unwrap_or_default();
        Ok(())
    }

    fn read_page_meta(&mut self, block: &FrontMatter<'_>) -> FormatResult<()> {
        let mut id = None;
        let mut name = None;
        for field in &block.fields {
            match field.key.as_ref() {
                KEY_ID => id = Some(self.scalar(field)?),
                KEY_NAME => name = Some(self.scalar(field)?),
                _ => self.unknown_key(field)?,
            }
        }
        self.require(block, "page", &[(KEY_ID, id.is_some()), (KEY_NAME, name.is_some())])?;

        if let Some(page) = self.document.pages.last_mut() {
            page.id = id.unwrap_or_default();
            page.name = name.unwrap_or_default();
        }
        Ok(())
    }

    fn read_shape(&self, block: &FrontMatter<'_>, first: bool) -> FormatResult<ShapeFields> {
        let mut fields = ShapeFields::default();
        for field in &block.fields {
            match field.key.as_ref() {
                KEY_ID => fields.id = Some(self.scalar(field)?),
                KEY_TYPE => fields.shape_type = Some(self.scalar(field)?),
                KEY_X => fields.x = Some(self.number(field)?),
                KEY_Y => fields.y = Some(self.number(field)?),
                KEY_ROTATION => fields.rotation = Some(self.number(field)?),
                KEY_PARENT_ID => fields.parent_id = Some(self.scalar(field)?),
                KEY_PROPS => {
                    let props = self.props(field)?;
                    fields.props.get_or_insert_with(Props::new).extend(props);
                }
                _ => self.unknown_key(field)?,
            }
        }
        if first {
            self.require(
                block,
                "shape",
                &[
                    (KEY_ID, fields.id.is_some()),
                    (KEY_TYPE, fields.shape_type.is_some()),
                    (KEY_X, fields.x.is_some()),
                    (KEY_Y, fields.y.is_some()),
                    (KEY_ROTATION, fields.rotation.is_some()),
                    (KEY_PARENT_ID, fields.parent_id.is_some()),
                ],
            )?;
        }
        Ok(fields)
    }

    fn read_assets(&mut self, block: &FrontMatter<'_>) -> FormatResult<()> {
        for field in &block.fields {
            let Some(children) = field.as_map() else {
                self.degrade(
                    field.line,
                    format!("asset {:?} has no nested `type`/`data`", field.key),
                )?;
                continue;
            };

            let mut asset_type = None;
            let mut data = None;
            for child in children {
                match child.key.as_ref() {
                    KEY_TYPE => asset_type = Some(self.scalar(child)?),
                    KEY_DATA => data = Some(self.scalar(child)?),
                    _ => self.unknown_key(child)?,
                }
            }
            if asset_type.is_none() || data.is_none() {
                self.degrade(
                    field.line,
                    format!("asset {:?} needs both `type` and `data`", field.key),
                )?;
            }
            self.document.assets.push(Asset::new(
                field.key.as_ref(),
                asset_type.unwrap_or_default(),
                data.unwrap_or_default(),
            ));
        }
        Ok(())
    }

    fn props(&self, field: &Field<'_>) -> FormatResult<Props> {
        let mut props = Props::new();
        let children = match &field.value {
            FieldValue::Map(children) => children,
            FieldValue::Scalar(text) => {
                if !text.is_empty() {
                    self.degrade(field.line, "`props` must be followed by indented entries")?;
                }
                return Ok(props);
            }
        };

        for child in children {
            let value = match child.value {
                FieldValue::Scalar(text) => match serde_json::from_str::<Value>(text) {
                    Ok(value) => value,
                    Err(e) => {
                        self.degrade(
                            child.line,
                            format!("prop {:?} is not valid JSON: {e}", child.key),
                        )?;
                        Value::String(text.to_string())
                    }
                },
                FieldValue::Map(_) => {
                    self.degrade(
                        child.line,
                        format!("prop {:?} is a nested block, not JSON", child.key),
                    )?;
                    child.to_json_lossy()
                }
            };
            props.insert(child.key.to_string(), value);
        }
        Ok(props)
    }

    fn scalar(&self, field: &Field<'_>) -> FormatResult<String> {
        if let Some(text) = field.as_scalar() {
            return Ok(text.to_string());
        }
        self.degrade(field.line, format!("`{}` must be a single value", field.key))?;
        Ok(String::new())
    }

    fn number(&self, field: &Field<'_>) -> FormatResult<f64> {
        let text = field.as_scalar().unwrap_or_default();
        match text.trim().parse::<f64>() {
            Ok(n) => Ok(n),
            Err(_) => {
                self.degrade(
                    field.line,
                    format!("`{}` is not a number: {text:?}", field.key),
                )?;
                Ok(0.0)
            }
        }
    }

    fn require(
        &self,
        block: &FrontMatter<'_>,
        what: &str,
        present: &[(&str, bool)],
    ) -> FormatResult<()> {
        for (key, found) in present {
            if !found {
                self.degrade(block.line, format!("{what} block has no `{key}`"))?;
            }
        }
        Ok(())
    }

    fn unknown_key(&self, field: &Field<'_>) -> FormatResult<()> {
        if self.config.strictness.is_strict() {
            return Err(FormatError::malformed(
                field.line,
                format!("unknown key {:?}", field.key),
            ));
        }
        tracing::debug!(line = field.line, "Ignoring unknown key {:?}", field.key);
        Ok(())
    }

    /// Fail in strict mode; warn and carry on otherwise.
    fn degrade(&self, line: usize, reason: impl Into<String>) -> FormatResult<()> {
        let reason = reason.into();
        if self.config.strictness.is_strict() {
            return Err(FormatError::malformed(line, reason));
        }
        tracing::warn!(line, "{reason}");
        Ok(())
    }
}

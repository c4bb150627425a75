//! # Markdown Front-Matter Format
//!
//! The text representation of a [`crate::Document`]: Markdown headings give
//! the document its outline, and `---`-delimited front-matter blocks carry the
//! data of the document, each page, each shape and each asset.
//!
//! ```text
//! ---                         document block
//! currentPage: page1
//! ---
//!
//! # Canvas Document
//!
//! ## Pages
//!
//! ### Page 1                  page heading + page block
//! ---
//! id: page1
//! name: Page 1
//! ---
//!
//! #### Shapes
//!
//! ##### Shape shape1          shape heading + shape block + props block
//! ---
//! id: shape1
//! type: rect
//! x: 10
//! y: 20
//! rotation: 0
//! parentId: page1
//! ---
//! props:
//!   color: "red"
//! ---
//!
//! ## Assets                   one block per asset
//! ---
//! asset1:
//!   type: image
//!   data: base64xyz
//! ---
//! ```
//!
//! Writing goes through [`writer`]. Reading is split in three stages: the
//! [`lexer`] turns lines into structural tokens, [`front_matter`] folds the
//! entries of one block into a key tree, and [`reader`] assembles the
//! document in a single pass.

pub mod front_matter;
pub mod lexer;
pub mod reader;
pub mod writer;

pub use reader::{deserialize, deserialize_with};
pub use writer::{serialize, serialize_with};

/// Line that opens and closes a front-matter block.
pub const SEPARATOR: &str = "---";

/// Title of the level-2 heading introducing the pages.
pub const PAGES_HEADING: &str = "Pages";
/// Title of the level-4 heading introducing a page's shapes.
pub const SHAPES_HEADING: &str = "Shapes";
/// Prefix of the level-5 heading introducing one shape.
pub const SHAPE_HEADING_PREFIX: &str = "Shape";
/// Title of the level-2 heading introducing the assets.
pub const ASSETS_HEADING: &str = "Assets";

pub(crate) const KEY_CURRENT_PAGE: &str = "currentPage";
pub(crate) const KEY_ID: &str = "id";
pub(crate) const KEY_NAME: &str = "name";
pub(crate) const KEY_TYPE: &str = "type";
pub(crate) const KEY_X: &str = "x";
pub(crate) const KEY_Y: &str = "y";
pub(crate) const KEY_ROTATION: &str = "rotation";
pub(crate) const KEY_PARENT_ID: &str = "parentId";
pub(crate) const KEY_PROPS: &str = "props";
pub(crate) const KEY_DATA: &str = "data";

/// Indentation of nested entries.
pub(crate) const INDENT: &str = "  ";

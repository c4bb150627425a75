//! # Canvas MD Core
//!
//! Round-trippable Markdown representation of canvas documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  extract   ┌────────────┐  serialize   ┌──────────────┐
//! │  CanvasHost  │ ─────────▶ │  Document  │ ───────────▶ │ Markdown +   │
//! │ (editor/fake)│ ◀───────── │   model    │ ◀─────────── │ front-matter │
//! └──────────────┘   apply    └────────────┘  deserialize └──────────────┘
//!                                                 │
//!                                   lexer ─▶ front_matter ─▶ reader
//! ```
//!
//! - [`Document`], [`Page`], [`Shape`], [`Asset`]: the document model.
//! - [`format`]: serializer and single-pass deserializer.
//! - [`host`]: the editor capability trait and the snapshot adapter.
//! - [`persist`]: save/load and file helpers.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod asset;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod host;
pub mod persist;
pub mod shape;

pub use asset::Asset;
pub use config::{FormatConfig, Strictness, DEFAULT_TITLE};
pub use document::{Document, Page};
pub use error::{DocumentError, FormatError, FormatResult, HostError};
pub use format::{deserialize, deserialize_with, serialize, serialize_with};
pub use host::{apply, extract, CanvasHost, MemoryCanvas, PageInfo};
pub use shape::{Props, Shape};

/// Canvas MD core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

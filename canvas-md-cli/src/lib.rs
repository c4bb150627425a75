//! # Canvas MD CLI
//!
//! Command-line front end for canvas Markdown documents.
//!
//! ## Usage
//!
//! ```bash
//! canvas-md check board.md
//! canvas-md --strictness strict fmt board.md --write
//! canvas-md to-json board.md > board.json
//! canvas-md from-json board.json board.md
//! canvas-md find board.md shape:abc || echo "missing"
//! ```
//!
//! ## Architecture
//!
//! - `Cli` - Global flags and subcommand, parsed with clap
//! - `run` - Executes a parsed command, writing reports to any `Write`
//! - `Outcome` - Maps to the process exit status

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use canvas_md_core::{persist, Asset, Document, FormatConfig, Strictness, DEFAULT_TITLE};
use clap::{Parser, Subcommand};

/// Command-line arguments for canvas-md.
#[derive(Debug, Clone, Parser)]
#[command(name = "canvas-md")]
#[command(about = "Inspect and convert canvas Markdown documents")]
#[command(version)]
pub struct Cli {
    /// How to treat input the reader cannot fully understand
    #[arg(long, global = true, env = "CANVAS_MD_STRICTNESS", default_value_t = Strictness::Lenient)]
    pub strictness: Strictness,

    /// Title written under the document front-matter
    #[arg(long, global = true, env = "CANVAS_MD_TITLE", default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load and validate a document, then print a summary
    Check {
        /// Markdown document
        file: PathBuf,
    },
    /// Re-serialize a document in canonical form
    Fmt {
        /// Markdown document
        file: PathBuf,
        /// Rewrite the file instead of printing to stdout
        #[arg(long)]
        write: bool,
    },
    /// Print the JSON snapshot of a document
    ToJson {
        /// Markdown document
        file: PathBuf,
    },
    /// Write a Markdown document from a JSON snapshot
    FromJson {
        /// JSON snapshot
        json: PathBuf,
        /// Markdown document to write
        out: PathBuf,
    },
    /// Append text to a document, separated by a blank line
    Append {
        /// Markdown document
        file: PathBuf,
        /// Text to append
        content: String,
    },
    /// Check whether a document's text contains an item
    Find {
        /// Markdown document
        file: PathBuf,
        /// Id or text to look for
        item: String,
    },
}

/// Result of a successful command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked.
    Success,
    /// `find` did not see the item.
    NotFound,
}

impl Cli {
    /// Conversion settings from the global flags.
    #[must_use]
    pub fn format_config(&self) -> FormatConfig {
        FormatConfig::new()
            .with_title(self.title.clone())
            .with_strictness(self.strictness)
    }
}

/// Run a parsed command, writing its report to `out`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, if a strict load
/// fails, or if `check` finds an invalid document.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<Outcome> {
    let config = cli.format_config();
    tracing::debug!(strictness = %config.strictness, command = ?cli.command, "Running");

    match &cli.command {
        Command::Check { file } => {
            let document = load(file, &config)?;
            document
                .validate()
                .with_context(|| format!("{} is not a valid document", file.display()))?;
            write_summary(&document, out)?;
        }
        Command::Fmt { file, write } => {
            let document = load(file, &config)?;
            if *write {
                persist::save_with(file, &document, &config)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
            } else {
                out.write_all(canvas_md_core::serialize_with(&document, &config).as_bytes())?;
            }
        }
        Command::ToJson { file } => {
            let document = load(file, &config)?;
            writeln!(out, "{}", document.to_json()?)?;
        }
        Command::FromJson { json, out: target } => {
            let text = fs::read_to_string(json)
                .with_context(|| format!("Failed to read {}", json.display()))?;
            let document = Document::from_json(&text)
                .with_context(|| format!("{} is not a document snapshot", json.display()))?;
            persist::save_with(target, &document, &config)
                .with_context(|| format!("Failed to write {}", target.display()))?;
        }
        Command::Append { file, content } => {
            persist::append_content(file, content)
                .with_context(|| format!("Failed to append to {}", file.display()))?;
        }
        Command::Find { file, item } => {
            let found = persist::contains_item(file, item)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            writeln!(out, "{}", if found { "found" } else { "not found" })?;
            if !found {
                return Ok(Outcome::NotFound);
            }
        }
    }

    Ok(Outcome::Success)
}

fn load(file: &Path, config: &FormatConfig) -> anyhow::Result<Document> {
    persist::load_with(file, config).with_context(|| format!("Failed to load {}", file.display()))
}

fn write_summary<W: Write>(document: &Document, out: &mut W) -> anyhow::Result<()> {
    let embedded: Vec<(&Asset, usize)> = document
        .assets
        .iter()
        .filter(|asset| asset.is_embedded())
        .map(|asset| (asset, asset.decode_embedded().map_or(0, |bytes| bytes.len())))
        .collect();
    let embedded_bytes: usize = embedded.iter().map(|(_, len)| len).sum();

    writeln!(out, "current page: {}", document.current_page_id)?;
    writeln!(out, "pages: {}", document.pages.len())?;
    writeln!(out, "shapes: {}", document.shape_count())?;
    writeln!(
        out,
        "assets: {} ({} embedded, {embedded_bytes} bytes)",
        document.assets.len(),
        embedded.len()
    )?;
    for (asset, len) in embedded {
        let mime = asset.mime_type().unwrap_or("unknown");
        writeln!(out, "  {}: {mime}, {len} bytes", asset.id)?;
    }
    Ok(())
}

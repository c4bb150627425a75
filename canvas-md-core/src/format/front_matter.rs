//! Front-matter blocks folded into key trees.
//!
//! The same block reader serves the document, page, shape and asset levels.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::lexer::{Entry, Spanned, Token};

/// A parsed front-matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Line of the opening separator.
    pub line: usize,
    /// Top-level fields, in order.
    pub fields: Vec<Field<'a>>,
    /// Lines that were not entries, with their line numbers.
    pub stray: Vec<(usize, &'a str)>,
    /// Whether the block was closed by a separator line.
    pub terminated: bool,
}

/// One key of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    /// Line of the entry.
    pub line: usize,
    /// Key.
    pub key: Cow<'a, str>,
    /// Scalar text or nested fields.
    pub value: FieldValue<'a>,
}

/// Value of a [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Raw text after `": "`.
    Scalar(&'a str),
    /// Nested fields of a `key:` line.
    Map(Vec<Field<'a>>),
}

impl<'a> Field<'a> {
    /// Scalar text; a `key:` line without children reads as empty text.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&'a str> {
        match &self.value {
            FieldValue::Scalar(text) => Some(*text),
            FieldValue::Map(children) if children.is_empty() => Some(""),
            FieldValue::Map(_) => None,
        }
    }

    /// Nested fields, if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&[Field<'a>]> {
        match &self.value {
            FieldValue::Map(children) => Some(children),
            FieldValue::Scalar(_) => None,
        }
    }

    /// Best-effort JSON rendering of a hand-written value.
    ///
    /// Scalars that are valid JSON keep their JSON meaning, anything else
    /// becomes a string. Maps become objects.
    #[must_use]
    pub fn to_json_lossy(&self) -> Value {
        match &self.value {
            FieldValue::Scalar(text) => serde_json::from_str(text)
                .unwrap_or_else(|_| Value::String((*text).to_string())),
            FieldValue::Map(children) => Value::Object(
                children
                    .iter()
                    .map(|c| (c.key.to_string(), c.to_json_lossy()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

impl<'a> FrontMatter<'a> {
    /// Read the body of a block whose `BlockStart` was on `line`, consuming
    /// tokens up to and including the matching `BlockEnd`.
    #[must_use]
    pub fn read<I>(line: usize, tokens: &mut I) -> Self
    where
        I: Iterator<Item = Spanned<Token<'a>>>,
    {
        let mut entries = Vec::new();
        let mut stray = Vec::new();
        let mut terminated = false;

        for Spanned { line, token } in tokens.by_ref() {
            match token {
                Token::Entry(entry) => entries.push((line, entry)),
                Token::Stray(text) => stray.push((line, text)),
                Token::BlockEnd { implicit } => {
                    terminated = !implicit;
                    break;
                }
                // The lexer only yields entries inside a block.
                other => {
                    tracing::trace!(line, "Ignoring {other:?} inside block");
                }
            }
        }

        let mut pos = 0;
        let fields = fold(&entries, &mut pos, 0);
        Self {
            line,
            fields,
            stray,
            terminated,
        }
    }
}

/// Fold entries at `indent` or deeper into fields, starting at `pos`.
fn fold<'a>(entries: &[(usize, Entry<'a>)], pos: &mut usize, indent: usize) -> Vec<Field<'a>> {
    let mut fields = Vec::new();
    while let Some((line, entry)) = entries.get(*pos) {
        if entry.indent < indent {
            break;
        }
        *pos += 1;
        let value = match entry.value {
            Some(text) => FieldValue::Scalar(text),
            None => match entries.get(*pos) {
                Some((_, child)) if child.indent > entry.indent => {
                    FieldValue::Map(fold(entries, pos, child.indent))
                }
                _ => FieldValue::Map(Vec::new()),
            },
        };
        fields.push(Field {
            line: *line,
            key: entry.key.clone(),
            value,
        });
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::lexer::Lexer;
    use serde_json::json;

    fn block(text: &str) -> FrontMatter<'_> {
        let mut lexer = Lexer::new(text);
        let start = lexer.next().expect("block start");
        assert_eq!(start.token, Token::BlockStart);
        FrontMatter::read(start.line, &mut lexer)
    }

    fn field<'f, 'a>(fm: &'f FrontMatter<'a>, key: &str) -> Option<&'f Field<'a>> {
        fm.fields.iter().find(|f| f.key == key)
    }

    #[test]
    fn test_flat_block() {
        let fm = block("---\nid: page1\nname: Page 1\n---\n");
        assert!(fm.terminated);
        assert_eq!(fm.line, 1);
        assert_eq!(field(&fm, "id").and_then(Field::as_scalar), Some("page1"));
        assert_eq!(field(&fm, "name").and_then(Field::as_scalar), Some("Page 1"));
        assert_eq!(field(&fm, "name").map(|f| f.line), Some(3));
        assert!(field(&fm, "missing").is_none());
    }

    #[test]
    fn test_nested_block() {
        let fm = block("---\nid: s\nprops:\n  color: \"red\"\n  size: 3\nparentId: p\n---\n");
        let props = field(&fm, "props").and_then(Field::as_map).expect("props map");
        assert_eq!(props.len(), 2);
        assert_eq!(props[1].as_scalar(), Some("3"));
        assert_eq!(field(&fm, "parentId").and_then(Field::as_scalar), Some("p"));
    }

    #[test]
    fn test_empty_map_reads_as_empty_scalar() {
        let fm = block("---\nprops:\nid:\n---\n");
        assert_eq!(field(&fm, "props").and_then(Field::as_map), Some(&[][..]));
        assert_eq!(field(&fm, "id").and_then(Field::as_scalar), Some(""));
    }

    #[test]
    fn test_deeper_nesting() {
        let fm = block("---\na:\n  b:\n    c: 1\n  d: 2\n---\n");
        let a = field(&fm, "a").expect("a");
        assert_eq!(a.to_json_lossy(), json!({"b": {"c": 1}, "d": 2}));
    }

    #[test]
    fn test_lossy_json_keeps_unquoted_text() {
        let fm = block("---\ncolor: red\nsize: 12\n---\n");
        assert_eq!(fm.fields[0].to_json_lossy(), json!("red"));
        assert_eq!(fm.fields[1].to_json_lossy(), json!(12));
    }

    #[test]
    fn test_stray_and_unterminated() {
        let fm = block("---\nid: x\njust words\n");
        assert!(!fm.terminated);
        assert_eq!(fm.stray, vec![(3, "just words")]);
    }
}

//! Line tokenizer.
//!
//! Turns the text into a stream of structural tokens, one per meaningful
//! line. Headings are only recognised outside front-matter blocks, so block
//! contents can never be mistaken for document structure.
//!
//! A block that is closed by `---` and directly followed (no blank line) by
//! more entries continues as a new block: the closing separator doubles as
//! the opening one. This is how the asset list and a shape's `props` segment
//! are laid out.

use std::borrow::Cow;
use std::iter::Enumerate;
use std::str::Lines;

use super::{ASSETS_HEADING, PAGES_HEADING, SEPARATOR, SHAPES_HEADING, SHAPE_HEADING_PREFIX};

/// A token together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    /// 1-based line number.
    pub line: usize,
    /// The token.
    pub token: T,
}

/// One `key: value` or `key:` line inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Leading whitespace width.
    pub indent: usize,
    /// Key, decoded when it was written as a JSON string.
    pub key: Cow<'a, str>,
    /// Value text, exactly as written after `": "`; `None` for `key:`,
    /// which opens a nested map.
    pub value: Option<&'a str>,
}

/// Structural events of the text format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `# <title>`.
    Title(&'a str),
    /// `## Pages`.
    PagesStart,
    /// `### <page name>`.
    PageStart(&'a str),
    /// `#### Shapes`.
    ShapesStart,
    /// `##### Shape <id>`, carrying the id text.
    ShapeStart(&'a str),
    /// `## Assets`.
    AssetsStart,
    /// Any other heading.
    Heading {
        /// Number of `#`.
        level: usize,
        /// Heading text.
        text: &'a str,
    },
    /// A front-matter block opens.
    BlockStart,
    /// An entry inside a block.
    Entry(Entry<'a>),
    /// A line inside a block that is not an entry.
    Stray(&'a str),
    /// A front-matter block closes.
    BlockEnd {
        /// The block ended at a heading or end of input instead of `---`.
        implicit: bool,
    },
    /// Prose outside any block.
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Outside,
    Inside,
    AfterBlock,
}

/// Tokenizer over the lines of a document.
#[derive(Debug)]
pub struct Lexer<'a> {
    lines: Enumerate<Lines<'a>>,
    mode: Mode,
    pending: Option<Spanned<Token<'a>>>,
    last_line: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            mode: Mode::Outside,
            pending: None,
            last_line: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Spanned<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }

        loop {
            let Some((index, raw)) = self.lines.next() else {
                if self.mode == Mode::Inside {
                    self.mode = Mode::Outside;
                    return Some(spanned(self.last_line, Token::BlockEnd { implicit: true }));
                }
                return None;
            };
            let line = index + 1;
            self.last_line = line;
            let trimmed = raw.trim();

            match self.mode {
                Mode::Inside => {
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed == SEPARATOR {
                        self.mode = Mode::AfterBlock;
                        return Some(spanned(line, Token::BlockEnd { implicit: false }));
                    }
                    if raw.starts_with('#') {
                        if let Some(token) = heading(trimmed) {
                            self.mode = Mode::Outside;
                            self.pending = Some(spanned(line, token));
                            return Some(spanned(line, Token::BlockEnd { implicit: true }));
                        }
                    }
                    return Some(spanned(line, entry(raw)));
                }
                Mode::AfterBlock => {
                    if trimmed.is_empty() {
                        self.mode = Mode::Outside;
                        continue;
                    }
                    if trimmed == SEPARATOR {
                        self.mode = Mode::Inside;
                        return Some(spanned(line, Token::BlockStart));
                    }
                    if let Some(token) = heading(trimmed) {
                        self.mode = Mode::Outside;
                        return Some(spanned(line, token));
                    }
                    self.mode = Mode::Inside;
                    self.pending = Some(spanned(line, entry(raw)));
                    return Some(spanned(line, Token::BlockStart));
                }
                Mode::Outside => {
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed == SEPARATOR {
                        self.mode = Mode::Inside;
                        return Some(spanned(line, Token::BlockStart));
                    }
                    let token = heading(trimmed).unwrap_or(Token::Text(trimmed));
                    return Some(spanned(line, token));
                }
            }
        }
    }
}

fn spanned(line: usize, token: Token<'_>) -> Spanned<Token<'_>> {
    Spanned { line, token }
}

/// Classify a trimmed `#`-line, or `None` if it is not a heading.
fn heading(trimmed: &str) -> Option<Token<'_>> {
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    // A trimmed heading with empty text has nothing after the hashes.
    let text = if rest.is_empty() {
        rest
    } else {
        rest.strip_prefix(' ')?.trim()
    };

    let token = match level {
        1 => Token::Title(text),
        2 if text == PAGES_HEADING => Token::PagesStart,
        2 if text == ASSETS_HEADING => Token::AssetsStart,
        3 => Token::PageStart(text),
        4 if text == SHAPES_HEADING => Token::ShapesStart,
        5 if text.starts_with(SHAPE_HEADING_PREFIX) => {
            Token::ShapeStart(text[SHAPE_HEADING_PREFIX.len()..].trim())
        }
        _ => Token::Heading { level, text },
    };
    Some(token)
}

/// Split a block line into an entry.
fn entry(raw: &str) -> Token<'_> {
    let body = raw.trim_start();
    let indent = raw.len() - body.len();
    let body = body.trim_end_matches('\r');

    if body.starts_with('"') {
        return quoted_entry(indent, body).unwrap_or(Token::Stray(body));
    }

    if let Some((key, value)) = body.split_once(": ") {
        return Token::Entry(Entry {
            indent,
            key: Cow::Borrowed(key.trim_end()),
            value: Some(value),
        });
    }
    if let Some(key) = body.strip_suffix(':') {
        return Token::Entry(Entry {
            indent,
            key: Cow::Borrowed(key.trim_end()),
            value: None,
        });
    }
    Token::Stray(body.trim_end())
}

/// Entry whose key is a JSON string literal.
fn quoted_entry(indent: usize, body: &str) -> Option<Token<'_>> {
    let mut stream = serde_json::Deserializer::from_str(body).into_iter::<String>();
    let key = stream.next()?.ok()?;
    let rest = &body[stream.byte_offset()..];

    let value = if rest == ":" {
        None
    } else {
        Some(rest.strip_prefix(": ")?)
    };
    Some(Token::Entry(Entry {
        indent,
        key: Cow::Owned(key),
        value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token<'_>> {
        Lexer::new(text).map(|s| s.token).collect()
    }

    fn entry_token<'a>(indent: usize, key: &'a str, value: Option<&'a str>) -> Token<'a> {
        Token::Entry(Entry {
            indent,
            key: Cow::Borrowed(key),
            value,
        })
    }

    #[test]
    fn test_structural_headings() {
        let text = "# Doc\n## Pages\n### Page 1\n#### Shapes\n##### Shape s1\n## Assets\n## Notes\n";
        assert_eq!(
            tokens(text),
            vec![
                Token::Title("Doc"),
                Token::PagesStart,
                Token::PageStart("Page 1"),
                Token::ShapesStart,
                Token::ShapeStart("s1"),
                Token::AssetsStart,
                Token::Heading {
                    level: 2,
                    text: "Notes"
                },
            ]
        );
    }

    #[test]
    fn test_heading_requires_space_and_allows_empty_text() {
        assert_eq!(tokens("###"), vec![Token::PageStart("")]);
        assert_eq!(tokens("#hashtag"), vec![Token::Text("#hashtag")]);
    }

    #[test]
    fn test_block_entries_and_nesting() {
        let text = "---\nid: s1\nprops:\n  color: \"red\"\n---\n";
        assert_eq!(
            tokens(text),
            vec![
                Token::BlockStart,
                entry_token(0, "id", Some("s1")),
                entry_token(0, "props", None),
                entry_token(2, "color", Some("\"red\"")),
                Token::BlockEnd { implicit: false },
            ]
        );
    }

    #[test]
    fn test_headings_inside_blocks_are_entries() {
        // An indented `#` line stays part of the block.
        let text = "---\nprops:\n  # note: 1\n---\n";
        let toks = tokens(text);
        assert_eq!(toks[2], entry_token(2, "# note", Some("1")));
    }

    #[test]
    fn test_block_run_shares_separators() {
        let text = "---\na:\n  type: x\n---\nb:\n  type: y\n---\n";
        let toks = tokens(text);
        let starts = toks.iter().filter(|t| **t == Token::BlockStart).count();
        let ends = toks
            .iter()
            .filter(|t| matches!(t, Token::BlockEnd { implicit: false }))
            .count();
        assert_eq!(starts, 2);
        assert_eq!(ends, 2);
    }

    #[test]
    fn test_blank_line_ends_block_run() {
        let text = "---\nid: p\n---\n\nsome prose\n";
        assert_eq!(
            tokens(text).last(),
            Some(&Token::Text("some prose"))
        );
    }

    #[test]
    fn test_empty_block_with_blank_line() {
        let text = "---\n\n---\n";
        assert_eq!(
            tokens(text),
            vec![Token::BlockStart, Token::BlockEnd { implicit: false }]
        );
    }

    #[test]
    fn test_unterminated_block_closes_at_heading_and_eof() {
        let text = "---\nid: p\n### Next\n---\nid: q\n";
        assert_eq!(
            tokens(text),
            vec![
                Token::BlockStart,
                entry_token(0, "id", Some("p")),
                Token::BlockEnd { implicit: true },
                Token::PageStart("Next"),
                Token::BlockStart,
                entry_token(0, "id", Some("q")),
                Token::BlockEnd { implicit: true },
            ]
        );
    }

    #[test]
    fn test_entry_splitting() {
        assert_eq!(entry("name: A: B"), entry_token(0, "name", Some("A: B")));
        assert_eq!(entry("id: shape:abc"), entry_token(0, "id", Some("shape:abc")));
        assert_eq!(entry("asset:abc:"), entry_token(0, "asset:abc", None));
        assert_eq!(entry("name: "), entry_token(0, "name", Some("")));
        assert_eq!(entry("  data: x  "), entry_token(2, "data", Some("x  ")));
        assert_eq!(entry("no separator"), Token::Stray("no separator"));
    }

    #[test]
    fn test_quoted_keys() {
        assert_eq!(
            entry("  \"a: b\": 1"),
            Token::Entry(Entry {
                indent: 2,
                key: Cow::Owned("a: b".to_string()),
                value: Some("1"),
            })
        );
        assert_eq!(
            entry("\"ends:\":"),
            Token::Entry(Entry {
                indent: 0,
                key: Cow::Owned("ends:".to_string()),
                value: None,
            })
        );
        assert_eq!(entry("\"broken"), Token::Stray("\"broken"));
    }

    #[test]
    fn test_crlf_input() {
        let text = "---\r\nid: p\r\n---\r\n";
        assert_eq!(
            tokens(text),
            vec![
                Token::BlockStart,
                entry_token(0, "id", Some("p")),
                Token::BlockEnd { implicit: false },
            ]
        );
    }

    #[test]
    fn test_line_numbers() {
        let spans: Vec<_> = Lexer::new("\n---\nid: p\n---\n").map(|s| s.line).collect();
        assert_eq!(spans, vec![2, 3, 4]);
    }
}

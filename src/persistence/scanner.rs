//! Extracts layout (blank lines, comments) from YAML text
//!
//! Block-style nodes are tracked by indentation, so full-line comments and
//! end-of-line comments are attached to the path of the node they belong
//! to at any depth. The inside of block scalars and multi-line flow
//! collections is content, not layout.

use crate::core::layout::{Layout, NodePath, Segment};
use regex::Regex;
use std::sync::OnceLock;

fn block_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^[|>][-+1-9]*$").expect("static regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Key,
    Dash,
}

#[derive(Debug)]
struct OpenNode {
    column: usize,
    token: Token,
    path: NodePath,
}

#[derive(Debug)]
struct BlockScalar {
    column: usize,
    keep: bool,
}

#[derive(Debug, Default)]
struct Scanner {
    layout: Layout,
    pending: Vec<String>,
    stack: Vec<OpenNode>,
    block: Option<BlockScalar>,
    flow_depth: usize,
}

/// Build the layout table for a YAML document
pub fn scan(text: &str) -> Layout {
    let mut scanner = Scanner::default();
    for raw in text.lines() {
        scanner.line(raw);
    }
    scanner.layout.set_trailer(scanner.pending);
    scanner.layout
}

impl Scanner {
    fn line(&mut self, raw: &str) {
        let trimmed = raw.trim();
        let indent = raw.len() - raw.trim_start_matches(' ').len();

        if let Some(block) = &self.block {
            if trimmed.is_empty() {
                // Trailing blank lines of a keep-chomped scalar are content
                if !block.keep {
                    self.pending.push(String::new());
                }
                return;
            }
            if indent > block.column {
                self.pending.clear();
                return;
            }
            self.block = None;
        }

        if self.flow_depth > 0 {
            let (content, _) = split_comment(raw);
            self.flow_depth = apply_balance(self.flow_depth, content);
            return;
        }

        if trimmed.is_empty() {
            self.pending.push(String::new());
            return;
        }
        if trimmed.starts_with('#') {
            self.pending.push(trimmed.to_string());
            return;
        }
        if trimmed == "---" || trimmed == "..." || trimmed.starts_with('%') {
            return;
        }

        let (content, comment) = split_comment(raw);
        let mut column = indent;
        let mut rest = &content[indent.min(content.len())..];
        let mut last = None;
        let mut node_column = indent;

        loop {
            if rest == "-" || rest.starts_with("- ") {
                let path = self.open(column, Token::Dash, None, last.is_none());
                last = Some(path);
                node_column = column;
                let after = &rest[1..];
                let value = after.trim_start();
                column += 1 + after.len() - value.len();
                rest = value;
                if rest.is_empty() {
                    break;
                }
                continue;
            }

            if let Some((key, value)) = split_entry(rest) {
                let path = self.open(column, Token::Key, Some(key), last.is_none());
                last = Some(path);
                node_column = column;
                rest = value;
            }
            break;
        }

        let Some(path) = last else {
            // Continuation of a multi-line scalar
            return;
        };

        if let Some(captures) = block_header().captures(rest) {
            self.block = Some(BlockScalar {
                column: node_column,
                keep: captures[0].contains('+'),
            });
        } else if rest.starts_with('[') || rest.starts_with('{') {
            self.flow_depth = apply_balance(0, rest);
        }

        if let Some(comment) = comment {
            self.layout.set_comment_after(path, comment);
        }
    }

    /// Register a node starting at `column` and return its path. The first
    /// node on a line takes the pending layout lines.
    fn open(&mut self, column: usize, token: Token, key: Option<String>, first: bool) -> NodePath {
        while self.stack.last().is_some_and(|top| {
            top.column > column
                || (top.column == column && top.token == Token::Dash && token == Token::Key)
        }) {
            self.stack.pop();
        }

        let sibling = self
            .stack
            .last()
            .is_some_and(|top| top.column == column && top.token == token);
        let (parent, index) = match self.stack.pop() {
            Some(top) if sibling => {
                let index = match top.path.last() {
                    Some(Segment::Index(index)) => index + 1,
                    _ => 0,
                };
                (top.path.parent().unwrap_or_default(), index)
            }
            Some(top) => {
                let parent = top.path.clone();
                self.stack.push(top);
                (parent, 0)
            }
            None => (NodePath::root(), 0),
        };

        let path = match key {
            Some(key) => parent.key(&key),
            None => parent.index(index),
        };
        if first {
            let lines = std::mem::take(&mut self.pending);
            self.layout.set_lines_before(path.clone(), lines);
        }
        self.stack.push(OpenNode {
            column,
            token,
            path: path.clone(),
        });
        path
    }
}

/// Split a line into its content and the end-of-line comment, keeping the
/// whitespace in front of `#` with the comment
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut previous = ' ';
    let mut scalar_start = true;

    let mut chars = line.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        match quote {
            Some('\'') if c == '\'' => {
                if chars.peek().is_some_and(|(_, next)| *next == '\'') {
                    chars.next();
                } else {
                    quote = None;
                }
            }
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some('"') if c == '"' => quote = None,
            Some(_) => {}
            None => {
                if c == '#' && previous.is_whitespace() {
                    let content = line[..index].trim_end();
                    return (content, Some(&line[content.len()..]));
                }
                if (c == '"' || c == '\'') && scalar_start {
                    quote = Some(c);
                }
                if !c.is_whitespace() {
                    scalar_start = matches!(c, ':' | '-' | '[' | '{' | ',' | '?');
                }
            }
        }
        previous = c;
    }
    (line.trim_end(), None)
}

/// Bracket depth after `text`, ignoring quoted strings
fn apply_balance(depth: usize, text: &str) -> usize {
    let mut depth = depth;
    let mut quote: Option<char> = None;
    for c in text.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' | '{' => depth += 1,
                ']' | '}' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    depth
}

/// Key and value text of a `key: value` line, if the line starts a mapping
/// entry
fn split_entry(line: &str) -> Option<(String, &str)> {
    if line.starts_with('{') || line.starts_with('[') || line.starts_with('?') {
        return None;
    }

    if line.starts_with('"') {
        let end = closing_double_quote(line)?;
        let value = key_separator(&line[end + 1..])?;
        let key = serde_json::from_str(&line[..=end]).ok()?;
        return Some((key, value));
    }

    if let Some(body) = line.strip_prefix('\'') {
        let mut key = String::new();
        let mut chars = body.char_indices().peekable();
        while let Some((index, c)) = chars.next() {
            if c == '\'' {
                if chars.peek().map(|(_, next)| *next) == Some('\'') {
                    key.push('\'');
                    chars.next();
                    continue;
                }
                let value = key_separator(&body[index + 1..])?;
                return Some((key, value));
            }
            key.push(c);
        }
        return None;
    }

    let bytes = line.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte == b':' && (index + 1 == bytes.len() || bytes[index + 1] == b' ') {
            return Some((line[..index].trim_end().to_string(), line[index + 1..].trim_start()));
        }
    }
    None
}

/// Value text after a `:` separator
fn key_separator(rest: &str) -> Option<&str> {
    let rest = rest.trim_start_matches(' ');
    if rest == ":" {
        Some("")
    } else {
        rest.strip_prefix(": ").map(str::trim_start)
    }
}

fn closing_double_quote(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in line.char_indices().skip(1) {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(index),
            _ => escaped = false,
        }
    }
    None
}

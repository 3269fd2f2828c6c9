//! Block-style YAML writer
//!
//! serde_yaml renders scalars (quoting, block strings); the structure
//! (mappings, sequences, indentation) is written here so the output is
//! stable and layout lines and end-of-line comments can be attached to any
//! node.

use crate::core::error::WorkflowResult;
use crate::core::layout::{Layout, NodePath};
use serde_yaml::Value;

const INDENT: usize = 2;

/// Accumulates YAML text, placing the layout recorded for each node
#[derive(Debug)]
pub struct YamlWriter<'a> {
    out: String,
    layout: &'a Layout,
}

impl<'a> YamlWriter<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            out: String::new(),
            layout,
        }
    }

    fn nested(&self) -> Self {
        Self::new(self.layout)
    }

    /// Write blank lines and comments at the given indentation
    pub fn layout_lines(&mut self, lines: &[String], indent: usize) {
        for line in lines {
            if line.is_empty() {
                self.out.push('\n');
            } else {
                push_indent(&mut self.out, indent);
                self.out.push_str(line);
                self.out.push('\n');
            }
        }
    }

    /// Write a bare `key:` line opening a nested block at `path`
    pub fn open(&mut self, key: &Value, path: &NodePath, indent: usize) -> WorkflowResult<()> {
        self.layout_lines(self.layout.lines_before(path), indent);
        let start = self.out.len();
        self.key_line(key, indent)?;
        self.annotate(start, path);
        Ok(())
    }

    fn key_line(&mut self, key: &Value, indent: usize) -> WorkflowResult<()> {
        push_indent(&mut self.out, indent);
        self.out.push_str(&format_key(key)?);
        self.out.push_str(":\n");
        Ok(())
    }

    /// Write `key: value` at `path`, nesting collections below the key
    pub fn entry(&mut self, key: &Value, value: &Value, path: &NodePath, indent: usize) -> WorkflowResult<()> {
        self.layout_lines(self.layout.lines_before(path), indent);
        let start = self.out.len();
        match value {
            Value::Mapping(mapping) if !mapping.is_empty() => {
                self.key_line(key, indent)?;
                for (k, v) in mapping {
                    self.entry(k, v, &path.key(&key_text(k)?), indent + INDENT)?;
                }
            }
            Value::Sequence(items) if !items.is_empty() => {
                self.key_line(key, indent)?;
                for (index, item) in items.iter().enumerate() {
                    self.item(item, &path.index(index), indent + INDENT)?;
                }
            }
            Value::Null => self.key_line(key, indent)?,
            scalar => {
                push_indent(&mut self.out, indent);
                self.out.push_str(&format_key(key)?);
                self.out.push_str(": ");
                self.out.push_str(&render_scalar(scalar, indent)?);
                self.out.push('\n');
            }
        }
        self.annotate(start, path);
        Ok(())
    }

    /// Write one `- item` of a sequence at `path`
    pub fn item(&mut self, value: &Value, path: &NodePath, indent: usize) -> WorkflowResult<()> {
        self.layout_lines(self.layout.lines_before(path), indent);
        let start = match value {
            Value::Mapping(mapping) if !mapping.is_empty() => {
                let mut nested = self.nested();
                for (k, v) in mapping {
                    nested.entry(k, v, &path.key(&key_text(k)?), indent + INDENT)?;
                }
                self.push_dashed(&nested.out, indent)
            }
            Value::Sequence(items) if !items.is_empty() => {
                let mut nested = self.nested();
                for (index, item) in items.iter().enumerate() {
                    nested.item(item, &path.index(index), indent + INDENT)?;
                }
                self.push_dashed(&nested.out, indent)
            }
            scalar => {
                let start = self.out.len();
                push_indent(&mut self.out, indent);
                self.out.push_str("- ");
                self.out.push_str(&render_scalar(scalar, indent)?);
                self.out.push('\n');
                start
            }
        };
        self.annotate(start, path);
        Ok(())
    }

    /// Append a block rendered one level deeper, turning the indentation of
    /// its first node into the sequence dash. Returns where the dash line
    /// starts.
    fn push_dashed(&mut self, block: &str, indent: usize) -> usize {
        let mut rest = block;
        // Layout lines of the first nested node move above the dash
        while let Some((line, tail)) = rest.split_once('\n') {
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                break;
            }
            self.out.push_str(line);
            self.out.push('\n');
            rest = tail;
        }

        let start = self.out.len();
        push_indent(&mut self.out, indent);
        self.out.push_str("- ");
        self.out.push_str(rest.get(indent + INDENT..).unwrap_or_else(|| rest.trim_start()));
        start
    }

    /// Append the end-of-line comment of `path` to the first line written
    /// since `start`
    fn annotate(&mut self, start: usize, path: &NodePath) {
        if let Some(comment) = self.layout.comment_after(path) {
            let end = self.out[start..]
                .find('\n')
                .map_or(self.out.len(), |offset| start + offset);
            self.out.insert_str(end, comment);
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}

/// Text of a mapping key as the layout table stores it
pub fn key_text(key: &Value) -> WorkflowResult<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_yaml::to_string(other)?.trim_end().to_string()),
    }
}

/// String keys are written plain when that reads back as the same string.
/// Other keys go through serde_yaml so they keep their type.
fn format_key(key: &Value) -> WorkflowResult<String> {
    match key {
        Value::String(key) => Ok(format_string_key(key)),
        other => key_text(other),
    }
}

fn format_string_key(key: &str) -> String {
    let plain = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ' '))
        && !key.ends_with(' ')
        && !matches!(key.to_ascii_lowercase().as_str(), "true" | "false" | "null");

    if plain {
        key.to_string()
    } else {
        serde_json::Value::String(key.to_string()).to_string()
    }
}

/// Render a scalar via serde_yaml, re-indenting continuation lines of
/// block strings under the owning key
fn render_scalar(value: &Value, indent: usize) -> WorkflowResult<String> {
    let rendered = serde_yaml::to_string(value)?;
    // Only the document's final newline goes; keep-chomped strings may
    // also be followed by an explicit `...` end marker.
    let body = rendered
        .strip_suffix("\n...\n")
        .or_else(|| rendered.strip_suffix('\n'))
        .unwrap_or(&rendered);

    let mut lines = body.split('\n');
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            push_indent(&mut out, indent);
        }
        out.push_str(line);
    }
    Ok(out)
}

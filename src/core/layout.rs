//! Formatting side table
//!
//! Comments and blank lines are not part of the data model. They are kept
//! here, keyed by the path of the node they belong to, and written back by
//! the emitter. Data operations never need to look at this table.

use std::collections::HashMap;

const JOBS_KEY: &str = "jobs";

/// One step of a path from the document root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key, as text
    Key(String),
    /// Position in a sequence
    Index(usize),
}

/// Location of a node, e.g. `jobs` / `deploy` / `steps` / `1` / `run`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<Segment>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// A top-level key (`name`, `on`, `jobs`, ...)
    pub fn top(key: &str) -> Self {
        Self::root().key(key)
    }

    /// A stage under `jobs`
    pub fn stage(name: &str) -> Self {
        Self::top(JOBS_KEY).key(name)
    }

    pub fn key(&self, key: &str) -> Self {
        self.child(Segment::Key(key.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

/// Lines written before nodes, end-of-line comments, and a trailer after
/// the last node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    before: HashMap<NodePath, Vec<String>>,
    comments: HashMap<NodePath, String>,
    trailer: Vec<String>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines (blank or `#` comments, without indentation) preceding a node
    pub fn lines_before(&self, path: &NodePath) -> &[String] {
        self.before.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_lines_before(&mut self, path: NodePath, lines: Vec<String>) {
        if lines.is_empty() {
            self.before.remove(&path);
        } else {
            self.before.insert(path, lines);
        }
    }

    /// Make sure at least one blank line separates a node from what precedes it
    pub fn ensure_blank_before(&mut self, path: NodePath) {
        let lines = self.before.entry(path).or_default();
        if !lines.iter().any(|line| line.is_empty()) {
            lines.insert(0, String::new());
        }
    }

    pub fn has_blank_before(&self, path: &NodePath) -> bool {
        self.lines_before(path).iter().any(|line| line.is_empty())
    }

    /// Comment ending the line a node starts on, including the whitespace
    /// that separates it from the value
    pub fn comment_after(&self, path: &NodePath) -> Option<&str> {
        self.comments.get(path).map(String::as_str)
    }

    pub fn set_comment_after(&mut self, path: NodePath, comment: impl Into<String>) {
        self.comments.insert(path, comment.into());
    }

    pub fn trailer(&self) -> &[String] {
        &self.trailer
    }

    pub fn set_trailer(&mut self, lines: Vec<String>) {
        self.trailer = lines;
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.comments.is_empty() && self.trailer.is_empty()
    }
}

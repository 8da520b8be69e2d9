//! Locations inside a recipe document.

use std::fmt::{self, Display};

/// One step from a parent value to a child value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object field, e.g. `child`
    Key(&'static str),
    /// Array element, e.g. `[2]`
    Index(usize),
}

/// A path from the document root to a value, rendered JSONPath-style
/// (`$.root.children[1].radius`).
///
/// Paths are built by extension: every recursive step clones its parent's
/// path and appends one segment, so a path is never shared between nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// The document itself (`$`).
    pub const fn document() -> Self {
        Self { segments: Vec::new() }
    }

    /// Path of the root node of a recipe (`$.root`).
    pub fn root() -> Self {
        Self::document().key("root")
    }

    /// Return a new path with a field access appended.
    pub fn key(&self, key: &'static str) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Key(key));
        path
    }

    /// Return a new path with an array index appended.
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Index(index));
        path
    }

    /// Number of segments below the document.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

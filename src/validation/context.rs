//! Field path cursor used to locate validation errors

use crate::validation::error::ValidationError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One step into the configuration tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathSegment {
    /// `.name`
    Field(String),
    /// `[3]`
    Index(usize),
    /// `[key]`, for map entries
    Key(String),
}

#[derive(Debug)]
struct Node {
    segment: PathSegment,
    parent: Option<Arc<Node>>,
}

/// Immutable position in the configuration.
///
/// Extending a context allocates a single node and shares the prefix with the
/// context it was derived from, so cloning and branching are cheap.
#[derive(Debug, Clone, Default)]
pub struct ConfigContext {
    head: Option<Arc<Node>>,
}

impl ConfigContext {
    /// Context pointing at the configuration root
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Self {
        self.push(PathSegment::Field(name.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    pub fn key(&self, key: &str) -> Self {
        self.push(PathSegment::Key(key.to_string()))
    }

    fn push(&self, segment: PathSegment) -> Self {
        Self {
            head: Some(Arc::new(Node {
                segment,
                parent: self.head.clone(),
            })),
        }
    }

    /// Segments from the root down to this position
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut segments = Vec::new();
        let mut node = self.head.as_ref();
        while let Some(current) = node {
            segments.push(current.segment.clone());
            node = current.parent.as_ref();
        }
        segments.reverse();
        segments
    }

    /// Build an error located at this position
    pub fn error(&self, message: impl Into<String>) -> ValidationError {
        ValidationError::new(self.segments(), message)
    }
}

impl fmt::Display for ConfigContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_path(&self.segments()))
    }
}

/// Render segments as `tests[0].steps.pre[1]`
pub fn render_path(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            PathSegment::Key(key) => {
                out.push('[');
                out.push_str(key);
                out.push(']');
            }
        }
    }
    out
}

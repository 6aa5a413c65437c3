//! Context paths locating diagnostics within the target document
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a context path: a property name, an array index, or a
/// synthetic combinator label tagging which branch an error came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSegment {
    Property(String),
    Index(usize),
    Label(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => write!(f, ".{}", name),
            Self::Index(index) => write!(f, "[{}]", index),
            Self::Label(label) => write!(f, "<{}>", label),
        }
    }
}

/// Current location during a validation walk.
///
/// Child contexts are cheap clones with one more segment; the walk never
/// mutates a parent's path.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    segments: Vec<PathSegment>,
}

impl ValidationContext {
    /// Context at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Child context for an object property.
    pub fn child(&self, name: &str) -> Self {
        self.extend(PathSegment::Property(name.to_string()))
    }

    /// Child context for an array element.
    pub fn child_index(&self, index: usize) -> Self {
        self.extend(PathSegment::Index(index))
    }

    /// Child context tagged with a combinator label; the document
    /// location is unchanged.
    pub fn child_label<L: Into<String>>(&self, label: L) -> Self {
        self.extend(PathSegment::Label(label.into()))
    }

    fn extend(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Render the path as a compact locator string rooted at `$`.
    pub fn render(&self) -> String {
        let mut rendered = String::from("$");
        for segment in &self.segments {
            rendered.push_str(&segment.to_string());
        }
        rendered
    }
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_paths_render() {
        let root = ValidationContext::root();
        assert_eq!(root.render(), "$");

        let nested = root.child("profile").child_index(0).child("age");
        assert_eq!(nested.render(), "$.profile[0].age");

        let labeled = root.child("color").child_label("allOf[1]");
        assert_eq!(labeled.render(), "$.color<allOf[1]>");
    }

    #[test]
    fn test_children_do_not_mutate_parent() {
        let root = ValidationContext::root();
        let _ = root.child("a");
        assert!(root.segments().is_empty());
    }
}

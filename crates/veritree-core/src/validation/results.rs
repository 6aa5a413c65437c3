//! Located diagnostics and the per-call result collector
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

use super::context::PathSegment;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// One constraint violation: where in the target document it occurred
/// and what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path segments locating the violating value (or the combinator
    /// branch the violation came from).
    pub context: Vec<PathSegment>,
    /// Human-readable message.
    pub description: String,
}

impl ValidationError {
    pub fn new<D: Into<String>>(context: Vec<PathSegment>, description: D) -> Self {
        Self {
            context,
            description: description.into(),
        }
    }

    /// Render the context path as a compact locator string rooted at `$`.
    pub fn context_path(&self) -> String {
        let mut rendered = String::from("$");
        for segment in &self.context {
            rendered.push_str(&segment.to_string());
        }
        rendered
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at '{}': {}", self.context_path(), self.description)
    }
}

/// Ordered collector of the diagnostics from one validation call.
///
/// Errors arrive in discovery order (depth-first, left-to-right) and
/// drain in the same FIFO order through [`pop_error`]. A collector
/// belongs to exactly one call; the pass flag and the error list are two
/// views of the same state, so `passed()` is `true` exactly when the
/// collector is empty.
///
/// [`pop_error`]: ValidationResults::pop_error
#[derive(Debug, Default)]
pub struct ValidationResults {
    errors: VecDeque<ValidationError>,
}

impl ValidationResults {
    /// Whether the document satisfied every constraint.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Non-destructive emptiness check.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Non-destructive count of collected errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Destructively drain the next error in FIFO order.
    pub fn pop_error(&mut self) -> Option<ValidationError> {
        self.errors.pop_front()
    }

    /// Iterate collected errors without draining them.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }
}

impl From<Vec<ValidationError>> for ValidationResults {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self {
            errors: errors.into(),
        }
    }
}

impl fmt::Display for ValidationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation produced {} error(s):", self.errors.len())?;
        for (number, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. {}", number + 1, error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(description: &str) -> ValidationError {
        ValidationError::new(vec![PathSegment::Property("a".to_string())], description)
    }

    #[test]
    fn test_fifo_drain() {
        let mut results =
            ValidationResults::from(vec![error("first"), error("second"), error("third")]);
        assert!(results.has_errors());
        assert_eq!(results.error_count(), 3);
        assert!(!results.passed());

        assert_eq!(results.pop_error().unwrap().description, "first");
        assert_eq!(results.pop_error().unwrap().description, "second");
        assert_eq!(results.pop_error().unwrap().description, "third");
        assert!(results.pop_error().is_none());
        assert!(results.passed());
    }

    #[test]
    fn test_display_numbers_errors() {
        let results = ValidationResults::from(vec![error("first"), error("second")]);
        let report = results.to_string();
        assert!(report.contains("2 error(s)"));
        assert!(report.contains("1. at '$.a': first"));
        assert!(report.contains("2. at '$.a': second"));
    }
}

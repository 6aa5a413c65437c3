//! Uniform read-only view over generic tree values
//!
//! The concrete tree representation is `serde_json::Value`; this module adds
//! the kind classification the compiler and the validation engine dispatch
//! on. Draft-4 semantics apply: `number` admits integer values, `integer`
//! admits only integers.
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::fmt;

/// Primitive kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl NodeKind {
    /// Classify a document value.
    ///
    /// A number with an integral representation is `Integer`; any other
    /// number is `Number`. Note that `1.0` parses as a float and therefore
    /// classifies as `Number`, not `Integer`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Self::Integer
                } else {
                    Self::Number
                }
            }
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Parse a kind name as it appears under the `type` keyword.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// The keyword name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether a declared kind admits a document value of kind `actual`.
    pub fn admits(self, actual: NodeKind) -> bool {
        self == actual || (self == Self::Number && actual == Self::Integer)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classification() {
        assert_eq!(NodeKind::of(&json!(null)), NodeKind::Null);
        assert_eq!(NodeKind::of(&json!(true)), NodeKind::Boolean);
        assert_eq!(NodeKind::of(&json!(42)), NodeKind::Integer);
        assert_eq!(NodeKind::of(&json!(-7)), NodeKind::Integer);
        assert_eq!(NodeKind::of(&json!(1.5)), NodeKind::Number);
        assert_eq!(NodeKind::of(&json!(1.0)), NodeKind::Number);
        assert_eq!(NodeKind::of(&json!("hi")), NodeKind::String);
        assert_eq!(NodeKind::of(&json!([1])), NodeKind::Array);
        assert_eq!(NodeKind::of(&json!({"a": 1})), NodeKind::Object);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [
            NodeKind::Null,
            NodeKind::Boolean,
            NodeKind::Integer,
            NodeKind::Number,
            NodeKind::String,
            NodeKind::Array,
            NodeKind::Object,
        ] {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("float"), None);
    }

    #[test]
    fn test_number_admits_integer() {
        assert!(NodeKind::Number.admits(NodeKind::Integer));
        assert!(!NodeKind::Integer.admits(NodeKind::Number));
        assert!(NodeKind::Integer.admits(NodeKind::Integer));
    }
}

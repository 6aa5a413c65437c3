//! Fatal error types for schema compilation and the validation engine
//!
//! Constraint violations discovered while validating a document are *not*
//! errors of the call; they are accumulated as [`ValidationError`] records
//! (see [`crate::validation`]). The enums here cover the two fatal classes:
//! a schema document that violates the expected meta-shape, and a schema
//! graph defect discovered mid-validation.
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license
//!
//! [`ValidationError`]: crate::validation::ValidationError

use crate::model::NodeId;
use thiserror::Error;

/// Result type for schema compilation.
pub type CompileResult<T> = Result<T, SchemaError>;

/// Compile-time failure: the raw schema document violates the meta-shape
/// expected of a schema, or uses a feature this engine does not support.
///
/// Every variant carries the JSON pointer into the raw schema document at
/// which compilation failed.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A keyword's value has the wrong shape.
    #[error("invalid schema at '{path}': {reason}")]
    InvalidSchema { path: String, reason: String },

    /// A recognized keyword requests something out of scope.
    #[error("unsupported schema feature at '{path}': {feature}")]
    UnsupportedFeature { path: String, feature: String },

    /// A `$ref` pointer does not name a compiled schema location.
    #[error("unresolved reference '{reference}' at '{path}'")]
    UnresolvedReference { reference: String, path: String },
}

impl SchemaError {
    /// Create an invalid-schema error.
    pub fn invalid<P, R>(path: P, reason: R) -> Self
    where
        P: Into<String>,
        R: Into<String>,
    {
        Self::InvalidSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported-feature error.
    pub fn unsupported<P, F>(path: P, feature: F) -> Self
    where
        P: Into<String>,
        F: Into<String>,
    {
        Self::UnsupportedFeature {
            path: path.into(),
            feature: feature.into(),
        }
    }

    /// Create an unresolved-reference error.
    pub fn unresolved<R, P>(reference: R, path: P) -> Self
    where
        R: Into<String>,
        P: Into<String>,
    {
        Self::UnresolvedReference {
            reference: reference.into(),
            path: path.into(),
        }
    }

    /// The JSON pointer into the raw schema document at which compilation
    /// failed.
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidSchema { path, .. } => path,
            Self::UnsupportedFeature { path, .. } => path,
            Self::UnresolvedReference { path, .. } => path,
        }
    }
}

/// Result type for validation-engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// A defect in the schema graph itself, discovered while validating.
///
/// These abort the validation call and are surfaced distinctly from
/// ordinary diagnostics so callers never confuse "document is invalid"
/// with "schema is broken".
#[derive(Error, Debug)]
pub enum EngineError {
    /// A node id stored in the model does not resolve to an arena slot.
    #[error("dangling subschema reference: node {id} is not part of the model")]
    DanglingNode { id: NodeId },

    /// Reference delegation revisited a node already being evaluated
    /// against the same document value.
    #[error("schema reference cycle detected: {chain}")]
    CyclicSchema { chain: String },
}

impl EngineError {
    /// Create a dangling-node error.
    pub fn dangling(id: NodeId) -> Self {
        Self::DanglingNode { id }
    }

    /// Create a cycle error from the chain of node ids on the evaluation
    /// stack, ending with the revisited node.
    pub fn cycle(chain: &[NodeId]) -> Self {
        let chain = chain
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        Self::CyclicSchema { chain }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_path_accessor() {
        let err = SchemaError::invalid("#/type", "unknown kind name 'float'");
        assert_eq!(err.path(), "#/type");
        assert!(err.to_string().contains("#/type"));

        let err = SchemaError::unresolved("#/definitions/missing", "#/$ref");
        assert_eq!(err.path(), "#/$ref");
    }

    #[test]
    fn test_cycle_chain_formatting() {
        let err = EngineError::cycle(&[NodeId(0), NodeId(2), NodeId(0)]);
        assert_eq!(
            err.to_string(),
            "schema reference cycle detected: 0 -> 2 -> 0"
        );
    }
}

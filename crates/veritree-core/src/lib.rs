//! Veritree core - schema compilation and document validation
//!
//! This crate compiles JSON-Schema-style (draft-4 subset) schema documents
//! into an immutable in-memory rule graph and validates arbitrary
//! `serde_json::Value` documents against it, producing structured, located
//! error reports rather than a single pass/fail bit.
//!
//! ## Features
//!
//! - **Schema Compiler**: recursive descent over a raw schema tree with
//!   meta-shape enforcement and pointer-accurate compile errors
//! - **Validation Engine**: types, ranges, enums, object/array shape
//!   constraints, and the `allOf`/`anyOf`/`oneOf`/`not` combinators, with
//!   every violation collected instead of stopping at the first
//! - **Title Index**: direct retrieval of a subschema by its
//!   human-readable title, for validating just one part of a document
//! - **Same-document references**: `$ref` delegation resolved at compile
//!   time against an explicit location table, with cycle detection at
//!   validation time
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use veritree_core::{compile, TitleIndex, Validator};
//!
//! let schema = json!({
//!     "type": "object",
//!     "title": "Color",
//!     "required": ["r", "g", "b"],
//!     "properties": {
//!         "r": {"type": "integer"},
//!         "g": {"type": "integer"},
//!         "b": {"type": "integer"}
//!     }
//! });
//!
//! let model = compile(&schema).unwrap();
//! let index = TitleIndex::build(&model);
//! let color = index.lookup(&model, "Color").unwrap();
//!
//! let validator = Validator::new(&model);
//! let results = validator
//!     .validate_node(color, &json!({"r": 1, "g": 2, "b": 3}))
//!     .unwrap();
//! assert!(results.passed());
//!
//! let mut results = validator
//!     .validate_node(color, &json!({"r": 1, "g": 2}))
//!     .unwrap();
//! assert_eq!(results.error_count(), 1);
//! let error = results.pop_error().unwrap();
//! assert!(error.description.contains("'b'"));
//! ```
//!
//! ## Error classes
//!
//! - [`SchemaError`]: the schema document itself is malformed; fatal to
//!   [`compile`]
//! - validation diagnostics: collected in [`ValidationResults`], never
//!   returned as `Err`
//! - [`EngineError`]: the schema graph is broken (dangling reference,
//!   reference cycle); aborts the validation call
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

pub mod adapter;
pub mod compiler;
pub mod error;
pub mod model;
pub mod registry;
pub mod validation;

// Re-export commonly used types for convenience
pub use adapter::NodeKind;
pub use compiler::compile;
pub use error::{CompileResult, EngineError, EngineResult, SchemaError};
pub use model::{NodeId, SchemaModel, SubschemaNode};
pub use registry::TitleIndex;
pub use validation::{
    PathSegment, ValidationContext, ValidationError, ValidationResults, Validator,
};

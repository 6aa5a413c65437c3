//! Validation engine and result collection
//!
//! Given a compiled subschema node and a document value, the engine
//! recursively checks every constraint, accumulating located diagnostics
//! instead of stopping at the first failure. Constraint violations never
//! fail the call; only schema-graph defects do (see
//! [`crate::error::EngineError`]).
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

mod context;
mod engine;
mod results;

pub use context::{PathSegment, ValidationContext};
pub use engine::Validator;
pub use results::{ValidationError, ValidationResults};

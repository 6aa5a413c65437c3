//! In-memory schema model
//!
//! A compiled schema is a directed graph of subschema nodes held in an
//! arena and addressed by stable integer ids. All intra-model links
//! (composition operands, property subschemas, reference targets) are ids
//! resolved against the arena, never ownership pointers between nodes, so
//! cyclic schema graphs are representable and the whole model is shareable
//! read-only.
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

mod arena;
mod node;

pub use arena::SchemaModel;
pub use node::{
    AdditionalProperties, ArrayConstraints, Combinator, Items, KindSet, NodeId,
    NumberConstraints, ObjectConstraints, PatternConstraint, StringConstraints, SubschemaNode,
};

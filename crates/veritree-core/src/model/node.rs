//! Compiled subschema nodes and their typed constraint bags
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

use crate::adapter::NodeKind;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Stable identity of a subschema node within its owning [`SchemaModel`].
///
/// Ids are assigned in depth-first document order during compilation and
/// never change for the lifetime of the model.
///
/// [`SchemaModel`]: crate::model::SchemaModel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of primitive kinds permitted by a `type` constraint.
#[derive(Debug, Clone, Default)]
pub struct KindSet(Vec<NodeKind>);

impl KindSet {
    pub fn new(kinds: Vec<NodeKind>) -> Self {
        Self(kinds)
    }

    /// Whether a document value of the given kind is admitted, honoring
    /// draft-4 number/integer admission.
    pub fn admits(&self, actual: NodeKind) -> bool {
        self.0.iter().any(|kind| kind.admits(actual))
    }

    pub fn kinds(&self) -> &[NodeKind] {
        &self.0
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        let names: Vec<&str> = self.0.iter().map(|kind| kind.name()).collect();
        names.join(" or ")
    }
}

/// Numeric range and divisibility rules. Inert unless the document value
/// is a number.
#[derive(Debug, Clone, Default)]
pub struct NumberConstraints {
    pub minimum: Option<f64>,
    pub exclusive_minimum: bool,
    pub maximum: Option<f64>,
    pub exclusive_maximum: bool,
    pub multiple_of: Option<f64>,
}

impl NumberConstraints {
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none() && self.maximum.is_none() && self.multiple_of.is_none()
    }
}

/// A `pattern` constraint: the verbatim source plus the regex compiled
/// from it at schema-compile time. Matching uses search semantics, not
/// anchored matching.
#[derive(Debug, Clone)]
pub struct PatternConstraint {
    pub source: String,
    pub regex: Regex,
}

/// String shape rules. Lengths count Unicode scalar values.
#[derive(Debug, Clone, Default)]
pub struct StringConstraints {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<PatternConstraint>,
}

/// Item schema attached to an array constraint.
#[derive(Debug, Clone)]
pub enum Items {
    /// One schema applied to every element.
    Uniform(NodeId),
    /// One schema per position; elements beyond the list are unconstrained.
    Positional(Vec<NodeId>),
}

/// Array shape rules.
#[derive(Debug, Clone, Default)]
pub struct ArrayConstraints {
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
    pub items: Option<Items>,
}

/// Policy for object properties not named in the property map.
#[derive(Debug, Clone, Default)]
pub enum AdditionalProperties {
    /// Extras pass unexamined.
    #[default]
    Allowed,
    /// Every extra is a violation.
    Forbidden,
    /// Extras are validated against this subschema.
    Schema(NodeId),
}

/// Object shape rules.
#[derive(Debug, Clone, Default)]
pub struct ObjectConstraints {
    pub required: Vec<String>,
    pub properties: BTreeMap<String, NodeId>,
    pub additional: AdditionalProperties,
}

/// A composition keyword with its operand subschemas.
#[derive(Debug, Clone)]
pub enum Combinator {
    /// Every operand must pass.
    AllOf(Vec<NodeId>),
    /// At least one operand must pass.
    AnyOf(Vec<NodeId>),
    /// Exactly one operand must pass.
    OneOf(Vec<NodeId>),
    /// The operand must fail.
    Not(NodeId),
}

impl Combinator {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::AllOf(_) => "allOf",
            Self::AnyOf(_) => "anyOf",
            Self::OneOf(_) => "oneOf",
            Self::Not(_) => "not",
        }
    }
}

/// One compiled unit of schema.
///
/// A node carries only the constraints its source schema object declared;
/// everything else stays at its inert default. Constraints whose kind never
/// matches the document value at runtime simply do not fire.
#[derive(Debug, Clone)]
pub struct SubschemaNode {
    pub id: NodeId,
    /// Human-readable title, recorded verbatim. Uniqueness is not enforced.
    pub title: Option<String>,
    pub kinds: Option<KindSet>,
    /// Permitted literals, compared by structural equality.
    pub enum_values: Option<Vec<Value>>,
    pub number: NumberConstraints,
    pub string: StringConstraints,
    pub array: ArrayConstraints,
    pub object: ObjectConstraints,
    /// Composition constraints in keyword order.
    pub combinators: Vec<Combinator>,
    /// Full-delegation target; the node's own constraints still apply.
    pub reference: Option<NodeId>,
}

impl SubschemaNode {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            title: None,
            kinds: None,
            enum_values: None,
            number: NumberConstraints::default(),
            string: StringConstraints::default(),
            array: ArrayConstraints::default(),
            object: ObjectConstraints::default(),
            combinators: Vec::new(),
            reference: None,
        }
    }
}

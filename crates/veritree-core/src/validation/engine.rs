//! The validation walk
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

use super::context::ValidationContext;
use super::results::{ValidationError, ValidationResults};
use crate::adapter::NodeKind;
use crate::error::{EngineError, EngineResult};
use crate::model::{
    AdditionalProperties, Combinator, Items, NodeId, SchemaModel, SubschemaNode,
};
use serde_json::{Map, Number, Value};

/// Tolerance for the `multipleOf` quotient check.
const MULTIPLE_OF_EPSILON: f64 = 1e-9;

/// Validation engine over one compiled model.
///
/// The validator borrows the model read-only; any number of validators
/// (and calls) may run concurrently against the same model, since every
/// call owns its own [`ValidationResults`].
pub struct Validator<'model> {
    model: &'model SchemaModel,
}

impl<'model> Validator<'model> {
    pub fn new(model: &'model SchemaModel) -> Self {
        Self { model }
    }

    /// Validate a document against the whole-schema root.
    pub fn validate(&self, document: &Value) -> EngineResult<ValidationResults> {
        self.validate_node(self.model.root(), document)
    }

    /// Validate a document against one subschema node, typically obtained
    /// from a title lookup. The node must belong to this validator's
    /// model.
    ///
    /// Constraint violations are collected, never returned as `Err`; the
    /// call itself fails only on schema-graph defects.
    pub fn validate_node(
        &self,
        node: &SubschemaNode,
        document: &Value,
    ) -> EngineResult<ValidationResults> {
        let mut errors = Vec::new();
        let mut stack = Vec::new();
        self.check_node(node, document, &ValidationContext::root(), &mut stack, &mut errors)?;
        log::debug!(
            "validated document against node {}: {} error(s)",
            node.id,
            errors.len()
        );
        Ok(ValidationResults::from(errors))
    }

    /// Walk one node against one value.
    ///
    /// `stack` holds the node ids currently being evaluated against this
    /// same value; revisiting one means reference delegation or
    /// composition looped without consuming any document depth, which
    /// would recurse forever. Document descent (array elements, object
    /// properties) starts a fresh stack.
    fn check_node(
        &self,
        node: &SubschemaNode,
        value: &Value,
        ctx: &ValidationContext,
        stack: &mut Vec<NodeId>,
        out: &mut Vec<ValidationError>,
    ) -> EngineResult<()> {
        if stack.contains(&node.id) {
            let mut chain = stack.clone();
            chain.push(node.id);
            return Err(EngineError::cycle(&chain));
        }
        stack.push(node.id);
        let outcome = self.check_constraints(node, value, ctx, stack, out);
        stack.pop();
        outcome
    }

    fn check_constraints(
        &self,
        node: &SubschemaNode,
        value: &Value,
        ctx: &ValidationContext,
        stack: &mut Vec<NodeId>,
        out: &mut Vec<ValidationError>,
    ) -> EngineResult<()> {
        let kind = NodeKind::of(value);

        // Type gate: against the wrong kind every other constraint is
        // meaningless, so record one error and stop descending into this
        // node.
        if let Some(kinds) = &node.kinds {
            if !kinds.admits(kind) {
                out.push(violation(
                    ctx,
                    format!("expected {}, found {}", kinds.describe(), kind),
                ));
                return Ok(());
            }
        }

        if let Some(values) = &node.enum_values {
            if !values.iter().any(|candidate| candidate == value) {
                out.push(violation(
                    ctx,
                    format!(
                        "value is not one of the {} permitted enum literal(s)",
                        values.len()
                    ),
                ));
            }
        }

        // Kind-specific bags dispatch on the runtime kind; bags for other
        // kinds stay inert. Violations within a bag are independent and
        // all recorded.
        match value {
            Value::Number(number) => self.check_number(node, number, ctx, out),
            Value::String(text) => self.check_string(node, text, ctx, out),
            Value::Array(elements) => self.check_array(node, elements, ctx, out)?,
            Value::Object(entries) => self.check_object(node, entries, ctx, out)?,
            _ => {}
        }

        for combinator in &node.combinators {
            self.check_combinator(combinator, value, ctx, stack, out)?;
        }

        // Reference delegation comes last: the node's own constraints
        // apply in addition to the target's.
        if let Some(target) = node.reference {
            let target = self.resolve(target)?;
            self.check_node(target, value, ctx, stack, out)?;
        }

        Ok(())
    }

    fn check_number(
        &self,
        node: &SubschemaNode,
        number: &Number,
        ctx: &ValidationContext,
        out: &mut Vec<ValidationError>,
    ) {
        let constraints = &node.number;
        if constraints.is_empty() {
            return;
        }
        let Some(value) = number.as_f64() else {
            return;
        };

        if let Some(minimum) = constraints.minimum {
            let ok = if constraints.exclusive_minimum {
                value > minimum
            } else {
                value >= minimum
            };
            if !ok {
                out.push(violation(
                    ctx,
                    format!(
                        "value {} is below the {}minimum {}",
                        value,
                        if constraints.exclusive_minimum { "exclusive " } else { "" },
                        minimum
                    ),
                ));
            }
        }

        if let Some(maximum) = constraints.maximum {
            let ok = if constraints.exclusive_maximum {
                value < maximum
            } else {
                value <= maximum
            };
            if !ok {
                out.push(violation(
                    ctx,
                    format!(
                        "value {} exceeds the {}maximum {}",
                        value,
                        if constraints.exclusive_maximum { "exclusive " } else { "" },
                        maximum
                    ),
                ));
            }
        }

        if let Some(step) = constraints.multiple_of {
            let quotient = value / step;
            if (quotient - quotient.round()).abs() > MULTIPLE_OF_EPSILON {
                out.push(violation(
                    ctx,
                    format!("value {} is not a multiple of {}", value, step),
                ));
            }
        }
    }

    fn check_string(
        &self,
        node: &SubschemaNode,
        text: &str,
        ctx: &ValidationContext,
        out: &mut Vec<ValidationError>,
    ) {
        let constraints = &node.string;
        let length = text.chars().count() as u64;

        if let Some(min_length) = constraints.min_length {
            if length < min_length {
                out.push(violation(
                    ctx,
                    format!(
                        "string length {} is shorter than minLength {}",
                        length, min_length
                    ),
                ));
            }
        }

        if let Some(max_length) = constraints.max_length {
            if length > max_length {
                out.push(violation(
                    ctx,
                    format!(
                        "string length {} is longer than maxLength {}",
                        length, max_length
                    ),
                ));
            }
        }

        if let Some(pattern) = &constraints.pattern {
            if !pattern.regex.is_match(text) {
                out.push(violation(
                    ctx,
                    format!("string does not match pattern '{}'", pattern.source),
                ));
            }
        }
    }

    fn check_array(
        &self,
        node: &SubschemaNode,
        elements: &[Value],
        ctx: &ValidationContext,
        out: &mut Vec<ValidationError>,
    ) -> EngineResult<()> {
        let constraints = &node.array;
        let length = elements.len() as u64;

        if let Some(min_items) = constraints.min_items {
            if length < min_items {
                out.push(violation(
                    ctx,
                    format!("array has {} item(s), fewer than minItems {}", length, min_items),
                ));
            }
        }

        if let Some(max_items) = constraints.max_items {
            if length > max_items {
                out.push(violation(
                    ctx,
                    format!("array has {} item(s), more than maxItems {}", length, max_items),
                ));
            }
        }

        if constraints.unique_items {
            for later in 1..elements.len() {
                if let Some(earlier) = (0..later).find(|&i| elements[i] == elements[later]) {
                    out.push(violation(
                        &ctx.child_index(later),
                        format!("item is a duplicate of item {}", earlier),
                    ));
                }
            }
        }

        match &constraints.items {
            None => {}
            Some(Items::Uniform(id)) => {
                let item_schema = self.resolve(*id)?;
                for (index, element) in elements.iter().enumerate() {
                    self.check_node(
                        item_schema,
                        element,
                        &ctx.child_index(index),
                        &mut Vec::new(),
                        out,
                    )?;
                }
            }
            Some(Items::Positional(ids)) => {
                // Elements beyond the positional list are unconstrained.
                for (index, (id, element)) in ids.iter().zip(elements).enumerate() {
                    let item_schema = self.resolve(*id)?;
                    self.check_node(
                        item_schema,
                        element,
                        &ctx.child_index(index),
                        &mut Vec::new(),
                        out,
                    )?;
                }
            }
        }

        Ok(())
    }

    fn check_object(
        &self,
        node: &SubschemaNode,
        entries: &Map<String, Value>,
        ctx: &ValidationContext,
        out: &mut Vec<ValidationError>,
    ) -> EngineResult<()> {
        let constraints = &node.object;

        for name in &constraints.required {
            if !entries.contains_key(name) {
                out.push(violation(
                    ctx,
                    format!("missing required property '{}'", name),
                ));
            }
        }

        for (name, value) in entries {
            if let Some(&child) = constraints.properties.get(name) {
                let child = self.resolve(child)?;
                self.check_node(child, value, &ctx.child(name), &mut Vec::new(), out)?;
            } else {
                match &constraints.additional {
                    AdditionalProperties::Allowed => {}
                    AdditionalProperties::Forbidden => {
                        out.push(violation(
                            &ctx.child(name),
                            format!("unexpected property '{}'", name),
                        ));
                    }
                    AdditionalProperties::Schema(extra) => {
                        let extra = self.resolve(*extra)?;
                        self.check_node(extra, value, &ctx.child(name), &mut Vec::new(), out)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Evaluate one combinator against the same value. Operand errors are
    /// tagged with a synthetic label so failures are traceable to the
    /// branch that produced them.
    fn check_combinator(
        &self,
        combinator: &Combinator,
        value: &Value,
        ctx: &ValidationContext,
        stack: &mut Vec<NodeId>,
        out: &mut Vec<ValidationError>,
    ) -> EngineResult<()> {
        match combinator {
            Combinator::AllOf(operands) => {
                for (index, &id) in operands.iter().enumerate() {
                    let operand = self.resolve(id)?;
                    let branch_ctx = ctx.child_label(format!("allOf[{}]", index));
                    // Failing operands surface all their errors; passing
                    // ones contribute nothing.
                    self.check_node(operand, value, &branch_ctx, stack, out)?;
                }
            }
            Combinator::AnyOf(operands) => {
                let mut first_branch = None;
                for (index, &id) in operands.iter().enumerate() {
                    let operand = self.resolve(id)?;
                    let branch_ctx = ctx.child_label(format!("anyOf[{}]", index));
                    let mut branch = Vec::new();
                    self.check_node(operand, value, &branch_ctx, stack, &mut branch)?;
                    if branch.is_empty() {
                        return Ok(());
                    }
                    if first_branch.is_none() {
                        first_branch = Some(branch);
                    }
                }
                // No branch passed: surface the first operand's errors
                // only, to keep the report readable.
                if let Some(branch) = first_branch {
                    out.extend(branch);
                }
            }
            Combinator::OneOf(operands) => {
                let mut matched = 0usize;
                for (index, &id) in operands.iter().enumerate() {
                    let operand = self.resolve(id)?;
                    let branch_ctx = ctx.child_label(format!("oneOf[{}]", index));
                    let mut branch = Vec::new();
                    self.check_node(operand, value, &branch_ctx, stack, &mut branch)?;
                    if branch.is_empty() {
                        matched += 1;
                    }
                }
                match matched {
                    1 => {}
                    0 => out.push(violation(
                        &ctx.child_label("oneOf"),
                        "no oneOf branch matched",
                    )),
                    count => out.push(violation(
                        &ctx.child_label("oneOf"),
                        format!("ambiguous: {} branches matched", count),
                    )),
                }
            }
            Combinator::Not(id) => {
                let operand = self.resolve(*id)?;
                let mut branch = Vec::new();
                self.check_node(operand, value, &ctx.child_label("not"), stack, &mut branch)?;
                if branch.is_empty() {
                    out.push(violation(
                        &ctx.child_label("not"),
                        "value must not match the disallowed subschema",
                    ));
                }
            }
        }
        Ok(())
    }

    fn resolve(&self, id: NodeId) -> EngineResult<&'model SubschemaNode> {
        self.model.get(id).ok_or_else(|| EngineError::dangling(id))
    }
}

fn violation<D: Into<String>>(ctx: &ValidationContext, description: D) -> ValidationError {
    ValidationError::new(ctx.segments().to_vec(), description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use serde_json::json;

    fn run(schema: Value, document: Value) -> ValidationResults {
        let model = compile(&schema).expect("schema must compile");
        Validator::new(&model)
            .validate(&document)
            .expect("engine must not fail")
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        assert!(run(json!({}), json!({"anything": [1, 2, 3]})).passed());
    }

    #[test]
    fn test_type_gate_records_one_error_and_stops() {
        let results = run(
            json!({"type": "object", "required": ["a"]}),
            json!("not an object"),
        );
        assert_eq!(results.error_count(), 1);
        let error = results.iter().next().unwrap();
        assert!(error.description.contains("expected object"));
        assert!(error.description.contains("found string"));
    }

    #[test]
    fn test_reference_cycle_aborts_the_call() {
        let model = compile(&json!({"$ref": "#"})).unwrap();
        let outcome = Validator::new(&model).validate(&json!(1));
        assert!(matches!(outcome, Err(EngineError::CyclicSchema { .. })));
    }

    #[test]
    fn test_recursion_through_document_descent_terminates() {
        let model = compile(&json!({
            "type": "object",
            "properties": {"next": {"$ref": "#"}}
        }))
        .unwrap();
        let results = Validator::new(&model)
            .validate(&json!({"next": {"next": {}}}))
            .unwrap();
        assert!(results.passed());
    }
}

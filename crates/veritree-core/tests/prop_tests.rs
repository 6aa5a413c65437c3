//! Property-based tests for schema compilation and validation
//!
//! These tests verify that the compiler is a pure function of the raw
//! document and that the pass flag and the collector always agree, across
//! a wide range of generated inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use veritree_core::{compile, ValidationError, Validator};

/// Strategy for generating random JSON values with controlled complexity.
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,50}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                proptest::collection::hash_map("[a-zA-Z_][a-zA-Z0-9_]{0,20}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// A schema exercising most constraint families at once.
fn sample_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "age": {"type": "integer", "minimum": 0},
            "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true},
            "mode": {"enum": ["on", "off"]}
        },
        "additionalProperties": false
    })
}

fn drain(results: veritree_core::ValidationResults) -> Vec<ValidationError> {
    let mut results = results;
    let mut drained = Vec::new();
    while let Some(error) = results.pop_error() {
        drained.push(error);
    }
    drained
}

proptest! {
    /// Model construction is a pure function of the raw document: two
    /// compiles of the same schema accept and reject identically, with
    /// identical diagnostics.
    #[test]
    fn prop_compile_twice_is_equivalent(document in json_value_strategy()) {
        let schema = sample_schema();
        let first = compile(&schema).unwrap();
        let second = compile(&schema).unwrap();

        let first_results = Validator::new(&first).validate(&document).unwrap();
        let second_results = Validator::new(&second).validate(&document).unwrap();

        prop_assert_eq!(first_results.passed(), second_results.passed());
        prop_assert_eq!(first_results.error_count(), second_results.error_count());
        prop_assert_eq!(drain(first_results), drain(second_results));
    }

    /// pass == true exactly when the collector is empty.
    #[test]
    fn prop_pass_iff_no_errors(document in json_value_strategy()) {
        let model = compile(&sample_schema()).unwrap();
        let results = Validator::new(&model).validate(&document).unwrap();

        prop_assert_eq!(results.passed(), !results.has_errors());
        prop_assert_eq!(results.passed(), results.error_count() == 0);
    }

    /// The empty schema constrains nothing.
    #[test]
    fn prop_empty_schema_accepts_everything(document in json_value_strategy()) {
        let model = compile(&json!({})).unwrap();
        let results = Validator::new(&model).validate(&document).unwrap();
        prop_assert!(results.passed());
    }

    /// allOf over one operand is equivalent to that operand alone.
    #[test]
    fn prop_single_all_of_is_transparent(document in json_value_strategy()) {
        let direct = compile(&json!({"type": "object"})).unwrap();
        let wrapped = compile(&json!({"allOf": [{"type": "object"}]})).unwrap();

        let direct_results = Validator::new(&direct).validate(&document).unwrap();
        let wrapped_results = Validator::new(&wrapped).validate(&document).unwrap();

        prop_assert_eq!(direct_results.passed(), wrapped_results.passed());
        prop_assert_eq!(direct_results.error_count(), wrapped_results.error_count());
    }
}

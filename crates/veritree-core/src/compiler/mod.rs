//! Schema compiler
//!
//! Recursive descent over a raw schema tree (`serde_json::Value`): each
//! JSON-object-shaped schema node becomes one [`SubschemaNode`], nested
//! schema-valued keywords are compiled recursively and linked by id, and
//! the schema document's own meta-shape is validated as the descent goes.
//! `$ref` occurrences are queued during the walk and resolved afterwards
//! against an explicit JSON-pointer location table; there is no ambient
//! registry. Only same-document references are supported.
//!
//! Unrecognized keywords are ignored, and constraints that can never fire
//! for the declared type compile anyway and stay inert, matching
//! permissive schema-composition semantics.
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

pub mod pointer;

use crate::adapter::NodeKind;
use crate::error::{CompileResult, SchemaError};
use crate::model::{
    AdditionalProperties, Combinator, Items, KindSet, NodeId, PatternConstraint, SchemaModel,
    SubschemaNode,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Compile a raw schema document into an immutable [`SchemaModel`].
///
/// Fails with a [`SchemaError`] carrying the JSON pointer of the offending
/// keyword when the document violates the expected meta-shape, uses an
/// external reference, or contains a `$ref` that resolves to nothing.
pub fn compile(raw: &Value) -> CompileResult<SchemaModel> {
    let mut compiler = Compiler::default();
    let root = compiler.compile_schema(raw, pointer::ROOT)?;
    compiler.resolve_references()?;
    log::debug!("compiled schema graph with {} node(s)", compiler.nodes.len());
    Ok(SchemaModel::from_parts(compiler.nodes, root))
}

/// A `$ref` recorded during the descent, resolved once every location is
/// known.
struct PendingReference {
    node: NodeId,
    reference: String,
    path: String,
}

#[derive(Default)]
struct Compiler {
    nodes: Vec<SubschemaNode>,
    /// Canonical pointer of each compiled schema object -> its node id.
    locations: HashMap<String, NodeId>,
    pending: Vec<PendingReference>,
}

impl Compiler {
    fn allocate(&mut self, path: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SubschemaNode::new(id));
        self.locations.insert(path.to_string(), id);
        id
    }

    fn compile_schema(&mut self, raw: &Value, path: &str) -> CompileResult<NodeId> {
        let object = raw.as_object().ok_or_else(|| {
            SchemaError::invalid(
                path,
                format!("schema must be an object, found {}", NodeKind::of(raw)),
            )
        })?;
        let id = self.allocate(path);

        // Keywords are read in a fixed order so node ids are a pure
        // function of the raw document.
        self.compile_title(object, id, path)?;
        self.compile_type(object, id, path)?;
        self.compile_enum(object, id, path)?;
        self.compile_number(object, id, path)?;
        self.compile_string(object, id, path)?;
        self.compile_array(object, id, path)?;
        self.compile_object(object, id, path)?;
        self.compile_combinators(object, id, path)?;
        self.compile_definitions(object, path)?;
        self.compile_reference(object, id, path)?;

        Ok(id)
    }

    fn compile_title(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        if let Some(value) = object.get("title") {
            let title = value.as_str().ok_or_else(|| {
                SchemaError::invalid(pointer::join(path, "title"), "title must be a string")
            })?;
            self.nodes[id.index()].title = Some(title.to_string());
        }
        Ok(())
    }

    fn compile_type(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        let keyword_path = || pointer::join(path, "type");
        let kinds = match object.get("type") {
            None => return Ok(()),
            Some(Value::String(name)) => vec![parse_kind_name(name, &keyword_path())?],
            Some(Value::Array(entries)) => {
                if entries.is_empty() {
                    return Err(SchemaError::invalid(
                        keyword_path(),
                        "type array must not be empty",
                    ));
                }
                let mut kinds = Vec::with_capacity(entries.len());
                for entry in entries {
                    let name = entry.as_str().ok_or_else(|| {
                        SchemaError::invalid(
                            keyword_path(),
                            "type array entries must be kind name strings",
                        )
                    })?;
                    kinds.push(parse_kind_name(name, &keyword_path())?);
                }
                kinds
            }
            Some(_) => {
                return Err(SchemaError::invalid(
                    keyword_path(),
                    "type must be a kind name or an array of kind names",
                ))
            }
        };
        self.nodes[id.index()].kinds = Some(KindSet::new(kinds));
        Ok(())
    }

    fn compile_enum(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        if let Some(value) = object.get("enum") {
            let values = value.as_array().ok_or_else(|| {
                SchemaError::invalid(pointer::join(path, "enum"), "enum must be an array")
            })?;
            if values.is_empty() {
                return Err(SchemaError::invalid(
                    pointer::join(path, "enum"),
                    "enum must not be empty",
                ));
            }
            self.nodes[id.index()].enum_values = Some(values.clone());
        }
        Ok(())
    }

    fn compile_number(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        let minimum = optional_number(object, "minimum", path)?;
        let maximum = optional_number(object, "maximum", path)?;
        let exclusive_minimum = optional_bool(object, "exclusiveMinimum", path)?.unwrap_or(false);
        let exclusive_maximum = optional_bool(object, "exclusiveMaximum", path)?.unwrap_or(false);
        let multiple_of = optional_number(object, "multipleOf", path)?;
        if let Some(step) = multiple_of {
            if step <= 0.0 {
                return Err(SchemaError::invalid(
                    pointer::join(path, "multipleOf"),
                    "multipleOf must be strictly positive",
                ));
            }
        }

        let number = &mut self.nodes[id.index()].number;
        number.minimum = minimum;
        number.maximum = maximum;
        number.exclusive_minimum = exclusive_minimum;
        number.exclusive_maximum = exclusive_maximum;
        number.multiple_of = multiple_of;
        Ok(())
    }

    fn compile_string(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        let min_length = optional_unsigned(object, "minLength", path)?;
        let max_length = optional_unsigned(object, "maxLength", path)?;
        let pattern = match object.get("pattern") {
            None => None,
            Some(value) => {
                let source = value.as_str().ok_or_else(|| {
                    SchemaError::invalid(pointer::join(path, "pattern"), "pattern must be a string")
                })?;
                let regex = Regex::new(source).map_err(|err| {
                    SchemaError::invalid(
                        pointer::join(path, "pattern"),
                        format!("invalid pattern: {}", err),
                    )
                })?;
                Some(PatternConstraint {
                    source: source.to_string(),
                    regex,
                })
            }
        };

        let string = &mut self.nodes[id.index()].string;
        string.min_length = min_length;
        string.max_length = max_length;
        string.pattern = pattern;
        Ok(())
    }

    fn compile_array(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        let min_items = optional_unsigned(object, "minItems", path)?;
        let max_items = optional_unsigned(object, "maxItems", path)?;
        let unique_items = optional_bool(object, "uniqueItems", path)?.unwrap_or(false);

        let items = match object.get("items") {
            None => None,
            Some(value @ Value::Object(_)) => {
                let child = self.compile_schema(value, &pointer::join(path, "items"))?;
                Some(Items::Uniform(child))
            }
            Some(Value::Array(entries)) => {
                let base = pointer::join(path, "items");
                let mut children = Vec::with_capacity(entries.len());
                for (index, entry) in entries.iter().enumerate() {
                    children.push(self.compile_schema(entry, &pointer::join_index(&base, index))?);
                }
                Some(Items::Positional(children))
            }
            Some(_) => {
                return Err(SchemaError::invalid(
                    pointer::join(path, "items"),
                    "items must be a schema or an array of schemas",
                ))
            }
        };

        let array = &mut self.nodes[id.index()].array;
        array.min_items = min_items;
        array.max_items = max_items;
        array.unique_items = unique_items;
        array.items = items;
        Ok(())
    }

    fn compile_object(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        let mut required = Vec::new();
        if let Some(value) = object.get("required") {
            let names = value.as_array().ok_or_else(|| {
                SchemaError::invalid(
                    pointer::join(path, "required"),
                    "required must be an array of property names",
                )
            })?;
            for name in names {
                let name = name.as_str().ok_or_else(|| {
                    SchemaError::invalid(
                        pointer::join(path, "required"),
                        "required entries must be strings",
                    )
                })?;
                required.push(name.to_string());
            }
        }

        let mut properties = std::collections::BTreeMap::new();
        if let Some(value) = object.get("properties") {
            let map = value.as_object().ok_or_else(|| {
                SchemaError::invalid(
                    pointer::join(path, "properties"),
                    "properties must be an object",
                )
            })?;
            let base = pointer::join(path, "properties");
            for (name, subschema) in map {
                let child = self.compile_schema(subschema, &pointer::join(&base, name))?;
                properties.insert(name.clone(), child);
            }
        }

        let additional = match object.get("additionalProperties") {
            None => AdditionalProperties::Allowed,
            Some(Value::Bool(true)) => AdditionalProperties::Allowed,
            Some(Value::Bool(false)) => AdditionalProperties::Forbidden,
            Some(value @ Value::Object(_)) => {
                let child =
                    self.compile_schema(value, &pointer::join(path, "additionalProperties"))?;
                AdditionalProperties::Schema(child)
            }
            Some(_) => {
                return Err(SchemaError::invalid(
                    pointer::join(path, "additionalProperties"),
                    "additionalProperties must be a boolean or a schema",
                ))
            }
        };

        let constraints = &mut self.nodes[id.index()].object;
        constraints.required = required;
        constraints.properties = properties;
        constraints.additional = additional;
        Ok(())
    }

    fn compile_combinators(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        for keyword in ["allOf", "anyOf", "oneOf"] {
            let Some(value) = object.get(keyword) else {
                continue;
            };
            let operands = value.as_array().ok_or_else(|| {
                SchemaError::invalid(
                    pointer::join(path, keyword),
                    format!("{} must be an array of schemas", keyword),
                )
            })?;
            if operands.is_empty() {
                return Err(SchemaError::invalid(
                    pointer::join(path, keyword),
                    format!("{} must not be empty", keyword),
                ));
            }
            let base = pointer::join(path, keyword);
            let mut children = Vec::with_capacity(operands.len());
            for (index, operand) in operands.iter().enumerate() {
                children.push(self.compile_schema(operand, &pointer::join_index(&base, index))?);
            }
            let combinator = match keyword {
                "allOf" => Combinator::AllOf(children),
                "anyOf" => Combinator::AnyOf(children),
                _ => Combinator::OneOf(children),
            };
            self.nodes[id.index()].combinators.push(combinator);
        }

        if let Some(value) = object.get("not") {
            if !value.is_object() {
                return Err(SchemaError::invalid(
                    pointer::join(path, "not"),
                    "not must be a schema",
                ));
            }
            let operand = self.compile_schema(value, &pointer::join(path, "not"))?;
            self.nodes[id.index()]
                .combinators
                .push(Combinator::Not(operand));
        }
        Ok(())
    }

    /// `definitions` entries become ordinary arena nodes, reachable via
    /// `$ref` and visible to the title index, but not linked from the
    /// defining node.
    fn compile_definitions(&mut self, object: &Map<String, Value>, path: &str) -> CompileResult<()> {
        if let Some(value) = object.get("definitions") {
            let map = value.as_object().ok_or_else(|| {
                SchemaError::invalid(
                    pointer::join(path, "definitions"),
                    "definitions must be an object",
                )
            })?;
            let base = pointer::join(path, "definitions");
            for (name, subschema) in map {
                self.compile_schema(subschema, &pointer::join(&base, name))?;
            }
        }
        Ok(())
    }

    fn compile_reference(
        &mut self,
        object: &Map<String, Value>,
        id: NodeId,
        path: &str,
    ) -> CompileResult<()> {
        if let Some(value) = object.get("$ref") {
            let keyword_path = pointer::join(path, "$ref");
            let reference = value
                .as_str()
                .ok_or_else(|| SchemaError::invalid(&keyword_path, "$ref must be a string"))?;
            if !reference.starts_with('#') {
                return Err(SchemaError::unsupported(
                    keyword_path,
                    format!("external reference '{}'", reference),
                ));
            }
            self.pending.push(PendingReference {
                node: id,
                reference: reference.to_string(),
                path: keyword_path,
            });
        }
        Ok(())
    }

    fn resolve_references(&mut self) -> CompileResult<()> {
        let pending = std::mem::take(&mut self.pending);
        for entry in pending {
            let Some(&target) = self.locations.get(entry.reference.as_str()) else {
                return Err(SchemaError::unresolved(entry.reference, entry.path));
            };
            self.nodes[entry.node.index()].reference = Some(target);
        }
        Ok(())
    }
}

fn parse_kind_name(name: &str, keyword_path: &str) -> CompileResult<NodeKind> {
    NodeKind::from_name(name).ok_or_else(|| {
        SchemaError::invalid(keyword_path, format!("unknown kind name '{}'", name))
    })
}

fn optional_number(
    object: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> CompileResult<Option<f64>> {
    match object.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            SchemaError::invalid(
                pointer::join(path, keyword),
                format!("{} must be a number", keyword),
            )
        }),
    }
}

fn optional_unsigned(
    object: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> CompileResult<Option<u64>> {
    match object.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            SchemaError::invalid(
                pointer::join(path, keyword),
                format!("{} must be a non-negative integer", keyword),
            )
        }),
    }
}

fn optional_bool(
    object: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> CompileResult<Option<bool>> {
    match object.get(keyword) {
        None => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(_) => Err(SchemaError::invalid(
            pointer::join(path, keyword),
            format!("{} must be a boolean", keyword),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compiles_empty_schema() {
        let model = compile(&json!({})).unwrap();
        assert_eq!(model.node_count(), 1);
        assert_eq!(model.root_id(), model.root().id);
    }

    #[test]
    fn test_ids_follow_document_order() {
        let model = compile(&json!({
            "properties": {
                "a": {"type": "string"},
                "b": {"items": {"type": "integer"}}
            }
        }))
        .unwrap();
        // root, a, b, b/items
        assert_eq!(model.node_count(), 4);
        assert_eq!(model.root_id().index(), 0);
    }

    #[test]
    fn test_reference_resolves_to_definition() {
        let model = compile(&json!({
            "definitions": {"positive": {"minimum": 0}},
            "$ref": "#/definitions/positive"
        }))
        .unwrap();
        let target = model.root().reference.expect("root must delegate");
        assert!(model.get(target).unwrap().number.minimum.is_some());
    }

    #[test]
    fn test_self_reference_resolves_to_root() {
        let model = compile(&json!({"$ref": "#"})).unwrap();
        assert_eq!(model.root().reference, Some(model.root_id()));
    }
}

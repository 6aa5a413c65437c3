//! Title-indexed subschema registry
//!
//! Built in one pass over the finished model, read-only afterwards. A
//! lookup returns a borrow into the owning model's arena, valid only
//! while that model is alive; it is a borrow, not a copy.
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

use crate::model::{NodeId, SchemaModel, SubschemaNode};
use std::collections::HashMap;

/// Mapping from subschema title to node id.
///
/// Titles are unique by convention, not enforcement: when a title
/// repeats, the first-inserted mapping (ascending node-id order, which
/// equals depth-first document order) wins and later duplicates are
/// silently ignored. Matching is case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    by_title: HashMap<String, NodeId>,
}

impl TitleIndex {
    /// Build the index with one full traversal of the node arena in
    /// ascending id order, skipping nodes without a non-empty title.
    pub fn build(model: &SchemaModel) -> Self {
        let mut by_title = HashMap::new();
        for node in model.nodes() {
            match node.title.as_deref() {
                Some(title) if !title.is_empty() => {
                    by_title.entry(title.to_string()).or_insert(node.id);
                }
                _ => {}
            }
        }
        Self { by_title }
    }

    /// Look up the subschema registered under `title`.
    ///
    /// Absence is an ordinary `None`, never an error; callers decide
    /// whether a missing subschema is fatal.
    pub fn lookup<'model>(
        &self,
        model: &'model SchemaModel,
        title: &str,
    ) -> Option<&'model SubschemaNode> {
        self.by_title.get(title).and_then(|&id| model.get(id))
    }

    /// Look up just the node id registered under `title`.
    pub fn lookup_id(&self, title: &str) -> Option<NodeId> {
        self.by_title.get(title).copied()
    }

    /// Number of distinct titles in the index.
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    /// Iterate the indexed titles (in no particular order).
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.by_title.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use serde_json::json;

    #[test]
    fn test_lookup_returns_titled_node() {
        let model = compile(&json!({
            "title": "Root",
            "properties": {"inner": {"title": "Inner", "type": "string"}}
        }))
        .unwrap();
        let index = TitleIndex::build(&model);
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup(&model, "Root").unwrap().id, model.root_id());
        assert!(index.lookup(&model, "Inner").is_some());
        assert!(index.lookup(&model, "inner").is_none());
        assert!(index.lookup(&model, "Missing").is_none());
    }

    #[test]
    fn test_empty_titles_are_not_indexed() {
        let model = compile(&json!({"title": ""})).unwrap();
        let index = TitleIndex::build(&model);
        assert!(index.is_empty());
    }
}

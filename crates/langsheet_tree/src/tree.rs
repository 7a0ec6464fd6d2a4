//! Translation tree model with flatten/unflatten.

use std::cmp::Ordering;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Map, Value};

use crate::keypath::{SpecKeyPath, encode_key_path};
use crate::spec::{EnumNodeKind, KeyPathError, TreeError};

////////////////////////////////////////////////////////////////////////////////
// #region TreeModel

/// One child of a translation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumTreeNode {
    /// Leaf string value.
    Leaf(String),
    /// Nested mapping.
    Node(SpecTranslationTree),
}

/// Nested key -> value mapping for one language of one namespace.
///
/// Children keep insertion order (document order when parsed). Equality is
/// structural and ignores child order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecTranslationTree {
    dict_children: IndexMap<String, EnumTreeNode>,
}

/// One leaf discovered while flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFlatEntry {
    /// Full path from the root to the leaf.
    pub key_path: SpecKeyPath,
    /// Leaf value, trimmed of surrounding whitespace.
    pub value: String,
}

impl SpecTranslationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.dict_children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict_children.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&EnumTreeNode> {
        self.dict_children.get(key)
    }

    /// Insert or replace a direct child.
    pub fn insert(&mut self, key: impl Into<String>, node: EnumTreeNode) -> Option<EnumTreeNode> {
        self.dict_children.insert(key.into(), node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EnumTreeNode)> {
        self.dict_children.iter()
    }

    /// Follow `path` and return the leaf value stored there.
    #[cfg(test)]
    pub(crate) fn get_leaf(&self, path: &SpecKeyPath) -> Option<&str> {
        let (c_last, l_parents) = path.segments().split_last()?;
        let mut tree_cursor = self;
        for c_segment in l_parents {
            match tree_cursor.dict_children.get(c_segment)? {
                EnumTreeNode::Node(tree) => tree_cursor = tree,
                EnumTreeNode::Leaf(_) => return None,
            }
        }
        match tree_cursor.dict_children.get(c_last)? {
            EnumTreeNode::Leaf(value) => Some(value.as_str()),
            EnumTreeNode::Node(_) => None,
        }
    }

    /// Flatten into `(key path, trimmed value)` entries in discovery order.
    ///
    /// Fails on the first key that is empty or contains the separator; no
    /// partial result is returned.
    /// Empty nested mappings carry no leaf and are not represented.
    pub fn flatten(&self) -> Result<Vec<SpecFlatEntry>, TreeError> {
        self.flatten_with_empty_mappings()
            .map(|(l_entries, _)| l_entries)
    }

    /// Like [`SpecTranslationTree::flatten`], also returning the paths of
    /// empty nested mappings, which produce no entry.
    pub fn flatten_with_empty_mappings(
        &self,
    ) -> Result<(Vec<SpecFlatEntry>, Vec<SpecKeyPath>), TreeError> {
        let mut l_entries = Vec::new();
        let mut l_empty = Vec::new();
        flatten_into(self, &SpecKeyPath::root(), &mut l_entries, &mut l_empty)?;
        Ok((l_entries, l_empty))
    }

    /// Rebuild a tree from flat entries.
    pub fn unflatten<I>(entries: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = (SpecKeyPath, String)>,
    {
        let mut tree = Self::new();
        for (key_path, value) in entries {
            tree.insert_leaf(&key_path, value)?;
        }
        Ok(tree)
    }

    /// Set the leaf at `path`, creating intermediate mappings on the way.
    ///
    /// A leaf already sitting where a mapping is needed, or a mapping sitting
    /// where the leaf goes, is reported as [`TreeError::ShapeConflict`].
    /// Re-setting an existing leaf replaces its value.
    pub fn insert_leaf(&mut self, path: &SpecKeyPath, value: String) -> Result<(), TreeError> {
        let l_segments = path.segments();
        let Some((c_last, l_parents)) = l_segments.split_last() else {
            return Err(KeyPathError::EmptyPath.into());
        };

        let mut tree_cursor = self;
        for (n_idx, c_segment) in l_parents.iter().enumerate() {
            let node = tree_cursor
                .dict_children
                .entry(c_segment.clone())
                .or_insert_with(|| EnumTreeNode::Node(SpecTranslationTree::new()));
            tree_cursor = match node {
                EnumTreeNode::Node(tree) => tree,
                EnumTreeNode::Leaf(_) => {
                    return Err(TreeError::ShapeConflict {
                        path: path.encode(),
                        path_occupied: encode_key_path(&l_segments[..=n_idx]),
                        kind_occupied: EnumNodeKind::Leaf,
                    });
                }
            };
        }

        match tree_cursor.dict_children.entry(c_last.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(EnumTreeNode::Leaf(value));
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                EnumTreeNode::Leaf(existing) => *existing = value,
                EnumTreeNode::Node(_) => {
                    return Err(TreeError::ShapeConflict {
                        path: path.encode(),
                        path_occupied: path.encode(),
                        kind_occupied: EnumNodeKind::Node,
                    });
                }
            },
        }
        Ok(())
    }

    /// Sort children case-insensitively at every level.
    pub fn sort_recursive(&mut self) {
        self.dict_children
            .sort_by(|key_a, _, key_b, _| compare_keys_case_insensitive(key_a, key_b));
        for node in self.dict_children.values_mut() {
            if let EnumTreeNode::Node(tree) = node {
                tree.sort_recursive();
            }
        }
    }

    /// Convert a parsed JSON document into a tree.
    ///
    /// Strings become leaves; numbers and booleans become leaves holding their
    /// JSON text; `null` becomes an empty leaf; arrays become mappings keyed by
    /// element index.
    pub fn from_json_value(value: &Value) -> Result<Self, TreeError> {
        match value {
            Value::Object(map) => Ok(tree_from_json_map(map)),
            other => Err(TreeError::RootNotObject {
                found: derive_json_type_name(other),
            }),
        }
    }

    /// Convert into a JSON object, keeping current child order.
    pub fn to_json_value(&self) -> Value {
        let mut map = Map::with_capacity(self.dict_children.len());
        for (key, node) in &self.dict_children {
            let value = match node {
                EnumTreeNode::Leaf(text) => Value::String(text.clone()),
                EnumTreeNode::Node(tree) => tree.to_json_value(),
            };
            map.insert(key.clone(), value);
        }
        Value::Object(map)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Helpers

fn flatten_into(
    tree: &SpecTranslationTree,
    prefix: &SpecKeyPath,
    l_entries: &mut Vec<SpecFlatEntry>,
    l_empty: &mut Vec<SpecKeyPath>,
) -> Result<(), TreeError> {
    for (key, node) in &tree.dict_children {
        let key_path = prefix.child(key.as_str())?;
        match node {
            EnumTreeNode::Leaf(value) => l_entries.push(SpecFlatEntry {
                key_path,
                value: value.trim().to_string(),
            }),
            EnumTreeNode::Node(subtree) if subtree.is_empty() => l_empty.push(key_path),
            EnumTreeNode::Node(subtree) => flatten_into(subtree, &key_path, l_entries, l_empty)?,
        }
    }
    Ok(())
}

fn tree_from_json_map(map: &Map<String, Value>) -> SpecTranslationTree {
    let mut tree = SpecTranslationTree::new();
    for (key, value) in map {
        tree.insert(key.clone(), node_from_json_value(value));
    }
    tree
}

fn node_from_json_value(value: &Value) -> EnumTreeNode {
    match value {
        Value::Object(map) => EnumTreeNode::Node(tree_from_json_map(map)),
        Value::Array(l_items) => {
            let mut tree = SpecTranslationTree::new();
            for (n_idx, item) in l_items.iter().enumerate() {
                tree.insert(n_idx.to_string(), node_from_json_value(item));
            }
            EnumTreeNode::Node(tree)
        }
        Value::String(text) => EnumTreeNode::Leaf(text.clone()),
        Value::Number(n) => EnumTreeNode::Leaf(n.to_string()),
        Value::Bool(b) => EnumTreeNode::Leaf(b.to_string()),
        Value::Null => EnumTreeNode::Leaf(String::new()),
    }
}

fn derive_json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Case-insensitive key order; ties fall back to byte order so it is total.
pub fn compare_keys_case_insensitive(key_a: &str, key_b: &str) -> Ordering {
    key_a
        .to_lowercase()
        .cmp(&key_b.to_lowercase())
        .then_with(|| key_a.cmp(key_b))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn path(c_path: &str) -> SpecKeyPath {
        SpecKeyPath::decode(c_path).unwrap()
    }

    #[test]
    fn flatten_follows_document_order_and_trims() {
        let tree = SpecTranslationTree::from_json_value(&json!({
            "zeta": "  last  ",
            "alpha": {"beta": "b", "gamma": {"delta": "d"}}
        }))
        .unwrap();

        let l_entries = tree.flatten().unwrap();
        let l_keys: Vec<String> = l_entries.iter().map(|e| e.key_path.encode()).collect();
        assert_eq!(l_keys, vec!["zeta", "alpha.beta", "alpha.gamma.delta"]);
        assert_eq!(l_entries[0].value, "last");
    }

    #[test]
    fn empty_nested_mapping_is_reported_not_flattened() {
        let tree = SpecTranslationTree::from_json_value(&json!({
            "a": {},
            "b": "x",
            "c": {"d": {}, "e": []}
        }))
        .unwrap();

        let (l_entries, l_empty) = tree.flatten_with_empty_mappings().unwrap();
        assert_eq!(l_entries.len(), 1);
        assert_eq!(l_entries[0].key_path.encode(), "b");
        let l_empty: Vec<String> = l_empty.iter().map(SpecKeyPath::encode).collect();
        assert_eq!(l_empty, vec!["a", "c.d", "c.e"]);
        assert_eq!(tree.flatten().unwrap(), l_entries);
    }

    #[test]
    fn flatten_rejects_separator_inside_key() {
        let tree = SpecTranslationTree::from_json_value(&json!({
            "menu": {"file.open": "Open"}
        }))
        .unwrap();

        let err = tree.flatten().unwrap_err();
        assert!(matches!(
            err,
            TreeError::KeyPath(KeyPathError::SeparatorInSegment { .. })
        ));
    }

    #[test]
    fn non_string_scalars_become_text_leaves() {
        let tree = SpecTranslationTree::from_json_value(&json!({
            "count": 3,
            "enabled": true,
            "missing": null,
            "list": ["x", "y"]
        }))
        .unwrap();

        assert_eq!(tree.get_leaf(&path("count")), Some("3"));
        assert_eq!(tree.get_leaf(&path("enabled")), Some("true"));
        assert_eq!(tree.get_leaf(&path("missing")), Some(""));
        assert_eq!(tree.get_leaf(&path("list.1")), Some("y"));
    }

    #[test]
    fn root_must_be_object() {
        let err = SpecTranslationTree::from_json_value(&json!(["a"])).unwrap_err();
        assert!(matches!(err, TreeError::RootNotObject { found: "array" }));
    }

    #[test]
    fn unflatten_builds_five_levels() {
        let tree =
            SpecTranslationTree::unflatten([(path("a.b.c.d.e"), "deep".to_string())]).unwrap();

        let mut node = tree.get("a").unwrap();
        for c_segment in ["b", "c", "d"] {
            let EnumTreeNode::Node(subtree) = node else {
                panic!("expected mapping before {c_segment}");
            };
            node = subtree.get(c_segment).unwrap();
        }
        let EnumTreeNode::Node(subtree) = node else {
            panic!("expected mapping at a.b.c.d");
        };
        assert_eq!(subtree.get("e"), Some(&EnumTreeNode::Leaf("deep".to_string())));
    }

    #[test]
    fn unflatten_reports_leaf_then_mapping_conflict() {
        let err = SpecTranslationTree::unflatten([
            (path("a"), "leaf".to_string()),
            (path("a.b"), "nested".to_string()),
        ])
        .unwrap_err();

        match err {
            TreeError::ShapeConflict {
                path,
                path_occupied,
                kind_occupied,
            } => {
                assert_eq!(path, "a.b");
                assert_eq!(path_occupied, "a");
                assert_eq!(kind_occupied, EnumNodeKind::Leaf);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unflatten_reports_mapping_then_leaf_conflict() {
        let err = SpecTranslationTree::unflatten([
            (path("a.b"), "nested".to_string()),
            (path("a"), "leaf".to_string()),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            TreeError::ShapeConflict {
                kind_occupied: EnumNodeKind::Node,
                ..
            }
        ));
    }

    #[test]
    fn unflatten_last_write_wins_for_same_leaf() {
        let tree = SpecTranslationTree::unflatten([
            (path("a.b"), "first".to_string()),
            (path("a.b"), "second".to_string()),
        ])
        .unwrap();
        assert_eq!(tree.get_leaf(&path("a.b")), Some("second"));
    }

    #[test]
    fn sort_recursive_orders_every_level() {
        let mut tree = SpecTranslationTree::unflatten([
            (path("b.Zed"), "1".to_string()),
            (path("b.apple"), "2".to_string()),
            (path("A"), "3".to_string()),
        ])
        .unwrap();
        tree.sort_recursive();

        let l_top: Vec<&String> = tree.iter().map(|(k, _)| k).collect();
        assert_eq!(l_top, vec!["A", "b"]);
        let Some(EnumTreeNode::Node(subtree)) = tree.get("b") else {
            panic!("expected mapping at b");
        };
        let l_sub: Vec<&String> = subtree.iter().map(|(k, _)| k).collect();
        assert_eq!(l_sub, vec!["apple", "Zed"]);
    }

    #[test]
    fn case_insensitive_compare_is_total() {
        assert_eq!(compare_keys_case_insensitive("a", "B"), Ordering::Less);
        assert_eq!(compare_keys_case_insensitive("B", "b"), Ordering::Less);
        assert_eq!(compare_keys_case_insensitive("b", "b"), Ordering::Equal);
    }

    fn arb_tree(depth: u32) -> impl Strategy<Value = SpecTranslationTree> {
        let leaf = "[a-zA-Z0-9 ]{0,6}".prop_map(|s| EnumTreeNode::Leaf(s.trim().to_string()));
        let node = leaf.prop_recursive(depth, 24, 4, |inner| {
            prop::collection::vec(("[a-zA-Z_][a-zA-Z0-9_-]{0,5}", inner), 1..4).prop_map(
                |l_children| {
                    let mut tree = SpecTranslationTree::new();
                    for (key, node) in l_children {
                        tree.insert(key, node);
                    }
                    EnumTreeNode::Node(tree)
                },
            )
        });
        prop::collection::vec(("[a-zA-Z_][a-zA-Z0-9_-]{0,5}", node), 0..5).prop_map(
            |l_children| {
                let mut tree = SpecTranslationTree::new();
                for (key, node) in l_children {
                    tree.insert(key, node);
                }
                tree
            },
        )
    }

    proptest! {
        #[test]
        fn unflatten_inverts_flatten(tree in arb_tree(4)) {
            let l_entries = tree.flatten().unwrap();
            let tree_rebuilt = SpecTranslationTree::unflatten(
                l_entries.into_iter().map(|e| (e.key_path, e.value)),
            )
            .unwrap();
            prop_assert_eq!(tree_rebuilt, tree);
        }

        #[test]
        fn unflatten_ignores_entry_order(tree in arb_tree(3)) {
            let mut l_entries = tree.flatten().unwrap();
            l_entries.reverse();
            let tree_rebuilt = SpecTranslationTree::unflatten(
                l_entries.into_iter().map(|e| (e.key_path, e.value)),
            )
            .unwrap();
            prop_assert_eq!(tree_rebuilt, tree);
        }
    }
}

//! JSON document reader/writer for translation trees.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::spec::TreeError;
use crate::tree::SpecTranslationTree;

/// Parse one JSON document into a tree.
pub fn parse_tree_str(content: &str) -> Result<SpecTranslationTree, TreeError> {
    let root: Value = serde_json::from_str(content)?;
    SpecTranslationTree::from_json_value(&root)
}

/// Read and parse one JSON file.
///
/// A leading UTF-8 byte order mark is ignored.
pub fn read_tree_file(path: &Path) -> Result<SpecTranslationTree, TreeError> {
    let content = fs::read_to_string(path).map_err(|err| TreeError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    parse_tree_str(content.strip_prefix('\u{feff}').unwrap_or(&content))
}

/// Render a tree as canonical JSON.
///
/// Keys are sorted case-insensitively at every level and the document is
/// indented with two spaces, so equal key sets always render identically.
pub fn render_tree_json(tree: &SpecTranslationTree) -> Result<String, TreeError> {
    let mut tree_sorted = tree.clone();
    tree_sorted.sort_recursive();
    Ok(serde_json::to_string_pretty(&tree_sorted.to_json_value())?)
}

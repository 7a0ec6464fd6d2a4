//! `langsheet_tree` v1:
//! Tree <-> table transformation kernel for localization dictionaries.
//!
//! Modules:
//! - `conf`    : constants shared by both directions
//! - `spec`    : error types
//! - `keypath` : dotted key-path codec
//! - `tree`    : translation tree model, flatten/unflatten
//! - `table`   : per-namespace accumulator, table build, sheet row parsing
//! - `csv`     : delimited-text rendering of a table
//! - `json`    : JSON document reader/writer for translation trees
pub mod conf;
pub mod csv;
pub mod json;
pub mod keypath;
pub mod spec;
pub mod table;
pub mod tree;

pub use conf::{C_HEADER_KEY, C_KEY_PATH_SEPARATOR};
pub use csv::{render_csv_field, render_table_csv};
pub use json::{parse_tree_str, read_tree_file, render_tree_json};
pub use keypath::{SpecKeyPath, decode_key_path, encode_key_path, validate_segment};
pub use spec::{EnumNodeKind, KeyPathError, TreeError};
pub use table::{
    Accumulator, SpecParsedSheet, SpecTable, SpecTableRow, SpecWorkbook, WorkbookBuilder,
    derive_populated_language_count, parse_sheet_rows,
};
pub use tree::{EnumTreeNode, SpecFlatEntry, SpecTranslationTree, compare_keys_case_insensitive};

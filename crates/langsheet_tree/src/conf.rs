//! Constants shared by the forward and reverse pipelines.

/// Separator used to join key-path segments.
pub const C_KEY_PATH_SEPARATOR: char = '.';
/// Label of the first table column.
pub const C_HEADER_KEY: &str = "Key";
/// Delimiter between CSV fields.
pub const C_CSV_DELIMITER: char = ',';
/// Quote character wrapped around CSV values.
pub const C_CSV_QUOTE: char = '"';
/// Line separator of rendered CSV documents.
pub const C_CSV_LINE_SEPARATOR: &str = "\n";

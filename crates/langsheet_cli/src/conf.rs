//! Run defaults and resolved run settings.

use std::path::PathBuf;

use indexmap::IndexMap;
use langsheet_io_xlsx::SpecXlsxWriteOptions;

/// Forward input root: one sub-folder per language.
pub const C_DIR_FORWARD_INPUT_DEFAULT: &str = "./translations";
/// Reverse input folder holding `.xlsx` files.
pub const C_DIR_REVERSE_INPUT_DEFAULT: &str = "./excels";
/// Output root of both directions.
pub const C_DIR_OUTPUT_DEFAULT: &str = "./results";
/// Workbook file written by the forward run.
pub const C_NAME_WORKBOOK_DEFAULT: &str = "translations.xlsx";

/// File name pattern of forward inputs.
pub const C_PATTERN_JSON: &str = "*.json";
/// File name pattern of reverse inputs.
pub const C_PATTERN_XLSX: &str = "*.xlsx";
/// CSV output extension.
pub const C_EXT_CSV: &str = "csv";
/// JSON output extension.
pub const C_EXT_JSON: &str = "json";

/// Settings for one forward run.
#[derive(Debug, Clone)]
pub struct SpecForwardOptions {
    /// Folder with one sub-folder per language.
    pub dir_input: PathBuf,
    /// Folder receiving CSV files and the workbook.
    pub dir_output: PathBuf,
    /// Workbook file name inside `dir_output`.
    pub name_workbook: String,
    /// Pre-answered labels by language code.
    pub dict_labels: IndexMap<String, String>,
    /// Worker threads for the parse stage; `1` is serial.
    pub num_workers_max: Option<usize>,
    /// Workbook styling and layout.
    pub xlsx_write_options: SpecXlsxWriteOptions,
}

impl Default for SpecForwardOptions {
    fn default() -> Self {
        Self {
            dir_input: PathBuf::from(C_DIR_FORWARD_INPUT_DEFAULT),
            dir_output: PathBuf::from(C_DIR_OUTPUT_DEFAULT),
            name_workbook: C_NAME_WORKBOOK_DEFAULT.to_string(),
            dict_labels: IndexMap::new(),
            num_workers_max: Some(1),
            xlsx_write_options: SpecXlsxWriteOptions::default(),
        }
    }
}

/// Settings for one reverse run.
#[derive(Debug, Clone)]
pub struct SpecReverseOptions {
    /// Folder with `.xlsx` files.
    pub dir_input: PathBuf,
    /// Folder receiving one sub-folder per workbook.
    pub dir_output: PathBuf,
    /// Language count for every workbook; `None` asks per workbook.
    pub n_languages: Option<usize>,
}

impl Default for SpecReverseOptions {
    fn default() -> Self {
        Self {
            dir_input: PathBuf::from(C_DIR_REVERSE_INPUT_DEFAULT),
            dir_output: PathBuf::from(C_DIR_OUTPUT_DEFAULT),
            n_languages: None,
        }
    }
}

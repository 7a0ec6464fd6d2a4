//! Scan specification models and top-level error types.

use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for [`crate::scan::list_files_matching`].
#[derive(Debug, Clone)]
pub struct SpecScanOptions {
    /// Glob patterns applied to file basename; `None` keeps every file.
    pub patterns_include_files: Option<Vec<String>>,
    /// Match patterns ignoring ASCII case (`*.JSON` matches `*.json`).
    pub if_case_insensitive: bool,
}

impl Default for SpecScanOptions {
    fn default() -> Self {
        Self {
            patterns_include_files: None,
            if_case_insensitive: true,
        }
    }
}

impl SpecScanOptions {
    /// Keep files whose name matches `pattern`, ignoring case.
    pub fn with_pattern(pattern: &str) -> Self {
        Self {
            patterns_include_files: Some(vec![pattern.to_string()]),
            ..Default::default()
        }
    }
}

/// One language folder of the forward input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLanguageDir {
    /// Folder name, used as language code.
    pub code: String,
    /// Full folder path.
    pub path_dir: PathBuf,
}

/// One file selected by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSourceFile {
    /// File name without its last extension.
    pub stem: String,
    /// Full file name.
    pub name_file: String,
    /// Full file path.
    pub path_file: PathBuf,
}

/// One run failure item with path + error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRunError {
    /// Failed input or output path.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// Filesystem setup and scan errors.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Invalid include pattern.
    #[error("Invalid pattern in include list: {0}")]
    InvalidPattern(String),

    /// Path is missing or not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotDirectory(PathBuf),

    /// Directory listing failed.
    #[error("Failed to read directory {}: {message}", path.display())]
    ReadDir { path: PathBuf, message: String },

    /// Output directory initialization failed.
    #[error("Failed to initialize destination {}: {message}", path.display())]
    DestinationInitFailed { path: PathBuf, message: String },

    /// Output path leaves its root or crosses a symlink.
    #[error("Unsafe destination path {}: {message}", path.display())]
    UnsafeDestination { path: PathBuf, message: String },

    /// Writing one output file failed.
    #[error("Failed to write {}: {message}", path.display())]
    WriteFailed { path: PathBuf, message: String },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

//! `langsheet_io_fs` v1:
//! Filesystem side of the conversion runs.
//!
//! Modules:
//! - `scan`   : input enumeration and output folder preparation
//! - `spec`   : options/models/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod report;
pub mod scan;
pub mod spec;
mod util;

pub use report::{ReportRun, ReportRunBuilder};
pub use scan::{ensure_dir, list_files_matching, list_language_dirs, recreate_dir, write_text_file};
pub use spec::{ScanError, SpecLanguageDir, SpecRunError, SpecScanOptions, SpecSourceFile};
pub use util::{calculate_worker_limit, derive_safe_child_path, map_tasks_in_pool};

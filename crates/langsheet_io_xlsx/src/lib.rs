//! `langsheet_io_xlsx` v1:
//! Workbook kernel for translation tables.
//!
//! Modules:
//! - `conf`   : Excel limits and default presets
//! - `spec`   : specs/models/options and error types
//! - `util`   : pure helper functions
//! - `writer` : styled workbook writer
//! - `reader` : worksheet-to-text-grid reader
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_CELL_TEXT_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL, derive_default_sheet_formats,
};
pub use reader::XlsxReader;
pub use spec::{
    SpecCellFormat, SpecSheetFormats, SpecSheetWritten, SpecXlsxReport, SpecXlsxWriteOptions,
    XlsxReadError, XlsxWriteError,
};
pub use util::{derive_cell_text, derive_column_widths, sanitize_sheet_name};
pub use writer::XlsxWriter;

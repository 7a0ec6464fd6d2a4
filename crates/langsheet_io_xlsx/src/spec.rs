//! Shared XLSX specification models and error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{N_HEIGHT_ROW_DEFAULT, N_WIDTH_CELL_PADDING_DEFAULT, derive_default_sheet_formats};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Border color for all sides (`#RRGGBB`).
    pub border_color: Option<String>,

    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            border_color: other
                .border_color
                .clone()
                .or_else(|| self.border_color.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

/// Cell presets for the three regions of a translation sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetFormats {
    /// Header row.
    pub fmt_header: SpecCellFormat,
    /// Key column below the header.
    pub fmt_key: SpecCellFormat,
    /// Every other body cell.
    pub fmt_body: SpecCellFormat,
}

impl Default for SpecSheetFormats {
    fn default() -> Self {
        derive_default_sheet_formats()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Writer-wide options controlling formatting and layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecXlsxWriteOptions {
    /// Cell presets.
    pub formats: SpecSheetFormats,
    /// Height applied to every written row.
    pub height_row: f64,
    /// Width added to the longest body value per column.
    pub width_cell_padding: usize,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            formats: SpecSheetFormats::default(),
            height_row: N_HEIGHT_ROW_DEFAULT,
            width_cell_padding: N_WIDTH_CELL_PADDING_DEFAULT,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// One worksheet emitted to the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetWritten {
    /// Name asked for by the caller.
    pub sheet_name_requested: String,
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Body rows written (header excluded).
    pub n_rows: usize,
    /// Columns written.
    pub n_cols: usize,
}

/// Writer report accumulated over all write calls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheets produced so far.
    pub sheets: Vec<SpecSheetWritten>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failure while building or saving a workbook.
#[derive(Debug, Error)]
pub enum XlsxWriteError {
    #[error("Cannot write after close().")]
    Closed,

    #[error(
        "Sheet {sheet_name:?} exceeds Excel limits: {n_rows} rows x {n_cols} columns (header included)."
    )]
    SheetTooLarge {
        sheet_name: String,
        n_rows: usize,
        n_cols: usize,
    },

    #[error("Row {n_row} has {n_cells} cells; header has {n_cols}.")]
    RowWidthMismatch {
        n_row: usize,
        n_cells: usize,
        n_cols: usize,
    },

    #[error(
        "Cell at row {n_row}, column {n_col} has {n_chars} characters; Excel allows {n_max}."
    )]
    CellTooLong {
        n_row: usize,
        n_col: usize,
        n_chars: usize,
        n_max: usize,
    },

    #[error("{kind} index overflow: {value}")]
    IndexOverflow { kind: &'static str, value: usize },

    #[error("Failed to save workbook {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Failure while reading a workbook.
#[derive(Debug, Error)]
pub enum XlsxReadError {
    #[error("Failed to open workbook {path:?}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Workbook {path:?} has no worksheets.")]
    NoWorksheets { path: PathBuf },

    #[error("Failed to read sheet {sheet_name:?} of {path:?}: {message}")]
    Sheet {
        path: PathBuf,
        sheet_name: String,
        message: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_right_side_values() {
        let fmt_base = SpecCellFormat {
            font_name: Some("Arial".to_string()),
            bold: Some(false),
            ..Default::default()
        };
        let fmt_merged = fmt_base.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        });
        assert_eq!(fmt_merged.font_name.as_deref(), Some("Arial"));
        assert_eq!(fmt_merged.bold, Some(true));
    }

    #[test]
    fn default_presets_share_base_font() {
        let formats = SpecSheetFormats::default();
        for fmt in [&formats.fmt_header, &formats.fmt_key, &formats.fmt_body] {
            assert_eq!(fmt.font_name.as_deref(), Some("Arial"));
            assert_eq!(fmt.font_size, Some(12));
            assert_eq!(fmt.border, Some(1));
        }
        assert_eq!(formats.fmt_header.align.as_deref(), Some("center"));
        assert_eq!(formats.fmt_key.bold, Some(true));
        assert_eq!(formats.fmt_body.bold, None);
    }
}

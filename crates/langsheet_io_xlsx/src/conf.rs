//! XLSX constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecSheetFormats};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Excel cell text maximum length, in characters.
pub const N_LEN_EXCEL_CELL_TEXT_MAX: usize = 32_767;
/// Excel column width hard cap.
pub const N_WIDTH_EXCEL_COLUMN_MAX: usize = 255;

/// Row height applied to every written row.
pub const N_HEIGHT_ROW_DEFAULT: f64 = 20.0;
/// Width added to the longest body value of each column.
pub const N_WIDTH_CELL_PADDING_DEFAULT: usize = 10;

/// Build default cell presets used by [`crate::writer::XlsxWriter`].
///
/// Every cell: Arial 12, thin `#303030` borders, vertically centered.
/// Header row: bold, blue text on a light blue fill, centered.
/// First column below the header: bold.
pub fn derive_default_sheet_formats() -> SpecSheetFormats {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Arial".to_string()),
        font_size: Some(12),
        border: Some(1),
        border_color: Some("#303030".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };

    SpecSheetFormats {
        fmt_header: cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            font_color: Some("#4C7CB2".to_string()),
            bg_color: Some("#D9E1F2".to_string()),
            align: Some("center".to_string()),
            ..Default::default()
        }),
        fmt_key: cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
        fmt_body: cfg_base_fmt_spec,
    }
}

//! Stateless helper utilities used by the XLSX writer and reader.

use calamine::Data;

use crate::conf::{
    N_LEN_EXCEL_CELL_TEXT_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_WIDTH_EXCEL_COLUMN_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::XlsxWriteError;

////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Create suffixed sheet name (`base_2`, `base_3`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_sheet_name_suffix = format!("_{part_idx_1based}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

/// Reject grids Excel cannot hold in one worksheet.
pub fn validate_sheet_extent(
    sheet_name: &str,
    n_rows_total: usize,
    n_cols_total: usize,
) -> Result<(), XlsxWriteError> {
    if n_rows_total > N_NROWS_EXCEL_MAX || n_cols_total > N_NCOLS_EXCEL_MAX {
        return Err(XlsxWriteError::SheetTooLarge {
            sheet_name: sheet_name.to_string(),
            n_rows: n_rows_total,
            n_cols: n_cols_total,
        });
    }
    Ok(())
}

/// Reject a row holding a cell longer than Excel accepts.
///
/// `n_idx_row` is 0-based; the error reports 1-based row and column.
pub fn validate_cell_text_len(n_idx_row: usize, cells: &[String]) -> Result<(), XlsxWriteError> {
    for (n_idx_col, cell) in cells.iter().enumerate() {
        let n_chars = cell.chars().count();
        if n_chars > N_LEN_EXCEL_CELL_TEXT_MAX {
            return Err(XlsxWriteError::CellTooLong {
                n_row: n_idx_row + 1,
                n_col: n_idx_col + 1,
                n_chars,
                n_max: N_LEN_EXCEL_CELL_TEXT_MAX,
            });
        }
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnWidth

/// Displayed length of one text value, in characters.
pub fn estimate_text_width(value: &str) -> usize {
    value.chars().count()
}

/// Column widths: longest body value per column plus `width_padding`.
///
/// The header row does not count toward the width.
pub fn derive_column_widths(
    rows: &[Vec<String>],
    n_cols: usize,
    width_padding: usize,
) -> Vec<f64> {
    let mut l_width_by_col = vec![0usize; n_cols];
    for row in rows {
        for (n_idx_col, value) in row.iter().enumerate().take(n_cols) {
            l_width_by_col[n_idx_col] =
                usize::max(l_width_by_col[n_idx_col], estimate_text_width(value));
        }
    }
    l_width_by_col
        .into_iter()
        .map(|n_width| usize::min(N_WIDTH_EXCEL_COLUMN_MAX, n_width + width_padding) as f64)
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellConversion

/// Render one read cell as text.
///
/// Integral floats lose the trailing `.0`; booleans become `true`/`false`;
/// empty cells become the empty string.
pub fn derive_cell_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(val) => val.clone(),
        Data::Int(val) => val.to_string(),
        Data::Float(val) => derive_float_text(*val),
        Data::Bool(val) => val.to_string(),
        Data::DateTime(val) => derive_float_text(val.as_f64()),
        Data::DateTimeIso(val) | Data::DurationIso(val) => val.clone(),
        Data::Error(err) => err.to_string(),
    }
}

fn derive_float_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    value.to_string()
}

pub(crate) fn cast_row_num(value: usize) -> Result<u32, XlsxWriteError> {
    u32::try_from(value).map_err(|_| XlsxWriteError::IndexOverflow { kind: "row", value })
}

pub(crate) fn cast_col_num(value: usize) -> Result<u16, XlsxWriteError> {
    u16::try_from(value).map_err(|_| XlsxWriteError::IndexOverflow {
        kind: "column",
        value,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_sheet_name_replaces_illegal_and_caps_length() {
        assert_eq!(sanitize_sheet_name("a/b:c", "_"), "a_b_c");
        assert_eq!(sanitize_sheet_name("  ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name("'quoted'", "_"), "quoted");
        assert_eq!(
            sanitize_sheet_name(&"x".repeat(40), "_").chars().count(),
            N_LEN_EXCEL_SHEET_NAME_MAX
        );
    }

    #[test]
    fn test_create_sheet_identifier_keeps_suffix_within_cap() {
        let c_name = create_sheet_identifier(&"n".repeat(31), 12);
        assert_eq!(c_name.chars().count(), N_LEN_EXCEL_SHEET_NAME_MAX);
        assert!(c_name.ends_with("_12"));
        assert_eq!(create_sheet_identifier("common", 2), "common_2");
    }

    #[test]
    fn test_validate_cell_text_len_counts_chars() {
        let l_cells = vec!["k".to_string(), "é".repeat(N_LEN_EXCEL_CELL_TEXT_MAX)];
        assert!(validate_cell_text_len(4, &l_cells).is_ok());

        let l_cells = vec!["k".to_string(), "é".repeat(N_LEN_EXCEL_CELL_TEXT_MAX + 1)];
        assert!(matches!(
            validate_cell_text_len(4, &l_cells),
            Err(XlsxWriteError::CellTooLong {
                n_row: 5,
                n_col: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_derive_column_widths_uses_body_plus_padding() {
        let l_rows = vec![
            vec!["common.hello".to_string(), "Hola".to_string()],
            vec!["a".to_string(), "¡Buenos días!".to_string()],
        ];
        assert_eq!(derive_column_widths(&l_rows, 2, 10), vec![22.0, 23.0]);
        assert_eq!(derive_column_widths(&[], 2, 10), vec![10.0, 10.0]);
    }

    #[test]
    fn test_derive_cell_text_renders_scalars() {
        assert_eq!(derive_cell_text(&Data::Empty), "");
        assert_eq!(derive_cell_text(&Data::Float(3.0)), "3");
        assert_eq!(derive_cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(derive_cell_text(&Data::Int(-7)), "-7");
        assert_eq!(derive_cell_text(&Data::Bool(true)), "true");
        assert_eq!(derive_cell_text(&Data::String("x".into())), "x");
    }

    #[test]
    fn test_validate_sheet_extent_rejects_overflow() {
        assert!(validate_sheet_extent("s", N_NROWS_EXCEL_MAX, 3).is_ok());
        assert!(matches!(
            validate_sheet_extent("s", N_NROWS_EXCEL_MAX + 1, 3),
            Err(XlsxWriteError::SheetTooLarge { .. })
        ));
    }
}

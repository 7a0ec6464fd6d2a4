//! XLSX writer kernel that turns translation tables into a styled workbook.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{debug, info};

use crate::spec::{
    SpecCellFormat, SpecSheetWritten, SpecXlsxReport, SpecXlsxWriteOptions, XlsxWriteError,
};
use crate::util::{
    cast_col_num, cast_row_num, create_sheet_identifier, derive_column_widths,
    sanitize_sheet_name, validate_cell_text_len, validate_sheet_extent,
};

/// Stateful workbook writer.
///
/// Sheets are buffered in memory until [`Self::close`] is called.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    report: SpecXlsxReport,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path and options.
    pub fn new(path_file_out: impl Into<PathBuf>, write_options: SpecXlsxWriteOptions) -> Self {
        Self {
            path_file_out: path_file_out.into(),
            workbook: Workbook::new(),
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            report: SpecXlsxReport::default(),
            if_closed: false,
        }
    }

    /// Snapshot of the sheets written so far.
    pub fn report(&self) -> SpecXlsxReport {
        self.report.clone()
    }

    /// Number of sheets added so far.
    pub fn n_sheets(&self) -> usize {
        self.report.sheets.len()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), XlsxWriteError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(|source| XlsxWriteError::Save {
                path: self.path_file_out.clone(),
                source,
            })?;
        self.if_closed = true;
        info!(
            path = %self.path_file_out.display(),
            n_sheets = self.report.sheets.len(),
            "workbook saved"
        );
        Ok(())
    }

    /// Write one sheet: `header` on row 1, then `rows` in order.
    ///
    /// Every row must have exactly as many cells as the header. Returns the
    /// unique sheet name actually used. On error the workbook is left as it
    /// was: no partial sheet is added and no name is reserved.
    pub fn write_sheet(
        &mut self,
        sheet_name: &str,
        header: &[String],
        rows: &[Vec<String>],
    ) -> Result<String, XlsxWriteError> {
        if self.if_closed {
            return Err(XlsxWriteError::Closed);
        }

        let n_cols = header.len();
        validate_sheet_extent(sheet_name, rows.len() + 1, n_cols)?;
        validate_cell_text_len(0, header)?;
        for (n_idx_row, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(XlsxWriteError::RowWidthMismatch {
                    n_row: n_idx_row + 2,
                    n_cells: row.len(),
                    n_cols,
                });
            }
            validate_cell_text_len(n_idx_row + 1, row)?;
        }

        let c_name_sanitized = sanitize_sheet_name(sheet_name, "_");
        let sheet_name_unique = self.derive_unique_sheet_name(&c_name_sanitized);

        let fmt_header = derive_rust_xlsx_format(&self.write_options.formats.fmt_header);
        let fmt_key = derive_rust_xlsx_format(&self.write_options.formats.fmt_key);
        let fmt_body = derive_rust_xlsx_format(&self.write_options.formats.fmt_body);
        let n_height_row = self.write_options.height_row;
        let l_widths = derive_column_widths(rows, n_cols, self.write_options.width_cell_padding);

        let mut worksheet = Worksheet::new();
        worksheet.set_name(&sheet_name_unique)?;

        write_row(&mut worksheet, 0, header, &fmt_header, &fmt_header)?;
        worksheet.set_row_height(0, n_height_row)?;
        for (n_idx_row, row) in rows.iter().enumerate() {
            let n_row = cast_row_num(n_idx_row + 1)?;
            write_row(&mut worksheet, n_row, row, &fmt_key, &fmt_body)?;
            worksheet.set_row_height(n_row, n_height_row)?;
        }
        for (n_idx_col, n_width) in l_widths.into_iter().enumerate() {
            worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width)?;
        }

        self.workbook.push_worksheet(worksheet);
        self.set_sheet_names_existing
            .insert(sheet_name_unique.to_lowercase());
        if sheet_name_unique != sheet_name {
            self.report.warn(format!(
                "Sheet {sheet_name:?} written as {sheet_name_unique:?}."
            ));
        }

        debug!(
            sheet = %sheet_name_unique,
            n_rows = rows.len(),
            n_cols,
            "sheet written"
        );
        self.report.sheets.push(SpecSheetWritten {
            sheet_name_requested: sheet_name.to_string(),
            sheet_name: sheet_name_unique.clone(),
            n_rows: rows.len(),
            n_cols,
        });
        Ok(sheet_name_unique)
    }

    /// First free name; Excel compares sheet names case-insensitively.
    fn derive_unique_sheet_name(&self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(&name.to_lowercase()) {
            return name.to_string();
        }

        let mut n_idx = 2usize;
        loop {
            let candidate = create_sheet_identifier(name, n_idx);
            if !self
                .set_sheet_names_existing
                .contains(&candidate.to_lowercase())
            {
                return candidate;
            }
            n_idx += 1;
        }
    }
}

fn write_row(
    worksheet: &mut Worksheet,
    row_idx: u32,
    values: &[String],
    fmt_first: &Format,
    fmt_rest: &Format,
) -> Result<(), XlsxWriteError> {
    for (col_idx, cell_value) in values.iter().enumerate() {
        let fmt = if col_idx == 0 { fmt_first } else { fmt_rest };
        let col_num = cast_col_num(col_idx)?;
        if cell_value.is_empty() {
            worksheet.write_blank(row_idx, col_num, fmt)?;
        } else {
            worksheet.write_string_with_format(row_idx, col_num, cell_value, fmt)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = &spec.border_color {
        format = format.set_border_color(val.as_str());
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

//! XLSX reader that exposes worksheets as plain text grids.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Reader, Xlsx, XlsxError, open_workbook};
use tracing::debug;

use crate::spec::XlsxReadError;
use crate::util::derive_cell_text;

/// Open workbook with its sheet list.
pub struct XlsxReader {
    path_file_in: PathBuf,
    workbook: Xlsx<BufReader<File>>,
}

impl XlsxReader {
    /// Open a workbook. A workbook without worksheets is rejected.
    pub fn open(path_file_in: impl AsRef<Path>) -> Result<Self, XlsxReadError> {
        let path_file_in = path_file_in.as_ref().to_path_buf();
        let workbook: Xlsx<BufReader<File>> =
            open_workbook(&path_file_in).map_err(|err: XlsxError| XlsxReadError::Open {
                path: path_file_in.clone(),
                message: err.to_string(),
            })?;
        if workbook.sheet_names().is_empty() {
            return Err(XlsxReadError::NoWorksheets { path: path_file_in });
        }
        Ok(Self {
            path_file_in,
            workbook,
        })
    }

    /// Worksheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Read one worksheet as rows of text cells anchored at A1.
    ///
    /// Rows are padded to the used range; cells beyond it are absent, so
    /// callers treat a missing cell as an empty string.
    pub fn read_sheet_grid(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>, XlsxReadError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|err| XlsxReadError::Sheet {
                path: self.path_file_in.clone(),
                sheet_name: sheet_name.to_string(),
                message: err.to_string(),
            })?;

        let Some((n_row_end, n_col_end)) = range.end() else {
            return Ok(vec![]);
        };

        let mut l_grid = Vec::with_capacity(n_row_end as usize + 1);
        for n_row in 0..=n_row_end {
            let l_cells: Vec<String> = (0..=n_col_end)
                .map(|n_col| {
                    range
                        .get_value((n_row, n_col))
                        .map(derive_cell_text)
                        .unwrap_or_default()
                })
                .collect();
            l_grid.push(l_cells);
        }

        debug!(
            path = %self.path_file_in.display(),
            sheet = sheet_name,
            n_rows = l_grid.len(),
            "sheet read"
        );
        Ok(l_grid)
    }

    /// Header row (row 1) of one worksheet.
    pub fn read_sheet_header(&mut self, sheet_name: &str) -> Result<Vec<String>, XlsxReadError> {
        Ok(self
            .read_sheet_grid(sheet_name)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_open_rejects_non_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        fs::write(&path, b"not a zip").unwrap();

        let err = XlsxReader::open(&path).err().unwrap();
        assert!(matches!(err, XlsxReadError::Open { .. }));
    }

    #[test]
    fn test_grid_is_anchored_at_a1_and_renders_numbers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("nav").unwrap();
        worksheet.write_string(1, 1, "en").unwrap();
        worksheet.write_string(2, 0, "count").unwrap();
        worksheet.write_number(2, 1, 3.0).unwrap();
        workbook.save(&path).unwrap();

        let mut reader = XlsxReader::open(&path).unwrap();
        let l_grid = reader.read_sheet_grid("nav").unwrap();
        assert_eq!(l_grid.len(), 3);
        assert_eq!(l_grid[0], vec![String::new(), String::new()]);
        assert_eq!(l_grid[1][1], "en");
        assert_eq!(l_grid[2], vec!["count".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_missing_sheet_is_named_in_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("only").unwrap();
        workbook.save(&path).unwrap();

        let mut reader = XlsxReader::open(&path).unwrap();
        let err = reader.read_sheet_grid("other").unwrap_err();
        assert!(err.to_string().contains("\"other\""));
    }
}

//! Reverse run: workbooks -> one JSON tree per language per worksheet.
//!
//! Output layout: `<results>/<workbook file name>/<language label>/<sheet>.json`.
//! The per-workbook folder is recreated on every run.

use std::path::Path;

use anyhow::{Context, Result};
use langsheet_io_fs::{
    ReportRun, ReportRunBuilder, ScanError, SpecScanOptions, SpecSourceFile,
    derive_safe_child_path, ensure_dir, list_files_matching, recreate_dir, write_text_file,
};
use langsheet_io_xlsx::XlsxReader;
use langsheet_tree::{derive_populated_language_count, parse_sheet_rows, render_tree_json};
use tracing::{error, info, warn};

use crate::conf::{C_EXT_JSON, C_PATTERN_XLSX, SpecReverseOptions};
use crate::prompt::Prompter;

/// Run the reverse conversion.
///
/// Only a results folder that cannot be created fails the call; every other
/// failure is recorded in the returned report.
pub fn run_reverse(
    options: &SpecReverseOptions,
    prompter: &mut dyn Prompter,
) -> Result<ReportRun> {
    ensure_dir(&options.dir_output).with_context(|| {
        format!(
            "cannot prepare results folder {}",
            options.dir_output.display()
        )
    })?;

    let mut builder_report = ReportRunBuilder::default();
    let l_files = match list_files_matching(
        &options.dir_input,
        &SpecScanOptions::with_pattern(C_PATTERN_XLSX),
        &mut builder_report,
    ) {
        Ok(v) => v,
        Err(err) => {
            error!(path = %options.dir_input.display(), "{err}");
            builder_report.add_error(&options.dir_input, err.to_string());
            Vec::new()
        }
    };
    if l_files.is_empty() {
        warn!(path = %options.dir_input.display(), "no workbooks found");
    }

    for file in &l_files {
        convert_workbook(file, options, prompter, &mut builder_report);
    }

    let report = builder_report.build();
    info!("{}", report.format("[REVERSE]"));
    Ok(report)
}

/// Convert every worksheet of one workbook. Failures stay local to the workbook.
fn convert_workbook(
    file: &SpecSourceFile,
    options: &SpecReverseOptions,
    prompter: &mut dyn Prompter,
    builder_report: &mut ReportRunBuilder,
) {
    info!(path = %file.path_file.display(), "reading workbook");
    let mut reader = match XlsxReader::open(&file.path_file) {
        Ok(v) => v,
        Err(err) => {
            error!("{err}");
            builder_report.add_error(&file.path_file, err.to_string());
            return;
        }
    };
    let l_sheet_names = reader.sheet_names();

    let n_languages = match options.n_languages.filter(|n| *n > 0) {
        Some(n) => Some(n),
        None => {
            let n_detected = match l_sheet_names.first() {
                Some(sheet_name) => reader
                    .read_sheet_header(sheet_name)
                    .map(|header| derive_populated_language_count(&header))
                    .unwrap_or(0),
                None => 0,
            };
            prompter.ask_language_count(&file.name_file, n_detected)
        }
    };

    let path_dir_workbook = match derive_safe_child_path(&options.dir_output, &file.name_file)
        .and_then(|path_dir| recreate_dir(&path_dir, &options.dir_output).map(|_| path_dir))
    {
        Ok(v) => v,
        Err(err) => {
            error!("{err}");
            builder_report.add_error(&file.path_file, err.to_string());
            return;
        }
    };

    for sheet_name in &l_sheet_names {
        builder_report.add_scanned();
        info!(sheet = %sheet_name, "processing sheet");
        let l_grid = match reader.read_sheet_grid(sheet_name) {
            Ok(v) => v,
            Err(err) => {
                error!("{err}");
                builder_report.add_error(&file.path_file, err.to_string());
                continue;
            }
        };

        let sheet = parse_sheet_rows(&l_grid, n_languages);
        for msg in &sheet.warnings {
            let msg = format!("{} [{sheet_name}]: {msg}", file.name_file);
            warn!("{msg}");
            builder_report.add_warning(msg);
        }
        if sheet.languages.is_empty() {
            builder_report.add_skipped();
            continue;
        }
        builder_report.add_read();

        for (n_position, label) in sheet.languages.iter().enumerate() {
            let res_written = sheet
                .build_tree(n_position)
                .map_err(|err| err.to_string())
                .and_then(|tree| render_tree_json(&tree).map_err(|err| err.to_string()))
                .and_then(|txt| {
                    write_language_file(&path_dir_workbook, label, sheet_name, &txt)
                        .map_err(|err| err.to_string())
                });
            match res_written {
                Ok(()) => builder_report.add_written(),
                Err(msg) => {
                    let msg = format!("sheet {sheet_name:?}, language {label:?}: {msg}");
                    error!(path = %file.path_file.display(), "{msg}");
                    builder_report.add_error(&file.path_file, msg);
                }
            }
        }
    }
}

fn write_language_file(
    path_dir_workbook: &Path,
    label: &str,
    sheet_name: &str,
    txt: &str,
) -> Result<(), ScanError> {
    let path_dir_language = derive_safe_child_path(path_dir_workbook, label)?;
    let name_file = format!("{sheet_name}.{C_EXT_JSON}");
    let path_file = derive_safe_child_path(&path_dir_language, &name_file)?;
    write_text_file(&path_file, txt, path_dir_workbook)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use langsheet_io_xlsx::{SpecXlsxWriteOptions, XlsxWriter};
    use tempfile::TempDir;

    use super::*;
    use crate::prompt::FixedPrompter;

    fn strings(l_values: &[&str]) -> Vec<String> {
        l_values.iter().map(ToString::to_string).collect()
    }

    fn write_book(path: &Path, l_sheets: &[(&str, Vec<Vec<String>>)]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut writer = XlsxWriter::new(path, SpecXlsxWriteOptions::default());
        for (sheet_name, l_grid) in l_sheets {
            writer
                .write_sheet(sheet_name, &l_grid[0], &l_grid[1..])
                .unwrap();
        }
        writer.close().unwrap();
    }

    fn options(dir: &TempDir) -> SpecReverseOptions {
        SpecReverseOptions {
            dir_input: dir.path().join("excels"),
            dir_output: dir.path().join("results"),
            n_languages: None,
        }
    }

    #[test]
    fn conflicting_rows_fail_only_that_language_file() {
        let dir = TempDir::new().unwrap();
        write_book(
            &dir.path().join("excels/book.xlsx"),
            &[
                (
                    "nav",
                    vec![
                        strings(&["Key", "en"]),
                        strings(&["a", "leaf"]),
                        strings(&["a.b", "nested"]),
                    ],
                ),
                ("ok", vec![strings(&["Key", "en"]), strings(&["x", "y"])]),
            ],
        );

        let report = run_reverse(&options(&dir), &mut FixedPrompter::default()).unwrap();
        assert_eq!(report.error_count(), 1);
        assert!(report.errors[0].exception.contains("conflicts"));
        assert_eq!(report.cnt_written, 1);
        assert!(dir.path().join("results/book.xlsx/en/ok.json").is_file());
        assert!(!dir.path().join("results/book.xlsx/en/nav.json").exists());
    }

    #[test]
    fn output_folder_is_recreated() {
        let dir = TempDir::new().unwrap();
        write_book(
            &dir.path().join("excels/book.xlsx"),
            &[("s", vec![strings(&["Key", "en"]), strings(&["k", "v"])])],
        );
        let path_stale = dir.path().join("results/book.xlsx/old/stale.json");
        fs::create_dir_all(path_stale.parent().unwrap()).unwrap();
        fs::write(&path_stale, "{}").unwrap();

        run_reverse(&options(&dir), &mut FixedPrompter::default()).unwrap();
        assert!(!path_stale.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("results/book.xlsx/en/s.json")).unwrap(),
            "{\n  \"k\": \"v\"\n}"
        );
    }

    #[test]
    fn unreadable_workbook_is_reported_and_next_file_processed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("excels")).unwrap();
        fs::write(dir.path().join("excels/a_broken.xlsx"), b"nope").unwrap();
        write_book(
            &dir.path().join("excels/b.XLSX"),
            &[("s", vec![strings(&["Key", "fr"]), strings(&["k", "v"])])],
        );
        fs::write(dir.path().join("excels/readme.txt"), b"x").unwrap();

        let report = run_reverse(&options(&dir), &mut FixedPrompter::default()).unwrap();
        assert_eq!(report.error_count(), 1);
        assert!(report.errors[0].path.ends_with("a_broken.xlsx"));
        assert!(dir.path().join("results/b.XLSX/fr/s.json").is_file());
        assert_eq!(report.cnt_skipped, 1);
    }

    #[test]
    fn configured_count_limits_languages_read() {
        let dir = TempDir::new().unwrap();
        write_book(
            &dir.path().join("excels/book.xlsx"),
            &[(
                "s",
                vec![strings(&["Key", "es", "en"]), strings(&["k", "uno", "one"])],
            )],
        );
        let mut opts = options(&dir);
        opts.n_languages = Some(1);

        run_reverse(&opts, &mut FixedPrompter::default()).unwrap();
        assert!(dir.path().join("results/book.xlsx/es/s.json").is_file());
        assert!(!dir.path().join("results/book.xlsx/en").exists());
    }

    #[test]
    fn unsafe_label_is_reported() {
        let dir = TempDir::new().unwrap();
        write_book(
            &dir.path().join("excels/book.xlsx"),
            &[("s", vec![strings(&["Key", "../x"]), strings(&["k", "v"])])],
        );

        let report = run_reverse(&options(&dir), &mut FixedPrompter::default()).unwrap();
        assert_eq!(report.error_count(), 1);
        assert!(!dir.path().join("results/x").exists());
    }
}

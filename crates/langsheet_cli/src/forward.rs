//! Forward run: language folders of JSON trees -> CSV per namespace + workbook.
//!
//! Stages:
//! 1. Resolve one label per language folder (sorted by folder name).
//! 2. Parse and flatten every `*.json` file of one language, serially or on a
//!    worker pool; merge the results into the per-namespace accumulators in
//!    file order.
//! 3. Emit one CSV per namespace and one worksheet per namespace.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use langsheet_io_fs::{
    ReportRun, ReportRunBuilder, SpecLanguageDir, SpecScanOptions, SpecSourceFile,
    calculate_worker_limit, derive_safe_child_path, ensure_dir, list_files_matching,
    list_language_dirs, map_tasks_in_pool, write_text_file,
};
use langsheet_io_xlsx::XlsxWriter;
use langsheet_tree::{
    SpecFlatEntry, SpecKeyPath, SpecWorkbook, TreeError, WorkbookBuilder, read_tree_file,
    render_table_csv,
};
use tracing::{debug, error, info, warn};

use crate::conf::{C_EXT_CSV, C_PATTERN_JSON, SpecForwardOptions};
use crate::prompt::Prompter;

/// Run the forward conversion.
///
/// Only a results folder that cannot be created fails the call; every other
/// failure is recorded in the returned report.
pub fn run_forward(
    options: &SpecForwardOptions,
    prompter: &mut dyn Prompter,
) -> Result<ReportRun> {
    ensure_dir(&options.dir_output).with_context(|| {
        format!(
            "cannot prepare results folder {}",
            options.dir_output.display()
        )
    })?;

    let mut builder_report = ReportRunBuilder::default();
    let l_languages = match list_language_dirs(&options.dir_input, &mut builder_report) {
        Ok(v) => v,
        Err(err) => {
            error!(path = %options.dir_input.display(), "{err}");
            builder_report.add_error(&options.dir_input, err.to_string());
            Vec::new()
        }
    };
    if l_languages.is_empty() {
        warn!(path = %options.dir_input.display(), "no language folders found");
    }

    let l_labels = resolve_labels(&l_languages, options, prompter, &mut builder_report);
    let workbook = collect_workbook(&l_languages, l_labels, options, &mut builder_report);

    write_csv_files(&workbook, &options.dir_output, &mut builder_report);
    write_workbook(&workbook, options, &mut builder_report);

    let report = builder_report.build();
    info!("{}", report.format("[FORWARD]"));
    Ok(report)
}

fn resolve_labels(
    l_languages: &[SpecLanguageDir],
    options: &SpecForwardOptions,
    prompter: &mut dyn Prompter,
    builder_report: &mut ReportRunBuilder,
) -> Vec<String> {
    let mut l_labels: Vec<String> = Vec::with_capacity(l_languages.len());
    for language in l_languages {
        let label = match options.dict_labels.get(&language.code) {
            Some(label) if !label.trim().is_empty() => label.trim().to_string(),
            _ => prompter.ask_label(&language.code),
        };
        if l_labels.contains(&label) {
            let msg = format!(
                "Label {label:?} of language {:?} is already used by another language.",
                language.code
            );
            warn!("{msg}");
            builder_report.add_warning(msg);
        }
        debug!(code = %language.code, %label, "language label resolved");
        l_labels.push(label);
    }
    l_labels
}

type FlatParse = Result<(Vec<SpecFlatEntry>, Vec<SpecKeyPath>), TreeError>;

/// Parse one file into flat entries plus empty-mapping paths; runs on worker threads.
fn parse_flat_entries(file: SpecSourceFile) -> (SpecSourceFile, FlatParse) {
    let res_entries =
        read_tree_file(&file.path_file).and_then(|tree| tree.flatten_with_empty_mappings());
    (file, res_entries)
}

fn collect_workbook(
    l_languages: &[SpecLanguageDir],
    l_labels: Vec<String>,
    options: &SpecForwardOptions,
    builder_report: &mut ReportRunBuilder,
) -> SpecWorkbook {
    let n_workers_max = calculate_worker_limit(options.num_workers_max);
    let options_scan = SpecScanOptions::with_pattern(C_PATTERN_JSON);
    let mut builder_workbook = WorkbookBuilder::new(l_labels);

    for (n_position, language) in l_languages.iter().enumerate() {
        info!(code = %language.code, "reading translations");
        let l_files = match list_files_matching(&language.path_dir, &options_scan, builder_report)
        {
            Ok(v) => v,
            Err(err) => {
                error!(path = %language.path_dir.display(), "{err}");
                builder_report.add_error(&language.path_dir, err.to_string());
                continue;
            }
        };

        // Registering up front keeps a namespace even when every file of it fails.
        for file in &l_files {
            builder_workbook.touch_namespace(&file.stem);
        }

        let l_results =
            map_tasks_in_pool(l_files, n_workers_max, parse_flat_entries, builder_report);
        for (file, res_entries) in l_results {
            let (l_entries, l_empty) = match res_entries {
                Ok(v) => v,
                Err(err) => {
                    error!(path = %file.path_file.display(), "{err}");
                    builder_report.add_error(&file.path_file, err.to_string());
                    continue;
                }
            };
            for key_path in &l_empty {
                let msg = format!(
                    "{}: empty mapping at {:?} has no entries and is not exported.",
                    file.path_file.display(),
                    key_path.encode()
                );
                warn!("{msg}");
                builder_report.add_warning(msg);
            }
            let n_entries = l_entries.len();
            match builder_workbook.add_entries(&file.stem, n_position, l_entries) {
                Ok(()) => {
                    builder_report.add_read();
                    info!(path = %file.path_file.display(), n_entries, "file read");
                }
                Err(err) => {
                    error!(path = %file.path_file.display(), "{err}");
                    builder_report.add_error(&file.path_file, err.to_string());
                }
            }
        }
    }

    builder_workbook.build()
}

fn write_csv_files(
    workbook: &SpecWorkbook,
    path_dir_output: &Path,
    builder_report: &mut ReportRunBuilder,
) {
    for (namespace, table) in workbook.iter() {
        let name_file = format!("{namespace}.{C_EXT_CSV}");
        let res_written = derive_safe_child_path(path_dir_output, &name_file)
            .and_then(|path_file| {
                write_text_file(&path_file, &render_table_csv(table), path_dir_output)
                    .map(|_| path_file)
            });
        match res_written {
            Ok(path_file) => {
                builder_report.add_written();
                info!(path = %path_file.display(), n_rows = table.rows.len(), "csv written");
            }
            Err(err) => {
                error!(%namespace, "{err}");
                builder_report.add_error(path_dir_output.join(namespace), err.to_string());
            }
        }
    }
}

fn write_workbook(
    workbook: &SpecWorkbook,
    options: &SpecForwardOptions,
    builder_report: &mut ReportRunBuilder,
) {
    if workbook.is_empty() {
        let msg = "No namespaces found; workbook not written.".to_string();
        warn!("{msg}");
        builder_report.add_warning(msg);
        return;
    }

    let path_file_workbook: PathBuf =
        match derive_safe_child_path(&options.dir_output, &options.name_workbook) {
            Ok(v) => v,
            Err(err) => {
                error!("{err}");
                builder_report.add_error(
                    options.dir_output.join(&options.name_workbook),
                    err.to_string(),
                );
                return;
            }
        };

    let mut writer = XlsxWriter::new(&path_file_workbook, options.xlsx_write_options.clone());
    for (namespace, table) in workbook.iter() {
        let l_rows: Vec<Vec<String>> = table.to_grid().into_iter().skip(1).collect();
        if let Err(err) = writer.write_sheet(namespace, &table.header, &l_rows) {
            error!(%namespace, "{err}");
            builder_report.add_error(&path_file_workbook, format!("sheet {namespace:?}: {err}"));
        }
    }
    for msg in writer.report().warnings {
        warn!("{msg}");
        builder_report.add_warning(msg);
    }

    if writer.n_sheets() == 0 {
        return;
    }
    match writer.close() {
        Ok(()) => builder_report.add_written(),
        Err(err) => {
            error!("{err}");
            builder_report.add_error(&path_file_workbook, err.to_string());
        }
    }
}

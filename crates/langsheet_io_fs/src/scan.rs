//! Input enumeration and output folder preparation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::report::ReportRunBuilder;
use crate::spec::{ScanError, SpecLanguageDir, SpecScanOptions, SpecSourceFile};
use crate::util::{compile_patterns, should_include_by_patterns, validate_destination_path_safety};

fn read_dir_sorted(path_dir: &Path) -> Result<Vec<(String, PathBuf)>, ScanError> {
    if !path_dir.is_dir() {
        return Err(ScanError::NotDirectory(path_dir.to_path_buf()));
    }
    let derive_err = |e: std::io::Error| ScanError::ReadDir {
        path: path_dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut l_entries = Vec::new();
    for entry in fs::read_dir(path_dir).map_err(derive_err)? {
        let entry = entry.map_err(derive_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        l_entries.push((name, entry.path()));
    }
    l_entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(l_entries)
}

/// List the language folders directly under `path_dir_root`, sorted by name.
///
/// Non-directory entries are ignored and counted as skipped.
pub fn list_language_dirs(
    path_dir_root: &Path,
    builder_report: &mut ReportRunBuilder,
) -> Result<Vec<SpecLanguageDir>, ScanError> {
    let mut l_dirs = Vec::new();
    for (name, path_entry) in read_dir_sorted(path_dir_root)? {
        if !path_entry.is_dir() {
            debug!(path = %path_entry.display(), "ignoring non-directory entry");
            builder_report.add_skipped();
            continue;
        }
        l_dirs.push(SpecLanguageDir {
            code: name,
            path_dir: path_entry,
        });
    }
    Ok(l_dirs)
}

/// List files directly under `path_dir` whose name passes `options`, sorted by name.
///
/// Every file seen counts as scanned; filtered-out files count as skipped.
pub fn list_files_matching(
    path_dir: &Path,
    options: &SpecScanOptions,
    builder_report: &mut ReportRunBuilder,
) -> Result<Vec<SpecSourceFile>, ScanError> {
    let glob_set = compile_patterns(
        options.patterns_include_files.as_deref(),
        options.if_case_insensitive,
    )?;

    let mut l_files = Vec::new();
    for (name, path_entry) in read_dir_sorted(path_dir)? {
        if !path_entry.is_file() {
            continue;
        }
        builder_report.add_scanned();
        if !should_include_by_patterns(&name, glob_set.as_ref()) {
            debug!(path = %path_entry.display(), "ignoring file not matching patterns");
            builder_report.add_skipped();
            continue;
        }
        let stem = path_entry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        l_files.push(SpecSourceFile {
            stem,
            name_file: name,
            path_file: path_entry,
        });
    }
    Ok(l_files)
}

/// Create `path_dir` (and parents) when missing. A symlinked root is rejected.
pub fn ensure_dir(path_dir: &Path) -> Result<(), ScanError> {
    let derive_err = |message: String| ScanError::DestinationInitFailed {
        path: path_dir.to_path_buf(),
        message,
    };
    fs::create_dir_all(path_dir).map_err(|e| derive_err(e.to_string()))?;
    let meta_dir = fs::symlink_metadata(path_dir).map_err(|e| derive_err(e.to_string()))?;
    if meta_dir.file_type().is_symlink() {
        return Err(derive_err(
            "Destination root path must not be a symbolic link.".to_string(),
        ));
    }
    Ok(())
}

/// Delete `path_dir` if present, then create it empty.
///
/// `path_dir` must live inside `path_dir_root`.
pub fn recreate_dir(path_dir: &Path, path_dir_root: &Path) -> Result<(), ScanError> {
    validate_destination_path_safety(path_dir, path_dir_root)?;
    match fs::symlink_metadata(path_dir) {
        Ok(meta_dir) if meta_dir.is_dir() => {
            fs::remove_dir_all(path_dir).map_err(|e| ScanError::DestinationInitFailed {
                path: path_dir.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        Ok(_) => {
            warn!(path = %path_dir.display(), "replacing non-directory entry with a folder");
            fs::remove_file(path_dir).map_err(|e| ScanError::DestinationInitFailed {
                path: path_dir.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        Err(_) => {}
    }
    ensure_dir(path_dir)
}

/// Write `txt` to `path_file` inside `path_dir_root`, creating parent folders.
pub fn write_text_file(path_file: &Path, txt: &str, path_dir_root: &Path) -> Result<(), ScanError> {
    validate_destination_path_safety(path_file, path_dir_root)?;
    let derive_err = |e: std::io::Error| ScanError::WriteFailed {
        path: path_file.to_path_buf(),
        message: e.to_string(),
    };
    if let Some(path_parent) = path_file.parent() {
        fs::create_dir_all(path_parent).map_err(derive_err)?;
    }
    fs::write(path_file, txt).map_err(derive_err)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write_text(path: &Path, txt: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, txt).unwrap();
    }

    #[test]
    fn list_language_dirs_sorted_and_skips_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("fr")).unwrap();
        fs::create_dir(dir.path().join("en")).unwrap();
        write_text(&dir.path().join("README.md"), "x");

        let mut builder = ReportRunBuilder::default();
        let l_dirs = list_language_dirs(dir.path(), &mut builder).unwrap();
        let l_codes: Vec<&str> = l_dirs.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(l_codes, vec!["en", "fr"]);
        assert_eq!(builder.cnt_skipped, 1);
    }

    #[test]
    fn list_language_dirs_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let mut builder = ReportRunBuilder::default();
        let err = list_language_dirs(&dir.path().join("nope"), &mut builder).unwrap_err();
        assert!(matches!(err, ScanError::NotDirectory(_)));
    }

    #[test]
    fn list_files_matching_filters_extension_case_insensitively() {
        let dir = TempDir::new().unwrap();
        write_text(&dir.path().join("b.json"), "{}");
        write_text(&dir.path().join("A.JSON"), "{}");
        write_text(&dir.path().join("notes.txt"), "x");
        fs::create_dir(dir.path().join("sub.json")).unwrap();

        let mut builder = ReportRunBuilder::default();
        let l_files =
            list_files_matching(dir.path(), &SpecScanOptions::with_pattern("*.json"), &mut builder)
                .unwrap();
        let l_stems: Vec<&str> = l_files.iter().map(|f| f.stem.as_str()).collect();
        assert_eq!(l_stems, vec!["A", "b"]);
        assert_eq!(builder.cnt_scanned, 3);
        assert_eq!(builder.cnt_skipped, 1);
    }

    #[test]
    fn recreate_dir_clears_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path_out = dir.path().join("book.xlsx");
        write_text(&path_out.join("en/old.json"), "{}");

        recreate_dir(&path_out, dir.path()).unwrap();
        assert!(path_out.is_dir());
        assert_eq!(fs::read_dir(&path_out).unwrap().count(), 0);
    }

    #[test]
    fn recreate_dir_refuses_path_outside_root() {
        let dir = TempDir::new().unwrap();
        let dir_other = TempDir::new().unwrap();
        let err = recreate_dir(dir_other.path(), dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::UnsafeDestination { .. }));
        assert!(dir_other.path().is_dir());
    }

    #[test]
    fn write_text_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path_file = dir.path().join("es/common.json");
        write_text_file(&path_file, "{}", dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path_file).unwrap(), "{}");
    }
}

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::report::ReportRunBuilder;
use crate::spec::ScanError;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

/// Compile include patterns into one matcher; `None`/empty keeps everything.
pub(crate) fn compile_patterns(
    patterns: Option<&[String]>,
    if_case_insensitive: bool,
) -> Result<Option<GlobSet>, ScanError> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder_glob_set = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(if_case_insensitive)
            .build()
            .map_err(|e| ScanError::InvalidPattern(e.to_string()))?;
        builder_glob_set.add(glob);
    }
    builder_glob_set
        .build()
        .map(Some)
        .map_err(|e| ScanError::InvalidPattern(e.to_string()))
}

pub(crate) fn should_include_by_patterns(value: &str, patterns: Option<&GlobSet>) -> bool {
    match patterns {
        None => true,
        Some(glob_set) => glob_set.is_match(value),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Join `name` onto `path_dir_root` as exactly one new path component.
///
/// Names that are empty, contain a separator, or are `.`/`..` are rejected so
/// that labels and sheet names read from user files cannot escape the root.
pub fn derive_safe_child_path(path_dir_root: &Path, name: &str) -> Result<PathBuf, ScanError> {
    let l_components: Vec<Component<'_>> = Path::new(name).components().collect();
    let if_single_normal = matches!(l_components.as_slice(), [Component::Normal(part)] if *part == name);
    if !if_single_normal {
        return Err(ScanError::UnsafeDestination {
            path: path_dir_root.join(name),
            message: format!("{name:?} is not a plain file or folder name"),
        });
    }
    Ok(path_dir_root.join(name))
}

/// Reject destinations outside `path_dir_dst_root` or reached through a symlink.
pub(crate) fn validate_destination_path_safety(
    path_dst_item: &Path,
    path_dir_dst_root: &Path,
) -> Result<(), ScanError> {
    let derive_err = |message: String| ScanError::UnsafeDestination {
        path: path_dst_item.to_path_buf(),
        message,
    };
    let path_dir_dst_root_abs = _absolutize_path(path_dir_dst_root);
    let path_dst_item_abs = _absolutize_path(path_dst_item);

    let path_rel = path_dst_item_abs
        .strip_prefix(&path_dir_dst_root_abs)
        .map_err(|_| {
            derive_err(format!(
                "escapes destination root {}",
                path_dir_dst_root.display()
            ))
        })?;
    if path_rel
        .components()
        .any(|part| !matches!(part, Component::Normal(_)))
    {
        return Err(derive_err("contains a relative component".to_string()));
    }

    let mut path_cursor = path_dir_dst_root_abs.clone();
    for part_rel in path_rel.components() {
        path_cursor.push(part_rel.as_os_str());
        match fs::symlink_metadata(&path_cursor) {
            Ok(meta_cursor) => {
                if meta_cursor.file_type().is_symlink() {
                    return Err(derive_err(format!(
                        "traverses symlink component {}",
                        path_cursor.display()
                    )));
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(derive_err(format!(
                    "failed to inspect component {} ({e})",
                    path_cursor.display()
                )));
            }
        }
    }

    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Workers

/// Resolve the worker count; `None` picks the CPU count capped at 8.
pub fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, 8),
    }
}

/// Apply `func` to every task, serially or on a rayon pool of `n_workers_max`.
///
/// Results keep task order. A pool that fails to start falls back to serial
/// execution with a warning on `builder_report`.
pub fn map_tasks_in_pool<T, R, F>(
    l_tasks: Vec<T>,
    n_workers_max: usize,
    func: F,
    builder_report: &mut ReportRunBuilder,
) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    if n_workers_max <= 1 || l_tasks.len() <= 1 {
        return l_tasks.into_iter().map(func).collect();
    }

    let thread_pool = ThreadPoolBuilder::new().num_threads(n_workers_max).build();
    let Ok(thread_pool) = thread_pool else {
        builder_report.add_warning(format!(
            "Failed to initialize thread pool (workers={n_workers_max}); fallback to serial run."
        ));
        return l_tasks.into_iter().map(func).collect();
    };

    thread_pool.install(|| l_tasks.into_par_iter().map(&func).collect())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_compile_patterns_ignores_case() {
        let glob_set = compile_patterns(Some(&["*.json".to_string()]), true)
            .unwrap()
            .unwrap();
        assert!(should_include_by_patterns("common.JSON", Some(&glob_set)));
        assert!(!should_include_by_patterns("notes.txt", Some(&glob_set)));
        assert!(should_include_by_patterns("anything", None));
    }

    #[test]
    fn test_compile_patterns_rejects_invalid_glob() {
        let err = compile_patterns(Some(&["[".to_string()]), true).unwrap_err();
        assert!(matches!(err, ScanError::InvalidPattern(_)));
    }

    #[test]
    fn test_derive_safe_child_path_rejects_traversal() {
        let path_root = Path::new("/out");
        assert_eq!(
            derive_safe_child_path(path_root, "es").unwrap(),
            PathBuf::from("/out/es")
        );
        for name in ["", ".", "..", "en/US", "/etc"] {
            assert!(
                derive_safe_child_path(path_root, name).is_err(),
                "{name:?} should be rejected"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_destination_blocks_symlink_component() {
        let dir = TempDir::new().unwrap();
        let dir_outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir_outside.path(), dir.path().join("link")).unwrap();

        let err =
            validate_destination_path_safety(&dir.path().join("link/x.json"), dir.path())
                .unwrap_err();
        assert!(err.to_string().contains("symlink"));
        assert!(validate_destination_path_safety(&dir.path().join("ok/x.json"), dir.path()).is_ok());
    }

    #[test]
    fn test_map_tasks_in_pool_keeps_order() {
        let mut builder = ReportRunBuilder::default();
        let l_tasks: Vec<u32> = (0..64).collect();
        let l_out = map_tasks_in_pool(l_tasks.clone(), 4, |n| n * 2, &mut builder);
        assert_eq!(l_out, l_tasks.iter().map(|n| n * 2).collect::<Vec<_>>());
        assert_eq!(calculate_worker_limit(Some(0)), 1);
    }
}

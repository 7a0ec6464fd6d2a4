//! Run report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::SpecRunError;

/// Aggregate counters and diagnostics for one conversion run.
#[derive(Debug, Default, Clone)]
pub struct ReportRun {
    /// Total candidate inputs seen (files, sheets).
    pub cnt_scanned: u64,
    /// Inputs parsed successfully.
    pub cnt_read: u64,
    /// Output files written successfully.
    pub cnt_written: u64,
    /// Inputs ignored by filter or skipped after a warning.
    pub cnt_skipped: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
    /// Per-unit failures.
    pub errors: Vec<SpecRunError>,
}

impl ReportRun {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_read".to_string(), self.cnt_read);
        dict_counts.insert("cnt_written".to_string(), self.cnt_written);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} read={} written={} skipped={} errors={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_read"],
            dict_counts["cnt_written"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[RUN]"))
    }
}

/// Mutable accumulator for run statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportRunBuilder {
    /// See [`ReportRun::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportRun::cnt_read`].
    pub cnt_read: u64,
    /// See [`ReportRun::cnt_written`].
    pub cnt_written: u64,
    /// See [`ReportRun::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportRun::errors`].
    pub errors: Vec<SpecRunError>,
    /// See [`ReportRun::warnings`].
    pub warnings: Vec<String>,
}

impl ReportRunBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub fn add_read(&mut self) {
        self.cnt_read += 1;
    }

    pub fn add_written(&mut self) {
        self.cnt_written += 1;
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, path: impl Into<PathBuf>, exception: impl Into<String>) {
        self.errors.push(SpecRunError {
            path: path.into(),
            exception: exception.into(),
        });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportRun {
        ReportRun {
            cnt_scanned: self.cnt_scanned,
            cnt_read: self.cnt_read,
            cnt_written: self.cnt_written,
            cnt_skipped: self.cnt_skipped,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

//! Per-namespace accumulator, table build and sheet row parsing.
//!
//! Forward: every language's flat entries are merged into one
//! [`Accumulator`] per namespace, indexed by the language position fixed at
//! the start of the run. Reverse: [`parse_sheet_rows`] splits a sheet grid
//! into one key-path map per language column.

use indexmap::IndexMap;
use tracing::debug;

use crate::conf::C_HEADER_KEY;
use crate::keypath::SpecKeyPath;
use crate::spec::TreeError;
use crate::tree::{SpecFlatEntry, SpecTranslationTree};

////////////////////////////////////////////////////////////////////////////////
// #region TableModel

/// One table row: key path plus one value per language position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTableRow {
    /// Row key.
    pub key_path: SpecKeyPath,
    /// Values aligned with the header's language columns.
    pub values: Vec<String>,
}

/// Ordered rows of one namespace with a fixed header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecTable {
    /// `["Key", label_0, label_1, ...]`.
    pub header: Vec<String>,
    /// Rows in discovery order.
    pub rows: Vec<SpecTableRow>,
}

impl SpecTable {
    /// Header + rows as plain strings (key path encoded).
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut l_grid = Vec::with_capacity(self.rows.len() + 1);
        l_grid.push(self.header.clone());
        for row in &self.rows {
            let mut l_cells = Vec::with_capacity(row.values.len() + 1);
            l_cells.push(row.key_path.encode());
            l_cells.extend(row.values.iter().cloned());
            l_grid.push(l_cells);
        }
        l_grid
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Accumulator

/// Key path -> per-language value slots for one namespace.
///
/// Row order is first-seen order across all merges. Slots never written stay
/// unset and are rendered as empty strings by [`Accumulator::build_table`].
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    n_languages: usize,
    dict_rows: IndexMap<SpecKeyPath, Vec<Option<String>>>,
}

impl Accumulator {
    pub fn new(n_languages: usize) -> Self {
        Self {
            n_languages,
            dict_rows: IndexMap::new(),
        }
    }

    /// Write one value (trimmed) into the slot of `position`.
    pub fn set_value(
        &mut self,
        key_path: SpecKeyPath,
        position: usize,
        value: &str,
    ) -> Result<(), TreeError> {
        if position >= self.n_languages {
            return Err(TreeError::LanguagePositionOutOfRange {
                position,
                n_languages: self.n_languages,
            });
        }
        let n_languages = self.n_languages;
        let l_slots = self
            .dict_rows
            .entry(key_path)
            .or_insert_with(|| vec![None; n_languages]);
        l_slots[position] = Some(value.trim().to_string());
        Ok(())
    }

    /// Merge all entries of one language's tree.
    pub fn merge_entries(
        &mut self,
        entries: Vec<SpecFlatEntry>,
        position: usize,
    ) -> Result<(), TreeError> {
        if position >= self.n_languages {
            return Err(TreeError::LanguagePositionOutOfRange {
                position,
                n_languages: self.n_languages,
            });
        }
        for entry in entries {
            self.set_value(entry.key_path, position, &entry.value)?;
        }
        Ok(())
    }

    /// Build the table with header `["Key", ...labels]`.
    ///
    /// `labels` must have one entry per language position.
    pub fn build_table(&self, labels: &[String]) -> SpecTable {
        debug_assert_eq!(labels.len(), self.n_languages);

        let mut header = Vec::with_capacity(labels.len() + 1);
        header.push(C_HEADER_KEY.to_string());
        header.extend(labels.iter().cloned());

        let rows = self
            .dict_rows
            .iter()
            .map(|(key_path, l_slots)| SpecTableRow {
                key_path: key_path.clone(),
                values: l_slots
                    .iter()
                    .map(|slot| slot.clone().unwrap_or_default())
                    .collect(),
            })
            .collect();

        SpecTable { header, rows }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkbookBuilder

/// All namespace tables of one forward run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecWorkbook {
    /// Namespace name -> table, in first-seen order.
    pub dict_tables: IndexMap<String, SpecTable>,
}

impl SpecWorkbook {
    pub fn is_empty(&self) -> bool {
        self.dict_tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpecTable)> {
        self.dict_tables.iter()
    }
}

/// Owns one accumulator per namespace for the duration of a forward run.
#[derive(Debug, Clone)]
pub struct WorkbookBuilder {
    l_labels: Vec<String>,
    dict_accumulators: IndexMap<String, Accumulator>,
}

impl WorkbookBuilder {
    /// `labels` fixes the language positions for the whole run.
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            l_labels: labels,
            dict_accumulators: IndexMap::new(),
        }
    }

    /// Register a namespace so it gets a table even when nothing merges into it.
    pub fn touch_namespace(&mut self, namespace: &str) {
        let n_languages = self.l_labels.len();
        self.dict_accumulators
            .entry(namespace.to_string())
            .or_insert_with(|| Accumulator::new(n_languages));
    }

    /// Merge one language's flat entries into `namespace`.
    pub fn add_entries(
        &mut self,
        namespace: &str,
        position: usize,
        entries: Vec<SpecFlatEntry>,
    ) -> Result<(), TreeError> {
        self.touch_namespace(namespace);
        let n_entries = entries.len();
        if let Some(accumulator) = self.dict_accumulators.get_mut(namespace) {
            accumulator.merge_entries(entries, position)?;
        }
        debug!(namespace, position, n_entries, "merged flat entries");
        Ok(())
    }

    /// Build one table per namespace.
    pub fn build(&self) -> SpecWorkbook {
        SpecWorkbook {
            dict_tables: self
                .dict_accumulators
                .iter()
                .map(|(namespace, accumulator)| {
                    (namespace.clone(), accumulator.build_table(&self.l_labels))
                })
                .collect(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetRowParsing

/// One sheet split into per-language key-path maps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecParsedSheet {
    /// Language labels in column order.
    pub languages: Vec<String>,
    /// Entries per language, aligned with `languages`, in row order.
    pub entries_by_language: Vec<IndexMap<SpecKeyPath, String>>,
    /// Rows/columns skipped and other non-fatal findings.
    pub warnings: Vec<String>,
}

impl SpecParsedSheet {
    /// Unflatten the entries of language `position` into a tree.
    pub fn build_tree(&self, position: usize) -> Result<SpecTranslationTree, TreeError> {
        let Some(dict_entries) = self.entries_by_language.get(position) else {
            return Err(TreeError::LanguagePositionOutOfRange {
                position,
                n_languages: self.entries_by_language.len(),
            });
        };
        SpecTranslationTree::unflatten(
            dict_entries
                .iter()
                .map(|(key_path, value)| (key_path.clone(), value.clone())),
        )
    }
}

/// Number of language columns the header actually populates.
///
/// This is the position of the last non-empty header cell after column 1.
pub fn derive_populated_language_count(header: &[String]) -> usize {
    header
        .iter()
        .skip(1)
        .rposition(|cell| !cell.trim().is_empty())
        .map_or(0, |n_idx| n_idx + 1)
}

/// Split a sheet grid into per-language entries.
///
/// Row 0 is the header: column 0 is ignored, columns `1..=n` carry language
/// labels. `n_languages` of `None`/`Some(0)` means "use every populated
/// header column"; a larger count than the header supports is clamped with a
/// warning. Header columns with an empty label are skipped. Rows with an
/// empty key cell are skipped for every language; any other key cell is
/// decoded as written, whitespace included; rows whose key does not decode
/// are skipped with a warning. Missing cells read as empty strings.
pub fn parse_sheet_rows(grid: &[Vec<String>], n_languages: Option<usize>) -> SpecParsedSheet {
    let mut sheet = SpecParsedSheet::default();
    let Some((header, l_rows)) = grid.split_first() else {
        return sheet;
    };

    let n_detected = derive_populated_language_count(header);
    let n_used = match n_languages {
        None | Some(0) => n_detected,
        Some(n) if n > n_detected => {
            sheet.warnings.push(format!(
                "Language count {n} exceeds populated header columns ({n_detected}); using {n_detected}."
            ));
            n_detected
        }
        Some(n) => n,
    };

    let mut l_cols_language: Vec<usize> = Vec::with_capacity(n_used);
    for n_col in 1..=n_used {
        let c_label = header.get(n_col).map(|c| c.trim()).unwrap_or_default();
        if c_label.is_empty() {
            sheet
                .warnings
                .push(format!("Header column {} has no language label; skipped.", n_col + 1));
            continue;
        }
        if sheet.languages.iter().any(|c| c == c_label) {
            sheet.warnings.push(format!(
                "Duplicate language label {c_label:?} in column {}; skipped.",
                n_col + 1
            ));
            continue;
        }
        sheet.languages.push(c_label.to_string());
        l_cols_language.push(n_col);
    }
    sheet.entries_by_language = vec![IndexMap::new(); sheet.languages.len()];

    for (n_idx_row, row) in l_rows.iter().enumerate() {
        let n_row_excel = n_idx_row + 2;
        let c_key = row.first().map(String::as_str).unwrap_or_default();
        if c_key.is_empty() {
            continue;
        }
        let key_path = match SpecKeyPath::decode(c_key) {
            Ok(v) => v,
            Err(err) => {
                sheet
                    .warnings
                    .push(format!("Row {n_row_excel} skipped: {err}"));
                continue;
            }
        };

        for (n_position, n_col) in l_cols_language.iter().enumerate() {
            let value = row.get(*n_col).cloned().unwrap_or_default();
            let dict_entries = &mut sheet.entries_by_language[n_position];
            if dict_entries.insert(key_path.clone(), value).is_some() && n_position == 0 {
                sheet.warnings.push(format!(
                    "Row {n_row_excel} repeats key {c_key:?}; later row wins."
                ));
            }
        }
    }

    sheet
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

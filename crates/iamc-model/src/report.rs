use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Dataset;

/// Severity of a vetting criterion or finding.
///
/// Severity is descriptive metadata for presentation; it never changes how a
/// check is evaluated. `Error` implies exclusion-worthy, `Warning` advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The checks a validation run can perform, one annotation column each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Model,
    Region,
    Variable,
    Unit,
    VariableUnit,
    Duplicates,
    Vetting,
    Aggregation,
}

impl CheckKind {
    /// Column header used when exporting the annotated dataset.
    pub fn column_name(self) -> &'static str {
        match self {
            CheckKind::Model => "model_check",
            CheckKind::Region => "region_check",
            CheckKind::Variable => "variable_check",
            CheckKind::Unit => "unit_check",
            CheckKind::VariableUnit => "variable_unit_check",
            CheckKind::Duplicates => "duplicates_check",
            CheckKind::Vetting => "vetting_check",
            CheckKind::Aggregation => "basic_sum_check",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// One per-record annotation column produced by a single check.
///
/// Cells are keyed by record index within the dataset; an absent cell means
/// the record passed (or was not assessed). Each check owns its column and
/// never writes into another check's column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationColumn {
    pub check: CheckKind,
    pub cells: BTreeMap<usize, String>,
}

impl AnnotationColumn {
    pub fn new(check: CheckKind) -> Self {
        Self {
            check,
            cells: BTreeMap::new(),
        }
    }

    /// Write a message for a record, replacing any earlier message in this
    /// column ("most recent evaluated wins" within one check).
    pub fn set(&mut self, row: usize, message: impl Into<String>) {
        self.cells.insert(row, message.into());
    }

    /// Append a message to a record's cell, keeping earlier messages.
    pub fn append(&mut self, row: usize, message: &str) {
        let cell = self.cells.entry(row).or_default();
        if !cell.is_empty() {
            cell.push('\n');
        }
        cell.push_str(message);
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.cells.get(&row).map(String::as_str)
    }

    /// Number of records carrying a non-empty message.
    pub fn finding_count(&self) -> usize {
        self.cells.values().filter(|cell| !cell.is_empty()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.finding_count() == 0
    }
}

/// Aggregate counts over a finished validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub invalid_models: usize,
    pub invalid_regions: usize,
    pub invalid_variables: usize,
    pub invalid_units: usize,
    pub invalid_variable_units: usize,
    pub duplicate_records: usize,
    pub vetting_errors: usize,
    pub vetting_warnings: usize,
    pub aggregation_mismatches: usize,
}

impl ValidationSummary {
    pub fn total_findings(&self) -> usize {
        self.invalid_models
            + self.invalid_regions
            + self.invalid_variables
            + self.invalid_units
            + self.invalid_variable_units
            + self.duplicate_records
            + self.vetting_errors
            + self.vetting_warnings
            + self.aggregation_mismatches
    }

    pub fn has_findings(&self) -> bool {
        self.total_findings() > 0
    }
}

/// The result of one validation run: the dataset plus one annotation column
/// per executed check and the summary counts.
///
/// Created fresh per run and immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub dataset: Dataset,
    pub columns: Vec<AnnotationColumn>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn column(&self, check: CheckKind) -> Option<&AnnotationColumn> {
        self.columns.iter().find(|column| column.check == check)
    }

    /// Messages attached to a record across all columns, in column order.
    pub fn messages_for(&self, row: usize) -> Vec<(CheckKind, &str)> {
        self.columns
            .iter()
            .filter_map(|column| column.get(row).map(|message| (column.check, message)))
            .filter(|(_, message)| !message.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_append_accumulates() {
        let mut column = AnnotationColumn::new(CheckKind::Vetting);
        column.set(0, "first");
        column.set(0, "second");
        assert_eq!(column.get(0), Some("second"));

        let mut sums = AnnotationColumn::new(CheckKind::Aggregation);
        sums.append(3, "mismatch in year 2020");
        sums.append(3, "mismatch in year 2030");
        assert_eq!(sums.get(3), Some("mismatch in year 2020\nmismatch in year 2030"));
        assert_eq!(sums.finding_count(), 1);
    }

    #[test]
    fn summary_counts_total() {
        let summary = ValidationSummary {
            invalid_models: 1,
            duplicate_records: 2,
            vetting_warnings: 3,
            ..ValidationSummary::default()
        };
        assert_eq!(summary.total_findings(), 6);
        assert!(summary.has_findings());
    }
}

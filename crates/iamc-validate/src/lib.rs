//! Validation and vetting engine for IAMC scenario results.
//!
//! One validation run is a stateless, single-shot computation: it takes an
//! immutable dataset plus read-only catalog and criteria snapshots, runs the
//! caller-selected checks, and returns a fresh [`ValidationReport`]. Checks
//! only read the dataset and write to disjoint annotation columns; no
//! exception escapes the engine for a row-level condition.

mod aggregation;
mod duplicates;
mod hierarchy;
mod names;
mod vetting;

pub use aggregation::{SUM_TOLERANCE, check_aggregation};
pub use duplicates::{DUPLICATE_MESSAGE, check_duplicates};
pub use hierarchy::VariableHierarchy;
pub use names::{BlankPolicy, check_names};
pub use vetting::{VettingOutcome, check_vetting};

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug_span, info};

use iamc_model::{
    AnnotationColumn, CheckKind, Dataset, IamcError, ValidationReport, ValidationSummary,
};
use iamc_standards::{NomenclatureCatalog, VettingCriterion};

/// Which checks a validation run performs.
///
/// The default mirrors the reference tool: name and duplicate checks plus
/// vetting on, aggregation consistency opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSelection {
    pub names: bool,
    pub duplicates: bool,
    pub vetting: bool,
    pub aggregation: bool,
}

impl Default for CheckSelection {
    fn default() -> Self {
        Self {
            names: true,
            duplicates: true,
            vetting: true,
            aggregation: false,
        }
    }
}

impl CheckSelection {
    pub fn all() -> Self {
        Self {
            names: true,
            duplicates: true,
            vetting: true,
            aggregation: true,
        }
    }

    pub fn any(&self) -> bool {
        self.names || self.duplicates || self.vetting || self.aggregation
    }
}

/// Read-only inputs for one validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext<'a> {
    pub catalog: Option<&'a NomenclatureCatalog>,
    pub criteria: &'a [VettingCriterion],
    pub blank_policy: BlankPolicy,
}

impl<'a> ValidationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: &'a NomenclatureCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn with_criteria(mut self, criteria: &'a [VettingCriterion]) -> Self {
        self.criteria = criteria;
        self
    }

    #[must_use]
    pub fn with_blank_policy(mut self, policy: BlankPolicy) -> Self {
        self.blank_policy = policy;
        self
    }
}

/// Run the selected checks over the dataset and assemble the report.
///
/// # Errors
///
/// Fails only on dataset-level structural problems: an empty year set, or a
/// selection that requires inputs the context does not carry. Row-level
/// findings always come back inside the report.
pub fn run_validation(
    dataset: &Dataset,
    ctx: &ValidationContext,
    selection: CheckSelection,
) -> iamc_model::Result<ValidationReport> {
    if dataset.years.is_empty() {
        return Err(IamcError::EmptyYearSet);
    }
    let name_catalog = if selection.names {
        Some(ctx.catalog.ok_or_else(|| {
            IamcError::Message("name checks require a nomenclature catalog".to_string())
        })?)
    } else {
        None
    };

    let mut columns: Vec<AnnotationColumn> = Vec::new();
    let mut summary = ValidationSummary::default();

    if let Some(catalog) = name_catalog {
        let span = debug_span!("names");
        let _guard = span.enter();
        let name_columns = check_names(dataset, catalog, ctx.blank_policy);
        for column in &name_columns {
            match column.check {
                CheckKind::Model => summary.invalid_models = column.finding_count(),
                CheckKind::Region => summary.invalid_regions = column.finding_count(),
                CheckKind::Variable => summary.invalid_variables = column.finding_count(),
                CheckKind::Unit => summary.invalid_units = column.finding_count(),
                CheckKind::VariableUnit => {
                    summary.invalid_variable_units = column.finding_count();
                }
                _ => {}
            }
        }
        columns.extend(name_columns);
    }

    if selection.duplicates {
        let span = debug_span!("duplicates");
        let _guard = span.enter();
        let column = check_duplicates(dataset);
        summary.duplicate_records = column.finding_count();
        columns.push(column);
    }

    if selection.vetting {
        let span = debug_span!("vetting");
        let _guard = span.enter();
        let outcome = check_vetting(dataset, ctx.criteria);
        summary.vetting_errors = outcome.error_count();
        summary.vetting_warnings = outcome.warning_count();
        columns.push(outcome.column);
    }

    if selection.aggregation {
        let span = debug_span!("aggregation");
        let _guard = span.enter();
        let hierarchy = VariableHierarchy::build(&dataset.variable_names());
        let column = check_aggregation(dataset, &hierarchy);
        summary.aggregation_mismatches = column.finding_count();
        columns.push(column);
    }

    info!(
        records = dataset.len(),
        findings = summary.total_findings(),
        "validation run complete"
    );

    Ok(ValidationReport {
        dataset: dataset.clone(),
        columns,
        summary,
    })
}

// ---------------------------------------------------------------------------
// JSON report payload
// ---------------------------------------------------------------------------

const REPORT_SCHEMA: &str = "iamc-validator.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ValidationReportPayload {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub record_count: usize,
    pub summary: ValidationSummary,
    pub findings: Vec<FindingJson>,
}

#[derive(Debug, Serialize)]
pub struct FindingJson {
    pub check: CheckKind,
    pub row: usize,
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
    pub message: String,
}

pub fn build_report_payload(report: &ValidationReport) -> ValidationReportPayload {
    let mut findings = Vec::new();
    for column in &report.columns {
        for (&row, message) in &column.cells {
            if message.is_empty() {
                continue;
            }
            let record = &report.dataset.records[row];
            findings.push(FindingJson {
                check: column.check,
                row,
                model: record.model.clone(),
                scenario: record.scenario.clone(),
                region: record.region.clone(),
                variable: record.variable.clone(),
                message: message.clone(),
            });
        }
    }
    ValidationReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        record_count: report.dataset.len(),
        summary: report.summary,
        findings,
    }
}

/// Write the machine-readable report next to the other run outputs.
pub fn write_validation_report_json(
    output_dir: &Path,
    report: &ValidationReport,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("validation_report.json");
    let payload = build_report_payload(report);
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(&output_path, format!("{json}\n"))?;
    Ok(output_path)
}

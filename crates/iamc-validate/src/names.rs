//! Name-consistency checking against the nomenclature catalog.
//!
//! Every record gets five verdicts: model, region, variable, and unit
//! membership, plus the (variable, unit) combination. The catalog is
//! read-only; each verdict lands in its own annotation column.

use iamc_model::{AnnotationColumn, CheckKind, Dataset};
use iamc_standards::NomenclatureCatalog;

/// How blank identity fields are handled during name checking.
///
/// The reference behavior skips blank cells so they are never compared
/// against the empty string; `Flag` reports them in the same column instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlankPolicy {
    #[default]
    Skip,
    Flag,
}

/// Check every record's names against the catalog.
///
/// Returns the five verdict columns in a fixed order: model, region,
/// variable, unit, variable-unit combination.
pub fn check_names(
    dataset: &Dataset,
    catalog: &NomenclatureCatalog,
    blank_policy: BlankPolicy,
) -> Vec<AnnotationColumn> {
    let mut model = AnnotationColumn::new(CheckKind::Model);
    let mut region = AnnotationColumn::new(CheckKind::Region);
    let mut variable = AnnotationColumn::new(CheckKind::Variable);
    let mut unit = AnnotationColumn::new(CheckKind::Unit);
    let mut pair = AnnotationColumn::new(CheckKind::VariableUnit);

    for (row, record) in dataset.records.iter().enumerate() {
        check_dimension(
            &mut model,
            row,
            "Model",
            &record.model,
            blank_policy,
            |name| catalog.is_valid_model(name),
        );
        check_dimension(
            &mut region,
            row,
            "Region",
            &record.region,
            blank_policy,
            |name| catalog.is_valid_region(name),
        );
        check_dimension(
            &mut variable,
            row,
            "Variable",
            &record.variable,
            blank_policy,
            |name| catalog.is_valid_variable(name),
        );
        check_dimension(&mut unit, row, "Unit", &record.unit, blank_policy, |name| {
            catalog.is_valid_unit(name)
        });

        // The pair verdict only applies when both names are present.
        if !record.variable.is_empty()
            && !record.unit.is_empty()
            && !catalog.is_valid_variable_unit(&record.variable, &record.unit)
        {
            pair.set(
                row,
                format!(
                    "Variable {} combined with unit {} not found!",
                    record.variable, record.unit
                ),
            );
        }
    }

    vec![model, region, variable, unit, pair]
}

fn check_dimension<F>(
    column: &mut AnnotationColumn,
    row: usize,
    dimension: &str,
    name: &str,
    blank_policy: BlankPolicy,
    is_valid: F,
) where
    F: Fn(&str) -> bool,
{
    if name.is_empty() {
        if blank_policy == BlankPolicy::Flag {
            column.set(row, format!("{dimension} name is blank!"));
        }
        return;
    }
    if !is_valid(name) {
        column.set(row, format!("{dimension} {name} not found!"));
    }
}

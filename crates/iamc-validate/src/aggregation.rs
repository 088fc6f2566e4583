//! Aggregation-consistency checking.
//!
//! For every aggregate variable, the reported value is compared against the
//! sum of its present children per (model, scenario, region, year) using the
//! symmetric percent difference `|a - s| / ((a + s) / 2)` with a fixed 2%
//! tolerance.

use std::collections::BTreeMap;

use tracing::debug;

use iamc_model::{AnnotationColumn, CheckKind, Dataset, Year};

use crate::hierarchy::VariableHierarchy;

/// Accepted relative difference between an aggregate and its child sum.
pub const SUM_TOLERANCE: f64 = 0.02;

type GroupKey = (String, String, String);

/// Compare every aggregate against the sum of its present children.
///
/// Children with no value for a year are excluded from the sum, not treated
/// as zero; a year where no child reports at all is not assessed. A year the
/// aggregate itself does not report is skipped. When both the aggregate and
/// the child sum are exactly zero the year passes (the symmetric percent
/// difference is undefined there and treated as agreement). Failing years
/// for the same (model, scenario, region, aggregate) accumulate into one
/// message per record.
pub fn check_aggregation(dataset: &Dataset, hierarchy: &VariableHierarchy) -> AnnotationColumn {
    let mut column = AnnotationColumn::new(CheckKind::Aggregation);

    for (aggregate, children) in hierarchy.aggregates() {
        // Child sums per (model, scenario, region) and year, skipping
        // missing cells.
        let mut sums: BTreeMap<GroupKey, BTreeMap<Year, f64>> = BTreeMap::new();
        for record in &dataset.records {
            if !children.contains(&record.variable) {
                continue;
            }
            let group = sums
                .entry((
                    record.model.clone(),
                    record.scenario.clone(),
                    record.region.clone(),
                ))
                .or_default();
            for (&year, &cell) in &record.values {
                if let Some(value) = cell {
                    *group.entry(year).or_insert(0.0) += value;
                }
            }
        }

        for (row, record) in dataset.records.iter().enumerate() {
            if record.variable != aggregate {
                continue;
            }
            let key = (
                record.model.clone(),
                record.scenario.clone(),
                record.region.clone(),
            );
            let Some(group) = sums.get(&key) else {
                continue;
            };
            for (&year, &sum) in group {
                let Some(reported) = record.value(year) else {
                    continue;
                };
                if exceeds_tolerance(reported, sum) {
                    column.append(row, &format!("Basic sum check error on year {year}."));
                }
            }
        }
    }

    debug!(mismatches = column.finding_count(), "aggregation consistency check done");
    column
}

fn exceeds_tolerance(aggregate: f64, sum: f64) -> bool {
    if aggregate == 0.0 && sum == 0.0 {
        return false;
    }
    let diff = (aggregate - sum).abs() / ((aggregate + sum) / 2.0);
    diff > SUM_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use iamc_model::Record;

    fn dataset(aggregate_value: f64) -> Dataset {
        Dataset::new(vec![
            Record::new("M", "S", "World", "Primary Energy", "EJ/yr")
                .with_value(2020, aggregate_value),
            Record::new("M", "S", "World", "Primary Energy|Coal", "EJ/yr").with_value(2020, 350.0),
            Record::new("M", "S", "World", "Primary Energy|Oil", "EJ/yr").with_value(2020, 250.0),
        ])
    }

    fn hierarchy(dataset: &Dataset) -> VariableHierarchy {
        VariableHierarchy::build(&dataset.variable_names())
    }

    #[test]
    fn small_difference_within_tolerance_passes() {
        // |590 - 600| / 595 = 1.68% < 2%
        let data = dataset(590.0);
        let column = check_aggregation(&data, &hierarchy(&data));
        assert!(column.is_clean());
    }

    #[test]
    fn large_difference_is_flagged_on_the_aggregate_record() {
        // |500 - 600| / 550 = 18.2% > 2%
        let data = dataset(500.0);
        let column = check_aggregation(&data, &hierarchy(&data));
        assert_eq!(column.get(0), Some("Basic sum check error on year 2020."));
        assert!(column.get(1).is_none());
        assert!(column.get(2).is_none());
    }

    #[test]
    fn exact_match_reports_nothing() {
        let data = dataset(600.0);
        assert!(check_aggregation(&data, &hierarchy(&data)).is_clean());
    }

    #[test]
    fn missing_aggregate_year_is_skipped() {
        let data = Dataset::new(vec![
            Record::new("M", "S", "World", "Primary Energy", "EJ/yr").with_value(2030, 700.0),
            Record::new("M", "S", "World", "Primary Energy|Coal", "EJ/yr").with_value(2020, 350.0),
        ]);
        let column = check_aggregation(&data, &hierarchy(&data));
        assert!(column.is_clean());
    }

    #[test]
    fn children_missing_a_year_are_excluded_not_zeroed() {
        let data = Dataset::new(vec![
            Record::new("M", "S", "World", "Primary Energy", "EJ/yr").with_value(2020, 350.0),
            Record::new("M", "S", "World", "Primary Energy|Coal", "EJ/yr").with_value(2020, 350.0),
            Record::new("M", "S", "World", "Primary Energy|Oil", "EJ/yr").with_value(2020, None),
        ]);
        let column = check_aggregation(&data, &hierarchy(&data));
        assert!(column.is_clean());
    }

    #[test]
    fn both_zero_is_a_pass() {
        let data = Dataset::new(vec![
            Record::new("M", "S", "World", "Emissions|CO2", "Mt CO2/yr").with_value(2020, 0.0),
            Record::new("M", "S", "World", "Emissions|CO2|AFOLU", "Mt CO2/yr")
                .with_value(2020, 0.0),
        ]);
        let column = check_aggregation(&data, &hierarchy(&data));
        assert!(column.is_clean());
    }

    #[test]
    fn failing_years_accumulate_into_one_message() {
        let data = Dataset::new(vec![
            Record::new("M", "S", "World", "Primary Energy", "EJ/yr")
                .with_value(2020, 100.0)
                .with_value(2030, 100.0),
            Record::new("M", "S", "World", "Primary Energy|Coal", "EJ/yr")
                .with_value(2020, 600.0)
                .with_value(2030, 700.0),
        ]);
        let column = check_aggregation(&data, &hierarchy(&data));
        assert_eq!(
            column.get(0),
            Some("Basic sum check error on year 2020.\nBasic sum check error on year 2030.")
        );
        assert_eq!(column.finding_count(), 1);
    }
}

//! Property tests for the check components.

use std::collections::HashMap;

use proptest::prelude::*;

use iamc_model::{Dataset, Record, RecordKey};
use iamc_standards::NomenclatureCatalog;
use iamc_validate::{BlankPolicy, VariableHierarchy, check_aggregation, check_duplicates, check_names};

fn arb_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "GCAM".to_string(),
        "MESSAGE".to_string(),
        "WITCH".to_string(),
    ])
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        arb_name(),
        prop::sample::select(vec!["NDC".to_string(), "NetZero".to_string()]),
        prop::sample::select(vec!["World".to_string(), "Europe".to_string()]),
        prop::sample::select(vec![
            "Primary Energy".to_string(),
            "Emissions|CO2".to_string(),
            "Emissions|CH4".to_string(),
        ]),
        -1e6f64..1e6f64,
    )
        .prop_map(|(model, scenario, region, variable, value)| {
            Record::new(model, scenario, region, variable, "unit").with_value(2020, value)
        })
}

proptest! {
    /// Every duplicate group is flagged in full: the flag count per key is
    /// either zero (unique) or the whole group size, never one.
    #[test]
    fn duplicate_groups_flag_all_members(records in prop::collection::vec(arb_record(), 1..20)) {
        let dataset = Dataset::new(records);
        let column = check_duplicates(&dataset);

        let mut group_sizes: HashMap<RecordKey, usize> = HashMap::new();
        for record in &dataset.records {
            *group_sizes.entry(record.key()).or_insert(0) += 1;
        }
        let mut flagged: HashMap<RecordKey, usize> = HashMap::new();
        for (row, record) in dataset.records.iter().enumerate() {
            if column.get(row).is_some() {
                *flagged.entry(record.key()).or_insert(0) += 1;
            }
        }
        for (key, size) in group_sizes {
            let flags = flagged.get(&key).copied().unwrap_or(0);
            if size > 1 {
                prop_assert_eq!(flags, size);
                prop_assert!(flags >= 2);
            } else {
                prop_assert_eq!(flags, 0);
            }
        }
    }

    /// Adding a record with an existing key raises that group's flag count
    /// to at least two.
    #[test]
    fn adding_a_duplicate_is_monotonic(records in prop::collection::vec(arb_record(), 1..12)) {
        let baseline = Dataset::new(records.clone());
        let before = check_duplicates(&baseline).finding_count();

        let mut extended = records.clone();
        extended.push(records[0].clone());
        let dataset = Dataset::new(extended);
        let column = check_duplicates(&dataset);

        prop_assert!(column.finding_count() > before);
        let key = records[0].key();
        let flags = dataset
            .records
            .iter()
            .enumerate()
            .filter(|(row, record)| record.key() == key && column.get(*row).is_some())
            .count();
        prop_assert!(flags >= 2);
    }

    /// Running the name validator twice yields identical annotations.
    #[test]
    fn name_validation_is_idempotent(records in prop::collection::vec(arb_record(), 0..15)) {
        let dataset = Dataset::new(records);
        let catalog = NomenclatureCatalog::new(
            vec!["GCAM".to_string(), "MESSAGE".to_string()],
            vec!["World".to_string()],
            vec![("Primary Energy".to_string(), "unit".to_string())],
        );
        let first = check_names(&dataset, &catalog, BlankPolicy::Skip);
        let second = check_names(&dataset, &catalog, BlankPolicy::Skip);
        prop_assert_eq!(first, second);
    }

    /// Children that sum exactly to the aggregate never trip the 2%
    /// tolerance.
    #[test]
    fn exact_child_sums_pass_aggregation(
        children in prop::collection::vec(0.1f64..1e5f64, 1..6),
    ) {
        let total: f64 = children.iter().sum();
        let mut records = vec![
            Record::new("M", "S", "World", "Primary Energy", "EJ/yr").with_value(2020, total),
        ];
        for (index, value) in children.iter().enumerate() {
            records.push(
                Record::new("M", "S", "World", format!("Primary Energy|Source {index}"), "EJ/yr")
                    .with_value(2020, *value),
            );
        }
        let dataset = Dataset::new(records);
        let hierarchy = VariableHierarchy::build(&dataset.variable_names());
        let column = check_aggregation(&dataset, &hierarchy);
        prop_assert!(column.is_clean());
    }
}

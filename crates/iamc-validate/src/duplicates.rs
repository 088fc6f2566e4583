//! Duplicate detection over the record identity key.

use std::collections::HashMap;

use iamc_model::{AnnotationColumn, CheckKind, Dataset, RecordKey};

pub const DUPLICATE_MESSAGE: &str = "Duplicate";

/// Flag every record whose (model, scenario, region, variable) key occurs
/// more than once. All members of a duplicate group are flagged, including
/// the first occurrence; unit differences do not make records distinct.
pub fn check_duplicates(dataset: &Dataset) -> AnnotationColumn {
    let mut counts: HashMap<RecordKey, usize> = HashMap::new();
    for record in &dataset.records {
        *counts.entry(record.key()).or_insert(0) += 1;
    }

    let mut column = AnnotationColumn::new(CheckKind::Duplicates);
    for (row, record) in dataset.records.iter().enumerate() {
        if counts.get(&record.key()).copied().unwrap_or(0) > 1 {
            column.set(row, DUPLICATE_MESSAGE);
        }
    }
    column
}

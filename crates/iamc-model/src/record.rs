use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Reporting year of an observation column (e.g. 2020).
pub type Year = i32;

/// One observed timeseries in IAMC long form.
///
/// The identity key for duplicate and consistency purposes is
/// (model, scenario, region, variable); `unit` is metadata. A `None` cell is
/// an explicit "no value" marker, distinct from 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
    pub unit: String,
    /// Ordered year -> value mapping. Gaps are legal; not every record
    /// reports every year in the dataset.
    pub values: BTreeMap<Year, Option<f64>>,
}

/// Identity key of a [`Record`] within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
}

impl Record {
    pub fn new(
        model: impl Into<String>,
        scenario: impl Into<String>,
        region: impl Into<String>,
        variable: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            scenario: scenario.into(),
            region: region.into(),
            variable: variable.into(),
            unit: unit.into(),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, year: Year, value: impl Into<Option<f64>>) -> Self {
        self.values.insert(year, value.into());
        self
    }

    /// Reported value for `year`, flattening an explicit missing cell and an
    /// absent year column into the same `None`.
    pub fn value(&self, year: Year) -> Option<f64> {
        self.values.get(&year).copied().flatten()
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            model: self.model.clone(),
            scenario: self.scenario.clone(),
            region: self.region.clone(),
            variable: self.variable.clone(),
        }
    }
}

/// An ordered collection of records plus the union of their year columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Union of year keys across all records, sorted ascending.
    pub years: BTreeSet<Year>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let mut years = BTreeSet::new();
        for record in &records {
            years.extend(record.values.keys().copied());
        }
        Self { records, years }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct variable names present in the dataset, sorted.
    pub fn variable_names(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|record| record.variable.clone())
            .collect()
    }
}

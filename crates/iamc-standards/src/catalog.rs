#![deny(unsafe_code)]

//! The reference nomenclature: recognized model, region, variable, and unit
//! names plus the recognized (variable, unit) combinations.
//!
//! The catalog is loaded once, up front, and passed into the validation core
//! as read-only lookup data. The reference layout mirrors the published
//! spreadsheet: one CSV per sheet (`models.csv`, `regions.csv`,
//! `variable_units.csv`), with `variable_units.csv` supplying variables,
//! units, and the valid combinations in one pass.

use std::collections::BTreeSet;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::StandardsError;

pub const MODELS_FILE: &str = "models.csv";
pub const REGIONS_FILE: &str = "regions.csv";
pub const VARIABLE_UNITS_FILE: &str = "variable_units.csv";

/// Read-only lookup of valid names and (variable, unit) combinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NomenclatureCatalog {
    models: BTreeSet<String>,
    regions: BTreeSet<String>,
    variables: BTreeSet<String>,
    units: BTreeSet<String>,
    variable_units: BTreeSet<(String, String)>,
}

impl NomenclatureCatalog {
    /// Build a catalog from in-memory name collections. Variables and units
    /// referenced by a pair are added to their respective name sets as well.
    pub fn new<I, P>(models: I, regions: I, pairs: P) -> Self
    where
        I: IntoIterator<Item = String>,
        P: IntoIterator<Item = (String, String)>,
    {
        let mut catalog = Self {
            models: models.into_iter().collect(),
            regions: regions.into_iter().collect(),
            ..Self::default()
        };
        for (variable, unit) in pairs {
            catalog.variables.insert(variable.clone());
            catalog.units.insert(unit.clone());
            catalog.variable_units.insert((variable, unit));
        }
        catalog
    }

    /// Load the catalog from a directory holding the three reference CSVs.
    pub fn load(dir: &Path) -> Result<Self, StandardsError> {
        let models = read_name_column(&dir.join(MODELS_FILE), "Model")?;
        let regions = read_name_column(&dir.join(REGIONS_FILE), "Region")?;
        let pairs = read_variable_units(&dir.join(VARIABLE_UNITS_FILE))?;
        let catalog = Self::new(models, regions, pairs);
        debug!(
            models = catalog.models.len(),
            regions = catalog.regions.len(),
            variables = catalog.variables.len(),
            units = catalog.units.len(),
            pairs = catalog.variable_units.len(),
            "loaded nomenclature catalog"
        );
        Ok(catalog)
    }

    pub fn is_valid_model(&self, name: &str) -> bool {
        self.models.contains(name)
    }

    pub fn is_valid_region(&self, name: &str) -> bool {
        self.regions.contains(name)
    }

    pub fn is_valid_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    pub fn is_valid_unit(&self, name: &str) -> bool {
        self.units.contains(name)
    }

    /// True when `unit` is a recognized unit for `variable`.
    pub fn is_valid_variable_unit(&self, variable: &str, unit: &str) -> bool {
        self.variable_units
            .contains(&(variable.to_string(), unit.to_string()))
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

fn read_name_column(path: &Path, column: &str) -> Result<Vec<String>, StandardsError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|error| StandardsError::csv(path, error.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|error| StandardsError::csv(path, error.to_string()))?
        .clone();
    let index = column_index(&headers, column).ok_or_else(|| StandardsError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    })?;
    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| StandardsError::csv(path, error.to_string()))?;
        let value = record.get(index).unwrap_or("").trim();
        if !value.is_empty() {
            names.push(value.to_string());
        }
    }
    Ok(names)
}

fn read_variable_units(path: &Path) -> Result<Vec<(String, String)>, StandardsError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|error| StandardsError::csv(path, error.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|error| StandardsError::csv(path, error.to_string()))?
        .clone();
    let variable_idx =
        column_index(&headers, "Variable").ok_or_else(|| StandardsError::MissingColumn {
            path: path.to_path_buf(),
            column: "Variable".to_string(),
        })?;
    let unit_idx = column_index(&headers, "Unit").ok_or_else(|| StandardsError::MissingColumn {
        path: path.to_path_buf(),
        column: "Unit".to_string(),
    })?;
    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| StandardsError::csv(path, error.to_string()))?;
        let variable = record.get(variable_idx).unwrap_or("").trim();
        let unit = record.get(unit_idx).unwrap_or("").trim();
        if variable.is_empty() {
            continue;
        }
        pairs.push((variable.to_string(), unit.to_string()));
    }
    Ok(pairs)
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().trim_matches('\u{feff}').eq_ignore_ascii_case(column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> NomenclatureCatalog {
        NomenclatureCatalog::new(
            vec!["GCAM".to_string(), "MESSAGE".to_string()],
            vec!["World".to_string(), "Europe".to_string()],
            vec![
                ("Primary Energy".to_string(), "EJ/yr".to_string()),
                ("Emissions|CO2".to_string(), "Mt CO2/yr".to_string()),
            ],
        )
    }

    #[test]
    fn membership_lookups() {
        let catalog = sample_catalog();
        assert!(catalog.is_valid_model("GCAM"));
        assert!(!catalog.is_valid_model("gcam"));
        assert!(catalog.is_valid_region("World"));
        assert!(catalog.is_valid_variable("Primary Energy"));
        assert!(catalog.is_valid_unit("EJ/yr"));
        assert!(!catalog.is_valid_variable("Primary Energy|Coal"));
    }

    #[test]
    fn pair_membership_is_exact() {
        let catalog = sample_catalog();
        assert!(catalog.is_valid_variable_unit("Primary Energy", "EJ/yr"));
        // Both names are valid on their own but the combination is not.
        assert!(!catalog.is_valid_variable_unit("Primary Energy", "Mt CO2/yr"));
    }
}

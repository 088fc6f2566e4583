#![deny(unsafe_code)]

//! Quantitative vetting criteria.
//!
//! Criteria are configuration data, not behavior: each is an immutable,
//! data-only description of a plausibility rule the vetting engine evaluates.
//! The built-in reference set encodes the IPCC AR6 vetting ranges (WG III
//! report, Annex III, Table 11); alternative catalogs can be loaded from a
//! JSON file with the same tagged layout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use iamc_model::{Severity, Year};

use crate::error::StandardsError;

/// Region the reference criteria apply to.
pub const WORLD: &str = "World";

/// One vetting rule, in one of three shapes.
///
/// The engine dispatches on the shape; severity is carried as metadata and
/// never changes the evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VettingCriterion {
    /// A single variable's value at one year must fall inside `[low, high]`.
    Range {
        name: String,
        variable: String,
        region: String,
        year: Year,
        low: f64,
        high: f64,
        severity: Severity,
    },
    /// The sum of two variables' values at one year, per (model, scenario),
    /// must fall inside `[low, high]`.
    SumRange {
        name: String,
        variable1: String,
        variable2: String,
        region: String,
        year: Year,
        low: f64,
        high: f64,
        severity: Severity,
    },
    /// The relative change of a variable between two years must not exceed
    /// `max_change` in magnitude.
    PercentChange {
        name: String,
        variable: String,
        region: String,
        from_year: Year,
        to_year: Year,
        max_change: f64,
        severity: Severity,
    },
}

impl VettingCriterion {
    pub fn name(&self) -> &str {
        match self {
            VettingCriterion::Range { name, .. }
            | VettingCriterion::SumRange { name, .. }
            | VettingCriterion::PercentChange { name, .. } => name,
        }
    }

    pub fn region(&self) -> &str {
        match self {
            VettingCriterion::Range { region, .. }
            | VettingCriterion::SumRange { region, .. }
            | VettingCriterion::PercentChange { region, .. } => region,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            VettingCriterion::Range { severity, .. }
            | VettingCriterion::SumRange { severity, .. }
            | VettingCriterion::PercentChange { severity, .. } => *severity,
        }
    }

    /// Short shape label for listings.
    pub fn shape(&self) -> &'static str {
        match self {
            VettingCriterion::Range { .. } => "range",
            VettingCriterion::SumRange { .. } => "sum range",
            VettingCriterion::PercentChange { .. } => "percent change",
        }
    }

    fn range(
        name: &str,
        variable: &str,
        year: Year,
        low: f64,
        high: f64,
        severity: Severity,
    ) -> Self {
        VettingCriterion::Range {
            name: name.to_string(),
            variable: variable.to_string(),
            region: WORLD.to_string(),
            year,
            low,
            high,
            severity,
        }
    }

    fn sum_range(
        name: &str,
        variable1: &str,
        variable2: &str,
        year: Year,
        low: f64,
        high: f64,
        severity: Severity,
    ) -> Self {
        VettingCriterion::SumRange {
            name: name.to_string(),
            variable1: variable1.to_string(),
            variable2: variable2.to_string(),
            region: WORLD.to_string(),
            year,
            low,
            high,
            severity,
        }
    }
}

/// An ordered list of vetting criteria. Evaluation order matters: within the
/// single vetting column, a later criterion's message wins over an earlier
/// one for the same record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VettingCatalog {
    pub criteria: Vec<VettingCriterion>,
}

impl VettingCatalog {
    /// Load a criteria catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| StandardsError::io(path, source))?;
        let catalog: Self =
            serde_json::from_str(&text).map_err(|source| StandardsError::Criteria {
                path: path.to_path_buf(),
                source,
            })?;
        if catalog.criteria.is_empty() {
            return Err(StandardsError::EmptyCriteria {
                path: path.to_path_buf(),
            });
        }
        Ok(catalog)
    }

    /// The IPCC AR6 reference criteria, in evaluation order.
    pub fn ar6_reference() -> Self {
        let criteria = vec![
            VettingCriterion::range(
                "CO2 EIP emissions",
                "Emissions|CO2|Energy and Industrial Processes",
                2020,
                30116.8,
                45175.2,
                Severity::Error,
            ),
            VettingCriterion::range(
                "CH4 emissions",
                "Emissions|CH4",
                2020,
                303.2,
                454.8,
                Severity::Error,
            ),
            VettingCriterion::range(
                "Primary Energy",
                "Primary Energy",
                2020,
                462.4,
                693.6,
                Severity::Error,
            ),
            VettingCriterion::range(
                "Electricity Nuclear",
                "Secondary Energy|Electricity|Nuclear",
                2020,
                6.839,
                12.701,
                Severity::Error,
            ),
            VettingCriterion::range(
                "No net negative CO2 emissions before 2030",
                "Emissions|CO2",
                2030,
                0.0,
                1_000_000.0,
                Severity::Warning,
            ),
            VettingCriterion::range(
                "Electricity from Nuclear in 2030",
                "Secondary Energy|Electricity|Nuclear",
                2030,
                0.0,
                20.0,
                Severity::Warning,
            ),
            VettingCriterion::range(
                "CH4 emissions in 2040",
                "Emissions|CH4",
                2040,
                100.0,
                1000.0,
                Severity::Warning,
            ),
            VettingCriterion::sum_range(
                "CO2 total emissions (EIP + AFOLU)",
                "Emissions|CO2|AFOLU",
                "Emissions|CO2|Energy and Industrial Processes",
                2020,
                26550.6,
                61951.4,
                Severity::Error,
            ),
            VettingCriterion::sum_range(
                "CCS from Energy 2020",
                "Carbon Sequestration|CCS|Biomass|Energy",
                "Carbon Sequestration|CCS|Fossil|Energy",
                2020,
                0.0,
                250.0,
                Severity::Error,
            ),
            VettingCriterion::sum_range(
                "Electricity Solar & Wind",
                "Secondary Energy|Electricity|Wind",
                "Secondary Energy|Electricity|Solar",
                2020,
                4.255,
                12.765,
                Severity::Error,
            ),
            VettingCriterion::sum_range(
                "CCS from Energy in 2030",
                "Carbon Sequestration|CCS|Biomass|Energy",
                "Carbon Sequestration|CCS|Fossil|Energy",
                2030,
                0.0,
                2000.0,
                Severity::Warning,
            ),
            VettingCriterion::PercentChange {
                name: "CO2 emissions EIP 2010-2020 - % change".to_string(),
                variable: "Emissions|CO2|Energy and Industrial Processes".to_string(),
                region: WORLD.to_string(),
                from_year: 2010,
                to_year: 2020,
                max_change: 0.5,
                severity: Severity::Error,
            },
        ];
        Self { criteria }
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_catalog_has_twelve_rules() {
        let catalog = VettingCatalog::ar6_reference();
        assert_eq!(catalog.len(), 12);
        assert!(
            catalog
                .criteria
                .iter()
                .all(|criterion| criterion.region() == WORLD)
        );
    }

    #[test]
    fn criterion_json_round_trip() {
        let catalog = VettingCatalog::ar6_reference();
        let json = serde_json::to_string_pretty(&catalog).expect("serialize catalog");
        let round: VettingCatalog = serde_json::from_str(&json).expect("deserialize catalog");
        assert_eq!(round, catalog);
    }

    #[test]
    fn tagged_layout_is_stable() {
        let criterion = VettingCriterion::range(
            "Primary Energy",
            "Primary Energy",
            2020,
            462.4,
            693.6,
            Severity::Error,
        );
        let json = serde_json::to_value(&criterion).expect("serialize criterion");
        assert_eq!(json["kind"], "range");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["year"], 2020);
    }
}

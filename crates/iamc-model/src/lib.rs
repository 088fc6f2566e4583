pub mod error;
pub mod record;
pub mod report;

pub use error::{IamcError, Result};
pub use record::{Dataset, Record, RecordKey, Year};
pub use report::{AnnotationColumn, CheckKind, Severity, ValidationReport, ValidationSummary};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let dataset = Dataset::new(vec![
            Record::new("GCAM", "NDC", "World", "Primary Energy", "EJ/yr").with_value(2020, 550.0),
        ]);
        let mut column = AnnotationColumn::new(CheckKind::Model);
        column.set(0, "Model GCAM not found!");
        let report = ValidationReport {
            dataset,
            columns: vec![column],
            summary: ValidationSummary {
                invalid_models: 1,
                ..ValidationSummary::default()
            },
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: ValidationReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round.summary.invalid_models, 1);
        assert_eq!(
            round.column(CheckKind::Model).and_then(|c| c.get(0)),
            Some("Model GCAM not found!")
        );
    }
}

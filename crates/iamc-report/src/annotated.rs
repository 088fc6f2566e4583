//! Annotated-dataset CSV export.
//!
//! The hosting layer owns coloring and spreadsheet styling; this writer
//! reproduces the validated table itself: the original identity and year
//! columns followed by one annotation column per executed check, with empty
//! cells for passing records.

use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use iamc_model::ValidationReport;

/// Write the annotated dataset as CSV to `path`.
pub fn write_annotated_csv(path: &Path, report: &ValidationReport) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;

    let years: Vec<i32> = report.dataset.years.iter().copied().collect();
    let mut header: Vec<String> = ["Model", "Scenario", "Region", "Variable", "Unit"]
        .iter()
        .map(|name| (*name).to_string())
        .collect();
    header.extend(years.iter().map(ToString::to_string));
    header.extend(
        report
            .columns
            .iter()
            .map(|column| column.check.column_name().to_string()),
    );
    writer
        .write_record(&header)
        .with_context(|| format!("write header to {}", path.display()))?;

    for (row, record) in report.dataset.records.iter().enumerate() {
        let mut cells: Vec<String> = vec![
            record.model.clone(),
            record.scenario.clone(),
            record.region.clone(),
            record.variable.clone(),
            record.unit.clone(),
        ];
        for &year in &years {
            cells.push(match record.value(year) {
                Some(value) => format_value(value),
                None => String::new(),
            });
        }
        for column in &report.columns {
            // Flatten multi-line aggregation messages into one cell.
            cells.push(
                column
                    .get(row)
                    .map(|message| message.replace('\n', " "))
                    .unwrap_or_default(),
            );
        }
        writer
            .write_record(&cells)
            .with_context(|| format!("write row {row} to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_value;

    #[test]
    fn values_keep_a_decimal_point() {
        assert_eq!(format_value(550.0), "550.0");
        assert_eq!(format_value(550.5), "550.5");
        assert_eq!(format_value(-3.25), "-3.25");
    }
}

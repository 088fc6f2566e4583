//! IAMC long-table CSV reader.
//!
//! Rows are keyed by the five identity columns (Model, Scenario, Region,
//! Variable, Unit); every remaining column must be a numeric year header.
//! Identity headers are matched case-insensitively and normalized before the
//! core ever sees a record; value cells are coerced leniently, with
//! non-numeric text becoming an explicit missing value rather than an error.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use iamc_model::{Dataset, IamcError, Record, Result, Year};

/// The required identity columns, in canonical order.
pub const IDENTITY_COLUMNS: [&str; 5] = ["Model", "Scenario", "Region", "Variable", "Unit"];

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    model: usize,
    scenario: usize,
    region: usize,
    variable: usize,
    unit: usize,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Parse a column header as a reporting year. Accepts integral floats
/// ("2020.0") since spreadsheet round-trips produce them.
fn parse_year_header(header: &str) -> Option<Year> {
    if let Ok(year) = header.parse::<Year>() {
        return Some(year);
    }
    let value = header.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value >= f64::from(Year::MIN) && value <= f64::from(Year::MAX) {
        Some(value as Year)
    } else {
        None
    }
}

/// Read an IAMC results table from a CSV file.
///
/// # Errors
///
/// Fails on I/O problems and on structural defects: missing identity
/// columns, no parseable year columns, or non-numeric extra columns.
pub fn read_iamc_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let dataset = read_iamc_reader(file)?;
    debug!(
        path = %path.display(),
        records = dataset.len(),
        years = dataset.years.len(),
        "ingested IAMC table"
    );
    Ok(dataset)
}

/// Read an IAMC results table from any reader.
pub fn read_iamc_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|error| IamcError::Message(format!("read headers: {error}")))?
        .iter()
        .map(normalize_header)
        .collect();

    let columns = resolve_identity_columns(&headers)?;
    let year_columns = resolve_year_columns(&headers)?;

    let mut records = Vec::new();
    let mut coerced_cells = 0usize;
    for (row_index, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|error| {
            IamcError::Message(format!("read record {}: {error}", row_index + 1))
        })?;
        let field = |index: usize| normalize_cell(row.get(index).unwrap_or(""));
        let mut record = Record::new(
            field(columns.model),
            field(columns.scenario),
            field(columns.region),
            field(columns.variable),
            field(columns.unit),
        );
        for &(index, year) in &year_columns {
            let raw = field(index);
            if raw.is_empty() {
                record.values.insert(year, None);
                continue;
            }
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    record.values.insert(year, Some(value));
                }
                _ => {
                    // Lenient coercion: unparseable text becomes missing.
                    coerced_cells += 1;
                    record.values.insert(year, None);
                }
            }
        }
        records.push(record);
    }
    if coerced_cells > 0 {
        warn!(cells = coerced_cells, "coerced non-numeric value cells to missing");
    }
    Ok(Dataset::new(records))
}

fn resolve_identity_columns(headers: &[String]) -> Result<ColumnMap> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    };
    let mut missing = Vec::new();
    for name in IDENTITY_COLUMNS {
        if find(name).is_none() {
            missing.push(name);
        }
    }
    if !missing.is_empty() {
        return Err(IamcError::MissingIdentityColumns(missing.join(", ")));
    }
    Ok(ColumnMap {
        model: find("Model").unwrap_or_default(),
        scenario: find("Scenario").unwrap_or_default(),
        region: find("Region").unwrap_or_default(),
        variable: find("Variable").unwrap_or_default(),
        unit: find("Unit").unwrap_or_default(),
    })
}

fn resolve_year_columns(headers: &[String]) -> Result<Vec<(usize, Year)>> {
    let mut year_columns = Vec::new();
    let mut rejected = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        if header.is_empty()
            || IDENTITY_COLUMNS
                .iter()
                .any(|name| header.eq_ignore_ascii_case(name))
        {
            continue;
        }
        match parse_year_header(header) {
            Some(year) => year_columns.push((index, year)),
            None => rejected.push(header.clone()),
        }
    }
    if !rejected.is_empty() {
        return Err(IamcError::Message(format!(
            "unexpected non-year column(s): {}",
            rejected.join(", ")
        )));
    }
    if year_columns.is_empty() {
        return Err(IamcError::NoYearColumns);
    }
    Ok(year_columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_table_with_mixed_case_headers() {
        let csv = "model,SCENARIO,Region,Variable,unit,2020,2030\n\
                   GCAM,NDC,World,Primary Energy,EJ/yr,550.0,600.0\n\
                   GCAM,NDC,World,Emissions|CO2,Mt CO2/yr,40000,\n";
        let dataset = read_iamc_reader(csv.as_bytes()).expect("parse");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.years.iter().copied().collect::<Vec<_>>(), vec![2020, 2030]);
        assert_eq!(dataset.records[0].value(2020), Some(550.0));
        // Blank cell is an explicit missing value, not zero.
        assert_eq!(dataset.records[1].value(2030), None);
        assert_eq!(dataset.records[1].values.get(&2030), Some(&None));
    }

    #[test]
    fn coerces_non_numeric_cells_to_missing() {
        let csv = "Model,Scenario,Region,Variable,Unit,2020\n\
                   GCAM,NDC,World,Primary Energy,EJ/yr,n/a\n";
        let dataset = read_iamc_reader(csv.as_bytes()).expect("parse");
        assert_eq!(dataset.records[0].value(2020), None);
    }

    #[test]
    fn missing_identity_columns_are_fatal() {
        let csv = "Model,Region,Variable,Unit,2020\nGCAM,World,Primary Energy,EJ/yr,550\n";
        let error = read_iamc_reader(csv.as_bytes()).expect_err("missing scenario");
        assert!(matches!(error, IamcError::MissingIdentityColumns(ref cols) if cols == "Scenario"));
    }

    #[test]
    fn table_without_year_columns_is_fatal() {
        let csv = "Model,Scenario,Region,Variable,Unit\nGCAM,NDC,World,Primary Energy,EJ/yr\n";
        let error = read_iamc_reader(csv.as_bytes()).expect_err("no years");
        assert!(matches!(error, IamcError::NoYearColumns));
    }

    #[test]
    fn unexpected_text_column_is_rejected() {
        let csv = "Model,Scenario,Region,Variable,Unit,Notes,2020\n";
        let error = read_iamc_reader(csv.as_bytes()).expect_err("extra column");
        assert!(error.to_string().contains("Notes"));
    }

    #[test]
    fn spreadsheet_style_year_headers_parse() {
        assert_eq!(parse_year_header("2020"), Some(2020));
        assert_eq!(parse_year_header("2020.0"), Some(2020));
        assert_eq!(parse_year_header("Notes"), None);
        assert_eq!(parse_year_header("2020.5"), None);
    }
}

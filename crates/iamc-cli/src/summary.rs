use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use crate::types::ValidateResult;

pub fn print_summary(result: &ValidateResult) {
    println!("Data: {}", result.data_path.display());
    if let Some(path) = &result.annotated_csv {
        println!("Annotated data: {}", path.display());
    }
    if let Some(path) = &result.report_json {
        println!("Report: {}", path.display());
    }

    let summary = &result.report.summary;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Check"), header_cell("Findings")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows: [(&str, usize, Color); 9] = [
        ("Model names", summary.invalid_models, Color::Red),
        ("Region names", summary.invalid_regions, Color::Red),
        ("Variable names", summary.invalid_variables, Color::Red),
        ("Unit names", summary.invalid_units, Color::Red),
        (
            "Variable/unit pairs",
            summary.invalid_variable_units,
            Color::Red,
        ),
        ("Duplicate records", summary.duplicate_records, Color::Red),
        ("Vetting errors", summary.vetting_errors, Color::Red),
        ("Vetting warnings", summary.vetting_warnings, Color::Yellow),
        (
            "Aggregation mismatches",
            summary.aggregation_mismatches,
            Color::Red,
        ),
    ];
    for (label, count, color) in rows {
        table.add_row(vec![Cell::new(label), count_cell(count, color)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(summary.total_findings(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_finding_table(result);
}

fn print_finding_table(result: &ValidateResult) {
    let report = &result.report;
    let mut findings = Vec::new();
    for column in &report.columns {
        for (&row, message) in &column.cells {
            if message.is_empty() {
                continue;
            }
            findings.push((row, column.check, message.as_str()));
        }
    }
    if findings.is_empty() {
        return;
    }
    findings.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Model"),
        header_cell("Scenario"),
        header_cell("Region"),
        header_cell("Variable"),
        header_cell("Check"),
        header_cell("Message"),
    ]);
    apply_finding_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (row, check, message) in findings {
        let record = &report.dataset.records[row];
        table.add_row(vec![
            Cell::new(row),
            Cell::new(&record.model),
            Cell::new(&record.scenario),
            Cell::new(&record.region),
            Cell::new(&record.variable),
            Cell::new(check.column_name()),
            message_cell(message),
        ]);
    }
    println!();
    println!("Findings:");
    println!("{table}");
}

fn message_cell(message: &str) -> Cell {
    let flat = message.replace('\n', " ");
    if message.contains("Vetting warning") {
        Cell::new(flat).fg(Color::Yellow)
    } else {
        Cell::new(flat).fg(Color::Red)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(60);
}

fn apply_finding_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

use std::time::Instant;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{info, info_span};

use iamc_standards::{NomenclatureCatalog, VettingCatalog, VettingCriterion};
use iamc_validate::{
    BlankPolicy, CheckSelection, ValidationContext, run_validation, write_validation_report_json,
};

use crate::cli::{CriteriaArgs, ValidateArgs};
use crate::summary::{apply_table_style, header_cell};
use crate::types::ValidateResult;

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateResult> {
    let data_path = &args.data;
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        data_path
            .parent()
            .map(|dir| dir.join("output"))
            .unwrap_or_else(|| "output".into())
    });

    let selection = CheckSelection {
        names: !args.skip_names,
        duplicates: !args.skip_duplicates,
        vetting: !args.skip_vetting,
        aggregation: args.aggregation,
    };
    if !selection.any() {
        bail!("all checks are disabled; nothing to do");
    }
    if selection.names && args.nomenclature.is_none() {
        bail!(
            "name checks need a reference nomenclature; \
             pass --nomenclature DIR or disable them with --skip-names"
        );
    }

    // =========================================================================
    // Stage 0: Load standards (nomenclature catalog + vetting criteria)
    // =========================================================================
    let standards_span = info_span!("standards");
    let standards_start = Instant::now();
    let (catalog, criteria) = standards_span.in_scope(|| load_standards(args))?;
    if let Some(catalog) = &catalog {
        info!(
            models = catalog.model_count(),
            regions = catalog.region_count(),
            variables = catalog.variable_count(),
            criteria = criteria.len(),
            duration_ms = standards_start.elapsed().as_millis(),
            "standards loaded"
        );
    }

    // =========================================================================
    // Stage 1: Ingest the results file
    // =========================================================================
    let ingest_span = info_span!("ingest", data = %data_path.display());
    let ingest_start = Instant::now();
    let dataset = ingest_span.in_scope(|| {
        iamc_ingest::read_iamc_csv(data_path)
            .with_context(|| format!("read results file {}", data_path.display()))
    })?;
    info!(
        records = dataset.len(),
        years = dataset.years.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    // =========================================================================
    // Stage 2: Run the selected checks
    // =========================================================================
    let mut ctx = ValidationContext::new().with_criteria(&criteria);
    if let Some(catalog) = &catalog {
        ctx = ctx.with_catalog(catalog);
    }
    if args.flag_blank_names {
        ctx = ctx.with_blank_policy(BlankPolicy::Flag);
    }
    let validate_span = info_span!("validate");
    let report = validate_span.in_scope(|| run_validation(&dataset, &ctx, selection))?;

    // =========================================================================
    // Stage 3: Write the annotated dataset and the JSON report
    // =========================================================================
    let (annotated_csv, report_json) = if args.dry_run {
        (None, None)
    } else {
        let output_span = info_span!("output", dir = %output_dir.display());
        let _guard = output_span.enter();
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("create output directory {}", output_dir.display()))?;
        let annotated_path = output_dir.join("annotated_data.csv");
        iamc_report::write_annotated_csv(&annotated_path, &report)
            .with_context(|| format!("write annotated data to {}", annotated_path.display()))?;
        let json_path = write_validation_report_json(&output_dir, &report)
            .context("write validation report")?;
        info!(
            annotated = %annotated_path.display(),
            report = %json_path.display(),
            "outputs written"
        );
        (Some(annotated_path), Some(json_path))
    };

    let summary = &report.summary;
    let has_errors = summary.invalid_models
        + summary.invalid_regions
        + summary.invalid_variables
        + summary.invalid_units
        + summary.invalid_variable_units
        + summary.duplicate_records
        + summary.vetting_errors
        + summary.aggregation_mismatches
        > 0;

    Ok(ValidateResult {
        data_path: data_path.clone(),
        output_dir,
        report,
        annotated_csv,
        report_json,
        has_errors,
    })
}

fn load_standards(
    args: &ValidateArgs,
) -> Result<(Option<NomenclatureCatalog>, Vec<VettingCriterion>)> {
    let catalog = match &args.nomenclature {
        Some(dir) => Some(
            NomenclatureCatalog::load(dir)
                .with_context(|| format!("load nomenclature from {}", dir.display()))?,
        ),
        None => None,
    };
    let criteria = match &args.criteria {
        Some(path) => {
            VettingCatalog::load(path)
                .with_context(|| format!("load vetting criteria from {}", path.display()))?
        }
        None => VettingCatalog::ar6_reference(),
    };
    Ok((catalog, criteria.criteria))
}

pub fn run_criteria(args: &CriteriaArgs) -> Result<()> {
    let catalog = match &args.criteria {
        Some(path) => VettingCatalog::load(path)
            .with_context(|| format!("load vetting criteria from {}", path.display()))?,
        None => VettingCatalog::ar6_reference(),
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Criterion"),
        header_cell("Shape"),
        header_cell("Variable(s)"),
        header_cell("Region"),
        header_cell("Year(s)"),
        header_cell("Bounds"),
        header_cell("Severity"),
    ]);
    apply_table_style(&mut table);
    for criterion in &catalog.criteria {
        let (variables, years, bounds) = describe(criterion);
        table.add_row(vec![
            criterion.name().to_string(),
            criterion.shape().to_string(),
            variables,
            criterion.region().to_string(),
            years,
            bounds,
            criterion.severity().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn describe(criterion: &VettingCriterion) -> (String, String, String) {
    match criterion {
        VettingCriterion::Range {
            variable,
            year,
            low,
            high,
            ..
        } => (
            variable.clone(),
            year.to_string(),
            format!("[{low}, {high}]"),
        ),
        VettingCriterion::SumRange {
            variable1,
            variable2,
            year,
            low,
            high,
            ..
        } => (
            format!("{variable1} + {variable2}"),
            year.to_string(),
            format!("[{low}, {high}]"),
        ),
        VettingCriterion::PercentChange {
            variable,
            from_year,
            to_year,
            max_change,
            ..
        } => (
            variable.clone(),
            format!("{from_year} -> {to_year}"),
            format!("<= {:.0}%", max_change * 100.0),
        ),
    }
}

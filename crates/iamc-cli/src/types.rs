use std::path::PathBuf;

use iamc_model::ValidationReport;

#[derive(Debug)]
pub struct ValidateResult {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub report: ValidationReport,
    pub annotated_csv: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    pub has_errors: bool,
}

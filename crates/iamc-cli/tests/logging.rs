//! Integration tests for the logging module.

use tracing::level_filters::LevelFilter;

use iamc_cli::logging::{LogConfig, LogFormat, init_logging};

// Single test because the global subscriber can only be installed once per
// process.
#[test]
fn log_file_receives_events() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let log_path = dir.path().join("run.log");
    let config = LogConfig {
        level_filter: LevelFilter::INFO,
        use_env_filter: false,
        format: LogFormat::Compact,
        log_file: Some(log_path.clone()),
        with_ansi: false,
        ..LogConfig::default()
    };
    init_logging(&config).expect("init logging");

    tracing::info!(records = 42, "validation run complete");
    tracing::debug!("below the configured level");

    let contents = std::fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("validation run complete"));
    assert!(contents.contains("records=42"));
    assert!(!contents.contains("below the configured level"));
}

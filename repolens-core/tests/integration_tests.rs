//! Integration tests for repolens-core infrastructure

use repolens_core::{
    init_logging, ErrorKind, ErrorStatusMode, LogFormat, LoggingConfig, RepolensConfig,
    RepolensError,
};

#[test]
fn test_error_handling() {
    let error = RepolensError::analysis(RepolensError::invalid_url("https://example.com"));

    assert_eq!(error.kind(), ErrorKind::InvalidUrl);
    assert_eq!(
        error.to_string(),
        "Error analyzing repository: Invalid repository URL format"
    );

    // Logging an error must not panic, with or without a subscriber
    error.log();
}

#[test]
fn test_logging_initialization() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Compact,
        include_location: false,
        include_thread: false,
        log_span_close: false,
        filter_directives: vec!["repolens_core=debug".to_string()],
    };

    assert!(init_logging(&config).is_ok());
    // A second global subscriber is refused rather than panicking
    assert!(init_logging(&config).is_err());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repolens.toml");
    std::fs::write(
        &path,
        r#"
        [workspace]
        root_dir = "clones"

        [github]
        per_page = 50

        [logging]
        format = "json"
        "#,
    )
    .unwrap();

    let config = RepolensConfig::from_file(&path).unwrap();
    assert_eq!(config.workspace.root_dir.to_str(), Some("clones"));
    assert_eq!(config.github.per_page, 50);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.errors.status_mode, ErrorStatusMode::Legacy);
}

#[test]
fn test_missing_file_is_configuration_error() {
    let error = RepolensConfig::from_file("/definitely/not/here.toml").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Configuration);
}

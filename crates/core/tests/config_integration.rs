//! logsieve.toml 통합 설정 테스트
//!
//! - logsieve.toml.example 파싱 테스트
//! - 파일 로딩 및 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use logsieve_core::config::LogsieveConfig;
use logsieve_core::error::{ConfigError, LogsieveError};
use serial_test::serial;

// =============================================================================
// logsieve.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../logsieve.toml.example");
    let config = LogsieveConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.pipeline.max_line_bytes, 65536);
    assert!(config.pipeline.skip_empty_lines);
    assert!(!config.pipeline.normalize_timestamps);
    assert_eq!(config.pipeline.default_layout, "apache");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../logsieve.toml.example");
    let config = LogsieveConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
#[serial]
async fn load_reads_file_from_disk() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("logsieve.toml");
    std::fs::write(
        &path,
        "[pipeline]\nnormalize_timestamps = true\ndefault_layout = \"rfc3339\"\n",
    )
    .expect("should write config");

    let config = LogsieveConfig::load(&path).await.expect("should load");
    assert!(config.pipeline.normalize_timestamps);
    assert_eq!(config.pipeline.default_layout, "rfc3339");
}

#[tokio::test]
async fn load_missing_file_returns_file_not_found() {
    let err = LogsieveConfig::load("/nonexistent/logsieve.toml")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LogsieveError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn load_invalid_value_fails_validation() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[general]\nlog_level = \"loud\"\n").expect("should write config");

    let err = LogsieveConfig::load(&path).await.unwrap_err();
    assert!(err.to_string().contains("log_level"));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial]
fn env_overrides_take_precedence_over_file_values() {
    let mut config = LogsieveConfig::parse("[pipeline]\nmax_line_bytes = 1024\n").unwrap();

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("LOGSIEVE_PIPELINE_MAX_LINE_BYTES", "2048");
        std::env::set_var("LOGSIEVE_PIPELINE_NORMALIZE_TIMESTAMPS", "true");
        std::env::set_var("LOGSIEVE_GENERAL_LOG_FORMAT", "json");
    }

    config.apply_env_overrides();

    unsafe {
        std::env::remove_var("LOGSIEVE_PIPELINE_MAX_LINE_BYTES");
        std::env::remove_var("LOGSIEVE_PIPELINE_NORMALIZE_TIMESTAMPS");
        std::env::remove_var("LOGSIEVE_GENERAL_LOG_FORMAT");
    }

    assert_eq!(config.pipeline.max_line_bytes, 2048);
    assert!(config.pipeline.normalize_timestamps);
    assert_eq!(config.general.log_format, "json");
}

#[test]
#[serial]
fn invalid_env_value_keeps_file_value() {
    let mut config = LogsieveConfig::parse("[pipeline]\nmax_line_bytes = 1024\n").unwrap();

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("LOGSIEVE_PIPELINE_MAX_LINE_BYTES", "lots") };
    config.apply_env_overrides();
    unsafe { std::env::remove_var("LOGSIEVE_PIPELINE_MAX_LINE_BYTES") };

    assert_eq!(config.pipeline.max_line_bytes, 1024);
}

// =============================================================================
// 에러 케이스
// =============================================================================

#[test]
fn unknown_section_is_ignored() {
    let config = LogsieveConfig::parse("[storage]\nenabled = true\n").expect("should parse");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn wrong_type_is_parse_error() {
    let err = LogsieveConfig::parse("[pipeline]\nmax_line_bytes = \"big\"\n").unwrap_err();
    assert!(matches!(
        err,
        LogsieveError::Config(ConfigError::ParseFailed { .. })
    ));
}

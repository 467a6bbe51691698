//! 설정 관리 -- logsieve.toml 파싱 및 런타임 설정
//!
//! [`LogsieveConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGSIEVE_PIPELINE_MAX_LINE_BYTES=4096` 형식)
//! 3. 설정 파일 (`logsieve.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logsieve_core::error::LogsieveError> {
//! use logsieve_core::config::LogsieveConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogsieveConfig::load("logsieve.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogsieveConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogsieveError};

/// 허용되는 최대 라인 크기 상한 (16MB)
const MAX_LINE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

/// logsieve 통합 설정
///
/// `logsieve.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsieveConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 파이프라인 설정
    #[serde(default)]
    pub pipeline: LogPipelineConfig,
}

impl LogsieveConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogsieveError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogsieveError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogsieveError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogsieveError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogsieveError> {
        toml::from_str(toml_str).map_err(|e| {
            LogsieveError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGSIEVE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGSIEVE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGSIEVE_GENERAL_LOG_FORMAT");

        // Pipeline
        override_usize(
            &mut self.pipeline.max_line_bytes,
            "LOGSIEVE_PIPELINE_MAX_LINE_BYTES",
        );
        override_bool(
            &mut self.pipeline.skip_empty_lines,
            "LOGSIEVE_PIPELINE_SKIP_EMPTY_LINES",
        );
        override_bool(
            &mut self.pipeline.normalize_timestamps,
            "LOGSIEVE_PIPELINE_NORMALIZE_TIMESTAMPS",
        );
        override_string(
            &mut self.pipeline.default_layout,
            "LOGSIEVE_PIPELINE_DEFAULT_LAYOUT",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 레이아웃 이름처럼 파이프라인 크레이트만 아는 값은
    /// 파이프라인 설정 단계에서 별도로 검증합니다.
    pub fn validate(&self) -> Result<(), LogsieveError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.pipeline.max_line_bytes == 0 || self.pipeline.max_line_bytes > MAX_LINE_BYTES_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES_LIMIT),
            }
            .into());
        }

        if self.pipeline.default_layout.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.default_layout".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 로그 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogPipelineConfig {
    /// 최대 라인 크기 (바이트). 초과하는 라인은 건너뜁니다.
    pub max_line_bytes: usize,
    /// 빈 라인 건너뛰기
    pub skip_empty_lines: bool,
    /// 수집 완료 후 타임스탬프 정규화 실행 여부
    pub normalize_timestamps: bool,
    /// 시간 범위 파싱에 사용할 기본 레이아웃 이름
    pub default_layout: String,
}

impl Default for LogPipelineConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: 64 * 1024, // 64KB
            skip_empty_lines: true,
            normalize_timestamps: false,
            default_layout: "apache".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

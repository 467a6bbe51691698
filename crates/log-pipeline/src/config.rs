//! 로그 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`LogPipelineConfig`](logsieve_core::config::LogPipelineConfig)를
//! 기반으로 파이프라인 전용 검증(레이아웃 이름 등)을 추가합니다.
//!
//! # 사용 예시
//! ```ignore
//! use logsieve_core::config::LogsieveConfig;
//! use logsieve_log_pipeline::config::PipelineConfig;
//!
//! let core_config = LogsieveConfig::default();
//! let config = PipelineConfig::from_core(&core_config.pipeline);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::LogPipelineError;
use crate::timestamp::TimeLayout;

/// 허용되는 최대 라인 크기 상한 (16MB)
const MAX_LINE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

/// 로그 파이프라인 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 최대 라인 크기 (바이트)
    pub max_line_bytes: usize,
    /// 빈 라인 건너뛰기
    pub skip_empty_lines: bool,
    /// 수집 완료 후 타임스탬프 정규화 실행 여부
    pub normalize_timestamps: bool,
    /// 시간 범위 파싱에 사용할 기본 레이아웃 이름
    pub default_layout: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: 64 * 1024,
            skip_empty_lines: true,
            normalize_timestamps: false,
            default_layout: "apache".to_owned(),
        }
    }
}

impl PipelineConfig {
    /// core의 `LogPipelineConfig`에서 파이프라인 설정을 생성합니다.
    pub fn from_core(core: &logsieve_core::config::LogPipelineConfig) -> Self {
        Self {
            max_line_bytes: core.max_line_bytes,
            skip_empty_lines: core.skip_empty_lines,
            normalize_timestamps: core.normalize_timestamps,
            default_layout: core.default_layout.clone(),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES_LIMIT {
            return Err(LogPipelineError::Config {
                field: "max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES_LIMIT),
            });
        }

        if TimeLayout::by_name(&self.default_layout).is_err() {
            return Err(LogPipelineError::Config {
                field: "default_layout".to_owned(),
                reason: format!(
                    "'{}' is not one of: {}",
                    self.default_layout,
                    TimeLayout::builtin_names().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        Ok(())
    }

    /// 기본 레이아웃 이름에 해당하는 레이아웃을 반환합니다.
    pub fn layout(&self) -> Result<TimeLayout, LogPipelineError> {
        TimeLayout::by_name(&self.default_layout)
    }
}

/// 파이프라인 설정 빌더
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 최대 라인 크기를 설정합니다.
    pub fn max_line_bytes(mut self, bytes: usize) -> Self {
        self.config.max_line_bytes = bytes;
        self
    }

    /// 빈 라인 건너뛰기 여부를 설정합니다.
    pub fn skip_empty_lines(mut self, skip: bool) -> Self {
        self.config.skip_empty_lines = skip;
        self
    }

    /// 수집 후 타임스탬프 정규화 여부를 설정합니다.
    pub fn normalize_timestamps(mut self, normalize: bool) -> Self {
        self.config.normalize_timestamps = normalize;
        self
    }

    /// 기본 레이아웃 이름을 설정합니다.
    pub fn default_layout(mut self, name: impl Into<String>) -> Self {
        self.config.default_layout = name.into();
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, LogPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

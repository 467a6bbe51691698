//! 로그 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 로그 파이프라인 내부에서 발생하는 에러를 표현합니다.
//! 형식 분류와 필드 추출은 실패 채널이 없으며(불일치 시 `Unknown` 또는 빈 레코드),
//! 명시적 에러는 시간 범위 파싱, 문법 컴파일, 설정, I/O에서만 발생합니다.
//! `From<LogPipelineError> for LogsieveError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use std::fmt;

use logsieve_core::error::{ConfigError, LogsieveError, ParseError};

/// 시간 범위 표현식의 어느 쪽이 실패했는지 나타냅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSide {
    /// `<start> to <end>`의 왼쪽
    Start,
    /// `<start> to <end>`의 오른쪽
    End,
}

impl fmt::Display for RangeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// `last <N><unit>`의 단위를 인식할 수 없음
    #[error("invalid time unit: {0}")]
    InvalidTimeUnit(String),

    /// `last` 뒤의 수량이 정수가 아니거나 범위를 벗어남
    #[error("invalid time value: {0}")]
    InvalidTimeValue(String),

    /// 표현식이 `last ...` 또는 `<start> to <end>` 형태가 아님
    #[error("invalid time range format: '{0}'")]
    InvalidRangeFormat(String),

    /// 범위 한쪽을 레이아웃으로 파싱하지 못함
    #[error("invalid {side} time '{value}': {reason}")]
    InvalidRangeBound {
        /// 실패한 쪽
        side: RangeSide,
        /// 입력 값
        value: String,
        /// 실패 사유
        reason: String,
    },

    /// 이름으로 찾을 수 없는 타임스탬프 레이아웃
    #[error("unknown time layout: {0}")]
    UnknownLayout(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 문법 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl LogPipelineError {
    /// 시간 범위 파싱 관련 에러인지 확인합니다.
    pub fn is_time_range(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeUnit(_)
                | Self::InvalidTimeValue(_)
                | Self::InvalidRangeFormat(_)
                | Self::InvalidRangeBound { .. }
        )
    }
}

impl From<LogPipelineError> for LogsieveError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::Io(e) => LogsieveError::Io(e),
            LogPipelineError::Config { field, reason } => {
                LogsieveError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogPipelineError::UnknownLayout(name) => {
                LogsieveError::Config(ConfigError::InvalidValue {
                    field: "layout".to_owned(),
                    reason: format!("unknown time layout: {name}"),
                })
            }
            LogPipelineError::Regex(e) => LogsieveError::Parse(ParseError::Grammar(e.to_string())),
            other => LogsieveError::Parse(ParseError::TimeRange(other.to_string())),
        }
    }
}

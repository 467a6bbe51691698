//! 도메인 타입 -- 파이프라인 전역에서 사용되는 공통 타입
//!
//! 추출기가 생성하는 정규화 레코드 [`Record`]와
//! 분류기가 반환하는 형식 태그 [`FormatTag`]를 정의합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// 정규화된 로그 레코드
///
/// 모든 필드는 독립적으로 선택적이며, 값이 없으면 빈 문자열 또는 0입니다.
/// 추출기가 한 번 생성한 레코드는 변경되지 않으며, 파이프라인만
/// 타임스탬프 정규화 등 후처리를 수행할 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    /// 원본 또는 정규화된 타임스탬프 문자열
    pub timestamp: String,
    /// 로그 레벨 토큰
    pub level: String,
    /// 자유 형식 메시지
    pub message: String,
    /// 출발지 주소
    pub ip: String,
    /// User-Agent
    pub user_agent: String,
    /// 메서드와 경로 (예: "GET /index.html")
    pub request: String,
    /// HTTP 상태 코드 (없거나 파싱 실패 시 0)
    pub status_code: i64,
}

impl Record {
    /// 모든 필드가 비어 있는 레코드인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 요청 문자열의 첫 토큰(HTTP 메서드)을 반환합니다.
    pub fn method(&self) -> Option<&str> {
        self.request.split_whitespace().next()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.timestamp)?;
        if !self.level.is_empty() {
            write!(f, " {}", self.level)?;
        }
        if !self.ip.is_empty() {
            write!(f, " {}", self.ip)?;
        }
        if !self.request.is_empty() {
            write!(f, " \"{}\"", self.request)?;
        }
        if self.status_code != 0 {
            write!(f, " {}", self.status_code)?;
        }
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }
        Ok(())
    }
}

/// 로그 형식 태그
///
/// 분류기의 결과로, 다섯 가지 문법 중 하나 또는 `Unknown`입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatTag {
    /// 구조화 데이터 (JSON 객체)
    Structured,
    /// Common Log Format 접근 로그
    CombinedAccess,
    /// `key=value` 토큰 나열
    KeyValue,
    /// `<PRI>VERSION` 헤더로 시작하는 syslog
    SyslogTag,
    /// referrer/user-agent가 붙은 Apache 접근 로그
    ApacheStyle,
    /// 어떤 문법에도 매칭되지 않음
    Unknown,
}

impl FormatTag {
    /// 알려진 형식 목록 (`Unknown` 제외)
    pub const KNOWN: [FormatTag; 5] = [
        Self::Structured,
        Self::CombinedAccess,
        Self::KeyValue,
        Self::SyslogTag,
        Self::ApacheStyle,
    ];

    /// 안정적인 형식 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::CombinedAccess => "combined-access",
            Self::KeyValue => "key-value",
            Self::SyslogTag => "syslog-tag",
            Self::ApacheStyle => "apache-style",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structured" => Ok(Self::Structured),
            "combined-access" => Ok(Self::CombinedAccess),
            "key-value" => Ok(Self::KeyValue),
            "syslog-tag" => Ok(Self::SyslogTag),
            "apache-style" => Ok(Self::ApacheStyle),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseError::UnsupportedFormat(other.to_owned())),
        }
    }
}

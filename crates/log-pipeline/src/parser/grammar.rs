//! 형식별 문법(grammar) 정의
//!
//! 분류기와 추출기가 공유하는 고정 정규식 목록입니다.
//! 전역 가변 상태를 두지 않도록 [`Grammars::compile`]로 한 번 컴파일한 뒤
//! 각 컴포넌트 생성 시 주입합니다. `Regex`는 내부적으로 참조 카운팅되므로
//! 복제 비용이 작습니다.

use regex::Regex;

use crate::error::LogPipelineError;

/// Common Log Format 접근 로그 (양 끝 고정)
///
/// `host - user [timestamp] "METHOD path protocol" status size|-`
pub const COMBINED_ACCESS_PATTERN: &str =
    r#"^(\S+) - (\S+) \[(.*?)\] "(\S+) (.*?) (\S+)" (\d+) (\d+|-)$"#;

/// Apache 접근 로그: 접근 로그 뒤에 referrer, user-agent 필드가 추가되며
/// 응답 크기는 반드시 숫자입니다.
pub const APACHE_STYLE_PATTERN: &str =
    r#"^(\S+) - (\S+) \[(.*?)\] "(\S+) (.*?) (\S+)" (\d+) (\d+) "(.*?)" "(.*?)"$"#;

/// RFC 5424 스타일 헤더 `<PRI>VERSION` (시작 위치만 고정)
pub const SYSLOG_TAG_PATTERN: &str = r"^<\d+>\d+";

/// 컴파일할 문법 패턴 목록
///
/// 기본값은 위의 상수들이며, 테스트나 확장 시 개별 패턴을 교체할 수 있습니다.
#[derive(Debug, Clone)]
pub struct GrammarPatterns {
    /// 접근 로그 패턴
    pub combined_access: String,
    /// Apache 접근 로그 패턴
    pub apache_style: String,
    /// syslog 헤더 패턴
    pub syslog_tag: String,
}

impl Default for GrammarPatterns {
    fn default() -> Self {
        Self {
            combined_access: COMBINED_ACCESS_PATTERN.to_owned(),
            apache_style: APACHE_STYLE_PATTERN.to_owned(),
            syslog_tag: SYSLOG_TAG_PATTERN.to_owned(),
        }
    }
}

/// 컴파일된 문법 세트 (생성 후 불변)
#[derive(Debug, Clone)]
pub struct Grammars {
    pub(crate) combined_access: Regex,
    pub(crate) apache_style: Regex,
    pub(crate) syslog_tag: Regex,
}

impl Grammars {
    /// 기본 패턴으로 문법 세트를 컴파일합니다.
    pub fn compile() -> Result<Self, LogPipelineError> {
        Self::from_patterns(&GrammarPatterns::default())
    }

    /// 지정한 패턴으로 문법 세트를 컴파일합니다.
    pub fn from_patterns(patterns: &GrammarPatterns) -> Result<Self, LogPipelineError> {
        Ok(Self {
            combined_access: Regex::new(&patterns.combined_access)?,
            apache_style: Regex::new(&patterns.apache_style)?,
            syslog_tag: Regex::new(&patterns.syslog_tag)?,
        })
    }
}

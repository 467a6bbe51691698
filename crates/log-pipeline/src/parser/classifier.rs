//! 로그 형식 분류기
//!
//! 한 줄의 로그를 받아 가장 먼저 매칭되는 문법의 [`FormatTag`]를 반환합니다.
//!
//! # 우선순위 (첫 매칭 우선)
//! 1. `structured` -- JSON 객체로 파싱 가능
//! 2. `combined-access` -- 접근 로그 문법 (양 끝 고정)
//! 3. `key-value` -- `=`와 공백을 모두 포함
//! 4. `syslog-tag` -- `<PRI>VERSION` 헤더로 시작
//! 5. `apache-style` -- referrer/user-agent가 붙은 접근 로그
//!
//! 문법들이 서로 겹치므로 순서가 결과를 결정합니다. 3번 key-value 검사는 매우
//! 느슨해서, 따옴표 필드 안에 `=`가 있는 Apache 로그도 key-value로 분류됩니다.
//! 이는 의도적으로 보존된 우선순위 특성입니다.

use logsieve_core::types::FormatTag;
use regex::Regex;

use super::grammar::Grammars;

/// 분류 규칙 하나의 판정 방식
#[derive(Debug, Clone)]
pub enum Predicate {
    /// JSON 객체(문자열 키 매핑)로 파싱되는지 (구문 검사만 수행)
    StructuredObject,
    /// `=`와 공백을 모두 포함하는지
    KeyValueHeuristic,
    /// 정규식 매칭
    Pattern(Regex),
}

impl Predicate {
    /// 라인이 이 판정을 만족하는지 확인합니다.
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::StructuredObject => {
                serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(line).is_ok()
            }
            Self::KeyValueHeuristic => line.contains('=') && line.contains(' '),
            Self::Pattern(re) => re.is_match(line),
        }
    }
}

/// 로그 형식 분류기
///
/// `(FormatTag, Predicate)` 쌍의 순서 있는 목록을 보관하며,
/// 생성 이후에는 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct FormatClassifier {
    rules: Vec<(FormatTag, Predicate)>,
}

impl FormatClassifier {
    /// 컴파일된 문법으로 기본 우선순위 분류기를 생성합니다.
    pub fn new(grammars: &Grammars) -> Self {
        let rules = vec![
            (FormatTag::Structured, Predicate::StructuredObject),
            (
                FormatTag::CombinedAccess,
                Predicate::Pattern(grammars.combined_access.clone()),
            ),
            (FormatTag::KeyValue, Predicate::KeyValueHeuristic),
            (
                FormatTag::SyslogTag,
                Predicate::Pattern(grammars.syslog_tag.clone()),
            ),
            (
                FormatTag::ApacheStyle,
                Predicate::Pattern(grammars.apache_style.clone()),
            ),
        ];
        Self { rules }
    }

    /// 라인의 형식을 판별합니다. 어떤 문법에도 맞지 않으면 `Unknown`을 반환합니다.
    pub fn classify(&self, line: &str) -> FormatTag {
        self.rules
            .iter()
            .find(|(_, predicate)| predicate.matches(line))
            .map(|(tag, _)| *tag)
            .unwrap_or(FormatTag::Unknown)
    }

    /// 우선순위와 무관하게 특정 형식의 판정만 수행합니다.
    pub fn satisfies(&self, tag: FormatTag, line: &str) -> bool {
        self.rules
            .iter()
            .any(|(t, predicate)| *t == tag && predicate.matches(line))
    }

    /// 시도 순서대로 형식 태그를 반환합니다.
    pub fn priority(&self) -> impl Iterator<Item = FormatTag> + '_ {
        self.rules.iter().map(|(tag, _)| *tag)
    }
}

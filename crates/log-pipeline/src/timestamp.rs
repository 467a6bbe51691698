//! 타임스탬프 추출, 레이아웃 감지, RFC 3339 정규화
//!
//! # 책임
//! - **추출**: 원시 라인에서 타임스탬프처럼 보이는 부분 문자열을 찾습니다.
//! - **레이아웃 감지**: 레코드 모음에 대해 알려진 레이아웃을 순서대로 시도합니다.
//! - **정규화**: 감지된 레이아웃으로 각 레코드를 다시 파싱하여 RFC 3339로 덮어씁니다.
//!
//! 모든 후보 목록은 생성 시 고정되며, 실패는 정상적인 결과입니다
//! (빈 문자열, 기본 레이아웃, 원본 유지).

use std::borrow::Cow;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc,
    Weekday,
};
use logsieve_core::types::Record;
use regex::Regex;
use serde::Serialize;

use crate::error::LogPipelineError;

/// 라인에서 타임스탬프를 찾기 위한 패턴 (시도 순서대로)
const EXTRACTION_PATTERNS: [&str; 6] = [
    r"\[([^\]]+)\]",                                // [timestamp]
    r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}.\d+)",   // ISO 8601 + 소수 초
    r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})",       // ISO 8601
    r"(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2})",       // YYYY/MM/DD HH:MM:SS
    r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})",       // YYYY-MM-DD HH:MM:SS
    r"([A-Z][a-z]{2} \d{2} \d{2}:\d{2}:\d{2})",     // Mon DD HH:MM:SS
];

/// 내장 레이아웃: (이름, 참조 표기, chrono 포맷)
const BUILTIN_LAYOUTS: [(&str, &str, &str); 9] = [
    ("apache", "02/Jan/2006:15:04:05 -0700", "%d/%b/%Y:%H:%M:%S %z"),
    ("syslog", "Jan 02 15:04:05", "%b %d %H:%M:%S"),
    ("rfc3339", "2006-01-02T15:04:05Z", "%Y-%m-%dT%H:%M:%SZ"),
    ("rfc3339-millis", "2006-01-02T15:04:05.999Z", "%Y-%m-%dT%H:%M:%S%.fZ"),
    ("slash-datetime", "2006/01/02 15:04:05", "%Y/%m/%d %H:%M:%S"),
    ("dash-datetime", "2006-01-02 15:04:05", "%Y-%m-%d %H:%M:%S"),
    ("apache-alt", "02/Jan/2006 15:04:05", "%d/%b/%Y %H:%M:%S"),
    ("unix-date", "Mon Jan 02 15:04:05 2006", "%a %b %d %H:%M:%S %Y"),
    ("syslog-zone", "Jan 02 15:04:05 MST 2006", "%b %d %H:%M:%S %Z %Y"),
];

const OFFSET_SPECIFIERS: &[&str] = &["%z", "%:z", "%::z", "%#z", "%+", "%s"];
const YEAR_SPECIFIERS: &[&str] = &["%Y", "%y", "%G", "%g", "%C", "%D", "%F", "%x", "%c", "%+", "%s"];
const TIME_SPECIFIERS: &[&str] = &[
    "%H", "%k", "%I", "%l", "%T", "%R", "%r", "%X", "%c", "%+", "%s",
];

/// `%S` 바로 뒤에 이미 소수 초를 기술하는 포맷 조각
const FRACTION_PREFIXES: &[&str] = &["%.", "%f", "%3f", "%6f", "%9f", ".%"];

fn contains_any(format: &str, specifiers: &[&str]) -> bool {
    specifiers.iter().any(|s| format.contains(s))
}

/// 초 필드 뒤에 선택적 소수 초(`%.f`)를 끼워 넣습니다.
///
/// 레이아웃이 소수 초를 기술하지 않아도 `12:00:01.250`처럼 소수 초가 붙은
/// 입력을 받아들이며, 소수 부분은 정규화 시 버려집니다.
fn with_optional_fraction(format: &str) -> Cow<'_, str> {
    if !format.contains("%S") {
        return Cow::Borrowed(format);
    }

    let mut out = String::with_capacity(format.len() + 8);
    let mut rest = format;
    while let Some(idx) = rest.find("%S") {
        let (head, tail) = rest.split_at(idx + 2);
        out.push_str(head);
        if !FRACTION_PREFIXES.iter().any(|p| tail.starts_with(p)) {
            out.push_str("%.f");
        }
        rest = tail;
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// 요일 필드(`%a`, `%A`)를 포맷과 입력에서 함께 제거합니다.
///
/// 요일은 이름 형식만 확인하고 날짜와 일치하는지는 보지 않습니다.
/// 공백으로 나눈 토큰 수가 다르거나 요일 이름이 아니면 `None`입니다.
fn strip_weekday(format: &str, input: &str) -> Option<(String, String)> {
    let format_tokens: Vec<&str> = format.split(' ').collect();
    let input_tokens: Vec<&str> = input.split(' ').collect();
    if format_tokens.len() != input_tokens.len() {
        return None;
    }

    let idx = format_tokens
        .iter()
        .position(|t| t.starts_with("%a") || t.starts_with("%A"))?;
    let suffix = &format_tokens[idx][2..];
    let name = input_tokens[idx].strip_suffix(suffix)?;
    name.parse::<Weekday>().ok()?;

    let without = |tokens: &[&str]| {
        tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, t)| *t)
            .collect::<Vec<_>>()
            .join(" ")
    };
    Some((without(&format_tokens), without(&input_tokens)))
}

/// 타임스탬프 레이아웃 기술자
///
/// chrono `strftime` 포맷과 사람이 읽기 위한 참조 표기를 함께 보관합니다.
///
/// 파싱 규칙:
/// - 오프셋(`%z`)이 있으면 해당 오프셋으로 읽습니다.
/// - 오프셋이 없으면 UTC로 간주합니다.
/// - 시각 필드가 없으면 자정으로 간주합니다.
/// - 연도 필드가 없으면 현재 UTC 연도를 사용합니다 (BSD syslog 관례).
/// - 초 필드 뒤의 소수 초는 포맷에 없어도 허용합니다.
/// - 요일은 이름 형식만 확인하고 날짜와 대조하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeLayout {
    name: String,
    reference: String,
    format: String,
}

impl TimeLayout {
    /// 새 레이아웃을 생성합니다.
    pub fn new(
        name: impl Into<String>,
        reference: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            format: format.into(),
        }
    }

    /// chrono 포맷 문자열만으로 사용자 정의 레이아웃을 생성합니다.
    pub fn custom(format: impl Into<String>) -> Self {
        let format = format.into();
        Self::new("custom", format.clone(), format)
    }

    /// 내장 레이아웃 9종을 감지 순서대로 반환합니다.
    pub fn builtin() -> Vec<Self> {
        BUILTIN_LAYOUTS
            .iter()
            .map(|(name, reference, format)| Self::new(*name, *reference, *format))
            .collect()
    }

    /// 이름으로 내장 레이아웃을 찾습니다.
    pub fn by_name(name: &str) -> Result<Self, LogPipelineError> {
        BUILTIN_LAYOUTS
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(n, reference, format)| Self::new(*n, *reference, *format))
            .ok_or_else(|| LogPipelineError::UnknownLayout(name.to_owned()))
    }

    /// 내장 레이아웃 이름 목록
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_LAYOUTS.iter().map(|(name, _, _)| *name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 참조 표기 (예: `02/Jan/2006:15:04:05 -0700`)
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// chrono 포맷 문자열
    pub fn format(&self) -> &str {
        &self.format
    }

    /// 현재 UTC 연도를 기본 연도로 사용하여 파싱합니다.
    pub fn parse(&self, input: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        self.parse_with_year(input, Utc::now().year())
    }

    /// 연도 필드가 없는 레이아웃에 `default_year`를 적용하여 파싱합니다.
    pub fn parse_with_year(
        &self,
        input: &str,
        default_year: i32,
    ) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        let stripped = strip_weekday(&self.format, input);
        let (format, input) = match &stripped {
            Some((format, input)) => (format.as_str(), input.as_str()),
            None => (self.format.as_str(), input),
        };
        let format = with_optional_fraction(format);
        let format = format.as_ref();

        if contains_any(format, OFFSET_SPECIFIERS) {
            return DateTime::parse_from_str(input, format);
        }

        if !contains_any(format, YEAR_SPECIFIERS) {
            let with_year = format!("{default_year} {input}");
            let format_with_year = format!("%Y {format}");
            return NaiveDateTime::parse_from_str(&with_year, &format_with_year)
                .map(|naive| naive.and_utc().fixed_offset());
        }

        if !contains_any(format, TIME_SPECIFIERS) {
            return NaiveDate::parse_from_str(input, format)
                .map(|date| date.and_time(NaiveTime::default()).and_utc().fixed_offset());
        }

        NaiveDateTime::parse_from_str(input, format).map(|naive| naive.and_utc().fixed_offset())
    }
}

impl Default for TimeLayout {
    /// 내장 레이아웃 목록의 첫 번째 (`apache`)
    fn default() -> Self {
        let (name, reference, format) = BUILTIN_LAYOUTS[0];
        Self::new(name, reference, format)
    }
}

/// 정규화 결과를 RFC 3339 문자열로 변환합니다 (초 단위, UTC는 `Z`).
pub fn to_canonical(instant: &DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// 타임스탬프 추출/감지/정규화기
///
/// 추출 패턴과 레이아웃 목록은 생성 시 고정됩니다.
#[derive(Debug, Clone)]
pub struct TimestampNormalizer {
    patterns: Vec<Regex>,
    layouts: Vec<TimeLayout>,
}

impl TimestampNormalizer {
    /// 기본 추출 패턴과 내장 레이아웃으로 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Self::with_layouts(TimeLayout::builtin())
    }

    /// 지정한 레이아웃 목록으로 생성합니다. 첫 번째 레이아웃이 기본값입니다.
    pub fn with_layouts(layouts: Vec<TimeLayout>) -> Result<Self, LogPipelineError> {
        if layouts.is_empty() {
            return Err(LogPipelineError::Config {
                field: "layouts".to_owned(),
                reason: "at least one time layout is required".to_owned(),
            });
        }

        let patterns = EXTRACTION_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns, layouts })
    }

    /// 감지 순서대로 레이아웃 목록을 반환합니다.
    pub fn layouts(&self) -> &[TimeLayout] {
        &self.layouts
    }

    /// 기본(첫 번째) 레이아웃
    pub fn default_layout(&self) -> &TimeLayout {
        // with_layouts에서 비어 있지 않음을 보장
        &self.layouts[0]
    }

    /// 원시 라인에서 타임스탬프 부분 문자열을 추출합니다.
    ///
    /// 첫 번째로 매칭되는 패턴의 첫 캡처 그룹을 반환하며,
    /// 어떤 패턴도 맞지 않으면 빈 문자열입니다.
    pub fn extract_timestamp(&self, line: &str) -> String {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default()
    }

    /// 레코드 모음에서 타임스탬프 레이아웃을 감지합니다.
    ///
    /// 타임스탬프가 있는 레코드를 순서대로 보며 각 레이아웃을 차례로 시도하고,
    /// 처음 성공한 레이아웃을 반환합니다. 아무것도 맞지 않으면 기본 레이아웃입니다.
    pub fn detect_time_layout(&self, records: &[Record]) -> &TimeLayout {
        let year = Utc::now().year();
        records
            .iter()
            .filter(|r| !r.timestamp.is_empty())
            .find_map(|r| {
                self.layouts
                    .iter()
                    .find(|layout| layout.parse_with_year(&r.timestamp, year).is_ok())
            })
            .unwrap_or_else(|| self.default_layout())
    }

    /// 레코드 타임스탬프를 감지된 레이아웃으로 다시 파싱하여 RFC 3339로 덮어씁니다.
    ///
    /// 파싱에 실패한 레코드는 원본 문자열을 유지합니다.
    /// 다시 쓴 레코드 수를 반환합니다.
    pub fn normalize_timestamps(&self, records: &mut [Record]) -> usize {
        let layout = self.detect_time_layout(records).clone();
        let year = Utc::now().year();
        let mut rewritten = 0;

        for record in records.iter_mut().filter(|r| !r.timestamp.is_empty()) {
            if let Ok(instant) = layout.parse_with_year(&record.timestamp, year) {
                record.timestamp = to_canonical(&instant);
                rewritten += 1;
            }
        }

        tracing::debug!(layout = layout.name(), rewritten, "normalized timestamps");
        rewritten
    }
}

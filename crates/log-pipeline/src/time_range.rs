//! 시간 범위 표현식 파싱
//!
//! 두 가지 형태를 지원합니다.
//! - 상대 범위: `last 24h`, `last 7d`, `last 3 months`
//! - 절대 범위: `<start> to <end>` (양쪽 모두 지정한 레이아웃으로 파싱)

use chrono::{DateTime, Days, Months, TimeDelta, Utc};
use serde::Serialize;

use crate::error::{LogPipelineError, RangeSide};
use crate::timestamp::TimeLayout;

const RELATIVE_PREFIX: &str = "last ";
const ABSOLUTE_SEPARATOR: &str = " to ";

/// 닫힌 시간 구간 `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// 시각이 구간 안에 있는지 확인합니다 (양 끝 포함).
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

/// 현재 시각을 기준으로 시간 범위 표현식을 파싱합니다.
pub fn parse_time_range(expr: &str, layout: &TimeLayout) -> Result<TimeRange, LogPipelineError> {
    parse_time_range_at(expr, layout, Utc::now())
}

/// 기준 시각 `now`를 지정하여 시간 범위 표현식을 파싱합니다.
pub fn parse_time_range_at(
    expr: &str,
    layout: &TimeLayout,
    now: DateTime<Utc>,
) -> Result<TimeRange, LogPipelineError> {
    if let Some(relative) = expr.strip_prefix(RELATIVE_PREFIX) {
        let start = relative_start(relative, now)?;
        return Ok(TimeRange { start, end: now });
    }

    if expr.contains(ABSOLUTE_SEPARATOR) {
        let parts: Vec<&str> = expr.split(ABSOLUTE_SEPARATOR).collect();
        let [start, end] = parts.as_slice() else {
            return Err(LogPipelineError::InvalidRangeFormat(expr.to_owned()));
        };

        return Ok(TimeRange {
            start: parse_bound(start.trim(), layout, RangeSide::Start)?,
            end: parse_bound(end.trim(), layout, RangeSide::End)?,
        });
    }

    Err(LogPipelineError::InvalidRangeFormat(expr.to_owned()))
}

fn parse_bound(
    value: &str,
    layout: &TimeLayout,
    side: RangeSide,
) -> Result<DateTime<Utc>, LogPipelineError> {
    layout
        .parse(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LogPipelineError::InvalidRangeBound {
            side,
            value: value.to_owned(),
            reason: e.to_string(),
        })
}

/// `<N><unit>`을 해석하여 `now`에서 N 단위만큼 뺀 시각을 반환합니다.
fn relative_start(spec: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, LogPipelineError> {
    let spec = spec.trim_start();
    let digits_end = spec
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(spec.len());
    let (digits, rest) = spec.split_at(digits_end);

    let value: u32 = digits
        .parse()
        .map_err(|_| LogPipelineError::InvalidTimeValue(spec.to_owned()))?;
    let unit = rest.trim();
    let overflow = || LogPipelineError::InvalidTimeValue(spec.to_owned());

    let start = match unit {
        "m" | "min" => TimeDelta::try_minutes(i64::from(value))
            .and_then(|delta| now.checked_sub_signed(delta)),
        "h" | "hr" | "hrs" => TimeDelta::try_hours(i64::from(value))
            .and_then(|delta| now.checked_sub_signed(delta)),
        "d" | "day" | "days" => now.checked_sub_days(Days::new(u64::from(value))),
        "w" | "week" | "weeks" => now.checked_sub_days(Days::new(u64::from(value) * 7)),
        "M" | "month" | "months" => now.checked_sub_months(Months::new(value)),
        "y" | "year" | "years" => value
            .checked_mul(12)
            .and_then(|months| now.checked_sub_months(Months::new(months))),
        other => return Err(LogPipelineError::InvalidTimeUnit(other.to_owned())),
    };

    start.ok_or_else(overflow)
}

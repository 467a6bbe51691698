//! 레코드 질의, 개수 집계, 필드별 그룹화
//!
//! 모든 필터는 AND로 결합되며, 설정되지 않은 필터(`None`)는 무시됩니다.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use logsieve_core::types::Record;

use crate::time_range::TimeRange;
use crate::timestamp::TimeLayout;

/// 질의 필터 옵션
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// 출발지 주소 (정확히 일치)
    pub ip: Option<String>,
    /// 상태 코드 (정확히 일치)
    pub status_code: Option<i64>,
    /// 로그 레벨 (대소문자 무시)
    pub level: Option<String>,
    /// message 또는 request에 포함된 텍스트 (대소문자 무시)
    pub contains: Option<String>,
    /// 이 시각 이전의 레코드 제외
    pub start_time: Option<DateTime<Utc>>,
    /// 이 시각 이후의 레코드 제외
    pub end_time: Option<DateTime<Utc>>,
    /// HTTP 메서드 (대소문자 무시)
    pub request_method: Option<String>,
    /// 상태 코드 하한 (포함)
    pub min_status: Option<i64>,
    /// 상태 코드 상한 (포함)
    pub max_status: Option<i64>,
    /// 최대 결과 수
    pub limit: Option<usize>,
    /// 시간 필터에 사용할 레이아웃 (기본: 첫 번째 내장 레이아웃)
    pub time_layout: Option<TimeLayout>,
}

impl QueryOptions {
    /// 시작/종료 시각을 시간 범위로 설정합니다.
    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.start_time = Some(range.start);
        self.end_time = Some(range.end);
        self
    }

    fn has_time_filter(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }

    fn matches_fields(&self, record: &Record) -> bool {
        if let Some(ip) = &self.ip {
            if record.ip != *ip {
                return false;
            }
        }

        if let Some(status) = self.status_code {
            if record.status_code != status {
                return false;
            }
        }

        if let Some(level) = &self.level {
            if !record.level.eq_ignore_ascii_case(level) {
                return false;
            }
        }

        if let Some(needle) = &self.contains {
            let needle = needle.to_lowercase();
            if !record.message.to_lowercase().contains(&needle)
                && !record.request.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(method) = &self.request_method {
            let prefix = format!("{} ", method.to_uppercase());
            if !record.request.to_uppercase().starts_with(&prefix) {
                return false;
            }
        }

        if self.min_status.is_some_and(|min| record.status_code < min) {
            return false;
        }

        if self.max_status.is_some_and(|max| record.status_code > max) {
            return false;
        }

        true
    }

    /// 타임스탬프가 시간 필터를 통과하는지 확인합니다.
    ///
    /// 어떤 레이아웃으로도 파싱할 수 없는 타임스탬프는 통과시킵니다.
    fn matches_time(&self, record: &Record, layout: &TimeLayout) -> bool {
        let Some(instant) = record_instant(&record.timestamp, layout) else {
            return true;
        };

        if self.start_time.is_some_and(|start| instant < start) {
            return false;
        }
        if self.end_time.is_some_and(|end| instant > end) {
            return false;
        }
        true
    }
}

fn record_instant(timestamp: &str, layout: &TimeLayout) -> Option<DateTime<Utc>> {
    layout
        .parse(timestamp)
        .or_else(|_| DateTime::parse_from_rfc3339(timestamp))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 필터를 만족하는 레코드를 입력 순서대로 반환합니다.
pub fn query(records: &[Record], options: &QueryOptions) -> Vec<Record> {
    let layout = options.time_layout.clone().unwrap_or_default();

    let matched = records
        .iter()
        .filter(|r| options.matches_fields(r))
        .filter(|r| !options.has_time_filter() || options.matches_time(r, &layout))
        .cloned();

    match options.limit {
        Some(limit) if limit > 0 => matched.take(limit).collect(),
        _ => matched.collect(),
    }
}

/// 필터를 만족하는 레코드 수를 반환합니다.
pub fn count(records: &[Record], options: &QueryOptions) -> usize {
    query(records, options).len()
}

/// 그룹화 기준 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Ip,
    Level,
    /// 상태 코드 (십진 문자열)
    Status,
    /// 요청의 첫 토큰 (HTTP 메서드)
    Request,
    /// 알 수 없는 필드명. 모든 레코드가 `"unknown"` 키로 집계됩니다.
    Unknown,
}

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Level => "level",
            Self::Status => "status",
            Self::Request => "request",
            Self::Unknown => "unknown",
        }
    }

    fn key(&self, record: &Record) -> String {
        match self {
            Self::Ip => record.ip.clone(),
            Self::Level => record.level.clone(),
            Self::Status if record.status_code == 0 => String::new(),
            Self::Status => record.status_code.to_string(),
            Self::Request => record.method().unwrap_or_default().to_owned(),
            Self::Unknown => "unknown".to_owned(),
        }
    }
}

impl From<&str> for GroupField {
    fn from(name: &str) -> Self {
        match name {
            "ip" => Self::Ip,
            "level" => Self::Level,
            "status" => Self::Status,
            "request" => Self::Request,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 필드 값별 레코드 수를 집계합니다. 빈 키는 집계하지 않습니다.
pub fn group_by(records: &[Record], field: GroupField) -> BTreeMap<String, usize> {
    let mut groups = BTreeMap::new();
    for key in records.iter().map(|r| field.key(r)) {
        if !key.is_empty() {
            *groups.entry(key).or_insert(0) += 1;
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(ip: &str, level: &str, request: &str, status: i64, ts: &str) -> Record {
        Record {
            ip: ip.to_owned(),
            level: level.to_owned(),
            request: request.to_owned(),
            status_code: status,
            timestamp: ts.to_owned(),
            message: format!("{level} from {ip}"),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record("10.0.0.1", "INFO", "GET /index.html", 200, "10/Oct/2000:13:55:36 -0700"),
            record("10.0.0.2", "warn", "POST /login", 401, "11/Oct/2000:08:00:00 +0000"),
            record("10.0.0.1", "error", "GET /admin", 500, "12/Oct/2000:09:30:00 +0000"),
            record("10.0.0.3", "info", "", 0, "not a timestamp"),
        ]
    }

    #[test]
    fn empty_options_match_everything() {
        assert_eq!(query(&sample(), &QueryOptions::default()).len(), 4);
    }

    #[test]
    fn filters_compose_with_and() {
        let options = QueryOptions {
            ip: Some("10.0.0.1".to_owned()),
            request_method: Some("get".to_owned()),
            min_status: Some(400),
            ..Default::default()
        };
        let results = query(&sample(), &options);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].request, "GET /admin");
    }

    #[test]
    fn level_is_case_insensitive() {
        let options = QueryOptions {
            level: Some("info".to_owned()),
            ..Default::default()
        };
        assert_eq!(count(&sample(), &options), 2);
    }

    #[test]
    fn contains_checks_message_and_request() {
        let options = QueryOptions {
            contains: Some("LOGIN".to_owned()),
            ..Default::default()
        };
        assert_eq!(count(&sample(), &options), 1);

        let options = QueryOptions {
            contains: Some("from 10.0.0.3".to_owned()),
            ..Default::default()
        };
        assert_eq!(count(&sample(), &options), 1);
    }

    #[test]
    fn method_requires_token_boundary() {
        let records = vec![record("", "", "GETX /odd", 200, "")];
        let options = QueryOptions {
            request_method: Some("GET".to_owned()),
            ..Default::default()
        };
        assert_eq!(count(&records, &options), 0);
    }

    #[test]
    fn status_bounds_are_inclusive() {
        let options = QueryOptions {
            min_status: Some(401),
            max_status: Some(500),
            ..Default::default()
        };
        assert_eq!(count(&sample(), &options), 2);

        let exact = QueryOptions {
            status_code: Some(200),
            ..Default::default()
        };
        assert_eq!(count(&sample(), &exact), 1);
    }

    #[test]
    fn limit_truncates_results() {
        let options = QueryOptions {
            limit: Some(2),
            ..Default::default()
        };
        let results = query(&sample(), &options);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ip, "10.0.0.1");
        assert_eq!(results[1].ip, "10.0.0.2");
    }

    #[test]
    fn zero_limit_is_unlimited() {
        let options = QueryOptions {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query(&sample(), &options).len(), 4);
    }

    #[test]
    fn time_filter_keeps_unparsable_timestamps() {
        let options = QueryOptions {
            start_time: Some(Utc.with_ymd_and_hms(2000, 10, 11, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let results = query(&sample(), &options);
        let ips: Vec<&str> = results.iter().map(|r| r.ip.as_str()).collect();
        assert_eq!(ips, vec!["10.0.0.2", "10.0.0.1", "10.0.0.3"]);
    }

    #[test]
    fn time_range_is_inclusive() {
        let range = TimeRange {
            start: Utc.with_ymd_and_hms(2000, 10, 11, 8, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2000, 10, 11, 8, 0, 0).unwrap(),
        };
        let records = &sample()[..3];
        let results = query(records, &QueryOptions::default().with_range(range));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ip, "10.0.0.2");
    }

    #[test]
    fn time_filter_falls_back_to_rfc3339() {
        let records = vec![
            record("a", "", "", 0, "2024-01-15T12:00:00Z"),
            record("b", "", "", 0, "2024-03-01T00:00:00+02:00"),
        ];
        let options = QueryOptions {
            end_time: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let results = query(&records, &options);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ip, "a");
    }

    #[test]
    fn time_filter_uses_custom_layout() {
        let records = vec![
            record("a", "", "", 0, "2024/01/15 12:00:00"),
            record("b", "", "", 0, "2024/06/15 12:00:00"),
        ];
        let options = QueryOptions {
            start_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            time_layout: Some(TimeLayout::by_name("slash-datetime").unwrap()),
            ..Default::default()
        };
        let results = query(&records, &options);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ip, "b");
    }

    #[test]
    fn group_by_ip() {
        let groups = group_by(&sample(), GroupField::Ip);
        assert_eq!(groups["10.0.0.1"], 2);
        assert_eq!(groups["10.0.0.2"], 1);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn group_by_status_uses_decimal_and_skips_zero() {
        let groups = group_by(&sample(), GroupField::Status);
        assert_eq!(groups.get("200"), Some(&1));
        assert_eq!(groups.get("401"), Some(&1));
        assert_eq!(groups.get("500"), Some(&1));
        assert!(!groups.contains_key("0"));
    }

    #[test]
    fn group_by_request_uses_method() {
        let groups = group_by(&sample(), GroupField::Request);
        assert_eq!(groups["GET"], 2);
        assert_eq!(groups["POST"], 1);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn group_by_level_is_case_sensitive() {
        let groups = group_by(&sample(), GroupField::Level);
        assert_eq!(groups["INFO"], 1);
        assert_eq!(groups["info"], 1);
    }

    #[test]
    fn unknown_field_groups_everything_under_unknown() {
        let field = GroupField::from("hostname");
        assert_eq!(field, GroupField::Unknown);
        let groups = group_by(&sample(), field);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["unknown"], 4);
    }

    #[test]
    fn group_field_names() {
        for name in ["ip", "level", "status", "request", "unknown"] {
            assert_eq!(GroupField::from(name).as_str(), name);
        }
    }
}

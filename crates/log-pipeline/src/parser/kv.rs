//! key=value 로그 추출기
//!
//! 공백으로 토큰을 나누고 각 토큰을 첫 번째 `=`에서 분리합니다.
//! 인식하는 키는 `timestamp`, `level`, `message`, `ip`입니다.

use logsieve_core::types::Record;

/// key=value 로그 추출기
///
/// - 인식하지 못한 키와 `=`가 없는 토큰은 버립니다.
/// - 같은 키가 여러 번 나오면 마지막 값이 남습니다.
/// - 토큰 순서는 결과에 영향을 주지 않습니다 (키가 겹치지 않는 한).
#[derive(Debug, Clone, Default)]
pub struct KeyValueExtractor;

impl KeyValueExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, line: &str) -> Record {
        let mut record = Record::default();

        for (key, value) in line.split_whitespace().filter_map(|t| t.split_once('=')) {
            let target = match key {
                "timestamp" => &mut record.timestamp,
                "level" => &mut record.level,
                "message" => &mut record.message,
                "ip" => &mut record.ip,
                _ => continue,
            };
            *target = value.to_owned();
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_recognized_keys() {
        let record = KeyValueExtractor::new()
            .extract("timestamp=2024-01-15T12:00:00Z level=warn message=disk_full ip=10.0.0.1");
        assert_eq!(record.timestamp, "2024-01-15T12:00:00Z");
        assert_eq!(record.level, "warn");
        assert_eq!(record.message, "disk_full");
        assert_eq!(record.ip, "10.0.0.1");
    }

    #[test]
    fn key_order_does_not_matter() {
        let extractor = KeyValueExtractor::new();
        assert_eq!(
            extractor.extract("ip=1.2.3.4 level=warn"),
            extractor.extract("level=warn ip=1.2.3.4")
        );
    }

    #[test]
    fn last_occurrence_wins() {
        let record = KeyValueExtractor::new().extract("level=info level=error");
        assert_eq!(record.level, "error");
    }

    #[test]
    fn splits_on_first_equals_only() {
        let record = KeyValueExtractor::new().extract("message=a=b level=x");
        assert_eq!(record.message, "a=b");
    }

    #[test]
    fn malformed_and_unknown_tokens_are_dropped() {
        let record = KeyValueExtractor::new().extract("user=bob garbage level=debug =orphan");
        assert_eq!(
            record,
            Record {
                level: "debug".to_owned(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn non_kv_line_yields_empty_record() {
        assert!(KeyValueExtractor::new().extract("not a kv line at all").is_empty());
    }
}

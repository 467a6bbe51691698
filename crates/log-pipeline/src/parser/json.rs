//! 구조화(JSON) 로그 추출기
//!
//! JSON 객체의 키를 [`Record`] 필드 이름에 대응시켜 값을 채웁니다.
//! 키 비교는 대소문자를 구분하지 않으므로 `statusCode`, `StatusCode`,
//! `statuscode`가 모두 같은 필드로 매핑됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use logsieve_log_pipeline::parser::StructuredExtractor;
//!
//! let extractor = StructuredExtractor::new();
//! let record = extractor.extract(r#"{"level":"info","message":"ready","statusCode":200}"#);
//! assert_eq!(record.status_code, 200);
//! ```

use logsieve_core::types::Record;
use serde_json::{Map, Value};

/// JSON 객체 로그 추출기
///
/// - 알 수 없는 키는 무시합니다.
/// - 대소문자만 다른 키가 여러 번 나오면 문서상 마지막 값이 남습니다.
/// - 타입이 맞지 않는 값은 해당 필드를 0/빈 값으로 남깁니다.
/// - 객체가 아니거나 JSON이 아니면 빈 레코드를 반환합니다.
#[derive(Debug, Clone, Default)]
pub struct StructuredExtractor;

impl StructuredExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 라인을 JSON 객체로 읽어 레코드를 만듭니다.
    pub fn extract(&self, line: &str) -> Record {
        let Ok(object) = serde_json::from_str::<Map<String, Value>>(line) else {
            return Record::default();
        };

        let mut record = Record::default();
        for (key, value) in &object {
            match key.to_ascii_lowercase().as_str() {
                "timestamp" => assign_string(&mut record.timestamp, value),
                "level" => assign_string(&mut record.level, value),
                "message" => assign_string(&mut record.message, value),
                "ip" => assign_string(&mut record.ip, value),
                "useragent" => assign_string(&mut record.user_agent, value),
                "request" => assign_string(&mut record.request, value),
                "statuscode" => {
                    if let Some(code) = value.as_i64() {
                        record.status_code = code;
                    }
                }
                _ => {}
            }
        }
        record
    }
}

/// 문자열 값일 때만 필드를 채웁니다.
fn assign_string(target: &mut String, value: &Value) {
    if let Value::String(s) = value {
        target.clone_from(s);
    }
}

//! Syslog 추출기
//!
//! `<PRI>VERSION` 헤더로 시작하는 라인을 첫 공백에서 둘로 나눕니다.
//! 헤더는 버리고 나머지 전체를 메시지로 그대로 보존합니다.
//!
//! ```text
//! <34>1 2024-01-15T12:00:00Z host sshd 1234 - - Failed password
//! ^^^^^ ----------------------------------------------------------- message
//! header
//! ```

use logsieve_core::types::Record;

/// Syslog 추출기
#[derive(Debug, Clone, Default)]
pub struct SyslogExtractor;

impl SyslogExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 공백이 없으면 빈 레코드를 반환합니다.
    pub fn extract(&self, line: &str) -> Record {
        match line.split_once(' ') {
            Some((_header, message)) => Record {
                message: message.to_owned(),
                ..Default::default()
            },
            None => Record::default(),
        }
    }
}

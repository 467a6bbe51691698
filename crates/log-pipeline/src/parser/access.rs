//! 접근 로그 추출기 -- Common Log Format 및 Apache(referrer/user-agent 포함) 형식
//!
//! # 형식
//! ```text
//! host - user [timestamp] "METHOD path protocol" status size
//! host - user [timestamp] "METHOD path protocol" status size "referrer" "user-agent"
//! ```

use logsieve_core::types::Record;
use regex::{Captures, Regex};

use super::grammar::Grammars;

/// 캡처 그룹을 문자열로 꺼냅니다. 매칭되지 않은 그룹은 빈 문자열입니다.
fn group<'h>(caps: &Captures<'h>, index: usize) -> &'h str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// 메서드와 경로를 공백 하나로 잇습니다.
fn join_request(method: &str, path: &str) -> String {
    format!("{method} {path}")
}

/// Common Log Format 접근 로그 추출기
///
/// 응답 크기 그룹은 문법에 존재하지만 레코드에는 노출하지 않습니다.
#[derive(Debug, Clone)]
pub struct AccessLogExtractor {
    pattern: Regex,
}

impl AccessLogExtractor {
    pub fn new(grammars: &Grammars) -> Self {
        Self {
            pattern: grammars.combined_access.clone(),
        }
    }

    /// 접근 로그 라인에서 레코드를 추출합니다. 문법 불일치 시 빈 레코드입니다.
    pub fn extract(&self, line: &str) -> Record {
        let Some(caps) = self.pattern.captures(line) else {
            return Record::default();
        };

        Record {
            ip: group(&caps, 1).to_owned(),
            timestamp: group(&caps, 3).to_owned(),
            request: join_request(group(&caps, 4), group(&caps, 5)),
            status_code: group(&caps, 7).parse().unwrap_or(0),
            ..Default::default()
        }
    }
}

/// Apache 접근 로그 추출기
///
/// 메시지는 user-agent, referrer, 응답 바이트 수를 담은 요약 문자열입니다.
/// 응답 크기 파싱 실패는 조용히 0으로 처리합니다.
#[derive(Debug, Clone)]
pub struct ApacheLogExtractor {
    pattern: Regex,
}

impl ApacheLogExtractor {
    pub fn new(grammars: &Grammars) -> Self {
        Self {
            pattern: grammars.apache_style.clone(),
        }
    }

    /// Apache 로그 라인에서 레코드를 추출합니다. 문법 불일치 시 빈 레코드입니다.
    pub fn extract(&self, line: &str) -> Record {
        let Some(caps) = self.pattern.captures(line) else {
            return Record::default();
        };

        let bytes_sent: u64 = group(&caps, 8).parse().unwrap_or(0);
        let referrer = group(&caps, 9);
        let user_agent = group(&caps, 10);

        Record {
            ip: group(&caps, 1).to_owned(),
            timestamp: group(&caps, 3).to_owned(),
            request: join_request(group(&caps, 4), group(&caps, 5)),
            status_code: group(&caps, 7).parse().unwrap_or(0),
            message: format!(
                "User Agent: {user_agent}, Referrer: {referrer}, Bytes Sent: {bytes_sent}"
            ),
            user_agent: user_agent.to_owned(),
            ..Default::default()
        }
    }
}

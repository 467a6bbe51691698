//! 로그 파싱 모듈 -- 형식 분류기와 형식별 추출기
//!
//! [`FormatClassifier`]가 라인의 형식을 판별하고, [`ExtractorSet`]이 형식 태그에
//! 해당하는 [`Extractor`]로 필드를 추출합니다. 추출기는 실패 채널이 없으며,
//! 문법 불일치 시 빈 [`Record`]를 반환합니다.
//!
//! # 지원 형식
//! - 구조화 JSON ([`StructuredExtractor`])
//! - Common Log Format 접근 로그 ([`AccessLogExtractor`])
//! - key=value ([`KeyValueExtractor`])
//! - `<PRI>VERSION` syslog ([`SyslogExtractor`])
//! - Apache 접근 로그 ([`ApacheLogExtractor`])
//!
//! # 사용 예시
//! ```ignore
//! use logsieve_log_pipeline::parser::{ExtractorSet, FormatClassifier, Grammars};
//!
//! let grammars = Grammars::compile()?;
//! let classifier = FormatClassifier::new(&grammars);
//! let extractors = ExtractorSet::new(&grammars);
//!
//! let line = "level=warn ip=10.0.0.1 message=disk";
//! let record = extractors.extract(classifier.classify(line), line);
//! ```

pub mod access;
pub mod classifier;
pub mod grammar;
pub mod json;
pub mod kv;
pub mod syslog;

pub use access::{AccessLogExtractor, ApacheLogExtractor};
pub use classifier::{FormatClassifier, Predicate};
pub use grammar::{GrammarPatterns, Grammars};
pub use json::StructuredExtractor;
pub use kv::KeyValueExtractor;
pub use syslog::SyslogExtractor;

use logsieve_core::types::{FormatTag, Record};

/// 형식별 추출기 (닫힌 변형 집합)
#[derive(Debug, Clone)]
pub enum Extractor {
    Structured(StructuredExtractor),
    CombinedAccess(AccessLogExtractor),
    KeyValue(KeyValueExtractor),
    Syslog(SyslogExtractor),
    ApacheStyle(ApacheLogExtractor),
}

impl Extractor {
    /// 이 추출기가 담당하는 형식 태그
    pub fn tag(&self) -> FormatTag {
        match self {
            Self::Structured(_) => FormatTag::Structured,
            Self::CombinedAccess(_) => FormatTag::CombinedAccess,
            Self::KeyValue(_) => FormatTag::KeyValue,
            Self::Syslog(_) => FormatTag::SyslogTag,
            Self::ApacheStyle(_) => FormatTag::ApacheStyle,
        }
    }

    /// 라인에서 레코드를 추출합니다.
    pub fn extract(&self, line: &str) -> Record {
        match self {
            Self::Structured(e) => e.extract(line),
            Self::CombinedAccess(e) => e.extract(line),
            Self::KeyValue(e) => e.extract(line),
            Self::Syslog(e) => e.extract(line),
            Self::ApacheStyle(e) => e.extract(line),
        }
    }
}

/// 형식 태그 -> 추출기 디스패치 테이블
#[derive(Debug, Clone)]
pub struct ExtractorSet {
    extractors: Vec<Extractor>,
}

impl ExtractorSet {
    /// 다섯 가지 기본 추출기로 테이블을 구성합니다.
    pub fn new(grammars: &Grammars) -> Self {
        Self {
            extractors: vec![
                Extractor::Structured(StructuredExtractor::new()),
                Extractor::CombinedAccess(AccessLogExtractor::new(grammars)),
                Extractor::KeyValue(KeyValueExtractor::new()),
                Extractor::Syslog(SyslogExtractor::new()),
                Extractor::ApacheStyle(ApacheLogExtractor::new(grammars)),
            ],
        }
    }

    /// 태그에 해당하는 추출기를 찾습니다. `Unknown`은 `None`입니다.
    pub fn get(&self, tag: FormatTag) -> Option<&Extractor> {
        self.extractors.iter().find(|e| e.tag() == tag)
    }

    /// 태그에 해당하는 추출기로 레코드를 추출합니다.
    ///
    /// `Unknown` 태그는 빈 레코드를 반환합니다. 호출 측은 분류 결과가
    /// `Unknown`인 라인을 미리 건너뛰어야 합니다.
    pub fn extract(&self, tag: FormatTag, line: &str) -> Record {
        self.get(tag)
            .map(|extractor| extractor.extract(line))
            .unwrap_or_default()
    }

    /// 등록된 형식 태그 목록
    pub fn registered_formats(&self) -> Vec<FormatTag> {
        self.extractors.iter().map(Extractor::tag).collect()
    }
}

//! logsieve 로그 파이프라인
//!
//! 한 줄씩 들어오는 이기종 로그를 형식별로 분류하고, 공통 [`Record`](logsieve_core::Record)로
//! 추출한 뒤, 타임스탬프를 RFC 3339로 정규화합니다.
//!
//! # 모듈 구성
//!
//! - [`parser`]: 형식 분류기와 형식별 추출기 (structured, combined-access, key-value, syslog, apache)
//! - [`timestamp`]: 타임스탬프 추출, 레이아웃 감지, 정규화
//! - [`time_range`]: `last 24h`, `<start> to <end>` 시간 범위 파싱
//! - [`query`]: 레코드 필터링, 개수 집계, 필드별 그룹화
//! - [`pipeline`]: 라인 읽기부터 정규화까지의 드라이버
//! - [`config`]: 파이프라인 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! lines -> FormatClassifier -> ExtractorSet -> Vec<Record> -> TimestampNormalizer
//!                                                  |
//!                                         query / count / group_by
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod time_range;
pub mod timestamp;

pub mod parser;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{LogPipeline, LogPipelineBuilder};

// 설정
pub use config::{PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::{LogPipelineError, RangeSide};

// 파서
pub use parser::{Extractor, ExtractorSet, FormatClassifier, GrammarPatterns, Grammars};

// 타임스탬프 / 시간 범위
pub use time_range::{TimeRange, parse_time_range, parse_time_range_at};
pub use timestamp::{TimeLayout, TimestampNormalizer};

// 질의
pub use query::{GroupField, QueryOptions, count, group_by, query};

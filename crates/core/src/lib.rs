//! logsieve 공통 크레이트
//!
//! 로그 파이프라인과 CLI가 공유하는 도메인 타입, 에러, 설정을 정의합니다.
//!
//! # 모듈 구성
//!
//! - [`types`]: 정규화된 로그 레코드 [`Record`]와 형식 태그 [`FormatTag`]
//! - [`error`]: 도메인 에러 타입
//! - [`config`]: `logsieve.toml` 파싱 및 환경변수 오버라이드
//! - [`metrics`]: 메트릭 이름 상수

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, LogsieveError, ParseError};

// 설정
pub use config::LogsieveConfig;

// 도메인 타입
pub use types::{FormatTag, Record};

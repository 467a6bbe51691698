//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 파이프라인은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더(exporter) 설치는 호출 측의 책임이며, 설치되지 않은 경우 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logsieve_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logsieve_core::metrics::PIPELINE_LINES_READ_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 로그 형식 레이블 키 (structured, combined-access, ...)
pub const LABEL_FORMAT: &str = "format";

/// 건너뛴 사유 레이블 키 (unknown, empty, oversized)
pub const LABEL_REASON: &str = "reason";

// ─── Pipeline 메트릭 ────────────────────────────────────────────────

/// Pipeline: 읽은 전체 라인 수 (counter)
pub const PIPELINE_LINES_READ_TOTAL: &str = "logsieve_pipeline_lines_read_total";

/// Pipeline: 추출된 레코드 수 (counter, label: format)
pub const PIPELINE_RECORDS_EXTRACTED_TOTAL: &str = "logsieve_pipeline_records_extracted_total";

/// Pipeline: 건너뛴 라인 수 (counter, label: reason)
pub const PIPELINE_LINES_SKIPPED_TOTAL: &str = "logsieve_pipeline_lines_skipped_total";

/// Pipeline: 정규화된 타임스탬프 수 (counter)
pub const PIPELINE_TIMESTAMPS_NORMALIZED_TOTAL: &str =
    "logsieve_pipeline_timestamps_normalized_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
/// `metrics::describe_counter!()`를 사용합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        PIPELINE_LINES_READ_TOTAL,
        "Total number of input lines read by the pipeline"
    );
    describe_counter!(
        PIPELINE_RECORDS_EXTRACTED_TOTAL,
        "Total number of records extracted, by log format"
    );
    describe_counter!(
        PIPELINE_LINES_SKIPPED_TOTAL,
        "Total number of lines skipped, by reason"
    );
    describe_counter!(
        PIPELINE_TIMESTAMPS_NORMALIZED_TOTAL,
        "Total number of record timestamps rewritten to RFC 3339"
    );
}

#![no_main]

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use logsieve_log_pipeline::{TimeLayout, parse_time_range_at};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 내장 레이아웃 인덱스
    layout: u8,
    /// 상대 범위 형식으로 보낼지 여부
    relative: bool,
    expr: String,
}

fuzz_target!(|input: FuzzInput| {
    let layouts = TimeLayout::builtin();
    let layout = &layouts[input.layout as usize % layouts.len()];
    let Some(now) = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).single() else {
        return;
    };

    let expr = if input.relative {
        format!("last {}", input.expr)
    } else {
        input.expr
    };

    if let Ok(range) = parse_time_range_at(&expr, layout, now) {
        if expr.starts_with("last ") {
            assert!(range.start <= range.end);
            assert_eq!(range.end, now);
        }
    }
});

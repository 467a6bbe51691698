#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;
use logsieve_log_pipeline::{LogPipeline, LogPipelineBuilder, PipelineConfigBuilder};

static PIPELINE: LazyLock<LogPipeline> = LazyLock::new(|| {
    let config = PipelineConfigBuilder::new()
        .max_line_bytes(256)
        .normalize_timestamps(true)
        .build()
        .expect("valid fuzz config");
    LogPipelineBuilder::new()
        .config(config)
        .build()
        .expect("default pipeline")
});

fuzz_target!(|data: &[u8]| {
    // 잘못된 UTF-8과 초과 길이 줄도 에러 없이 처리되어야 한다
    let records = PIPELINE
        .ingest_reader(data)
        .expect("in-memory reader never fails");
    assert!(records.len() <= data.split(|b| *b == b'\n').count());
});

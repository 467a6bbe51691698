#![no_main]

use libfuzzer_sys::fuzz_target;
use logsieve_core::types::Record;
use logsieve_log_pipeline::TimestampNormalizer;

fuzz_target!(|data: &[u8]| {
    let Ok(normalizer) = TimestampNormalizer::new() else {
        return;
    };
    let text = String::from_utf8_lossy(data);

    let mut records: Vec<Record> = text
        .lines()
        .map(|line| Record {
            timestamp: normalizer.extract_timestamp(line),
            message: line.to_owned(),
            ..Default::default()
        })
        .collect();

    let before: Vec<String> = records.iter().map(|r| r.timestamp.clone()).collect();
    let changed = normalizer.normalize_timestamps(&mut records);
    let actually_changed = before
        .iter()
        .zip(&records)
        .filter(|(old, new)| **old != new.timestamp)
        .count();
    assert!(actually_changed <= changed);
});

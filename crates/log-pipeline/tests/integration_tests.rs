//! 통합 테스트 -- 파이프라인 전체 흐름 검증
//!
//! 라인 분류부터 추출, 타임스탬프 정규화, 질의까지의 전체 흐름을 검증합니다.

use std::io::Write;

use chrono::{TimeZone, Utc};
use logsieve_core::types::{FormatTag, Record};
use logsieve_log_pipeline::{
    ExtractorSet, FormatClassifier, GroupField, Grammars, LogPipelineBuilder, PipelineConfig,
    PipelineConfigBuilder, QueryOptions, TimeLayout, TimestampNormalizer, count, group_by,
    parse_time_range, parse_time_range_at, query,
};

const APACHE_LINE: &str = r#"127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326 "http://ref" "Mozilla""#;

const MIXED_LOG: &str = r#"{"timestamp":"10/Oct/2000:14:00:00 -0700","level":"info","message":"service started","ip":"10.0.0.5"}
10.0.0.7 - - [10/Oct/2000:14:01:00 -0700] "POST /api/login HTTP/1.1" 401 64
level=warn ip=10.0.0.7 message=too_many_attempts timestamp=10/Oct/2000:14:02:00_-0700
<34>1 2000-10-10T21:03:00Z host sshd - - - Failed password for root
just some text nobody understands
10.0.0.9 - - [10/Oct/2000:14:04:00 -0700] "GET /index.html HTTP/1.1" 200 1024 "-" "curl/8.0"

10.0.0.7 - - [10/Oct/2000:14:05:00 -0700] "GET /admin HTTP/1.1" 403 12
"#;

/// 명세의 Apache 예시: 분류 -> 추출 전체 흐름
#[test]
fn test_apache_end_to_end() {
    let grammars = Grammars::compile().unwrap();
    let classifier = FormatClassifier::new(&grammars);
    let extractors = ExtractorSet::new(&grammars);

    let tag = classifier.classify(APACHE_LINE);
    assert_eq!(tag, FormatTag::ApacheStyle);

    let record = extractors.extract(tag, APACHE_LINE);
    assert_eq!(record.ip, "127.0.0.1");
    assert_eq!(record.timestamp, "10/Oct/2000:13:55:36 -0700");
    assert_eq!(record.request, "GET /apache_pb.gif");
    assert_eq!(record.status_code, 200);
    assert!(record.message.contains("Mozilla"));
    assert!(record.message.contains("http://ref"));
    assert!(record.message.contains("2326"));
}

/// 여러 형식이 섞인 파일 수집
#[tokio::test]
async fn test_read_mixed_log_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MIXED_LOG.as_bytes()).unwrap();

    let pipeline = LogPipelineBuilder::new().build().unwrap();
    let records = pipeline.read_log_file(file.path()).await.unwrap();

    // 알 수 없는 라인 1개와 빈 라인 1개를 제외한 6개
    assert_eq!(records.len(), 6);

    let tags: Vec<FormatTag> = MIXED_LOG
        .lines()
        .map(|l| pipeline.classify(l))
        .collect();
    assert_eq!(
        tags,
        vec![
            FormatTag::Structured,
            FormatTag::CombinedAccess,
            FormatTag::KeyValue,
            FormatTag::SyslogTag,
            FormatTag::Unknown,
            FormatTag::ApacheStyle,
            FormatTag::Unknown,
            FormatTag::CombinedAccess,
        ]
    );

    assert_eq!(records[0].message, "service started");
    assert_eq!(records[1].status_code, 401);
    assert_eq!(records[2].level, "warn");
    assert_eq!(records[3].message, "2000-10-10T21:03:00Z host sshd - - - Failed password for root");
    assert_eq!(records[4].user_agent, "curl/8.0");
}

/// 수집 후 정규화: 감지된 레이아웃(apache)으로 파싱 가능한 것만 변환
#[tokio::test]
async fn test_read_with_normalization() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MIXED_LOG.as_bytes()).unwrap();

    let config = PipelineConfigBuilder::new()
        .normalize_timestamps(true)
        .build()
        .unwrap();
    let pipeline = LogPipelineBuilder::new().config(config).build().unwrap();
    let records = pipeline.read_log_file(file.path()).await.unwrap();

    assert_eq!(records[0].timestamp, "2000-10-10T14:00:00-07:00");
    assert_eq!(records[1].timestamp, "2000-10-10T14:01:00-07:00");
    // key-value 값은 apache 레이아웃과 맞지 않아 그대로 남음
    assert_eq!(records[2].timestamp, "10/Oct/2000:14:02:00_-0700");
    // syslog 추출기는 타임스탬프를 채우지 않음
    assert_eq!(records[3].timestamp, "");
}

#[test]
fn test_missing_file_is_error() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let pipeline = LogPipelineBuilder::new().build().unwrap();
    let result = runtime.block_on(pipeline.read_log_file("/nonexistent/logsieve.log"));
    assert!(result.is_err());
}

/// 수집 -> 질의 -> 집계 흐름
#[test]
fn test_ingest_then_query() {
    let pipeline = LogPipelineBuilder::new().build().unwrap();
    let records = pipeline.ingest_reader(MIXED_LOG.as_bytes()).unwrap();

    let denied = QueryOptions {
        ip: Some("10.0.0.7".to_owned()),
        min_status: Some(400),
        ..Default::default()
    };
    assert_eq!(count(&records, &denied), 2);

    let gets = QueryOptions {
        request_method: Some("GET".to_owned()),
        ..Default::default()
    };
    let results = query(&records, &gets);
    assert_eq!(results.len(), 2);

    let by_ip = group_by(&records, GroupField::Ip);
    assert_eq!(by_ip.get("10.0.0.7"), Some(&3));
    assert_eq!(by_ip.get("10.0.0.5"), Some(&1));

    let by_status = group_by(&records, GroupField::Status);
    assert_eq!(by_status.get("401"), Some(&1));
    assert_eq!(by_status.get("403"), Some(&1));
}

/// 시간 범위 질의: 파이프라인 레이아웃으로 범위를 파싱하고 필터링
#[test]
fn test_time_range_query() {
    let pipeline = LogPipelineBuilder::new().build().unwrap();
    let records = pipeline.ingest_lines(MIXED_LOG.lines());

    let range = parse_time_range(
        "10/Oct/2000:14:00:30 -0700 to 10/Oct/2000:14:04:30 -0700",
        pipeline.time_layout(),
    )
    .unwrap();
    let options = QueryOptions {
        time_layout: Some(pipeline.time_layout().clone()),
        ..Default::default()
    }
    .with_range(range);

    let results = query(&records, &options);
    let ips: Vec<&str> = results.iter().map(|r| r.ip.as_str()).collect();
    // 14:00 과 14:05 는 범위 밖, 타임스탬프를 파싱할 수 없는 레코드는 유지
    assert_eq!(ips, vec!["10.0.0.7", "10.0.0.7", "", "10.0.0.9"]);
}

#[test]
fn test_relative_time_range() {
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let range = parse_time_range_at("last 2w", &TimeLayout::default(), now).unwrap();
    assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
    assert_eq!(range.end, now);
}

#[test]
fn test_detect_and_normalize_collection() {
    let normalizer = TimestampNormalizer::new().unwrap();
    let lines = [
        "2024-01-15 12:00:00 boot ok",
        "nothing here",
        "2024-01-15 12:00:05 disk ready",
    ];
    let mut records: Vec<Record> = lines
        .iter()
        .map(|l| Record {
            timestamp: normalizer.extract_timestamp(l),
            message: (*l).to_owned(),
            ..Default::default()
        })
        .collect();

    assert_eq!(normalizer.detect_time_layout(&records).name(), "dash-datetime");
    assert_eq!(normalizer.normalize_timestamps(&mut records), 2);
    assert_eq!(records[0].timestamp, "2024-01-15T12:00:00Z");
    assert_eq!(records[1].timestamp, "");
    assert_eq!(records[2].timestamp, "2024-01-15T12:00:05Z");
}

#[test]
fn test_config_from_core() {
    let core = logsieve_core::LogsieveConfig::parse(
        "[pipeline]\ndefault_layout = \"syslog\"\nmax_line_bytes = 128\n",
    )
    .unwrap();
    let config = PipelineConfig::from_core(&core.pipeline);
    let pipeline = LogPipelineBuilder::new().config(config).build().unwrap();

    assert_eq!(pipeline.time_layout().name(), "syslog");
    assert!(pipeline.process_line(&"level=info x=y ".repeat(20)).is_none());
}

#[test]
fn test_unknown_default_layout_fails_build() {
    let config = PipelineConfig {
        default_layout: "nope".to_owned(),
        ..Default::default()
    };
    assert!(LogPipelineBuilder::new().config(config).build().is_err());
}

/// 여러 스레드에서 하나의 파이프라인을 공유
#[test]
fn test_concurrent_line_processing() {
    let pipeline = std::sync::Arc::new(LogPipelineBuilder::new().build().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pipeline = pipeline.clone();
            std::thread::spawn(move || {
                let line = format!("level=info ip=10.0.0.{i} message=worker");
                pipeline.process_line(&line)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let record = handle.join().unwrap().unwrap();
        assert_eq!(record.ip, format!("10.0.0.{i}"));
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn classify_and_extract_never_panic(line in ".{0,400}") {
            let grammars = Grammars::compile().unwrap();
            let classifier = FormatClassifier::new(&grammars);
            let extractors = ExtractorSet::new(&grammars);
            let tag = classifier.classify(&line);
            let _ = extractors.extract(tag, &line);
            // 모든 추출기에 임의 입력을 넣어도 패닉하지 않아야 함
            for tag in FormatTag::KNOWN {
                let _ = extractors.extract(tag, &line);
            }
        }

        #[test]
        fn extract_timestamp_never_panics(line in ".{0,400}") {
            let normalizer = TimestampNormalizer::new().unwrap();
            let ts = normalizer.extract_timestamp(&line);
            prop_assert!(ts.is_empty() || line.contains(&ts));
        }

        #[test]
        fn key_value_extraction_is_order_independent(
            level in "[a-z]{1,8}",
            ip in "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        ) {
            let extractors = ExtractorSet::new(&Grammars::compile().unwrap());
            let a = extractors.extract(FormatTag::KeyValue, &format!("level={level} ip={ip}"));
            let b = extractors.extract(FormatTag::KeyValue, &format!("ip={ip} level={level}"));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn time_range_never_panics(expr in ".{0,64}") {
            let _ = parse_time_range(&expr, &TimeLayout::default());
        }
    }
}

//! 파이프라인 드라이버 -- 라인 읽기, 형식 분류, 필드 추출, 후처리의 전체 흐름을 관리합니다.
//!
//! # 내부 흐름
//! ```text
//! line -> FormatClassifier -> ExtractorSet -> Vec<Record> -> (TimestampNormalizer)
//! ```
//!
//! 각 라인의 분류와 추출은 서로 독립적이며, 타임스탬프 정규화는
//! 모든 라인의 추출이 끝난 뒤 한 번만 실행됩니다.

use std::borrow::Cow;
use std::io::BufRead;
use std::path::Path;

use metrics::counter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use logsieve_core::metrics as m;
use logsieve_core::types::{FormatTag, Record};

use crate::config::PipelineConfig;
use crate::error::LogPipelineError;
use crate::parser::{ExtractorSet, FormatClassifier, GrammarPatterns, Grammars};
use crate::timestamp::{TimeLayout, TimestampNormalizer};

/// 라인을 건너뛴 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    Empty,
    Oversized,
    Unknown,
}

impl SkipReason {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Oversized => "oversized",
            Self::Unknown => "unknown",
        }
    }
}

/// 로그 파이프라인
///
/// 분류기, 추출기 세트, 타임스탬프 정규화기를 소유하며 생성 이후 변경되지 않습니다.
/// 모든 메서드가 `&self`를 받으므로 여러 스레드에서 공유할 수 있습니다.
///
/// # 사용 예시
/// ```ignore
/// use logsieve_log_pipeline::LogPipelineBuilder;
///
/// let pipeline = LogPipelineBuilder::new().build()?;
/// let records = pipeline.read_log_file("/var/log/access.log").await?;
/// ```
#[derive(Debug, Clone)]
pub struct LogPipeline {
    config: PipelineConfig,
    classifier: FormatClassifier,
    extractors: ExtractorSet,
    normalizer: TimestampNormalizer,
    time_layout: TimeLayout,
}

impl LogPipeline {
    /// 파이프라인 설정
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &FormatClassifier {
        &self.classifier
    }

    pub fn extractors(&self) -> &ExtractorSet {
        &self.extractors
    }

    pub fn normalizer(&self) -> &TimestampNormalizer {
        &self.normalizer
    }

    /// 시간 범위 파싱과 질의 필터에 사용할 레이아웃
    pub fn time_layout(&self) -> &TimeLayout {
        &self.time_layout
    }

    /// 한 줄의 형식을 판별합니다.
    pub fn classify(&self, line: &str) -> FormatTag {
        self.classifier.classify(line)
    }

    /// 한 줄을 분류하고 해당 추출기로 레코드를 생성합니다.
    ///
    /// 빈 라인, 크기 초과 라인, 형식을 알 수 없는 라인은 `None`입니다.
    pub fn process_line(&self, line: &str) -> Option<Record> {
        self.process_numbered(None, line)
    }

    fn process_numbered(&self, line_no: Option<usize>, line: &str) -> Option<Record> {
        counter!(m::PIPELINE_LINES_READ_TOTAL).increment(1);

        let tag = match self.check_line(line) {
            Ok(tag) => tag,
            Err(reason) => {
                self.skip(line_no, reason);
                return None;
            }
        };

        counter!(m::PIPELINE_RECORDS_EXTRACTED_TOTAL, m::LABEL_FORMAT => tag.as_str())
            .increment(1);
        Some(self.extractors.extract(tag, line))
    }

    fn skip(&self, line_no: Option<usize>, reason: SkipReason) {
        match reason {
            SkipReason::Oversized => tracing::warn!(
                line_no,
                limit = self.config.max_line_bytes,
                "skipping oversized line"
            ),
            SkipReason::Unknown => tracing::debug!(line_no, "skipping line with unknown format"),
            SkipReason::Empty => tracing::trace!(line_no, "skipping empty line"),
        }
        counter!(m::PIPELINE_LINES_SKIPPED_TOTAL, m::LABEL_REASON => reason.as_str()).increment(1);
    }

    fn check_line(&self, line: &str) -> Result<FormatTag, SkipReason> {
        if self.config.skip_empty_lines && line.trim().is_empty() {
            return Err(SkipReason::Empty);
        }
        if line.len() > self.config.max_line_bytes {
            return Err(SkipReason::Oversized);
        }
        match self.classifier.classify(line) {
            FormatTag::Unknown => Err(SkipReason::Unknown),
            tag => Ok(tag),
        }
    }

    /// 라인 목록에서 레코드를 수집합니다.
    ///
    /// `normalize_timestamps`가 설정되어 있으면 마지막에 정규화를 실행합니다.
    pub fn ingest_lines<I, S>(&self, lines: I) -> Vec<Record>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ingest = Ingest::new(self);
        for line in lines {
            ingest.push(line.as_ref());
        }
        ingest.finish()
    }

    /// 동기 리더에서 라인을 읽어 레코드를 수집합니다.
    ///
    /// 잘못된 UTF-8 바이트는 대체 문자로 바뀌며, I/O 에러는 그대로 전파됩니다.
    /// 한 라인은 `max_line_bytes`를 조금 넘는 만큼만 버퍼에 담기고 나머지는 버려집니다.
    pub fn ingest_reader<R: BufRead>(&self, mut reader: R) -> Result<Vec<Record>, LogPipelineError> {
        let mut ingest = Ingest::new(self);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match read_bounded_line(&mut reader, &mut buf, self.config.max_line_bytes)? {
                LineRead::Eof => break,
                LineRead::Line => ingest.push(&decode_line(&buf)),
                LineRead::Oversized => ingest.push_oversized(),
            }
        }
        Ok(ingest.finish())
    }

    /// 로그 파일 전체를 비동기로 읽어 레코드를 수집합니다.
    pub async fn read_log_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<Record>, LogPipelineError> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let mut reader = tokio::io::BufReader::new(file);

        tracing::debug!(path = %path.display(), "reading log file");

        let mut ingest = Ingest::new(self);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read =
                read_bounded_line_async(&mut reader, &mut buf, self.config.max_line_bytes).await?;
            match read {
                LineRead::Eof => break,
                LineRead::Line => ingest.push(&decode_line(&buf)),
                LineRead::Oversized => ingest.push_oversized(),
            }
        }
        Ok(ingest.finish())
    }

    /// 레코드 타임스탬프를 RFC 3339로 정규화하고 다시 쓴 개수를 반환합니다.
    pub fn normalize(&self, records: &mut [Record]) -> usize {
        let rewritten = self.normalizer.normalize_timestamps(records);
        counter!(m::PIPELINE_TIMESTAMPS_NORMALIZED_TOTAL).increment(rewritten as u64);
        rewritten
    }
}

/// 제한된 라인 읽기 결과
#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Eof,
    Line,
    /// 제한을 넘어 나머지를 버린 라인 (버퍼 내용은 잘린 앞부분)
    Oversized,
}

/// 라인 종결자(`\r\n`)까지 포함해 버퍼에 담을 최대 바이트 수
fn line_cap(max_line_bytes: usize) -> u64 {
    max_line_bytes.saturating_add(2) as u64
}

/// 최대 `max_line_bytes + 2` 바이트까지만 버퍼에 담고, 넘치면 줄 끝까지 건너뜁니다.
fn read_bounded_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_line_bytes: usize,
) -> std::io::Result<LineRead> {
    let cap = line_cap(max_line_bytes);
    let read = std::io::Read::take(&mut *reader, cap).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.last() == Some(&b'\n') || (read as u64) < cap {
        return Ok(LineRead::Line);
    }
    reader.skip_until(b'\n')?;
    Ok(LineRead::Oversized)
}

/// [`read_bounded_line`]의 비동기 버전
async fn read_bounded_line_async<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_line_bytes: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let cap = line_cap(max_line_bytes);
    let read = AsyncReadExt::take(&mut *reader, cap)
        .read_until(b'\n', buf)
        .await?;
    if read == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.last() == Some(&b'\n') || (read as u64) < cap {
        return Ok(LineRead::Line);
    }

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            break;
        }
        match available.iter().position(|b| *b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                break;
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
    Ok(LineRead::Oversized)
}

/// 줄 끝의 `\n`과 `\r\n`을 제거합니다.
fn decode_line(buf: &[u8]) -> Cow<'_, str> {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    let buf = buf.strip_suffix(b"\r").unwrap_or(buf);
    String::from_utf8_lossy(buf)
}

/// 한 번의 수집 작업 상태
struct Ingest<'a> {
    pipeline: &'a LogPipeline,
    records: Vec<Record>,
    line_no: usize,
}

impl<'a> Ingest<'a> {
    fn new(pipeline: &'a LogPipeline) -> Self {
        Self {
            pipeline,
            records: Vec::new(),
            line_no: 0,
        }
    }

    fn push(&mut self, line: &str) {
        self.line_no += 1;
        if let Some(record) = self.pipeline.process_numbered(Some(self.line_no), line) {
            self.records.push(record);
        }
    }

    fn push_oversized(&mut self) {
        self.line_no += 1;
        counter!(m::PIPELINE_LINES_READ_TOTAL).increment(1);
        self.pipeline.skip(Some(self.line_no), SkipReason::Oversized);
    }

    fn finish(mut self) -> Vec<Record> {
        let normalized = if self.pipeline.config.normalize_timestamps {
            self.pipeline.normalize(&mut self.records)
        } else {
            0
        };

        tracing::info!(
            lines = self.line_no,
            records = self.records.len(),
            skipped = self.line_no - self.records.len(),
            normalized,
            "ingestion complete"
        );
        self.records
    }
}

/// 로그 파이프라인 빌더
///
/// 문법을 컴파일하고 레이아웃 목록을 구성합니다. 잘못된 설정이나 문법은
/// `build()`에서 에러로 반환됩니다.
pub struct LogPipelineBuilder {
    config: PipelineConfig,
    grammar_patterns: Option<GrammarPatterns>,
    layouts: Option<Vec<TimeLayout>>,
    time_layout: Option<TimeLayout>,
}

impl LogPipelineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            grammar_patterns: None,
            layouts: None,
            time_layout: None,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 기본 문법 대신 사용할 패턴을 지정합니다.
    pub fn grammar_patterns(mut self, patterns: GrammarPatterns) -> Self {
        self.grammar_patterns = Some(patterns);
        self
    }

    /// 레이아웃 감지 후보 목록을 지정합니다. 첫 번째가 기본값입니다.
    pub fn layouts(mut self, layouts: Vec<TimeLayout>) -> Self {
        self.layouts = Some(layouts);
        self
    }

    /// 설정의 `default_layout` 대신 사용할 시간 범위 레이아웃을 지정합니다.
    pub fn time_layout(mut self, layout: TimeLayout) -> Self {
        self.time_layout = Some(layout);
        self
    }

    /// 파이프라인을 빌드합니다.
    pub fn build(self) -> Result<LogPipeline, LogPipelineError> {
        self.config.validate()?;

        let grammars = match &self.grammar_patterns {
            Some(patterns) => Grammars::from_patterns(patterns)?,
            None => Grammars::compile()?,
        };

        let normalizer = match self.layouts {
            Some(layouts) => TimestampNormalizer::with_layouts(layouts)?,
            None => TimestampNormalizer::new()?,
        };

        let time_layout = match self.time_layout {
            Some(layout) => layout,
            None => self.config.layout()?,
        };

        tracing::debug!(
            layout = time_layout.name(),
            max_line_bytes = self.config.max_line_bytes,
            "log pipeline built"
        );

        Ok(LogPipeline {
            classifier: FormatClassifier::new(&grammars),
            extractors: ExtractorSet::new(&grammars),
            normalizer,
            time_layout,
            config: self.config,
        })
    }
}

impl Default for LogPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! `logsieve query` and `logsieve count` command handlers

use std::io::Write;

use serde::Serialize;
use tracing::{debug, info};

use logsieve_core::config::LogsieveConfig;
use logsieve_log_pipeline::{LogPipeline, QueryOptions, TimeRange, count, parse_time_range, query};

use crate::cli::{FilterArgs, QueryArgs};
use crate::commands::{RecordsReport, build_pipeline, resolve_layout};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `query` command.
pub async fn execute_query(
    args: QueryArgs,
    config: &LogsieveConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let pipeline = build_pipeline(config, None)?;
    let options = build_options(&args.filters, &pipeline)?;

    info!(path = %args.file.display(), "querying log file");
    let records = pipeline.read_log_file(&args.file).await?;
    let matched = query(&records, &options);

    writer.render(&RecordsReport::new(&args.file, matched))
}

/// Execute the `count` command.
pub async fn execute_count(
    args: QueryArgs,
    config: &LogsieveConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let pipeline = build_pipeline(config, None)?;
    let options = build_options(&args.filters, &pipeline)?;

    info!(path = %args.file.display(), "counting log records");
    let records = pipeline.read_log_file(&args.file).await?;

    let report = CountReport {
        source: args.file.display().to_string(),
        scanned: records.len(),
        count: count(&records, &options),
    };
    writer.render(&report)
}

/// Translate CLI filter flags into query options.
///
/// `--range` is parsed with `--layout` when given, otherwise with the
/// pipeline's configured layout. The same layout drives time filtering.
pub fn build_options(filters: &FilterArgs, pipeline: &LogPipeline) -> Result<QueryOptions, CliError> {
    let layout = match &filters.layout {
        Some(spec) => resolve_layout(spec),
        None => pipeline.time_layout().clone(),
    };

    let range: Option<TimeRange> = filters
        .range
        .as_deref()
        .map(|expr| parse_time_range(expr, &layout))
        .transpose()?;

    let options = QueryOptions {
        ip: filters.ip.clone(),
        status_code: filters.status,
        level: filters.level.clone(),
        contains: filters.contains.clone(),
        request_method: filters.method.clone(),
        min_status: filters.min_status,
        max_status: filters.max_status,
        limit: filters.limit,
        time_layout: Some(layout),
        ..Default::default()
    };

    Ok(match range {
        Some(range) => {
            debug!(start = %range.start, end = %range.end, "applying time range");
            options.with_range(range)
        }
        None => options,
    })
}

/// Number of records matching the filters.
#[derive(Serialize)]
pub struct CountReport {
    /// Log file path
    pub source: String,
    /// Records extracted from the file
    pub scanned: usize,
    /// Records matching the filters
    pub count: usize,
}

impl Render for CountReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", self.count)?;
        Ok(())
    }
}

//! Command handlers -- one module per subcommand

pub mod config;
pub mod detect;
pub mod group;
pub mod parse;
pub mod query;

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use logsieve_core::config::LogsieveConfig;
use logsieve_core::types::Record;
use logsieve_log_pipeline::{LogPipeline, LogPipelineBuilder, PipelineConfig, TimeLayout};

use crate::error::CliError;
use crate::output::Render;

/// Build a pipeline from the loaded configuration.
///
/// `normalize` overrides `pipeline.normalize_timestamps` when set.
pub(crate) fn build_pipeline(
    config: &LogsieveConfig,
    normalize: Option<bool>,
) -> Result<LogPipeline, CliError> {
    let mut pipeline_config = PipelineConfig::from_core(&config.pipeline);
    if let Some(normalize) = normalize {
        pipeline_config.normalize_timestamps = normalize;
    }
    Ok(LogPipelineBuilder::new().config(pipeline_config).build()?)
}

/// Resolve a `--layout` argument: a built-in layout name, otherwise a chrono format string.
pub(crate) fn resolve_layout(spec: &str) -> TimeLayout {
    TimeLayout::by_name(spec).unwrap_or_else(|_| TimeLayout::custom(spec))
}

/// Records extracted from a file.
#[derive(Serialize)]
pub struct RecordsReport {
    /// Log file path
    pub source: String,
    /// Number of records
    pub total: usize,
    pub records: Vec<Record>,
}

impl RecordsReport {
    pub fn new(source: &Path, records: Vec<Record>) -> Self {
        Self {
            source: source.display().to_string(),
            total: records.len(),
            records,
        }
    }
}

impl Render for RecordsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for record in &self.records {
            writeln!(w, "{}", record)?;
        }
        writeln!(w)?;
        writeln!(w, "{} record(s) from {}", self.total, self.source)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_layout_builtin_name() {
        assert_eq!(resolve_layout("syslog").name(), "syslog");
    }

    #[test]
    fn test_resolve_layout_custom_format() {
        let layout = resolve_layout("%Y-%m-%d");
        assert_eq!(layout.name(), "custom");
        assert_eq!(layout.format(), "%Y-%m-%d");
    }

    #[test]
    fn test_build_pipeline_normalize_override() {
        let config = LogsieveConfig::default();
        let pipeline = build_pipeline(&config, Some(true)).expect("default config is valid");
        assert!(pipeline.config().normalize_timestamps);
        let pipeline = build_pipeline(&config, None).expect("default config is valid");
        assert!(!pipeline.config().normalize_timestamps);
    }

    #[test]
    fn test_build_pipeline_unknown_layout_is_config_error() {
        let mut config = LogsieveConfig::default();
        config.pipeline.default_layout = "iso-week".to_owned();
        let err = build_pipeline(&config, None).err().expect("should fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_records_report_text() {
        let records = vec![Record {
            ip: "10.0.0.1".to_owned(),
            status_code: 200,
            ..Default::default()
        }];
        let report = RecordsReport::new(Path::new("access.log"), records);
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("utf8");
        assert!(output.contains("10.0.0.1 200"));
        assert!(output.contains("1 record(s) from access.log"));
    }
}

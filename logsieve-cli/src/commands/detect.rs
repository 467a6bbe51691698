//! `logsieve detect` command handler

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logsieve_core::config::LogsieveConfig;
use logsieve_log_pipeline::LogPipeline;

use crate::cli::DetectArgs;
use crate::commands::build_pipeline;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `detect` command.
pub async fn execute(
    args: DetectArgs,
    config: &LogsieveConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    // detection must see the raw timestamps
    let pipeline = build_pipeline(config, Some(false))?;

    info!(path = %args.file.display(), "detecting log formats");
    let bytes = tokio::fs::read(&args.file).await?;
    let text = String::from_utf8_lossy(&bytes);

    writer.render(&detect(&pipeline, &args.file, &text))
}

/// Classify every non-blank line and detect the timestamp layout of the extracted records.
pub fn detect(pipeline: &LogPipeline, source: &Path, text: &str) -> DetectReport {
    let mut formats = BTreeMap::new();
    let mut lines = 0;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        lines += 1;
        *formats
            .entry(pipeline.classify(line).as_str().to_owned())
            .or_insert(0) += 1;
    }

    let records = pipeline.ingest_lines(text.lines());
    let layout = pipeline.normalizer().detect_time_layout(&records);

    DetectReport {
        source: source.display().to_string(),
        lines,
        records: records.len(),
        layout: LayoutInfo {
            name: layout.name().to_owned(),
            reference: layout.reference().to_owned(),
            format: layout.format().to_owned(),
        },
        formats,
    }
}

/// Detected timestamp layout.
#[derive(Serialize)]
pub struct LayoutInfo {
    pub name: String,
    pub reference: String,
    pub format: String,
}

/// Result of inspecting a log file.
#[derive(Serialize)]
pub struct DetectReport {
    /// Log file path
    pub source: String,
    /// Non-blank lines
    pub lines: usize,
    /// Records extracted
    pub records: usize,
    pub layout: LayoutInfo,
    /// Line count per format name (including `unknown`)
    pub formats: BTreeMap<String, usize>,
}

impl Render for DetectReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Source:  {}", self.source)?;
        writeln!(w, "Lines:   {} ({} records)", self.lines, self.records)?;
        writeln!(
            w,
            "Layout:  {} ({}, {})",
            self.layout.name, self.layout.reference, self.layout.format
        )?;
        writeln!(w)?;
        writeln!(w, "{:<20} {:>8}", "FORMAT", "LINES")?;
        writeln!(w, "{}", "-".repeat(29))?;
        for (format, count) in &self.formats {
            writeln!(w, "{:<20} {:>8}", format, count)?;
        }
        Ok(())
    }
}

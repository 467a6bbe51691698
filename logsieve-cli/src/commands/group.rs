//! `logsieve group` command handler

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use tracing::{info, warn};

use logsieve_core::config::LogsieveConfig;
use logsieve_log_pipeline::{GroupField, group_by};

use crate::cli::GroupArgs;
use crate::commands::build_pipeline;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `group` command.
pub async fn execute(
    args: GroupArgs,
    config: &LogsieveConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let field = GroupField::from(args.by.as_str());
    if field == GroupField::Unknown {
        warn!(field = %args.by, "unknown group field, counting every record as 'unknown'");
    }

    let pipeline = build_pipeline(config, None)?;
    info!(path = %args.file.display(), field = %field, "grouping log records");
    let records = pipeline.read_log_file(&args.file).await?;

    let report = GroupReport {
        source: args.file.display().to_string(),
        field: field.as_str().to_owned(),
        groups: group_by(&records, field),
    };
    writer.render(&report)
}

/// Record counts keyed by field value.
#[derive(Serialize)]
pub struct GroupReport {
    /// Log file path
    pub source: String,
    /// Grouping field
    pub field: String,
    pub groups: BTreeMap<String, usize>,
}

impl Render for GroupReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let mut rows: Vec<(&String, &usize)> = self.groups.iter().collect();
        // count descending, then key
        rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        writeln!(w, "{:<40} {:>8}", self.field.to_uppercase(), "COUNT")?;
        writeln!(w, "{}", "-".repeat(49))?;
        for (key, count) in rows {
            writeln!(w, "{:<40} {:>8}", key, count)?;
        }
        Ok(())
    }
}

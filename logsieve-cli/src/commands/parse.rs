//! `logsieve parse` command handler

use tracing::info;

use logsieve_core::config::LogsieveConfig;

use crate::cli::ParseArgs;
use crate::commands::{RecordsReport, build_pipeline};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `parse` command.
pub async fn execute(
    args: ParseArgs,
    config: &LogsieveConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let normalize = args.normalize.then_some(true);
    let pipeline = build_pipeline(config, normalize)?;

    info!(path = %args.file.display(), "parsing log file");
    let records = pipeline.read_log_file(&args.file).await?;

    writer.render(&RecordsReport::new(&args.file, records))
}

//! Export command: rebuild the denormalized view and write it out as CSV.

use std::path::{Path, PathBuf};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::repository::util::redact_url_password;
use crate::services::export::{classify_db_error, validate_output_path, write_csv, ExportError};

/// Run the denormalize-and-export pipeline.
pub async fn cmd_export(
    settings: &Settings,
    output: Option<PathBuf>,
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let output = match output.or_else(|| settings.output_path.clone()) {
        Some(path) => path,
        None => anyhow::bail!(
            "no output path: pass one as an argument or set output_path in pagexport.toml"
        ),
    };
    let limit = limit.unwrap_or(settings.export_limit);

    println!(
        "{} Exporting from {}",
        style("→").cyan(),
        redact_url_password(&settings.database_url())
    );
    println!("  Destination: {}", output.display());
    println!("  Row limit: {}", limit);

    match run_export(settings, &output, limit).await {
        Ok(rows) => {
            println!(
                "{} Exported {} rows to {}",
                style("✓").green(),
                rows,
                output.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(kind = e.kind(), "export failed: {}", e);
            eprintln!("{} Export failed: {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}

async fn run_export(settings: &Settings, output: &Path, limit: u32) -> Result<u64, ExportError> {
    // Fail on an unwritable destination before touching the database.
    validate_output_path(output)?;

    let ctx = settings.create_db_context().map_err(classify_db_error)?;
    let view = ctx.denormalized();

    view.ensure_view(limit).await.map_err(classify_db_error)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Running denormalization query...");
    let rows = view.fetch_all().await.map_err(classify_db_error)?;
    spinner.finish_and_clear();

    let progress = ProgressBar::new(rows.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} rows")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let written = write_csv(output, &rows, |n| progress.set_position(n))?;
    progress.finish_and_clear();

    tracing::info!("wrote {} rows to {}", written, output.display());
    Ok(written)
}

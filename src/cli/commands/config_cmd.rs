//! Configuration display command.

use console::style;

use crate::config::Settings;
use crate::repository::util::redact_url_password;

/// Print the effective configuration.
pub fn cmd_config(settings: &Settings) -> anyhow::Result<()> {
    println!("{} Effective configuration", style("→").cyan());
    println!(
        "  Database:     {}",
        redact_url_password(&settings.database_url())
    );
    println!("  Data dir:     {}", settings.data_dir.display());
    println!(
        "  Output path:  {}",
        settings
            .output_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("  Export limit: {}", settings.export_limit);
    Ok(())
}

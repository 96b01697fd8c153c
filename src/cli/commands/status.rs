//! Status command: table counts and page statistics.

use console::style;

use crate::config::Settings;
use crate::repository::util::redact_url_password;

/// Show system status.
pub async fn cmd_status(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    ctx.test_connection().await?;

    let stats = ctx.pages().statistics().await?;
    let category_count = ctx.categories().count().await?;

    if json {
        let payload = serde_json::json!({
            "database": redact_url_password(&settings.database_url()),
            "pages": stats,
            "categories": category_count,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{} Database: {}",
        style("→").cyan(),
        redact_url_password(&settings.database_url())
    );
    println!("  Pages:      {}", stats.total_pages);
    println!("  Categories: {}", category_count);
    println!("  Projects:   {}", stats.projects_count);
    println!("  Namespaces: {}", stats.namespaces_count);
    println!("  Total views: {}", stats.total_views);
    if stats.total_pages > 0 {
        println!(
            "  Views/page: avg {:.1}, min {}, max {}",
            stats.avg_views, stats.min_views, stats.max_views
        );
    }

    Ok(())
}

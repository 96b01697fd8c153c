//! Page inspection and maintenance commands.

use console::style;

use crate::config::Settings;
use crate::models::Page;

/// Print a one-line-per-page table.
fn print_page_table(pages: &[Page]) {
    if pages.is_empty() {
        println!("{} No pages found", style("!").yellow());
        return;
    }

    println!(
        "{:>8} {:<40} {:>8} {:<20} {}",
        "ID", "TITLE", "VIEWS", "PROJECT", "NAMESPACE"
    );
    for page in pages {
        let title = truncate(&page.title, 40);
        println!(
            "{:>8} {:<40} {:>8} {:<20} {}",
            page.id,
            title,
            page.views,
            page.project_name.as_deref().unwrap_or("-"),
            page.namespace_name.as_deref().unwrap_or("-"),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

/// List pages with pagination.
pub async fn cmd_page_ls(settings: &Settings, limit: i64, offset: i64) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    let pages = ctx.pages().list(limit, offset).await?;
    print_page_table(&pages);
    Ok(())
}

/// Show one page by ID or title.
pub async fn cmd_page_show(settings: &Settings, page: &str, json: bool) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    let repo = ctx.pages();

    let found = match page.parse::<i32>() {
        Ok(id) => repo.get(id).await?,
        // Not numeric: treat as a title, then re-fetch with joined names
        Err(_) => match repo.get_by_title(page).await? {
            Some(p) => repo.get(p.id).await?,
            None => None,
        },
    };

    let Some(found) = found else {
        anyhow::bail!("page '{}' not found", page);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    println!("{} {}", style("Page").cyan(), found.id);
    println!("  Title:     {}", found.title);
    println!("  Status:    {}", found.status.as_str());
    println!("  Views:     {}", found.views);
    println!(
        "  Project:   {}",
        found.project_name.as_deref().unwrap_or("-")
    );
    println!(
        "  Namespace: {}",
        found.namespace_name.as_deref().unwrap_or("-")
    );
    if let Some(created) = found.created_at {
        println!("  Created:   {}", created.to_rfc3339());
    }
    if !found.text.is_empty() {
        println!("  Text:      {}", truncate(&found.text, 200));
    }

    Ok(())
}

/// Search pages by keyword.
pub async fn cmd_page_search(settings: &Settings, query: &str, limit: i64) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    let pages = ctx.pages().search(query, limit).await?;
    print_page_table(&pages);
    Ok(())
}

/// Show the top viewed pages.
pub async fn cmd_page_top(settings: &Settings, limit: i64) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    let pages = ctx.pages().top_viewed(limit).await?;
    print_page_table(&pages);
    Ok(())
}

/// Increment a page's view counter.
pub async fn cmd_page_touch(settings: &Settings, id: i32, by: i32) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    let repo = ctx.pages();

    if !repo.increment_views(id, by).await? {
        anyhow::bail!("page {} not found", id);
    }

    let views = repo.get(id).await?.map(|p| p.views).unwrap_or(0);
    println!(
        "{} Page {} now has {} views",
        style("✓").green(),
        id,
        views
    );
    Ok(())
}

/// Delete a page.
pub async fn cmd_page_rm(settings: &Settings, id: i32, confirm: bool) -> anyhow::Result<()> {
    if !confirm {
        anyhow::bail!("refusing to delete page {} without --confirm", id);
    }

    let ctx = settings.create_db_context()?;
    if ctx.pages().delete(id).await? {
        println!("{} Deleted page {}", style("✓").green(), id);
        Ok(())
    } else {
        anyhow::bail!("page {} not found", id);
    }
}

//! Category inspection commands.

use console::style;

use crate::config::Settings;

/// List categories with their page counts.
pub async fn cmd_category_ls(settings: &Settings, limit: i64, offset: i64) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    let categories = ctx.categories().list(limit, offset).await?;

    if categories.is_empty() {
        println!("{} No categories found", style("!").yellow());
        return Ok(());
    }

    println!("{:>8} {:<40} {:>8}", "ID", "NAME", "PAGES");
    for category in &categories {
        println!(
            "{:>8} {:<40} {:>8}",
            category.id, category.name, category.page_count
        );
    }
    Ok(())
}

/// Show one category by name.
pub async fn cmd_category_show(settings: &Settings, name: &str) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;

    let Some(category) = ctx.categories().get_by_name(name).await? else {
        anyhow::bail!("category '{}' not found", name);
    };

    println!("{} {}", style("Category").cyan(), category.id);
    println!("  Name:   {}", category.name);
    println!("  Status: {}", category.status.as_str());
    println!("  Pages:  {}", category.page_count);
    if !category.text_content.is_empty() {
        println!("  Text:   {}", category.text_content);
    }
    Ok(())
}

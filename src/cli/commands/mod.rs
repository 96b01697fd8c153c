//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod category;
mod config_cmd;
mod export;
mod page;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings, LoadOptions};

#[derive(Parser)]
#[command(name = "pagex")]
#[command(about = "Wiki page denormalization and CSV export tool")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database URL or SQLite file path (overrides config and DATABASE_URL)
    #[arg(short = 'd', long, global = true)]
    database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the denormalized page view and export it to CSV
    Export {
        /// Destination file (overrides the configured output path)
        output: Option<PathBuf>,
        /// Row limit baked into the view definition (default: 10000)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show table counts and page statistics
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect and maintain pages
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },

    /// Inspect categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum PageCommands {
    /// List pages
    Ls {
        /// Limit number of results
        #[arg(short, long, default_value = "50")]
        limit: i64,
        /// Skip this many rows
        #[arg(short, long, default_value = "0")]
        offset: i64,
    },

    /// Show one page by ID or title
    Show {
        /// Page ID, or a title if not numeric
        page: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search pages by keyword in title or text
    Search {
        /// Search query
        query: String,
        /// Limit number of results
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Show the top viewed pages
    Top {
        /// Limit number of results
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },

    /// Increment a page's view counter
    Touch {
        /// Page ID
        id: i32,
        /// Increment amount
        #[arg(long, default_value = "1")]
        by: i32,
    },

    /// Delete a page
    Rm {
        /// Page ID
        id: i32,
        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories with their page counts
    Ls {
        /// Limit number of results
        #[arg(short, long, default_value = "50")]
        limit: i64,
        /// Skip this many rows
        #[arg(short, long, default_value = "0")]
        offset: i64,
    },

    /// Show one category by name
    Show {
        /// Category name (case-insensitive)
        name: String,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        database: cli.database,
    };
    let settings = load_settings(options)?;

    match cli.command {
        Commands::Export { output, limit } => export::cmd_export(&settings, output, limit).await,
        Commands::Status { json } => status::cmd_status(&settings, json).await,
        Commands::Page { command } => match command {
            PageCommands::Ls { limit, offset } => page::cmd_page_ls(&settings, limit, offset).await,
            PageCommands::Show { page, json } => page::cmd_page_show(&settings, &page, json).await,
            PageCommands::Search { query, limit } => {
                page::cmd_page_search(&settings, &query, limit).await
            }
            PageCommands::Top { limit } => page::cmd_page_top(&settings, limit).await,
            PageCommands::Touch { id, by } => page::cmd_page_touch(&settings, id, by).await,
            PageCommands::Rm { id, confirm } => page::cmd_page_rm(&settings, id, confirm).await,
        },
        Commands::Category { command } => match command {
            CategoryCommands::Ls { limit, offset } => {
                category::cmd_category_ls(&settings, limit, offset).await
            }
            CategoryCommands::Show { name } => category::cmd_category_show(&settings, &name).await,
        },
        Commands::Config => config_cmd::cmd_config(&settings),
    }
}

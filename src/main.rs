//! pagexport - wiki page denormalization and CSV export tool.
//!
//! Builds the `denormalized_page_data` view over a wiki-style page database
//! and exports it to CSV, plus small inspection commands for the underlying
//! tables.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if pagexport::cli::is_verbose() {
        "pagexport=info"
    } else {
        "pagexport=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    pagexport::cli::run().await
}

//! Content Gallery CLI application
//!
//! Command-line interface for filtering, searching and paging through a
//! catalogue of images hosted on Google Drive.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use content_gallery::cli::{
    handle_auth, handle_browse, handle_config, handle_options, handle_search, Cli, Commands,
};
use content_gallery::config::AppConfig;
use content_gallery::errors::{AppError, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config)?;

    info!("Content Gallery v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Search(args) => {
            info!("Executing search command");
            handle_search(args, &cli.global, &config).await
        }
        Commands::Browse(args) => {
            info!("Executing browse command");
            handle_browse(args, &cli.global, &config).await
        }
        Commands::Options => {
            info!("Executing options command");
            handle_options(&cli.global, &config).await
        }
        Commands::Auth(args) => {
            info!("Executing auth command");
            handle_auth(args, &config).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, &config).await
        }
    }
}

/// Initialize logging from CLI verbosity flags, falling back to `[logging] level`
fn init_logging(cli: &Cli, config: &AppConfig) -> Result<()> {
    let global = &cli.global;
    let log_level = cli.effective_log_level(&config.logging.level);

    let directive = format!("content_gallery={}", log_level)
        .parse()
        .map_err(|e| AppError::generic(format!("Invalid log level '{}': {}", log_level, e)))?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(global.very_verbose) // Show levels only in very verbose mode
        .init();

    if global.very_verbose {
        info!("Very verbose logging enabled");
    } else if global.verbose {
        info!("Verbose logging enabled");
    }

    Ok(())
}

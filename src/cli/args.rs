//! Command-line argument parsing for Content Gallery
//!
//! This module defines the CLI structure using clap derive macros: searching
//! and browsing the gallery, listing selector options, credential management
//! and configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{FilterCriteria, Selection};

/// Content Gallery - Browse marketing images stored on Google Drive
#[derive(Parser, Debug)]
#[command(
    name = "content_gallery",
    version,
    about = "Filter, search and page through a catalogue of Drive-hosted images",
    long_about = "Loads the image catalogue from PostgreSQL (or a JSON export), filters it by
category, client and keyword, and shows ten records per page with their Drive images."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read records from a JSON file instead of the database
    #[arg(long, global = true, value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// PostgreSQL connection string (overrides DATABASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one page of filtered results
    Search(SearchArgs),

    /// Interactively page through results
    Browse(BrowseArgs),

    /// List category and client options with record counts
    Options,

    /// Manage credentials
    Auth(AuthArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the search command
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Only show records of this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only show records of this client
    #[arg(short = 'k', long)]
    pub client: Option<String>,

    /// Keyword matched against title, description and keywords
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Page to show (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Save fetched images into this directory
    #[arg(long, value_name = "DIR")]
    pub image_dir: Option<PathBuf>,

    /// Overwrite images that already exist in the image directory
    #[arg(short, long)]
    pub force: bool,

    /// Skip image fetching entirely
    #[arg(long)]
    pub no_images: bool,
}

/// Arguments for the browse command
#[derive(Args, Debug, Clone, Default)]
pub struct BrowseArgs {
    /// Save fetched images into this directory
    #[arg(long, value_name = "DIR")]
    pub image_dir: Option<PathBuf>,

    /// Skip image fetching entirely
    #[arg(long)]
    pub no_images: bool,
}

/// Arguments for credential management
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Credential actions
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Set up the Drive token and database URL
    Setup {
        /// Force setup even if credentials exist
        #[arg(short, long)]
        force: bool,
    },

    /// Verify the Drive token
    Verify,

    /// Show credential status
    Status,

    /// Remove stored credentials from .env
    Clear,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }

    /// Level for the crate's log directive
    ///
    /// Verbosity flags win. Without them the configured level applies, which
    /// defaults to warn so log lines stay out of the gallery output.
    pub fn effective_log_level(&self, configured: &str) -> String {
        let global = &self.global;
        if global.quiet || global.verbose || global.very_verbose {
            self.log_level().to_string().to_lowercase()
        } else {
            configured.trim().to_lowercase()
        }
    }
}

impl SearchArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("Page numbers start at 1".to_string());
        }

        if self.no_images && self.image_dir.is_some() {
            return Err("Cannot specify both --no-images and --image-dir".to_string());
        }

        Ok(())
    }

    /// Filter criteria for already validated selections
    pub fn criteria(&self, category: Selection, client: Selection) -> FilterCriteria {
        FilterCriteria {
            selected_category: category,
            selected_client: client,
            search_term: self.search.clone().unwrap_or_default(),
        }
    }
}

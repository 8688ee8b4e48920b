//! Command-line interface components
//!
//! This module contains CLI-specific code for the Content Gallery
//! application, including argument parsing, command handlers and the
//! interactive prompts of the browse loop.

pub mod args;
pub mod commands;
pub mod prompt;

pub use args::{
    AuthAction, AuthArgs, BrowseArgs, Cli, Commands, ConfigAction, ConfigArgs, GlobalArgs,
    SearchArgs,
};
pub use commands::{handle_auth, handle_browse, handle_config, handle_options, handle_search};
pub use prompt::BrowseAction;

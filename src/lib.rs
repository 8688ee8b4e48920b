//! Content Gallery Library
//!
//! Filter, search and page through a catalogue of image records whose files
//! live on Google Drive. Records are loaded once per session from PostgreSQL
//! (or a JSON export); images are fetched one record at a time.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

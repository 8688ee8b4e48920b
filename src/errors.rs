//! Error types for Content Gallery
//!
//! This module defines the error types for every component of the application.
//! Setup-level errors (store, credentials, configuration) halt a session, while
//! fetch errors are converted into a per-record "no image" outcome by the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Credential-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing environment variables for credentials
    #[error(
        "Missing Google Drive credentials. Set GDRIVE_ACCESS_TOKEN or run 'auth setup'"
    )]
    MissingCredentials,

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// HTTP client could not be built or the verification request failed
    #[error("HTTP request failed during authentication")]
    Http(#[from] reqwest::Error),

    /// Token rejected or malformed
    #[error("Invalid access token: {reason}")]
    InvalidToken { reason: String },

    /// Invalid client configuration
    #[error("Invalid client configuration: {reason}")]
    InvalidConfig { reason: String },

    /// File I/O error during credential storage
    #[error("Failed to save credentials to file")]
    CredentialStorage(#[from] std::io::Error),
}

/// Remote file fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// I/O error while saving fetched bytes
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// Invalid URL built for the request
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// File does not exist (HTTP 404)
    #[error("File not found: {file_id}")]
    NotFound { file_id: String },

    /// Access to the file was refused (HTTP 403)
    #[error("Access to file {file_id} is forbidden")]
    Forbidden { file_id: String },

    /// Token expired or invalid (HTTP 401)
    #[error("Request for file {file_id} was not authorized")]
    Unauthorized { file_id: String },

    /// Server returned another error status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Server responded with HTTP 429")]
    RateLimitExceeded,

    /// Service overloaded
    #[error("Service unavailable. Server responded with HTTP 503")]
    ServiceUnavailable,

    /// Maximum retries exceeded
    #[error("Maximum retry attempts ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    /// Destination already exists and force flag not set
    #[error("File already exists: {path}. Use --force to overwrite")]
    FileExists { path: String },

    /// Atomic rename failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },
}

/// Backing store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// No connection string configured
    #[error(
        "No database configured. Set DATABASE_URL, use --database-url, or pass --records FILE"
    )]
    MissingDatabaseUrl,

    /// Connection could not be established
    #[error("Failed to connect to database: {0}")]
    Connection(#[source] tokio_postgres::Error),

    /// Query failed
    #[error("Failed to fetch records: {0}")]
    Query(#[source] tokio_postgres::Error),

    /// Column had an unexpected type
    #[error("Column '{column}' could not be read as text: {reason}")]
    Column { column: String, reason: String },

    /// Table name contains characters outside the safe identifier set
    #[error("Invalid table name: {table}")]
    InvalidTableName { table: String },

    /// Records file not found
    #[error("Records file not found: {path}")]
    NotFound { path: PathBuf },

    /// Records file is not a JSON array of records
    #[error("Invalid records file")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a records file
    #[error("I/O error reading records file")]
    Io(#[from] std::io::Error),
}

/// Gallery selection errors
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Requested category is not in the dataset
    #[error("Unknown category '{value}'. Available: {available}")]
    UnknownCategory { value: String, available: String },

    /// Requested client is not in the dataset
    #[error("Unknown client '{value}'. Available: {available}")]
    UnknownClient { value: String, available: String },

    /// Page number outside the result range
    #[error("Page {page} is out of range (1-{total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Configuration could not be serialized")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// No user configuration directory on this platform
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Credential error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Gallery selection error
    #[error(transparent)]
    Gallery(#[from] GalleryError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is transient and worth retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Fetch(FetchError::Http(_))
                | AppError::Fetch(FetchError::RateLimitExceeded)
                | AppError::Fetch(FetchError::ServiceUnavailable)
                | AppError::Auth(AuthError::Http(_))
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "authentication",
            AppError::Fetch(_) => "fetch",
            AppError::Store(_) => "store",
            AppError::Gallery(_) => "gallery",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Store result type alias
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Gallery result type alias
pub type GalleryResult<T> = std::result::Result<T, GalleryError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

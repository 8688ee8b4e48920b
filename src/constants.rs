//! Application constants for Content Gallery
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names for credentials
pub mod env {
    /// Environment variable holding the Google Drive OAuth access token
    pub const DRIVE_TOKEN: &str = "GDRIVE_ACCESS_TOKEN";

    /// Environment variable holding the PostgreSQL connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
}

/// Credential storage constants
pub mod auth {
    /// Minimum plausible length of an OAuth access token
    pub const MIN_TOKEN_LENGTH: usize = 20;

    /// File permissions for .env file (Unix only) - owner read/write only
    #[cfg(unix)]
    pub const ENV_FILE_PERMISSIONS: u32 = 0o600;

    /// Default .env file name
    pub const ENV_FILE_NAME: &str = ".env";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Content-Gallery/0.1.0 (Image Content Finder)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Rate limiting and retry configuration
pub mod limits {
    /// Default rate limit for Drive requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;

    /// Maximum retry attempts for failed requests
    pub const MAX_RETRIES: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 500;

    /// Upper bound on a single backoff delay (milliseconds)
    pub const MAX_BACKOFF_DELAY_MS: u64 = 30_000;

    /// Largest accepted `[client] max_retries`
    pub const MAX_RETRIES_LIMIT: u32 = 10;
}

/// Google Drive endpoints and link shapes
pub mod drive {
    /// Drive v3 REST API base URL
    pub const API_BASE_URL: &str = "https://www.googleapis.com/drive/v3/";

    /// Host fragment a shared "view" link must contain
    pub const LINK_HOST_FRAGMENT: &str = "drive.google.com";

    /// Path marker that precedes the file identifier in a "view" link
    pub const LINK_ID_MARKER: &str = "/d/";
}

/// Backing store defaults
pub mod store {
    /// Table holding the image metadata
    pub const DEFAULT_TABLE: &str = "management_content_img";
}

/// Gallery presentation constants
pub mod gallery {
    /// Number of records shown per page
    pub const PAGE_SIZE: usize = 10;

    /// Label shown for the inactive category selector
    pub const ALL_CATEGORIES_LABEL: &str = "All categories";

    /// Label shown for the inactive client selector
    pub const ALL_CLIENTS_LABEL: &str = "All clients";
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Extension used when saving images whose type is unknown
    pub const DEFAULT_IMAGE_EXTENSION: &str = "img";
}

/// Logging constants
pub mod logging {
    /// Default log level when no verbosity flag is given
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

// Re-export commonly used constants for convenience
pub use env::{DATABASE_URL as ENV_DATABASE_URL, DRIVE_TOKEN as ENV_DRIVE_TOKEN};
pub use gallery::PAGE_SIZE;
pub use http::USER_AGENT;
pub use limits::{DEFAULT_RATE_LIMIT_RPS, MAX_RETRIES, RETRY_BASE_DELAY_MS};

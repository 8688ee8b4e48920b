//! Google Drive client
//!
//! This module provides the remote file fetcher used to load gallery images.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Core HTTP operations with rate limiting and retries
//! - `download`: File content download and atomic saving

use std::env;
use std::future::Future;

use url::Url;

use crate::constants::env as env_constants;
use crate::errors::{AuthError, AuthResult, FetchError, FetchResult};

pub mod config;
pub mod download;
pub mod http;

pub use config::ClientConfig;
pub use download::save_bytes;

use download::DownloadHandler;
use http::HttpHandler;

/// Capability to fetch the raw bytes of a remote file by identifier
///
/// Implementations report every failure as an error; callers decide whether a
/// failure is fatal. The gallery treats all of them as "no image".
pub trait FileFetcher {
    /// Fetch the complete content of `file_id`
    fn fetch_file_bytes(&self, file_id: &str) -> impl Future<Output = FetchResult<Vec<u8>>>;
}

/// Client for the Google Drive v3 REST API
#[derive(Debug)]
pub struct DriveClient {
    http_handler: HttpHandler,
    api_base: Url,
}

impl DriveClient {
    /// Creates a client authenticated with the token from `GDRIVE_ACCESS_TOKEN`
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EnvVar` if the token is not set, or an error if the
    /// HTTP client cannot be built
    pub fn new() -> AuthResult<Self> {
        Self::from_env_with_config(ClientConfig::default())
    }

    /// Creates a client from environment credentials with custom configuration
    pub fn from_env_with_config(config: ClientConfig) -> AuthResult<Self> {
        let token = env::var(env_constants::DRIVE_TOKEN)?;
        if token.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Self::with_config(config, Some(token.trim().to_string()))
    }

    /// Creates a client with explicit configuration and optional bearer token
    ///
    /// Without a token only publicly shared files can be fetched.
    pub fn with_config(config: ClientConfig, token: Option<String>) -> AuthResult<Self> {
        let api_base = Url::parse(&config.api_base_url).map_err(|e| AuthError::InvalidConfig {
            reason: format!("invalid API base URL '{}': {}", config.api_base_url, e),
        })?;
        let client = config.build_http_client()?;
        let http_handler =
            HttpHandler::new(client, config.rate_limit_rps, config.max_retries, token)?;

        tracing::info!(
            "Created Drive client for {} (authenticated: {})",
            api_base,
            http_handler.is_authenticated()
        );

        Ok(Self {
            http_handler,
            api_base,
        })
    }

    /// Check that the token is accepted by asking for the current user
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Unauthorized` when the token is rejected
    pub async fn verify_token(&self) -> FetchResult<()> {
        let mut url = self.api_base.join("about").map_err(|e| FetchError::InvalidUrl {
            url: self.api_base.to_string(),
            error: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("fields", "user");

        let response = self.http_handler.get_response(&url).await?;
        match response.status().as_u16() {
            200..=299 => Ok(()),
            401 | 403 => Err(FetchError::Unauthorized {
                file_id: "about".to_string(),
            }),
            status => Err(FetchError::ServerError { status }),
        }
    }

    /// Download file content by identifier
    pub async fn download_file_content(&self, file_id: &str) -> FetchResult<Vec<u8>> {
        DownloadHandler::new(&self.http_handler, &self.api_base)
            .download_file_content(file_id)
            .await
    }

    /// Get the API base URL
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }
}

impl FileFetcher for DriveClient {
    async fn fetch_file_bytes(&self, file_id: &str) -> FetchResult<Vec<u8>> {
        self.download_file_content(file_id).await
    }
}

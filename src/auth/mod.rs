//! Credential management for the record store and Google Drive
//!
//! Credentials are passed through from the environment: a Drive OAuth access
//! token and a PostgreSQL connection string. This module offers interactive
//! setup, verification against the Drive API and storage in a .env file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use content_gallery::app::ClientConfig;
//! use content_gallery::auth::{check_credentials, setup_credentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! if !check_credentials() {
//!     println!("Setting up credentials...");
//!     setup_credentials(ClientConfig::default()).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod credentials;

pub use credentials::{
    check_credentials, clear_credentials, clear_credentials_from, get_auth_status,
    prompt_credentials, save_credentials, save_credentials_to, setup_credentials,
    show_auth_status, verify_credentials, AuthStatus,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        let status = get_auth_status();
        assert_eq!(status.has_credentials(), check_credentials());
        assert!(status.token_valid.is_none());
    }
}

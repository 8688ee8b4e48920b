//! Prelude module for Content Gallery Library
//!
//! Re-exports the items needed for typical usage with a single
//! `use content_gallery::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use content_gallery::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let source = config.record_source(None, None)?;
//!     let gallery = Gallery::new(load_records(&source).await?);
//!
//!     let mut page_state = PageState::new();
//!     let page = gallery.view(&FilterCriteria::all(), &mut page_state);
//!     let client = DriveClient::from_env_with_config(config.client_config()).ok();
//!     let rendered = render_page(&page, &config.link_resolver(), client.as_ref()).await;
//!     println!("{} records on {}", rendered.len(), page.position());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

pub use crate::app::{
    // Filtering and paging
    apply_filters,
    distinct_options,
    load_records,
    paginate,
    render_page,
    resolve_and_fetch_image,
    resolve_file_id,
    ClientConfig,
    // Remote files
    DriveClient,
    FileFetcher,
    FilterCriteria,
    // Session
    Gallery,
    GalleryPage,
    ImageOutcome,
    // Data types
    ImageRecord,
    LinkResolver,
    PageState,
    PageWindow,
    RecordField,
    RecordSource,
    Selection,
};

pub use crate::auth::{check_credentials, get_auth_status, AuthStatus};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{ENV_DATABASE_URL, ENV_DRIVE_TOKEN, PAGE_SIZE, USER_AGENT};

pub use std::path::{Path, PathBuf};

pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _client_config = ClientConfig::default();
        let _config = AppConfig::default();
        let _has_creds = check_credentials();
        let _auth_status = get_auth_status();

        assert_eq!(PAGE_SIZE, 10);
        assert_eq!(paginate(0, 1, PAGE_SIZE).total_pages, 1);
    }

    #[test]
    fn test_prelude_integration_pattern() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"[{"title": "Spring Sale", "category": "Banners", "klien": "Acme"}]"#,
        )
        .unwrap();

        let records =
            tokio_test::block_on(load_records(&RecordSource::JsonFile(path))).unwrap();
        let gallery = Gallery::new(records);
        let mut page_state = PageState::new();
        let page = gallery.view(&FilterCriteria::all(), &mut page_state);

        assert_eq!(page.total_items, 1);
        assert_eq!(page.position(), "Page 1 of 1");
    }
}

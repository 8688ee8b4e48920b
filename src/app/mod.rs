//! Core application logic for Content Gallery
//!
//! This module contains the record model, the filter engine, the paginator,
//! the link resolver, the Drive client and the store that loads the dataset.
//!
//! # Examples
//!
//! ```rust,no_run
//! use content_gallery::app::{
//!     load_records, render_page, DriveClient, FilterCriteria, Gallery, LinkResolver, PageState,
//!     RecordSource, Selection,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = RecordSource::JsonFile("records.json".into());
//! let gallery = Gallery::new(load_records(&source).await?);
//!
//! let criteria = FilterCriteria {
//!     selected_category: Selection::Only("Banners".to_string()),
//!     ..Default::default()
//! };
//! let mut page_state = PageState::new();
//! let page = gallery.view(&criteria, &mut page_state);
//!
//! let client = DriveClient::new().ok();
//! for item in render_page(&page, &LinkResolver::default(), client.as_ref()).await {
//!     println!("{}: loaded={}", item.record.display_title(), item.image.is_loaded());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod filter;
pub mod gallery;
pub mod models;
pub mod pagination;
pub mod resolver;
pub mod store;

// Re-export main public API
pub use client::{save_bytes, ClientConfig, DriveClient, FileFetcher};
pub use filter::{apply_filters, distinct_options, matches_criteria};
pub use gallery::{
    render_page, resolve_and_fetch_image, Gallery, GalleryPage, ImageOutcome, RenderedRecord,
};
pub use models::{FilterCriteria, ImageRecord, RecordField, Selection};
pub use pagination::{paginate, total_pages, PageState, PageWindow};
pub use resolver::{resolve_file_id, LinkResolver};
pub use store::{load_records, RecordSource};

//! Gallery recomputation and render passes
//!
//! A recomputation pass refilters the dataset, recounts pages on the caller's
//! [`PageState`] and slices the current window. A render pass then walks that
//! window in order and fetches one image per record. A failed record never
//! stops the records after it.

use tracing::{debug, warn};

use crate::app::client::FileFetcher;
use crate::app::filter::{apply_filters, distinct_options};
use crate::app::models::{FilterCriteria, ImageRecord, RecordField, Selection};
use crate::app::pagination::{PageState, PageWindow};
use crate::app::resolver::LinkResolver;
use crate::errors::{GalleryError, GalleryResult};

/// Outcome of loading the image for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Image bytes fetched
    Loaded(Vec<u8>),
    /// No identifier in the link, or no fetch service available
    Unavailable,
    /// The fetch was attempted and failed
    FetchFailed(String),
}

impl ImageOutcome {
    /// Bytes if the image loaded
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Loaded(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Resolve a record link and fetch its image
///
/// The fetcher is only called when both an identifier and a fetcher exist.
/// Any fetch error becomes [`ImageOutcome::FetchFailed`].
pub async fn resolve_and_fetch_image<F: FileFetcher>(
    link: Option<&str>,
    resolver: &LinkResolver,
    fetcher: Option<&F>,
) -> ImageOutcome {
    let file_id = link.and_then(|link| resolver.resolve(link));

    let (Some(file_id), Some(fetcher)) = (file_id, fetcher) else {
        debug!(
            "Skipping image fetch (identifier: {}, service: {})",
            file_id.is_some(),
            fetcher.is_some()
        );
        return ImageOutcome::Unavailable;
    };

    match fetcher.fetch_file_bytes(file_id).await {
        Ok(bytes) => ImageOutcome::Loaded(bytes),
        Err(e) => {
            warn!("Failed to download file {}: {}", file_id, e);
            ImageOutcome::FetchFailed(e.to_string())
        }
    }
}

/// The session dataset together with its selector options
#[derive(Debug, Clone)]
pub struct Gallery {
    records: Vec<ImageRecord>,
    category_options: Vec<Selection>,
    client_options: Vec<Selection>,
}

impl Gallery {
    /// Wrap a loaded dataset; option lists come from the whole dataset
    pub fn new(records: Vec<ImageRecord>) -> Self {
        let category_options = distinct_options(&records, RecordField::Category);
        let client_options = distinct_options(&records, RecordField::Client);
        Self {
            records,
            category_options,
            client_options,
        }
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Options for a selector, `Selection::All` first
    pub fn options(&self, field: RecordField) -> &[Selection] {
        match field {
            RecordField::Category => &self.category_options,
            RecordField::Client => &self.client_options,
        }
    }

    /// Check that a requested value is one of the selector's options
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::UnknownCategory`/`UnknownClient` listing the
    /// valid values
    pub fn select(&self, field: RecordField, value: Option<&str>) -> GalleryResult<Selection> {
        let Some(value) = value else {
            return Ok(Selection::All);
        };

        let options = self.options(field);
        if options.iter().any(|o| o.value() == Some(value)) {
            return Ok(Selection::Only(value.to_string()));
        }

        let available = options
            .iter()
            .filter_map(Selection::value)
            .collect::<Vec<_>>()
            .join(", ");
        let value = value.to_string();
        Err(match field {
            RecordField::Category => GalleryError::UnknownCategory { value, available },
            RecordField::Client => GalleryError::UnknownClient { value, available },
        })
    }

    /// Number of records carrying each option value, in option order (without "all")
    pub fn option_counts(&self, field: RecordField) -> Vec<(String, usize)> {
        self.options(field)
            .iter()
            .filter_map(Selection::value)
            .map(|value| {
                let count = self
                    .records
                    .iter()
                    .filter(|r| r.field(field) == Some(value))
                    .count();
                (value.to_string(), count)
            })
            .collect()
    }

    /// Run one recomputation pass for `criteria`
    ///
    /// Recounts `page_state`, which resets to page 1 if its page no longer exists.
    pub fn view<'a>(
        &'a self,
        criteria: &FilterCriteria,
        page_state: &mut PageState,
    ) -> GalleryPage<'a> {
        let filtered = apply_filters(&self.records, criteria);
        let total_items = filtered.len();

        if page_state.recount(total_items) {
            debug!("Current page no longer exists, back to page 1");
        }

        let window = page_state.window(total_items);
        let items = filtered[window.range()].to_vec();

        GalleryPage {
            total_items,
            current_page: page_state.current_page(),
            window,
            items,
        }
    }
}

/// One computed page of results
#[derive(Debug, Clone)]
pub struct GalleryPage<'a> {
    /// Size of the filtered set
    pub total_items: usize,
    /// 1-based page shown
    pub current_page: usize,
    /// Window over the filtered set
    pub window: PageWindow,
    /// Records in the window, in dataset order
    pub items: Vec<&'a ImageRecord>,
}

impl GalleryPage<'_> {
    pub fn total_pages(&self) -> usize {
        self.window.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// "Showing items X - Y of Z" line; None when nothing matched
    pub fn summary(&self) -> Option<String> {
        if self.total_items == 0 {
            return None;
        }
        Some(format!(
            "Showing items {} - {} of {} results",
            self.window.start + 1,
            self.window.end,
            self.total_items
        ))
    }

    /// "Page X of Y" line
    pub fn position(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages())
    }
}

/// A record of the current window with its image outcome
#[derive(Debug, Clone)]
pub struct RenderedRecord<'a> {
    /// 0-based index into the filtered set
    pub index: usize,
    pub record: &'a ImageRecord,
    pub image: ImageOutcome,
}

/// Fetch the image of every record in the page, one at a time, in order
///
/// Exactly one fetch per record; records sharing a link are fetched again.
pub async fn render_page<'a, F: FileFetcher>(
    page: &GalleryPage<'a>,
    resolver: &LinkResolver,
    fetcher: Option<&F>,
) -> Vec<RenderedRecord<'a>> {
    let mut rendered = Vec::with_capacity(page.items.len());

    for (offset, record) in page.items.iter().copied().enumerate() {
        let image = resolve_and_fetch_image(record.link.as_deref(), resolver, fetcher).await;
        rendered.push(RenderedRecord {
            index: page.window.start + offset,
            record,
            image,
        });
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FetchError, FetchResult};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingFetcher {
        calls: Mutex<Vec<String>>,
    }

    impl FileFetcher for RecordingFetcher {
        async fn fetch_file_bytes(&self, file_id: &str) -> FetchResult<Vec<u8>> {
            self.calls.lock().unwrap().push(file_id.to_string());
            if file_id == "missing" {
                Err(FetchError::NotFound {
                    file_id: file_id.to_string(),
                })
            } else {
                Ok(file_id.as_bytes().to_vec())
            }
        }
    }

    fn drive_link(id: &str) -> Option<String> {
        Some(format!("https://drive.google.com/file/d/{}/view?usp=sharing", id))
    }

    #[tokio::test]
    async fn test_no_fetch_without_identifier() {
        let fetcher = RecordingFetcher::default();
        let resolver = LinkResolver::default();

        let outcome =
            resolve_and_fetch_image(Some("https://example.com/a.png"), &resolver, Some(&fetcher))
                .await;
        assert_eq!(outcome, ImageOutcome::Unavailable);

        let outcome = resolve_and_fetch_image(None, &resolver, Some(&fetcher)).await;
        assert_eq!(outcome, ImageOutcome::Unavailable);

        assert!(fetcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_fetch_without_service() {
        let outcome = resolve_and_fetch_image::<RecordingFetcher>(
            drive_link("abc").as_deref(),
            &LinkResolver::default(),
            None,
        )
        .await;
        assert_eq!(outcome, ImageOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_outcome() {
        let fetcher = RecordingFetcher::default();
        let outcome = resolve_and_fetch_image(
            drive_link("missing").as_deref(),
            &LinkResolver::default(),
            Some(&fetcher),
        )
        .await;
        assert!(matches!(outcome, ImageOutcome::FetchFailed(_)));
        assert_eq!(outcome.into_bytes(), None);
    }

    #[tokio::test]
    async fn test_render_page_fetches_once_per_record() {
        let records = vec![
            ImageRecord {
                link: drive_link("same"),
                ..Default::default()
            },
            ImageRecord {
                link: drive_link("missing"),
                ..Default::default()
            },
            ImageRecord {
                link: Some("not a drive link".to_string()),
                ..Default::default()
            },
            ImageRecord {
                link: drive_link("same"),
                ..Default::default()
            },
        ];
        let gallery = Gallery::new(records);
        let mut state = PageState::new();
        let page = gallery.view(&FilterCriteria::all(), &mut state);

        let fetcher = RecordingFetcher::default();
        let rendered = render_page(&page, &LinkResolver::default(), Some(&fetcher)).await;

        assert_eq!(rendered.len(), 4);
        assert!(rendered[0].image.is_loaded());
        assert!(matches!(rendered[1].image, ImageOutcome::FetchFailed(_)));
        assert_eq!(rendered[2].image, ImageOutcome::Unavailable);
        assert!(rendered[3].image.is_loaded());
        assert_eq!(
            *fetcher.calls.lock().unwrap(),
            vec!["same", "missing", "same"]
        );
    }

    #[test]
    fn test_select_validates_options() {
        let gallery = Gallery::new(vec![ImageRecord {
            category: Some("Banners".to_string()),
            client: Some("Acme".to_string()),
            ..Default::default()
        }]);

        assert_eq!(
            gallery.select(RecordField::Category, Some("Banners")).unwrap(),
            Selection::Only("Banners".to_string())
        );
        assert_eq!(gallery.select(RecordField::Client, None).unwrap(), Selection::All);
        assert!(matches!(
            gallery.select(RecordField::Client, Some("Globex")),
            Err(GalleryError::UnknownClient { .. })
        ));
    }

    #[test]
    fn test_empty_result_page() {
        let gallery = Gallery::new(vec![ImageRecord::default()]);
        let mut state = PageState::new();
        let criteria = FilterCriteria {
            search_term: "nothing matches".to_string(),
            ..Default::default()
        };
        let page = gallery.view(&criteria, &mut state);

        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages(), 1);
        assert!(page.is_empty());
        assert_eq!(page.summary(), None);
        assert_eq!(page.position(), "Page 1 of 1");
    }
}

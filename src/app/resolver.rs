//! File identifier extraction from shared "view" links
//!
//! Links look like `https://drive.google.com/file/d/{FILE_ID}/view?usp=sharing`.
//! Matching is plain substring work on a known shape, not URL parsing: a link
//! that only looks right may yield a wrong identifier, and anything else
//! yields none. Callers treat "none" as "no image" for that record.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::drive;

/// Recognizes a provider's "view" link shape and extracts the file identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResolver {
    /// Fragment the link must contain (e.g., "drive.google.com")
    pub host_fragment: String,
    /// Marker immediately before the identifier segment (e.g., "/d/")
    pub id_marker: String,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self {
            host_fragment: drive::LINK_HOST_FRAGMENT.to_string(),
            id_marker: drive::LINK_ID_MARKER.to_string(),
        }
    }
}

impl LinkResolver {
    /// Resolver for a custom host fragment with the default marker
    pub fn for_host(host_fragment: impl Into<String>) -> Self {
        Self {
            host_fragment: host_fragment.into(),
            ..Default::default()
        }
    }

    /// Extract the file identifier from `link`
    ///
    /// The identifier is the text after the first marker up to the next `/`.
    /// An empty segment counts as no identifier.
    pub fn resolve<'a>(&self, link: &'a str) -> Option<&'a str> {
        if self.id_marker.is_empty()
            || !link.contains(self.host_fragment.as_str())
            || !link.contains(self.id_marker.as_str())
        {
            debug!("Link does not match the expected shape: {}", link);
            return None;
        }

        let (_, after_marker) = link.split_once(self.id_marker.as_str())?;
        let file_id = after_marker.split('/').next().unwrap_or("");

        if file_id.is_empty() {
            debug!("Link has an empty identifier segment: {}", link);
            None
        } else {
            Some(file_id)
        }
    }
}

/// Extract a Google Drive file identifier using the default link shape
pub fn resolve_file_id(link: &str) -> Option<&str> {
    LinkResolver::default().resolve(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_view_link() {
        let resolver = LinkResolver::for_host("drive.example.com");
        assert_eq!(
            resolver.resolve("https://drive.example.com/file/d/ABC123/view?usp=sharing"),
            Some("ABC123")
        );
    }

    #[test]
    fn test_resolves_google_drive_link() {
        assert_eq!(
            resolve_file_id("https://drive.google.com/file/d/1a2B3c_-XyZ/view?usp=drive_link"),
            Some("1a2B3c_-XyZ")
        );
    }

    #[test]
    fn test_other_shapes_yield_none() {
        let resolver = LinkResolver::for_host("drive.example.com");
        assert_eq!(resolver.resolve("https://example.com/other/path"), None);
        assert_eq!(resolver.resolve(""), None);

        // Right host, no marker
        assert_eq!(
            resolve_file_id("https://drive.google.com/open?id=ABC123"),
            None
        );
        // Marker but wrong host
        assert_eq!(resolve_file_id("https://example.com/file/d/ABC123/view"), None);
    }

    #[test]
    fn test_identifier_without_trailing_segment() {
        // Heuristic: everything up to the next '/' is taken, query included
        assert_eq!(
            resolve_file_id("https://drive.google.com/file/d/ABC123"),
            Some("ABC123")
        );
        assert_eq!(
            resolve_file_id("https://drive.google.com/file/d/ABC123?usp=sharing"),
            Some("ABC123?usp=sharing")
        );
    }

    #[test]
    fn test_empty_identifier_is_none() {
        assert_eq!(resolve_file_id("https://drive.google.com/file/d//view"), None);
    }

    #[test]
    fn test_first_marker_wins() {
        assert_eq!(
            resolve_file_id("https://drive.google.com/file/d/FIRST/d/SECOND/view"),
            Some("FIRST")
        );
    }
}

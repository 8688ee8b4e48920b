//! Data models for Content Gallery
//!
//! This module defines the records loaded from the backing store, the filter
//! criteria derived from user input, and the selector values used by both.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::gallery;

/// One row of image metadata
///
/// Every field may be absent in the backing table, so all of them are optional.
/// Records are loaded once per session and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Category label (e.g., "Banners")
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form keyword text, not a structured list
    #[serde(default)]
    pub keywords: Option<String>,
    /// Client the image was produced for
    #[serde(default, rename = "klien")]
    pub client: Option<String>,
    /// Shared "view" link to the image file
    #[serde(default)]
    pub link: Option<String>,
}

impl ImageRecord {
    /// Title or a placeholder for display
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    /// Read the value of a selector field
    pub fn field(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Category => self.category.as_deref(),
            RecordField::Client => self.client.as_deref(),
        }
    }
}

/// Fields that have a selector in the filter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// The `category` column
    Category,
    /// The `klien` column
    Client,
}

impl RecordField {
    /// Label for the inactive selector of this field
    pub fn all_label(&self) -> &'static str {
        match self {
            Self::Category => gallery::ALL_CATEGORIES_LABEL,
            Self::Client => gallery::ALL_CLIENTS_LABEL,
        }
    }

    /// Column name in the backing table
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Client => "klien",
        }
    }
}

/// A selector value: either the inactive "all" choice or one concrete value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Predicate inactive
    #[default]
    All,
    /// Keep only records whose field equals this value
    Only(String),
}

impl Selection {
    /// Build a selection from an optional CLI value
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(value) => Self::Only(value),
            None => Self::All,
        }
    }

    /// Whether this selection leaves the predicate inactive
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Concrete value, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }

    /// Label for display in a selector of the given field
    pub fn label(&self, field: RecordField) -> &str {
        match self {
            Self::All => field.all_label(),
            Self::Only(value) => value,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(value) => write!(f, "{}", value),
        }
    }
}

/// Active combination of category, client and keyword filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Category selector
    pub selected_category: Selection,
    /// Client selector
    pub selected_client: Selection,
    /// Free-text search, empty when inactive
    pub search_term: String,
}

impl FilterCriteria {
    /// Criteria with every predicate inactive
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether any predicate is active
    pub fn is_active(&self) -> bool {
        !self.selected_category.is_all()
            || !self.selected_client.is_all()
            || !self.search_term.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_klien_as_client() {
        let json = r#"{"title": "Spring sale", "klien": "Acme", "category": "Banners"}"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.client.as_deref(), Some("Acme"));
        assert_eq!(record.category.as_deref(), Some("Banners"));
        assert_eq!(record.description, None);
        assert_eq!(record.link, None);
    }

    #[test]
    fn test_record_ignores_unknown_columns() {
        let json = r#"{"title": "Logo", "content_id": 42, "created_at": "2024-01-01"}"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_title(), "Logo");
    }

    #[test]
    fn test_selection_labels() {
        assert_eq!(Selection::All.label(RecordField::Category), "All categories");
        assert_eq!(Selection::All.label(RecordField::Client), "All clients");
        assert_eq!(
            Selection::Only("Acme".to_string()).label(RecordField::Client),
            "Acme"
        );
        assert_eq!(Selection::from_option(None), Selection::All);
    }

    #[test]
    fn test_criteria_activity() {
        let mut criteria = FilterCriteria::all();
        assert!(!criteria.is_active());

        criteria.search_term = "cat".to_string();
        assert!(criteria.is_active());
    }
}

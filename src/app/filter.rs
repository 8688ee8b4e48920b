//! Filter engine for image records
//!
//! Applies the category, client and keyword predicates to the full dataset.
//! Every active predicate must hold for a record to be kept, and the output
//! keeps the relative order of the input.

use std::collections::BTreeSet;

use tracing::debug;

use crate::app::models::{FilterCriteria, ImageRecord, RecordField, Selection};

/// Distinct values of `field` over the entire dataset, sorted ascending,
/// with `Selection::All` first
///
/// Records where the field is absent contribute nothing, so they can only be
/// reached through the "all" choice.
pub fn distinct_options(records: &[ImageRecord], field: RecordField) -> Vec<Selection> {
    let values: BTreeSet<&str> = records.iter().filter_map(|r| r.field(field)).collect();

    std::iter::once(Selection::All)
        .chain(values.into_iter().map(|v| Selection::Only(v.to_string())))
        .collect()
}

/// Keep the records that satisfy every active predicate in `criteria`
pub fn apply_filters<'a>(
    records: &'a [ImageRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a ImageRecord> {
    let search_lower = criteria.search_term.to_lowercase();

    let filtered: Vec<&ImageRecord> = records
        .iter()
        .filter(|record| {
            matches_selection(record, RecordField::Category, &criteria.selected_category)
        })
        .filter(|record| {
            matches_selection(record, RecordField::Client, &criteria.selected_client)
        })
        .filter(|record| search_lower.is_empty() || matches_keyword(record, &search_lower))
        .collect();

    debug!(
        "Filtered {} records down to {} (category: {}, client: {}, search: {:?})",
        records.len(),
        filtered.len(),
        criteria.selected_category,
        criteria.selected_client,
        criteria.search_term
    );

    filtered
}

/// Check whether a record passes all active predicates
pub fn matches_criteria(record: &ImageRecord, criteria: &FilterCriteria) -> bool {
    let search_lower = criteria.search_term.to_lowercase();
    matches_selection(record, RecordField::Category, &criteria.selected_category)
        && matches_selection(record, RecordField::Client, &criteria.selected_client)
        && (search_lower.is_empty() || matches_keyword(record, &search_lower))
}

/// Exact, case-sensitive equality; an absent value never matches an active selector
fn matches_selection(record: &ImageRecord, field: RecordField, selection: &Selection) -> bool {
    match selection {
        Selection::All => true,
        Selection::Only(wanted) => record.field(field) == Some(wanted.as_str()),
    }
}

/// `needle` must already be lowercase
fn matches_keyword(record: &ImageRecord, needle: &str) -> bool {
    [&record.title, &record.description, &record.keywords]
        .into_iter()
        .any(|field| contains_lowercase(field.as_deref(), needle))
}

fn contains_lowercase(haystack: Option<&str>, needle: &str) -> bool {
    match haystack {
        Some(text) => text.to_lowercase().contains(needle),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, category: &str, client: Option<&str>) -> ImageRecord {
        ImageRecord {
            title: Some(title.to_string()),
            description: Some(format!("{} description", title)),
            category: Some(category.to_string()),
            keywords: None,
            client: client.map(str::to_string),
            link: None,
        }
    }

    fn sample() -> Vec<ImageRecord> {
        vec![
            record("Spring Banner", "Banners", Some("Acme")),
            record("Company Logo", "Logos", Some("Globex")),
            record("Summer Banner", "Banners", None),
            record("Winter Banner", "Banners", Some("Globex")),
            record("Icon Set", "Icons", Some("Acme")),
        ]
    }

    fn only(value: &str) -> Selection {
        Selection::Only(value.to_string())
    }

    #[test]
    fn test_no_active_predicates_keeps_everything() {
        let records = sample();
        let filtered = apply_filters(&records, &FilterCriteria::all());
        assert_eq!(filtered.len(), records.len());
    }

    #[test]
    fn test_category_filter_is_exact_and_case_sensitive() {
        let records = sample();
        let criteria = FilterCriteria {
            selected_category: only("Banners"),
            ..Default::default()
        };
        let titles: Vec<_> = apply_filters(&records, &criteria)
            .iter()
            .map(|r| r.display_title())
            .collect();
        assert_eq!(titles, vec!["Spring Banner", "Summer Banner", "Winter Banner"]);

        let criteria = FilterCriteria {
            selected_category: only("banners"),
            ..Default::default()
        };
        assert!(apply_filters(&records, &criteria).is_empty());
    }

    #[test]
    fn test_client_filter_excludes_missing_client() {
        let records = sample();
        let criteria = FilterCriteria {
            selected_category: only("Banners"),
            selected_client: only("Globex"),
            ..Default::default()
        };
        let filtered = apply_filters(&records, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].display_title(), "Winter Banner");
    }

    #[test]
    fn test_keyword_matches_title_with_missing_description() {
        let records = vec![ImageRecord {
            title: Some("A Cat Photo".to_string()),
            ..Default::default()
        }];
        let criteria = FilterCriteria {
            search_term: "cat".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &criteria).len(), 1);
    }

    #[test]
    fn test_keyword_searches_keywords_and_description() {
        let records = vec![
            ImageRecord {
                keywords: Some("outdoor, NATURE, green".to_string()),
                ..Default::default()
            },
            ImageRecord {
                description: Some("Nature walk".to_string()),
                ..Default::default()
            },
            ImageRecord {
                title: Some("City".to_string()),
                ..Default::default()
            },
            ImageRecord::default(),
        ];
        let criteria = FilterCriteria {
            search_term: "NaTuRe".to_string(),
            ..Default::default()
        };
        let filtered = apply_filters(&records, &criteria);
        assert_eq!(filtered.len(), 2);
        assert!(std::ptr::eq(filtered[0], &records[0]));
        assert!(std::ptr::eq(filtered[1], &records[1]));
    }

    #[test]
    fn test_filter_is_stable_and_sound() {
        let records = sample();
        let criteria = FilterCriteria {
            selected_client: only("Acme"),
            search_term: "n".to_string(),
            ..Default::default()
        };
        let filtered = apply_filters(&records, &criteria);

        // Order follows the dataset
        let positions: Vec<usize> = filtered
            .iter()
            .map(|f| records.iter().position(|r| std::ptr::eq(r, *f)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        // Kept records satisfy the criteria, dropped ones violate them
        for r in &records {
            let kept = filtered.iter().any(|f| std::ptr::eq(*f, r));
            assert_eq!(kept, matches_criteria(r, &criteria));
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample();
        let criteria = FilterCriteria {
            selected_category: only("Banners"),
            search_term: "banner".to_string(),
            ..Default::default()
        };
        let once: Vec<ImageRecord> = apply_filters(&records, &criteria)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<ImageRecord> = apply_filters(&once, &criteria)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_dataset() {
        let criteria = FilterCriteria {
            search_term: "anything".to_string(),
            ..Default::default()
        };
        assert!(apply_filters(&[], &criteria).is_empty());
        assert_eq!(distinct_options(&[], RecordField::Client), vec![Selection::All]);
    }

    #[test]
    fn test_distinct_options_sorted_with_all_first() {
        let records = sample();
        assert_eq!(
            distinct_options(&records, RecordField::Category),
            vec![Selection::All, only("Banners"), only("Icons"), only("Logos")]
        );
        assert_eq!(
            distinct_options(&records, RecordField::Client),
            vec![Selection::All, only("Acme"), only("Globex")]
        );
    }
}

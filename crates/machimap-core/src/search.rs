//! Text search over the dataset. Pure: `(query, dataset) -> view`. The render
//! path consumes only the view, so whatever the search computes is exactly
//! what gets drawn.

use crate::spot::{Category, Dataset, Spot};
use std::collections::HashMap;

/// Queries shorter than this are treated as "no filter".
pub const MIN_QUERY_LEN: usize = 2;

/// The per-category subset of the dataset that should currently be rendered.
#[derive(Debug)]
pub struct FilteredView<'a> {
    per_category: HashMap<Category, Vec<&'a Spot>>,
}

impl<'a> FilteredView<'a> {
    /// The unfiltered view: every spot of every category.
    pub fn full(dataset: &'a Dataset) -> Self {
        let per_category = Category::ALL
            .iter()
            .map(|c| (*c, dataset.category(*c).iter().collect()))
            .collect();
        Self { per_category }
    }

    pub fn category(&self, category: Category) -> &[&'a Spot] {
        self.per_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_len(&self) -> usize {
        self.per_category.values().map(Vec::len).sum()
    }
}

/// Applies a text query to the dataset. A trimmed query under
/// [`MIN_QUERY_LEN`] characters restores the full view; otherwise a spot
/// matches if its name or its address contains the query, case-insensitively.
pub fn filter_dataset<'a>(dataset: &'a Dataset, query: &str) -> FilteredView<'a> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return FilteredView::full(dataset);
    }

    let needle = trimmed.to_lowercase();
    let per_category = Category::ALL
        .iter()
        .map(|c| {
            let matches = dataset
                .category(*c)
                .iter()
                .filter(|spot| matches_query(spot, &needle))
                .collect();
            (*c, matches)
        })
        .collect();
    FilteredView { per_category }
}

fn matches_query(spot: &Spot, needle: &str) -> bool {
    if spot.name.to_lowercase().contains(needle) {
        return true;
    }
    spot.address
        .as_deref()
        .is_some_and(|addr| addr.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spot::{GeoPoint, SpotKind};

    fn spot(name: &str, address: Option<&str>) -> Spot {
        Spot {
            id: name.to_string(),
            name: name.to_string(),
            address: address.map(str::to_string),
            position: GeoPoint::new(35.0, 135.7),
            kind: SpotKind::Wifi { usage_count: 10 },
        }
    }

    fn dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.insert(
            Category::Wifi,
            vec![
                spot("Station Plaza AP", Some("1-1 Ekimae, Central Ward")),
                spot("Riverside Hotspot", Some("2-4 Kawabata")),
            ],
        );
        dataset
    }

    #[test]
    fn short_queries_restore_the_full_view() {
        let dataset = dataset();
        for q in ["", "a", "  a  "] {
            let view = filter_dataset(&dataset, q);
            assert_eq!(view.category(Category::Wifi).len(), 2, "query {q:?}");
        }
    }

    #[test]
    fn matches_are_case_insensitive_substrings() {
        let dataset = dataset();
        let view = filter_dataset(&dataset, "sTaTiOn");
        let hits = view.category(Category::Wifi);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Station Plaza AP");
    }

    #[test]
    fn address_fields_are_searched_too() {
        let dataset = dataset();
        let view = filter_dataset(&dataset, "kawabata");
        assert_eq!(view.category(Category::Wifi).len(), 1);
    }

    #[test]
    fn unmatched_queries_empty_every_category() {
        let dataset = dataset();
        let view = filter_dataset(&dataset, "zzzz");
        assert_eq!(view.total_len(), 0);
    }
}

use crate::canvas::HeatSample;
use crate::spot::{Category, Dataset, SpotKind};

/// Derives the crowding heatmap series from facility records:
/// `[lat, lon, crowding_level / 100]`, capped at 1.0.
pub fn crowding_series(dataset: &Dataset) -> Vec<HeatSample> {
    dataset
        .category(Category::Facility)
        .iter()
        .filter_map(|spot| {
            let SpotKind::Facility { crowding_level, .. } = &spot.kind else {
                return None;
            };
            if !spot.position.is_finite() {
                return None;
            }
            Some(HeatSample {
                lat: spot.position.lat,
                lon: spot.position.lon,
                intensity: (f64::from(*crowding_level) / 100.0).min(1.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spot::{GeoPoint, Spot};

    fn facility(id: &str, crowding_level: u8) -> Spot {
        Spot {
            id: id.to_string(),
            name: id.to_string(),
            address: None,
            position: GeoPoint::new(35.0, 135.7),
            kind: SpotKind::Facility {
                kind: "library".into(),
                crowding_level,
            },
        }
    }

    #[test]
    fn intensity_is_crowding_over_one_hundred() {
        let mut dataset = Dataset::new();
        dataset.insert(
            Category::Facility,
            vec![facility("a", 0), facility("b", 55), facility("c", 100)],
        );

        let series = crowding_series(&dataset);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].intensity, 0.0);
        assert_eq!(series[1].intensity, 0.55);
        assert_eq!(series[2].intensity, 1.0);
    }

    #[test]
    fn other_categories_contribute_nothing() {
        let mut dataset = Dataset::new();
        dataset.insert(
            Category::Wifi,
            vec![Spot {
                id: "ap".into(),
                name: "ap".into(),
                address: None,
                position: GeoPoint::new(35.0, 135.7),
                kind: SpotKind::Wifi { usage_count: 500 },
            }],
        );
        assert!(crowding_series(&dataset).is_empty());
    }
}

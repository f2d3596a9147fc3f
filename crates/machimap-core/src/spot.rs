use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The five marker categories a municipal dataset partitions into.
/// Walking routes and crowding levels are auxiliary overlays, not categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Wifi,
    Tourism,
    Facility,
    Emergency,
    Event,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Wifi,
        Category::Tourism,
        Category::Facility,
        Category::Emergency,
        Category::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wifi => "wifi",
            Category::Tourism => "tourism",
            Category::Facility => "facility",
            Category::Emergency => "emergency",
            Category::Event => "event",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic position in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Positions coming out of the ingestion boundary must satisfy this;
    /// the render path re-checks it before placing a marker.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Category-specific payload of a spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpotKind {
    Wifi {
        usage_count: u32,
    },
    Tourism {
        hours: Option<String>,
        admission: Option<String>,
        tags: Vec<String>,
        wheelchair_accessible: bool,
    },
    Facility {
        kind: String,
        /// 0–100, drives the crowding heatmap.
        crowding_level: u8,
    },
    Emergency {
        kind: String,
    },
    Event {
        starts: NaiveDate,
        ends: NaiveDate,
        venue: Option<String>,
    },
}

impl SpotKind {
    pub fn category(&self) -> Category {
        match self {
            SpotKind::Wifi { .. } => Category::Wifi,
            SpotKind::Tourism { .. } => Category::Tourism,
            SpotKind::Facility { .. } => Category::Facility,
            SpotKind::Emergency { .. } => Category::Emergency,
            SpotKind::Event { .. } => Category::Event,
        }
    }
}

/// A single point of interest, normalized from whatever shape its feed uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub position: GeoPoint,
    pub kind: SpotKind,
}

impl Spot {
    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

/// The normalized in-memory dataset, keyed by category. Built once per load
/// cycle and replaced atomically: a failed load never touches the previous
/// contents.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    spots: HashMap<Category, Vec<Spot>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, spots: Vec<Spot>) {
        self.spots.insert(category, spots);
    }

    pub fn category(&self, category: Category) -> &[Spot] {
        self.spots.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_len(&self) -> usize {
        self.spots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }
}

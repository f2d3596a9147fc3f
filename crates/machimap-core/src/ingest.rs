// SPDX-License-Identifier: MIT
// Copyright (c) 2026 MachiMap contributors

//! Loading and normalization of the per-category open-data feeds. Each feed
//! has its own top-level shape and field naming; everything downstream of
//! this module sees only [`Spot`] and [`WalkingRoute`].

use chrono::NaiveDate;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::route::{RouteWaypoint, WalkingRoute};
use crate::spot::{Category, Dataset, GeoPoint, Spot, SpotKind};

const FETCH_TIMEOUT_SECS: u64 = 30;

/// The backing resources of one load cycle: the five spot categories plus
/// the walking-route feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Wifi,
    Tourism,
    Facility,
    Emergency,
    Event,
    Routes,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Wifi => "wifi",
            Resource::Tourism => "tourism",
            Resource::Facility => "facility",
            Resource::Emergency => "emergency",
            Resource::Event => "event",
            Resource::Routes => "routes",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure here aborts the whole load cycle; there is no
/// partial-success mode.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch {resource} data from {url}")]
    Fetch {
        resource: Resource,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read {resource} data from {path}")]
    Read {
        resource: Resource,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {resource} payload")]
    Parse {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },
    #[error("{resource} payload is missing its '{section}' section")]
    MissingSection {
        resource: Resource,
        section: &'static str,
    },
    #[error("wifi payload contains no dated snapshot")]
    NoSnapshot,
}

#[derive(Debug, Clone)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

/// One backing resource per category, plus routes.
#[derive(Debug, Clone)]
pub struct SourceSet {
    pub wifi: SourceLocation,
    pub tourism: SourceLocation,
    pub facility: SourceLocation,
    pub emergency: SourceLocation,
    pub event: SourceLocation,
    pub routes: SourceLocation,
}

impl SourceSet {
    /// Conventional layout: one JSON file per resource in a single directory.
    pub fn local_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let file = |name: &str| SourceLocation::File(dir.join(name));
        Self {
            wifi: file("wifi.json"),
            tourism: file("tourism.json"),
            facility: file("facilities.json"),
            emergency: file("emergency.json"),
            event: file("events.json"),
            routes: file("routes.json"),
        }
    }

    /// The same layout served over HTTP.
    pub fn remote(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let url = |name: &str| SourceLocation::Url(format!("{base}/{name}"));
        Self {
            wifi: url("wifi.json"),
            tourism: url("tourism.json"),
            facility: url("facilities.json"),
            emergency: url("emergency.json"),
            event: url("events.json"),
            routes: url("routes.json"),
        }
    }
}

/// Everything one successful load cycle produces.
#[derive(Debug, Clone, Default)]
pub struct LoadedBundle {
    pub dataset: Dataset,
    pub routes: Vec<WalkingRoute>,
}

#[derive(Debug, Default)]
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn new() -> Self {
        Self
    }

    /// Fetches every resource concurrently and normalizes the payloads.
    /// Fail-fast: the first fetch or parse failure aborts the cycle, and the
    /// caller's previous dataset stays untouched. `today` drives the event
    /// end-date cutoff.
    pub fn load(&self, sources: &SourceSet, today: NaiveDate) -> Result<LoadedBundle, LoadError> {
        let jobs: Vec<(Resource, &SourceLocation)> = vec![
            (Resource::Wifi, &sources.wifi),
            (Resource::Tourism, &sources.tourism),
            (Resource::Facility, &sources.facility),
            (Resource::Emergency, &sources.emergency),
            (Resource::Event, &sources.event),
            (Resource::Routes, &sources.routes),
        ];

        let payloads: Vec<(Resource, Value)> = jobs
            .par_iter()
            .map(|(resource, location)| {
                fetch_json(*resource, location).map(|payload| (*resource, payload))
            })
            .collect::<Result<_, _>>()?;

        let mut dataset = Dataset::new();
        let mut routes = Vec::new();
        for (resource, payload) in &payloads {
            match resource {
                Resource::Wifi => dataset.insert(Category::Wifi, extract_wifi(payload)?),
                Resource::Tourism => dataset.insert(Category::Tourism, extract_tourism(payload)?),
                Resource::Facility => {
                    dataset.insert(Category::Facility, extract_facilities(payload)?)
                }
                Resource::Emergency => {
                    dataset.insert(Category::Emergency, extract_emergency(payload)?)
                }
                Resource::Event => dataset.insert(Category::Event, extract_events(payload, today)?),
                Resource::Routes => routes = extract_routes(payload)?,
            }
        }

        info!(
            "load cycle complete — spots={} routes={}",
            dataset.total_len(),
            routes.len()
        );
        Ok(LoadedBundle { dataset, routes })
    }
}

fn fetch_json(resource: Resource, location: &SourceLocation) -> Result<Value, LoadError> {
    let raw = match location {
        SourceLocation::File(path) => {
            fs::read_to_string(path).map_err(|source| LoadError::Read {
                resource,
                path: path.clone(),
                source,
            })?
        }
        SourceLocation::Url(url) => {
            debug!("fetching {} data — url={}", resource, url);
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
                .build()
                .map_err(|source| LoadError::Fetch {
                    resource,
                    url: url.clone(),
                    source,
                })?;
            client
                .get(url)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .map_err(|source| LoadError::Fetch {
                    resource,
                    url: url.clone(),
                    source,
                })?
        }
    };
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse { resource, source })
}

/// Coordinates arrive as JSON numbers or numeric strings depending on the
/// feed; anything that does not resolve to a finite f64 is rejected.
fn coord(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn point(lat: &Value, lon: &Value) -> Option<GeoPoint> {
    Some(GeoPoint::new(coord(lat)?, coord(lon)?))
}

/// Ids arrive as strings or numbers depending on the feed.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn section_records<T: DeserializeOwned>(
    payload: &Value,
    resource: Resource,
    section: &'static str,
) -> Result<Vec<T>, LoadError> {
    let records = payload
        .get(section)
        .ok_or(LoadError::MissingSection { resource, section })?;
    serde_json::from_value(records.clone()).map_err(|source| LoadError::Parse { resource, source })
}

/// The Wi-Fi feed keeps its field names in Japanese and nests its records
/// under per-snapshot date keys.
#[derive(Debug, Deserialize)]
struct RawWifiRecord {
    #[serde(rename = "名称", alias = "name")]
    name: String,
    #[serde(rename = "住所", alias = "address", default)]
    address: Option<String>,
    #[serde(rename = "緯度", alias = "lat", default)]
    lat: Value,
    #[serde(rename = "経度", alias = "lng", default)]
    lon: Value,
    #[serde(rename = "利用者数", alias = "usage_count", default)]
    usage_count: u32,
}

fn extract_wifi(payload: &Value) -> Result<Vec<Spot>, LoadError> {
    let by_date = payload.as_object().ok_or(LoadError::NoSnapshot)?;
    // Newest snapshot wins; ISO date keys sort chronologically.
    let (date, records) = by_date
        .iter()
        .max_by(|a, b| a.0.cmp(b.0))
        .ok_or(LoadError::NoSnapshot)?;
    let raw: Vec<RawWifiRecord> = serde_json::from_value(records.clone())
        .map_err(|source| LoadError::Parse {
            resource: Resource::Wifi,
            source,
        })?;
    debug!("wifi snapshot selected — date={} records={}", date, raw.len());

    let mut spots = Vec::with_capacity(raw.len());
    for record in raw {
        let Some(position) = point(&record.lat, &record.lon) else {
            warn!(
                "skipping wifi record with unparseable position — name={}",
                record.name
            );
            continue;
        };
        // The feed defines no stable identifier; the display name is the only
        // key it provides, so it doubles as the id. Two same-named hotspots
        // would collide in favorites.
        spots.push(Spot {
            id: record.name.clone(),
            name: record.name,
            address: record.address,
            position,
            kind: SpotKind::Wifi {
                usage_count: record.usage_count,
            },
        });
    }
    Ok(spots)
}

#[derive(Debug, Deserialize)]
struct RawTourismSpot {
    #[serde(default)]
    id: Value,
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lng: Value,
    #[serde(default)]
    hours: Option<String>,
    #[serde(default)]
    admission: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    wheelchair_accessible: bool,
}

fn extract_tourism(payload: &Value) -> Result<Vec<Spot>, LoadError> {
    let raw: Vec<RawTourismSpot> = section_records(payload, Resource::Tourism, "spots")?;
    let mut spots = Vec::with_capacity(raw.len());
    for record in raw {
        let Some(position) = point(&record.lat, &record.lng) else {
            warn!(
                "skipping tourism record with unparseable position — name={}",
                record.name
            );
            continue;
        };
        let id = id_string(&record.id).unwrap_or_else(|| record.name.clone());
        spots.push(Spot {
            id,
            name: record.name,
            address: record.address,
            position,
            kind: SpotKind::Tourism {
                hours: record.hours,
                admission: record.admission,
                tags: record.tags,
                wheelchair_accessible: record.wheelchair_accessible,
            },
        });
    }
    Ok(spots)
}

#[derive(Debug, Deserialize)]
struct RawFacility {
    #[serde(default)]
    id: Value,
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lng: Value,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    crowding_level: u8,
}

fn extract_facilities(payload: &Value) -> Result<Vec<Spot>, LoadError> {
    let raw: Vec<RawFacility> = section_records(payload, Resource::Facility, "facilities")?;
    Ok(normalize_facilities(raw, Resource::Facility))
}

fn extract_emergency(payload: &Value) -> Result<Vec<Spot>, LoadError> {
    let raw: Vec<RawFacility> = section_records(payload, Resource::Emergency, "facilities")?;
    Ok(normalize_facilities(raw, Resource::Emergency))
}

fn normalize_facilities(raw: Vec<RawFacility>, resource: Resource) -> Vec<Spot> {
    let mut spots = Vec::with_capacity(raw.len());
    for record in raw {
        let Some(position) = point(&record.lat, &record.lng) else {
            warn!(
                "skipping {} record with unparseable position — name={}",
                resource, record.name
            );
            continue;
        };
        let id = id_string(&record.id).unwrap_or_else(|| record.name.clone());
        let kind = match resource {
            Resource::Emergency => SpotKind::Emergency { kind: record.kind },
            _ => SpotKind::Facility {
                kind: record.kind,
                crowding_level: record.crowding_level.min(100),
            },
        };
        spots.push(Spot {
            id,
            name: record.name,
            address: record.address,
            position,
            kind,
        });
    }
    spots
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: Value,
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lng: Value,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

fn extract_events(payload: &Value, today: NaiveDate) -> Result<Vec<Spot>, LoadError> {
    let raw: Vec<RawEvent> = section_records(payload, Resource::Event, "events")?;
    let total = raw.len();
    let mut spots = Vec::new();
    for record in raw {
        // Events that already ended never enter the dataset.
        if record.end_date < today {
            continue;
        }
        let Some(position) = point(&record.lat, &record.lng) else {
            warn!(
                "skipping event record with unparseable position — name={}",
                record.name
            );
            continue;
        };
        let id = id_string(&record.id).unwrap_or_else(|| record.name.clone());
        let address = record.address.or_else(|| record.venue.clone());
        spots.push(Spot {
            id,
            name: record.name,
            address,
            position,
            kind: SpotKind::Event {
                starts: record.start_date,
                ends: record.end_date,
                venue: record.venue,
            },
        });
    }
    debug!("events filtered — kept={} total={}", spots.len(), total);
    Ok(spots)
}

#[derive(Debug, Deserialize)]
struct RawWaypoint {
    name: String,
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lng: Value,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    id: Value,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    distance_km: Option<f64>,
    #[serde(default)]
    duration_min: Option<u32>,
    #[serde(default)]
    path: Vec<(Value, Value)>,
    #[serde(default)]
    waypoints: Vec<RawWaypoint>,
}

fn extract_routes(payload: &Value) -> Result<Vec<WalkingRoute>, LoadError> {
    let raw: Vec<RawRoute> = section_records(payload, Resource::Routes, "routes")?;
    let mut routes = Vec::with_capacity(raw.len());
    for record in raw {
        let id = id_string(&record.id).unwrap_or_else(|| record.name.clone());

        let mut path = Vec::with_capacity(record.path.len());
        for (lat, lng) in &record.path {
            match point(lat, lng) {
                Some(p) => path.push(p),
                None => warn!("skipping unparseable route vertex — route={}", id),
            }
        }

        let mut waypoints = Vec::with_capacity(record.waypoints.len());
        for waypoint in record.waypoints {
            match point(&waypoint.lat, &waypoint.lng) {
                Some(position) => waypoints.push(RouteWaypoint {
                    name: waypoint.name,
                    position,
                }),
                None => warn!(
                    "skipping route waypoint with unparseable position — route={}",
                    id
                ),
            }
        }

        routes.push(WalkingRoute {
            id,
            name: record.name,
            description: record.description,
            distance_km: record.distance_km,
            duration_min: record.duration_min,
            path,
            waypoints,
        });
    }
    Ok(routes)
}

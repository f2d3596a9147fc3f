//! The boundary to the actual map-rendering collaborator. Everything the
//! engine wants drawn is expressed as plain data handed through [`MapCanvas`];
//! tile handling, clustering and geodesic math live on the other side.

use crate::spot::{Category, GeoPoint};
use std::collections::{HashMap, HashSet};

/// A fully-styled marker, ready to be placed on its category layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub category: Category,
    pub spot_id: String,
    pub position: GeoPoint,
    pub size_px: u32,
    /// CSS hex color.
    pub color: &'static str,
    pub glyph: &'static str,
    pub popup_html: String,
}

/// A numbered stop along the active walking route.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointSpec {
    /// 1-based position in the route.
    pub ordinal: usize,
    pub name: String,
    pub position: GeoPoint,
}

/// One heatmap data point: `[lat, lon, normalized intensity 0.0–1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSample {
    pub lat: f64,
    pub lon: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Smallest box enclosing all points. `None` for an empty slice.
    pub fn enclosing(points: &[GeoPoint]) -> Option<GeoBounds> {
        let mut it = points.iter().filter(|p| p.is_finite());
        let first = it.next()?;
        let mut bounds = GeoBounds {
            south: first.lat,
            west: first.lon,
            north: first.lat,
            east: first.lon,
        };
        for p in it {
            bounds.south = bounds.south.min(p.lat);
            bounds.west = bounds.west.min(p.lon);
            bounds.north = bounds.north.max(p.lat);
            bounds.east = bounds.east.max(p.lon);
        }
        Some(bounds)
    }
}

/// What the engine asks of the rendering surface. Layers are detached, not
/// destroyed, when hidden; markers within a layer are cleared and rebuilt
/// wholesale by the render engine.
pub trait MapCanvas {
    fn attach_layer(&mut self, category: Category);
    fn detach_layer(&mut self, category: Category);
    fn clear_layer(&mut self, category: Category);
    fn place_marker(&mut self, marker: MarkerSpec);
    fn draw_route(&mut self, path: &[GeoPoint], waypoints: &[WaypointSpec]);
    fn clear_route(&mut self);
    fn fit_bounds(&mut self, bounds: GeoBounds);
    fn show_heatmap(&mut self, samples: &[HeatSample]);
    fn clear_heatmap(&mut self);
}

/// Canvas operations in the order they were issued, for assertions on
/// transition counts.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    AttachLayer(Category),
    DetachLayer(Category),
    ClearLayer(Category),
    PlaceMarker(Category, String),
    DrawRoute { points: usize, waypoints: usize },
    ClearRoute,
    FitBounds(GeoBounds),
    ShowHeatmap(usize),
    ClearHeatmap,
}

/// Headless canvas that records every operation and mirrors the resulting
/// display state. Lets the whole engine run without a rendering surface.
#[derive(Debug, Default)]
pub struct TraceCanvas {
    pub ops: Vec<CanvasOp>,
    markers: HashMap<Category, Vec<MarkerSpec>>,
    attached: HashSet<Category>,
    route: Option<(Vec<GeoPoint>, Vec<WaypointSpec>)>,
    heatmap: Vec<HeatSample>,
}

impl TraceCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently held by a layer, attached or not.
    pub fn markers_in(&self, category: Category) -> &[MarkerSpec] {
        self.markers
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Markers on layers that are actually attached to the render tree.
    pub fn visible_markers(&self) -> Vec<&MarkerSpec> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| self.attached.contains(c))
            .flat_map(|c| self.markers_in(c))
            .collect()
    }

    pub fn is_attached(&self, category: Category) -> bool {
        self.attached.contains(&category)
    }

    pub fn route(&self) -> Option<&(Vec<GeoPoint>, Vec<WaypointSpec>)> {
        self.route.as_ref()
    }

    pub fn heatmap(&self) -> &[HeatSample] {
        &self.heatmap
    }

    /// Number of attach/detach operations issued so far.
    pub fn layer_transitions(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::AttachLayer(_) | CanvasOp::DetachLayer(_)))
            .count()
    }
}

impl MapCanvas for TraceCanvas {
    fn attach_layer(&mut self, category: Category) {
        self.ops.push(CanvasOp::AttachLayer(category));
        self.attached.insert(category);
    }

    fn detach_layer(&mut self, category: Category) {
        self.ops.push(CanvasOp::DetachLayer(category));
        self.attached.remove(&category);
    }

    fn clear_layer(&mut self, category: Category) {
        self.ops.push(CanvasOp::ClearLayer(category));
        self.markers.entry(category).or_default().clear();
    }

    fn place_marker(&mut self, marker: MarkerSpec) {
        self.ops
            .push(CanvasOp::PlaceMarker(marker.category, marker.spot_id.clone()));
        self.markers.entry(marker.category).or_default().push(marker);
    }

    fn draw_route(&mut self, path: &[GeoPoint], waypoints: &[WaypointSpec]) {
        self.ops.push(CanvasOp::DrawRoute {
            points: path.len(),
            waypoints: waypoints.len(),
        });
        self.route = Some((path.to_vec(), waypoints.to_vec()));
    }

    fn clear_route(&mut self) {
        self.ops.push(CanvasOp::ClearRoute);
        self.route = None;
    }

    fn fit_bounds(&mut self, bounds: GeoBounds) {
        self.ops.push(CanvasOp::FitBounds(bounds));
    }

    fn show_heatmap(&mut self, samples: &[HeatSample]) {
        self.ops.push(CanvasOp::ShowHeatmap(samples.len()));
        self.heatmap = samples.to_vec();
    }

    fn clear_heatmap(&mut self) {
        self.ops.push(CanvasOp::ClearHeatmap);
        self.heatmap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_bounds_span_all_points() {
        let points = vec![
            GeoPoint::new(35.0, 135.7),
            GeoPoint::new(35.2, 135.6),
            GeoPoint::new(34.9, 135.9),
        ];
        let bounds = GeoBounds::enclosing(&points).unwrap();
        assert_eq!(bounds.south, 34.9);
        assert_eq!(bounds.west, 135.6);
        assert_eq!(bounds.north, 35.2);
        assert_eq!(bounds.east, 135.9);
    }

    #[test]
    fn enclosing_bounds_of_nothing_is_none() {
        assert!(GeoBounds::enclosing(&[]).is_none());
        // All-invalid input behaves like empty input.
        assert!(GeoBounds::enclosing(&[GeoPoint::new(f64::NAN, 0.0)]).is_none());
    }
}

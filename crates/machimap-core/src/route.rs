// SPDX-License-Identifier: MIT
// Copyright (c) 2026 MachiMap contributors

use log::debug;
use serde::{Deserialize, Serialize};

use crate::canvas::{GeoBounds, MapCanvas, WaypointSpec};
use crate::spot::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWaypoint {
    pub name: String,
    pub position: GeoPoint,
}

/// A pre-baked walking course: the polyline is authored upstream, nothing is
/// computed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkingRoute {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_min: Option<u32>,
    pub path: Vec<GeoPoint>,
    #[serde(default)]
    pub waypoints: Vec<RouteWaypoint>,
}

/// At most one route is ever displayed. The full state space is
/// {none active} ⇄ {exactly one active}, moved only by [`show`](Self::show)
/// and [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct RouteOverlay {
    active: Option<String>,
}

impl RouteOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_route(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Replaces whatever was shown with this route: polyline, numbered
    /// waypoint markers, and a view framed to the path's bounding box.
    pub fn show(&mut self, canvas: &mut dyn MapCanvas, route: &WalkingRoute) {
        if self.active.take().is_some() {
            canvas.clear_route();
        }

        let waypoints: Vec<WaypointSpec> = route
            .waypoints
            .iter()
            .enumerate()
            .map(|(index, waypoint)| WaypointSpec {
                ordinal: index + 1,
                name: waypoint.name.clone(),
                position: waypoint.position,
            })
            .collect();

        canvas.draw_route(&route.path, &waypoints);
        if let Some(bounds) = GeoBounds::enclosing(&route.path) {
            canvas.fit_bounds(bounds);
        }

        debug!("route shown — id={} points={}", route.id, route.path.len());
        self.active = Some(route.id.clone());
    }

    /// Removes all route visuals; a no-op when nothing is active.
    pub fn clear(&mut self, canvas: &mut dyn MapCanvas) {
        if self.active.take().is_some() {
            canvas.clear_route();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::TraceCanvas;

    fn route(id: &str, path: Vec<GeoPoint>) -> WalkingRoute {
        WalkingRoute {
            id: id.to_string(),
            name: format!("Course {id}"),
            description: None,
            distance_km: Some(3.2),
            duration_min: Some(45),
            waypoints: vec![
                RouteWaypoint {
                    name: "Start".into(),
                    position: path[0],
                },
                RouteWaypoint {
                    name: "Goal".into(),
                    position: *path.last().unwrap(),
                },
            ],
            path,
        }
    }

    #[test]
    fn selecting_a_second_route_replaces_the_first() {
        let mut overlay = RouteOverlay::new();
        let mut canvas = TraceCanvas::new();
        let a = route("a", vec![GeoPoint::new(35.0, 135.7), GeoPoint::new(35.1, 135.8)]);
        let b = route("b", vec![GeoPoint::new(34.5, 135.4), GeoPoint::new(34.6, 135.5)]);

        overlay.show(&mut canvas, &a);
        overlay.show(&mut canvas, &b);

        assert_eq!(overlay.active_route(), Some("b"));
        let (path, waypoints) = canvas.route().unwrap();
        assert_eq!(path, &b.path);
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].ordinal, 1);
        assert_eq!(waypoints[1].ordinal, 2);
    }

    #[test]
    fn clear_returns_to_the_none_active_state() {
        let mut overlay = RouteOverlay::new();
        let mut canvas = TraceCanvas::new();
        let a = route("a", vec![GeoPoint::new(35.0, 135.7), GeoPoint::new(35.1, 135.8)]);

        overlay.show(&mut canvas, &a);
        overlay.clear(&mut canvas);

        assert_eq!(overlay.active_route(), None);
        assert!(canvas.route().is_none());

        // Clearing again is a no-op, not an error.
        let ops_before = canvas.ops.len();
        overlay.clear(&mut canvas);
        assert_eq!(canvas.ops.len(), ops_before);
    }

    #[test]
    fn showing_frames_the_path_bounds() {
        let mut overlay = RouteOverlay::new();
        let mut canvas = TraceCanvas::new();
        let a = route("a", vec![GeoPoint::new(35.0, 135.7), GeoPoint::new(35.1, 135.8)]);

        overlay.show(&mut canvas, &a);
        let framed = canvas.ops.iter().any(|op| {
            matches!(op, crate::canvas::CanvasOp::FitBounds(b)
                if b.south == 35.0 && b.north == 35.1)
        });
        assert!(framed);
    }
}

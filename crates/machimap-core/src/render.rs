//! Turns spots into styled markers. All sizing/coloring rules live here so
//! the canvas side stays purely mechanical.

use log::warn;

use crate::canvas::{MapCanvas, MarkerSpec};
use crate::favorites::FavoritesStore;
use crate::spot::{Category, Spot, SpotKind};

/// Wi-Fi markers scale with usage and saturate at both ends.
pub const WIFI_SIZE_MIN_PX: u32 = 20;
pub const WIFI_SIZE_MAX_PX: u32 = 50;

/// `clamp(usage / 5, 20, 50)` pixels; monotonic non-decreasing in usage.
pub fn wifi_marker_size(usage_count: u32) -> u32 {
    (usage_count / 5).clamp(WIFI_SIZE_MIN_PX, WIFI_SIZE_MAX_PX)
}

/// Usage tiers, evaluated highest threshold first.
pub fn wifi_marker_color(usage_count: u32) -> &'static str {
    if usage_count > 150 {
        "#c62828"
    } else if usage_count > 100 {
        "#ef6c00"
    } else if usage_count > 50 {
        "#f9a825"
    } else {
        "#2e7d32"
    }
}

/// Fixed color per non-wifi category.
pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Wifi => "#2e7d32",
        Category::Tourism => "#6a1b9a",
        Category::Facility => "#1565c0",
        Category::Emergency => "#b71c1c",
        Category::Event => "#00838f",
    }
}

const FALLBACK_GLYPH: &str = "📍";

/// Category/subtype icon lookup. Unrecognized facility or emergency kinds
/// fall back to the generic pin.
pub fn marker_glyph(kind: &SpotKind) -> &'static str {
    match kind {
        SpotKind::Wifi { .. } => "📶",
        SpotKind::Tourism { .. } => "🏯",
        SpotKind::Facility { kind, .. } => match kind.as_str() {
            "library" => "📚",
            "gym" | "sports_center" => "🏟️",
            "community_center" => "🏢",
            "park" => "🌳",
            "museum" => "🖼️",
            _ => FALLBACK_GLYPH,
        },
        SpotKind::Emergency { kind } => match kind.as_str() {
            "hospital" => "🏥",
            "evacuation_site" => "🚨",
            "fire_station" => "🚒",
            "aed" => "❤️",
            _ => FALLBACK_GLYPH,
        },
        SpotKind::Event { .. } => "🎪",
    }
}

/// Builds markers and popups from spots, reflecting the favorites set at
/// construction time.
#[derive(Debug, Default)]
pub struct RenderEngine;

impl RenderEngine {
    pub fn new() -> Self {
        Self
    }

    /// Clears the category's layer and rebuilds one marker per spot. Spots
    /// whose position is not finite are skipped with a warning instead of
    /// producing a marker at an invalid position.
    pub fn render_category(
        &self,
        canvas: &mut dyn MapCanvas,
        category: Category,
        spots: &[&Spot],
        favorites: &FavoritesStore,
    ) {
        canvas.clear_layer(category);
        for spot in spots {
            if !spot.position.is_finite() {
                warn!(
                    "skipping spot with invalid position — category={} id={}",
                    category, spot.id
                );
                continue;
            }
            let is_favorite = favorites.contains(category, &spot.id);
            canvas.place_marker(self.marker_for(spot, is_favorite));
        }
    }

    pub fn marker_for(&self, spot: &Spot, is_favorite: bool) -> MarkerSpec {
        let (size_px, color) = match &spot.kind {
            SpotKind::Wifi { usage_count } => {
                (wifi_marker_size(*usage_count), wifi_marker_color(*usage_count))
            }
            _ => (28, category_color(spot.category())),
        };

        MarkerSpec {
            category: spot.category(),
            spot_id: spot.id.clone(),
            position: spot.position,
            size_px,
            color,
            glyph: marker_glyph(&spot.kind),
            popup_html: self.popup_html(spot, is_favorite),
        }
    }

    /// Popup fragment for one spot. Favorite state is baked in at build time;
    /// the session re-renders after a toggle so the next open is current.
    pub fn popup_html(&self, spot: &Spot, is_favorite: bool) -> String {
        let mut html = String::new();
        html.push_str("<div class=\"popup\">");
        html.push_str(&format!("<h3>{}</h3>", escape(&spot.name)));
        if let Some(address) = &spot.address {
            html.push_str(&format!("<p class=\"addr\">{}</p>", escape(address)));
        }

        match &spot.kind {
            SpotKind::Wifi { usage_count } => {
                html.push_str(&format!("<p>Daily users: {}</p>", usage_count));
            }
            SpotKind::Tourism {
                hours,
                admission,
                tags,
                wheelchair_accessible,
            } => {
                if let Some(hours) = hours {
                    html.push_str(&format!("<p>Hours: {}</p>", escape(hours)));
                }
                if let Some(admission) = admission {
                    html.push_str(&format!("<p>Admission: {}</p>", escape(admission)));
                }
                if !tags.is_empty() {
                    let joined = tags
                        .iter()
                        .map(|t| escape(t))
                        .collect::<Vec<_>>()
                        .join(", ");
                    html.push_str(&format!("<p class=\"tags\">{}</p>", joined));
                }
                if *wheelchair_accessible {
                    html.push_str("<p class=\"access\">Wheelchair accessible</p>");
                }
            }
            SpotKind::Facility {
                kind,
                crowding_level,
            } => {
                html.push_str(&format!(
                    "<p>{} / crowding {}%</p>",
                    escape(kind),
                    crowding_level
                ));
            }
            SpotKind::Emergency { kind } => {
                html.push_str(&format!("<p class=\"emergency\">{}</p>", escape(kind)));
            }
            SpotKind::Event {
                starts,
                ends,
                venue,
            } => {
                html.push_str(&format!("<p>{} – {}</p>", starts, ends));
                if let Some(venue) = venue {
                    html.push_str(&format!("<p>Venue: {}</p>", escape(venue)));
                }
            }
        }

        let (mark, label) = if is_favorite {
            ("★", "Saved")
        } else {
            ("☆", "Save")
        };
        html.push_str(&format!(
            "<button class=\"fav\" data-category=\"{}\" data-id=\"{}\">{} {}</button>",
            spot.category(),
            escape(&spot.id),
            mark,
            label
        ));
        html.push_str("</div>");
        html
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

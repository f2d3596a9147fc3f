pub mod canvas;
pub mod favorites;
pub mod heatmap;
pub mod ingest;
pub mod layer;
pub mod render;
pub mod route;
pub mod search;
pub mod session;
pub mod share;
pub mod spot;
pub mod weather;

use std::path::PathBuf;

/// Per-user configuration root; the favorites slot lives under it by
/// default.
pub fn config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "machimap", "MachiMap")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".machimap"))
}

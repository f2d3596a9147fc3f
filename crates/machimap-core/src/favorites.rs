// SPDX-License-Identifier: MIT
// Copyright (c) 2026 MachiMap contributors

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::spot::{Category, GeoPoint, Spot};

/// A denormalized snapshot of a favorited spot, taken at toggle time.
/// Identified by `(category, id)`; name and position are whatever the spot
/// carried when it was saved, not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRef {
    pub category: Category,
    pub id: String,
    pub name: String,
    pub position: GeoPoint,
}

impl FavoriteRef {
    pub fn of_spot(spot: &Spot) -> Self {
        Self {
            category: spot.category(),
            id: spot.id.clone(),
            name: spot.name.clone(),
            position: spot.position,
        }
    }
}

/// The persisted favorites set: one JSON slot on disk, rewritten in full on
/// every mutation so the file always matches memory.
#[derive(Debug)]
pub struct FavoritesStore {
    slot_path: PathBuf,
    entries: Vec<FavoriteRef>,
}

impl FavoritesStore {
    pub fn default_slot_path() -> PathBuf {
        crate::config_root().join("favorites.json")
    }

    /// Reads the slot once. An absent file is a first run; a corrupt one is
    /// recovered as an empty list rather than surfaced as an error.
    pub fn open<P: AsRef<Path>>(slot_path: P) -> Self {
        let slot_path = slot_path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&slot_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        "favorites slot is corrupt, starting empty — slot={} error={}",
                        slot_path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { slot_path, entries }
    }

    pub fn entries(&self) -> &[FavoriteRef] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, category: Category, id: &str) -> bool {
        self.find(category, id).is_some()
    }

    /// Adds or removes the entry and persists before returning. The result is
    /// the new membership state.
    pub fn toggle(&mut self, entry: FavoriteRef) -> Result<bool> {
        let member = match self.find(entry.category, &entry.id) {
            Some(index) => {
                self.entries.remove(index);
                false
            }
            None => {
                self.entries.push(entry);
                true
            }
        };
        self.save()?;
        Ok(member)
    }

    /// Removes a favorite if present; returns whether anything was removed.
    pub fn remove(&mut self, category: Category, id: &str) -> Result<bool> {
        match self.find(category, id) {
            Some(index) => {
                self.entries.remove(index);
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn find(&self, category: Category, id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.category == category && e.id == id)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.slot_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create favorites directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize favorites")?;

        fs::write(&self.slot_path, content).context("Failed to write favorites slot")
    }
}

use crate::canvas::MapCanvas;
use crate::spot::Category;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Per-category visibility, as toggled by the UI. Every category starts
/// visible.
#[derive(Debug, Clone)]
pub struct FilterState {
    visible: HashMap<Category, bool>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            visible: Category::ALL.iter().map(|c| (*c, true)).collect(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visible(&mut self, category: Category, on: bool) {
        self.visible.insert(category, on);
    }

    pub fn is_visible(&self, category: Category) -> bool {
        self.visible.get(&category).copied().unwrap_or(true)
    }

    /// Flips a category and returns its new visibility.
    pub fn toggle(&mut self, category: Category) -> bool {
        let now = !self.is_visible(category);
        self.visible.insert(category, now);
        now
    }
}

/// Tracks which category layers are attached to the canvas render tree.
/// Hidden layers are detached, never destroyed; their markers stay in memory
/// on the canvas side.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    attached: HashSet<Category>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self, category: Category) -> bool {
        self.attached.contains(&category)
    }

    /// Synchronizes every layer to the filter state, emitting only the
    /// attach/detach transitions that are actually needed. Running it twice
    /// with unchanged filters issues no further canvas operations.
    pub fn apply_all(&mut self, filters: &FilterState, canvas: &mut dyn MapCanvas) {
        for category in Category::ALL {
            let want = filters.is_visible(category);
            let have = self.attached.contains(&category);
            if want && !have {
                debug!("attaching layer — category={}", category);
                canvas.attach_layer(category);
                self.attached.insert(category);
            } else if !want && have {
                debug!("detaching layer — category={}", category);
                canvas.detach_layer(category);
                self.attached.remove(&category);
            }
        }
    }
}

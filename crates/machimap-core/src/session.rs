// SPDX-License-Identifier: MIT
// Copyright (c) 2026 MachiMap contributors

//! The application context: one object owns every piece of mutable state
//! (dataset, filters, favorites, search query, route overlay, heatmap flag),
//! and every user gesture arrives as a typed [`Action`] consumed by one
//! reducing function. No globals, so independent sessions can coexist.

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, warn};

use crate::canvas::MapCanvas;
use crate::favorites::{FavoriteRef, FavoritesStore};
use crate::heatmap::crowding_series;
use crate::ingest::{DatasetLoader, LoadError, LoadedBundle, SourceSet};
use crate::layer::{FilterState, LayerRegistry};
use crate::render::RenderEngine;
use crate::route::{RouteOverlay, WalkingRoute};
use crate::search::filter_dataset;
use crate::spot::{Category, Dataset};

/// A user gesture, produced by the UI and consumed by
/// [`MapSession::dispatch`].
#[derive(Debug, Clone)]
pub enum Action {
    ToggleLayer(Category),
    SetSearchQuery(String),
    ToggleFavorite(FavoriteRef),
    SelectRoute(String),
    ClearRoute,
    ToggleHeatmap,
}

pub struct MapSession {
    dataset: Dataset,
    routes: Vec<WalkingRoute>,
    filters: FilterState,
    layers: LayerRegistry,
    favorites: FavoritesStore,
    overlay: RouteOverlay,
    renderer: RenderEngine,
    query: String,
    heatmap_on: bool,
}

impl MapSession {
    pub fn new(favorites: FavoritesStore) -> Self {
        Self {
            dataset: Dataset::new(),
            routes: Vec::new(),
            filters: FilterState::new(),
            layers: LayerRegistry::new(),
            favorites,
            overlay: RouteOverlay::new(),
            renderer: RenderEngine::new(),
            query: String::new(),
            heatmap_on: false,
        }
    }

    /// Loads every resource and draws the initial marker set. On failure the
    /// session keeps whatever dataset it had (initially: nothing), so no
    /// partial markers ever appear.
    pub fn initialize(
        &mut self,
        loader: &DatasetLoader,
        sources: &SourceSet,
        today: NaiveDate,
        canvas: &mut dyn MapCanvas,
    ) -> Result<(), LoadError> {
        let bundle = loader.load(sources, today)?;
        self.install(bundle, canvas);
        Ok(())
    }

    /// Replaces the dataset and routes with an already-loaded bundle and
    /// re-renders.
    pub fn install(&mut self, bundle: LoadedBundle, canvas: &mut dyn MapCanvas) {
        self.dataset = bundle.dataset;
        self.routes = bundle.routes;
        self.refresh(canvas);
    }

    /// The single state-reducing entry point for user gestures.
    pub fn dispatch(&mut self, action: Action, canvas: &mut dyn MapCanvas) -> Result<()> {
        match action {
            Action::ToggleLayer(category) => {
                let now = self.filters.toggle(category);
                debug!("layer toggled — category={} visible={}", category, now);
                self.layers.apply_all(&self.filters, canvas);
            }
            Action::SetSearchQuery(query) => {
                self.query = query;
                self.refresh(canvas);
            }
            Action::ToggleFavorite(entry) => {
                let member = self.favorites.toggle(entry)?;
                debug!("favorite toggled — member={}", member);
                // Popups bake favorite state in at build time; rebuild so the
                // next open shows the new state.
                self.refresh(canvas);
            }
            Action::SelectRoute(id) => {
                let Some(route) = self.routes.iter().find(|r| r.id == id) else {
                    warn!("ignoring selection of unknown route — id={}", id);
                    return Ok(());
                };
                self.overlay.show(canvas, route);
            }
            Action::ClearRoute => self.overlay.clear(canvas),
            Action::ToggleHeatmap => {
                self.heatmap_on = !self.heatmap_on;
                if self.heatmap_on {
                    canvas.show_heatmap(&crowding_series(&self.dataset));
                } else {
                    canvas.clear_heatmap();
                }
            }
        }
        Ok(())
    }

    /// Re-derives every category's markers from the current query's view of
    /// the dataset and re-syncs layer visibility. The view is the render
    /// path's only data source.
    pub fn refresh(&mut self, canvas: &mut dyn MapCanvas) {
        let view = filter_dataset(&self.dataset, &self.query);
        for category in Category::ALL {
            self.renderer
                .render_category(canvas, category, view.category(category), &self.favorites);
        }
        self.layers.apply_all(&self.filters, canvas);
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn routes(&self) -> &[WalkingRoute] {
        &self.routes
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_route(&self) -> Option<&str> {
        self.overlay.active_route()
    }

    pub fn heatmap_on(&self) -> bool {
        self.heatmap_on
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 MachiMap contributors

use machimap_core::canvas::TraceCanvas;
use machimap_core::favorites::{FavoriteRef, FavoritesStore};
use machimap_core::ingest::LoadedBundle;
use machimap_core::session::{Action, MapSession};
use machimap_core::spot::{Category, Dataset, GeoPoint, Spot, SpotKind};

fn facility(id: &str, name: &str, crowding_level: u8) -> Spot {
    Spot {
        id: id.to_string(),
        name: name.to_string(),
        address: None,
        position: GeoPoint::new(35.0, 135.7),
        kind: SpotKind::Facility {
            kind: "library".into(),
            crowding_level,
        },
    }
}

fn session_with_facilities(dir: &std::path::Path) -> (MapSession, TraceCanvas) {
    let mut dataset = Dataset::new();
    dataset.insert(
        Category::Facility,
        vec![facility("f-1", "Central Library", 65), facility("f-2", "East Gym", 20)],
    );

    let favorites = FavoritesStore::open(dir.join("favorites.json"));
    let mut session = MapSession::new(favorites);
    let mut canvas = TraceCanvas::new();
    session.install(
        LoadedBundle {
            dataset,
            routes: Vec::new(),
        },
        &mut canvas,
    );
    (session, canvas)
}

#[test]
fn toggling_a_layer_detaches_and_reattaches_it() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_facilities(dir.path());
    assert!(canvas.is_attached(Category::Facility));

    session
        .dispatch(Action::ToggleLayer(Category::Facility), &mut canvas)
        .unwrap();
    assert!(!canvas.is_attached(Category::Facility));
    // The markers are still held by the layer, only display membership moved.
    assert_eq!(canvas.markers_in(Category::Facility).len(), 2);

    session
        .dispatch(Action::ToggleLayer(Category::Facility), &mut canvas)
        .unwrap();
    assert!(canvas.is_attached(Category::Facility));
}

#[test]
fn toggling_a_favorite_persists_and_updates_the_popup() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_facilities(dir.path());

    let before = canvas.markers_in(Category::Facility)[0].popup_html.clone();
    assert!(before.contains("☆ Save"));

    let entry = FavoriteRef {
        category: Category::Facility,
        id: "f-1".into(),
        name: "Central Library".into(),
        position: GeoPoint::new(35.0, 135.7),
    };
    session
        .dispatch(Action::ToggleFavorite(entry), &mut canvas)
        .unwrap();

    assert!(session.favorites().contains(Category::Facility, "f-1"));
    let after = &canvas
        .markers_in(Category::Facility)
        .iter()
        .find(|m| m.spot_id == "f-1")
        .unwrap()
        .popup_html;
    assert!(after.contains("★ Saved"));

    // The slot on disk already matches memory.
    let persisted: Vec<FavoriteRef> = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("favorites.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(persisted, session.favorites().entries());
}

#[test]
fn heatmap_toggle_derives_intensity_from_crowding() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_facilities(dir.path());
    assert!(!session.heatmap_on());

    session
        .dispatch(Action::ToggleHeatmap, &mut canvas)
        .unwrap();
    assert!(session.heatmap_on());
    let samples = canvas.heatmap();
    assert_eq!(samples.len(), 2);
    assert!(samples.iter().any(|s| s.intensity == 0.65));
    assert!(samples.iter().any(|s| s.intensity == 0.20));

    session
        .dispatch(Action::ToggleHeatmap, &mut canvas)
        .unwrap();
    assert!(!session.heatmap_on());
    assert!(canvas.heatmap().is_empty());
}

#[test]
fn repeated_layer_syncs_issue_no_redundant_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_facilities(dir.path());

    let transitions = canvas.layer_transitions();
    session.refresh(&mut canvas);
    session.refresh(&mut canvas);
    assert_eq!(canvas.layer_transitions(), transitions);
}

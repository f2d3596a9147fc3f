//! The rendered marker set must always be exactly what the active query
//! matches: computing a result without drawing it is not an option.

use machimap_core::canvas::TraceCanvas;
use machimap_core::favorites::FavoritesStore;
use machimap_core::ingest::LoadedBundle;
use machimap_core::session::{Action, MapSession};
use machimap_core::spot::{Category, Dataset, GeoPoint, Spot, SpotKind};

fn wifi(name: &str, usage_count: u32) -> Spot {
    Spot {
        id: name.to_string(),
        name: name.to_string(),
        address: None,
        position: GeoPoint::new(35.0, 135.7),
        kind: SpotKind::Wifi { usage_count },
    }
}

fn tourism(id: &str, name: &str, address: &str) -> Spot {
    Spot {
        id: id.to_string(),
        name: name.to_string(),
        address: Some(address.to_string()),
        position: GeoPoint::new(35.01, 135.75),
        kind: SpotKind::Tourism {
            hours: None,
            admission: None,
            tags: vec![],
            wheelchair_accessible: false,
        },
    }
}

fn session_with_data(dir: &std::path::Path) -> (MapSession, TraceCanvas) {
    let mut dataset = Dataset::new();
    dataset.insert(
        Category::Wifi,
        vec![wifi("Station Plaza AP", 120), wifi("Riverside AP", 30)],
    );
    dataset.insert(
        Category::Tourism,
        vec![
            tourism("t-1", "Castle Garden", "3-1 Joto"),
            tourism("t-2", "Folk Museum", "8-2 Ekimae"),
        ],
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
fn a_query_redraws_only_the_matching_markers() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_data(dir.path());

    session
        .dispatch(Action::SetSearchQuery("castle".into()), &mut canvas)
        .unwrap();

    let visible = canvas.visible_markers();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].spot_id, "t-1");
}

#[test]
fn matching_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_data(dir.path());

    session
        .dispatch(Action::SetSearchQuery("sTaTiOn".into()), &mut canvas)
        .unwrap();

    let visible = canvas.visible_markers();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].spot_id, "Station Plaza AP");
}

#[test]
fn addresses_match_too() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_data(dir.path());

    session
        .dispatch(Action::SetSearchQuery("ekimae".into()), &mut canvas)
        .unwrap();

    let visible = canvas.visible_markers();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].spot_id, "t-2");
}

#[test]
fn short_queries_restore_the_full_marker_set() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_data(dir.path());

    session
        .dispatch(Action::SetSearchQuery("castle".into()), &mut canvas)
        .unwrap();
    assert_eq!(canvas.visible_markers().len(), 1);

    for restoring in ["", "c"] {
        session
            .dispatch(Action::SetSearchQuery(restoring.into()), &mut canvas)
            .unwrap();
        assert_eq!(canvas.visible_markers().len(), 4, "query {restoring:?}");
    }
}

#[test]
fn an_unmatched_query_leaves_every_category_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut canvas) = session_with_data(dir.path());

    session
        .dispatch(Action::SetSearchQuery("zzzz".into()), &mut canvas)
        .unwrap();

    assert!(canvas.visible_markers().is_empty());
    for category in Category::ALL {
        assert!(canvas.markers_in(category).is_empty());
    }
}

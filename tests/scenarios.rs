//! End-to-end behavior through the public API: store, erasers, sessions.
#![allow(clippy::float_cmp)]

use inkline::config::PartialEraseMode;
use inkline::consts::BREAK_SENTINEL;
use inkline::engine::Event;
use inkline::erase::{clear_all_if_touching, erase_touching, partial_erase};
use inkline::geom::Point;
use inkline::session::DrawingSession;
use inkline::store::PolylineStore;

fn p(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

fn on_x(n: u32) -> Vec<Point> {
    (0..n).map(|i| p(f64::from(i), 0.0, 0.0)).collect()
}

fn removed_count(events: &[Event]) -> usize {
    events.iter().filter(|e| matches!(e, Event::LineRemoved { .. })).count()
}

// =============================================================
// Buffers
// =============================================================

#[test]
fn add_then_rebuild_frames_points_with_one_sentinel() {
    let mut store = PolylineStore::new(2);
    let points = vec![p(0.0, 0.0, 0.0), p(1.0, 2.0, 3.0), p(4.0, 5.0, 6.0)];
    store.add(points.clone(), 1).unwrap();
    store.rebuild(1);

    let mut expected = vec![BREAK_SENTINEL];
    expected.extend(points);
    assert_eq!(store.buffers().get(1), expected.as_slice());
    assert!(store.buffers().get(0).is_empty());
}

#[test]
fn buffers_keep_store_order_per_color() {
    let mut store = PolylineStore::new(2);
    store.add(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)], 0).unwrap();
    store.add(vec![p(0.0, 9.0, 0.0), p(1.0, 9.0, 0.0)], 1).unwrap();
    store.add(vec![p(0.0, 1.0, 0.0), p(1.0, 1.0, 0.0)], 0).unwrap();

    let buffer = store.render_buffer(0).to_vec();
    assert_eq!(
        buffer,
        vec![
            BREAK_SENTINEL,
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            BREAK_SENTINEL,
            p(0.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
        ]
    );
}

// =============================================================
// Whole-line and clear-all erase
// =============================================================

#[test]
fn erase_touching_removes_line_through_center() {
    let mut store = PolylineStore::new(1);
    let id = store.add(on_x(3), 0).unwrap();

    let events = erase_touching(&mut store, p(1.0, 0.0, 0.0), 0.1);

    assert_eq!(events, vec![Event::LineRemoved { id, color_index: 0 }]);
    assert!(store.is_empty());
    assert!(store.render_buffer(0).is_empty());
}

#[test]
fn erase_touching_removes_only_first_in_store_order() {
    let mut store = PolylineStore::new(1);
    let first = store.add(on_x(3), 0).unwrap();
    let second = store.add(on_x(3), 0).unwrap();

    erase_touching(&mut store, p(1.0, 0.0, 0.0), 0.1);

    assert_eq!(store.len(), 1);
    assert!(store.index_of(first).is_none());
    assert_eq!(store.index_of(second), Some(0));
}

#[test]
fn clear_all_empties_every_color_when_one_line_is_touched() {
    let mut store = PolylineStore::new(2);
    store.add(vec![p(5.3, 5.0, 5.0), p(6.0, 5.0, 5.0)], 0).unwrap();
    store.add(vec![p(5.0, 5.0, 7.0), p(5.0, 6.0, 7.0)], 1).unwrap();

    let events = clear_all_if_touching(&mut store, p(5.0, 5.0, 5.0), 0.5);

    assert_eq!(events, vec![Event::StoreCleared { removed: 2 }]);
    assert!(store.is_empty());
    assert!(store.render_buffer(0).is_empty());
    assert!(store.render_buffer(1).is_empty());
}

#[test]
fn clear_all_miss_leaves_store_alone() {
    let mut store = PolylineStore::new(1);
    store.add(on_x(3), 0).unwrap();
    assert!(clear_all_if_touching(&mut store, p(0.0, 10.0, 0.0), 0.5).is_empty());
    assert_eq!(store.len(), 1);
}

// =============================================================
// Partial erase
// =============================================================

#[test]
fn toggle_drops_tail_after_single_touched_segment() {
    let mut store = PolylineStore::new(1);
    let id = store.add(on_x(4), 0).unwrap();

    let events = partial_erase(&mut store, p(1.5, 0.0, 0.0), 0.1, PartialEraseMode::Toggle);

    assert_eq!(events, vec![Event::LineTrimmed { id, color_index: 0, points: 2 }]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().points(), &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]);
}

#[test]
fn toggle_bridges_gap_around_erased_vertex() {
    let mut store = PolylineStore::new(1);
    store.add(on_x(5), 0).unwrap();

    partial_erase(&mut store, p(2.0, 0.0, 0.0), 0.4, PartialEraseMode::Toggle);

    // Two touched segments toggle removal off again, so the tail reattaches.
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().points(), &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(4.0, 0.0, 0.0)]);
    assert_eq!(store.render_buffer(0).len(), 4);
}

#[test]
fn split_cuts_at_erased_vertex() {
    let mut store = PolylineStore::new(1);
    let id = store.add(on_x(5), 0).unwrap();

    let events = partial_erase(&mut store, p(2.0, 0.0, 0.0), 0.4, PartialEraseMode::Split);

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().id(), id);
    assert_eq!(store.get(0).unwrap().points(), &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]);
    assert_eq!(store.get(1).unwrap().points(), &[p(3.0, 0.0, 0.0), p(4.0, 0.0, 0.0)]);
    assert!(events.iter().any(|e| matches!(e, Event::LineAdded { .. })));
    assert_eq!(store.render_buffer(0).len(), 6);
}

#[test]
fn partial_erase_removes_lines_left_with_one_point() {
    let mut store = PolylineStore::new(1);
    store.add(on_x(2), 0).unwrap();
    store.add(vec![p(0.0, 3.0, 0.0), p(1.0, 3.0, 0.0)], 0).unwrap();

    let events = partial_erase(&mut store, p(0.5, 0.0, 0.0), 0.1, PartialEraseMode::Toggle);

    assert_eq!(removed_count(&events), 1);
    assert_eq!(store.len(), 1);
    assert!(store.lines().iter().all(|line| line.points().len() >= 2));
}

#[test]
fn partial_erase_miss_changes_nothing() {
    let mut store = PolylineStore::new(1);
    store.add(on_x(4), 0).unwrap();
    let before = store.lines().to_vec();

    let events = partial_erase(&mut store, p(1.5, 3.0, 0.0), 0.1, PartialEraseMode::Toggle);

    assert!(events.is_empty());
    assert_eq!(store.lines(), before.as_slice());
}

// =============================================================
// Drawing sessions
// =============================================================

#[test]
fn sub_threshold_session_commits_nothing() {
    let mut store = PolylineStore::new(1);
    let mut session = DrawingSession::new(0.02, 0.005);
    session.start(p(0.0, 0.0, 0.0), 0);
    assert!(!session.update(p(0.01, 0.0, 0.0)));
    assert!(!session.update(p(0.0, 0.01, 0.0)));

    assert!(session.commit(&mut store).is_none());
    assert!(store.is_empty());
    assert!(!session.is_active());
}

#[test]
fn committed_session_is_erasable() {
    let mut store = PolylineStore::new(1);
    let mut session = DrawingSession::new(0.02, 0.005);
    session.start(p(0.0, 0.0, 0.0), 0);
    session.update(p(0.5, 0.0, 0.0));
    session.update(p(0.5, 0.5, 0.0));
    let line = session.commit(&mut store).unwrap();
    assert_eq!(line.points().len(), 3);

    let events = erase_touching(&mut store, p(0.5, 0.25, 0.0), 0.1);
    assert_eq!(events, vec![Event::LineRemoved { id: line.id(), color_index: 0 }]);
}

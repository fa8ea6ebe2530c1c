#![allow(clippy::float_cmp)]

use super::*;

fn p(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

fn session() -> DrawingSession {
    DrawingSession::new(0.02, 0.005)
}

// =============================================================
// start
// =============================================================

#[test]
fn new_session_is_inactive_and_empty() {
    let s = session();
    assert!(!s.is_active());
    assert!(s.points().is_empty());
}

#[test]
fn start_seeds_two_identical_points() {
    let mut s = session();
    s.start(p(1.0, 2.0, 3.0), 2);
    assert!(s.is_active());
    assert_eq!(s.color_index(), 2);
    assert_eq!(s.points(), &[p(1.0, 2.0, 3.0), p(1.0, 2.0, 3.0)]);
}

#[test]
fn restart_discards_previous_points() {
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    s.update(p(1.0, 0.0, 0.0));
    s.start(p(5.0, 5.0, 5.0), 1);
    assert_eq!(s.points().len(), 2);
    assert_eq!(s.points()[0], p(5.0, 5.0, 5.0));
}

// =============================================================
// update
// =============================================================

#[test]
fn update_inactive_is_noop() {
    let mut s = session();
    assert!(!s.update(p(1.0, 0.0, 0.0)));
    assert!(s.points().is_empty());
}

#[test]
fn update_below_min_distance_is_ignored() {
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    assert!(!s.update(p(0.01, 0.0, 0.0)));
    assert_eq!(s.points().len(), 2);
}

#[test]
fn update_exactly_at_min_distance_is_ignored() {
    let mut s = DrawingSession::new(0.5, 0.0);
    s.start(p(0.0, 0.0, 0.0), 0);
    assert!(!s.update(p(0.5, 0.0, 0.0)));
}

#[test]
fn update_skips_non_finite_samples() {
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    assert!(!s.update(p(f64::NAN, 0.0, 0.0)));
    assert!(!s.update(p(f64::INFINITY, 1.0, 0.0)));
    assert_eq!(s.points().len(), 2);
    assert!(s.update(p(1.0, 0.0, 0.0)));
}

#[test]
fn bad_sample_does_not_lose_stroke() {
    let mut store = PolylineStore::new(1);
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    s.update(p(1.0, 0.0, 0.0));
    s.update(p(f64::NAN, f64::NAN, f64::NAN));
    s.update(p(1.0, 1.0, 0.0));
    let line = s.commit(&mut store).unwrap();
    assert_eq!(line.points(), &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)]);
}

#[test]
fn update_beyond_min_distance_appends() {
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    assert!(s.update(p(0.1, 0.0, 0.0)));
    assert_eq!(s.points().last(), Some(&p(0.1, 0.0, 0.0)));
}

#[test]
fn update_distance_measured_from_last_recorded_point() {
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    s.update(p(0.1, 0.0, 0.0));
    // Far from the start, close to the last sample.
    assert!(!s.update(p(0.11, 0.0, 0.0)));
    assert!(s.update(p(0.15, 0.0, 0.0)));
}

// =============================================================
// commit
// =============================================================

#[test]
fn commit_inserts_simplified_stroke() {
    let mut store = PolylineStore::new(2);
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 1);
    for i in 1..=10 {
        s.update(p(f64::from(i) * 0.1, 0.0, 0.0));
    }
    let line = s.commit(&mut store).unwrap();
    assert!(!s.is_active());
    assert!(s.points().is_empty());
    assert_eq!(store.len(), 1);
    assert_eq!(line.color_index(), 1);
    // Collinear samples collapse to the two endpoints.
    assert_eq!(line.points().len(), 2);
    assert_eq!(store.get(0).unwrap(), &line);
}

#[test]
fn commit_ends_where_pen_lifted_with_coarse_tolerance() {
    let mut store = PolylineStore::new(1);
    let mut s = DrawingSession::new(0.02, 0.1);
    s.start(p(0.0, 0.0, 0.0), 0);
    for i in 1..=5 {
        assert!(s.update(p(f64::from(i) * 0.03, 0.0, 0.0)));
    }
    let line = s.commit(&mut store).unwrap();
    assert_eq!(line.points(), &[p(0.0, 0.0, 0.0), p(5.0 * 0.03, 0.0, 0.0)]);
}

#[test]
fn commit_keeps_corners() {
    let mut store = PolylineStore::new(1);
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    s.update(p(1.0, 0.0, 0.0));
    s.update(p(1.0, 1.0, 0.0));
    let line = s.commit(&mut store).unwrap();
    assert_eq!(line.points(), &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)]);
}

#[test]
fn commit_after_sub_threshold_movement_returns_none() {
    let mut store = PolylineStore::new(1);
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    s.update(p(0.005, 0.0, 0.0));
    s.update(p(0.01, 0.005, 0.0));
    assert!(s.commit(&mut store).is_none());
    assert!(store.is_empty());
    assert!(!s.is_active());
}

#[test]
fn commit_when_inactive_returns_none() {
    let mut store = PolylineStore::new(1);
    assert!(session().commit(&mut store).is_none());
}

#[test]
fn commit_clamps_color_through_store() {
    let mut store = PolylineStore::new(2);
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 9);
    s.update(p(1.0, 0.0, 0.0));
    assert_eq!(s.commit(&mut store).unwrap().color_index(), 1);
}

// =============================================================
// cancel
// =============================================================

#[test]
fn cancel_discards_without_storing() {
    let mut store = PolylineStore::new(1);
    let mut s = session();
    s.start(p(0.0, 0.0, 0.0), 0);
    s.update(p(1.0, 0.0, 0.0));
    s.cancel();
    assert!(!s.is_active());
    assert!(s.points().is_empty());
    assert!(s.commit(&mut store).is_none());
    assert!(store.is_empty());
}

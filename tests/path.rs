//! Tests for path points: deltas, linking, deviation classification

use trackclean::{Deviance, DeviationRule, PathPoint, TrackPoint};

fn start() -> TrackPoint {
    TrackPoint::new(0.0, 0.0, 0.0)
}

#[test]
fn test_head_has_no_delta() {
    let head = PathPoint::new(start());
    assert!(head.delta().is_none());
    assert!(head.prev().is_none());
    assert!(head.next().is_none());
    assert_eq!(head.deviance(), Deviance::Clean);
}

#[test]
fn test_delta_is_exact_signed_difference() {
    let prev = TrackPoint::new(0.002, 0.1, 1.0);
    let point = PathPoint::after(TrackPoint::new(0.1, 0.002, 2.0), 0, &prev);

    let delta = point.delta().unwrap();
    assert_eq!(delta.lat, 0.002 - 0.1);
    assert_eq!(delta.long, 0.1 - 0.002);
    assert_eq!(point.prev(), Some(0));
}

#[test]
fn test_head_never_deviant() {
    let mut head = PathPoint::new(start());
    assert!(!head.classify(0.0, DeviationRule::Either));
    assert!(!head.classify(0.0, DeviationRule::Both));
    assert_eq!(head.deviance(), Deviance::Clean);
}

#[test]
fn test_classify_either_rule() {
    // one axis jumps, the other is still
    let mut point = PathPoint::after(TrackPoint::new(0.1, 0.0, 1.0), 0, &start());
    assert!(point.classify(0.05, DeviationRule::Either));
    assert_eq!(point.deviance(), Deviance::EitherAxis);
    assert!(point.is_deviant());
}

#[test]
fn test_classify_both_rule() {
    let mut point = PathPoint::after(TrackPoint::new(0.1, 0.0, 1.0), 0, &start());
    // both-axes rule needs both deltas past the margin
    assert!(!point.classify(0.05, DeviationRule::Both));
    assert_eq!(point.deviance(), Deviance::Clean);

    let mut point = PathPoint::after(TrackPoint::new(0.1, 0.1, 1.0), 0, &start());
    assert!(point.classify(0.05, DeviationRule::Both));
    assert_eq!(point.deviance(), Deviance::BothAxes);
}

#[test]
fn test_classify_margin_is_inclusive() {
    let mut point = PathPoint::after(TrackPoint::new(0.05, 0.0, 1.0), 0, &start());
    assert!(point.classify(0.05, DeviationRule::Either));
}

#[test]
fn test_classify_overwrites_previous_result() {
    let mut point = PathPoint::after(TrackPoint::new(0.1, 0.0, 1.0), 0, &start());
    assert!(point.classify(0.05, DeviationRule::Either));
    assert!(point.is_deviant());

    // a later clean test replaces the stored verdict
    assert!(!point.classify(0.05, DeviationRule::Both));
    assert!(!point.is_deviant());
}

#[test]
fn test_either_rule_monotonic_in_margin() {
    let point = PathPoint::after(TrackPoint::new(0.03, 0.01, 1.0), 0, &start());

    let mut margin = 0.02;
    let mut was_deviant = false;
    while margin > 0.0001 {
        let mut probe = point.clone();
        let deviant = probe.classify(margin, DeviationRule::Either);
        // shrinking the margin can only flag more, never fewer
        assert!(deviant || !was_deviant);
        was_deviant = deviant;
        margin /= 2.0;
    }
    assert!(was_deviant);
}

#[test]
fn test_relink_recomputes_deltas() {
    let a = TrackPoint::new(0.0, 0.0, 0.0);
    let b = TrackPoint::new(0.1, 0.1, 1.0);
    let mut point = PathPoint::after(TrackPoint::new(0.2, 0.2, 2.0), 1, &b);
    assert_eq!(point.delta().unwrap().lat, 0.2 - 0.1);

    point.set_predecessor(0, &a);
    assert_eq!(point.prev(), Some(0));
    assert_eq!(point.delta().unwrap().lat, 0.2);
    assert_eq!(point.delta().unwrap().long, 0.2);
}

#[test]
fn test_link_next_does_not_touch_back_link() {
    let mut head = PathPoint::new(start());
    head.link_next(1);
    assert_eq!(head.next(), Some(1));
    assert!(head.prev().is_none());
}

#[test]
fn test_render_head_without_change_suffix() {
    let head = PathPoint::new(TrackPoint::new(-0.1278, 51.5074, 0.0));
    assert_eq!(head.to_string(), "at 0: (51.50740,-0.12780)");
}

#[test]
fn test_render_includes_change_and_marker() {
    let mut point = PathPoint::after(TrackPoint::new(0.1, 0.002, 1.0), 0, &start());
    assert_eq!(
        point.to_string(),
        "at 1: (0.00200,0.10000) change: (0.002,0.100)"
    );

    point.classify(0.05, DeviationRule::Either);
    assert_eq!(
        point.to_string(),
        "at 1: (0.00200,0.10000) change: (0.002,0.100) deviant!"
    );
}

#[test]
fn test_deviance_labels() {
    assert_eq!(Deviance::Clean.to_string(), "clean");
    assert_eq!(Deviance::EitherAxis.to_string(), "either_axis");
    assert_eq!(Deviance::BothAxes.to_string(), "both_axes");
}

#[test]
fn test_serialize_path_point() {
    let point = PathPoint::after(TrackPoint::new(0.1, 0.0, 1.0), 0, &start());
    let json = serde_json::to_value(&point).unwrap();

    // sample fields are flattened; links are never serialized
    assert_eq!(json["longitude"], 0.1);
    assert_eq!(json["delta"]["long"], 0.1);
    assert_eq!(json["deviance"], "clean");
    assert!(json.get("prev").is_none());
    assert!(json.get("next").is_none());

    // a head point carries no delta at all
    let head = serde_json::to_value(PathPoint::new(start())).unwrap();
    assert!(head.get("delta").is_none());
}

#[test]
fn test_render_change_round_trip() {
    let point = PathPoint::after(TrackPoint::new(0.1234567, 0.7654321, 1.0), 0, &start());
    let rendered = point.to_string();

    let change = rendered.split_once("change: (").unwrap().1;
    let change = change.strip_suffix(')').unwrap();
    let (lat, long) = change.split_once(',').unwrap();
    let lat: f64 = lat.parse().unwrap();
    let long: f64 = long.parse().unwrap();

    assert!((lat - 0.7654321).abs() < 5e-4);
    assert!((long - 0.1234567).abs() < 5e-4);
}

use irtrack_core::{RawDetection, Sensor, SensorRig, TrackedPoint, Triangulator};
use irtrack_gestures::{Axis, GestureDetector, GestureEvent, GestureParams, GestureState};
use irtrack_tracker::{
    CorrespondenceResolver, PairingChoice, ResolutionPath, ResolvedFrame, ResolverParams,
    StereoFrame,
};
use nalgebra::Point3;

fn resolved(left: Option<TrackedPoint>, right: Option<TrackedPoint>, prior: f64) -> ResolvedFrame {
    let missing = match (left.is_some(), right.is_some()) {
        (true, true) => 0,
        (false, false) => 4,
        _ => 2,
    };
    ResolvedFrame {
        left,
        right,
        missing_detections: missing,
        pairing: PairingChoice::Direct,
        path: ResolutionPath::Residual,
        anomalies: 0,
        last_distance: prior,
        prior_distance: prior,
    }
}

fn at(x: f64, y: f64, z: f64) -> Option<TrackedPoint> {
    Some(TrackedPoint::new(x, y, z))
}

/// Feeds a single point moving by `step` per frame and collects all events.
fn drive(
    detector: &GestureDetector,
    state: &mut GestureState,
    start: [f64; 3],
    steps: &[[f64; 3]],
) -> Vec<GestureEvent> {
    let mut pos = start;
    let mut events = detector.detect(&resolved(at(pos[0], pos[1], pos[2]), None, 999.9), state);
    for step in steps {
        for i in 0..3 {
            pos[i] += step[i];
        }
        events.extend(detector.detect(&resolved(at(pos[0], pos[1], pos[2]), None, 999.9), state));
    }
    events
}

#[test]
fn threshold_steps_fire_exactly_one_swipe() {
    let detector = GestureDetector::default();
    let mut state = GestureState::new();
    let steps = vec![[5.0, 0.0, 0.0]; 8];

    let events = drive(&detector, &mut state, [100.0, 0.0, 600.0], &steps);

    assert_eq!(events.len(), 1);
    match events[0] {
        GestureEvent::Swipe {
            axis,
            direction,
            origin,
        } => {
            assert_eq!(axis, Axis::X);
            // Moving towards +x reports -1.
            assert_eq!(direction, -1);
            assert_eq!(origin.position, Point3::new(105.0, 0.0, 600.0));
        }
        other => panic!("expected a swipe, got {other:?}"),
    }
    assert_eq!(state.swipe_counters, [0, 0, 0]);
}

#[test]
fn one_step_short_of_threshold_is_silent() {
    let detector = GestureDetector::default();
    let mut state = GestureState::new();
    let steps = vec![[0.0, -4.0, 0.0]; 7];

    let events = drive(&detector, &mut state, [100.0, 0.0, 600.0], &steps);
    assert!(events.is_empty());
    assert_eq!(state.swipe_counters, [0, 7, 0]);
}

#[test]
fn reversal_restarts_the_count() {
    let detector = GestureDetector::default();
    let mut state = GestureState::new();
    let mut steps = vec![[0.0, 0.0, 6.0]; 5];
    steps.extend(vec![[0.0, 0.0, -6.0]; 7]);

    let events = drive(&detector, &mut state, [0.0, 0.0, 600.0], &steps);
    assert!(events.is_empty());
    assert_eq!(state.swipe_counters[Axis::Z.index()], 7);

    // One more step down, from 588 to 582, completes the reversed run.
    let events = drive(&detector, &mut state, [0.0, 0.0, 582.0], &[]);
    assert_eq!(events.len(), 1);
    match events[0] {
        GestureEvent::Swipe {
            axis,
            direction,
            origin,
        } => {
            assert_eq!(axis, Axis::Z);
            assert_eq!(direction, 1);
            // The reversal did not move the origin of the first run.
            assert_eq!(origin.position, Point3::new(0.0, 0.0, 606.0));
        }
        other => panic!("expected a swipe, got {other:?}"),
    }
}

#[test]
fn movement_at_sensitivity_is_inert() {
    let detector = GestureDetector::default();
    let mut state = GestureState::new();
    let steps = vec![[2.0, -2.0, 1.5]; 20];

    let events = drive(&detector, &mut state, [0.0, 0.0, 600.0], &steps);
    assert!(events.is_empty());
    assert_eq!(state.swipe_counters, [0, 0, 0]);
}

#[test]
fn custom_threshold_per_axis() {
    let params = GestureParams::default()
        .with_swipe_threshold(Axis::Y, 3)
        .unwrap();
    let detector = GestureDetector::new(params);
    let mut state = GestureState::new();
    let steps = vec![[5.0, 5.0, 0.0]; 3];

    let events = drive(&detector, &mut state, [0.0, 0.0, 600.0], &steps);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        GestureEvent::Swipe {
            axis: Axis::Y,
            direction: -1,
            ..
        }
    ));
    // The y swipe resets every axis, x included.
    assert_eq!(state.swipe_counters, [0, 0, 0]);
}

#[test]
fn pinch_then_unpinch() {
    let detector = GestureDetector::default();
    let mut state = GestureState::new();

    let a = at(100.0, 0.0, 600.0);
    let b = at(140.0, 0.0, 600.0);

    assert!(detector.detect(&resolved(a, b, 40.0), &mut state).is_empty());

    let events = detector.detect(&resolved(a, None, 40.0), &mut state);
    assert_eq!(events, vec![GestureEvent::Pinch { location: a.unwrap() }]);
    assert!(state.pinched);

    // Still pinched: no repeat.
    assert!(detector.detect(&resolved(a, None, 40.0), &mut state).is_empty());

    let events = detector.detect(&resolved(a, b, 40.0), &mut state);
    assert_eq!(events, vec![GestureEvent::Unpinch { location: a.unwrap() }]);
    assert!(!state.pinched);
}

#[test]
fn pinch_uses_the_surviving_slot() {
    let detector = GestureDetector::default();
    let mut state = GestureState::new();
    let events = detector.detect(&resolved(None, at(1.0, 2.0, 600.0), 10.0), &mut state);
    assert_eq!(
        events,
        vec![GestureEvent::Pinch {
            location: TrackedPoint::new(1.0, 2.0, 600.0)
        }]
    );
}

#[test]
fn far_apart_loss_is_not_a_pinch() {
    let detector = GestureDetector::default();
    let mut state = GestureState::new();
    let a = at(100.0, 0.0, 600.0);

    let events = detector.detect(&resolved(a, None, 70.0), &mut state);
    assert!(events.is_empty());
    assert!(!state.pinched);
}

#[test]
fn resolver_output_drives_a_pinch() {
    let rig = SensorRig::default();
    let resolver = CorrespondenceResolver::new(Triangulator::new(rig), ResolverParams::default());
    let detector = GestureDetector::default();
    let mut tracking = resolver.initial_state();
    let mut gestures = GestureState::new();

    let observe = |points: [Point3<f64>; 2]| {
        let view = |sensor: Sensor| points.map(|p| rig.project(sensor, &p).expect("visible"));
        StereoFrame::new(view(Sensor::Left), view(Sensor::Right))
    };

    // Two fingertips about 53 units apart, off the shared plane, seen twice so the
    // prior distance is no longer the start-up value.
    let near = [
        Point3::new(280.0, -25.0, 900.0),
        Point3::new(300.0, 20.0, 920.0),
    ];
    for _ in 0..2 {
        let frame = resolver.resolve(&observe(near), &mut tracking);
        assert!(detector.detect(&frame, &mut gestures).is_empty());
    }

    let full = observe(near);
    let merged = StereoFrame::new(
        [full.left[0], RawDetection::missing()],
        [full.right[0], RawDetection::missing()],
    );
    let frame = resolver.resolve(&merged, &mut tracking);
    assert_eq!(frame.missing_detections, 2);
    assert!(frame.prior_distance < 70.0);

    let events = detector.detect(&frame, &mut gestures);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], GestureEvent::Pinch { .. }));
}

#[test]
fn events_serialize_with_a_tag() {
    let event = GestureEvent::Swipe {
        axis: Axis::Z,
        direction: -1,
        origin: TrackedPoint::new(0.0, 0.0, 500.0),
    };
    let json = serde_json::to_value(event).unwrap();
    assert_eq!(json["gesture"], "swipe");
    assert_eq!(json["axis"], "z");
    assert_eq!(json["direction"], -1);
}

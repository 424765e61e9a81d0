use irtrack_core::TrackedPoint;
use irtrack_tracker::ResolvedFrame;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::event::{Axis, GestureEvent};
use crate::params::GestureParams;

/// Hysteresis carried between frames.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureState {
    pub pinched: bool,
    /// Signed consecutive-step counters for x, y and z.
    pub swipe_counters: [i32; 3],
    /// Where the swipe in progress started.
    pub swipe_origin: TrackedPoint,
    /// Points of the previous frame, slot 0 then slot 1.
    pub previous: [Option<TrackedPoint>; 2],
}

impl GestureState {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset_swipes(&mut self) {
        self.swipe_counters = [0; 3];
    }
}

/// Turns resolved frames into pinch and swipe events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureDetector {
    params: GestureParams,
}

impl GestureDetector {
    pub fn new(params: GestureParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &GestureParams {
        &self.params
    }

    /// Events for one frame, in emission order: unpinch, pinch, swipes.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, state), fields(missing = frame.missing_detections))
    )]
    pub fn detect(&self, frame: &ResolvedFrame, state: &mut GestureState) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        if state.pinched && frame.missing_detections == 0 {
            state.pinched = false;
            let location = frame.left.unwrap_or_else(|| frame.average());
            events.push(GestureEvent::Unpinch { location });
        }

        if !state.pinched
            && frame.missing_detections == 2
            && frame.prior_distance < self.params.pinch_threshold
        {
            state.pinched = true;
            let location = frame
                .left
                .or(frame.right)
                .unwrap_or_else(TrackedPoint::zero);
            events.push(GestureEvent::Pinch { location });
        }

        if let Some((current, delta)) = displacement(&state.previous, frame) {
            for axis in Axis::ALL {
                if let Some(direction) = self.step_swipe(state, axis, delta[axis.index()], current) {
                    events.push(GestureEvent::Swipe {
                        axis,
                        direction,
                        origin: state.swipe_origin,
                    });
                }
            }
        }

        state.previous = frame.points();

        for event in &events {
            log::debug!("gesture: {event:?}");
        }
        events
    }

    /// Advance one axis counter; returns the direction when a swipe fires.
    fn step_swipe(
        &self,
        state: &mut GestureState,
        axis: Axis,
        delta: f64,
        current: TrackedPoint,
    ) -> Option<i8> {
        if delta.abs() <= self.params.swipe_sensitivity {
            return None;
        }

        let step: i32 = if delta > 0.0 { 1 } else { -1 };
        let counter = &mut state.swipe_counters[axis.index()];
        // Origin is taken before a reversal zeroes the counter.
        if *counter == 0 {
            state.swipe_origin = current;
        }
        if *counter * step < 0 {
            *counter = 0;
        }
        *counter += step;

        if counter.unsigned_abs() >= self.params.swipe_threshold(axis) {
            state.reset_swipes();
            return Some(step as i8);
        }
        None
    }
}

/// Current reference point and the previous one's offset from it
/// (previous minus current).
///
/// Uses the averaged pair when slot 0 is seen on both frames, otherwise
/// slot 1 alone when that is seen on both.
fn displacement(
    previous: &[Option<TrackedPoint>; 2],
    frame: &ResolvedFrame,
) -> Option<(TrackedPoint, Vector3<f64>)> {
    match (previous, frame.points()) {
        ([Some(prev_l), prev_r], [Some(cur_l), cur_r]) => {
            let prev = prev_l.average(prev_r.as_ref());
            let current = cur_l.average(cur_r.as_ref());
            Some((current, prev.delta_from(&current)))
        }
        ([_, Some(prev_r)], [_, Some(cur_r)]) => Some((cur_r, prev_r.delta_from(&cur_r))),
        _ => None,
    }
}

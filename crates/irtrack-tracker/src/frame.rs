use irtrack_core::{RawDetection, Sensor, TrackedPoint};
use serde::{Deserialize, Serialize};

use crate::state::PairingChoice;

/// The detections buffered for both sensors at one update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StereoFrame {
    pub left: [RawDetection; 2],
    pub right: [RawDetection; 2],
}

impl StereoFrame {
    pub fn new(left: [RawDetection; 2], right: [RawDetection; 2]) -> Self {
        Self { left, right }
    }

    pub fn sensor(&self, sensor: Sensor) -> &[RawDetection; 2] {
        match sensor {
            Sensor::Left => &self.left,
            Sensor::Right => &self.right,
        }
    }

    pub fn sensor_mut(&mut self, sensor: Sensor) -> &mut [RawDetection; 2] {
        match sensor {
            Sensor::Left => &mut self.left,
            Sensor::Right => &mut self.right,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.left.iter().chain(&self.right).all(|d| !d.is_missing())
    }
}

/// How a frame's correspondence was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResolutionPath {
    /// All four detections, pairing with the lower residual on left slot 0.
    Residual,
    /// All four detections on the shared horizontal plane; left-most pixel
    /// matched to left-most pixel, optionally flipped by the stability check.
    SharedPlane { flipped: bool },
    /// Some detections missing; previous pairing reused.
    Partial { greedy: bool },
}

/// Resolver output for one update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFrame {
    /// Point paired with left-sensor slot 0, if any.
    pub left: Option<TrackedPoint>,
    /// Point paired with left-sensor slot 1, if any.
    pub right: Option<TrackedPoint>,
    /// Detection slots reporting the sentinel (0..=4).
    pub missing_detections: u8,
    pub pairing: PairingChoice,
    pub path: ResolutionPath,
    /// Triangulations on this frame that hit degenerate ray geometry.
    pub anomalies: u32,
    /// Tracking state's inter-point distances after this frame.
    pub last_distance: f64,
    pub prior_distance: f64,
}

impl ResolvedFrame {
    /// Midpoint of both points, the single point if one is missing, or the
    /// origin if neither resolved.
    pub fn average(&self) -> TrackedPoint {
        match (&self.left, &self.right) {
            (Some(l), r) => l.average(r.as_ref()),
            (None, Some(r)) => *r,
            (None, None) => TrackedPoint::zero(),
        }
    }

    pub fn points(&self) -> [Option<TrackedPoint>; 2] {
        [self.left, self.right]
    }

    pub fn resolved_count(&self) -> usize {
        self.points().iter().flatten().count()
    }
}

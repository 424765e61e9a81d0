use crate::point::{RawDetection, TrackedPoint};
use crate::ray::{closest_approach, RayAnomaly};
use crate::rig::{Sensor, SensorRig};

/// Outcome of triangulating one matched detection pair.
///
/// Degenerate ray geometry is reported through `anomaly` with a zero
/// `point`; the pipeline keeps running either way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangulation {
    pub point: TrackedPoint,
    pub anomaly: Option<RayAnomaly>,
}

impl Triangulation {
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.anomaly.is_some()
    }
}

/// Converts matched left/right detections into rig-frame points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangulator {
    rig: SensorRig,
}

impl Triangulator {
    pub fn new(rig: SensorRig) -> Self {
        Self { rig }
    }

    #[inline]
    pub fn rig(&self) -> &SensorRig {
        &self.rig
    }

    /// Intersect the left and right sensor rays for one detection pair.
    ///
    /// The returned point is the midpoint of the shortest segment between
    /// the rays and `error` is that segment's length: near zero when the two
    /// detections are views of the same blob, large when they are not.
    pub fn triangulate(&self, left: &RawDetection, right: &RawDetection) -> Triangulation {
        let left_ray = self.rig.ray(Sensor::Left, left);
        let right_ray = self.rig.ray(Sensor::Right, right);
        let size = 0.5 * (left.size + right.size);

        match closest_approach(&left_ray, &right_ray) {
            Ok(hit) => Triangulation {
                point: TrackedPoint::from_position(hit.midpoint)
                    .with_error(hit.residual)
                    .with_size(size),
                anomaly: None,
            },
            Err(anomaly) => {
                log::warn!(
                    "ray intersection failed for left ({:.1}, {:.1}) / right ({:.1}, {:.1}): {anomaly}",
                    left.x,
                    left.y,
                    right.x,
                    right.y
                );
                Triangulation {
                    point: TrackedPoint::zero(),
                    anomaly: Some(anomaly),
                }
            }
        }
    }
}

impl Default for Triangulator {
    fn default() -> Self {
        Self::new(SensorRig::default())
    }
}

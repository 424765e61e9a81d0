use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Raw x coordinate a sensor reports for an empty blob slot.
pub const NO_DETECTION: f64 = 1023.0;

/// One blob as reported by a sensor, in raw pixel space (nominally 0..1023).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub size: f64,
}

impl RawDetection {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    /// An empty slot (`x == NO_DETECTION`).
    pub fn missing() -> Self {
        Self {
            x: NO_DETECTION,
            y: NO_DETECTION,
            size: 0.0,
        }
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.x >= NO_DETECTION
    }

    /// `Some(self)` unless this slot holds the sentinel.
    #[inline]
    pub fn present(self) -> Option<Self> {
        (!self.is_missing()).then_some(self)
    }
}

impl Default for RawDetection {
    fn default() -> Self {
        Self::missing()
    }
}

/// A point in the rig frame, in baseline units.
///
/// `error` is the triangulation residual (length of the shortest segment
/// between the two sensor rays) and is only meaningful on triangulated
/// points. `size` is carried over from the source detections.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedPoint {
    pub position: Point3<f64>,
    #[serde(default)]
    pub error: f64,
    #[serde(default)]
    pub size: f64,
}

impl TrackedPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_position(Point3::new(x, y, z))
    }

    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            error: 0.0,
            size: 0.0,
        }
    }

    pub fn zero() -> Self {
        Self::from_position(Point3::origin())
    }

    #[must_use]
    pub fn with_error(self, error: f64) -> Self {
        Self { error, ..self }
    }

    #[must_use]
    pub fn with_size(self, size: f64) -> Self {
        Self { size, ..self }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// A point with no depth is what a failed triangulation produces.
    #[inline]
    pub fn has_depth(&self) -> bool {
        self.position.z != 0.0
    }

    /// Midpoint with `other`, or `self` when there is nothing to average with.
    pub fn average(&self, other: Option<&TrackedPoint>) -> TrackedPoint {
        match other {
            None => *self,
            Some(o) => TrackedPoint {
                position: nalgebra::center(&self.position, &o.position),
                error: 0.5 * (self.error + o.error),
                size: 0.5 * (self.size + o.size),
            },
        }
    }

    pub fn distance(&self, other: &TrackedPoint) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Vector from `from` to `self`.
    pub fn delta_from(&self, from: &TrackedPoint) -> Vector3<f64> {
        self.position - from.position
    }

    /// `true` if any axis differs from `other` by more than `tolerance`.
    pub fn deviates_from(&self, other: &TrackedPoint, tolerance: f64) -> bool {
        self.delta_from(other)
            .iter()
            .any(|component| component.abs() > tolerance)
    }
}

impl Default for TrackedPoint {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_slot_is_missing() {
        assert!(RawDetection::missing().is_missing());
        assert!(RawDetection::new(1023.0, 200.0, 3.0).is_missing());
        assert!(RawDetection::new(1022.0, 1023.0, 3.0).present().is_some());
    }

    #[test]
    fn average_falls_back_to_self() {
        let a = TrackedPoint::new(1.0, 2.0, 3.0).with_error(0.5);
        assert_eq!(a.average(None), a);

        let b = TrackedPoint::new(3.0, 4.0, 5.0).with_error(1.5);
        let mid = a.average(Some(&b));
        assert_eq!(mid.position, Point3::new(2.0, 3.0, 4.0));
        assert!((mid.error - 1.0).abs() < 1e-12);
    }

    #[test]
    fn deviation_is_per_axis() {
        let a = TrackedPoint::new(0.0, 0.0, 100.0);
        let b = TrackedPoint::new(20.0, -20.0, 120.0);
        assert!(!b.deviates_from(&a, 25.0));
        assert!(b.deviates_from(&a, 19.0));
        assert!((a.distance(&b) - (1200.0_f64).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn detection_size_defaults_when_absent() {
        let det: RawDetection = serde_json::from_str(r#"{"x": 10.0, "y": 20.0}"#).unwrap();
        assert_eq!(det, RawDetection::new(10.0, 20.0, 0.0));
    }
}

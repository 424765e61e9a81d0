use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::point::TrackedPoint;

/// Axis-aligned box of the rig frame that front ends map onto their output
/// range (screen, cursor, ...).
///
/// The defaults are the extents observed with the default 609.6 mm rig.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkingVolume {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Default for WorkingVolume {
    fn default() -> Self {
        Self {
            min: Point3::new(15.0, -169.0, 330.0),
            max: Point3::new(575.0, 132.0, 1640.0),
        }
    }
}

impl WorkingVolume {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, axis) in ['x', 'y', 'z'].into_iter().enumerate() {
            let (min, max) = (self.min[i], self.max[i]);
            if !(min.is_finite() && max.is_finite() && max > min) {
                return Err(ConfigError::EmptyRange { axis, min, max });
            }
        }
        Ok(())
    }

    /// Position of `point` inside the volume, each axis scaled to `[0, 1]`
    /// and clamped.
    pub fn normalize(&self, point: &TrackedPoint) -> [f64; 3] {
        std::array::from_fn(|i| {
            let span = self.max[i] - self.min[i];
            ((point.position[i] - self.min[i]) / span).clamp(0.0, 1.0)
        })
    }
}

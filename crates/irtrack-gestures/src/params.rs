use irtrack_core::{ensure_positive, ConfigError};
use serde::{Deserialize, Serialize};

use crate::event::Axis;

/// Gesture thresholds, in baseline units and frames.
///
/// Sensitivity and pinch distance are in output units, so they need
/// rescaling when the baseline is not given in millimetres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureParams {
    /// Consecutive qualifying frames needed for a swipe along x.
    pub swipe_threshold_x: u32,
    pub swipe_threshold_y: u32,
    pub swipe_threshold_z: u32,
    /// Minimum per-frame movement along an axis that counts towards a swipe.
    pub swipe_sensitivity: f64,
    /// Pre-loss inter-point distance under which losing a point is a pinch.
    pub pinch_threshold: f64,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            swipe_threshold_x: 8,
            swipe_threshold_y: 8,
            swipe_threshold_z: 8,
            swipe_sensitivity: 2.0,
            pinch_threshold: 70.0,
        }
    }
}

fn ensure_steps(name: &'static str, steps: u32) -> Result<u32, ConfigError> {
    if steps == 0 {
        return Err(ConfigError::NonPositive { name, value: 0.0 });
    }
    Ok(steps)
}

impl GestureParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_steps("swipe_threshold_x", self.swipe_threshold_x)?;
        ensure_steps("swipe_threshold_y", self.swipe_threshold_y)?;
        ensure_steps("swipe_threshold_z", self.swipe_threshold_z)?;
        ensure_positive("swipe_sensitivity", self.swipe_sensitivity)?;
        ensure_positive("pinch_threshold", self.pinch_threshold)?;
        Ok(())
    }

    pub fn swipe_threshold(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.swipe_threshold_x,
            Axis::Y => self.swipe_threshold_y,
            Axis::Z => self.swipe_threshold_z,
        }
    }

    pub fn with_swipe_threshold(mut self, axis: Axis, steps: u32) -> Result<Self, ConfigError> {
        let slot = match axis {
            Axis::X => &mut self.swipe_threshold_x,
            Axis::Y => &mut self.swipe_threshold_y,
            Axis::Z => &mut self.swipe_threshold_z,
        };
        *slot = ensure_steps("swipe_threshold", steps)?;
        Ok(self)
    }

    pub fn with_swipe_sensitivity(mut self, sensitivity: f64) -> Result<Self, ConfigError> {
        self.swipe_sensitivity = ensure_positive("swipe_sensitivity", sensitivity)?;
        Ok(self)
    }

    pub fn with_pinch_threshold(mut self, distance: f64) -> Result<Self, ConfigError> {
        self.pinch_threshold = ensure_positive("pinch_threshold", distance)?;
        Ok(self)
    }
}

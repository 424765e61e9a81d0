use irtrack_core::{ensure_positive, ConfigError};
use serde::{Deserialize, Serialize};

/// Tuning of the correspondence heuristics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverParams {
    /// Two left-sensor detections closer than this in raw y (pixels) are
    /// treated as lying in the sensors' shared horizontal plane, where
    /// residuals cannot tell the pairings apart.
    pub shared_plane_tolerance_px: f64,
    /// Per-axis jump (baseline units) from the previous point that makes the
    /// shared-plane heuristic flip its pairing.
    pub stability_tolerance: f64,
    /// Inter-point distance assumed before two points were ever seen
    /// together. Large, so no pinch fires at start-up.
    pub initial_distance: f64,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            shared_plane_tolerance_px: 30.0,
            stability_tolerance: 25.0,
            initial_distance: 999.9,
        }
    }
}

impl ResolverParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("shared_plane_tolerance_px", self.shared_plane_tolerance_px)?;
        ensure_positive("stability_tolerance", self.stability_tolerance)?;
        ensure_positive("initial_distance", self.initial_distance)?;
        Ok(())
    }
}

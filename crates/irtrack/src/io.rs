//! JSON configuration and frame-recording helpers.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use irtrack_core::{ConfigError, RawDetection, Sensor, SensorRig, Triangulator, WorkingVolume};
use irtrack_gestures::{GestureDetector, GestureParams};
use irtrack_tracker::{CorrespondenceResolver, ResolverParams};
use serde::{Deserialize, Serialize};

use crate::dual_sensor::DualSensorTracker;

#[derive(thiserror::Error, Debug)]
pub enum IrtrackIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("recording line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Full tracker configuration, as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub rig: SensorRig,
    pub resolver: ResolverParams,
    pub gestures: GestureParams,
    /// Bounds used when reporting normalized coordinates.
    pub volume: WorkingVolume,
    pub gestures_enabled: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            rig: SensorRig::default(),
            resolver: ResolverParams::default(),
            gestures: GestureParams::default(),
            volume: WorkingVolume::default(),
            gestures_enabled: true,
        }
    }
}

impl TrackerConfig {
    /// Load and validate a JSON config. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IrtrackIoError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IrtrackIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rig.validate()?;
        self.resolver.validate()?;
        self.gestures.validate()?;
        self.volume.validate()?;
        Ok(())
    }

    /// Build a tracker from a validated config.
    pub fn build_tracker(&self) -> Result<DualSensorTracker, ConfigError> {
        self.validate()?;
        let resolver =
            CorrespondenceResolver::new(Triangulator::new(self.rig), self.resolver.clone());
        let tracker = DualSensorTracker::new(resolver, GestureDetector::new(self.gestures.clone()));
        tracker.set_gestures_enabled(self.gestures_enabled);
        Ok(tracker)
    }
}

/// One sensor update in a recording: up to two `[x, y, size]` blobs.
///
/// Recordings are JSON lines, one sample per line:
///
/// ```text
/// {"sensor": "left", "detections": [[400, 390, 2], [150, 500, 3]]}
/// {"sensor": "right", "detections": [[600, 390, 2]]}
/// ```
///
/// Fewer than two blobs leave the remaining slots empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub sensor: Sensor,
    #[serde(default)]
    pub detections: Vec<[f64; 3]>,
}

impl SensorSample {
    /// Sample holding the non-empty slots of `detections`.
    pub fn from_slots(sensor: Sensor, detections: [RawDetection; 2]) -> Self {
        Self {
            sensor,
            detections: detections
                .iter()
                .filter_map(|d| d.present())
                .map(|d| [d.x, d.y, d.size])
                .collect(),
        }
    }

    /// Detections padded to two slots with the empty-slot sentinel.
    pub fn slots(&self) -> Option<[RawDetection; 2]> {
        if self.detections.len() > 2 {
            return None;
        }
        let mut slots = [RawDetection::missing(); 2];
        for (slot, &[x, y, size]) in slots.iter_mut().zip(&self.detections) {
            *slot = RawDetection::new(x, y, size);
        }
        Some(slots)
    }
}

/// Parse a JSON-lines recording. Blank lines and `#` comments are skipped.
pub fn read_recording(reader: impl BufRead) -> Result<Vec<SensorSample>, IrtrackIoError> {
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parse_err = |reason: String| IrtrackIoError::Parse {
            line: idx + 1,
            reason,
        };
        let sample: SensorSample =
            serde_json::from_str(trimmed).map_err(|e| parse_err(e.to_string()))?;
        if sample.slots().is_none() {
            return Err(parse_err(format!(
                "{} detections, a sensor reports at most 2",
                sample.detections.len()
            )));
        }
        samples.push(sample);
    }
    Ok(samples)
}

pub fn load_recording(path: impl AsRef<Path>) -> Result<Vec<SensorSample>, IrtrackIoError> {
    let file = fs::File::open(path)?;
    read_recording(BufReader::new(file))
}

//! Geometry of the two-sensor rig.
//!
//! Rig frame: the left sensor sits at the origin, the right sensor at
//! `(baseline, 0, 0)`. Both look roughly along +z and are turned inwards
//! about the vertical (y) axis, the left one by `mounting_angle` and the
//! right one by `2π - mounting_angle`. All output is in baseline units.

use std::f64::consts::TAU;

use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::{ensure_positive, ConfigError};
use crate::point::RawDetection;
use crate::ray::Ray;

/// Which of the two sensors a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Left,
    Right,
}

impl Sensor {
    pub fn other(self) -> Sensor {
        match self {
            Sensor::Left => Sensor::Right,
            Sensor::Right => Sensor::Left,
        }
    }
}

/// Pinhole optics of one blob sensor (1024x768 pixel space).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorOptics {
    /// Horizontal field of view, radians.
    pub h_fov: f64,
    /// Vertical field of view, radians.
    pub v_fov: f64,
    /// Center of projection, pixels.
    pub center_x: f64,
    pub center_y: f64,
}

impl Default for SensorOptics {
    fn default() -> Self {
        Self {
            h_fov: 0.761,
            v_fov: 0.5829,
            center_x: 512.0,
            center_y: 384.0,
        }
    }
}

impl SensorOptics {
    /// Direction of a pixel in the sensor's own frame (`z == 1`).
    pub fn local_direction(&self, x: f64, y: f64) -> Vector3<f64> {
        let angle_x = (x - self.center_x) / self.center_x * (self.h_fov / 2.0);
        let angle_y = (y - self.center_y) / self.center_y * (self.v_fov / 2.0);
        Vector3::new(angle_x.tan(), angle_y.tan(), 1.0)
    }

    /// Pixel position of a sensor-frame direction, if it points forwards.
    pub fn pixel_of(&self, dir: &Vector3<f64>) -> Option<(f64, f64)> {
        if dir.z <= 0.0 {
            return None;
        }
        let angle_x = (dir.x / dir.z).atan();
        let angle_y = (dir.y / dir.z).atan();
        Some((
            self.center_x + angle_x / (self.h_fov / 2.0) * self.center_x,
            self.center_y + angle_y / (self.v_fov / 2.0) * self.center_y,
        ))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("h_fov", self.h_fov)?;
        ensure_positive("v_fov", self.v_fov)?;
        ensure_positive("center_x", self.center_x)?;
        ensure_positive("center_y", self.center_y)?;
        Ok(())
    }
}

fn default_baseline() -> f64 {
    609.6
}

fn default_mounting_angle() -> f64 {
    22.5_f64.to_radians()
}

/// Static configuration of the sensor pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorRig {
    /// Distance between the sensors. Defines the output unit.
    #[serde(default = "default_baseline")]
    pub baseline: f64,
    /// Inward rotation of each sensor, radians.
    #[serde(default = "default_mounting_angle")]
    pub mounting_angle: f64,
    #[serde(default)]
    pub optics: SensorOptics,
}

impl Default for SensorRig {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            mounting_angle: default_mounting_angle(),
            optics: SensorOptics::default(),
        }
    }
}

impl SensorRig {
    pub fn new(baseline: f64, mounting_angle: f64) -> Result<Self, ConfigError> {
        let rig = Self {
            baseline,
            mounting_angle,
            optics: SensorOptics::default(),
        };
        rig.validate()?;
        Ok(rig)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("baseline", self.baseline)?;
        ensure_positive("mounting_angle", self.mounting_angle)?;
        self.optics.validate()
    }

    pub fn sensor_angle(&self, sensor: Sensor) -> f64 {
        match sensor {
            Sensor::Left => self.mounting_angle,
            Sensor::Right => TAU - self.mounting_angle,
        }
    }

    pub fn sensor_origin(&self, sensor: Sensor) -> Point3<f64> {
        match sensor {
            Sensor::Left => Point3::origin(),
            Sensor::Right => Point3::new(self.baseline, 0.0, 0.0),
        }
    }

    fn rotation(&self, sensor: Sensor) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.sensor_angle(sensor))
    }

    /// Ray in the rig frame along which `sensor` saw `detection`.
    pub fn ray(&self, sensor: Sensor, detection: &RawDetection) -> Ray {
        let local = self.optics.local_direction(detection.x, detection.y);
        let origin = self.sensor_origin(sensor);
        Ray::new(origin, origin + self.rotation(sensor) * local)
    }

    /// Where `sensor` would see a rig-frame point. `None` if the point is
    /// behind the sensor.
    pub fn project(&self, sensor: Sensor, point: &Point3<f64>) -> Option<RawDetection> {
        let world_dir = point - self.sensor_origin(sensor);
        let local = self.rotation(sensor).inverse_transform_vector(&world_dir);
        let (x, y) = self.optics.pixel_of(&local)?;
        Some(RawDetection::new(x, y, 0.0))
    }
}

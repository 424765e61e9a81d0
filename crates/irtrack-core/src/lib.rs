//! Core types for dual infrared-sensor tracking.
//!
//! Two blob sensors mounted a known baseline apart each report up to two 2D
//! detections per update. This crate holds the geometry shared by the rest
//! of the workspace: raw detections, tracked 3D points, rays and their
//! closest approach, the rig description, and the triangulator that turns a
//! matched left/right detection pair into a 3D point with a residual.
//!
//! It knows nothing about correspondence or gestures; see `irtrack-tracker`
//! and `irtrack-gestures`.

mod config;
mod logger;
mod point;
mod ray;
mod rig;
mod triangulate;
mod volume;

pub use config::{ensure_positive, ConfigError};
pub use point::{RawDetection, TrackedPoint, NO_DETECTION};
pub use ray::{closest_approach, ClosestApproach, Ray, RayAnomaly, RAY_EPSILON};
pub use rig::{Sensor, SensorOptics, SensorRig};
pub use triangulate::{Triangulation, Triangulator};
pub use volume::WorkingVolume;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_env, LOG_ENV};

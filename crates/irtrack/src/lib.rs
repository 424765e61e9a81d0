//! Dual infrared-sensor point tracking with gesture recognition.
//!
//! Two blob sensors mounted a known baseline apart each report up to two
//! detections per update. [`DualSensorTracker`] buffers both feeds, pairs
//! the detections, triangulates up to two 3D points and runs pinch/swipe
//! detection on the result.
//!
//! ## Quickstart
//!
//! ```
//! use irtrack::{DualSensorTracker, GestureEvent, RawDetection};
//!
//! let tracker = DualSensorTracker::default();
//! tracker.subscribe_gestures(|event: &GestureEvent| println!("{event:?}"));
//!
//! tracker.on_left([RawDetection::new(400.0, 390.0, 2.0), RawDetection::new(150.0, 500.0, 2.0)]);
//! let update = tracker.on_right([RawDetection::new(600.0, 390.0, 2.0), RawDetection::new(850.0, 460.0, 2.0)]);
//!
//! assert_eq!(update.frame.resolved_count(), 2);
//! ```
//!
//! ## API map
//! - `irtrack::core`: detections, points, rays, the sensor rig and triangulator.
//! - `irtrack::tracker`: per-frame stereo correspondence.
//! - `irtrack::gestures`: pinch and swipe detection.
//! - [`TrackerConfig`] / [`load_recording`]: JSON config and recorded frames.

pub use irtrack_core as core;
pub use irtrack_gestures as gestures;
pub use irtrack_tracker as tracker;

pub use irtrack_core::{RawDetection, Sensor, SensorRig, TrackedPoint, WorkingVolume};
pub use irtrack_gestures::{Axis, GestureEvent, GestureParams, GestureSubscriber};
pub use irtrack_tracker::{ResolvedFrame, ResolverParams};

mod dual_sensor;
mod io;

pub use dual_sensor::{DualSensorTracker, FrameListener, FrameUpdate, SubscriptionId};
pub use io::{load_recording, read_recording, IrtrackIoError, SensorSample, TrackerConfig};

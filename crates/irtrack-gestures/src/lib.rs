//! Pinch and swipe recognition over resolved point pairs.
//!
//! [`GestureDetector::detect`] looks at one [`irtrack_tracker::ResolvedFrame`]
//! at a time and keeps its own hysteresis in a [`GestureState`]:
//!
//! - **Pinch**: exactly two detections drop out while the two points were
//!   closer than the pinch threshold before the loss.
//! - **Unpinch**: all four detections are back after a pinch.
//! - **Swipe**: the tracked point moves more than the sensitivity along one
//!   axis for a run of consecutive frames in the same direction.
//!
//! The detector only reads the resolver's output, so it can be driven from
//! recorded frames as easily as from live sensors.

mod detector;
mod event;
mod params;

pub use detector::{GestureDetector, GestureState};
pub use event::{Axis, GestureEvent, GestureSubscriber};
pub use params::GestureParams;

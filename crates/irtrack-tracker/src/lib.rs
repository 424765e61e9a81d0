//! Stereo correspondence for a pair of two-blob infrared sensors.
//!
//! [`CorrespondenceResolver::resolve`] takes the four buffered detections
//! (two per sensor, any of which may be the "no blob" sentinel) together
//! with the [`TrackingState`] left by the previous frame, decides which
//! left detection goes with which right detection, triangulates the pairs
//! and returns a [`ResolvedFrame`].

mod frame;
mod params;
mod resolver;
mod state;

pub use frame::{ResolutionPath, ResolvedFrame, StereoFrame};
pub use params::ResolverParams;
pub use resolver::CorrespondenceResolver;
pub use state::{PairingChoice, TrackingState};

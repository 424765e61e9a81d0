use irtrack_core::TrackedPoint;
use serde::{Deserialize, Serialize};

use crate::params::ResolverParams;

/// Which right-sensor slot pairs with left slot 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingChoice {
    /// left 0 with right 0, left 1 with right 1.
    #[default]
    Direct,
    /// left 0 with right 1, left 1 with right 0.
    Crossed,
}

impl PairingChoice {
    pub fn flipped(self) -> Self {
        match self {
            PairingChoice::Direct => PairingChoice::Crossed,
            PairingChoice::Crossed => PairingChoice::Direct,
        }
    }

    /// Right-sensor slots ordered to line up with left slots 0 and 1.
    pub fn order<T: Copy>(self, right: [T; 2]) -> [T; 2] {
        match self {
            PairingChoice::Direct => right,
            PairingChoice::Crossed => [right[1], right[0]],
        }
    }

    /// `0` for direct, `1` for crossed.
    pub fn index(self) -> u8 {
        match self {
            PairingChoice::Direct => 0,
            PairingChoice::Crossed => 1,
        }
    }
}

/// Everything the resolver carries from one frame to the next.
///
/// There is exactly one of these per sensor pair, and only
/// [`CorrespondenceResolver::resolve`](crate::CorrespondenceResolver::resolve)
/// mutates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingState {
    /// Last point resolved in slot 0 (kept across frames where it is lost).
    pub last_left: Option<TrackedPoint>,
    /// Last point resolved in slot 1.
    pub last_right: Option<TrackedPoint>,
    pub last_pairing: PairingChoice,
    /// Distance between the two points on the latest frame that had both.
    pub last_distance: f64,
    /// The value `last_distance` held before that.
    ///
    /// Neither distance moves while a point is missing, so after a loss this
    /// still describes the points just before they merged.
    pub prior_distance: f64,
    /// Set whenever a frame had fewer than four detections; cleared only by
    /// a frame resolved through residual comparison.
    pub could_be_ambiguous: bool,
}

impl TrackingState {
    pub fn new(params: &ResolverParams) -> Self {
        Self {
            last_left: None,
            last_right: None,
            last_pairing: PairingChoice::Direct,
            last_distance: params.initial_distance,
            prior_distance: params.initial_distance,
            could_be_ambiguous: true,
        }
    }
}

impl Default for TrackingState {
    fn default() -> Self {
        Self::new(&ResolverParams::default())
    }
}

//! Per-frame stereo correspondence.
//!
//! Each sensor reports up to two blobs with no identity, so with two blobs
//! in view there are two ways to pair them up. The resolver picks one,
//! triangulates both pairs and updates [`TrackingState`].
//!
//! With all four detections present and the blobs off the sensors' shared
//! horizontal plane, the wrong pairing produces rays that miss each other
//! by a wide margin and the residual decides reliably. On the shared plane
//! the residuals are useless and an ordinal rule (left-most matches
//! left-most) is used instead; that rule inverts near the axis between the
//! sensors, which a stability check against the previous frame partly
//! compensates. With detections missing, the previous pairing is reused.
//! None of this is guaranteed correct near the sensor axis or when several
//! detections drop out at once.

use irtrack_core::{RawDetection, TrackedPoint, Triangulator};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::frame::{ResolutionPath, ResolvedFrame, StereoFrame};
use crate::params::ResolverParams;
use crate::state::{PairingChoice, TrackingState};

/// Decides which detections pair up and triangulates them.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrespondenceResolver {
    triangulator: Triangulator,
    params: ResolverParams,
}

/// Intermediate result before post-processing.
struct Assignment {
    points: [Option<TrackedPoint>; 2],
    missing: u8,
    pairing: PairingChoice,
    path: ResolutionPath,
}

impl CorrespondenceResolver {
    pub fn new(triangulator: Triangulator, params: ResolverParams) -> Self {
        Self {
            triangulator,
            params,
        }
    }

    #[inline]
    pub fn triangulator(&self) -> &Triangulator {
        &self.triangulator
    }

    #[inline]
    pub fn params(&self) -> &ResolverParams {
        &self.params
    }

    /// A fresh tracking state using this resolver's start-up distances.
    pub fn initial_state(&self) -> TrackingState {
        TrackingState::new(&self.params)
    }

    /// Resolve one frame, updating `state` for the next one.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, state), fields(complete = frame.is_complete()))
    )]
    pub fn resolve(&self, frame: &StereoFrame, state: &mut TrackingState) -> ResolvedFrame {
        let mut anomalies = 0u32;
        let mut tri = |l: &RawDetection, r: &RawDetection| {
            let t = self.triangulator.triangulate(l, r);
            if t.is_degenerate() {
                anomalies += 1;
            }
            t.point
        };

        let assignment = if frame.is_complete() {
            self.resolve_complete(frame, state, &mut tri)
        } else {
            resolve_partial(frame, state, &mut tri)
        };

        let Assignment {
            points,
            missing,
            pairing,
            path,
        } = assignment;

        if let Some(p) = points[0] {
            state.last_left = Some(p);
        }
        if let Some(p) = points[1] {
            state.last_right = Some(p);
        }
        if let [Some(a), Some(b)] = points {
            state.prior_distance = state.last_distance;
            state.last_distance = a.distance(&b);
        }

        log::debug!(
            "resolved frame: path={path:?} pairing={pairing:?} missing={missing} points={}",
            points.iter().flatten().count()
        );

        ResolvedFrame {
            left: points[0],
            right: points[1],
            missing_detections: missing,
            pairing,
            path,
            anomalies,
            last_distance: state.last_distance,
            prior_distance: state.prior_distance,
        }
    }

    fn resolve_complete(
        &self,
        frame: &StereoFrame,
        state: &mut TrackingState,
        tri: &mut impl FnMut(&RawDetection, &RawDetection) -> TrackedPoint,
    ) -> Assignment {
        let [l0, l1] = frame.left;
        let [r0, r1] = frame.right;

        let mut pair = |choice: PairingChoice| {
            let [ra, rb] = choice.order([r0, r1]);
            [tri(&l0, &ra), tri(&l1, &rb)]
        };

        let on_shared_plane = (l0.y - l1.y).abs() < self.params.shared_plane_tolerance_px;

        let (pairing, points, path) = if on_shared_plane {
            let ordinal = if (l0.x < l1.x) == (r0.x < r1.x) {
                PairingChoice::Direct
            } else {
                PairingChoice::Crossed
            };
            let points = pair(ordinal);

            if self.needs_flip(state, &points) {
                let flipped = ordinal.flipped();
                (flipped, pair(flipped), ResolutionPath::SharedPlane { flipped: true })
            } else {
                (ordinal, points, ResolutionPath::SharedPlane { flipped: false })
            }
        } else {
            let direct = pair(PairingChoice::Direct);
            let crossed = pair(PairingChoice::Crossed);

            // Decided on left slot 0 alone; ties go to the crossed pairing.
            state.could_be_ambiguous = false;
            if direct[0].error < crossed[0].error {
                (PairingChoice::Direct, direct, ResolutionPath::Residual)
            } else {
                (PairingChoice::Crossed, crossed, ResolutionPath::Residual)
            }
        };

        state.last_pairing = pairing;
        Assignment {
            points: points.map(Some),
            missing: 0,
            pairing,
            path,
        }
    }

    /// Stability check for the shared-plane rule.
    ///
    /// Compares slot 0 against the previous slot-0 point if that one is
    /// usable, otherwise slot 1 against the previous slot-1 point. Nothing
    /// is compared while the state is flagged ambiguous.
    fn needs_flip(&self, state: &TrackingState, points: &[TrackedPoint; 2]) -> bool {
        // No flip at all while ambiguous, even with a usable previous point.
        let usable = |p: &Option<TrackedPoint>| {
            (!state.could_be_ambiguous)
                .then_some(*p)
                .flatten()
                .filter(TrackedPoint::has_depth)
        };

        let reference = usable(&state.last_left)
            .map(|prev| (prev, points[0]))
            .or_else(|| usable(&state.last_right).map(|prev| (prev, points[1])));

        reference.is_some_and(|(prev, now)| now.deviates_from(&prev, self.params.stability_tolerance))
    }
}

fn resolve_partial(
    frame: &StereoFrame,
    state: &mut TrackingState,
    tri: &mut impl FnMut(&RawDetection, &RawDetection) -> TrackedPoint,
) -> Assignment {
    state.could_be_ambiguous = true;

    let pairing = state.last_pairing;
    let left = frame.left;
    let right = pairing.order(frame.right);

    let mut missing = 0u8;
    let mut points = [None, None];
    for slot in 0..2 {
        let (l, r) = (left[slot], right[slot]);
        missing += u8::from(l.is_missing()) + u8::from(r.is_missing());
        if !l.is_missing() && !r.is_missing() {
            points[slot] = Some(tri(&l, &r));
        }
    }

    // Two detections gone and nothing paired: the survivors are most likely
    // one blob per sensor, so pair them with each other.
    let mut greedy = false;
    if missing == 2 && points == [None, None] {
        let first_left = (0..2).find(|&slot| !left[slot].is_missing());
        let first_right = right.iter().find(|d| !d.is_missing());
        if let (Some(slot), Some(r)) = (first_left, first_right) {
            points[slot] = Some(tri(&left[slot], r));
            greedy = true;
        }
    }

    Assignment {
        points,
        missing,
        pairing,
        path: ResolutionPath::Partial { greedy },
    }
}

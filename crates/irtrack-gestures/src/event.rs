use irtrack_core::TrackedPoint;
use serde::{Deserialize, Serialize};

/// Rig-frame axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// A discrete gesture recognised from the point stream.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Two points merged into one.
    Pinch { location: TrackedPoint },
    /// A pinched point separated into two again.
    Unpinch { location: TrackedPoint },
    /// Sustained movement along one axis. `direction` is `+1` for movement
    /// towards lower values on that axis and `-1` towards higher ones.
    Swipe {
        axis: Axis,
        direction: i8,
        origin: TrackedPoint,
    },
}

/// Receives gesture events, synchronously and in order.
///
/// Called from inside the tracker's update, so implementations must not
/// block.
pub trait GestureSubscriber {
    fn on_gesture(&mut self, event: &GestureEvent);
}

impl<F> GestureSubscriber for F
where
    F: FnMut(&GestureEvent),
{
    fn on_gesture(&mut self, event: &GestureEvent) {
        self(event)
    }
}

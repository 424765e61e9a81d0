//! The live tracker: sensor buffers, the locked update cycle and dispatch.

use std::sync::{Mutex, MutexGuard, PoisonError};

use irtrack_core::{RawDetection, Sensor, TrackedPoint};
use irtrack_gestures::{GestureDetector, GestureEvent, GestureState, GestureSubscriber};
use irtrack_tracker::{CorrespondenceResolver, ResolvedFrame, StereoFrame, TrackingState};
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Handle returned when registering a subscriber or listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Everything one sensor update produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameUpdate {
    /// Sensor whose feed triggered the recompute.
    pub sensor: Sensor,
    pub frame: ResolvedFrame,
    /// Gestures emitted on this update, already dispatched to subscribers.
    pub gestures: Vec<GestureEvent>,
}

/// Observer of every recomputed frame.
pub trait FrameListener {
    fn frame_updated(&mut self, update: &FrameUpdate);
}

impl<F> FrameListener for F
where
    F: FnMut(&FrameUpdate),
{
    fn frame_updated(&mut self, update: &FrameUpdate) {
        self(update)
    }
}

type BoxedSubscriber = Box<dyn GestureSubscriber + Send>;
type BoxedListener = Box<dyn FrameListener + Send>;

struct Inner {
    resolver: CorrespondenceResolver,
    detector: GestureDetector,
    tracking: TrackingState,
    gesture_state: GestureState,
    buffered: StereoFrame,
    gestures_enabled: bool,
    subscribers: Vec<(SubscriptionId, BoxedSubscriber)>,
    listeners: Vec<(SubscriptionId, BoxedListener)>,
    next_id: u64,
    latest: Option<ResolvedFrame>,
}

impl Inner {
    fn allocate_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Tracks up to two points seen by a left/right sensor pair.
///
/// Each sensor feed overwrites that sensor's buffered detections and
/// recomputes the frame from both buffers. The whole cycle (resolve,
/// detect gestures, dispatch) runs under one lock, so the tracker can be
/// shared between the two feed threads. Subscribers and listeners are
/// called on the feeding thread, in registration order, while the lock is
/// held: they must not call back into the tracker.
pub struct DualSensorTracker {
    inner: Mutex<Inner>,
}

impl Default for DualSensorTracker {
    fn default() -> Self {
        let resolver = CorrespondenceResolver::new(Default::default(), Default::default());
        Self::new(resolver, GestureDetector::default())
    }
}

impl DualSensorTracker {
    /// Tracker with gesture detection enabled.
    pub fn new(resolver: CorrespondenceResolver, detector: GestureDetector) -> Self {
        let tracking = resolver.initial_state();
        Self {
            inner: Mutex::new(Inner {
                resolver,
                detector,
                tracking,
                gesture_state: GestureState::new(),
                buffered: StereoFrame::default(),
                gestures_enabled: true,
                subscribers: Vec::new(),
                listeners: Vec::new(),
                next_id: 0,
                latest: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking subscriber poisons the lock; the state itself stays
        // consistent because dispatch runs after all updates.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace `sensor`'s buffered detections and recompute the frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, detections))
    )]
    pub fn on_detections(&self, sensor: Sensor, detections: [RawDetection; 2]) -> FrameUpdate {
        let mut guard = self.lock();
        let inner = &mut *guard;

        *inner.buffered.sensor_mut(sensor) = detections;
        let frame = inner.resolver.resolve(&inner.buffered, &mut inner.tracking);

        let gestures = if inner.gestures_enabled {
            inner.detector.detect(&frame, &mut inner.gesture_state)
        } else {
            Vec::new()
        };

        if frame.anomalies > 0 {
            log::debug!("{} degenerate triangulation(s) on {sensor:?} update", frame.anomalies);
        }

        inner.latest = Some(frame.clone());
        let update = FrameUpdate {
            sensor,
            frame,
            gestures,
        };

        for event in &update.gestures {
            for (_, subscriber) in inner.subscribers.iter_mut() {
                subscriber.on_gesture(event);
            }
        }
        for (_, listener) in inner.listeners.iter_mut() {
            listener.frame_updated(&update);
        }

        update
    }

    pub fn on_left(&self, detections: [RawDetection; 2]) -> FrameUpdate {
        self.on_detections(Sensor::Left, detections)
    }

    pub fn on_right(&self, detections: [RawDetection; 2]) -> FrameUpdate {
        self.on_detections(Sensor::Right, detections)
    }

    /// Register a gesture subscriber. Also turns gesture detection on.
    pub fn subscribe_gestures<S>(&self, subscriber: S) -> SubscriptionId
    where
        S: GestureSubscriber + Send + 'static,
    {
        let mut inner = self.lock();
        let id = inner.allocate_id();
        inner.subscribers.push((id, Box::new(subscriber)));
        inner.gestures_enabled = true;
        id
    }

    /// Register a listener called after every recomputed frame.
    pub fn add_frame_listener<L>(&self, listener: L) -> SubscriptionId
    where
        L: FrameListener + Send + 'static,
    {
        let mut inner = self.lock();
        let id = inner.allocate_id();
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a gesture subscriber or frame listener. Returns `false` if
    /// `id` was not registered.
    pub fn remove_listener(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.subscribers.len() + inner.listeners.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() + inner.listeners.len() < before
    }

    pub fn set_gestures_enabled(&self, enabled: bool) {
        self.lock().gestures_enabled = enabled;
    }

    pub fn gestures_enabled(&self) -> bool {
        self.lock().gestures_enabled
    }

    /// Currently buffered raw detection of `sensor`, or `None` for a slot
    /// other than 0 or 1.
    pub fn detection(&self, sensor: Sensor, slot: usize) -> Option<RawDetection> {
        self.lock().buffered.sensor(sensor).get(slot).copied()
    }

    pub fn left_detection(&self, slot: usize) -> Option<RawDetection> {
        self.detection(Sensor::Left, slot)
    }

    pub fn right_detection(&self, slot: usize) -> Option<RawDetection> {
        self.detection(Sensor::Right, slot)
    }

    /// The most recent resolved frame, if any update arrived yet.
    pub fn latest_frame(&self) -> Option<ResolvedFrame> {
        self.lock().latest.clone()
    }

    /// Average of the latest point pair; the origin before the first update.
    pub fn average(&self) -> TrackedPoint {
        self.lock()
            .latest
            .as_ref()
            .map_or_else(TrackedPoint::zero, ResolvedFrame::average)
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.lock().tracking.clone()
    }
}

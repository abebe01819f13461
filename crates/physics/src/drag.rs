//! Stick-on-ice drag tracking.

use glam::Vec3;
use tracing::debug;

/// Progress of the current stick's contact with the ice.
///
/// `accumulated_distance` and `max_speed` only mean something while `active`;
/// both restart from zero whenever a new contact begins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragTrackingState {
    /// When the stick last touched ice; `None` before the first contact.
    pub contact_time: Option<f32>,
    /// Whether the stick is currently being tracked on the ice.
    pub active: bool,
    /// Stick position at the previous tick.
    pub last_position: Vec3,
    /// Path length covered while on the ice.
    pub accumulated_distance: f32,
    /// Fastest stick speed seen during this contact.
    pub max_speed: f32,
}

impl DragTrackingState {
    /// Start a new tracking interval.
    pub fn begin(&mut self, now: f32, position: Vec3) {
        self.contact_time = Some(now);
        self.active = true;
        self.last_position = position;
        self.accumulated_distance = 0.0;
        self.max_speed = 0.0;
    }

    /// Fold one tick of stick motion into the interval.
    pub fn advance(&mut self, dt: f32, position: Vec3) {
        let distance = position.distance(self.last_position);
        self.accumulated_distance += distance;
        if dt > 0.0 {
            let speed = ((position - self.last_position) / dt).length();
            self.max_speed = self.max_speed.max(speed);
        }
        self.last_position = position;
    }

    /// Stop tracking; the contact time is kept for timing checks.
    pub fn end(&mut self, now: f32) {
        if self.active {
            debug!(
                drag_time = self.elapsed(now).unwrap_or_default(),
                distance = self.accumulated_distance,
                max_speed = self.max_speed,
                "stick left ice"
            );
        }
        self.active = false;
    }

    /// Clear progress after a slapshot consumed the wind-up.
    pub fn consume(&mut self) {
        self.active = false;
        self.accumulated_distance = 0.0;
        self.max_speed = 0.0;
    }

    /// Seconds since the last ice contact.
    pub fn elapsed(&self, now: f32) -> Option<f32> {
        self.contact_time.map(|t| now - t)
    }
}

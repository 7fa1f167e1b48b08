//! Attack events: transient tracers from an attacker to its target.
//!
//! Purely a rendering hint: nothing in the simulation reads them back.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackEvent {
    pub origin: Vec2,
    pub destination: Vec2,
    /// Travel fraction in [0, 1]
    pub progress: f32,
    /// Progress gained per second
    pub speed: f32,
    pub color: Color,
    pub active: bool,
}

impl AttackEvent {
    pub fn new(origin: Vec2, destination: Vec2, speed: f32, color: Color) -> Self {
        Self {
            origin,
            destination,
            progress: 0.0,
            speed,
            color,
            active: true,
        }
    }

    /// Advance by `dt` seconds. Returns whether the event is still live.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.progress = (self.progress + self.speed * dt).min(1.0);
        if self.progress >= 1.0 {
            self.active = false;
        }
        self.active
    }

    /// Current tracer head, linearly interpolated.
    pub fn position(&self) -> Vec2 {
        self.origin + (self.destination - self.origin) * self.progress
    }

    /// Fades linearly from 1 to 0 over the flight.
    pub fn alpha(&self) -> f32 {
        (1.0 - self.progress).clamp(0.0, 1.0)
    }
}

/// Advance every event and drop the finished ones.
pub fn advance_all(events: &mut Vec<AttackEvent>, dt: f32) {
    events.retain_mut(|e| e.advance(dt));
}

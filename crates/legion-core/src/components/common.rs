//! Common components shared by groups and units.

use legion_logic::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// World-space anchor of an entity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

/// Units per second
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity(pub Vec2);

impl Velocity {
    /// Settled entities have exactly zero velocity.
    pub fn is_settled(&self) -> bool {
        self.0.is_zero()
    }
}

/// Speed used when steering toward a [`MoveTarget`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MaxSpeed(pub f32);

/// Movement component - present only while a directed move is active
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MoveTarget(pub Vec2);

/// Insertion sequence number. Cross-entity scans sort by this so their
/// outcome follows world insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpawnOrder(pub u64);

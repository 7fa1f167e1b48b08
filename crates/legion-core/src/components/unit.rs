//! Unit components: the spawner entities that own groups.

use hecs::Entity;
use legion_logic::color::Color;
use legion_logic::faction::Owner;
use legion_logic::geometry::Vec2;
use serde::{Deserialize, Serialize};

use super::GroupKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Player,
    Enemy,
}

impl UnitKind {
    /// Kind of the groups this unit's spawner produces
    pub fn spawned_group_kind(&self) -> GroupKind {
        match self {
            UnitKind::Player => GroupKind::PlayerControlled,
            UnitKind::Enemy => GroupKind::Enemy,
        }
    }
}

/// A unit on the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub kind: UnitKind,
    pub owner: Owner,
    /// Where the unit was placed; patrols circle around it
    pub origin: Vec2,
    /// Aura group bound to this unit
    pub aura: Option<Entity>,
}

/// Periodic group spawner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Spawner {
    /// Seconds between spawns
    pub interval: f32,
    /// Seconds accumulated since the last spawn
    pub timer: f32,
    pub group_size: usize,
    pub color: Color,
}

impl Spawner {
    pub fn new(interval: f32, group_size: usize, color: Color) -> Self {
        Self {
            interval,
            timer: 0.0,
            group_size,
            color,
        }
    }

    /// Accumulate `dt`; returns true (and resets) when a spawn is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer = 0.0;
            true
        } else {
            false
        }
    }
}

/// Patrol state for AI-driven units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Patrol {
    pub range: f32,
    pub target: Option<Vec2>,
}

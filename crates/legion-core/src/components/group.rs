//! Pixel group components: Group, Members, HullCache, Selection, etc.

use hecs::Entity;
use legion_logic::color::Color;
use legion_logic::faction::{Owner, Team};
use legion_logic::geometry::{Bounds, Vec2};
use legion_logic::hull::HullGeometry;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Closed set of group variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    /// Spawned by the player's unit; can be selected and dragged
    PlayerControlled,
    /// Halo bound to a unit; follows it and stays out of fights
    Aura,
    /// Spawned by an enemy unit
    Enemy,
}

impl GroupKind {
    /// Can attack and be attacked
    pub fn is_combat_participant(&self) -> bool {
        matches!(self, GroupKind::PlayerControlled | GroupKind::Enemy)
    }

    /// Can be consumed by a merge
    pub fn is_mergeable(&self) -> bool {
        matches!(self, GroupKind::PlayerControlled | GroupKind::Enemy)
    }

    /// Reacts to hover / selection by default
    pub fn is_selectable(&self) -> bool {
        matches!(self, GroupKind::PlayerControlled | GroupKind::Aura)
    }
}

/// Identity and tuning of a pixel group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub kind: GroupKind,
    pub owner: Owner,
    /// Distance the hull is pushed outward for the boundary
    pub padding: f32,
    /// Maximum member count a merge may produce
    pub capacity: usize,
    pub color: Color,
}

impl Group {
    pub fn team(&self) -> Team {
        self.owner.team()
    }
}

/// A point-like sub-unit of a group. `pos` and `origin` are local to the
/// group anchor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub pos: Vec2,
    pub origin: Vec2,
    pub move_radius: f32,
    /// Distance covered per wander step
    pub step: f32,
    pub target: Option<Vec2>,
    pub color: Color,
}

impl Member {
    pub fn new(x: f32, y: f32, move_radius: f32, step: f32, color: Color) -> Self {
        Self {
            pos: Vec2::new(x, y),
            origin: Vec2::new(x, y),
            move_radius,
            step,
            target: None,
            color,
        }
    }

    /// Overwrite every field, as if freshly constructed
    pub fn reset(&mut self, x: f32, y: f32, move_radius: f32, step: f32, color: Color) {
        *self = Self::new(x, y, move_radius, step, color);
    }

    /// Random point within `move_radius` of the origin
    pub fn pick_target<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        let radius = rng.gen::<f32>() * self.move_radius;
        self.target = Some(self.origin + Vec2::from_angle(angle) * radius);
    }

    /// One seek step: pick a target if there is none, otherwise move toward
    /// it, clearing it once within `arrival`.
    pub fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R, arrival: f32) {
        let Some(target) = self.target else {
            self.pick_target(rng);
            return;
        };

        let diff = target - self.pos;
        let dist = diff.length();
        if dist > arrival {
            self.pos += diff * (self.step / dist);
        } else {
            self.target = None;
        }
    }
}

/// Members owned by a group. Order carries no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Members(pub Vec<Member>);

impl Members {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Member positions in world space
    pub fn world_points(&self, anchor: Vec2) -> Vec<Vec2> {
        self.0.iter().map(|m| anchor + m.pos).collect()
    }
}

/// Boundary derived from the current member positions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HullCache(pub HullGeometry);

impl HullCache {
    pub fn bounds(&self) -> Bounds {
        self.0.bounds
    }
}

/// One-shot leash: while present, straying past `radius` from `origin`
/// stops the group and removes the component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpawnConstraint {
    pub origin: Vec2,
    pub radius: f32,
}

/// Aura groups track the position of the unit they belong to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follows(pub Entity);

/// Pointer interaction state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    pub selectable: bool,
    pub hovered: bool,
    pub selected: bool,
}

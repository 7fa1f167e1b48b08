//! Owners, teams and hostility rules.
//!
//! A team is a pure function of the owner id. Neutral groups sit outside
//! combat entirely: they never attack and are never attacked.

use serde::{Deserialize, Serialize};

/// Opaque owner id carried by every group and unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Owner(pub u32);

impl Owner {
    pub const PLAYER: Owner = Owner(0);
    pub const ENEMY: Owner = Owner(1);

    pub fn team(&self) -> Team {
        match *self {
            Owner::PLAYER => Team::Green,
            Owner::ENEMY => Team::Red,
            _ => Team::Neutral,
        }
    }
}

/// Combat affiliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Green,
    Red,
    Neutral,
}

impl Team {
    pub fn is_neutral(&self) -> bool {
        matches!(self, Team::Neutral)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Team::Green => "green",
            Team::Red => "red",
            Team::Neutral => "neutral",
        }
    }
}

/// Two teams fight iff neither is neutral and they differ.
#[inline]
pub fn are_hostile(a: Team, b: Team) -> bool {
    !a.is_neutral() && !b.is_neutral() && a != b
}

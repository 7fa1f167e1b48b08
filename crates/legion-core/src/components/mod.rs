//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no cross-entity behavior - that lives in systems.

mod combat;
mod common;
mod group;
mod unit;

pub use combat::*;
pub use common::*;
pub use group::*;
pub use unit::*;

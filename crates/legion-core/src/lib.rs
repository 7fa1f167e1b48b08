//! Legion Core - Pixel Group Simulation Engine
//!
//! An ECS-based simulation of swarming pixel groups that wander, merge and
//! fight, each wrapped in a padded convex-hull boundary.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Groups (player, aura, enemy) and the units that spawn them
//! - **Components**: Pure data attached to entities (Group, Members, HullCache, etc.)
//! - **Systems**: Logic that queries and updates components
//! - **Context**: The member pool, seeded RNG and clock shared by all systems
//!
//! # Example
//!
//! ```rust,no_run
//! use legion_core::prelude::*;
//! use legion_logic::faction::Owner;
//! use legion_logic::geometry::Vec2;
//!
//! let mut engine = SimulationEngine::new(42);
//! engine.spawn_unit(UnitKind::Player, Owner::PLAYER, Vec2::new(100.0, 100.0));
//! engine.spawn_unit(UnitKind::Enemy, Owner::ENEMY, Vec2::new(400.0, 100.0));
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod context;
pub mod engine;
pub mod generation;
pub mod pool;
pub mod render;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::context::SimContext;
    pub use crate::engine::{SimulationEngine, TickReport};
    pub use crate::generation::{GroupSpawn, MemberSeed};
    pub use crate::render::{RenderFrame, Renderer};
    pub use crate::systems::{MergeRefusal, PointerButton};
}

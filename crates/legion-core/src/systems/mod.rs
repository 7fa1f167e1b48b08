//! Systems - logic that operates on components

mod combat;
mod hull;
mod merge;
mod movement;
mod projectiles;
mod selection;
mod units;
mod wandering;

pub use combat::*;
pub use hull::*;
pub use merge::*;
pub use movement::*;
pub use projectiles::*;
pub use selection::*;
pub use units::*;
pub use wandering::*;

//! Generation - construction of groups and units.

mod groups;
mod units;

pub use groups::*;
pub use units::*;

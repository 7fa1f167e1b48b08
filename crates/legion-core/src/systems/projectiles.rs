//! Projectile system - advance attack tracers and drop finished ones.

use legion_logic::projectile::advance_all;

use crate::context::SimContext;

pub fn projectile_system(ctx: &mut SimContext, delta_seconds: f32) {
    advance_all(&mut ctx.tracers, delta_seconds);
}

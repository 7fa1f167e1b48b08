//! Wandering system - idle swarm jitter of members around their origins.

use hecs::World;

use crate::components::Members;
use crate::context::SimContext;
use crate::generation::groups_in_spawn_order;

/// Advance every member's seek loop. Runs only on every
/// `wander_interval_ticks`-th tick; returns whether it ran.
pub fn wandering_system(world: &mut World, ctx: &mut SimContext) -> bool {
    let interval = u64::from(ctx.config.groups.wander_interval_ticks.max(1));
    if ctx.tick % interval != 0 {
        return false;
    }

    let arrival = ctx.config.groups.wander_arrival;
    // Spawn order keeps the random stream consumption reproducible
    for entity in groups_in_spawn_order(world) {
        if let Ok(mut members) = world.get::<&mut Members>(entity) {
            for member in members.0.iter_mut() {
                member.wander(&mut ctx.rng, arrival);
            }
        }
    }
    true
}

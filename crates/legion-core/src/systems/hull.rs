//! Hull system - recompute every group's boundary from its members.

use hecs::World;
use legion_logic::hull::HullGeometry;

use crate::components::{Group, HullCache, Members, Position};

pub fn hull_system(world: &mut World) {
    for (_, (group, members, pos, cache)) in world.query_mut::<(&Group, &Members, &Position, &mut HullCache)>() {
        let points = members.world_points(pos.0);
        cache.0 = HullGeometry::compute(&points, group.padding, pos.0);
    }
}

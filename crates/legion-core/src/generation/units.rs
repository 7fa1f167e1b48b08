//! Unit construction. A unit is a spawner with an aura group bound to it.

use hecs::{Entity, World};
use legion_logic::color::Color;
use legion_logic::faction::Owner;
use legion_logic::geometry::Vec2;

use super::groups::{spawn_group, GroupSpawn};
use crate::components::*;
use crate::context::SimContext;

/// Spawn a unit together with its aura group.
///
/// Player units spawn groups every `player_spawn_interval` seconds; enemy
/// units spawn them every `enemy_spawn_interval` seconds and patrol around
/// their origin. Group colors come from the unit config.
pub fn spawn_unit(world: &mut World, ctx: &mut SimContext, kind: UnitKind, owner: Owner, position: Vec2) -> Entity {
    let units = &ctx.config.units;
    let group_size = ctx.config.groups.default_member_count;
    let aura_size = ctx.config.groups.aura_member_count;
    let (spawner, patrol) = match kind {
        UnitKind::Player => (
            Spawner::new(units.player_spawn_interval, group_size, units.player_color()),
            None,
        ),
        UnitKind::Enemy => (
            Spawner::new(units.enemy_spawn_interval, group_size, units.enemy_color()),
            Some(Patrol {
                range: units.patrol_range,
                target: None,
            }),
        ),
    };
    let max_speed = units.unit_max_speed;
    let order = ctx.next_spawn_order();

    let unit = world.spawn((
        Unit {
            kind,
            owner,
            origin: position,
            aura: None,
        },
        Position(position),
        Velocity(Vec2::ZERO),
        MaxSpeed(max_speed),
        spawner,
        order,
    ));
    if let Some(patrol) = patrol {
        let _ = world.insert_one(unit, patrol);
    }

    let aura = spawn_group(
        world,
        ctx,
        GroupSpawn::new(GroupKind::Aura, owner, position)
            .with_members(aura_size)
            .with_color(Color::for_team(owner.team()))
            .following(unit)
            .selectable(kind == UnitKind::Player),
    );
    if let Ok(mut u) = world.get::<&mut Unit>(unit) {
        u.aura = aura;
    }

    log::debug!("spawned {:?} unit {:?} for owner {} at ({:.1}, {:.1})", kind, unit, owner.0, position.x, position.y);
    unit
}

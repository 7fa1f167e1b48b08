//! Unit systems - periodic group spawning and the enemy chase/patrol AI.

use hecs::{Entity, World};
use legion_logic::color::Color;
use legion_logic::faction::Owner;
use legion_logic::geometry::Vec2;
use rand::Rng;

use crate::components::*;
use crate::context::SimContext;
use crate::generation::{spawn_group, GroupSpawn};

/// Tick every spawner; due spawners emit a group at the unit's position
/// with a random diagonal kick and an active spawn constraint. Returns the
/// new groups.
pub fn spawner_system(world: &mut World, ctx: &mut SimContext, delta_seconds: f32) -> Vec<Entity> {
    let mut due: Vec<(SpawnOrder, UnitKind, Owner, Vec2, usize, Color)> = Vec::new();

    for (_, (unit, pos, spawner, order)) in world.query_mut::<(&Unit, &Position, &mut Spawner, &SpawnOrder)>() {
        if spawner.tick(delta_seconds) {
            due.push((*order, unit.kind, unit.owner, pos.0, spawner.group_size, spawner.color));
        }
    }
    due.sort_by_key(|d| d.0);

    let kick = ctx.config.units.spawn_kick;
    let mut spawned = Vec::with_capacity(due.len());
    for (_, kind, owner, position, size, color) in due {
        let vx = if ctx.rng.gen::<bool>() { kick } else { -kick };
        let vy = if ctx.rng.gen::<bool>() { kick } else { -kick };
        let spawn = GroupSpawn::new(kind.spawned_group_kind(), owner, position)
            .with_members(size)
            .with_color(color)
            .with_velocity(Vec2::new(vx, vy))
            .constrained();
        if let Some(group) = spawn_group(world, ctx, spawn) {
            spawned.push(group);
        }
    }
    spawned
}

/// Enemy units chase the nearest player unit inside the chase radius and
/// otherwise patrol random points around their origin.
pub fn enemy_ai_system(world: &mut World, ctx: &mut SimContext) {
    let chase_radius = ctx.config.units.chase_radius;
    let arrival = ctx.config.groups.arrival_threshold;

    let players: Vec<Vec2> = world
        .query::<(&Unit, &Position)>()
        .iter()
        .filter(|(_, (unit, _))| unit.kind == UnitKind::Player)
        .map(|(_, (_, pos))| pos.0)
        .collect();

    let mut enemies: Vec<(SpawnOrder, Entity)> = world
        .query::<(&Unit, &Patrol, &SpawnOrder)>()
        .iter()
        .filter(|(_, (unit, _, _))| unit.kind == UnitKind::Enemy)
        .map(|(entity, (_, _, order))| (*order, entity))
        .collect();
    enemies.sort_by_key(|(order, _)| *order);

    for (_, entity) in enemies {
        let Ok(mut query) = world.query_one::<(&Unit, &Position, &mut Patrol)>(entity) else {
            continue;
        };
        let Some((unit, pos, patrol)) = query.get() else {
            continue;
        };

        let chase = players
            .iter()
            .map(|p| (p.distance(&pos.0), *p))
            .filter(|(d, _)| *d <= chase_radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p);

        let move_target = match chase {
            Some(target) => Some(target),
            None => {
                let target = match patrol.target {
                    Some(t) => t,
                    None => {
                        let dx = (ctx.rng.gen::<f32>() * 2.0 - 1.0) * patrol.range;
                        let dy = (ctx.rng.gen::<f32>() * 2.0 - 1.0) * patrol.range;
                        let t = unit.origin + Vec2::new(dx, dy);
                        patrol.target = Some(t);
                        t
                    }
                };
                if pos.0.distance(&target) < arrival {
                    patrol.target = None;
                    None
                } else {
                    Some(target)
                }
            }
        };
        drop(query);

        match move_target {
            Some(target) => {
                let _ = world.insert_one(entity, MoveTarget(target));
            }
            None => {
                let _ = world.remove_one::<MoveTarget>(entity);
            }
        }
    }
}

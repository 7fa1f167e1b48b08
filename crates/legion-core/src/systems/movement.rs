//! Movement system - aura following, directed seek, integration and the
//! one-shot spawn constraint.

use hecs::{Entity, World};
use legion_logic::geometry::Vec2;

use crate::components::{Follows, MaxSpeed, MoveTarget, Position, SpawnConstraint, Velocity};
use crate::context::SimContext;
use crate::generation::despawn_group;

/// Run every movement stage in order. Auras snap to their unit after it
/// has moved, so the halo never lags a tick behind.
pub fn movement_system(world: &mut World, ctx: &mut SimContext, delta_seconds: f32) {
    steering_system(world, ctx.config.groups.arrival_threshold, delta_seconds);
    integrate_system(world, delta_seconds);
    follow_system(world, ctx);
    constraint_system(world);
}

/// Aura groups sit on their unit's position with zero velocity. Auras whose
/// unit is gone are removed.
pub fn follow_system(world: &mut World, ctx: &mut SimContext) {
    let mut updates: Vec<(Entity, Option<Vec2>)> = Vec::new();

    for (entity, follows) in world.query::<&Follows>().iter() {
        let target = world.get::<&Position>(follows.0).ok().map(|p| p.0);
        updates.push((entity, target));
    }

    for (entity, target) in updates {
        match target {
            Some(pos) => {
                if let Ok((p, v)) = world.query_one_mut::<(&mut Position, &mut Velocity)>(entity) {
                    p.0 = pos;
                    v.0 = Vec2::ZERO;
                }
            }
            None => {
                log::debug!("aura {:?} lost its unit", entity);
                despawn_group(world, ctx, entity);
            }
        }
    }
}

/// Set velocity toward each active [`MoveTarget`]; on arrival stop and
/// drop the target.
pub fn steering_system(world: &mut World, arrival_threshold: f32, delta_seconds: f32) {
    let mut arrived: Vec<Entity> = Vec::new();

    for (entity, (pos, vel, max_speed, target)) in
        world.query_mut::<(&Position, &mut Velocity, &MaxSpeed, &MoveTarget)>()
    {
        let diff = target.0 - pos.0;
        let distance = diff.length();
        if distance < arrival_threshold {
            vel.0 = Vec2::ZERO;
            arrived.push(entity);
            continue;
        }

        // Never step past the target in a single tick
        let mut speed = max_speed.0;
        if delta_seconds > 0.0 {
            speed = speed.min(distance / delta_seconds);
        }
        vel.0 = diff.normalize() * speed;
    }

    for entity in arrived {
        let _ = world.remove_one::<MoveTarget>(entity);
    }
}

pub fn integrate_system(world: &mut World, delta_seconds: f32) {
    for (_, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        pos.0 += vel.0 * delta_seconds;
    }
}

/// Stop groups that strayed past their spawn radius; the constraint is
/// removed the first time it triggers.
pub fn constraint_system(world: &mut World) {
    let mut tripped: Vec<Entity> = Vec::new();

    for (entity, (pos, vel, constraint)) in world.query_mut::<(&Position, &mut Velocity, &SpawnConstraint)>() {
        if pos.0.distance(&constraint.origin) > constraint.radius {
            vel.0 = Vec2::ZERO;
            tripped.push(entity);
        }
    }

    for entity in tripped {
        let _ = world.remove_one::<SpawnConstraint>(entity);
    }
}

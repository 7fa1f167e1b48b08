//! Combat system - proximity targeting and cooldown-gated attrition.
//!
//! Every tick each combat participant rebuilds its target list from a
//! snapshot of all groups, then attackers resolve in spawn order. A target
//! destroyed earlier in the pass is skipped by later attackers.

use hecs::{Entity, World};
use legion_logic::color::Color;
use legion_logic::faction::{are_hostile, Team};
use legion_logic::geometry::Vec2;
use legion_logic::projectile::AttackEvent;

use crate::components::*;
use crate::context::SimContext;
use crate::generation::{despawn_group, groups_in_spawn_order};

/// Outcome of one combat pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatReport {
    /// Individual attacks landed (one per attacker/target pair)
    pub attacks: usize,
    /// Groups removed because their last member was destroyed
    pub destroyed: Vec<Entity>,
}

struct Combatant {
    entity: Entity,
    team: Team,
    position: Vec2,
    participant: bool,
}

/// Rebuild every group's target list and engagement flag.
pub fn targeting_system(world: &mut World, attack_range: f32) -> Vec<Entity> {
    let order = groups_in_spawn_order(world);
    let snapshot: Vec<Combatant> = order
        .iter()
        .filter_map(|&entity| {
            let mut query = world.query_one::<(&Group, &Position)>(entity).ok()?;
            let (group, pos) = query.get()?;
            Some(Combatant {
                entity,
                team: group.team(),
                position: pos.0,
                participant: group.kind.is_combat_participant(),
            })
        })
        .collect();

    for me in &snapshot {
        let targets: Vec<Entity> = if me.participant {
            snapshot
                .iter()
                .filter(|other| {
                    other.entity != me.entity
                        && other.participant
                        && are_hostile(me.team, other.team)
                        && me.position.distance(&other.position) <= attack_range
                })
                .map(|other| other.entity)
                .collect()
        } else {
            Vec::new()
        };

        if let Ok(mut state) = world.get::<&mut CombatState>(me.entity) {
            state.in_combat = !targets.is_empty();
            state.targets = targets;
        }
    }

    order
}

/// Full combat pass: targeting, then attack resolution.
pub fn combat_system(world: &mut World, ctx: &mut SimContext) -> CombatReport {
    let range = ctx.config.combat.attack_range;
    let damage = ctx.config.combat.damage as usize;
    let cooldown = ctx.config.combat.cooldown_secs;
    let speed = ctx.config.combat.projectile_speed;
    let now = ctx.sim_time;

    let order = targeting_system(world, range);
    let mut report = CombatReport::default();

    for attacker in order {
        // Attacker may have been destroyed earlier in this pass
        let Some((origin, color, targets)) = ready_attacker(world, attacker, now, cooldown) else {
            continue;
        };

        let mut hit = false;
        for target in targets {
            let Ok(target_pos) = world.get::<&Position>(target).map(|p| p.0) else {
                continue;
            };

            let remaining = match world.get::<&mut Members>(target) {
                Ok(mut members) => {
                    let keep = members.len().saturating_sub(damage);
                    let removed: Vec<Member> = members.0.drain(keep..).collect();
                    ctx.pool.release_all(removed);
                    members.len()
                }
                Err(_) => continue,
            };

            ctx.tracers.push(AttackEvent::new(origin, target_pos, speed, color));
            hit = true;
            report.attacks += 1;

            if remaining == 0 {
                despawn_group(world, ctx, target);
                log::info!("group {:?} destroyed by {:?}", target, attacker);
                report.destroyed.push(target);
            }
        }

        if !hit {
            continue;
        }
        if let Ok(mut state) = world.get::<&mut CombatState>(attacker) {
            state.last_attack_at = Some(now);
        }
    }

    report
}

/// Anchor, color and targets of an attacker whose cooldown has elapsed
fn ready_attacker(world: &World, attacker: Entity, now: f64, cooldown: f64) -> Option<(Vec2, Color, Vec<Entity>)> {
    let mut query = world
        .query_one::<(&Group, &Position, &CombatState)>(attacker)
        .ok()?;
    let (group, pos, state) = query.get()?;
    if state.targets.is_empty() || !state.ready(now, cooldown) {
        return None;
    }
    Some((pos.0, group.color, state.targets.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{spawn_group, GroupSpawn};
    use legion_logic::config::SimConfig;
    use legion_logic::faction::Owner;

    fn group(world: &mut World, ctx: &mut SimContext, kind: GroupKind, owner: Owner, pos: Vec2, n: usize) -> Entity {
        spawn_group(world, ctx, GroupSpawn::new(kind, owner, pos).with_members(n)).unwrap()
    }

    #[test]
    fn test_targets_rebuilt_each_tick() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let p = group(&mut world, &mut ctx, GroupKind::PlayerControlled, Owner::PLAYER, Vec2::ZERO, 3);
        let e = group(&mut world, &mut ctx, GroupKind::Enemy, Owner::ENEMY, Vec2::new(100.0, 0.0), 3);
        let friend = group(&mut world, &mut ctx, GroupKind::PlayerControlled, Owner::PLAYER, Vec2::new(10.0, 0.0), 3);

        targeting_system(&mut world, 150.0);
        assert_eq!(world.get::<&CombatState>(p).unwrap().targets, vec![e]);
        assert_eq!(world.get::<&CombatState>(e).unwrap().targets, vec![p, friend]);
        assert!(world.get::<&CombatState>(p).unwrap().in_combat);

        world.get::<&mut Position>(e).unwrap().0 = Vec2::new(500.0, 0.0);
        targeting_system(&mut world, 150.0);
        assert!(world.get::<&CombatState>(p).unwrap().targets.is_empty());
        assert!(!world.get::<&CombatState>(p).unwrap().in_combat);
    }

    #[test]
    fn test_auras_and_neutrals_stay_out() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let aura = group(&mut world, &mut ctx, GroupKind::Aura, Owner::PLAYER, Vec2::ZERO, 3);
        let neutral = group(&mut world, &mut ctx, GroupKind::Enemy, Owner(7), Vec2::new(5.0, 0.0), 3);
        let enemy = group(&mut world, &mut ctx, GroupKind::Enemy, Owner::ENEMY, Vec2::new(10.0, 0.0), 3);

        targeting_system(&mut world, 150.0);
        assert!(world.get::<&CombatState>(aura).unwrap().targets.is_empty());
        assert!(world.get::<&CombatState>(neutral).unwrap().targets.is_empty());
        assert!(world.get::<&CombatState>(enemy).unwrap().targets.is_empty());
    }

    #[test]
    fn test_cooldown_gates_attacks() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let p = group(&mut world, &mut ctx, GroupKind::PlayerControlled, Owner::PLAYER, Vec2::ZERO, 10);
        let e = group(&mut world, &mut ctx, GroupKind::Enemy, Owner::ENEMY, Vec2::new(50.0, 0.0), 10);

        ctx.sim_time = 0.0;
        let report = combat_system(&mut world, &mut ctx);
        assert_eq!(report.attacks, 2);
        assert_eq!(world.get::<&Members>(e).unwrap().len(), 9);
        assert_eq!(world.get::<&Members>(p).unwrap().len(), 9);

        ctx.sim_time = 0.5;
        assert_eq!(combat_system(&mut world, &mut ctx).attacks, 0);

        ctx.sim_time = 1.0;
        assert_eq!(combat_system(&mut world, &mut ctx).attacks, 2);
        assert_eq!(world.get::<&Members>(e).unwrap().len(), 8);
        assert_eq!(ctx.pool.len(), 4);
    }

    #[test]
    fn test_attack_event_points_at_target() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let p = group(&mut world, &mut ctx, GroupKind::PlayerControlled, Owner::PLAYER, Vec2::ZERO, 1);
        let e = group(&mut world, &mut ctx, GroupKind::Enemy, Owner::ENEMY, Vec2::new(30.0, 40.0), 5);

        let report = combat_system(&mut world, &mut ctx);
        // The player group fires first, then dies to the return fire
        assert_eq!(report.destroyed, vec![p]);
        assert_eq!(world.get::<&CombatState>(e).unwrap().last_attack_at, Some(0.0));
        assert_eq!(world.get::<&Members>(e).unwrap().len(), 4);

        // Both tracers survive, including the one fired by the dead group
        assert_eq!(ctx.tracers.len(), 2);
        assert_eq!(ctx.tracers[0].origin, Vec2::ZERO);
        assert_eq!(ctx.tracers[0].destination, Vec2::new(30.0, 40.0));
        assert_eq!(ctx.tracers[1].origin, Vec2::new(30.0, 40.0));
        assert_eq!(ctx.tracers[1].destination, Vec2::ZERO);
        assert!(ctx.tracers.iter().all(|t| t.active && t.progress == 0.0));
    }

    #[test]
    fn test_destroyed_target_skipped_by_later_attackers() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let a = group(&mut world, &mut ctx, GroupKind::PlayerControlled, Owner::PLAYER, Vec2::ZERO, 5);
        let b = group(&mut world, &mut ctx, GroupKind::PlayerControlled, Owner::PLAYER, Vec2::new(0.0, 10.0), 5);
        let target = group(&mut world, &mut ctx, GroupKind::Enemy, Owner::ENEMY, Vec2::new(20.0, 0.0), 1);

        let report = combat_system(&mut world, &mut ctx);
        assert_eq!(report.destroyed, vec![target]);
        // a kills the target; b finds it gone; the target never fires
        assert_eq!(report.attacks, 1);
        assert!(!world.contains(target));
        assert_eq!(world.get::<&Members>(a).unwrap().len(), 5);
        assert_eq!(world.get::<&Members>(b).unwrap().len(), 5);
        assert!(world.get::<&CombatState>(b).unwrap().last_attack_at.is_none());
    }
}

//! Merge protocol - settled, nearby groups of the same owner combine into
//! one group anchored at the centroid of all their members.
//!
//! The scan runs over a snapshot sorted by spawn order, so which pair wins
//! when several could merge depends on that order. Plans are applied only
//! after the scan, and each group takes part in at most one merge per tick.

use hecs::{Entity, World};
use legion_logic::faction::Owner;
use legion_logic::geometry::Vec2;

use crate::components::*;
use crate::context::SimContext;
use crate::generation::{groups_in_spawn_order, spawn_group, GroupSpawn, MemberSeed};

/// Why two groups did not merge. Refusals never mutate the world.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeRefusal {
    SameGroup,
    OwnerMismatch { a: Owner, b: Owner },
    NotMergeable,
    StillMoving,
    OverCapacity { combined: usize, cap: usize },
    TooFar { distance: f32, threshold: f32 },
    AlreadyMerged,
    Missing(Entity),
}

impl std::fmt::Display for MergeRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeRefusal::SameGroup => write!(f, "a group cannot merge with itself"),
            MergeRefusal::OwnerMismatch { a, b } => write!(f, "owners differ ({} vs {})", a.0, b.0),
            MergeRefusal::NotMergeable => write!(f, "group kind does not merge"),
            MergeRefusal::StillMoving => write!(f, "a group is still moving"),
            MergeRefusal::OverCapacity { combined, cap } => {
                write!(f, "{} members would exceed the cap of {}", combined, cap)
            }
            MergeRefusal::TooFar { distance, threshold } => {
                write!(f, "groups are {:.1} apart, threshold is {:.1}", distance, threshold)
            }
            MergeRefusal::AlreadyMerged => write!(f, "a group already merged this tick"),
            MergeRefusal::Missing(e) => write!(f, "group {:?} is not in the world", e),
        }
    }
}

impl std::error::Error for MergeRefusal {}

/// Snapshot of the fields the merge check reads
#[derive(Debug, Clone, Copy)]
pub struct MergeCandidate {
    pub entity: Entity,
    pub group: Group,
    pub position: Vec2,
    pub settled: bool,
    pub member_count: usize,
    pub last_attack_at: Option<f64>,
}

impl MergeCandidate {
    pub fn from_world(world: &World, entity: Entity) -> Option<Self> {
        let mut query = world
            .query_one::<(&Group, &Position, &Velocity, &Members, Option<&CombatState>)>(entity)
            .ok()?;
        let (group, pos, vel, members, combat) = query.get()?;
        Some(Self {
            entity,
            group: *group,
            position: pos.0,
            settled: vel.is_settled(),
            member_count: members.len(),
            last_attack_at: combat.and_then(|c| c.last_attack_at),
        })
    }
}

/// Pairwise preconditions, checked in a fixed order.
pub fn check_merge(a: &MergeCandidate, b: &MergeCandidate, proximity: f32) -> Result<(), MergeRefusal> {
    if a.entity == b.entity {
        return Err(MergeRefusal::SameGroup);
    }
    if a.group.owner != b.group.owner {
        return Err(MergeRefusal::OwnerMismatch {
            a: a.group.owner,
            b: b.group.owner,
        });
    }
    if !a.group.kind.is_mergeable() || a.group.kind != b.group.kind {
        return Err(MergeRefusal::NotMergeable);
    }
    if !a.settled || !b.settled {
        return Err(MergeRefusal::StillMoving);
    }
    let combined = a.member_count + b.member_count;
    let cap = a.group.capacity.min(b.group.capacity);
    if combined > cap {
        return Err(MergeRefusal::OverCapacity { combined, cap });
    }
    let distance = a.position.distance(&b.position);
    if distance > proximity {
        return Err(MergeRefusal::TooFar {
            distance,
            threshold: proximity,
        });
    }
    Ok(())
}

/// Check and merge a single pair. Returns the new group.
pub fn merge_groups(world: &mut World, ctx: &mut SimContext, a: Entity, b: Entity) -> Result<Entity, MergeRefusal> {
    let first = MergeCandidate::from_world(world, a).ok_or(MergeRefusal::Missing(a))?;
    let second = MergeCandidate::from_world(world, b).ok_or(MergeRefusal::Missing(b))?;
    check_merge(&first, &second, ctx.config.merge.proximity)?;
    execute_merge(world, ctx, &first, &second).ok_or(MergeRefusal::Missing(b))
}

/// Scan all group pairs and apply every accepted merge. Returns the number
/// of merges executed.
pub fn merge_system(world: &mut World, ctx: &mut SimContext) -> usize {
    let proximity = ctx.config.merge.proximity;
    let snapshot: Vec<MergeCandidate> = groups_in_spawn_order(world)
        .into_iter()
        .filter_map(|e| MergeCandidate::from_world(world, e))
        .collect();

    let mut merged = vec![false; snapshot.len()];
    let mut plans: Vec<(usize, usize)> = Vec::new();

    for i in 0..snapshot.len() {
        if merged[i] || !snapshot[i].group.kind.is_mergeable() {
            continue;
        }
        for j in (i + 1)..snapshot.len() {
            let result = if merged[j] {
                Err(MergeRefusal::AlreadyMerged)
            } else {
                check_merge(&snapshot[i], &snapshot[j], proximity)
            };
            match result {
                Ok(()) => {
                    merged[i] = true;
                    merged[j] = true;
                    plans.push((i, j));
                    break;
                }
                Err(MergeRefusal::TooFar { .. }) | Err(MergeRefusal::NotMergeable) => {}
                Err(refusal) => {
                    log::trace!(
                        "merge {:?} + {:?} refused: {}",
                        snapshot[i].entity,
                        snapshot[j].entity,
                        refusal
                    );
                }
            }
        }
    }

    let mut count = 0;
    for (i, j) in plans {
        match execute_merge(world, ctx, &snapshot[i], &snapshot[j]) {
            Some(_) => count += 1,
            None => log::warn!(
                "skipped stale merge plan {:?} + {:?}",
                snapshot[i].entity,
                snapshot[j].entity
            ),
        }
    }
    count
}

/// Take both member lists, release them to the pool and rebuild a single
/// group at their centroid. Either both sources are replaced or neither is
/// touched.
fn execute_merge(
    world: &mut World,
    ctx: &mut SimContext,
    a: &MergeCandidate,
    b: &MergeCandidate,
) -> Option<Entity> {
    let selected = is_selected(world, a.entity) || is_selected(world, b.entity);

    let members_a = world.remove_one::<Members>(a.entity).ok()?;
    let members_b = match world.remove_one::<Members>(b.entity) {
        Ok(m) => m,
        Err(_) => {
            let _ = world.insert_one(a.entity, members_a);
            return None;
        }
    };

    let collected: Vec<(Vec2, &Member)> = members_a
        .0
        .iter()
        .map(|m| (a.position + m.pos, m))
        .chain(members_b.0.iter().map(|m| (b.position + m.pos, m)))
        .collect();
    let points: Vec<Vec2> = collected.iter().map(|(p, _)| *p).collect();
    let centroid = Vec2::centroid(&points).unwrap_or(a.position);
    let seeds: Vec<MemberSeed> = collected
        .iter()
        .map(|(p, m)| MemberSeed {
            offset: *p - centroid,
            color: m.color,
            move_radius: m.move_radius,
        })
        .collect();

    ctx.pool.release_all(members_a.0);
    ctx.pool.release_all(members_b.0);
    let _ = world.despawn(a.entity);
    let _ = world.despawn(b.entity);

    let spawn = GroupSpawn::new(a.group.kind, a.group.owner, centroid)
        .with_seeds(seeds)
        .with_color(a.group.color)
        .with_padding(a.group.padding.max(b.group.padding))
        .with_last_attack(latest_attack(a.last_attack_at, b.last_attack_at))
        .selected(selected);
    let merged = spawn_group(world, ctx, spawn)?;

    log::debug!(
        "merged {:?} ({}) + {:?} ({}) into {:?} at ({:.1}, {:.1})",
        a.entity,
        a.member_count,
        b.entity,
        b.member_count,
        merged,
        centroid.x,
        centroid.y
    );
    Some(merged)
}

/// The merged group keeps whichever cooldown ends last
fn latest_attack(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}

fn is_selected(world: &World, entity: Entity) -> bool {
    world.get::<&Selection>(entity).map(|s| s.selected).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use legion_logic::config::SimConfig;

    fn spawn(world: &mut World, ctx: &mut SimContext, owner: Owner, pos: Vec2, n: usize) -> Entity {
        let kind = if owner == Owner::PLAYER {
            GroupKind::PlayerControlled
        } else {
            GroupKind::Enemy
        };
        spawn_group(world, ctx, GroupSpawn::new(kind, owner, pos).with_members(n)).unwrap()
    }

    fn candidate(world: &World, e: Entity) -> MergeCandidate {
        MergeCandidate::from_world(world, e).unwrap()
    }

    #[test]
    fn test_check_order_and_reasons() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let a = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::ZERO, 5);
        let b = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::new(10.0, 0.0), 3);
        let far = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::new(80.0, 0.0), 3);
        let player = spawn(&mut world, &mut ctx, Owner::PLAYER, Vec2::new(5.0, 0.0), 3);

        let (ca, cb) = (candidate(&world, a), candidate(&world, b));
        assert_eq!(check_merge(&ca, &cb, 50.0), Ok(()));
        assert_eq!(check_merge(&ca, &ca, 50.0), Err(MergeRefusal::SameGroup));
        assert!(matches!(
            check_merge(&ca, &candidate(&world, player), 50.0),
            Err(MergeRefusal::OwnerMismatch { .. })
        ));
        assert!(matches!(
            check_merge(&ca, &candidate(&world, far), 50.0),
            Err(MergeRefusal::TooFar { .. })
        ));

        let mut moving = cb;
        moving.settled = false;
        assert_eq!(check_merge(&ca, &moving, 50.0), Err(MergeRefusal::StillMoving));

        let mut big = cb;
        big.member_count = 98;
        assert_eq!(
            check_merge(&ca, &big, 50.0),
            Err(MergeRefusal::OverCapacity { combined: 103, cap: 100 })
        );
    }

    #[test]
    fn test_merge_pair_conserves_members() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 3);
        let a = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::ZERO, 5);
        let b = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::new(10.0, 0.0), 3);

        let merged = merge_groups(&mut world, &mut ctx, a, b).unwrap();
        assert!(!world.contains(a));
        assert!(!world.contains(b));
        assert_eq!(world.get::<&Members>(merged).unwrap().len(), 8);
    }

    #[test]
    fn test_refused_merge_leaves_world_untouched() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 3);
        let a = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::ZERO, 5);
        let b = spawn(&mut world, &mut ctx, Owner::PLAYER, Vec2::new(10.0, 0.0), 3);
        let before_a: Members = (*world.get::<&Members>(a).unwrap()).clone();

        assert!(merge_groups(&mut world, &mut ctx, a, b).is_err());
        assert_eq!(*world.get::<&Members>(a).unwrap(), before_a);
        assert_eq!(world.get::<&Members>(b).unwrap().len(), 3);
        assert!(ctx.pool.is_empty());
    }

    #[test]
    fn test_missing_group() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 3);
        let a = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::ZERO, 2);
        let b = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::ZERO, 2);
        world.despawn(b).unwrap();
        assert_eq!(merge_groups(&mut world, &mut ctx, a, b), Err(MergeRefusal::Missing(b)));
        assert_eq!(world.get::<&Members>(a).unwrap().len(), 2);
    }

    #[test]
    fn test_single_merge_per_group_per_tick() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 4);
        spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::ZERO, 2);
        spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::new(5.0, 0.0), 2);
        spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::new(10.0, 0.0), 2);

        // Three mutually close groups: only one pair can merge this tick
        assert_eq!(merge_system(&mut world, &mut ctx), 1);
        assert_eq!(groups_in_spawn_order(&world).len(), 2);

        // The merged group and the leftover combine on the next pass
        assert_eq!(merge_system(&mut world, &mut ctx), 1);
        let remaining = groups_in_spawn_order(&world);
        assert_eq!(remaining.len(), 1);
        assert_eq!(world.get::<&Members>(remaining[0]).unwrap().len(), 6);
    }

    #[test]
    fn test_merge_keeps_selection_and_max_padding() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 4);
        let a = spawn(&mut world, &mut ctx, Owner::PLAYER, Vec2::ZERO, 2);
        let b = spawn(&mut world, &mut ctx, Owner::PLAYER, Vec2::new(5.0, 0.0), 2);
        world.get::<&mut Selection>(b).unwrap().selected = true;
        world.get::<&mut Group>(b).unwrap().padding = 30.0;

        let merged = merge_groups(&mut world, &mut ctx, a, b).unwrap();
        assert!(world.get::<&Selection>(merged).unwrap().selected);
        assert_eq!(world.get::<&Group>(merged).unwrap().padding, 30.0);
    }

    #[test]
    fn test_merged_group_keeps_cooldown() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 5);
        let a = spawn(&mut world, &mut ctx, Owner::PLAYER, Vec2::ZERO, 20);
        let b = spawn(&mut world, &mut ctx, Owner::PLAYER, Vec2::new(10.0, 0.0), 20);
        let enemy = spawn(&mut world, &mut ctx, Owner::ENEMY, Vec2::new(100.0, 0.0), 50);

        ctx.sim_time = 0.0;
        let fired = crate::systems::combat_system(&mut world, &mut ctx);
        assert_eq!(fired.attacks, 4);
        assert_eq!(world.get::<&Members>(enemy).unwrap().len(), 48);

        let merged = merge_groups(&mut world, &mut ctx, a, b).unwrap();
        assert_eq!(world.get::<&CombatState>(merged).unwrap().last_attack_at, Some(0.0));

        // Neither side is off cooldown yet
        ctx.sim_time = 0.1;
        let early = crate::systems::combat_system(&mut world, &mut ctx);
        assert_eq!(early.attacks, 0);
        assert_eq!(world.get::<&Members>(enemy).unwrap().len(), 48);

        ctx.sim_time = 1.0;
        let ready = crate::systems::combat_system(&mut world, &mut ctx);
        assert_eq!(ready.attacks, 2);
        assert_eq!(world.get::<&Members>(enemy).unwrap().len(), 47);
    }

    #[test]
    fn test_latest_attack() {
        assert_eq!(latest_attack(None, None), None);
        assert_eq!(latest_attack(Some(2.0), None), Some(2.0));
        assert_eq!(latest_attack(None, Some(1.5)), Some(1.5));
        assert_eq!(latest_attack(Some(2.0), Some(3.0)), Some(3.0));
    }

    #[test]
    fn test_auras_never_merge() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 4);
        for x in [0.0, 5.0] {
            spawn_group(
                &mut world,
                &mut ctx,
                GroupSpawn::new(GroupKind::Aura, Owner::PLAYER, Vec2::new(x, 0.0)).with_members(2),
            )
            .unwrap();
        }
        assert_eq!(merge_system(&mut world, &mut ctx), 0);
    }
}

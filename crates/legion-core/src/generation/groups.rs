//! Group construction and teardown.

use hecs::{Entity, World};
use legion_logic::color::Color;
use legion_logic::faction::Owner;
use legion_logic::geometry::Vec2;
use legion_logic::hull::HullGeometry;
use rand::Rng;

use crate::components::*;
use crate::context::SimContext;

/// A member supplied explicitly, relative to the new group's anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberSeed {
    pub offset: Vec2,
    pub color: Color,
    pub move_radius: f32,
}

/// Everything needed to build a group. Unset fields fall back to the
/// simulation config.
#[derive(Debug, Clone)]
pub struct GroupSpawn {
    pub kind: GroupKind,
    pub owner: Owner,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Random members added after the seeds
    pub member_count: usize,
    pub seeds: Vec<MemberSeed>,
    pub padding: Option<f32>,
    pub color: Color,
    pub constrained: bool,
    pub follows: Option<Entity>,
    pub selectable: Option<bool>,
    pub selected: bool,
    /// Cooldown carried over from groups this one replaces
    pub last_attack_at: Option<f64>,
}

impl GroupSpawn {
    pub fn new(kind: GroupKind, owner: Owner, position: Vec2) -> Self {
        Self {
            kind,
            owner,
            position,
            velocity: Vec2::ZERO,
            member_count: 0,
            seeds: Vec::new(),
            padding: None,
            color: Color::WHITE,
            constrained: false,
            follows: None,
            selectable: None,
            selected: false,
            last_attack_at: None,
        }
    }

    pub fn with_members(mut self, count: usize) -> Self {
        self.member_count = count;
        self
    }

    pub fn with_seeds(mut self, seeds: Vec<MemberSeed>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Members at exact offsets, using the spawn color and default radius
    pub fn with_offsets(mut self, offsets: &[Vec2], move_radius: f32) -> Self {
        let color = self.color;
        self.seeds = offsets
            .iter()
            .map(|&offset| MemberSeed {
                offset,
                color,
                move_radius,
            })
            .collect();
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Activate the one-shot spawn leash
    pub fn constrained(mut self) -> Self {
        self.constrained = true;
        self
    }

    pub fn following(mut self, unit: Entity) -> Self {
        self.follows = Some(unit);
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = Some(selectable);
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Start with the attack cooldown already running from `at`
    pub fn with_last_attack(mut self, at: Option<f64>) -> Self {
        self.last_attack_at = at;
        self
    }

    fn total_members(&self) -> usize {
        self.seeds.len() + self.member_count
    }
}

/// Build a group entity, acquiring its members from the pool.
///
/// Returns `None` without touching the world when the group would have no
/// members, since an empty group is never valid.
pub fn spawn_group(world: &mut World, ctx: &mut SimContext, spawn: GroupSpawn) -> Option<Entity> {
    let total = spawn.total_members();
    if total == 0 {
        return None;
    }

    let cfg = &ctx.config.groups;
    let padding = spawn.padding.unwrap_or(match spawn.kind {
        GroupKind::Aura => cfg.aura_padding,
        _ => cfg.padding,
    });
    let move_radius = match spawn.kind {
        GroupKind::Aura => cfg.aura_move_radius_scale * (total as f32).sqrt(),
        _ => cfg.member_move_radius,
    };
    let spread = cfg.spawn_spread;
    let max_speed = cfg.max_speed;
    let constraint_radius = cfg.constraint_radius;

    let mut members = Vec::with_capacity(total);
    for seed in &spawn.seeds {
        members.push(ctx.pool.acquire(seed.offset.x, seed.offset.y, seed.move_radius, seed.color));
    }
    for _ in 0..spawn.member_count {
        let x = (ctx.rng.gen::<f32>() * 2.0 - 1.0) * spread;
        let y = (ctx.rng.gen::<f32>() * 2.0 - 1.0) * spread;
        members.push(ctx.pool.acquire(x, y, move_radius, spawn.color));
    }

    let members = Members(members);
    let hull = HullGeometry::compute(&members.world_points(spawn.position), padding, spawn.position);
    let group = Group {
        kind: spawn.kind,
        owner: spawn.owner,
        padding,
        capacity: ctx.config.merge.max_members,
        color: spawn.color,
    };
    let selection = Selection {
        selectable: spawn.selectable.unwrap_or(spawn.kind.is_selectable()),
        hovered: false,
        selected: spawn.selected,
    };
    let order = ctx.next_spawn_order();

    let entity = world.spawn((
        group,
        members,
        HullCache(hull),
        CombatState {
            last_attack_at: spawn.last_attack_at,
            ..Default::default()
        },
        Position(spawn.position),
        Velocity(spawn.velocity),
        MaxSpeed(max_speed),
        order,
        selection,
    ));

    if spawn.constrained {
        let _ = world.insert_one(
            entity,
            SpawnConstraint {
                origin: spawn.position,
                radius: constraint_radius,
            },
        );
    }
    if let Some(unit) = spawn.follows {
        let _ = world.insert_one(entity, Follows(unit));
    }

    log::debug!(
        "spawned {:?} group {:?} for owner {} ({}) with {} members at ({:.1}, {:.1})",
        spawn.kind,
        entity,
        spawn.owner.0,
        spawn.owner.team().name(),
        total,
        spawn.position.x,
        spawn.position.y
    );

    Some(entity)
}

/// Remove a group and hand its members back to the pool. Removing a group
/// that is already gone is a no-op and returns false.
pub fn despawn_group(world: &mut World, ctx: &mut SimContext, entity: Entity) -> bool {
    let members = world.remove_one::<Members>(entity).ok();
    if world.despawn(entity).is_err() {
        return false;
    }
    if let Some(members) = members {
        ctx.pool.release_all(members.0);
    }
    true
}

/// Every group entity, sorted by insertion order
pub fn groups_in_spawn_order(world: &World) -> Vec<Entity> {
    let mut groups: Vec<(SpawnOrder, Entity)> = world
        .query::<(&Group, &SpawnOrder)>()
        .iter()
        .map(|(entity, (_, order))| (*order, entity))
        .collect();
    groups.sort_by_key(|(order, _)| *order);
    groups.into_iter().map(|(_, entity)| entity).collect()
}

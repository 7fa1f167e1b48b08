//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use legion_logic::config::SimConfig;
use legion_logic::faction::Owner;
use legion_logic::geometry::Vec2;

use crate::components::*;
use crate::context::SimContext;
use crate::generation::{despawn_group, spawn_group, spawn_unit, GroupSpawn};
use crate::render::{build_frame, RenderFrame, Renderer};
use crate::systems::*;

/// What happened during one [`SimulationEngine::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Groups created by spawners
    pub spawned: usize,
    pub merges: usize,
    pub attacks: usize,
    /// Groups destroyed by attrition
    pub destroyed: usize,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all groups and units
    pub world: World,
    /// Pool, RNG, config and clock
    pub ctx: SimContext,
    pub pointer: PointerState,
    time_scale: f32,
}

impl SimulationEngine {
    /// Create an empty simulation with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_config(SimConfig::default(), seed)
    }

    pub fn with_config(config: SimConfig, seed: u64) -> Self {
        log::info!("simulation seeded with {}", seed);
        Self {
            world: World::new(),
            ctx: SimContext::new(config, seed),
            pointer: PointerState::default(),
            time_scale: 1.0,
        }
    }

    /// Advance the simulation by `delta_seconds` (scaled by the time scale)
    pub fn update(&mut self, delta_seconds: f32) -> TickReport {
        let dt = delta_seconds * self.time_scale;
        self.ctx.sim_time += f64::from(dt);

        let mut report = TickReport::default();

        report.spawned = spawner_system(&mut self.world, &mut self.ctx, dt).len();
        enemy_ai_system(&mut self.world, &mut self.ctx);
        movement_system(&mut self.world, &mut self.ctx, dt);
        wandering_system(&mut self.world, &mut self.ctx);

        // Cross-group scans see this tick's positions and hulls
        hull_system(&mut self.world);
        report.merges = merge_system(&mut self.world, &mut self.ctx);

        projectile_system(&mut self.ctx, dt);
        let combat = combat_system(&mut self.world, &mut self.ctx);
        report.attacks = combat.attacks;
        report.destroyed = combat.destroyed.len();

        self.ctx.tick += 1;
        report
    }

    /// Spawn a group directly. `None` when it would have no members.
    pub fn spawn_group(&mut self, spawn: GroupSpawn) -> Option<Entity> {
        spawn_group(&mut self.world, &mut self.ctx, spawn)
    }

    pub fn spawn_unit(&mut self, kind: UnitKind, owner: Owner, position: Vec2) -> Entity {
        spawn_unit(&mut self.world, &mut self.ctx, kind, owner, position)
    }

    /// Remove a group, returning its members to the pool
    pub fn despawn_group(&mut self, entity: Entity) -> bool {
        despawn_group(&mut self.world, &mut self.ctx, entity)
    }

    /// Merge two specific groups outside the tick loop
    pub fn merge(&mut self, a: Entity, b: Entity) -> Result<Entity, MergeRefusal> {
        merge_groups(&mut self.world, &mut self.ctx, a, b)
    }

    pub fn pointer_moved(&mut self, point: Vec2) {
        self.pointer.moved(&mut self.world, point);
    }

    pub fn pointer_pressed(&mut self, point: Vec2, button: PointerButton) {
        self.pointer.pressed(&mut self.world, point, button);
    }

    pub fn pointer_released(&mut self, button: PointerButton) {
        self.pointer.released(button);
    }

    pub fn command_move(&mut self, entity: Entity, point: Vec2) -> bool {
        command_move(&mut self.world, entity, point)
    }

    pub fn render_frame(&self) -> RenderFrame {
        build_frame(&self.world, &self.ctx)
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw(&self.render_frame());
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.ctx.sim_time
    }

    pub fn tick(&self) -> u64 {
        self.ctx.tick
    }

    /// Count groups of every kind
    pub fn group_count(&self) -> usize {
        self.world.query::<&Group>().iter().count()
    }

    pub fn unit_count(&self) -> usize {
        self.world.query::<&Unit>().iter().count()
    }

    /// Members across every group
    pub fn member_count(&self) -> usize {
        self.world.query::<&Members>().iter().map(|(_, m)| m.len()).sum()
    }

    /// Members owned by groups of one owner
    pub fn members_of(&self, owner: Owner) -> usize {
        self.world
            .query::<(&Group, &Members)>()
            .iter()
            .filter(|(_, (g, _))| g.owner == owner)
            .map(|(_, (_, m))| m.len())
            .sum()
    }

    pub fn groups_of(&self, kind: GroupKind) -> Vec<Entity> {
        crate::generation::groups_in_spawn_order(&self.world)
            .into_iter()
            .filter(|&e| self.world.get::<&Group>(e).map(|g| g.kind == kind).unwrap_or(false))
            .collect()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

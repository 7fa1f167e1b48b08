//! Simulation context - the state every system shares besides the world.
//!
//! Owns the member pool, the seeded random source and the clock, so a run
//! is fully determined by its seed, its config and the calls made on it.
//! Attack tracers live here too: they outlive the group that fired them.

use legion_logic::config::SimConfig;
use legion_logic::projectile::AttackEvent;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::SpawnOrder;
use crate::pool::MemberPool;

/// Random source used by every system
pub type SimRng = StdRng;

pub struct SimContext {
    pub config: SimConfig,
    pub pool: MemberPool,
    pub rng: SimRng,
    /// Seconds since the simulation started
    pub sim_time: f64,
    /// Completed ticks
    pub tick: u64,
    /// In-flight attack tracers, oldest first
    pub tracers: Vec<AttackEvent>,
    next_order: u64,
}

impl SimContext {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let pool = MemberPool::new(config.pool.max_size, config.groups.member_wander_step);
        Self {
            config,
            pool,
            rng: SimRng::seed_from_u64(seed),
            sim_time: 0.0,
            tick: 0,
            tracers: Vec::new(),
            next_order: 0,
        }
    }

    /// Next insertion sequence number
    pub fn next_spawn_order(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.next_order);
        self.next_order += 1;
        order
    }
}

//! Default tuning values. Every one of these is the default of a field in
//! [`crate::config::SimConfig`]; simulation code reads the config, not these.

pub mod groups {
    pub const DEFAULT_MEMBER_COUNT: usize = 10;
    /// Members in the halo around each unit
    pub const AURA_MEMBER_COUNT: usize = 10;
    pub const PADDING: f32 = 20.0;
    pub const AURA_PADDING: f32 = 32.0;
    /// Random member offsets are uniform in [-SPREAD, SPREAD) per axis
    pub const SPAWN_SPREAD: f32 = 25.0;
    pub const MEMBER_MOVE_RADIUS: f32 = 5.0;
    pub const AURA_MOVE_RADIUS_SCALE: f32 = 10.0;
    /// Units a member moves per wander step
    pub const MEMBER_WANDER_STEP: f32 = 0.2;
    pub const WANDER_ARRIVAL: f32 = 2.0;
    pub const WANDER_INTERVAL_TICKS: u32 = 2;
    /// Units per second
    pub const MAX_SPEED: f32 = 120.0;
    pub const ARRIVAL_THRESHOLD: f32 = 4.0;
    pub const CONSTRAINT_RADIUS: f32 = 50.0;
}

pub mod merge {
    pub const PROXIMITY: f32 = 50.0;
    pub const MAX_MEMBERS: usize = 100;
}

pub mod combat {
    pub const ATTACK_RANGE: f32 = 150.0;
    pub const DAMAGE: u32 = 1;
    pub const COOLDOWN_SECS: f64 = 1.0;
    /// Tracer progress per second
    pub const PROJECTILE_SPEED: f32 = 2.0;
}

pub mod units {
    use crate::color::Color;

    pub const PLAYER_GROUP_COLOR: Color = Color::WHITE;
    pub const ENEMY_GROUP_COLOR: Color = Color::BLUE;
    pub const PLAYER_SPAWN_INTERVAL: f32 = 2.0;
    pub const ENEMY_SPAWN_INTERVAL: f32 = 5.0;
    pub const SPAWN_KICK: f32 = 120.0;
    pub const UNIT_MAX_SPEED: f32 = 120.0;
    pub const PATROL_RANGE: f32 = 100.0;
    pub const CHASE_RADIUS: f32 = 200.0;
}

pub mod pool {
    pub const MAX_SIZE: usize = 1000;
}

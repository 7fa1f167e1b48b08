//! Combat state carried by every group.

use hecs::Entity;

/// Per-group combat bookkeeping. `targets` is rebuilt every tick.
#[derive(Debug, Clone, Default)]
pub struct CombatState {
    /// True iff this tick's target list is non-empty (visual only)
    pub in_combat: bool,
    /// Simulation time of the last fired attack, in seconds
    pub last_attack_at: Option<f64>,
    pub targets: Vec<Entity>,
}

impl CombatState {
    /// Whether enough time has passed since the last attack
    pub fn ready(&self, now: f64, cooldown: f64) -> bool {
        match self.last_attack_at {
            None => true,
            Some(last) => now - last >= cooldown,
        }
    }
}

//! Simulation configuration: every tunable distance, speed and timer.
//!
//! Every section is `#[serde(default)]`, so a JSON file only needs the
//! keys it wants to override:
//!
//! ```json
//! { "combat": { "cooldown_secs": 0.5 }, "merge": { "max_members": 40 } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Color;
use crate::constants;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub default_member_count: usize,
    pub aura_member_count: usize,
    pub padding: f32,
    pub aura_padding: f32,
    pub spawn_spread: f32,
    pub member_move_radius: f32,
    pub aura_move_radius_scale: f32,
    pub member_wander_step: f32,
    pub wander_arrival: f32,
    pub wander_interval_ticks: u32,
    pub max_speed: f32,
    pub arrival_threshold: f32,
    pub constraint_radius: f32,
}

impl Default for GroupConfig {
    fn default() -> Self {
        use constants::groups::*;
        Self {
            default_member_count: DEFAULT_MEMBER_COUNT,
            aura_member_count: AURA_MEMBER_COUNT,
            padding: PADDING,
            aura_padding: AURA_PADDING,
            spawn_spread: SPAWN_SPREAD,
            member_move_radius: MEMBER_MOVE_RADIUS,
            aura_move_radius_scale: AURA_MOVE_RADIUS_SCALE,
            member_wander_step: MEMBER_WANDER_STEP,
            wander_arrival: WANDER_ARRIVAL,
            wander_interval_ticks: WANDER_INTERVAL_TICKS,
            max_speed: MAX_SPEED,
            arrival_threshold: ARRIVAL_THRESHOLD,
            constraint_radius: CONSTRAINT_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Maximum anchor-to-anchor distance for two groups to merge
    pub proximity: f32,
    /// Capacity cap on the merged member count
    pub max_members: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            proximity: constants::merge::PROXIMITY,
            max_members: constants::merge::MAX_MEMBERS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub attack_range: f32,
    /// Members removed from each target per attack
    pub damage: u32,
    pub cooldown_secs: f64,
    pub projectile_speed: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        use constants::combat::*;
        Self {
            attack_range: ATTACK_RANGE,
            damage: DAMAGE,
            cooldown_secs: COOLDOWN_SECS,
            projectile_speed: PROJECTILE_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    pub player_spawn_interval: f32,
    pub enemy_spawn_interval: f32,
    pub spawn_kick: f32,
    pub unit_max_speed: f32,
    pub patrol_range: f32,
    pub chase_radius: f32,
    /// Color of the groups player units spawn, as `#rrggbb` or `#rgb`
    pub player_group_color: String,
    pub enemy_group_color: String,
}

impl Default for UnitConfig {
    fn default() -> Self {
        use constants::units::*;
        Self {
            player_spawn_interval: PLAYER_SPAWN_INTERVAL,
            enemy_spawn_interval: ENEMY_SPAWN_INTERVAL,
            spawn_kick: SPAWN_KICK,
            unit_max_speed: UNIT_MAX_SPEED,
            patrol_range: PATROL_RANGE,
            chase_radius: CHASE_RADIUS,
            player_group_color: PLAYER_GROUP_COLOR.to_hex(),
            enemy_group_color: ENEMY_GROUP_COLOR.to_hex(),
        }
    }
}

impl UnitConfig {
    /// Parsed player group color. Falls back to the default if the string
    /// was never validated.
    pub fn player_color(&self) -> Color {
        Color::from_hex(&self.player_group_color).unwrap_or(constants::units::PLAYER_GROUP_COLOR)
    }

    pub fn enemy_color(&self) -> Color {
        Color::from_hex(&self.enemy_group_color).unwrap_or(constants::units::ENEMY_GROUP_COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: constants::pool::MAX_SIZE,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub groups: GroupConfig,
    pub merge: MergeConfig,
    pub combat: CombatConfig,
    pub units: UnitConfig,
    pub pool: PoolConfig,
}

impl SimConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with. Returns the first
    /// offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("groups.padding", self.groups.padding),
            ("groups.aura_padding", self.groups.aura_padding),
            ("groups.spawn_spread", self.groups.spawn_spread),
            ("groups.member_move_radius", self.groups.member_move_radius),
            ("groups.aura_move_radius_scale", self.groups.aura_move_radius_scale),
            ("groups.member_wander_step", self.groups.member_wander_step),
            ("groups.wander_arrival", self.groups.wander_arrival),
            ("groups.max_speed", self.groups.max_speed),
            ("groups.arrival_threshold", self.groups.arrival_threshold),
            ("groups.constraint_radius", self.groups.constraint_radius),
            ("merge.proximity", self.merge.proximity),
            ("combat.attack_range", self.combat.attack_range),
            ("combat.projectile_speed", self.combat.projectile_speed),
            ("units.player_spawn_interval", self.units.player_spawn_interval),
            ("units.enemy_spawn_interval", self.units.enemy_spawn_interval),
            ("units.spawn_kick", self.units.spawn_kick),
            ("units.unit_max_speed", self.units.unit_max_speed),
            ("units.patrol_range", self.units.patrol_range),
            ("units.chase_radius", self.units.chase_radius),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, format!("must be finite and >= 0, got {}", value)));
            }
        }

        if !(self.combat.cooldown_secs.is_finite() && self.combat.cooldown_secs > 0.0) {
            return Err(ConfigError::invalid(
                "combat.cooldown_secs",
                format!("must be > 0, got {}", self.combat.cooldown_secs),
            ));
        }
        if self.combat.damage == 0 {
            return Err(ConfigError::invalid("combat.damage", "must be at least 1"));
        }
        let colors = [
            ("units.player_group_color", &self.units.player_group_color),
            ("units.enemy_group_color", &self.units.enemy_group_color),
        ];
        for (field, value) in colors {
            if Color::from_hex(value).is_none() {
                return Err(ConfigError::invalid(field, format!("not a #rrggbb color: {:?}", value)));
            }
        }
        if self.groups.aura_member_count == 0 {
            return Err(ConfigError::invalid("groups.aura_member_count", "must be at least 1"));
        }
        if self.merge.max_members == 0 {
            return Err(ConfigError::invalid("merge.max_members", "must be at least 1"));
        }
        if self.groups.wander_interval_ticks == 0 {
            return Err(ConfigError::invalid("groups.wander_interval_ticks", "must be at least 1"));
        }
        Ok(())
    }
}

/// Errors that can occur while loading a configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid { field, reason } => write!(f, "Invalid config `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            SimConfig::from_json_str(r#"{ "combat": { "cooldown_secs": 0.5 }, "merge": { "max_members": 40 } }"#)
                .unwrap();
        assert_eq!(config.combat.cooldown_secs, 0.5);
        assert_eq!(config.combat.damage, constants::combat::DAMAGE);
        assert_eq!(config.merge.max_members, 40);
        assert_eq!(config.groups, GroupConfig::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(SimConfig::from_json_str("{}").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_rejects_zero_cooldown() {
        let err = SimConfig::from_json_str(r#"{ "combat": { "cooldown_secs": 0.0 } }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "combat.cooldown_secs"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_rejects_negative_distance() {
        let mut config = SimConfig::default();
        config.merge.proximity = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "merge.proximity", .. })
        ));
    }

    #[test]
    fn test_zero_aura_members_rejected() {
        let mut config = SimConfig::default();
        config.groups.aura_member_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "groups.aura_member_count", .. })
        ));
    }

    #[test]
    fn test_group_colors_from_hex() {
        let config = SimConfig::from_json_str(r##"{ "units": { "enemy_group_color": "#f80" } }"##).unwrap();
        assert_eq!(config.units.enemy_color(), Color::rgb(255, 136, 0));
        assert_eq!(config.units.player_color(), Color::WHITE);

        assert!(matches!(
            SimConfig::from_json_str(r#"{ "units": { "player_group_color": "white" } }"#),
            Err(ConfigError::Invalid { field: "units.player_group_color", .. })
        ));

        let units = UnitConfig::default();
        assert_eq!(units.player_group_color, "#ffffff");
        assert_eq!(units.enemy_group_color, "#0000ff");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(SimConfig::from_json_str("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimConfig::load("/definitely/not/here/legion.json"),
            Err(ConfigError::Io(_))
        ));
    }
}

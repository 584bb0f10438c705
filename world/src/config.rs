//! Tunable simulation parameters loaded from TOML.

use revert_core::{
    AttackMode, DEFAULT_WAVES, DEFAULT_WAVE_SIZE, HIT_BONUS, KILL_BONUS, WAVE_TIME_ALLOWANCE,
};
use serde::{Deserialize, Serialize};

/// Reasons a configuration may be rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a configuration.
    #[error("failed to parse simulation config")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Complete set of simulation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of waves in the level.
    pub waves: u32,
    /// Enemies generated per wave.
    pub wave_size: usize,
    /// Score awarded per bullet hit.
    pub hit_bonus: u64,
    /// Score awarded per enemy removed.
    pub kill_bonus: u64,
    /// Seconds granted per wave before the time bonus runs out.
    pub wave_time_allowance: f32,
    /// Seed for wave layout generation.
    pub spawn_seed: u64,
    /// Player parameters.
    pub player: PlayerConfig,
    /// Enemy parameters.
    pub enemy: EnemyConfig,
    /// Bullet parameters.
    pub bullet: BulletConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            waves: DEFAULT_WAVES,
            wave_size: DEFAULT_WAVE_SIZE,
            hit_bonus: HIT_BONUS,
            kill_bonus: KILL_BONUS,
            wave_time_allowance: WAVE_TIME_ALLOWANCE,
            spawn_seed: 0x5eed_0f_7e7e,
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            bullet: BulletConfig::default(),
        }
    }
}

impl Config {
    /// Parses and validates a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waves == 0 {
            return Err(invalid("waves", "a level needs at least one wave"));
        }
        if self.wave_size == 0 {
            return Err(invalid("wave_size", "a wave needs at least one enemy"));
        }
        if self.player.width <= 0 || self.player.height <= 0 {
            return Err(invalid("player", "body dimensions must be positive"));
        }
        if self.player.move_size < 0 {
            return Err(invalid("player.move_size", "must not be negative"));
        }
        if self.player.viewport_width <= 0 || self.player.viewport_height <= 0 {
            return Err(invalid("player", "viewport dimensions must be positive"));
        }
        if self.player.start_column < 0 {
            return Err(invalid("player.start_column", "must not be negative"));
        }
        if self.enemy.width <= 0 || self.enemy.height <= 0 {
            return Err(invalid("enemy", "body dimensions must be positive"));
        }
        if self.enemy.move_size < 0 {
            return Err(invalid("enemy.move_size", "must not be negative"));
        }
        if self.bullet.modes.iter().any(|mode| mode.speed == 0) {
            return Err(invalid("bullet.modes", "bullets must move"));
        }
        let weakest = self
            .bullet
            .modes
            .iter()
            .map(|mode| mode.damage)
            .min()
            .unwrap_or(0);
        if self.enemy.idle_health.max(self.enemy.pursuer_health) > weakest {
            return Err(invalid("enemy", "every bullet must remove the enemy it hits"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Player body, inventory, and viewport parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Body width in pixels.
    pub width: i32,
    /// Body height in pixels.
    pub height: i32,
    /// Pixels walked per frame.
    pub move_size: i32,
    /// Rounds available at the start of the level.
    pub ammo: u32,
    /// Health at the start of the level.
    pub health: u32,
    /// Width of the view region centred on the player.
    pub viewport_width: i32,
    /// Height of the view region centred on the player.
    pub viewport_height: i32,
    /// Tile column the player starts in.
    pub start_column: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 64,
            move_size: 8,
            ammo: 50,
            health: 5,
            viewport_width: 320,
            viewport_height: 240,
            start_column: 1,
        }
    }
}

/// Enemy body and behaviour parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnemyConfig {
    /// Body width in pixels.
    pub width: i32,
    /// Body height in pixels.
    pub height: i32,
    /// Pixels walked per frame.
    pub move_size: i32,
    /// Health of idle enemies.
    pub idle_health: u32,
    /// Health of pursuing enemies.
    pub pursuer_health: u32,
    /// Distance at which pursuers notice the player.
    pub view_range: f32,
    /// Distance at which pursuers walk toward the player.
    pub aggress_range: f32,
    /// Damage dealt per pursuer strike.
    pub damage: u32,
    /// Touching frames between pursuer strikes.
    pub cooldown_frames: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 32,
            move_size: 4,
            idle_health: 1,
            pursuer_health: 1,
            view_range: 160.0,
            aggress_range: 96.0,
            damage: 1,
            cooldown_frames: 25,
        }
    }
}

/// Bullet parameters for one attack mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulletMode {
    /// Pixels travelled per frame.
    pub speed: i32,
    /// Health removed from an enemy on impact.
    pub damage: u32,
}

/// Bullet parameters indexed by attack mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BulletConfig {
    /// One entry per attack mode.
    pub modes: [BulletMode; 3],
}

impl BulletConfig {
    /// Parameters for the given attack mode.
    #[must_use]
    pub fn mode(&self, mode: AttackMode) -> BulletMode {
        self.modes[usize::from(mode.index()) % self.modes.len()]
    }
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            modes: [
                BulletMode {
                    speed: 12,
                    damage: 1,
                },
                BulletMode {
                    speed: 20,
                    damage: 1,
                },
                BulletMode {
                    speed: 8,
                    damage: 2,
                },
            ],
        }
    }
}

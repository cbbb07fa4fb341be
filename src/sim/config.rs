//! Data-driven game tuning
//!
//! Every gameplay constant lives in [`RunnerConfig`]. The defaults reproduce the
//! classic 800x200 runner; a JSON file can override any subset of fields.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{CharacterMode, ObstacleKind, SCORE_SCALE};

/// Errors raised while loading or validating a config
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io(std::io::Error),
    /// Config JSON is malformed
    Parse(serde_json::Error),
    /// A value is out of its legal range
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "malformed config: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid config value `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
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
        ConfigError::Parse(e)
    }
}

/// Playfield dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Screen y of the ground line obstacles stand on
    pub ground_line_y: f32,
    /// Ground scroll offset wraps back to 0 once it reaches `-ground_wrap`
    pub ground_wrap: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 200.0,
            ground_line_y: 170.0,
            ground_wrap: 24.0,
        }
    }
}

/// Sprite timing and hit-box height for one character mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeProfile {
    /// Number of animation frames in the cycle
    pub frames: u32,
    /// Milliseconds per frame (0 = never advances)
    pub frame_ms: f32,
    /// Sprite height in this mode
    pub height: f32,
}

/// Player character physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Fixed horizontal position
    pub x: f32,
    /// Resting y (top of sprite) when on the ground
    pub ground_y: f32,
    pub width: f32,
    pub height: f32,
    pub duck_height: f32,
    /// Upward velocity applied by a jump (negative = up)
    pub jump_impulse: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Hit-box shrink on every side
    pub hitbox_inset: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            x: 50.0,
            ground_y: 150.0,
            width: 40.0,
            height: 40.0,
            duck_height: 25.0,
            jump_impulse: -12.0,
            gravity: 0.6,
            max_fall_speed: 12.0,
            hitbox_inset: 5.0,
        }
    }
}

impl CharacterConfig {
    /// Animation and hit-box profile for a mode
    pub fn profile(&self, mode: CharacterMode) -> ModeProfile {
        match mode {
            CharacterMode::Running => ModeProfile {
                frames: 2,
                frame_ms: 200.0,
                height: self.height,
            },
            CharacterMode::Jumping => ModeProfile {
                frames: 1,
                frame_ms: 0.0,
                height: self.height,
            },
            CharacterMode::Ducking => ModeProfile {
                frames: 2,
                frame_ms: 200.0,
                height: self.duck_height,
            },
            CharacterMode::Dead => ModeProfile {
                frames: 1,
                frame_ms: 0.0,
                height: self.height,
            },
        }
    }
}

/// Obstacle sizes and spawn spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Smallest distance (in scrolled pixels) between two spawns
    pub min_gap: f32,
    /// Largest distance between two spawns
    pub max_gap: f32,
    /// Hit-box shrink on every side
    pub hitbox_inset: f32,
    pub cactus_small: Vec2,
    pub cactus_large: Vec2,
    /// Shared by both bird variants
    pub bird: Vec2,
    /// Height of the high bird's top edge above the ground line
    pub bird_high_altitude: f32,
    /// Height of the low bird's top edge above the ground line
    pub bird_low_altitude: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            min_gap: 400.0,
            max_gap: 800.0,
            hitbox_inset: 3.0,
            cactus_small: Vec2::new(17.0, 35.0),
            cactus_large: Vec2::new(25.0, 50.0),
            bird: Vec2::new(40.0, 25.0),
            bird_high_altitude: 80.0,
            bird_low_altitude: 40.0,
        }
    }
}

/// Score and speed curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub initial_speed: f32,
    pub max_speed: f32,
    /// Added to speed each time the score crosses a `speed_interval` multiple
    pub speed_increase: f32,
    pub speed_interval: u64,
    /// Score gained per tick, independent of frame time
    pub score_per_tick: f64,
    /// A score cue plays each time the score crosses a multiple of this
    pub score_cue_interval: u64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            initial_speed: 3.0,
            max_speed: 15.0,
            speed_increase: 0.05,
            speed_interval: 150,
            score_per_tick: 0.1,
            score_cue_interval: 100,
        }
    }
}

/// Decorative cloud layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub width: f32,
    pub height: f32,
    pub min_y: f32,
    pub y_range: f32,
    pub min_speed: f32,
    pub speed_range: f32,
    /// Recycled clouds reappear up to this far past the right edge
    pub respawn_spread: f32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            width: 46.0,
            height: 14.0,
            min_y: 20.0,
            y_range: 60.0,
            min_speed: 0.5,
            speed_range: 1.0,
            respawn_spread: 200.0,
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub field: FieldConfig,
    pub character: CharacterConfig,
    pub obstacles: ObstacleConfig,
    pub difficulty: DifficultyConfig,
    pub clouds: CloudConfig,
}

impl RunnerConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that every value keeps the simulation invariants reachable
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        let c = &self.character;
        let o = &self.obstacles;
        let d = &self.difficulty;

        if self.field.width <= 0.0 {
            return invalid("field.width", "must be positive");
        }
        if self.field.ground_wrap <= 0.0 {
            return invalid("field.ground_wrap", "must be positive");
        }
        if c.jump_impulse >= 0.0 {
            return invalid("character.jump_impulse", "must be negative (upward)");
        }
        if c.gravity <= 0.0 {
            return invalid("character.gravity", "must be positive");
        }
        if c.max_fall_speed <= 0.0 {
            return invalid("character.max_fall_speed", "must be positive");
        }
        if c.duck_height > c.height {
            return invalid("character.duck_height", "must not exceed character.height");
        }
        if c.hitbox_inset * 2.0 >= c.width.min(c.duck_height) {
            return invalid("character.hitbox_inset", "leaves an empty hit-box");
        }
        if o.min_gap <= 0.0 {
            return invalid("obstacles.min_gap", "must be positive");
        }
        if o.max_gap < o.min_gap {
            return invalid("obstacles.max_gap", "must be at least obstacles.min_gap");
        }
        let smallest = o.cactus_small.min(o.cactus_large).min(o.bird).min_element();
        if o.hitbox_inset * 2.0 >= smallest {
            return invalid("obstacles.hitbox_inset", "leaves an empty hit-box");
        }
        if d.initial_speed <= 0.0 {
            return invalid("difficulty.initial_speed", "must be positive");
        }
        if d.max_speed < d.initial_speed {
            return invalid("difficulty.max_speed", "must be at least initial_speed");
        }
        if d.speed_increase < 0.0 {
            return invalid("difficulty.speed_increase", "must not be negative");
        }
        if d.speed_interval == 0 {
            return invalid("difficulty.speed_interval", "must be positive");
        }
        if d.score_cue_interval == 0 {
            return invalid("difficulty.score_cue_interval", "must be positive");
        }
        if d.score_per_tick <= 0.0 {
            return invalid("difficulty.score_per_tick", "must be positive");
        }
        if (d.score_per_tick * SCORE_SCALE as f64).round() < 1.0 {
            return invalid("difficulty.score_per_tick", "below score resolution (0.001)");
        }
        Ok(())
    }

    /// Size and top-left y for an obstacle kind
    pub fn obstacle_geometry(&self, kind: ObstacleKind) -> (Vec2, f32) {
        let ground = self.field.ground_line_y;
        let o = &self.obstacles;
        match kind {
            ObstacleKind::CactusSmall => (o.cactus_small, ground - o.cactus_small.y),
            ObstacleKind::CactusLarge => (o.cactus_large, ground - o.cactus_large.y),
            ObstacleKind::BirdHigh => (o.bird, ground - o.bird_high_altitude),
            ObstacleKind::BirdLow => (o.bird, ground - o.bird_low_altitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RunnerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            RunnerConfig::from_json(r#"{ "difficulty": { "initial_speed": 5.0 } }"#).unwrap();
        assert_eq!(config.difficulty.initial_speed, 5.0);
        assert_eq!(config.difficulty.max_speed, 15.0);
        assert_eq!(config.character, CharacterConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = RunnerConfig::default();
        config.obstacles.min_gap = 250.0;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RunnerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_inverted_gap_range() {
        let err = RunnerConfig::from_json(
            r#"{ "obstacles": { "min_gap": 900.0, "max_gap": 100.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "obstacles.max_gap",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_downward_jump() {
        let mut config = RunnerConfig::default();
        config.character.jump_impulse = 4.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_score_step_below_resolution() {
        let mut config = RunnerConfig::default();
        config.difficulty.score_per_tick = 0.0004;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "difficulty.score_per_tick",
                ..
            })
        ));

        config.difficulty.score_per_tick = 0.001;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = RunnerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("malformed config"));
    }

    #[test]
    fn test_obstacle_geometry() {
        let config = RunnerConfig::default();
        let (size, y) = config.obstacle_geometry(ObstacleKind::CactusLarge);
        assert_eq!(size, Vec2::new(25.0, 50.0));
        assert_eq!(y, 120.0);

        let (high, high_y) = config.obstacle_geometry(ObstacleKind::BirdHigh);
        let (low, low_y) = config.obstacle_geometry(ObstacleKind::BirdLow);
        assert_eq!(high, low);
        assert_eq!(high_y, 90.0);
        assert_eq!(low_y, 130.0);
    }

    #[test]
    fn test_duck_profile_is_shorter() {
        let c = CharacterConfig::default();
        assert!(c.profile(CharacterMode::Ducking).height < c.profile(CharacterMode::Running).height);
        assert_eq!(c.profile(CharacterMode::Jumping).frame_ms, 0.0);
        assert_eq!(c.profile(CharacterMode::Dead).frame_ms, 0.0);
    }
}

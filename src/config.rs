//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] mirroring every constant in
//! [`crate::constants`]. The binary calls [`load_game_config`] before building
//! the app; missing keys fall back to the compiled defaults, so a minimal TOML
//! can override just the values you care about.
//!
//! Headless apps (the harness, unit tests) never touch the file system: they
//! get `GameConfig::default()` through `init_resource`, or an explicit config.

use crate::constants::*;
use crate::error::{validate_non_negative, validate_positive, validate_range, GameError, GameResult};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/game.toml";

/// Runtime-tunable gameplay configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Playfield ────────────────────────────────────────────────────────────
    pub field_width: f32,
    pub field_height: f32,
    pub cull_margin: f32,

    // ── Ship ─────────────────────────────────────────────────────────────────
    pub ship_y: f32,
    pub ship_speed: f32,
    pub ship_radius: f32,

    // ── Lasers ───────────────────────────────────────────────────────────────
    pub laser_speed: f32,
    pub laser_radius: f32,
    pub laser_lifetime: f32,
    pub fire_cooldown: f32,

    // ── Asteroids ────────────────────────────────────────────────────────────
    pub asteroid_radius_min: f32,
    pub asteroid_radius_max: f32,
    pub asteroid_speed_min: f32,
    pub asteroid_speed_max: f32,
    pub asteroid_drift: f32,
    pub spawn_interval: f32,

    // ── Scoring ──────────────────────────────────────────────────────────────
    pub points_per_asteroid: u32,

    // ── Simulation ───────────────────────────────────────────────────────────
    pub frame_rate: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            cull_margin: CULL_MARGIN,
            ship_y: SHIP_Y,
            ship_speed: SHIP_SPEED,
            ship_radius: SHIP_RADIUS,
            laser_speed: LASER_SPEED,
            laser_radius: LASER_RADIUS,
            laser_lifetime: LASER_LIFETIME,
            fire_cooldown: FIRE_COOLDOWN,
            asteroid_radius_min: ASTEROID_RADIUS_MIN,
            asteroid_radius_max: ASTEROID_RADIUS_MAX,
            asteroid_speed_min: ASTEROID_SPEED_MIN,
            asteroid_speed_max: ASTEROID_SPEED_MAX,
            asteroid_drift: ASTEROID_DRIFT,
            spawn_interval: SPAWN_INTERVAL,
            points_per_asteroid: POINTS_PER_ASTEROID,
            frame_rate: FRAME_RATE,
        }
    }
}

impl GameConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str, origin: &str) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(text).map_err(|e| GameError::ConfigParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the gameplay systems cannot work with.
    pub fn validate(&self) -> GameResult<()> {
        validate_positive("field_width", self.field_width)?;
        validate_positive("field_height", self.field_height)?;
        validate_non_negative("cull_margin", self.cull_margin)?;
        validate_positive("ship_speed", self.ship_speed)?;
        validate_positive("ship_radius", self.ship_radius)?;
        validate_positive("laser_speed", self.laser_speed)?;
        validate_positive("laser_radius", self.laser_radius)?;
        validate_positive("laser_lifetime", self.laser_lifetime)?;
        validate_non_negative("fire_cooldown", self.fire_cooldown)?;
        validate_positive("asteroid_radius_min", self.asteroid_radius_min)?;
        validate_range(
            "asteroid_radius_min",
            self.asteroid_radius_min,
            self.asteroid_radius_max,
        )?;
        // Asteroids must always fall.
        validate_positive("asteroid_speed_min", self.asteroid_speed_min)?;
        validate_range(
            "asteroid_speed_min",
            self.asteroid_speed_min,
            self.asteroid_speed_max,
        )?;
        validate_non_negative("asteroid_drift", self.asteroid_drift)?;
        validate_positive("spawn_interval", self.spawn_interval)?;
        if !(FRAME_RATE_MIN..=FRAME_RATE_MAX).contains(&self.frame_rate) {
            return Err(GameError::InvalidConfig {
                name: "frame_rate",
                value: self.frame_rate,
                expected: "[1.0, 1000.0]",
            });
        }
        if self.ship_y.abs() >= self.field_height / 2.0 {
            return Err(GameError::InvalidConfig {
                name: "ship_y",
                value: self.ship_y,
                expected: "inside ±field_height/2",
            });
        }
        Ok(())
    }

    pub fn half_width(&self) -> f32 {
        self.field_width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.field_height / 2.0
    }

    /// Where the ship sits at the start of every round.
    pub fn ship_home(&self) -> Vec3 {
        Vec3::new(0.0, self.ship_y, 0.0)
    }

    /// Duration of one simulated frame.
    pub fn frame_secs(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

/// Read and validate the config file at `path`.
///
/// A missing file is not an error: the compiled defaults are returned.
pub fn load_game_config(path: &Path) -> GameResult<GameConfig> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let config = GameConfig::from_toml_str(&contents, &path.display().to_string())?;
            println!("✓ Loaded game config from {}", path.display());
            Ok(config)
        }
        Err(_) => {
            // Missing file: defaults apply.
            println!("ℹ No {} found; using compiled defaults", path.display());
            Ok(GameConfig::default())
        }
    }
}

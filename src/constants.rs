//! Centralised gameplay constants.
//!
//! These are the compiled defaults behind [`crate::config::GameConfig`].
//! Override any of them at runtime through `assets/game.toml`.

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Width of the playfield (world units). The origin is the centre.
pub const FIELD_WIDTH: f32 = 480.0;

/// Height of the playfield (world units).
pub const FIELD_HEIGHT: f32 = 640.0;

/// Distance beyond the playfield edge at which asteroids and lasers are removed.
pub const CULL_MARGIN: f32 = 60.0;

// ── Ship ──────────────────────────────────────────────────────────────────────

/// Vertical position of the ship. Kept well below the origin so objects
/// placed at the origin do not touch it.
pub const SHIP_Y: f32 = -250.0;

/// Horizontal ship speed at full steer (u/s).
pub const SHIP_SPEED: f32 = 320.0;

/// Radius of the ship's sensor collider.
pub const SHIP_RADIUS: f32 = 14.0;

// ── Lasers ────────────────────────────────────────────────────────────────────

/// Laser travel speed along +Y (u/s).
pub const LASER_SPEED: f32 = 600.0;

/// Radius of the laser sensor collider.
pub const LASER_RADIUS: f32 = 4.0;

/// Seconds before an unspent laser is removed.
pub const LASER_LIFETIME: f32 = 2.0;

/// Minimum seconds between two player-fired lasers.
pub const FIRE_COOLDOWN: f32 = 0.25;

// ── Asteroids ─────────────────────────────────────────────────────────────────

/// Smallest asteroid radius.
pub const ASTEROID_RADIUS_MIN: f32 = 14.0;

/// Largest asteroid radius.
pub const ASTEROID_RADIUS_MAX: f32 = 30.0;

/// Slowest downward asteroid speed (u/s). Must stay positive: asteroids
/// always fall.
pub const ASTEROID_SPEED_MIN: f32 = 80.0;

/// Fastest downward asteroid speed (u/s).
pub const ASTEROID_SPEED_MAX: f32 = 160.0;

/// Maximum sideways drift (u/s), sampled in `[-drift, drift]`.
pub const ASTEROID_DRIFT: f32 = 25.0;

/// Seconds between two automatic asteroid spawns.
pub const SPAWN_INTERVAL: f32 = 1.0;

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Points awarded for each asteroid destroyed by a laser.
pub const POINTS_PER_ASTEROID: u32 = 1;

// ── Simulation ────────────────────────────────────────────────────────────────

/// Frames per simulated second used by the headless harness.
pub const FRAME_RATE: f32 = 60.0;

/// Accepted `frame_rate` bounds; outside them a frame is too long or rounds to zero.
pub const FRAME_RATE_MIN: f32 = 1.0;
pub const FRAME_RATE_MAX: f32 = 1000.0;

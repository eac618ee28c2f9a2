//! Headless gameplay harness.
//!
//! [`GameHarness`] owns a complete game instance running on [`MinimalPlugins`]
//! with a fixed, manually advanced clock. Every [`App::update`] moves the
//! simulation forward by exactly one frame, so a "wait" is a frame count and
//! runs are reproducible.
//!
//! ```no_run
//! use rockfall::harness::GameHarness;
//! use std::time::Duration;
//!
//! let mut game = GameHarness::new();
//! let laser = game.ship().spawn_laser()?;
//! let y0 = game.position(laser)?.y;
//! game.advance(Duration::from_millis(100));
//! assert!(game.position(laser)?.y > y0);
//! # Ok::<(), rockfall::error::GameError>(())
//! ```
//!
//! Dropping the harness tears the instance down, so a failed assertion
//! still releases it.

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::gameplay::GamePlugin;
use crate::session::{start_new_game, GameSession};
use crate::ship::{laser_bundle, muzzle_position, ship_bundle, Laser, Ship};
use crate::spawner::{random_asteroid, Asteroid, AsteroidSpawner};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

/// What kind of game object a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Ship,
    Laser,
    Asteroid,
}

/// Reference to a game object that may since have been destroyed.
///
/// Holding a handle never keeps the object alive; check
/// [`GameHarness::is_alive`] before assuming it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub entity: Entity,
    pub kind: ObjectKind,
}

/// A fresh, isolated game instance.
pub struct GameHarness {
    app: App,
    frame: Duration,
    ship: Entity,
    frames_stepped: u64,
}

impl Default for GameHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl GameHarness {
    /// Build an instance with the compiled default config.
    pub fn new() -> Self {
        Self::build(GameConfig::default())
    }

    /// Build an instance with a custom config, rejecting invalid values.
    pub fn with_config(config: GameConfig) -> GameResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: GameConfig) -> Self {
        let frame = Duration::from_secs_f32(config.frame_secs());

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::transform::TransformPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(frame))
            .insert_resource(config)
            .add_plugins(GamePlugin);
        app.finish();
        app.cleanup();

        // Run startup: physics context, zero gravity, ship spawn.
        app.update();

        let world = app.world_mut();
        let existing = world
            .query_filtered::<Entity, With<Ship>>()
            .iter(world)
            .next();
        let ship = match existing {
            Some(ship) => ship,
            None => {
                let config = world.resource::<GameConfig>().clone();
                warn!("No ship after startup; spawning one for the harness");
                world.spawn(ship_bundle(&config)).id()
            }
        };
        debug!("Game harness ready (ship {:?}, frame {:?})", ship, frame);

        Self {
            app,
            frame,
            ship,
            frames_stepped: 1,
        }
    }

    // ── Time ──────────────────────────────────────────────────────────────────

    /// Duration of one simulated frame.
    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Total frames simulated since construction, including startup.
    pub fn frames_stepped(&self) -> u64 {
        self.frames_stepped
    }

    /// Advance the simulation by `frames` frames.
    pub fn step(&mut self, frames: u32) {
        for _ in 0..frames {
            self.app.update();
        }
        self.frames_stepped += u64::from(frames);
    }

    /// Advance by at least `duration` of simulated time. Returns the frames run.
    pub fn advance(&mut self, duration: Duration) -> u32 {
        let frames = frames_for(duration, self.frame);
        self.step(frames);
        frames
    }

    /// Step until `done` holds, checking before the first frame and after
    /// every frame. Fails with [`GameError::Timeout`] once `timeout` of
    /// simulated time has passed without it holding.
    pub fn run_until(
        &mut self,
        timeout: Duration,
        mut done: impl FnMut(&mut GameHarness) -> bool,
    ) -> GameResult<u32> {
        let budget = frames_for(timeout, self.frame);
        if done(self) {
            return Ok(0);
        }
        for frame in 1..=budget {
            self.step(1);
            if done(self) {
                return Ok(frame);
            }
        }
        Err(GameError::Timeout {
            frames: budget,
            waited_secs: self.frame.as_secs_f32() * budget as f32,
        })
    }

    // ── Collaborators ─────────────────────────────────────────────────────────

    pub fn spawner(&mut self) -> SpawnerView<'_> {
        SpawnerView { harness: self }
    }

    pub fn ship(&mut self) -> ShipView<'_> {
        ShipView { harness: self }
    }

    // ── Object handles ────────────────────────────────────────────────────────

    pub fn is_alive(&self, handle: ObjectHandle) -> bool {
        self.app.world().get_entity(handle.entity).is_ok()
    }

    pub fn position(&self, handle: ObjectHandle) -> GameResult<Vec3> {
        self.app
            .world()
            .get::<Transform>(handle.entity)
            .map(|t| t.translation)
            .ok_or(GameError::EntityNotFound {
                context: "GameHarness::position",
            })
    }

    /// Teleport an object. Physics picks up the new position on the next frame.
    pub fn set_position(&mut self, handle: ObjectHandle, position: Vec3) -> GameResult<()> {
        let world = self.app.world_mut();
        let mut transform = world
            .get_mut::<Transform>(handle.entity)
            .ok_or(GameError::EntityNotFound {
                context: "GameHarness::set_position",
            })?;
        transform.translation = position;
        let global = GlobalTransform::from(*transform);
        if let Some(mut current) = world.get_mut::<GlobalTransform>(handle.entity) {
            *current = global;
        }
        Ok(())
    }

    // ── Round state ───────────────────────────────────────────────────────────

    pub fn session(&self) -> &GameSession {
        self.app.world().resource::<GameSession>()
    }

    pub fn session_mut(&mut self) -> Mut<'_, GameSession> {
        self.app.world_mut().resource_mut::<GameSession>()
    }

    pub fn is_game_over(&self) -> bool {
        self.session().is_game_over
    }

    pub fn set_game_over(&mut self, over: bool) {
        self.session_mut().is_game_over = over;
    }

    pub fn score(&self) -> u32 {
        self.session().score
    }

    pub fn set_score(&mut self, score: u32) {
        self.session_mut().score = score;
    }

    /// Start a new round immediately; no frame needs to run.
    pub fn new_game(&mut self) {
        start_new_game(self.app.world_mut());
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        self.app.world().resource::<GameConfig>()
    }

    pub fn asteroid_count(&mut self) -> usize {
        self.count::<Asteroid>()
    }

    pub fn laser_count(&mut self) -> usize {
        self.count::<Laser>()
    }

    /// Stop the periodic spawner so only explicitly spawned asteroids exist.
    pub fn disable_auto_spawn(&mut self) {
        self.app.world_mut().resource_mut::<AsteroidSpawner>().enabled = false;
    }

    /// Direct world access for checks the harness has no accessor for.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    fn count<C: Component>(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query_filtered::<Entity, With<C>>().iter(world).count()
    }

    /// Explicitly release the instance. Equivalent to dropping it.
    pub fn teardown(self) {}
}

impl Drop for GameHarness {
    fn drop(&mut self) {
        let world = self.app.world_mut();
        let doomed: Vec<Entity> = world
            .query_filtered::<Entity, Or<(With<Asteroid>, With<Laser>, With<Ship>)>>()
            .iter(world)
            .collect();
        let released = doomed.len();
        for entity in doomed {
            world.despawn(entity);
        }
        debug!(
            "Game harness torn down after {} frames ({} objects released)",
            self.frames_stepped, released
        );
    }
}

/// Frames needed to cover `duration`, rounding up.
pub fn frames_for(duration: Duration, frame: Duration) -> u32 {
    let frame_secs = frame.as_secs_f64();
    if frame_secs <= 0.0 {
        return 0;
    }
    // Tolerate float error so 0.1 s at 60 Hz is 6 frames, not 7.
    (duration.as_secs_f64() / frame_secs - 1e-6).ceil().max(0.0) as u32
}

/// Asteroid-spawning capability of a [`GameHarness`].
pub struct SpawnerView<'a> {
    harness: &'a mut GameHarness,
}

impl SpawnerView<'_> {
    /// Spawn one asteroid along the top edge, immediately.
    pub fn spawn_asteroid(self) -> ObjectHandle {
        let world = self.harness.app.world_mut();
        let config = world.resource::<GameConfig>().clone();
        let entity = world.spawn(random_asteroid(&config)).id();
        world.resource_mut::<AsteroidSpawner>().spawned += 1;
        ObjectHandle {
            entity,
            kind: ObjectKind::Asteroid,
        }
    }

    /// Total asteroids created so far, both periodic and explicit.
    pub fn spawned(&self) -> u64 {
        self.harness.app.world().resource::<AsteroidSpawner>().spawned
    }
}

/// Ship capability of a [`GameHarness`].
pub struct ShipView<'a> {
    harness: &'a mut GameHarness,
}

impl ShipView<'_> {
    pub fn handle(&self) -> ObjectHandle {
        ObjectHandle {
            entity: self.harness.ship,
            kind: ObjectKind::Ship,
        }
    }

    pub fn position(&self) -> GameResult<Vec3> {
        self.harness.position(self.handle())
    }

    /// Fire a laser from the ship's nose, immediately and ignoring cooldown.
    pub fn spawn_laser(self) -> GameResult<ObjectHandle> {
        let ship_pos = self.position()?;
        let world = self.harness.app.world_mut();
        let config = world.resource::<GameConfig>().clone();
        let origin = muzzle_position(ship_pos.truncate(), &config);
        let entity = world.spawn(laser_bundle(origin, &config)).id();
        Ok(ObjectHandle {
            entity,
            kind: ObjectKind::Laser,
        })
    }
}

//! Asteroid spawning, falling, and culling.
//!
//! Asteroids enter along the top edge of the playfield and fall. They are
//! dynamic Rapier bodies with gravity disabled; the downward motion comes
//! entirely from their initial [`Velocity`].
//!
//! Collision groups:
//! - `GROUP_1`: asteroids belong to this group
//! - collide with `GROUP_2` (ship) and `GROUP_3` (lasers); never with each other

use crate::config::GameConfig;
use crate::session::GameSession;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

/// Asteroid entity. `radius` matches the ball collider.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    pub radius: f32,
}

/// Polygon outline in local space, used by the renderer.
#[derive(Component, Debug, Clone)]
pub struct RockOutline(pub Vec<Vec2>);

/// Periodic asteroid spawner.
#[derive(Resource, Debug)]
pub struct AsteroidSpawner {
    pub timer: Timer,
    /// When `false` only explicit spawns happen.
    pub enabled: bool,
    /// Total asteroids created by this spawner since startup.
    pub spawned: u64,
}

impl AsteroidSpawner {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval_secs, TimerMode::Repeating),
            enabled: true,
            spawned: 0,
        }
    }

    /// Rewind the timer so a new round starts with a full interval.
    pub fn reset(&mut self) {
        self.timer.reset();
    }
}

/// Per-asteroid random parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidRoll {
    pub x: f32,
    pub radius: f32,
    pub fall_speed: f32,
    pub drift: f32,
}

impl AsteroidRoll {
    /// Sample spawn parameters within the configured ranges.
    pub fn sample(rng: &mut impl Rng, config: &GameConfig) -> Self {
        let radius = sample_between(rng, config.asteroid_radius_min, config.asteroid_radius_max);
        // Keep the whole rock inside the field horizontally.
        let max_x = (config.half_width() - radius).max(0.0);
        Self {
            x: sample_between(rng, -max_x, max_x),
            radius,
            fall_speed: sample_between(rng, config.asteroid_speed_min, config.asteroid_speed_max),
            drift: sample_between(rng, -config.asteroid_drift, config.asteroid_drift),
        }
    }

    /// Entry point just above the visible top edge.
    pub fn position(&self, config: &GameConfig) -> Vec2 {
        Vec2::new(self.x, config.half_height() + self.radius)
    }
}

fn sample_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Jagged convex-ish outline for rendering: `sides` vertices jittered ±15 %.
pub fn jagged_outline(rng: &mut impl Rng, radius: f32, sides: usize) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = (i as f32) * std::f32::consts::TAU / (sides as f32);
            let r = radius * rng.gen_range(0.85..1.15);
            Vec2::new(angle.cos() * r, angle.sin() * r)
        })
        .collect()
}

/// Component bundle for one asteroid (the asteroid "prefab").
pub fn asteroid_bundle(roll: &AsteroidRoll, config: &GameConfig, outline: Vec<Vec2>) -> impl Bundle {
    let transform = Transform::from_translation(roll.position(config).extend(0.0));
    (
        (
            Asteroid {
                radius: roll.radius,
            },
            RockOutline(outline),
            transform,
            GlobalTransform::from(transform),
            Visibility::default(),
        ),
        (
            RigidBody::Dynamic,
            Collider::ball(roll.radius),
            Velocity {
                linvel: Vec2::new(roll.drift, -roll.fall_speed),
                angvel: 0.0,
            },
            GravityScale(0.0),
            Damping {
                linear_damping: 0.0,
                angular_damping: 0.0,
            },
            CollisionGroups::new(
                bevy_rapier2d::geometry::Group::GROUP_1,
                bevy_rapier2d::geometry::Group::GROUP_2 | bevy_rapier2d::geometry::Group::GROUP_3,
            ),
            ActiveEvents::COLLISION_EVENTS,
            Sleeping::disabled(),
        ),
    )
}

/// Asteroid bundle with a random column, size, speed and outline.
pub fn random_asteroid(config: &GameConfig) -> impl Bundle {
    let mut rng = rand::thread_rng();
    let roll = AsteroidRoll::sample(&mut rng, config);
    let sides = rng.gen_range(7..11);
    let outline = jagged_outline(&mut rng, roll.radius, sides);
    asteroid_bundle(&roll, config, outline)
}

/// Spawn one asteroid at a random column along the top edge.
pub fn spawn_asteroid(commands: &mut Commands, config: &GameConfig) -> Entity {
    commands.spawn(random_asteroid(config)).id()
}

/// Spawn asteroids on the spawner's interval while the round is running.
pub fn asteroid_spawn_system(
    mut commands: Commands,
    mut spawner: ResMut<AsteroidSpawner>,
    session: Res<GameSession>,
    time: Res<Time>,
    config: Res<GameConfig>,
) {
    if !spawner.enabled || session.is_game_over {
        return;
    }
    spawner.timer.tick(time.delta());
    for _ in 0..spawner.timer.times_finished_this_tick() {
        let entity = spawn_asteroid(&mut commands, &config);
        spawner.spawned += 1;
        debug!("Spawned asteroid {:?} (#{})", entity, spawner.spawned);
    }
}

/// Remove asteroids that have fallen past the bottom edge.
pub fn cull_asteroids_system(
    mut commands: Commands,
    query: Query<(Entity, &Transform, &Asteroid)>,
    config: Res<GameConfig>,
) {
    let floor = -config.half_height() - config.cull_margin;
    for (entity, transform, asteroid) in query.iter() {
        if transform.translation.y + asteroid.radius < floor {
            commands.entity(entity).despawn();
        }
    }
}

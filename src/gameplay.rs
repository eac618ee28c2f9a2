//! Gameplay plugin: physics, round state, ship, spawner and collision systems.
//!
//! Everything here runs headless. Windowed presentation and keyboard input
//! live in [`crate::rendering`] and are added only by the binary.

use crate::collision::{laser_asteroid_hit_system, ship_asteroid_hit_system};
use crate::config::GameConfig;
use crate::session::{game_running, GameSession};
use crate::ship::{
    apply_ship_intent_system, expire_lasers_system, fire_laser_system, spawn_ship, FireCooldown,
    ShipIntent,
};
use crate::spawner::{asteroid_spawn_system, cull_asteroids_system, AsteroidSpawner};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        // A config inserted before the plugin wins over the defaults.
        app.init_resource::<GameConfig>()
            .init_resource::<GameSession>()
            .init_resource::<ShipIntent>()
            .init_resource::<FireCooldown>();

        let interval = app.world().resource::<GameConfig>().spawn_interval;
        app.insert_resource(AsteroidSpawner::new(interval))
            // pixels_per_meter(1.0) keeps world units and physics units identical.
            .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
            .add_systems(Startup, (disable_gravity, spawn_ship))
            .add_systems(
                Update,
                (
                    (apply_ship_intent_system, fire_laser_system, asteroid_spawn_system)
                        .run_if(game_running),
                    (laser_asteroid_hit_system, ship_asteroid_hit_system),
                    (expire_lasers_system, cull_asteroids_system),
                )
                    .chain(),
            );
    }
}

/// Startup: space has no gravity; asteroids fall on their own velocity.
fn disable_gravity(mut config: Query<&mut RapierConfiguration>) {
    for mut cfg in config.iter_mut() {
        cfg.gravity = Vec2::ZERO;
    }
}

//! The player's ship, its movement, and the lasers it fires.
//!
//! Collision groups:
//! - `GROUP_2`: ship; collides with `GROUP_1` (asteroids) only
//! - `GROUP_3`: lasers; collide with `GROUP_1` (asteroids) only, never the ship
//!
//! Both are sensors: contact with an asteroid raises a collision event for
//! game logic but never pushes the asteroid.

use crate::config::GameConfig;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the ship entity.
#[derive(Component, Debug)]
pub struct Ship;

/// Per-laser state.
#[derive(Component, Debug, Default)]
pub struct Laser {
    /// Seconds since this laser was spawned.
    pub age: f32,
}

// ── Resources ──────────────────────────────────────────────────────────────────

/// What the pilot wants this frame, independent of the input device.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipIntent {
    /// Horizontal steer in `[-1, 1]`; negative is left.
    pub steer: f32,
    pub fire: bool,
}

/// Seconds until the ship may fire again.
#[derive(Resource, Debug, Default)]
pub struct FireCooldown {
    pub remaining: f32,
}

// ── Prefabs ────────────────────────────────────────────────────────────────────

/// Component bundle for the ship.
pub fn ship_bundle(config: &GameConfig) -> impl Bundle {
    let transform = Transform::from_translation(config.ship_home());
    (
        Ship,
        transform,
        GlobalTransform::from(transform),
        Visibility::default(),
        RigidBody::KinematicPositionBased,
        Collider::ball(config.ship_radius),
        Sensor,
        CollisionGroups::new(
            bevy_rapier2d::geometry::Group::GROUP_2,
            bevy_rapier2d::geometry::Group::GROUP_1,
        ),
        ActiveCollisionTypes::DYNAMIC_KINEMATIC,
        ActiveEvents::COLLISION_EVENTS,
    )
}

/// Where a laser leaves the ship: just clear of the ship's nose.
pub fn muzzle_position(ship_pos: Vec2, config: &GameConfig) -> Vec2 {
    ship_pos + Vec2::Y * (config.ship_radius + config.laser_radius + 2.0)
}

/// Component bundle for one laser starting at `position`.
pub fn laser_bundle(position: Vec2, config: &GameConfig) -> impl Bundle {
    let transform = Transform::from_translation(position.extend(0.0));
    (
        Laser::default(),
        transform,
        GlobalTransform::from(transform),
        Visibility::default(),
        RigidBody::KinematicVelocityBased,
        Velocity {
            linvel: Vec2::Y * config.laser_speed,
            angvel: 0.0,
        },
        Collider::ball(config.laser_radius),
        Sensor,
        CollisionGroups::new(
            bevy_rapier2d::geometry::Group::GROUP_3,
            bevy_rapier2d::geometry::Group::GROUP_1,
        ),
        ActiveCollisionTypes::DYNAMIC_KINEMATIC,
        ActiveEvents::COLLISION_EVENTS,
    )
}

// ── Systems ────────────────────────────────────────────────────────────────────

/// Startup: spawn the ship at its home position.
pub fn spawn_ship(mut commands: Commands, config: Res<GameConfig>) {
    let ship = commands.spawn(ship_bundle(&config)).id();
    info!("Ship {:?} spawned at {}", ship, config.ship_home());
}

/// Slide the ship horizontally according to [`ShipIntent::steer`], clamped
/// to the playfield.
pub fn apply_ship_intent_system(
    mut q_ship: Query<&mut Transform, With<Ship>>,
    intent: Res<ShipIntent>,
    time: Res<Time>,
    config: Res<GameConfig>,
) {
    let Ok(mut transform) = q_ship.single_mut() else {
        return;
    };
    let steer = intent.steer.clamp(-1.0, 1.0);
    if steer == 0.0 {
        return;
    }
    let limit = config.half_width() - config.ship_radius;
    let x = transform.translation.x + steer * config.ship_speed * time.delta_secs();
    transform.translation.x = x.clamp(-limit, limit);
}

/// Fire a laser while [`ShipIntent::fire`] is held and the cooldown allows.
pub fn fire_laser_system(
    mut commands: Commands,
    q_ship: Query<&Transform, With<Ship>>,
    intent: Res<ShipIntent>,
    mut cooldown: ResMut<FireCooldown>,
    time: Res<Time>,
    config: Res<GameConfig>,
) {
    cooldown.remaining = (cooldown.remaining - time.delta_secs()).max(0.0);

    if !intent.fire || cooldown.remaining > 0.0 {
        return;
    }
    let Ok(transform) = q_ship.single() else {
        return;
    };
    cooldown.remaining = config.fire_cooldown;

    let origin = muzzle_position(transform.translation.truncate(), &config);
    commands.spawn(laser_bundle(origin, &config));
}

/// Age lasers and remove the ones that expired or left the top of the field.
pub fn expire_lasers_system(
    mut commands: Commands,
    mut q: Query<(Entity, &mut Laser, &Transform)>,
    time: Res<Time>,
    config: Res<GameConfig>,
) {
    let ceiling = config.half_height() + config.cull_margin;
    for (entity, mut laser, transform) in q.iter_mut() {
        laser.age += time.delta_secs();
        if laser.age > config.laser_lifetime || transform.translation.y > ceiling {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn ship_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(GameConfig::default());
        app.insert_resource(ShipIntent::default());
        app.insert_resource(FireCooldown::default());
        app
    }

    fn laser_count(world: &mut World) -> usize {
        world
            .query_filtered::<Entity, With<Laser>>()
            .iter(world)
            .count()
    }

    #[test]
    fn muzzle_is_above_ship() {
        let config = GameConfig::default();
        let muzzle = muzzle_position(Vec2::new(10.0, -250.0), &config);
        assert_eq!(muzzle.x, 10.0);
        assert!(muzzle.y > -250.0 + config.ship_radius);
    }

    #[test]
    fn steering_is_clamped_to_the_field() {
        let mut app = ship_test_app();
        app.add_systems(Update, apply_ship_intent_system);
        let ship = app
            .world_mut()
            .spawn((Ship, Transform::from_translation(GameConfig::default().ship_home())))
            .id();
        app.world_mut().resource_mut::<ShipIntent>().steer = 1.0;

        for _ in 0..50 {
            app.update();
        }

        let config = GameConfig::default();
        let x = app.world().get::<Transform>(ship).unwrap().translation.x;
        assert!((x - (config.half_width() - config.ship_radius)).abs() < 1e-3);
    }

    #[test]
    fn holding_fire_respects_cooldown() {
        let mut app = ship_test_app();
        app.add_systems(Update, fire_laser_system);
        app.world_mut()
            .spawn((Ship, Transform::from_translation(GameConfig::default().ship_home())));
        app.world_mut().resource_mut::<ShipIntent>().fire = true;

        // 0.25 s cooldown at 0.1 s per frame: shots on frames 1, 4, 7.
        for _ in 0..7 {
            app.update();
        }
        let fired = laser_count(app.world_mut());
        assert!(
            (2..=3).contains(&fired),
            "expected cooldown-limited fire, got {fired}"
        );
    }

    #[test]
    fn no_ship_no_laser() {
        let mut app = ship_test_app();
        app.add_systems(Update, fire_laser_system);
        app.world_mut().resource_mut::<ShipIntent>().fire = true;
        app.update();
        assert_eq!(laser_count(app.world_mut()), 0);
    }

    #[test]
    fn lasers_expire_above_the_field() {
        let mut app = ship_test_app();
        app.add_systems(Update, expire_lasers_system);
        let gone = app
            .world_mut()
            .spawn((Laser::default(), Transform::from_xyz(0.0, 2000.0, 0.0)))
            .id();
        let kept = app
            .world_mut()
            .spawn((Laser::default(), Transform::from_xyz(0.0, 0.0, 0.0)))
            .id();

        app.update();

        assert!(app.world().get_entity(gone).is_err());
        assert!(app.world().get_entity(kept).is_ok());
    }
}

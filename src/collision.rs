//! Collision callbacks: lasers destroying asteroids and asteroids ending the round.
//!
//! Both systems read Rapier's [`CollisionEvent`] messages. Only `Started`
//! events matter; `Stopped` fires again when a participant is despawned and
//! is ignored.

use crate::config::GameConfig;
use crate::session::GameSession;
use crate::ship::{Laser, Ship};
use crate::spawner::Asteroid;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

/// Pick out the `(a, b)` pair of a `Started` event in the order given by the
/// two membership tests, or `None` if the event does not pair an `A` with a `B`.
pub fn match_pair(
    event: &CollisionEvent,
    is_a: impl Fn(Entity) -> bool,
    is_b: impl Fn(Entity) -> bool,
) -> Option<(Entity, Entity)> {
    let (e1, e2) = match event {
        CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
        CollisionEvent::Stopped(..) => return None,
    };
    if is_a(e1) && is_b(e2) {
        Some((e1, e2))
    } else if is_a(e2) && is_b(e1) {
        Some((e2, e1))
    } else {
        None
    }
}

/// Destroy asteroid and laser on contact and award points.
///
/// Each laser and each asteroid is consumed at most once, so a single
/// collision can never score twice.
pub fn laser_asteroid_hit_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    q_lasers: Query<(), With<Laser>>,
    q_asteroids: Query<(), With<Asteroid>>,
    mut session: ResMut<GameSession>,
    config: Res<GameConfig>,
) {
    let mut consumed: HashSet<Entity> = HashSet::new();

    for event in collision_events.read() {
        let Some((laser, asteroid)) = match_pair(
            event,
            |e| q_lasers.contains(e),
            |e| q_asteroids.contains(e),
        ) else {
            continue;
        };
        if consumed.contains(&laser) || consumed.contains(&asteroid) {
            continue;
        }
        consumed.insert(laser);
        consumed.insert(asteroid);

        commands.entity(laser).despawn();
        commands.entity(asteroid).despawn();
        session.award(config.points_per_asteroid);
        debug!("Laser {:?} destroyed asteroid {:?}; score {}", laser, asteroid, session.score);
    }
}

/// End the round when an asteroid reaches the ship.
pub fn ship_asteroid_hit_system(
    mut collision_events: MessageReader<CollisionEvent>,
    q_ship: Query<(), With<Ship>>,
    q_asteroids: Query<(), With<Asteroid>>,
    mut session: ResMut<GameSession>,
) {
    for event in collision_events.read() {
        let Some((_ship, asteroid)) = match_pair(
            event,
            |e| q_ship.contains(e),
            |e| q_asteroids.contains(e),
        ) else {
            continue;
        };
        if session.end_game() {
            info!(
                "Game over: ship hit by asteroid {:?} (score {}, best {})",
                asteroid, session.score, session.best_score
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

    fn collision_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CollisionEvent>();
        app.insert_resource(GameConfig::default());
        app.insert_resource(GameSession::default());
        app.add_systems(Update, (laser_asteroid_hit_system, ship_asteroid_hit_system));
        app
    }

    fn started(a: Entity, b: Entity) -> CollisionEvent {
        CollisionEvent::Started(a, b, CollisionEventFlags::SENSOR)
    }

    #[test]
    fn laser_hit_despawns_both_and_scores_once() {
        let mut app = collision_test_app();
        let asteroid = app.world_mut().spawn(Asteroid { radius: 10.0 }).id();
        let laser = app.world_mut().spawn(Laser::default()).id();

        app.world_mut().write_message(started(asteroid, laser));
        app.update();

        assert!(app.world().get_entity(asteroid).is_err());
        assert!(app.world().get_entity(laser).is_err());
        assert_eq!(app.world().resource::<GameSession>().score, 1);
    }

    #[test]
    fn duplicate_events_score_once() {
        let mut app = collision_test_app();
        let asteroid = app.world_mut().spawn(Asteroid { radius: 10.0 }).id();
        let laser = app.world_mut().spawn(Laser::default()).id();

        app.world_mut().write_message(started(laser, asteroid));
        app.world_mut().write_message(started(asteroid, laser));
        app.update();

        assert_eq!(app.world().resource::<GameSession>().score, 1);
    }

    #[test]
    fn one_laser_cannot_destroy_two_asteroids() {
        let mut app = collision_test_app();
        let first = app.world_mut().spawn(Asteroid { radius: 10.0 }).id();
        let second = app.world_mut().spawn(Asteroid { radius: 10.0 }).id();
        let laser = app.world_mut().spawn(Laser::default()).id();

        app.world_mut().write_message(started(laser, first));
        app.world_mut().write_message(started(laser, second));
        app.update();

        assert!(app.world().get_entity(first).is_err());
        assert!(app.world().get_entity(second).is_ok());
        assert_eq!(app.world().resource::<GameSession>().score, 1);
    }

    #[test]
    fn stopped_events_are_ignored() {
        let mut app = collision_test_app();
        let asteroid = app.world_mut().spawn(Asteroid { radius: 10.0 }).id();
        let laser = app.world_mut().spawn(Laser::default()).id();

        app.world_mut().write_message(CollisionEvent::Stopped(
            asteroid,
            laser,
            CollisionEventFlags::SENSOR,
        ));
        app.update();

        assert!(app.world().get_entity(asteroid).is_ok());
        assert_eq!(app.world().resource::<GameSession>().score, 0);
    }

    #[test]
    fn asteroid_on_ship_ends_the_game() {
        let mut app = collision_test_app();
        let ship = app.world_mut().spawn(Ship).id();
        let asteroid = app.world_mut().spawn(Asteroid { radius: 10.0 }).id();

        app.world_mut().write_message(started(ship, asteroid));
        app.update();

        let session = app.world().resource::<GameSession>();
        assert!(session.is_game_over);
        // The asteroid is left in place; only lasers destroy asteroids.
        assert!(app.world().get_entity(asteroid).is_ok());
    }

    #[test]
    fn laser_on_ship_is_not_a_game_over() {
        let mut app = collision_test_app();
        let ship = app.world_mut().spawn(Ship).id();
        let laser = app.world_mut().spawn(Laser::default()).id();

        app.world_mut().write_message(started(ship, laser));
        app.update();

        assert!(!app.world().resource::<GameSession>().is_game_over);
    }
}

//! Round state: the game-over flag, the score, and starting a new game.

use crate::config::GameConfig;
use crate::ship::{FireCooldown, Laser, Ship, ShipIntent};
use crate::spawner::{Asteroid, AsteroidSpawner};
use bevy::prelude::*;

/// Score and game-over state of the current round.
///
/// Fields are public: the HUD reads them, the collision systems write them,
/// and tests may set them directly.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    pub is_game_over: bool,
    pub score: u32,
    /// Highest score reached by any finished round.
    pub best_score: u32,
    /// Incremented by every [`GameSession::new_game`].
    pub round: u32,
}

impl GameSession {
    /// Reset the round. Synchronous: the flag is clear when this returns.
    ///
    /// The outgoing score still counts towards `best_score`.
    pub fn new_game(&mut self) {
        self.best_score = self.best_score.max(self.score);
        self.is_game_over = false;
        self.score = 0;
        self.round += 1;
    }

    /// Mark the round as over. Returns `false` if it already was.
    pub fn end_game(&mut self) -> bool {
        if self.is_game_over {
            return false;
        }
        self.is_game_over = true;
        self.best_score = self.best_score.max(self.score);
        true
    }

    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

/// Run condition: gameplay systems that create things only run mid-round.
pub fn game_running(session: Res<GameSession>) -> bool {
    !session.is_game_over
}

/// Clear the playfield and begin a fresh round.
///
/// Despawns every asteroid and laser, returns the ship to its home position,
/// rewinds the spawner, and finally resets [`GameSession`].
pub fn start_new_game(world: &mut World) {
    let doomed: Vec<Entity> = world
        .query_filtered::<Entity, Or<(With<Asteroid>, With<Laser>)>>()
        .iter(world)
        .collect();
    let cleared = doomed.len();
    for entity in doomed {
        world.despawn(entity);
    }

    let home = world.resource::<GameConfig>().ship_home();
    let mut ships = world.query_filtered::<(&mut Transform, &mut GlobalTransform), With<Ship>>();
    for (mut transform, mut global) in ships.iter_mut(world) {
        transform.translation = home;
        *global = GlobalTransform::from(*transform);
    }

    if let Some(mut spawner) = world.get_resource_mut::<AsteroidSpawner>() {
        spawner.reset();
    }
    if let Some(mut cooldown) = world.get_resource_mut::<FireCooldown>() {
        cooldown.remaining = 0.0;
    }
    if let Some(mut intent) = world.get_resource_mut::<ShipIntent>() {
        *intent = ShipIntent::default();
    }

    let mut session = world.resource_mut::<GameSession>();
    session.new_game();
    info!(
        "New game started (round {}, cleared {} objects)",
        session.round, cleared
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_clears_game_over_and_score() {
        let mut session = GameSession {
            is_game_over: true,
            score: 7,
            ..Default::default()
        };
        session.new_game();
        assert!(!session.is_game_over);
        assert_eq!(session.score, 0);
        assert_eq!(session.round, 1);
        assert_eq!(session.best_score, 7);
    }

    #[test]
    fn end_game_is_idempotent_and_tracks_best() {
        let mut session = GameSession::default();
        session.award(4);
        assert!(session.end_game());
        assert!(!session.end_game(), "second end_game must be a no-op");
        assert_eq!(session.best_score, 4);

        session.new_game();
        session.award(2);
        session.end_game();
        assert_eq!(session.best_score, 4, "lower score must not replace best");
    }

    #[test]
    fn award_saturates() {
        let mut session = GameSession {
            score: u32::MAX - 1,
            ..Default::default()
        };
        session.award(5);
        assert_eq!(session.score, u32::MAX);
    }

    #[test]
    fn start_new_game_clears_playfield() {
        let mut world = World::new();
        world.insert_resource(GameConfig::default());
        world.insert_resource(GameSession {
            is_game_over: true,
            score: 3,
            ..Default::default()
        });
        world.spawn((Asteroid { radius: 10.0 }, Transform::default()));
        world.spawn((Laser::default(), Transform::default()));
        let ship = world
            .spawn((Ship, Transform::from_xyz(120.0, -250.0, 0.0)))
            .id();

        start_new_game(&mut world);

        let session = world.resource::<GameSession>();
        assert!(!session.is_game_over);
        assert_eq!(session.score, 0);
        let leftovers = world
            .query_filtered::<Entity, Or<(With<Asteroid>, With<Laser>)>>()
            .iter(&world)
            .count();
        assert_eq!(leftovers, 0);
        let ship_pos = world.get::<Transform>(ship).unwrap().translation;
        assert_eq!(ship_pos, GameConfig::default().ship_home());
    }
}

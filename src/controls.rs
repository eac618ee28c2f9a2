//! Keyboard controls for the windowed game.
//!
//! | Key               | Action                       |
//! |-------------------|------------------------------|
//! | ← / A, → / D      | Steer the ship               |
//! | Space             | Fire (held: auto-fire)       |
//! | Enter             | New game after a game over   |
//! | Escape            | Quit                         |
//!
//! Input is translated into [`ShipIntent`]; the gameplay systems never read
//! the keyboard directly.

use crate::session::{start_new_game, GameSession};
use crate::ship::{apply_ship_intent_system, fire_laser_system, ShipIntent};
use bevy::prelude::*;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                keyboard_to_intent_system
                    .before(apply_ship_intent_system)
                    .before(fire_laser_system),
                new_game_key_system,
                quit_key_system,
            ),
        );
    }
}

/// Map the arrow keys / A-D and Space onto [`ShipIntent`].
pub fn keyboard_to_intent_system(keys: Res<ButtonInput<KeyCode>>, mut intent: ResMut<ShipIntent>) {
    let left = keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]);
    let right = keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]);
    intent.steer = match (left, right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    intent.fire = keys.pressed(KeyCode::Space);
}

/// Enter restarts once the round is over.
pub fn new_game_key_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<GameSession>,
) {
    if session.is_game_over && keys.just_pressed(KeyCode::Enter) {
        commands.queue(start_new_game);
    }
}

pub fn quit_key_system(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn controls_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<KeyCode>>();
        app.insert_resource(ShipIntent::default());
        app.insert_resource(GameConfig::default());
        app.insert_resource(GameSession::default());
        app.add_systems(Update, (keyboard_to_intent_system, new_game_key_system));
        app
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let mut app = controls_test_app();
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::ArrowLeft);
            keys.press(KeyCode::KeyD);
            keys.press(KeyCode::Space);
        }
        app.update();

        let intent = *app.world().resource::<ShipIntent>();
        assert_eq!(intent.steer, 0.0);
        assert!(intent.fire);
    }

    #[test]
    fn enter_restarts_only_after_game_over() {
        let mut app = controls_test_app();
        app.world_mut().resource_mut::<GameSession>().score = 3;
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Enter);
        app.update();
        assert_eq!(
            app.world().resource::<GameSession>().score,
            3,
            "Enter mid-round must not reset"
        );

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.release(KeyCode::Enter);
            keys.clear();
        }
        app.world_mut().resource_mut::<GameSession>().is_game_over = true;
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Enter);
        app.update();

        let session = app.world().resource::<GameSession>();
        assert!(!session.is_game_over);
        assert_eq!(session.score, 0);
    }
}

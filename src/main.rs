use bevy::prelude::*;
use bevy::window::WindowResolution;
use rockfall::config::{load_game_config, GameConfig, CONFIG_PATH};
use rockfall::controls::ControlsPlugin;
use rockfall::gameplay::GamePlugin;
use rockfall::rendering::RenderingPlugin;
use std::path::Path;

fn main() {
    let config = match load_game_config(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("⚠ {e}; using defaults");
            GameConfig::default()
        }
    };

    // Leave a small margin around the playfield.
    let width = (config.field_width + 40.0) as u32;
    let height = (config.field_height + 40.0) as u32;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Rockfall".into(),
                resolution: WindowResolution::new(width, height),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Inserted before GamePlugin so it replaces the compiled defaults.
        .insert_resource(config)
        .add_plugins((GamePlugin, ControlsPlugin, RenderingPlugin))
        .run();
}

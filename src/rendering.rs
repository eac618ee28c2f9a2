//! Windowed presentation: camera, filled meshes, laser gizmos, and the HUD.
//!
//! ## System Responsibilities
//!
//! | System                        | Schedule | Purpose                               |
//! |-------------------------------|----------|---------------------------------------|
//! | `setup_camera`                | Startup  | Spawn the 2D camera                   |
//! | `setup_hud`                   | Startup  | Spawn score text and game-over banner |
//! | `attach_asteroid_mesh_system` | Update   | Give new asteroids a filled polygon   |
//! | `attach_ship_mesh_system`     | Update   | Give the ship its dart mesh           |
//! | `gizmo_rendering_system`      | Update   | Field border and laser bolts          |
//! | `hud_score_display_system`    | Update   | Refresh score text                    |
//! | `game_over_banner_system`     | Update   | Show/hide the banner                  |
//!
//! Requires `DefaultPlugins`; never add this plugin to a headless app.

use crate::config::GameConfig;
use crate::session::GameSession;
use crate::ship::{Laser, Ship};
use crate::spawner::{Asteroid, RockOutline};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, setup_hud))
            .add_systems(
                Update,
                (
                    attach_asteroid_mesh_system,
                    attach_ship_mesh_system,
                    gizmo_rendering_system,
                    hud_score_display_system,
                    game_over_banner_system,
                ),
            );
    }
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Marker for the score HUD text.
#[derive(Component)]
pub struct HudScoreDisplay;

/// Marker for the game-over banner root node.
#[derive(Component)]
pub struct GameOverBanner;

// ── Startup ───────────────────────────────────────────────────────────────────

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("Score: 0"),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.9, 1.0)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudScoreDisplay,
    ));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
            Visibility::Hidden,
            GameOverBanner,
        ))
        .with_children(|banner| {
            banner.spawn((
                Text::new("GAME OVER"),
                TextFont {
                    font_size: 46.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.22, 0.22)),
            ));
            banner.spawn((
                Text::new("Press Enter for a new game"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.75)),
            ));
        });
}

// ── Spawn-time mesh attachment ────────────────────────────────────────────────

/// Attach a filled polygon mesh to every newly spawned asteroid.
pub fn attach_asteroid_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &RockOutline), Added<Asteroid>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, outline) in query.iter() {
        if outline.0.len() < 3 {
            continue;
        }
        let mesh = meshes.add(filled_polygon_mesh(&outline.0));
        let material = materials.add(ColorMaterial::from_color(rock_color(entity.index())));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh), MeshMaterial2d(material)));
    }
}

/// Attach the dart mesh to the ship on spawn.
pub fn attach_ship_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Ship>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for entity in query.iter() {
        let mesh = meshes.add(filled_polygon_mesh(&ship_vertices()));
        let material = materials.add(ColorMaterial::from_color(Color::srgb(0.35, 0.8, 1.0)));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh), MeshMaterial2d(material)));
    }
}

// ── Per-frame drawing ─────────────────────────────────────────────────────────

/// Field border and laser bolts.
pub fn gizmo_rendering_system(
    mut gizmos: Gizmos,
    lasers: Query<&Transform, With<Laser>>,
    config: Res<GameConfig>,
) {
    gizmos.rect_2d(
        Vec2::ZERO,
        Vec2::new(config.field_width, config.field_height),
        Color::srgb(0.2, 0.2, 0.3),
    );

    let half_len = config.laser_radius * 2.5;
    for transform in lasers.iter() {
        let pos = transform.translation.truncate();
        gizmos.line_2d(
            pos - Vec2::Y * half_len,
            pos + Vec2::Y * half_len,
            Color::srgb(1.0, 0.35, 0.35),
        );
    }
}

pub fn hud_score_display_system(
    session: Res<GameSession>,
    mut query: Query<&mut Text, With<HudScoreDisplay>>,
) {
    if !session.is_changed() {
        return;
    }
    for mut text in query.iter_mut() {
        text.0 = score_line(&session);
    }
}

pub fn game_over_banner_system(
    session: Res<GameSession>,
    mut query: Query<&mut Visibility, With<GameOverBanner>>,
) {
    if !session.is_changed() {
        return;
    }
    let visibility = if session.is_game_over {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    for mut vis in query.iter_mut() {
        *vis = visibility;
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// HUD text for the current session.
pub fn score_line(session: &GameSession) -> String {
    if session.best_score > 0 {
        format!("Score: {}   Best: {}", session.score, session.best_score)
    } else {
        format!("Score: {}", session.score)
    }
}

/// Local-space ship outline; the nose points along +Y.
fn ship_vertices() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 16.0),
        Vec2::new(-11.0, -10.0),
        Vec2::new(0.0, -5.0),
        Vec2::new(11.0, -10.0),
    ]
}

/// Fan-triangulate a star-shaped polygon (every vertex visible from the
/// centroid) into a renderable [`Mesh`].
pub fn filled_polygon_mesh(vertices: &[Vec2]) -> Mesh {
    let n = vertices.len();
    let centroid = vertices.iter().copied().sum::<Vec2>() / n.max(1) as f32;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    positions.push([centroid.x, centroid.y, 0.0]);
    positions.extend(vertices.iter().map(|v| [v.x, v.y, 0.0]));
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n + 1];
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| [(p[0] / 100.0) + 0.5, (p[1] / 100.0) + 0.5])
        .collect();

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let next = (i + 1) % n as u32;
        indices.extend_from_slice(&[0, i + 1, next + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Grey-brown rock tone seeded by the entity index.
fn rock_color(seed: u32) -> Color {
    // Knuth multiplicative hash → 0.0–1.0
    let h = seed.wrapping_mul(2_654_435_761);
    let t = (h >> 16) as f32 / 65_535.0;
    let lum = 0.3 + t * 0.2;
    Color::srgb(lum + 0.05, lum + 0.02, lum)
}

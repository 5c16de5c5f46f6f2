//! NitroRace - arcade racing with nitro boosts
//!
//! The player drives against AI opponents on a ring track:
//! 1. Arrows/WASD to drive, Space to brake, Shift for nitro
//! 2. 'C' switches between chase and cockpit camera
//! 3. 'R' puts the car back on the start line
//!
//! Race options are read from an optional `race.yaml`.

use bevy::prelude::*;

use nitrorace::car::CarPlugin;
use nitrorace::hud::HudPlugin;
use nitrorace::input::PlayerInputPlugin;
use nitrorace::settings::RaceSettings;
use nitrorace::track::{Track, TrackPlugin};
use nitrorace::VehicleSimPlugin;

fn main() {
    let settings = RaceSettings::load_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "NitroRace".into(),
                resolution: (1280, 720).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(settings)
        .add_plugins((
            VehicleSimPlugin,
            TrackPlugin,
            CarPlugin,
            PlayerInputPlugin,
            HudPlugin,
        ))
        .add_systems(Startup, setup_scene)
        .run();
}

/// Sets up the camera, lighting and the track surface
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    track: Res<Track>,
) {
    // Spawn a 3D camera; the player's camera rig moves it every frame
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 10.0, -20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Track surface
    let size = track.outer_half_extent * 2.0;
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.2, 0.2),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_translation(track.origin),
    ));

    // Add ambient light
    commands.spawn((
        AmbientLight {
            color: Color::WHITE,
            brightness: 500.0,
            affects_lightmapped_meshes: true,
        },
    ));

    // Add directional light (sun)
    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.5, 0.5, 0.0)),
    ));
}

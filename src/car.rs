//! Vehicles in the world
//!
//! Each vehicle is one entity carrying its body, control state and input. This module
//! holds the systems that run the controller over them and keep the rendered car and
//! its wheels in sync, plus the race start spawn.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::camera::{self, CameraRig};
use crate::controller::{self, VehicleState, WheelVisualState};
use crate::hud::RaceClock;
use crate::input::{ControlInput, Driver};
use crate::physics::PhysicsBody;
use crate::profile::{Dimensions, VehicleClass};
use crate::settings::RaceSettings;
use crate::SimulationSet;

const WHEEL_RADIUS: f32 = 0.4;
const WHEEL_THICKNESS: f32 = 0.3;

/// Plugin spawning the race field and rendering the cars
pub struct CarPlugin;

impl Plugin for CarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_race_field).add_systems(
            Update,
            (pose_wheels, camera::apply_active_camera).after(SimulationSet::Present),
        );
    }
}

/// The class a vehicle was built from
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct Vehicle {
    pub class: VehicleClass,
}

/// A rendered wheel, child of a vehicle
#[derive(Component, Debug, Clone, Copy)]
pub struct Wheel {
    /// Front wheels follow the steering angle
    pub front: bool,
    /// Position in the vehicle frame
    pub mount: Vec3,
}

/// Everything the simulation needs on a vehicle entity
pub fn vehicle(class: VehicleClass, driver: Driver, position: Vec3) -> impl Bundle {
    let body = PhysicsBody::for_profile(class.profile(), position);
    (
        Vehicle { class },
        driver,
        ControlInput::default(),
        body.transform(),
        body,
        VehicleState::default(),
        WheelVisualState::default(),
        Visibility::default(),
    )
}

/// Run the controller for every driven vehicle
pub fn drive_vehicles(
    time: Res<Time>,
    mut vehicles: Query<(
        &Vehicle,
        &Driver,
        &ControlInput,
        &mut PhysicsBody,
        &mut VehicleState,
    )>,
) {
    let dt = time.delta_secs();
    for (vehicle, driver, input, mut body, mut state) in vehicles.iter_mut() {
        if driver.is_driven() {
            controller::update(vehicle.class.profile(), &mut body, &mut state, input, dt);
        }
    }
}

/// Advance wheel steering and roll from the latest state
pub fn animate_wheels(
    mut vehicles: Query<(&VehicleState, &PhysicsBody, &mut WheelVisualState)>,
) {
    for (state, body, mut wheels) in vehicles.iter_mut() {
        wheels.follow(state, body);
    }
}

/// Copy the body pose into the render transform
pub fn sync_render_pose(mut vehicles: Query<(&PhysicsBody, &mut Transform), With<Vehicle>>) {
    for (body, mut transform) in vehicles.iter_mut() {
        *transform = body.transform();
    }
}

/// Wheel placements for a body of the given size: front left, front right, rear left,
/// rear right
fn wheel_mounts(dimensions: &Dimensions) -> [Wheel; 4] {
    let x = dimensions.width / 2.0 - 0.2;
    let y = -dimensions.height / 2.0 + WHEEL_RADIUS;
    let z = dimensions.length / 4.0;
    [
        (true, Vec3::new(-x, y, z)),
        (true, Vec3::new(x, y, z)),
        (false, Vec3::new(-x, y, -z)),
        (false, Vec3::new(x, y, -z)),
    ]
    .map(|(front, mount)| Wheel { front, mount })
}

fn wheel_rotation(wheel: &Wheel, visuals: &WheelVisualState) -> Quat {
    let yaw = if wheel.front { visuals.front_yaw } else { 0.0 };
    // the cylinder's axis is Y; lay it along the axle first
    Quat::from_rotation_y(yaw)
        * Quat::from_rotation_x(visuals.spin)
        * Quat::from_rotation_z(FRAC_PI_2)
}

/// Turn and roll the wheel meshes
fn pose_wheels(
    vehicles: Query<(&WheelVisualState, &Children)>,
    mut wheels: Query<(&Wheel, &mut Transform)>,
) {
    for (visuals, children) in vehicles.iter() {
        let children: &[Entity] = children;
        for &child in children {
            if let Ok((wheel, mut transform)) = wheels.get_mut(child) {
                transform.translation = wheel.mount;
                transform.rotation = wheel_rotation(wheel, visuals);
            }
        }
    }
}

/// Spawn the player and the AI field and start the clock
fn spawn_race_field(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<RaceSettings>,
    mut clock: ResMut<RaceClock>,
) {
    let wheel_mesh = meshes.add(Cylinder::new(WHEEL_RADIUS, WHEEL_THICKNESS));
    let wheel_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.2, 0.2),
        metallic: 0.2,
        perceptual_roughness: 0.8,
        ..default()
    });

    let mut spawn_car = |commands: &mut Commands,
                         class: VehicleClass,
                         driver: Driver,
                         position: Vec3,
                         color: Color| {
        let dimensions = class.profile().dimensions;
        let body_mesh = meshes.add(Cuboid::new(
            dimensions.width,
            dimensions.height * 0.6,
            dimensions.length,
        ));
        let cabin_mesh = meshes.add(Cuboid::new(
            dimensions.width * 0.85,
            dimensions.height * 0.5,
            dimensions.length * 0.4,
        ));
        let body_material = materials.add(StandardMaterial {
            base_color: color,
            metallic: 0.8,
            perceptual_roughness: 0.3,
            ..default()
        });

        let mut entity = commands.spawn(vehicle(class, driver, position));
        entity.with_children(|parent| {
            parent.spawn((
                Mesh3d(body_mesh),
                MeshMaterial3d(body_material.clone()),
                Transform::from_xyz(0.0, -dimensions.height * 0.1, 0.0),
            ));
            parent.spawn((
                Mesh3d(cabin_mesh),
                MeshMaterial3d(body_material),
                Transform::from_xyz(0.0, dimensions.height * 0.35, -dimensions.length * 0.05),
            ));
            for wheel in wheel_mounts(&dimensions) {
                parent.spawn((
                    Mesh3d(wheel_mesh.clone()),
                    MeshMaterial3d(wheel_material.clone()),
                    Transform::from_translation(wheel.mount)
                        .with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
                    wheel,
                ));
            }
        });
        entity.id()
    };

    let player_class = settings.player_class();
    let player = spawn_car(
        &mut commands,
        player_class,
        Driver::Player,
        controller::SPAWN_POSITION,
        Color::srgb(1.0, 0.0, 0.0),
    );
    commands.entity(player).insert(CameraRig::default());

    let ai_colors = [
        Color::srgb(0.0, 1.0, 0.0),
        Color::srgb(0.0, 0.0, 1.0),
        Color::srgb(1.0, 1.0, 0.0),
        Color::srgb(1.0, 0.0, 1.0),
    ];
    let mut rng = StdRng::seed_from_u64(settings.ai_seed);
    for i in 0..settings.ai_count {
        let class = VehicleClass::ALL[i % VehicleClass::ALL.len()];
        let position = Vec3::new(rng.gen_range(-10.0..10.0), 1.0, rng.gen_range(-10.0..10.0));
        spawn_car(
            &mut commands,
            class,
            Driver::Ai,
            position,
            ai_colors[i % ai_colors.len()],
        );
    }

    clock.start();
    info!(
        "Race started: {:?} player against {} AI drivers",
        player_class, settings.ai_count
    );
    info!("Arrows/WASD to drive, Space to brake, Shift for nitro.");
    info!("Press 'C' to switch camera, 'R' to reset.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_wheels_sit_ahead_of_the_rear_axle() {
        let mounts = wheel_mounts(&VehicleClass::Sports.profile().dimensions);
        assert!(mounts[0].front && mounts[1].front);
        assert!(!mounts[2].front && !mounts[3].front);
        assert!((mounts[0].mount - Vec3::new(-0.8, -0.1, 1.0)).length() < 1e-6);
        assert!((mounts[3].mount - Vec3::new(0.8, -0.1, -1.0)).length() < 1e-6);
    }

    #[test]
    fn only_front_wheels_take_the_steering_yaw() {
        let visuals = WheelVisualState {
            front_yaw: 0.4,
            spin: 0.0,
        };
        let mounts = wheel_mounts(&VehicleClass::Sports.profile().dimensions);

        let front_axle = wheel_rotation(&mounts[0], &visuals) * Vec3::Y;
        let rear_axle = wheel_rotation(&mounts[2], &visuals) * Vec3::Y;

        // rear axle stays along X, front axle is turned by the yaw
        assert!((rear_axle.z).abs() < 1e-5);
        assert!((front_axle.z.abs() - 0.4f32.sin()).abs() < 1e-5);
    }
}

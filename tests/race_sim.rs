//! Headless simulation tests.
//!
//! These run the full per-frame schedule with `MinimalPlugins` and a manual 60 Hz
//! clock. The first frame of a Bevy app has a zero delta, so timing checks leave
//! one frame of slack.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use nitrorace::controller::MAX_STEERING_ANGLE;
use nitrorace::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

fn create_test_app() -> App {
    create_test_app_with(RaceSettings::default())
}

fn create_test_app_with(settings: RaceSettings) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        FRAME,
    )));
    app.insert_resource(settings);
    app.add_plugins(VehicleSimPlugin);

    app.finish();
    app.cleanup();
    app
}

fn spawn(app: &mut App, class: VehicleClass, driver: Driver, position: Vec3) -> Entity {
    app.world_mut().spawn(vehicle(class, driver, position)).id()
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn body_of(app: &App, entity: Entity) -> PhysicsBody {
    app.world()
        .get::<PhysicsBody>(entity)
        .cloned()
        .expect("vehicle has a body")
}

fn state_of(app: &App, entity: Entity) -> VehicleState {
    *app.world()
        .get::<VehicleState>(entity)
        .expect("vehicle has a state")
}

fn set_input(app: &mut App, entity: Entity, input: ControlInput) {
    if let Some(mut control) = app.world_mut().get_mut::<ControlInput>(entity) {
        *control = input;
    }
}

#[test]
fn physics_steps_before_the_controller() {
    let mut app = create_test_app();
    let player = spawn(&mut app, VehicleClass::Sports, Driver::Player, Vec3::new(0.0, 0.5, 0.0));
    set_input(&mut app, player, ControlInput::forward());

    app.update();

    // the body was stepped at rest, then the controller pushed it forward
    let body = body_of(&app, player);
    assert_eq!(body.position.z, 0.0);
    assert_eq!(body.linear_velocity.z, 0.5);
}

#[test]
fn physics_rate_is_independent_of_the_frame_rate() {
    let mut app = create_test_app_with(RaceSettings {
        physics_hz: 120.0,
        ..default()
    });
    assert!((app.world().resource::<PhysicsWorld>().fixed_dt - 1.0 / 120.0).abs() < 1e-9);

    let player = spawn(&mut app, VehicleClass::Sports, Driver::Player, Vec3::new(0.0, 0.5, 0.0));
    set_input(
        &mut app,
        player,
        ControlInput {
            forward: true,
            nitro: true,
            ..default()
        },
    );
    run_frames(&mut app, 5);

    let before = body_of(&app, player);
    let nitro_before = state_of(&app, player).nitro_amount;
    app.update();
    let after = body_of(&app, player);
    let nitro_after = state_of(&app, player).nitro_amount;

    // the tank drains over the frame time
    assert!((nitro_before - nitro_after - 30.0 * FRAME).abs() < 1e-4);

    // the body moves over one physics step
    let step = 1.0 / 120.0;
    let expected = before.linear_velocity.z * 0.5f32.powf(step) * step;
    let moved = after.position.z - before.position.z;
    assert!(before.linear_velocity.z > 1.0);
    assert!((moved - expected).abs() < 1e-5, "{moved} vs {expected}");
}

#[test]
fn player_without_input_rolls_to_a_stop() {
    let mut app = create_test_app();
    let player = spawn(&mut app, VehicleClass::Sports, Driver::Player, Vec3::new(0.0, 0.5, 0.0));
    if let Some(mut body) = app.world_mut().get_mut::<PhysicsBody>(player) {
        body.linear_velocity = Vec3::new(0.0, 0.0, 10.0);
    }

    run_frames(&mut app, 600);

    let body = body_of(&app, player);
    assert!(body.speed() < 0.01, "{:?}", body.linear_velocity);
    assert!(body.position.z > 0.0);
    assert!((body.position.y - 0.5).abs() < 1e-3);
}

#[test]
fn ai_drivers_race_within_limits() {
    let mut app = create_test_app();
    let cars: Vec<Entity> = VehicleClass::ALL
        .iter()
        .enumerate()
        .map(|(i, class)| {
            spawn(&mut app, *class, Driver::Ai, Vec3::new(i as f32 * 4.0 - 6.0, 1.0, 0.0))
        })
        .collect();

    let mut travelled = [0.0f32; 4];
    let mut last: Vec<Vec3> = cars.iter().map(|car| body_of(&app, *car).position).collect();

    for _ in 0..600 {
        app.update();
        for (i, (car, class)) in cars.iter().zip(VehicleClass::ALL).enumerate() {
            let state = state_of(&app, *car);
            let body = body_of(&app, *car);
            assert!((0.0..=100.0).contains(&state.nitro_amount));
            assert!(state.steering_angle.abs() <= MAX_STEERING_ANGLE);
            let profile = class.profile();
            assert!(body.speed() <= profile.max_speed * profile.nitro_boost_factor * 1.0001);
            assert!(body.position.x.abs() <= 50.0 && body.position.z.abs() <= 50.0);

            travelled[i] += body.position.distance(last[i]);
            last[i] = body.position;
        }
    }

    for distance in travelled {
        assert!(distance > 50.0, "{distance}");
    }
}

#[test]
fn parked_vehicles_only_update_visuals() {
    let mut app = create_test_app();
    let parked = spawn(&mut app, VehicleClass::Suv, Driver::Parked, Vec3::new(0.0, 0.9, 0.0));
    if let Some(mut state) = app.world_mut().get_mut::<VehicleState>(parked) {
        state.steering_angle = 0.3;
        state.nitro_amount = 40.0;
    }
    set_input(
        &mut app,
        parked,
        ControlInput {
            forward: true,
            left: true,
            nitro: true,
            ..default()
        },
    );

    run_frames(&mut app, 30);

    let state = state_of(&app, parked);
    assert_eq!(state.steering_angle, 0.3);
    assert_eq!(state.nitro_amount, 40.0);
    assert!(body_of(&app, parked).linear_velocity.z.abs() < 1e-6);

    let wheels = app.world().get::<WheelVisualState>(parked).copied();
    assert_eq!(wheels.map(|w| w.front_yaw), Some(0.3));
}

#[test]
fn readout_and_clock_follow_the_player() {
    let mut app = create_test_app();
    let player = spawn(&mut app, VehicleClass::Supercar, Driver::Player, Vec3::new(0.0, 0.5, 0.0));
    spawn(&mut app, VehicleClass::Suv, Driver::Parked, Vec3::new(3.0, 0.9, 45.0));
    app.world_mut().resource_mut::<RaceClock>().start();
    set_input(
        &mut app,
        player,
        ControlInput {
            forward: true,
            nitro: true,
            ..default()
        },
    );

    run_frames(&mut app, 61);

    let readout = *app.world().resource::<RaceReadout>();
    assert_eq!(readout.field_size, 2);
    assert_eq!(readout.position, 2);
    assert!(readout.score > 0);
    // one second of boost from a full tank
    assert!((69..=70).contains(&readout.nitro_percent), "{:?}", readout);

    let clock = app.world().resource::<RaceClock>();
    assert!((clock.race_time - 61.0 / 60.0).abs() < 1e-3);
}

#[test]
fn player_camera_follows_and_switches() {
    let mut app = create_test_app();
    let player = spawn(&mut app, VehicleClass::Sports, Driver::Player, Vec3::new(0.0, 0.5, 0.0));
    app.world_mut().entity_mut(player).insert(CameraRig::default());
    set_input(&mut app, player, ControlInput::forward());

    run_frames(&mut app, 10);

    let body = body_of(&app, player);
    let rig = app.world().get::<CameraRig>(player).cloned().expect("rig");
    let chase = rig.current(&body);
    assert_eq!(rig.mode, CameraMode::Chase);
    assert!((chase.position - (body.position + Vec3::new(0.0, 5.0, -10.0))).length() < 1e-3);
    assert_eq!(chase.target, body.position);

    if let Some(mut rig) = app.world_mut().get_mut::<CameraRig>(player) {
        rig.switch();
    }
    run_frames(&mut app, 1);

    let body = body_of(&app, player);
    let rig = app.world().get::<CameraRig>(player).cloned().expect("rig");
    let cockpit = rig.current(&body);
    assert_eq!(rig.mode, CameraMode::Cockpit);
    assert!((cockpit.position - (body.position + Vec3::new(0.0, 1.5, 0.0))).length() < 1e-3);
}

#[test]
fn render_pose_matches_the_body() {
    let mut app = create_test_app();
    let car = spawn(&mut app, VehicleClass::Muscle, Driver::Ai, Vec3::new(0.0, 1.0, 0.0));

    run_frames(&mut app, 90);

    let body = body_of(&app, car);
    let transform = *app.world().get::<Transform>(car).expect("transform");
    assert_eq!(transform.translation, body.position);
    assert_eq!(transform.rotation, body.orientation);
}

#[test]
fn same_seed_replays_the_same_race() {
    let run = || {
        let mut app = create_test_app_with(RaceSettings {
            ai_seed: 1234,
            ..default()
        });
        let cars: Vec<Entity> = VehicleClass::ALL
            .iter()
            .map(|class| spawn(&mut app, *class, Driver::Ai, Vec3::new(0.0, 1.0, -20.0)))
            .collect();
        run_frames(&mut app, 240);
        cars.iter()
            .map(|car| {
                let body = body_of(&app, *car);
                (body.position, state_of(&app, *car).nitro_amount)
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

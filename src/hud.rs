//! Race readout and HUD
//!
//! The simulation publishes a [`RaceReadout`] after every tick. The HUD only renders
//! that resource and the [`RaceClock`]; it never reads vehicle state itself.

use bevy::prelude::*;

use crate::controller::VehicleState;
use crate::input::Driver;
use crate::physics::PhysicsBody;

/// What the presentation layer shows about the player
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaceReadout {
    /// Distance travelled along the track's +Z axis
    pub score: i32,
    /// Whole-number nitro percentage
    pub nitro_percent: u32,
    /// Race position, 1 is leading
    pub position: usize,
    /// Vehicles in the race
    pub field_size: usize,
}

impl RaceReadout {
    /// Build the readout for the player from all vehicle positions
    pub fn compute(player: (&PhysicsBody, &VehicleState), others: &[Vec3]) -> Self {
        let (body, state) = player;
        let ahead = others
            .iter()
            .filter(|other| other.z > body.position.z)
            .count();
        Self {
            score: body.position.z.floor() as i32,
            nitro_percent: state.nitro_amount.floor() as u32,
            position: ahead + 1,
            field_size: others.len() + 1,
        }
    }
}

/// Race timing
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RaceClock {
    pub started: bool,
    pub finished: bool,
    /// Seconds since the start
    pub race_time: f32,
}

impl RaceClock {
    /// Simulated time added per tick
    pub const TICK: f32 = 1.0 / 60.0;

    pub fn start(&mut self) {
        self.started = true;
        self.race_time = 0.0;
    }

    /// Count one tick of race time while the race is running
    pub fn advance(&mut self) {
        if self.started && !self.finished {
            self.race_time += Self::TICK;
        }
    }
}

/// Render seconds as `m:ss.mmm`
pub fn format_time(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u32;
    let secs = (seconds % 60.0).floor() as u32;
    let millis = ((seconds % 1.0) * 1000.0).floor() as u32;
    format!("{}:{:02}.{:03}", minutes, secs, millis)
}

/// Recompute the readout once all vehicles have been updated
pub fn publish_readout(
    mut readout: ResMut<RaceReadout>,
    mut clock: ResMut<RaceClock>,
    vehicles: Query<(&Driver, &PhysicsBody, &VehicleState)>,
) {
    clock.advance();

    let Some((_, body, state)) = vehicles
        .iter()
        .find(|(driver, _, _)| **driver == Driver::Player)
    else {
        return;
    };
    let others: Vec<Vec3> = vehicles
        .iter()
        .filter(|(driver, _, _)| **driver != Driver::Player)
        .map(|(_, body, _)| body.position)
        .collect();

    *readout = RaceReadout::compute((body, state), &others);
}

/// Plugin showing the readout as screen text
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, update_hud.after(crate::SimulationSet::Present));
    }
}

#[derive(Component)]
enum HudLine {
    Score,
    Nitro,
    Position,
    Time,
}

fn spawn_hud(mut commands: Commands) {
    let lines = [
        (HudLine::Score, Val::Px(20.0), None, 24.0),
        (HudLine::Position, Val::Px(52.0), None, 20.0),
        (HudLine::Time, Val::Px(80.0), None, 20.0),
        (HudLine::Nitro, Val::Auto, Some(Val::Px(20.0)), 18.0),
    ];

    for (line, top, bottom, font_size) in lines {
        commands.spawn((
            Text::new(""),
            TextFont {
                font_size,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                top,
                bottom: bottom.unwrap_or(Val::Auto),
                left: Val::Px(20.0),
                ..default()
            },
            line,
        ));
    }
}

fn update_hud(
    readout: Res<RaceReadout>,
    clock: Res<RaceClock>,
    mut lines: Query<(&HudLine, &mut Text)>,
) {
    for (line, mut text) in lines.iter_mut() {
        text.0 = match line {
            HudLine::Score => format!("Score: {}", readout.score),
            HudLine::Nitro => format!("Nitro: {}%", readout.nitro_percent),
            HudLine::Position => format!("Position: {}/{}", readout.position, readout.field_size),
            HudLine::Time => format!("Time: {}", format_time(clock.race_time)),
        };
    }
}

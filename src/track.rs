//! Race track layout
//!
//! The track is a square ring on a ground plane: an outer barrier square with an
//! infield cut out of the middle. The physics step uses it for ground contact and
//! to keep vehicles inside the barriers.

use bevy::prelude::*;

/// Plugin drawing the track outline
pub struct TrackPlugin;

impl Plugin for TrackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Track>()
            .add_systems(Update, visualize_track);
    }
}

/// Resource describing the track the vehicles drive on
#[derive(Resource, Debug, Clone)]
pub struct Track {
    /// A point on the ground plane
    pub origin: Vec3,
    /// The ground plane normal (unit vector)
    pub normal: Vec3,
    /// Half size of the square enclosed by the outer barriers
    pub outer_half_extent: f32,
    /// Half size of the infield square
    pub inner_half_extent: f32,
    /// Z coordinate of the start/finish line
    pub finish_line_z: f32,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            normal: Vec3::Y,
            outer_half_extent: 50.0,
            inner_half_extent: 30.0,
            finish_line_z: 44.0,
        }
    }
}

impl Track {
    /// Get the height (distance from plane) at a given point
    pub fn height_at(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.normal)
    }

    /// Keep a body of the given half width inside the outer barriers.
    ///
    /// Velocity components pointing into a barrier are removed.
    pub fn confine(&self, position: &mut Vec3, velocity: &mut Vec3, half_width: f32) {
        let limit = self.outer_half_extent - half_width;
        for axis in [0, 2] {
            let offset = position[axis] - self.origin[axis];
            if offset > limit {
                position[axis] = self.origin[axis] + limit;
                velocity[axis] = velocity[axis].min(0.0);
            } else if offset < -limit {
                position[axis] = self.origin[axis] - limit;
                velocity[axis] = velocity[axis].max(0.0);
            }
        }
    }
}

/// Draw the barriers, infield edge and finish line
fn visualize_track(mut gizmos: Gizmos, track: Res<Track>) {
    let origin = track.origin + track.normal * 0.02;
    let barrier_color = Color::srgb(1.0, 0.1, 0.1);
    let edge_color = Color::srgba(1.0, 1.0, 1.0, 0.8);

    for (half, color) in [
        (track.outer_half_extent, barrier_color),
        (track.inner_half_extent, edge_color),
    ] {
        let corners = [
            Vec3::new(-half, 0.0, -half),
            Vec3::new(-half, 0.0, half),
            Vec3::new(half, 0.0, half),
            Vec3::new(half, 0.0, -half),
        ];
        for i in 0..corners.len() {
            let start = origin + corners[i];
            let end = origin + corners[(i + 1) % corners.len()];
            gizmos.line(start, end, color);
        }
    }

    let finish = origin + Vec3::Z * track.finish_line_z;
    gizmos.line(
        finish - Vec3::X * track.outer_half_extent,
        finish - Vec3::X * track.inner_half_extent,
        Color::WHITE,
    );
}

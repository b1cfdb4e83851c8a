//! Orbit camera in spherical coordinates around the player
//!
//! Drag adjusts azimuth and polar angle, wheel/pinch adjusts radius, and the
//! eye position trails the spherical target through per-frame interpolation
//! instead of rigid attachment.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::lerp_vec3;

/// Minimum orbit distance, keeps the camera out of the player
pub const MIN_RADIUS: f32 = 5.0;
/// Maximum orbit distance
pub const MAX_RADIUS: f32 = 30.0;
/// Polar clamp, ~17 degrees from the up axis (near-overhead)
pub const MIN_POLAR: f32 = 0.3;
/// Polar clamp at the horizon, keeps the camera above the ground plane
pub const MAX_POLAR: f32 = std::f32::consts::FRAC_PI_2;
/// Radians of orbit per pixel of drag
pub const DRAG_SENSITIVITY: f32 = 0.005;
/// Radius change per wheel/pinch unit
pub const ZOOM_SENSITIVITY: f32 = 0.01;
/// Per-frame interpolation factor toward the spherical target
pub const SMOOTHING: f32 = 0.1;

/// Eye position plus the point it looks at, handed to the scene sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub look_at: Vec3,
}

/// Spherical-coordinate follow camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitCamera {
    pub radius: f32,
    /// Angle from the up axis
    pub polar: f32,
    /// Angle around the up axis; 0 places the camera behind the player (+z)
    pub azimuth: f32,
    eye: Vec3,
    warmed_up: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            radius: 14.0,
            polar: 1.0,
            azimuth: 0.0,
            eye: Vec3::ZERO,
            warmed_up: false,
        }
    }

    /// Apply a drag gesture in pixels: x orbits around, y tilts
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.azimuth += dx * DRAG_SENSITIVITY;
        self.polar = (self.polar + dy * DRAG_SENSITIVITY).clamp(MIN_POLAR, MAX_POLAR);
    }

    /// Apply wheel/pinch zoom; positive delta zooms out
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius + delta * ZOOM_SENSITIVITY).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// The un-smoothed spherical position around `target`
    pub fn orbit_position(&self, target: Vec3) -> Vec3 {
        let offset = Vec3::new(
            self.radius * self.polar.sin() * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * self.polar.sin() * self.azimuth.cos(),
        );
        target + offset
    }

    /// Advance one frame: trail the eye toward the orbit position and look
    /// at the player. The first frame snaps so the camera never sweeps in
    /// from the origin.
    pub fn update(&mut self, target: Vec3) -> CameraPose {
        let goal = self.orbit_position(target);
        if self.warmed_up {
            self.eye = lerp_vec3(self.eye, goal, SMOOTHING);
        } else {
            self.eye = goal;
            self.warmed_up = true;
        }
        CameraPose {
            eye: self.eye,
            look_at: target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_clamped() {
        let mut camera = OrbitCamera::new();
        camera.drag(0.0, 10_000.0);
        assert_eq!(camera.polar, MAX_POLAR);
        camera.drag(0.0, -10_000.0);
        assert_eq!(camera.polar, MIN_POLAR);
    }

    #[test]
    fn test_radius_clamped() {
        let mut camera = OrbitCamera::new();
        camera.zoom(1.0e6);
        assert_eq!(camera.radius, MAX_RADIUS);
        camera.zoom(-1.0e6);
        assert_eq!(camera.radius, MIN_RADIUS);
    }

    #[test]
    fn test_orbit_distance_matches_radius() {
        let camera = OrbitCamera::new();
        let target = Vec3::new(2.0, 0.5, -12.0);
        let eye = camera.orbit_position(target);
        assert!(((eye - target).length() - camera.radius).abs() < 1e-4);
    }

    #[test]
    fn test_first_update_snaps_then_trails() {
        let mut camera = OrbitCamera::new();
        let target = Vec3::new(0.0, 0.5, 0.0);
        let pose = camera.update(target);
        assert_eq!(pose.eye, camera.orbit_position(target));
        assert_eq!(pose.look_at, target);

        // Move the player; the eye should move only a fraction of the way
        let moved = Vec3::new(0.0, 0.5, -5.0);
        let before = pose.eye;
        let after = camera.update(moved);
        let full_step = (camera.orbit_position(moved) - before).length();
        let taken = (after.eye - before).length();
        assert!(taken > 0.0 && taken < full_step);
    }

    #[test]
    fn test_azimuth_orbits_around_target() {
        let mut camera = OrbitCamera::new();
        let target = Vec3::ZERO;
        let behind = camera.orbit_position(target);
        camera.drag(std::f32::consts::PI / DRAG_SENSITIVITY, 0.0);
        let front = camera.orbit_position(target);
        // Half an orbit flips the horizontal offset
        assert!((behind.z + front.z).abs() < 1e-3);
        assert!((behind.y - front.y).abs() < 1e-4);
    }
}

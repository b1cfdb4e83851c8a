//! Obby Rush - a 3D obstacle-course platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, power-ups, session state)
//! - `input`: Keyboard + virtual touch controls
//! - `scene`: Write-back seam to the external rendering collaborator
//! - `audio`: Best-effort Web Audio sound effects
//! - `leaderboard`: Score store with local fallback
//! - `vision`: Choice-derived image generation with deterministic fallback

pub mod audio;
pub mod input;
pub mod leaderboard;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod vision;

pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Maximum frame delta fed to the integrator (tab-resume protection)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Player sphere radius
    pub const PLAYER_RADIUS: f32 = 0.5;
    /// Horizontal movement speed (units/s)
    pub const MOVE_SPEED: f32 = 5.0;
    /// Upward velocity applied on jump
    pub const JUMP_FORCE: f32 = 8.0;
    /// Gravity magnitude (units/s²), applied while airborne
    pub const GRAVITY: f32 = 20.0;
    /// Fall speed clamp so thin platforms can't be tunneled at large dt
    pub const MAX_FALL_SPEED: f32 = 15.0;
    /// Per-frame multiplicative damping on released axes
    pub const FRICTION: f32 = 0.85;

    /// Speed power multiplies MOVE_SPEED by this
    pub const SPEED_BOOST: f32 = 2.0;
    /// Jump power multiplies JUMP_FORCE by this
    pub const JUMP_BOOST: f32 = 1.5;

    /// Vertical coordinate below which a fall event fires
    pub const FALL_Y: f32 = -10.0;

    /// Invincibility window after an unshielded hit (seconds)
    pub const HIT_INVINCIBILITY: f32 = 2.0;
    /// Invincibility window after a shield absorb (seconds)
    pub const SHIELD_INVINCIBILITY: f32 = 0.5;

    /// Spinner bar reach (half the bar length)
    pub const SPINNER_REACH: f32 = 3.0;
    /// Spinner vertical contact band
    pub const SPINNER_BAND: f32 = 1.0;
    /// Pusher contact range against its animated position
    pub const PUSHER_RANGE: f32 = 1.5;
    /// Pusher vertical contact band
    pub const PUSHER_BAND: f32 = 1.5;
    /// Horizontal knockback speed applied by a pusher
    pub const PUSHER_IMPULSE: f32 = 10.0;
    /// Spike contact radius
    pub const SPIKE_RADIUS: f32 = 1.2;
    /// Spike contact requires being within this height above the cluster base
    pub const SPIKE_BAND: f32 = 1.5;

    /// Pickup collection radius
    pub const COLLECT_RADIUS: f32 = 1.2;
    /// Magnet attraction radius
    pub const MAGNET_RADIUS: f32 = 8.0;
    /// Speed at which magnetized pickups travel toward the player (units/s)
    pub const MAGNET_PULL_SPEED: f32 = 6.0;

    /// Starting lives per session
    pub const START_LIVES: u8 = 3;
}

/// Distance between two points in the ground plane, ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from + (to - from) * t
}

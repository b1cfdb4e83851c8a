//! Collision resolution against platforms and obstacles
//!
//! Platforms are axis-aligned boxes tested in the ground plane with the
//! player's footprint inflated by its radius. Support only resolves from
//! above: the previous vertical position must have been at or over the
//! platform top, so jumping up through a platform is never stopped by its
//! underside. Obstacles use per-kind distance and height-band tests.

use glam::Vec3;

use super::level::{Obstacle, ObstacleKind, Platform};
use crate::consts::*;
use crate::horizontal_distance;

/// What touching an obstacle does to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleContact {
    /// Costs a life (or a shield charge)
    Damaging,
    /// Horizontal shove away from the obstacle, no damage
    Knockback(Vec3),
}

/// Find the resting height (platform top + player radius) of the highest
/// platform supporting the candidate position, if any.
///
/// A platform qualifies when the candidate footprint overlaps its logical
/// box, the previous vertical position was at or above its top, and the
/// candidate is descending into it. Blinking platforms only support while
/// visible at `anim_time`. Overlapping platforms resolve to the topmost.
pub fn support_height(
    prev_y: f32,
    candidate: Vec3,
    platforms: &[Platform],
    anim_time: f32,
) -> Option<f32> {
    let mut ground: Option<f32> = None;

    for platform in platforms {
        if !platform.visible_at(anim_time) {
            continue;
        }
        if !platform.footprint_contains(candidate) {
            continue;
        }
        let top = platform.top();
        if prev_y >= top && candidate.y <= top + PLAYER_RADIUS {
            let rest = top + PLAYER_RADIUS;
            ground = Some(ground.map_or(rest, |g: f32| g.max(rest)));
        }
    }

    ground
}

/// Test the candidate position against one obstacle.
///
/// Callers skip this entirely while time is frozen or an invincibility
/// window is running.
pub fn obstacle_contact(
    candidate: Vec3,
    obstacle: &Obstacle,
    anim_time: f32,
) -> Option<ObstacleContact> {
    match obstacle.kind {
        ObstacleKind::Spinner => {
            let reach = horizontal_distance(candidate, obstacle.position) < SPINNER_REACH;
            let in_band = (candidate.y - obstacle.position.y).abs() < SPINNER_BAND;
            (reach && in_band).then_some(ObstacleContact::Damaging)
        }
        ObstacleKind::Pusher => {
            let pusher_pos = obstacle.animated_position(anim_time);
            let reach = horizontal_distance(candidate, pusher_pos) < PUSHER_RANGE;
            let in_band = (candidate.y - pusher_pos.y).abs() < PUSHER_BAND;
            if reach && in_band {
                let away = Vec3::new(
                    candidate.x - pusher_pos.x,
                    0.0,
                    candidate.z - pusher_pos.z,
                );
                let mut dir = away.normalize_or_zero();
                if dir == Vec3::ZERO {
                    dir = Vec3::Z;
                }
                Some(ObstacleContact::Knockback(dir * PUSHER_IMPULSE))
            } else {
                None
            }
        }
        ObstacleKind::Spikes => {
            let reach = horizontal_distance(candidate, obstacle.position) < SPIKE_RADIUS;
            let height = candidate.y - obstacle.position.y;
            // Only landing on or near the spike tops hurts, not walking past
            (reach && height > 0.0 && height <= SPIKE_BAND).then_some(ObstacleContact::Damaging)
        }
    }
}

/// Below this, the player has left the playfield for good
pub fn fell(candidate: Vec3) -> bool {
    candidate.y < FALL_Y
}

//! Per-frame simulation update
//!
//! One writer, one callback: kinematics, platform resolution, obstacle
//! contact, and pickup collection all run synchronously here in that order.
//! Obstacle checks run against the same-frame candidate that platform
//! resolution produced. The 1 Hz countdowns live on `Session::second_tick`,
//! scheduled separately by the shell.

use glam::Vec3;

use super::collision::{self, ObstacleContact};
use super::kinematics;
use super::powerup;
use super::state::{GameEvent, Session};
use crate::consts::*;

/// Movement commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Sideways direction in [-1, 1]; keyboard gives ±1, joystick analog
    pub dir_x: f32,
    /// Depth direction in [-1, 1]; negative is toward the finish line
    pub dir_z: f32,
    /// Jump requested this frame
    pub jump: bool,
}

/// Advance the session by one frame. Does nothing outside Playing.
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    if !session.is_playing() {
        return Vec::new();
    }
    // Large deltas (tab resume) would tunnel through platforms
    let dt = dt.min(MAX_FRAME_DT);

    let mut events = Vec::new();

    // Freeze stops the environment clock, not the player
    let frozen = session.powers.time_frozen();
    if !frozen {
        session.anim_time += dt;
    }
    let anim_time = session.anim_time;

    session.player.invincibility = (session.player.invincibility - dt).max(0.0);

    let was_grounded = session.player.grounded;
    let prev_y = session.player.position.y;

    let candidate = kinematics::integrate(
        &mut session.player,
        (input.dir_x, input.dir_z),
        input.jump,
        session.powers.has_speed(),
        session.powers.has_jump(),
        dt,
    );
    if input.jump && was_grounded {
        events.push(GameEvent::Jumped);
    }

    // Platform resolution: snap onto the highest supporting top, or commit
    // the candidate and go airborne
    match collision::support_height(prev_y, candidate, &session.layout.platforms, anim_time) {
        Some(rest) => {
            session.player.position = Vec3::new(candidate.x, rest, candidate.z);
            session.player.velocity.y = 0.0;
            if !was_grounded {
                events.push(GameEvent::Landed);
            }
            session.player.grounded = true;
        }
        None => {
            session.player.position = candidate;
            session.player.grounded = false;
        }
    }

    // Fall events fire even while time is frozen
    if collision::fell(session.player.position) {
        events.push(session.handle_fall());
        return events;
    }

    if session.player.position.z < session.level.finish_z() {
        events.push(session.handle_win());
        return events;
    }

    // Obstacles: skipped wholesale while frozen or invincible
    if !frozen && session.player.invincibility <= 0.0 {
        let position = session.player.position;
        let mut damaging = false;
        let mut knockback = None;
        for obstacle in &session.layout.obstacles {
            match collision::obstacle_contact(position, obstacle, anim_time) {
                // One damaging contact per frame; the window covers the rest
                Some(ObstacleContact::Damaging) => {
                    damaging = true;
                    break;
                }
                Some(ObstacleContact::Knockback(impulse)) => knockback = Some(impulse),
                None => {}
            }
        }

        if let Some(impulse) = knockback {
            session.player.velocity.x = impulse.x;
            session.player.velocity.z = impulse.z;
            events.push(GameEvent::Knocked);
        }
        if damaging {
            if session.powers.has_shield() {
                session.player.invincibility = SHIELD_INVINCIBILITY;
                events.push(GameEvent::ShieldAbsorbed);
            } else {
                let outcome = session.handle_hit();
                events.push(outcome);
                if outcome == GameEvent::Lost {
                    return events;
                }
            }
        }
    }

    // Pickups are checked every frame, not just on countdown ticks
    let collected = powerup::update_pickups(
        &mut session.pickups,
        session.player.position,
        session.powers.magnet_active(),
        dt,
    );
    for kind in collected {
        session.powers.collect(kind);
        events.push(GameEvent::Collected(kind));
    }

    events
}

//! Semi-implicit Euler integration for the player
//!
//! Movement is deliberately non-physical: directional input sets horizontal
//! velocity outright for instant response, and release decays it
//! multiplicatively per frame. Do not "fix" this into force accumulation;
//! the game feel depends on it.

use glam::Vec3;

use super::state::Player;
use crate::consts::*;

/// Advance velocity from input and gravity, then produce the candidate
/// position for this frame. The candidate is committed (or snapped) by
/// collision resolution, never here.
///
/// `dir` components are in [-1, 1]: keyboard gives full deflection, the
/// virtual joystick gives analog values. Callers clamp `dt` to
/// `MAX_FRAME_DT` first.
pub fn integrate(
    player: &mut Player,
    dir: (f32, f32),
    jump: bool,
    has_speed: bool,
    has_jump: bool,
    dt: f32,
) -> Vec3 {
    let (dir_x, dir_z) = dir;
    let move_speed = if has_speed {
        MOVE_SPEED * SPEED_BOOST
    } else {
        MOVE_SPEED
    };

    // Horizontal: set on press, decay on release
    if dir_x != 0.0 {
        player.velocity.x = dir_x.clamp(-1.0, 1.0) * move_speed;
    } else {
        player.velocity.x *= FRICTION;
    }
    if dir_z != 0.0 {
        player.velocity.z = dir_z.clamp(-1.0, 1.0) * move_speed;
    } else {
        player.velocity.z *= FRICTION;
    }

    // Jump only from the ground
    if jump && player.grounded {
        let jump_force = if has_jump {
            JUMP_FORCE * JUMP_BOOST
        } else {
            JUMP_FORCE
        };
        player.velocity.y = jump_force;
        player.grounded = false;
    }

    // Gravity while airborne, with a terminal fall speed so large frames
    // can't tunnel through a platform
    if !player.grounded {
        player.velocity.y -= GRAVITY * dt;
        player.velocity.y = player.velocity.y.max(-MAX_FALL_SPEED);
    }

    player.position + player.velocity * dt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Level;

    const DT: f32 = 1.0 / 60.0;

    fn grounded_player() -> Player {
        Player::at_spawn(Level::Easy)
    }

    #[test]
    fn test_input_sets_velocity_directly() {
        let mut player = grounded_player();
        player.velocity.x = -3.0;
        integrate(&mut player, (1.0, 0.0), false, false, false, DT);
        assert_eq!(player.velocity.x, MOVE_SPEED);
    }

    #[test]
    fn test_release_decays_multiplicatively() {
        let mut player = grounded_player();
        player.velocity.z = -MOVE_SPEED;
        integrate(&mut player, (0.0, 0.0), false, false, false, DT);
        assert_eq!(player.velocity.z, -MOVE_SPEED * FRICTION);
        integrate(&mut player, (0.0, 0.0), false, false, false, DT);
        assert_eq!(player.velocity.z, -MOVE_SPEED * FRICTION * FRICTION);
    }

    #[test]
    fn test_speed_power_doubles() {
        let mut player = grounded_player();
        integrate(&mut player, (0.0, -1.0), false, true, false, DT);
        assert_eq!(player.velocity.z, -MOVE_SPEED * SPEED_BOOST);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut player = grounded_player();
        integrate(&mut player, (0.0, 0.0), true, false, false, DT);
        assert_eq!(player.velocity.y, JUMP_FORCE - GRAVITY * DT);
        assert!(!player.grounded);

        // Airborne jump request is ignored
        let vy = player.velocity.y;
        integrate(&mut player, (0.0, 0.0), true, false, false, DT);
        assert!(player.velocity.y < vy);
    }

    #[test]
    fn test_jump_power_boosts_impulse() {
        let mut player = grounded_player();
        integrate(&mut player, (0.0, 0.0), true, false, true, DT);
        assert_eq!(player.velocity.y, JUMP_FORCE * JUMP_BOOST - GRAVITY * DT);
    }

    #[test]
    fn test_fall_speed_clamped() {
        let mut player = grounded_player();
        player.grounded = false;
        for _ in 0..200 {
            integrate(&mut player, (0.0, 0.0), false, false, false, DT);
        }
        assert_eq!(player.velocity.y, -MAX_FALL_SPEED);
    }

    #[test]
    fn test_no_gravity_while_grounded() {
        let mut player = grounded_player();
        let candidate = integrate(&mut player, (0.0, 0.0), false, false, false, DT);
        assert_eq!(player.velocity.y, 0.0);
        assert_eq!(candidate.y, player.position.y);
    }

    #[test]
    fn test_candidate_uses_same_frame_velocity() {
        let mut player = grounded_player();
        let candidate = integrate(&mut player, (1.0, 0.0), false, false, false, DT);
        assert_eq!(candidate.x, player.position.x + MOVE_SPEED * DT);
    }
}

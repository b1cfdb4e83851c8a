//! Static level layouts
//!
//! Each level is an immutable template: platform boxes (some with motion,
//! rotation, or blink descriptors), obstacle poses, and pickup spawns.
//! Collision always runs against the logical (non-animated) boxes; only the
//! derived visual transform animates.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_RADIUS;

/// Level identifier. Layouts exist only for these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    /// 1-based index as shown in the HUD
    pub fn index(self) -> u8 {
        match self {
            Level::Easy => 1,
            Level::Medium => 2,
            Level::Hard => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Level::Easy),
            2 => Some(Level::Medium),
            3 => Some(Level::Hard),
            _ => None,
        }
    }

    /// Crossing this depth coordinate wins the level
    pub fn finish_z(self) -> f32 {
        match self {
            Level::Easy => -40.0,
            Level::Medium => -60.0,
            Level::Hard => -80.0,
        }
    }

    /// Player spawn point (also the respawn point after a fall)
    pub fn spawn(self) -> Vec3 {
        Vec3::new(0.0, 0.5, 0.0)
    }

    pub fn next(self) -> Option<Level> {
        match self {
            Level::Easy => Some(Level::Medium),
            Level::Medium => Some(Level::Hard),
            Level::Hard => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Easy => "Easy",
            Level::Medium => "Medium",
            Level::Hard => "Hard",
        }
    }
}

/// Ground-plane axis a moving platform oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionAxis {
    X,
    Z,
}

/// Oscillation descriptor for a moving platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlatformMotion {
    pub axis: MotionAxis,
    pub range: f32,
    pub speed: f32,
}

/// A static platform box, with optional visual behaviors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Center of the box
    pub position: Vec3,
    /// Full extents (width, height, depth)
    pub size: Vec3,
    /// 0xRRGGBB, handed through to the scene sink
    pub color: u32,
    pub motion: Option<PlatformMotion>,
    pub rotating: bool,
    pub blinking: bool,
    /// Per-platform offset into the blink cycle, seeded at level build
    pub blink_phase: f32,
}

/// Blink cycle: 2 seconds visible, 2 seconds gone
const BLINK_RATE: f32 = 0.5;

impl Platform {
    fn fixed(position: Vec3, size: Vec3, color: u32) -> Self {
        Self {
            position,
            size,
            color,
            motion: None,
            rotating: false,
            blinking: false,
            blink_phase: 0.0,
        }
    }

    /// Top surface height of the logical box
    pub fn top(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }

    /// Whether a blinking platform is present at the given animation time.
    /// Non-blinking platforms are always visible.
    pub fn visible_at(&self, anim_time: f32) -> bool {
        if !self.blinking {
            return true;
        }
        ((anim_time + self.blink_phase) * BLINK_RATE).floor() as i64 % 2 == 0
    }

    /// Does a point fall within the horizontal footprint, inflated on all
    /// sides by the player radius?
    pub fn footprint_contains(&self, point: Vec3) -> bool {
        let half_x = self.size.x / 2.0 + PLAYER_RADIUS;
        let half_z = self.size.z / 2.0 + PLAYER_RADIUS;
        point.x >= self.position.x - half_x
            && point.x <= self.position.x + half_x
            && point.z >= self.position.z - half_z
            && point.z <= self.position.z + half_z
    }

    /// Visual-only oscillation offset at the given animation time
    pub fn visual_offset(&self, anim_time: f32) -> Vec3 {
        match self.motion {
            Some(motion) => {
                let offset = (anim_time * motion.speed).sin() * motion.range;
                match motion.axis {
                    MotionAxis::X => Vec3::new(offset, 0.0, 0.0),
                    MotionAxis::Z => Vec3::new(0.0, 0.0, offset),
                }
            }
            None => Vec3::ZERO,
        }
    }

    /// Visual-only yaw at the given animation time
    pub fn visual_yaw(&self, anim_time: f32) -> f32 {
        if self.rotating { anim_time * 0.5 } else { 0.0 }
    }
}

/// Obstacle behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Rotating horizontal bar
    Spinner,
    /// Block oscillating along X, knocks the player back on contact
    Pusher,
    /// Fixed cluster of spikes, damaging only from above
    Spikes,
}

/// Read-only hazard geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec3,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Position after applying the behavior's oscillation, if any.
    /// Contact tests for pushers use this; spinners and spikes stay put.
    pub fn animated_position(&self, anim_time: f32) -> Vec3 {
        match self.kind {
            ObstacleKind::Pusher => {
                self.position + Vec3::new((anim_time * 2.0).sin() * 3.0, 0.0, 0.0)
            }
            _ => self.position,
        }
    }

    /// Visual-only yaw (spinner bar rotation)
    pub fn visual_yaw(&self, anim_time: f32) -> f32 {
        match self.kind {
            ObstacleKind::Spinner => anim_time * 2.0,
            _ => 0.0,
        }
    }
}

/// Collectible power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerKind {
    Speed,
    Jump,
    Shield,
    Magnet,
    Freeze,
}

impl PowerKind {
    /// Full buff duration in whole seconds, counted down by the 1 Hz tick
    pub fn duration_secs(self) -> u32 {
        match self {
            PowerKind::Speed => 5,
            PowerKind::Jump => 5,
            PowerKind::Shield => 8,
            PowerKind::Magnet => 6,
            PowerKind::Freeze => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerKind::Speed => "Speed",
            PowerKind::Jump => "Jump",
            PowerKind::Shield => "Shield",
            PowerKind::Magnet => "Magnet",
            PowerKind::Freeze => "Freeze",
        }
    }
}

/// Pickup spawn template (instantiated fresh on every level start)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupSpawn {
    pub position: Vec3,
    pub kind: PowerKind,
}

/// Complete immutable template for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub level: Level,
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<PickupSpawn>,
}

/// Build the layout for a level. Blink phases are drawn from a level-seeded
/// RNG so repeated sessions of the same level are reproducible.
pub fn layout(level: Level) -> LevelLayout {
    let mut platforms = Vec::new();
    let mut obstacles = Vec::new();
    let mut pickups = Vec::new();

    let platform =
        |x: f32, y: f32, z: f32, w: f32, d: f32, color: u32| -> Platform {
            Platform::fixed(Vec3::new(x, y, z), Vec3::new(w, 0.5, d), color)
        };

    // Starting platform is common to all levels
    platforms.push(platform(0.0, 0.0, 0.0, 4.0, 4.0, 0x3498db));

    match level {
        Level::Easy => {
            platforms.push(platform(0.0, 0.0, -6.0, 3.0, 3.0, 0x2ecc71));
            platforms.push(platform(3.0, 0.0, -12.0, 3.0, 3.0, 0xe67e22));
            platforms.push(platform(0.0, 0.0, -18.0, 3.0, 3.0, 0x9b59b6));
            platforms.push(platform(-3.0, 0.0, -24.0, 3.0, 3.0, 0x1abc9c));
            platforms.push(platform(0.0, 0.0, -30.0, 3.0, 3.0, 0xe74c3c));
            platforms.push(platform(0.0, 0.0, -36.0, 3.0, 3.0, 0xf39c12));
            platforms.push(platform(0.0, 0.0, -42.0, 5.0, 5.0, 0x2ecc71));

            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 1.0, -18.0),
                kind: PowerKind::Speed,
            });
            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 1.0, -30.0),
                kind: PowerKind::Jump,
            });
        }
        Level::Medium => {
            let mut moving = platform(0.0, 0.0, -6.0, 3.0, 3.0, 0x2ecc71);
            moving.motion = Some(PlatformMotion {
                axis: MotionAxis::X,
                range: 3.0,
                speed: 1.0,
            });
            platforms.push(moving);

            platforms.push(platform(0.0, 1.0, -14.0, 3.0, 3.0, 0xe67e22));
            obstacles.push(Obstacle {
                position: Vec3::new(0.0, 1.5, -14.0),
                kind: ObstacleKind::Spinner,
            });

            let mut moving = platform(0.0, 0.0, -22.0, 3.0, 3.0, 0x9b59b6);
            moving.motion = Some(PlatformMotion {
                axis: MotionAxis::X,
                range: 4.0,
                speed: 1.5,
            });
            platforms.push(moving);

            let mut blink = platform(0.0, 0.0, -30.0, 2.0, 2.0, 0x1abc9c);
            blink.blinking = true;
            platforms.push(blink);
            let mut blink = platform(0.0, 0.0, -36.0, 2.0, 2.0, 0x1abc9c);
            blink.blinking = true;
            platforms.push(blink);

            platforms.push(platform(0.0, 0.0, -42.0, 3.0, 3.0, 0xe74c3c));
            platforms.push(platform(0.0, 2.0, -50.0, 3.0, 3.0, 0xf39c12));
            platforms.push(platform(0.0, 0.0, -58.0, 5.0, 5.0, 0x2ecc71));

            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 2.0, -14.0),
                kind: PowerKind::Shield,
            });
            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 1.0, -30.0),
                kind: PowerKind::Freeze,
            });
            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 3.0, -50.0),
                kind: PowerKind::Jump,
            });
        }
        Level::Hard => {
            let mut moving = platform(0.0, 0.0, -6.0, 2.0, 2.0, 0x2ecc71);
            moving.motion = Some(PlatformMotion {
                axis: MotionAxis::X,
                range: 4.0,
                speed: 2.0,
            });
            platforms.push(moving);
            obstacles.push(Obstacle {
                position: Vec3::new(3.0, 0.5, -6.0),
                kind: ObstacleKind::Pusher,
            });

            let mut rotating = platform(0.0, 1.0, -14.0, 2.5, 2.5, 0xe67e22);
            rotating.rotating = true;
            platforms.push(rotating);
            obstacles.push(Obstacle {
                position: Vec3::new(0.0, 1.5, -14.0),
                kind: ObstacleKind::Spinner,
            });

            for x in [-4.0, 0.0, 4.0] {
                let mut blink = platform(x, 0.0, -22.0, 2.0, 2.0, 0x9b59b6);
                blink.blinking = true;
                platforms.push(blink);
            }

            platforms.push(platform(0.0, 0.0, -30.0, 3.0, 3.0, 0x1abc9c));
            obstacles.push(Obstacle {
                position: Vec3::new(0.0, 0.0, -30.0),
                kind: ObstacleKind::Spikes,
            });

            let mut moving = platform(0.0, 2.0, -38.0, 2.0, 2.0, 0xe74c3c);
            moving.motion = Some(PlatformMotion {
                axis: MotionAxis::Z,
                range: 3.0,
                speed: 2.0,
            });
            platforms.push(moving);

            let mut moving = platform(0.0, 4.0, -48.0, 2.0, 2.0, 0xf39c12);
            moving.motion = Some(PlatformMotion {
                axis: MotionAxis::X,
                range: 5.0,
                speed: 2.5,
            });
            platforms.push(moving);
            obstacles.push(Obstacle {
                position: Vec3::new(0.0, 4.5, -48.0),
                kind: ObstacleKind::Spinner,
            });

            let mut rotating = platform(0.0, 2.0, -58.0, 2.5, 2.5, 0x3498db);
            rotating.rotating = true;
            platforms.push(rotating);

            platforms.push(platform(0.0, 0.0, -68.0, 3.0, 3.0, 0x2ecc71));
            platforms.push(platform(0.0, 0.0, -78.0, 6.0, 6.0, 0xf1c40f));

            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 1.0, -6.0),
                kind: PowerKind::Shield,
            });
            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 2.0, -22.0),
                kind: PowerKind::Freeze,
            });
            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 1.0, -30.0),
                kind: PowerKind::Magnet,
            });
            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 3.0, -38.0),
                kind: PowerKind::Speed,
            });
            pickups.push(PickupSpawn {
                position: Vec3::new(0.0, 5.0, -48.0),
                kind: PowerKind::Jump,
            });
        }
    }

    // Stagger blink cycles deterministically per level
    let mut rng = Pcg32::seed_from_u64(level.index() as u64);
    for platform in platforms.iter_mut().filter(|p| p.blinking) {
        platform.blink_phase = rng.random_range(0.0..100.0);
    }

    LevelLayout {
        level,
        platforms,
        obstacles,
        pickups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_indices_round_trip() {
        for level in [Level::Easy, Level::Medium, Level::Hard] {
            assert_eq!(Level::from_index(level.index()), Some(level));
        }
        assert_eq!(Level::from_index(0), None);
        assert_eq!(Level::from_index(4), None);
    }

    #[test]
    fn test_layouts_start_and_finish() {
        for level in [Level::Easy, Level::Medium, Level::Hard] {
            let layout = layout(level);
            // Every level starts on the common platform under the spawn
            let start = &layout.platforms[0];
            assert!(start.footprint_contains(level.spawn()));
            // The last platform sits at or past the finish line
            let last = layout.platforms.last().unwrap();
            assert!(last.position.z <= level.finish_z() + last.size.z);
        }
    }

    #[test]
    fn test_blink_phases_deterministic() {
        let a = layout(Level::Hard);
        let b = layout(Level::Hard);
        for (pa, pb) in a.platforms.iter().zip(&b.platforms) {
            assert_eq!(pa.blink_phase, pb.blink_phase);
        }
    }

    #[test]
    fn test_blink_cycle() {
        let mut platform = Platform::fixed(Vec3::ZERO, Vec3::new(2.0, 0.5, 2.0), 0);
        platform.blinking = true;
        // 2 seconds on, 2 seconds off
        assert!(platform.visible_at(0.0));
        assert!(platform.visible_at(1.9));
        assert!(!platform.visible_at(2.1));
        assert!(platform.visible_at(4.1));
    }

    #[test]
    fn test_moving_platform_logical_box_is_static() {
        let layout = layout(Level::Medium);
        let moving = layout
            .platforms
            .iter()
            .find(|p| p.motion.is_some())
            .unwrap();
        // Visual offset oscillates; the footprint test ignores it
        let probe = moving.position;
        assert!(moving.footprint_contains(probe));
        assert!(moving.visual_offset(0.8).length() > 0.0);
        assert!(moving.footprint_contains(probe));
    }

    #[test]
    fn test_pusher_oscillates_spinner_does_not() {
        let pusher = Obstacle {
            position: Vec3::new(3.0, 0.5, -6.0),
            kind: ObstacleKind::Pusher,
        };
        let spinner = Obstacle {
            position: Vec3::new(0.0, 1.5, -14.0),
            kind: ObstacleKind::Spinner,
        };
        assert!((pusher.animated_position(0.8).x - pusher.position.x).abs() > 0.1);
        assert_eq!(spinner.animated_position(0.8), spinner.position);
        assert!(spinner.visual_yaw(1.0) > 0.0);
    }
}

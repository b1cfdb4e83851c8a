//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - No rendering or platform dependencies
//! - Seeded RNG only (level blink phases)
//! - One writer: the session is mutated only from the frame tick and the
//!   1 Hz countdown tick
//!
//! The shell clamps frame deltas and owns the two timer domains.

pub mod camera;
pub mod collision;
pub mod kinematics;
pub mod level;
pub mod powerup;
pub mod state;
pub mod tick;

pub use camera::{CameraPose, OrbitCamera};
pub use collision::{ObstacleContact, obstacle_contact, support_height};
pub use level::{
    Level, LevelLayout, MotionAxis, Obstacle, ObstacleKind, PickupSpawn, Platform,
    PlatformMotion, PowerKind, layout,
};
pub use powerup::{ActivePower, ActivePowers, update_pickups};
pub use state::{GameEvent, Pickup, Player, Session, SessionPhase};
pub use tick::{TickInput, tick};

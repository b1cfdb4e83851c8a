//! Power-up and status effect management
//!
//! Timed buffs are refreshed, never stacked: at most one active instance per
//! type. Countdowns run on the 1 Hz tick; pickup collection and magnet
//! attraction run every frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::level::PowerKind;
use super::state::Pickup;
use crate::consts::{COLLECT_RADIUS, MAGNET_PULL_SPEED, MAGNET_RADIUS};

/// A buff currently in effect
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivePower {
    pub kind: PowerKind,
    pub remaining_secs: u32,
}

/// The set of buffs in effect, at most one per type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivePowers {
    active: Vec<ActivePower>,
}

impl ActivePowers {
    /// Install a buff at its full duration. Collecting a duplicate type
    /// refreshes the existing instance instead of stacking a second one.
    pub fn collect(&mut self, kind: PowerKind) {
        let duration = kind.duration_secs();
        match self.active.iter_mut().find(|p| p.kind == kind) {
            Some(power) => power.remaining_secs = duration,
            None => self.active.push(ActivePower {
                kind,
                remaining_secs: duration,
            }),
        }
    }

    /// Count every buff down by one second, removing the expired ones.
    /// Returns the types that just ran out.
    pub fn second_tick(&mut self) -> Vec<PowerKind> {
        let mut expired = Vec::new();
        for power in &mut self.active {
            power.remaining_secs = power.remaining_secs.saturating_sub(1);
            if power.remaining_secs == 0 {
                expired.push(power.kind);
            }
        }
        self.active.retain(|p| p.remaining_secs > 0);
        expired
    }

    pub fn has(&self, kind: PowerKind) -> bool {
        self.active.iter().any(|p| p.kind == kind)
    }

    pub fn remaining(&self, kind: PowerKind) -> Option<u32> {
        self.active
            .iter()
            .find(|p| p.kind == kind)
            .map(|p| p.remaining_secs)
    }

    pub fn has_speed(&self) -> bool {
        self.has(PowerKind::Speed)
    }

    pub fn has_jump(&self) -> bool {
        self.has(PowerKind::Jump)
    }

    pub fn has_shield(&self) -> bool {
        self.has(PowerKind::Shield)
    }

    pub fn magnet_active(&self) -> bool {
        self.has(PowerKind::Magnet)
    }

    /// Freeze halts environment animation and obstacle damage, not the player
    pub fn time_frozen(&self) -> bool {
        self.has(PowerKind::Freeze)
    }

    /// Active buffs for the HUD
    pub fn iter(&self) -> impl Iterator<Item = &ActivePower> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Per-frame pickup pass: magnet attraction plus contact collection.
/// Returns the types collected this frame, in pickup-id order.
pub fn update_pickups(
    pickups: &mut [Pickup],
    player_pos: Vec3,
    magnet_active: bool,
    dt: f32,
) -> Vec<PowerKind> {
    let mut collected = Vec::new();

    for pickup in pickups.iter_mut().filter(|p| !p.collected) {
        let offset = player_pos - pickup.position;
        let distance = offset.length();

        if magnet_active && distance <= MAGNET_RADIUS && distance > COLLECT_RADIUS {
            // Drag toward the player, never overshooting it
            let step = (MAGNET_PULL_SPEED * dt).min(distance);
            pickup.position += offset / distance * step;
        }

        if (player_pos - pickup.position).length() <= COLLECT_RADIUS {
            pickup.collected = true;
            collected.push(pickup.kind);
        }
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pickup(id: u32, kind: PowerKind, position: Vec3) -> Pickup {
        Pickup {
            id,
            kind,
            position,
            collected: false,
        }
    }

    #[test]
    fn test_duplicate_collect_refreshes() {
        let mut powers = ActivePowers::default();
        powers.collect(PowerKind::Speed);

        // Burn some time off the first instance
        powers.second_tick();
        powers.second_tick();
        assert_eq!(powers.remaining(PowerKind::Speed), Some(3));

        // Second pickup of the same type: one instance, full duration again
        powers.collect(PowerKind::Speed);
        assert_eq!(powers.iter().count(), 1);
        assert_eq!(
            powers.remaining(PowerKind::Speed),
            Some(PowerKind::Speed.duration_secs())
        );
    }

    #[test]
    fn test_expiry_reported_once() {
        let mut powers = ActivePowers::default();
        powers.collect(PowerKind::Freeze);

        let mut expired = Vec::new();
        for _ in 0..PowerKind::Freeze.duration_secs() + 2 {
            expired.extend(powers.second_tick());
        }
        assert_eq!(expired, vec![PowerKind::Freeze]);
        assert!(powers.is_empty());
    }

    #[test]
    fn test_derived_flags() {
        let mut powers = ActivePowers::default();
        assert!(!powers.time_frozen());
        powers.collect(PowerKind::Freeze);
        powers.collect(PowerKind::Shield);
        assert!(powers.time_frozen());
        assert!(powers.has_shield());
        assert!(!powers.has_speed());
    }

    #[test]
    fn test_plain_collection_on_contact() {
        let mut pickups = vec![
            pickup(0, PowerKind::Speed, Vec3::new(0.0, 0.5, -1.0)),
            pickup(1, PowerKind::Jump, Vec3::new(0.0, 0.5, -5.0)),
        ];
        let collected = update_pickups(&mut pickups, Vec3::new(0.0, 0.5, 0.0), false, 1.0 / 60.0);
        assert_eq!(collected, vec![PowerKind::Speed]);
        assert!(pickups[0].collected);
        assert!(!pickups[1].collected);

        // Already-collected pickups never report again
        let collected = update_pickups(&mut pickups, Vec3::new(0.0, 0.5, 0.0), false, 1.0 / 60.0);
        assert!(collected.is_empty());
    }

    #[test]
    fn test_magnet_pulls_until_contact() {
        let player = Vec3::new(0.0, 0.5, 0.0);
        let mut pickups = vec![pickup(0, PowerKind::Shield, Vec3::new(0.0, 0.5, -5.0))];

        let dt = 1.0 / 60.0;
        let mut last_distance = (player - pickups[0].position).length();
        let mut collected_at_tick = None;
        for tick in 0..1000 {
            let collected = update_pickups(&mut pickups, player, true, dt);
            if !collected.is_empty() {
                collected_at_tick = Some(tick);
                break;
            }
            let distance = (player - pickups[0].position).length();
            assert!(distance < last_distance, "attraction must be monotonic");
            last_distance = distance;
        }
        assert!(collected_at_tick.is_some());
        assert!(pickups[0].collected);
    }

    #[test]
    fn test_magnet_ignores_out_of_range() {
        let player = Vec3::ZERO;
        let far = Vec3::new(0.0, 0.0, -(MAGNET_RADIUS + 1.0));
        let mut pickups = vec![pickup(0, PowerKind::Magnet, far)];
        update_pickups(&mut pickups, player, true, 1.0 / 60.0);
        assert_eq!(pickups[0].position, far);
    }
}

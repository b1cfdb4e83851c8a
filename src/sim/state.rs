//! Session state and core simulation types
//!
//! Everything the per-frame tick mutates lives here. The session is the only
//! shared mutable resource; it is written from exactly one place (the update
//! loop), so no locking is needed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::level::{self, Level, LevelLayout, PowerKind};
use super::powerup::ActivePowers;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Level select screen
    Menu,
    /// Active gameplay
    Playing,
    /// Finish line crossed
    Won,
    /// Out of lives
    Lost,
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    /// Seconds of remaining obstacle immunity after a hit or shield absorb
    pub invincibility: f32,
}

impl Player {
    pub fn at_spawn(level: Level) -> Self {
        Self {
            position: level.spawn(),
            velocity: Vec3::ZERO,
            grounded: true,
            invincibility: 0.0,
        }
    }

    /// Put the player back on the spawn point, keeping nothing else
    pub fn respawn(&mut self, level: Level) {
        *self = Self::at_spawn(level);
    }
}

/// A live pickup instance. `collected` flips to true exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PowerKind,
    /// Current position; magnet attraction moves it toward the player
    pub position: Vec3,
    pub collected: bool,
}

/// Events surfaced to the shell (sounds, HUD flashes). Not gameplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Landed,
    /// Player dropped below the fall threshold
    Fell,
    /// Obstacle contact cost a life
    Hit,
    /// Shield soaked an obstacle contact
    ShieldAbsorbed,
    /// Pusher contact; knockback only
    Knocked,
    Collected(PowerKind),
    PowerExpired(PowerKind),
    Won,
    Lost,
}

/// Complete game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: SessionPhase,
    pub level: Level,
    pub layout: LevelLayout,
    pub lives: u8,
    /// Whole seconds spent in Playing, driven by the 1 Hz tick
    pub elapsed_secs: u32,
    pub player: Player,
    pub pickups: Vec<Pickup>,
    pub powers: ActivePowers,
    /// Environment animation clock; does not advance while time is frozen
    pub anim_time: f32,
}

impl Session {
    /// Fresh session on the menu screen
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Menu,
            level: Level::Easy,
            layout: level::layout(Level::Easy),
            lives: START_LIVES,
            elapsed_secs: 0,
            player: Player::at_spawn(Level::Easy),
            pickups: Vec::new(),
            powers: ActivePowers::default(),
            anim_time: 0.0,
        }
    }

    /// Enter Playing on the given level, resetting the whole run: lives,
    /// spawn position, clock, active powers, and a fresh pickup population.
    pub fn start(&mut self, level: Level) {
        self.level = level;
        self.layout = level::layout(level);
        self.lives = START_LIVES;
        self.elapsed_secs = 0;
        self.player = Player::at_spawn(level);
        self.powers = ActivePowers::default();
        self.anim_time = 0.0;
        self.pickups = self
            .layout
            .pickups
            .iter()
            .enumerate()
            .map(|(i, spawn)| Pickup {
                id: i as u32,
                kind: spawn.kind,
                position: spawn.position,
                collected: false,
            })
            .collect();
        self.phase = SessionPhase::Playing;
        log::info!("Level {} ({}) started", level.index(), level.name());
    }

    /// Back to the level select screen. Only valid from Won/Lost/Playing.
    pub fn to_menu(&mut self) {
        self.phase = SessionPhase::Menu;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// A fall: costs a life and respawns the player; the last life ends the
    /// run instead. Lives never go below zero.
    pub fn handle_fall(&mut self) -> GameEvent {
        debug_assert!(self.is_playing());
        if self.lives > 1 {
            self.lives -= 1;
            self.player.respawn(self.level);
            GameEvent::Fell
        } else {
            self.lives = 0;
            self.phase = SessionPhase::Lost;
            log::info!("Out of lives on level {}", self.level.index());
            GameEvent::Lost
        }
    }

    /// An obstacle hit: same lives rule as a fall, but the player keeps its
    /// position and only gains an invincibility window.
    pub fn handle_hit(&mut self) -> GameEvent {
        debug_assert!(self.is_playing());
        if self.lives > 1 {
            self.lives -= 1;
            self.player.invincibility = HIT_INVINCIBILITY;
            GameEvent::Hit
        } else {
            self.lives = 0;
            self.phase = SessionPhase::Lost;
            log::info!("Out of lives on level {}", self.level.index());
            GameEvent::Lost
        }
    }

    /// Crossing the finish line wins unconditionally.
    pub fn handle_win(&mut self) -> GameEvent {
        debug_assert!(self.is_playing());
        self.phase = SessionPhase::Won;
        log::info!(
            "Level {} won in {}s with {} lives left",
            self.level.index(),
            self.elapsed_secs,
            self.lives
        );
        GameEvent::Won
    }

    /// The 1 Hz tick: round clock plus power countdowns. Scheduled
    /// independently of the frame loop and torn down when Playing ends.
    pub fn second_tick(&mut self) -> Vec<GameEvent> {
        if !self.is_playing() {
            return Vec::new();
        }
        self.elapsed_secs += 1;
        self.powers
            .second_tick()
            .into_iter()
            .map(GameEvent::PowerExpired)
            .collect()
    }

    /// mm:ss clock for the HUD
    pub fn format_elapsed(&self) -> String {
        format!("{}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_resets_run() {
        let mut session = Session::new();
        session.start(Level::Medium);
        session.lives = 1;
        session.elapsed_secs = 42;
        session.powers.collect(PowerKind::Speed);
        session.pickups[0].collected = true;

        session.start(Level::Medium);
        assert_eq!(session.lives, START_LIVES);
        assert_eq!(session.elapsed_secs, 0);
        assert!(!session.powers.has_speed());
        assert!(session.pickups.iter().all(|p| !p.collected));
        assert_eq!(session.player.position, Level::Medium.spawn());
    }

    #[test]
    fn test_fall_decrements_until_lost() {
        let mut session = Session::new();
        session.start(Level::Easy);

        assert_eq!(session.handle_fall(), GameEvent::Fell);
        assert_eq!(session.lives, 2);
        assert_eq!(session.player.position, Level::Easy.spawn());

        assert_eq!(session.handle_fall(), GameEvent::Fell);
        assert_eq!(session.lives, 1);

        assert_eq!(session.handle_fall(), GameEvent::Lost);
        assert_eq!(session.lives, 0);
        assert_eq!(session.phase, SessionPhase::Lost);
    }

    #[test]
    fn test_hit_keeps_position() {
        let mut session = Session::new();
        session.start(Level::Easy);
        session.player.position = Vec3::new(1.0, 0.5, -12.0);

        assert_eq!(session.handle_hit(), GameEvent::Hit);
        assert_eq!(session.lives, 2);
        assert_eq!(session.player.position, Vec3::new(1.0, 0.5, -12.0));
        assert_eq!(session.player.invincibility, HIT_INVINCIBILITY);
    }

    #[test]
    fn test_win_regardless_of_lives() {
        let mut session = Session::new();
        session.start(Level::Easy);
        session.lives = 1;
        assert_eq!(session.handle_win(), GameEvent::Won);
        assert_eq!(session.phase, SessionPhase::Won);
        assert_eq!(session.lives, 1);
    }

    #[test]
    fn test_second_tick_only_while_playing() {
        let mut session = Session::new();
        assert!(session.second_tick().is_empty());
        assert_eq!(session.elapsed_secs, 0);

        session.start(Level::Easy);
        session.second_tick();
        session.second_tick();
        assert_eq!(session.elapsed_secs, 2);

        session.to_menu();
        session.second_tick();
        assert_eq!(session.elapsed_secs, 2);
    }

    #[test]
    fn test_format_elapsed() {
        let mut session = Session::new();
        session.start(Level::Easy);
        session.elapsed_secs = 75;
        assert_eq!(session.format_elapsed(), "1:15");
        session.elapsed_secs = 9;
        assert_eq!(session.format_elapsed(), "0:09");
    }
}

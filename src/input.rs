//! Input sampling: keyboard state plus the two virtual touch controls
//!
//! The joystick occupies a bottom-left hot-zone and the jump button a
//! bottom-right one. The camera consults the same zones to ignore drags that
//! start on a control (see `TouchZones::claims`).

use crate::sim::TickInput;

/// Distance of both control centers from their screen corner, in pixels
pub const CONTROL_MARGIN: f32 = 90.0;
/// Joystick hot-zone radius; also full analog deflection
pub const JOYSTICK_RADIUS: f32 = 70.0;
/// Jump button hot-zone radius
pub const JUMP_RADIUS: f32 = 60.0;

/// Held movement keys
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl KeyState {
    /// Track a key transition. Returns false for keys the game ignores so
    /// the shell can let the browser keep them.
    pub fn apply(&mut self, key: &str, pressed: bool) -> bool {
        match key {
            "w" | "W" | "ArrowUp" => self.forward = pressed,
            "s" | "S" | "ArrowDown" => self.back = pressed,
            "a" | "A" | "ArrowLeft" => self.left = pressed,
            "d" | "D" | "ArrowRight" => self.right = pressed,
            " " | "Space" => self.jump = pressed,
            _ => return false,
        }
        true
    }
}

/// Screen-space hot-zones for the virtual controls
#[derive(Debug, Clone, Copy)]
pub struct TouchZones {
    pub width: f32,
    pub height: f32,
}

impl TouchZones {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn joystick_center(&self) -> (f32, f32) {
        (CONTROL_MARGIN, self.height - CONTROL_MARGIN)
    }

    pub fn jump_center(&self) -> (f32, f32) {
        (self.width - CONTROL_MARGIN, self.height - CONTROL_MARGIN)
    }

    pub fn in_joystick(&self, x: f32, y: f32) -> bool {
        let (cx, cy) = self.joystick_center();
        (x - cx).hypot(y - cy) <= JOYSTICK_RADIUS
    }

    pub fn in_jump(&self, x: f32, y: f32) -> bool {
        let (cx, cy) = self.jump_center();
        (x - cx).hypot(y - cy) <= JUMP_RADIUS
    }

    /// A touch starting here belongs to a control, not the camera
    pub fn claims(&self, x: f32, y: f32) -> bool {
        self.in_joystick(x, y) || self.in_jump(x, y)
    }
}

/// The on-screen joystick: pressed inside its zone, dragged anywhere,
/// produces an analog direction clamped to unit deflection.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualStick {
    active: bool,
    dir_x: f32,
    dir_z: f32,
}

impl VirtualStick {
    /// Begin tracking if the touch landed in the joystick zone
    pub fn press(&mut self, zones: &TouchZones, x: f32, y: f32) -> bool {
        if zones.in_joystick(x, y) {
            self.active = true;
            self.update(zones, x, y);
            true
        } else {
            false
        }
    }

    /// Follow the touch while held; screen-up maps to forward (-z)
    pub fn update(&mut self, zones: &TouchZones, x: f32, y: f32) {
        if !self.active {
            return;
        }
        let (cx, cy) = zones.joystick_center();
        self.dir_x = ((x - cx) / JOYSTICK_RADIUS).clamp(-1.0, 1.0);
        self.dir_z = ((y - cy) / JOYSTICK_RADIUS).clamp(-1.0, 1.0);
    }

    pub fn release(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Combined per-frame input source
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSampler {
    pub keys: KeyState,
    pub stick: VirtualStick,
    /// Virtual jump button held
    pub jump_held: bool,
}

impl InputSampler {
    /// Snapshot the current state into tick commands. Keyboard wins over
    /// the joystick on any axis it deflects.
    pub fn sample(&self) -> TickInput {
        let mut dir_x = 0.0;
        let mut dir_z = 0.0;

        if self.keys.left {
            dir_x -= 1.0;
        }
        if self.keys.right {
            dir_x += 1.0;
        }
        if self.keys.forward {
            dir_z -= 1.0;
        }
        if self.keys.back {
            dir_z += 1.0;
        }

        if dir_x == 0.0 && dir_z == 0.0 && self.stick.is_active() {
            dir_x = self.stick.dir_x;
            dir_z = self.stick.dir_z;
        }

        TickInput {
            dir_x,
            dir_z,
            jump: self.keys.jump || self.jump_held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut keys = KeyState::default();
        assert!(keys.apply("w", true));
        assert!(keys.apply("ArrowLeft", true));
        assert!(keys.apply(" ", true));
        assert!(!keys.apply("q", true));
        assert!(keys.forward && keys.left && keys.jump);

        keys.apply("w", false);
        assert!(!keys.forward);
    }

    #[test]
    fn test_opposed_keys_cancel() {
        let mut sampler = InputSampler::default();
        sampler.keys.apply("a", true);
        sampler.keys.apply("d", true);
        let input = sampler.sample();
        assert_eq!(input.dir_x, 0.0);
    }

    #[test]
    fn test_stick_deflection_clamped() {
        let zones = TouchZones::new(800.0, 600.0);
        let (cx, cy) = zones.joystick_center();
        let mut stick = VirtualStick::default();

        assert!(stick.press(&zones, cx + 10.0, cy));
        // Drag far past the rim: clamps to full deflection
        stick.update(&zones, cx + 500.0, cy - 500.0);
        assert_eq!(stick.dir_x, 1.0);
        assert_eq!(stick.dir_z, -1.0);

        stick.release();
        assert!(!stick.is_active());
    }

    #[test]
    fn test_press_outside_zone_ignored() {
        let zones = TouchZones::new(800.0, 600.0);
        let mut stick = VirtualStick::default();
        assert!(!stick.press(&zones, 400.0, 300.0));
        assert!(!stick.is_active());
    }

    #[test]
    fn test_keyboard_overrides_stick() {
        let zones = TouchZones::new(800.0, 600.0);
        let mut sampler = InputSampler::default();
        let (cx, cy) = zones.joystick_center();
        sampler.stick.press(&zones, cx - 30.0, cy);
        sampler.keys.apply("d", true);

        let input = sampler.sample();
        assert_eq!(input.dir_x, 1.0);
    }

    #[test]
    fn test_zones_gate_camera_touches() {
        let zones = TouchZones::new(800.0, 600.0);
        let (jx, jy) = zones.joystick_center();
        let (bx, by) = zones.jump_center();
        assert!(zones.claims(jx, jy));
        assert!(zones.claims(bx, by));
        assert!(!zones.claims(400.0, 200.0));
    }
}

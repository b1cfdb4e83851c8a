//! Game settings and preferences
//!
//! Persisted to LocalStorage, separately from any session state.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start muted
    pub muted: bool,
    /// Mute when the window loses focus
    pub mute_on_blur: bool,

    // === Controls ===
    /// Show the virtual joystick and jump button
    pub touch_controls: bool,
    /// Camera drag sensitivity multiplier
    pub camera_sensitivity: f32,
    /// Invert vertical camera drag
    pub invert_camera_y: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (skip camera trailing, pickup bob)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            touch_controls: true,
            camera_sensitivity: 1.0,
            invert_camera_y: false,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "obby_rush_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    /// Drag sensitivity with inversion applied to the vertical axis
    pub fn camera_drag_scale(&self) -> (f32, f32) {
        let y = if self.invert_camera_y { -1.0 } else { 1.0 };
        (self.camera_sensitivity, self.camera_sensitivity * y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_json() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.master_volume, settings.master_volume);
        assert_eq!(back.touch_controls, settings.touch_controls);
    }

    #[test]
    fn test_invert_flips_vertical_scale() {
        let mut settings = Settings::default();
        settings.camera_sensitivity = 2.0;
        assert_eq!(settings.camera_drag_scale(), (2.0, 2.0));
        settings.invert_camera_y = true;
        assert_eq!(settings.camera_drag_scale(), (2.0, -2.0));
    }
}

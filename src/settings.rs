//! Visual preferences
//!
//! Persisted separately from the best score in LocalStorage. None of these
//! affect the simulation.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    /// Triangle fan segments per circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 48,
        }
    }

    /// Trail length multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Glow trail behind the player
    pub trails: bool,
    /// Scrolling background grid
    pub grid: bool,
    /// Screen flash when a dash fires
    pub dash_pulse: bool,
    /// Obstacle shimmer animation
    pub shimmer: bool,
    /// Reduced motion (no grid scroll, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            trails: true,
            grid: true,
            dash_pulse: true,
            shimmer: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective dash flash (respects reduced_motion)
    pub fn effective_dash_pulse(&self) -> bool {
        self.dash_pulse && !self.reduced_motion
    }

    /// Effective grid scrolling (respects reduced_motion)
    pub fn grid_scrolls(&self) -> bool {
        self.grid && !self.reduced_motion
    }

    /// Number of trail points to draw
    pub fn trail_points(&self, max: usize) -> usize {
        if !self.trails {
            0
        } else {
            (max as f32 * self.quality.trail_quality()).round() as usize
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "neon.settings";

    /// Load settings, falling back to defaults
    pub fn load() -> Self {
        if let Some(json) = storage::get_item(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage::set_item(Self::STORAGE_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_wins() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_dash_pulse());
        assert!(!settings.grid_scrolls());
        assert!(settings.grid);
    }

    #[test]
    fn test_default_quality_is_high() {
        assert_eq!(QualityPreset::default(), QualityPreset::High);
        assert_eq!(Settings::default().quality, QualityPreset::default());
    }

    #[test]
    fn test_trail_points_follow_quality() {
        let mut settings = Settings::default();
        assert_eq!(settings.trail_points(20), 20);
        settings.quality = QualityPreset::Low;
        assert_eq!(settings.trail_points(20), 5);
        settings.trails = false;
        assert_eq!(settings.trail_points(20), 0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_save_round_trip() {
        let settings = Settings {
            quality: QualityPreset::Low,
            grid: false,
            ..Settings::default()
        };
        settings.save();
        assert_eq!(Settings::load(), settings);

        storage::set_item(Settings::STORAGE_KEY, "{ not json");
        assert_eq!(Settings::load(), Settings::default());
    }
}

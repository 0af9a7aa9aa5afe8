//! Game configuration and variant presets
//!
//! Every tuning knob of the simulation lives in [`GameConfig`]. The two
//! historical game variants are expressed as presets rather than separate
//! code paths. Persisted as JSON in the key/value store.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, StoreError};
use crate::persistence::KeyValueStore;

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Short hero, brisk stick growth
    Classic,
    /// Taller hero with legs, slower stick growth
    #[default]
    Legged,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Legged => "Legged",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "legged" | "legs" => Some(Variant::Legged),
            _ => None,
        }
    }

    /// Hero sprite height (pixels)
    pub fn hero_height(&self) -> f32 {
        match self {
            Variant::Classic => 28.0,
            Variant::Legged => 34.0,
        }
    }

    /// Stick growth at level 1 (pixels per second, before pixel scale)
    pub fn base_grow_speed(&self) -> f32 {
        match self {
            Variant::Classic => 360.0,
            Variant::Legged => 280.0,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub variant: Variant,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Device pixel ratio equivalent; scales grow and walk speeds
    pub pixel_scale: f32,
    /// Ground line as a fraction of playfield height
    pub ground_fraction: f32,

    // === Hero / stick ===
    pub hero_width: f32,
    pub hero_height: f32,
    pub hero_edge_inset: f32,
    pub stick_width: f32,
    /// Stick length cap as a fraction of playfield height
    pub stick_max_fraction: f32,
    /// Stick growth at level 1 (pixels per second, before pixel scale)
    pub base_grow_speed: f32,

    // === Platforms ===
    pub max_platforms: usize,
    pub perfect_zone_fraction: f32,
    pub perfect_zone_min: f32,
    pub perfect_zone_max: f32,
    pub first_platform_min_fraction: f32,
    pub first_platform_max_fraction: f32,

    // === Camera ===
    pub shift_duration: f32,
    pub shift_lead: f32,

    // === Timing ===
    pub max_frame_dt: f32,
    pub quiz_time_limit_secs: u32,
    pub grow_tick_interval: f32,
    /// Walked distance between step cues (pixels)
    pub step_interval: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_variant(Variant::default())
    }
}

impl GameConfig {
    /// Create a configuration from a variant preset
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            variant,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            pixel_scale: 1.0,
            ground_fraction: GROUND_FRACTION,

            hero_width: 24.0,
            hero_height: variant.hero_height(),
            hero_edge_inset: HERO_EDGE_INSET,
            stick_width: STICK_WIDTH,
            stick_max_fraction: STICK_MAX_FRACTION,
            base_grow_speed: variant.base_grow_speed(),

            max_platforms: MAX_PLATFORMS,
            perfect_zone_fraction: PERFECT_ZONE_FRACTION,
            perfect_zone_min: PERFECT_ZONE_MIN,
            perfect_zone_max: PERFECT_ZONE_MAX,
            first_platform_min_fraction: FIRST_PLATFORM_MIN_FRACTION,
            first_platform_max_fraction: FIRST_PLATFORM_MAX_FRACTION,

            shift_duration: SHIFT_DURATION,
            shift_lead: SHIFT_LEAD,

            max_frame_dt: MAX_FRAME_DT,
            quiz_time_limit_secs: QUIZ_TIME_LIMIT_SECS,
            grow_tick_interval: GROW_TICK_INTERVAL,
            step_interval: STEP_INTERVAL,
        }
    }

    /// Apply a variant preset (updates variant-dependent settings)
    pub fn apply_variant(&mut self, variant: Variant) {
        self.variant = variant;
        self.hero_height = variant.hero_height();
        self.base_grow_speed = variant.base_grow_speed();
    }

    /// Ground line y coordinate
    pub fn ground_y(&self) -> f32 {
        (self.playfield_height * self.ground_fraction).floor()
    }

    /// Longest stick the hero can grow
    pub fn stick_max_len(&self) -> f32 {
        self.playfield_height * self.stick_max_fraction
    }

    /// Check every field against its usable range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.playfield_width > 0.0 && self.playfield_height > 0.0) {
            return Err(ConfigError::Playfield {
                width: self.playfield_width,
                height: self.playfield_height,
            });
        }
        if !(self.hero_width > 0.0 && self.hero_height > 0.0)
            || self.hero_width >= self.playfield_width
        {
            return Err(ConfigError::HeroSize {
                width: self.hero_width,
                height: self.hero_height,
            });
        }
        check_range("pixel_scale", self.pixel_scale, 0.25, 4.0)?;
        check_range("ground_fraction", self.ground_fraction, 0.1, 1.0)?;
        check_range("stick_width", self.stick_width, 0.5, 64.0)?;
        check_range("stick_max_fraction", self.stick_max_fraction, 0.1, 1.0)?;
        check_range("base_grow_speed", self.base_grow_speed, 1.0, 5000.0)?;
        check_range("perfect_zone_fraction", self.perfect_zone_fraction, 0.01, 1.0)?;
        check_range("perfect_zone_min", self.perfect_zone_min, 1.0, MIN_PLATFORM_WIDTH)?;
        if self.perfect_zone_min > self.perfect_zone_max {
            return Err(ConfigError::PerfectZone {
                min: self.perfect_zone_min,
                max: self.perfect_zone_max,
            });
        }
        check_range("first_platform_min_fraction", self.first_platform_min_fraction, 0.05, 0.6)?;
        check_range(
            "first_platform_max_fraction",
            self.first_platform_max_fraction,
            self.first_platform_min_fraction,
            0.6,
        )?;
        check_range("shift_duration", self.shift_duration, 0.001, 10.0)?;
        check_range("max_frame_dt", self.max_frame_dt, 0.001, 0.25)?;
        check_range("grow_tick_interval", self.grow_tick_interval, 0.001, 10.0)?;
        check_range("step_interval", self.step_interval, 1.0, 1000.0)?;
        if self.max_platforms < 3 {
            return Err(ConfigError::QueueCapacity(self.max_platforms));
        }
        if self.quiz_time_limit_secs == 0 {
            return Err(ConfigError::QuizTimeLimit);
        }
        Ok(())
    }

    /// Store key
    const STORAGE_KEY: &'static str = "stick_bridge_settings";

    /// Load configuration from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<GameConfig>(&json) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("Loaded {} config from store", config.variant.as_str());
                        return config;
                    }
                    Err(e) => log::warn!("Stored config rejected: {}", e),
                },
                Err(e) => log::warn!("Stored config unreadable: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Config store unavailable: {}", e),
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save configuration to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Config saved");
        Ok(())
    }
}

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(GameConfig::from_variant(Variant::Classic).validate().is_ok());
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!(Variant::from_str("CLASSIC"), Some(Variant::Classic));
        assert_eq!(Variant::from_str("legs"), Some(Variant::Legged));
        assert_eq!(Variant::from_str("wobbly"), None);
    }

    #[test]
    fn test_apply_variant() {
        let mut config = GameConfig::default();
        config.apply_variant(Variant::Classic);
        assert_eq!(config.hero_height, 28.0);
        assert_eq!(config.base_grow_speed, 360.0);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let config = GameConfig {
            playfield_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Playfield { .. })));

        let config = GameConfig {
            perfect_zone_min: 16.0,
            perfect_zone_max: 12.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PerfectZone { .. })));

        let config = GameConfig {
            max_platforms: 2,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::QueueCapacity(2)));

        let config = GameConfig {
            quiz_time_limit_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::QuizTimeLimit));
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let config = GameConfig {
            playfield_width: 1280.0,
            ..GameConfig::from_variant(Variant::Classic)
        };
        config.save(&mut store).unwrap();
        assert_eq!(GameConfig::load(&store), config);
    }

    #[test]
    fn test_load_falls_back_on_garbage() {
        let mut store = MemoryStore::new();
        store.set(GameConfig::STORAGE_KEY, "{not json").unwrap();
        assert_eq!(GameConfig::load(&store), GameConfig::default());
    }
}

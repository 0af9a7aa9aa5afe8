//! Difficulty model
//!
//! A pure function of level: gaps widen, platforms narrow, and the stick,
//! rotation and walk all speed up. Every parameter saturates so high levels
//! stay playable.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_PLATFORM_WIDTH;
use crate::settings::GameConfig;

/// Gap range as a fraction of playfield width: (level-1 value, per level, ceiling)
const GAP_MIN: (f32, f32, f32) = (0.10, 0.010, 0.22);
const GAP_MAX: (f32, f32, f32) = (0.34, 0.018, 0.48);
/// Width range as a fraction of playfield width: (level-1 value, per level, floor)
const WIDTH_MIN: (f32, f32, f32) = (0.09, 0.004, 0.05);
const WIDTH_MAX: (f32, f32, f32) = (0.26, 0.008, 0.10);

/// Extra grow speed per level (pixels/s) and its ceiling
const GROW_PER_LEVEL: f32 = 8.0;
const GROW_BONUS_MAX: f32 = 200.0;
/// Rotation step per tick (radians)
const ROTATE_BASE: f32 = 0.15;
const ROTATE_PER_LEVEL: f32 = 0.004;
const ROTATE_MAX: f32 = 0.25;
/// Walk speed (pixels/s)
const WALK_BASE: f32 = 460.0;
const WALK_PER_LEVEL: f32 = 10.0;
const WALK_MAX: f32 = 760.0;

/// Difficulty parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub gap_min: u32,
    pub gap_max: u32,
    pub width_min: u32,
    pub width_max: u32,
    /// Stick growth (pixels per second)
    pub grow_speed: f32,
    /// Stick rotation (radians per tick, not dt-scaled)
    pub rotate_speed: f32,
    /// Hero walk speed (pixels per second)
    pub walk_speed: f32,
}

impl Difficulty {
    /// Difficulty for a 1-based level
    pub fn for_level(level: u32, config: &GameConfig) -> Self {
        let step = level.max(1).saturating_sub(1) as f32;
        let width = config.playfield_width;
        let scale = config.pixel_scale;

        // The gap must stay bridgeable by the longest stick
        let reach = (config.stick_max_len() - config.hero_edge_inset).floor().max(2.0) as u32;

        let gap_max = pixels(width, (GAP_MAX.0 + GAP_MAX.1 * step).min(GAP_MAX.2));
        let gap_max = gap_max.clamp(2, reach);
        let gap_min = pixels(width, (GAP_MIN.0 + GAP_MIN.1 * step).min(GAP_MIN.2));
        let gap_min = gap_min.clamp(1, gap_max - 1);

        let width_min = pixels(width, (WIDTH_MIN.0 - WIDTH_MIN.1 * step).max(WIDTH_MIN.2));
        let width_min = width_min.max(MIN_PLATFORM_WIDTH as u32);
        let width_max = pixels(width, (WIDTH_MAX.0 - WIDTH_MAX.1 * step).max(WIDTH_MAX.2));
        let width_max = width_max.max(width_min);

        Self {
            gap_min,
            gap_max,
            width_min,
            width_max,
            grow_speed: (config.base_grow_speed + (GROW_PER_LEVEL * step).min(GROW_BONUS_MAX))
                * scale,
            rotate_speed: (ROTATE_BASE + ROTATE_PER_LEVEL * step).min(ROTATE_MAX),
            walk_speed: (WALK_BASE + WALK_PER_LEVEL * step).min(WALK_MAX) * scale,
        }
    }
}

/// Whole pixels covered by a fraction of the playfield.
/// The epsilon absorbs f32 representation error (0.26 * 900 must be 234).
fn pixels(extent: f32, fraction: f32) -> u32 {
    (extent * fraction + 1e-3).floor().max(0.0) as u32
}

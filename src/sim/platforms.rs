//! Platforms and the procedural platform generator
//!
//! Platforms live in a rolling queue: index 0 supports the hero, index 1 is
//! the target for the next stick. New platforms are appended after the last
//! one and the oldest is evicted once the queue is over capacity.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use crate::consts::MIN_PLATFORM_WIDTH;
use crate::settings::GameConfig;

/// A platform top surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub width: f32,
    /// Left edge of the perfect zone
    pub perfect_x: f32,
    pub perfect_width: f32,
}

/// Outcome of a stick tip touching down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub ok: bool,
    pub perfect: bool,
    pub stick_end: f32,
}

impl Platform {
    /// Build a platform with a centered perfect zone.
    ///
    /// The zone is a fraction of the width clamped to the configured
    /// min/max, and never wider than the platform itself.
    pub fn new(x: f32, width: f32, config: &GameConfig) -> Self {
        let width = width.max(0.0);
        let perfect_width = (width * config.perfect_zone_fraction)
            .floor()
            .clamp(config.perfect_zone_min, config.perfect_zone_max)
            .min(width);
        Self {
            x,
            width,
            perfect_x: x + width / 2.0 - perfect_width / 2.0,
            perfect_width,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Whether a point lies on the platform (edges inclusive)
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }

    /// Whether a point lies in the perfect zone (edges inclusive)
    #[inline]
    pub fn in_perfect_zone(&self, x: f32) -> bool {
        x >= self.perfect_x && x <= self.perfect_x + self.perfect_width
    }

    /// Evaluate a stick tip landing on this platform
    pub fn landing(&self, stick_end: f32) -> Landing {
        Landing {
            ok: self.contains(stick_end),
            perfect: self.in_perfect_zone(stick_end),
            stick_end,
        }
    }
}

/// The first platform of a round, under the hero at the left of the screen
pub fn first_platform(rng: &mut impl Rng, config: &GameConfig) -> Platform {
    let min = (config.playfield_width * config.first_platform_min_fraction).floor() as u32;
    let max = (config.playfield_width * config.first_platform_max_fraction).floor() as u32;
    let min = min.max(MIN_PLATFORM_WIDTH as u32);
    let width = rng.random_range(min..=max.max(min));
    Platform::new(crate::consts::FIRST_PLATFORM_X, width as f32, config)
}

/// Generate the next platform after the last queued one.
///
/// Appends it to `platforms`, evicts the oldest entries beyond the
/// configured capacity, and returns the new platform.
pub fn spawn_next(
    platforms: &mut VecDeque<Platform>,
    difficulty: &Difficulty,
    rng: &mut impl Rng,
    config: &GameConfig,
) -> Platform {
    let gap = rng.random_range(difficulty.gap_min..=difficulty.gap_max);
    let width = rng.random_range(difficulty.width_min..=difficulty.width_max);
    debug_assert!((difficulty.gap_min..=difficulty.gap_max).contains(&gap));
    debug_assert!((difficulty.width_min..=difficulty.width_max).contains(&width));

    let width = (width as f32).max(MIN_PLATFORM_WIDTH);
    let x = match platforms.back() {
        Some(last) => last.right() + gap as f32,
        None => crate::consts::FIRST_PLATFORM_X,
    };

    let platform = Platform::new(x, width, config);
    log::debug!(
        "Spawned platform x={} width={} gap={} perfect=[{}, {}]",
        platform.x,
        platform.width,
        gap,
        platform.perfect_x,
        platform.perfect_x + platform.perfect_width
    );

    platforms.push_back(platform);
    while platforms.len() > config.max_platforms {
        platforms.pop_front();
    }
    platform
}

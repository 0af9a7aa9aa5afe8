//! Stick Bridge - A timing arcade game with a rescue quiz
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machine, platforms, quiz)
//! - `scoring`: Score, level and persisted best score
//! - `persistence`: String-keyed key/value stores
//! - `settings`: Game configuration and variant presets
//! - `autoplay`: Idle/demo bot driving the hold input

pub mod autoplay;
pub mod error;
pub mod persistence;
pub mod scoring;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, QuizError, StoreError};
pub use scoring::ScoreBoard;
pub use settings::{GameConfig, Variant};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.032;

    /// Default playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 900.0;
    pub const PLAYFIELD_HEIGHT: f32 = 520.0;
    /// Ground line as a fraction of playfield height
    pub const GROUND_FRACTION: f32 = 0.80;

    /// Stick defaults
    pub const STICK_WIDTH: f32 = 6.0;
    /// Stick can never grow beyond this fraction of playfield height
    pub const STICK_MAX_FRACTION: f32 = 0.95;
    /// Stick length synthesized after a rescue never drops below this
    pub const STICK_RESCUE_MIN_LEN: f32 = 10.0;

    /// Hero stands this far from the right edge of its platform
    pub const HERO_EDGE_INSET: f32 = 10.0;

    /// First platform position and width range (fraction of playfield width)
    pub const FIRST_PLATFORM_X: f32 = 80.0;
    pub const FIRST_PLATFORM_MIN_FRACTION: f32 = 0.23;
    pub const FIRST_PLATFORM_MAX_FRACTION: f32 = 0.32;

    /// Perfect zone sizing
    pub const PERFECT_ZONE_FRACTION: f32 = 0.18;
    pub const PERFECT_ZONE_MIN: f32 = 10.0;
    pub const PERFECT_ZONE_MAX: f32 = 18.0;
    /// Generated platforms are never narrower than this
    pub const MIN_PLATFORM_WIDTH: f32 = 20.0;

    /// Rolling platform window
    pub const MAX_PLATFORMS: usize = 7;

    /// Camera shift after a successful landing
    pub const SHIFT_DURATION: f32 = 0.42;
    pub const SHIFT_LEAD: f32 = 80.0;

    /// Rescue quiz
    pub const QUIZ_TIME_LIMIT_SECS: u32 = 30;
    pub const QUIZ_MAX_VALUE: u32 = 10;
    pub const QUIZ_CHOICES: usize = 4;

    /// Sound cue pacing
    pub const GROW_TICK_INTERVAL: f32 = 0.085;
    pub const STEP_INTERVAL: f32 = 24.0;

    /// Score awarded per landing
    pub const SCORE_NORMAL: u32 = 1;
    pub const SCORE_PERFECT: u32 = 2;
    /// Points per level
    pub const POINTS_PER_LEVEL: u32 = 10;
}

/// Level derived from a cumulative score (1-based, steps every 10 points)
#[inline]
pub fn level_for_score(score: u32) -> u32 {
    score / consts::POINTS_PER_LEVEL + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_steps_every_ten_points() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(9), 1);
        assert_eq!(level_for_score(10), 2);
        assert_eq!(level_for_score(19), 2);
        assert_eq!(level_for_score(125), 13);
    }
}

//! Error types
//!
//! Gameplay outcomes (missed landings, wrong answers) are not errors; these
//! cover configuration, storage and quiz-boundary faults only.

use thiserror::Error;

/// Invalid game configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("playfield must be positive, got {width}x{height}")]
    Playfield { width: f32, height: f32 },

    #[error("hero must be positive and narrower than the playfield, got {width}x{height}")]
    HeroSize { width: f32, height: f32 },

    #[error("{name} must be in {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("perfect zone min {min} exceeds max {max}")]
    PerfectZone { min: f32, max: f32 },

    #[error("platform queue capacity must be at least 3, got {0}")]
    QueueCapacity(usize),

    #[error("quiz time limit must be at least one second")]
    QuizTimeLimit,
}

/// Key/value store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable")]
    Unavailable,

    #[error("Storage rejected key {key}")]
    Rejected { key: String },
}

/// Failures when answering a rescue quiz
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The quiz already resolved or the round was reset
    #[error("quiz {quiz_id} is no longer accepting answers")]
    Expired { quiz_id: u64 },

    #[error("answer {0} is outside the quiz range")]
    OutOfRange(u32),
}

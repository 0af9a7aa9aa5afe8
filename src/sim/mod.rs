//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform dependencies:
//! - Variable timestep, capped per frame
//! - Seeded RNG only
//! - Quiz answers arrive over a channel, never through callbacks

pub mod difficulty;
pub mod platforms;
pub mod quiz;
pub mod shift;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use difficulty::Difficulty;
pub use platforms::{Landing, Platform, first_platform, spawn_next};
pub use quiz::{
    ActiveQuiz, DotGroup, Operator, QuizCountdown, QuizProblem, QuizPrompt, QuizResolution,
    QuizResponder,
};
pub use shift::ShiftAnimation;
pub use snapshot::{QuizView, RenderSnapshot};
pub use state::{DEFAULT_PLAYER_NAME, GameEvent, GamePhase, GameSession, Hero, Stick};
pub use tick::{TickInput, tick};

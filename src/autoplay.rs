//! Idle/demo mode bot
//!
//! Drives the hold input like a player would: press in `Ready`, let go once
//! the stick will reach the chosen aim point this frame. Also answers rescue
//! quizzes with a configurable hit rate.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::sim::{GamePhase, GameSession, QuizPrompt, TickInput};

/// Where on the target platform the bot tries to drop the stick tip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AimPoint {
    /// Middle of the perfect zone
    #[default]
    PerfectZone,
    /// Just past the near edge (safe, never perfect)
    NearEdge,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    pub aim_point: AimPoint,
    /// Random aim error (pixels, either direction)
    pub aim_error: f32,
    /// Chance of answering a quiz correctly
    pub quiz_accuracy: f64,
    aim_x: Option<f32>,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            aim_point: AimPoint::PerfectZone,
            aim_error: 0.0,
            quiz_accuracy: 1.0,
            aim_x: None,
        }
    }

    pub fn with_aim(mut self, aim_point: AimPoint, aim_error: f32) -> Self {
        self.aim_point = aim_point;
        self.aim_error = aim_error.max(0.0);
        self
    }

    pub fn with_quiz_accuracy(mut self, accuracy: f64) -> Self {
        self.quiz_accuracy = accuracy.clamp(0.0, 1.0);
        self
    }

    /// Decide the input edges for the next tick of `dt` seconds
    pub fn input(&mut self, session: &GameSession, dt: f32) -> TickInput {
        match session.phase {
            GamePhase::Ready => {
                self.aim_x = session.target().map(|target| {
                    let base = match self.aim_point {
                        AimPoint::PerfectZone => target.perfect_x + target.perfect_width / 2.0,
                        AimPoint::NearEdge => target.x + 1.0,
                    };
                    let error = if self.aim_error > 0.0 {
                        self.rng.random_range(-self.aim_error..=self.aim_error)
                    } else {
                        0.0
                    };
                    base + error
                });
                TickInput {
                    hold_start: true,
                    ..Default::default()
                }
            }
            GamePhase::Growing => {
                let dt = dt.clamp(0.0, session.config.max_frame_dt);
                let reach = session.stick.end_x() + session.difficulty().grow_speed * dt;
                let maxed = session.stick.len >= session.config.stick_max_len();
                let release = match self.aim_x {
                    Some(aim_x) => maxed || reach >= aim_x,
                    None => true,
                };
                TickInput {
                    hold_end: release,
                    ..Default::default()
                }
            }
            _ => TickInput::default(),
        }
    }

    /// Answer an open quiz
    pub fn answer(&mut self, prompt: QuizPrompt) -> Result<(), QuizError> {
        let correct = self.rng.random_bool(self.quiz_accuracy);
        let value = if correct {
            prompt.problem.answer
        } else {
            prompt
                .problem
                .distractors()
                .next()
                .unwrap_or(prompt.problem.answer)
        };
        log::debug!(
            "Autopilot answers {} with {} ({})",
            prompt.problem,
            value,
            if correct { "right" } else { "wrong" }
        );
        prompt.responder.answer(value)
    }
}

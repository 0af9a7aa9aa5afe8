//! Rescue quiz engine
//!
//! A missed landing opens a small arithmetic problem (results in 0..=10).
//! The presentation layer receives a [`QuizPrompt`] and answers through its
//! [`QuizResponder`], a channel sender. The session owns the receiving end
//! and resolves on the first answer it sees; dropping the receiver
//! (resolution or round reset) invalidates every outstanding responder, so
//! late answers can never touch a newer round.
//!
//! The countdown runs on real time, advanced separately from the
//! simulation step.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{QUIZ_CHOICES, QUIZ_MAX_VALUE};
use crate::error::QuizError;

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '−',
        }
    }
}

/// A row of dots shown next to the problem (removed dots are struck out)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotGroup {
    pub count: u32,
    pub removed: u32,
}

/// A generated quiz problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProblem {
    pub a: u32,
    pub b: u32,
    pub op: Operator,
    pub answer: u32,
    /// The answer plus three distinct distractors, shuffled
    pub choices: [u32; QUIZ_CHOICES],
    pub time_limit_secs: u32,
}

impl QuizProblem {
    /// Draw a problem whose result stays within 0..=10
    pub fn generate(rng: &mut impl Rng, time_limit_secs: u32) -> Self {
        let op = if rng.random_bool(0.5) {
            Operator::Add
        } else {
            Operator::Subtract
        };

        let mut a = rng.random_range(0..=QUIZ_MAX_VALUE);
        let mut b = rng.random_range(0..=QUIZ_MAX_VALUE);
        let answer = match op {
            Operator::Add => {
                while a + b > QUIZ_MAX_VALUE {
                    a = rng.random_range(0..=QUIZ_MAX_VALUE);
                    b = rng.random_range(0..=QUIZ_MAX_VALUE);
                }
                a + b
            }
            Operator::Subtract => {
                if b > a {
                    std::mem::swap(&mut a, &mut b);
                }
                a - b
            }
        };
        debug_assert!(answer <= QUIZ_MAX_VALUE);

        let mut choices = Vec::with_capacity(QUIZ_CHOICES);
        choices.push(answer);
        while choices.len() < QUIZ_CHOICES {
            let candidate = rng.random_range(0..=QUIZ_MAX_VALUE);
            if !choices.contains(&candidate) {
                choices.push(candidate);
            }
        }
        choices.shuffle(rng);

        let mut shuffled = [0; QUIZ_CHOICES];
        shuffled.copy_from_slice(&choices);

        Self {
            a,
            b,
            op,
            answer,
            choices: shuffled,
            time_limit_secs,
        }
    }

    pub fn is_correct(&self, value: u32) -> bool {
        value == self.answer
    }

    /// The wrong choices, in display order
    pub fn distractors(&self) -> impl Iterator<Item = u32> + '_ {
        self.choices.iter().copied().filter(|&c| c != self.answer)
    }

    /// Dot groups for the visual aid: both operands for addition, the
    /// minuend with the subtrahend struck out for subtraction
    pub fn groups(&self) -> [DotGroup; 2] {
        match self.op {
            Operator::Add => [
                DotGroup {
                    count: self.a,
                    removed: 0,
                },
                DotGroup {
                    count: self.b,
                    removed: 0,
                },
            ],
            Operator::Subtract => [
                DotGroup {
                    count: self.a,
                    removed: self.b,
                },
                DotGroup {
                    count: self.b,
                    removed: 0,
                },
            ],
        }
    }
}

impl fmt::Display for QuizProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = ?", self.a, self.op.symbol(), self.b)
    }
}

/// How a quiz ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizResolution {
    Correct,
    Wrong,
    TimedOut,
}

/// Whole-second countdown driven by real time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuizCountdown {
    pub remaining_secs: u32,
    accumulator: f32,
}

impl QuizCountdown {
    pub fn new(secs: u32) -> Self {
        Self {
            remaining_secs: secs,
            accumulator: 0.0,
        }
    }

    /// Advance by real seconds. Returns true once the countdown hits zero.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.accumulator += dt.max(0.0);
        while self.accumulator >= 1.0 && self.remaining_secs > 0 {
            self.accumulator -= 1.0;
            self.remaining_secs -= 1;
        }
        self.remaining_secs == 0
    }

    pub fn expired(&self) -> bool {
        self.remaining_secs == 0
    }
}

/// Answer handle given to the presentation layer
#[derive(Debug)]
pub struct QuizResponder {
    quiz_id: u64,
    tx: Sender<u32>,
}

impl QuizResponder {
    pub fn quiz_id(&self) -> u64 {
        self.quiz_id
    }

    /// Submit the chosen value. A rejected value leaves the quiz open, so
    /// the same responder can answer again.
    pub fn answer(&self, value: u32) -> Result<(), QuizError> {
        if value > QUIZ_MAX_VALUE {
            return Err(QuizError::OutOfRange(value));
        }
        self.tx.send(value).map_err(|_| QuizError::Expired {
            quiz_id: self.quiz_id,
        })
    }
}

/// What the presentation layer needs to show and answer a quiz
#[derive(Debug)]
pub struct QuizPrompt {
    pub problem: QuizProblem,
    pub responder: QuizResponder,
}

/// A quiz awaiting resolution, owned by the session
#[derive(Debug)]
pub struct ActiveQuiz {
    pub id: u64,
    pub problem: QuizProblem,
    pub countdown: QuizCountdown,
    rx: Receiver<u32>,
    responder: Option<QuizResponder>,
}

impl ActiveQuiz {
    pub fn open(id: u64, rng: &mut impl Rng, time_limit_secs: u32) -> Self {
        let problem = QuizProblem::generate(rng, time_limit_secs);
        let (tx, rx) = mpsc::channel();
        Self {
            id,
            countdown: QuizCountdown::new(time_limit_secs),
            problem,
            rx,
            responder: Some(QuizResponder { quiz_id: id, tx }),
        }
    }

    /// Hand out the prompt; only the first call gets it
    pub fn take_prompt(&mut self) -> Option<QuizPrompt> {
        self.responder.take().map(|responder| QuizPrompt {
            problem: self.problem.clone(),
            responder,
        })
    }

    /// Check for a submitted answer
    pub fn poll(&mut self) -> Option<QuizResolution> {
        match self.rx.try_recv() {
            Ok(value) if self.problem.is_correct(value) => Some(QuizResolution::Correct),
            Ok(_) => Some(QuizResolution::Wrong),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Advance the countdown. A pending answer takes priority over expiry.
    pub fn advance_clock(&mut self, dt: f32) -> Option<QuizResolution> {
        if let Some(resolution) = self.poll() {
            return Some(resolution);
        }
        if self.countdown.advance(dt) {
            return Some(QuizResolution::TimedOut);
        }
        None
    }
}

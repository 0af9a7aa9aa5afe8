//! Game state and core simulation types
//!
//! Everything one game needs lives in a single owned [`GameSession`];
//! independent sessions never share state.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::platforms::{Platform, first_platform, spawn_next};
use super::quiz::ActiveQuiz;
use super::shift::ShiftAnimation;
use crate::error::ConfigError;
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::scoring::ScoreBoard;
use crate::settings::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Hero on its platform, waiting for a hold
    Ready,
    /// Stick growing while the hold lasts
    Growing,
    /// Stick falling toward horizontal
    Rotating,
    /// Hero crossing the stick
    Walking,
    /// Camera easing to the next platform pair
    Shifting,
    /// Missed landing, rescue quiz open; physics suspended
    Quiz,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "READY",
            GamePhase::Growing => "GROWING",
            GamePhase::Rotating => "ROTATING",
            GamePhase::Walking => "WALKING",
            GamePhase::Shifting => "SHIFTING",
            GamePhase::Quiz => "QUIZ",
        }
    }
}

/// Discrete cues for the sound layer (and anyone else listening)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Stick still growing (paced)
    GrowTick,
    /// Hold released, stick starts to fall
    Drop,
    /// Hero footstep while walking
    Step,
    /// Ordinary landing
    Success,
    /// Landing inside the perfect zone
    Perfect,
    /// Round lost
    Fail,
    QuizOpen,
    QuizCorrect,
    QuizWrong,
    /// Quiz countdown ran out
    TimeUp,
    /// Best score beaten
    NewBest,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GrowTick => "grow-tick",
            GameEvent::Drop => "drop",
            GameEvent::Step => "step",
            GameEvent::Success => "success",
            GameEvent::Perfect => "perfect",
            GameEvent::Fail => "fail",
            GameEvent::QuizOpen => "quiz-open",
            GameEvent::QuizCorrect => "quiz-correct",
            GameEvent::QuizWrong => "quiz-wrong",
            GameEvent::TimeUp => "time-up",
            GameEvent::NewBest => "new-best",
        }
    }
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity (pixels/s)
    pub vel_x: f32,
}

/// The bridging stick, anchored at the hero's trailing edge on the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    pub anchor: Vec2,
    pub len: f32,
    pub width: f32,
    /// 0 = upright, π/2 = horizontal
    pub angle: f32,
}

impl Stick {
    /// x of the tip once horizontal
    #[inline]
    pub fn end_x(&self) -> f32 {
        self.anchor.x + self.len
    }

    pub fn reset(&mut self) {
        self.len = 0.0;
        self.angle = 0.0;
    }
}

/// Complete state of one game
pub struct GameSession {
    pub config: GameConfig,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Hold input currently down
    pub holding: bool,
    pub hero: Hero,
    pub stick: Stick,
    /// Rolling platform window: [0] supports the hero, [1] is the target
    pub platforms: VecDeque<Platform>,
    pub camera_x: f32,
    pub shift: ShiftAnimation,
    pub scores: ScoreBoard,
    pub player_name: String,
    /// Open rescue quiz (only in `GamePhase::Quiz`)
    pub quiz: Option<ActiveQuiz>,
    /// Bumped on every round reset
    pub round: u64,
    pub(crate) store: Box<dyn KeyValueStore>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) next_quiz_id: u64,
    pub(crate) grow_tick_timer: f32,
    pub(crate) step_distance: f32,
}

/// Player name shown when none was entered
pub const DEFAULT_PLAYER_NAME: &str = "Player";

impl GameSession {
    /// Create a session with an in-memory score store
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_store(config, seed, Box::new(MemoryStore::new()))
    }

    /// Create a session persisting its best score to `store`
    pub fn with_store(
        config: GameConfig,
        seed: u64,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let scores = ScoreBoard::load(store.as_ref());
        let hero = Hero {
            pos: Vec2::ZERO,
            size: Vec2::new(config.hero_width, config.hero_height),
            vel_x: 0.0,
        };
        let stick = Stick {
            anchor: Vec2::ZERO,
            len: 0.0,
            width: config.stick_width,
            angle: 0.0,
        };

        let mut session = Self {
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            holding: false,
            hero,
            stick,
            platforms: VecDeque::with_capacity(config.max_platforms),
            camera_x: 0.0,
            shift: ShiftAnimation::default(),
            scores,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            quiz: None,
            round: 0,
            store,
            events: Vec::new(),
            next_quiz_id: 1,
            grow_tick_timer: 0.0,
            step_distance: 0.0,
            config,
        };
        session.reset_world();
        log::info!("Session created with seed {}", seed);
        Ok(session)
    }

    /// Current level (1-based)
    pub fn level(&self) -> u32 {
        self.scores.level()
    }

    /// Difficulty at the current level
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_level(self.level(), &self.config)
    }

    /// The platform the next stick must reach
    pub fn target(&self) -> Option<&Platform> {
        self.platforms.get(1)
    }

    /// Set the displayed player name; blank input falls back to the default
    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        self.player_name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.to_string()
        };
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Spawn platforms until a landing target exists
    pub(crate) fn ensure_target(&mut self) {
        while self.platforms.len() < 2 {
            let difficulty = self.difficulty();
            spawn_next(&mut self.platforms, &difficulty, &mut self.rng, &self.config);
        }
    }

    /// Fresh platforms, camera at zero, hero on the first platform.
    /// Score is left alone.
    pub(crate) fn reset_world(&mut self) {
        self.camera_x = 0.0;
        self.shift.cancel();
        self.shift.value = 0.0;
        self.quiz = None;
        self.holding = false;

        self.platforms.clear();
        let first = first_platform(&mut self.rng, &self.config);
        self.platforms.push_back(first);
        self.ensure_target();

        self.place_hero_on_support();
        self.phase = GamePhase::Ready;
    }

    /// Stand the hero near the right edge of platform 0 with a fresh stick
    pub(crate) fn place_hero_on_support(&mut self) {
        if let Some(support) = self.platforms.front() {
            self.hero.pos.x = support.right() - self.hero.size.x - self.config.hero_edge_inset;
        }
        self.hero.vel_x = 0.0;
        self.stick.reset();
        self.grow_tick_timer = 0.0;
        self.step_distance = 0.0;
        self.sync_to_ground();
        self.stick.anchor.x = self.hero.pos.x + self.hero.size.x;
    }

    /// Re-derive positions that follow from ground height and the hero.
    ///
    /// The stick stays where it was laid while the hero crosses it and the
    /// camera shifts; otherwise it is anchored at the hero's trailing edge.
    pub(crate) fn sync_to_ground(&mut self) {
        let ground_y = self.config.ground_y();
        self.hero.pos.y = ground_y - self.hero.size.y;
        self.stick.anchor.y = ground_y;
        if !matches!(self.phase, GamePhase::Walking | GamePhase::Shifting) {
            self.stick.anchor.x = self.hero.pos.x + self.hero.size.x;
        }
    }
}

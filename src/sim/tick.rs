//! Variable timestep simulation tick
//!
//! Advances the stick/hero state machine. Rendering calls [`tick`] once per
//! frame; the rescue quiz countdown is driven separately on real time via
//! [`GameSession::advance_quiz_clock`].

use std::f32::consts::FRAC_PI_2;

use super::platforms::spawn_next;
use super::quiz::{ActiveQuiz, QuizPrompt, QuizResolution};
use super::state::{GameEvent, GamePhase, GameSession};
use crate::consts::{SCORE_NORMAL, SCORE_PERFECT, STICK_RESCUE_MIN_LEN};

/// Input edges for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Pointer/key went down
    pub hold_start: bool,
    /// Pointer/key went up
    pub hold_end: bool,
}

/// Apply input edges and advance the simulation by `dt` seconds.
///
/// A hold that starts and ends in the same frame still grows the stick for
/// that one frame before it drops.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    if input.hold_start {
        session.hold_start();
    }
    session.advance(dt);
    if input.hold_end {
        session.hold_end();
    }
}

impl GameSession {
    /// Begin growing the stick. Ignored outside `Ready`.
    pub fn hold_start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        self.holding = true;
        self.phase = GamePhase::Growing;
        self.stick.reset();
        self.grow_tick_timer = 0.0;
    }

    /// Release the hold. Only a growing stick starts to fall.
    pub fn hold_end(&mut self) {
        if !self.holding {
            return;
        }
        self.holding = false;
        if self.phase == GamePhase::Growing {
            self.phase = GamePhase::Rotating;
            self.emit(GameEvent::Drop);
        }
    }

    /// Discard the current round (and any open quiz or camera shift)
    pub fn restart(&mut self) {
        self.round += 1;
        // Score first: the fresh platforms use level 1 difficulty
        self.scores.reset(self.store.as_mut());
        self.reset_world();
        log::info!("Round {} started", self.round);
    }

    /// Advance the simulation by `dt` seconds (capped at the configured max)
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, self.config.max_frame_dt);

        match self.phase {
            GamePhase::Ready => {}
            GamePhase::Growing => self.grow(dt),
            GamePhase::Rotating => self.rotate(),
            GamePhase::Walking => self.walk(dt),
            GamePhase::Shifting => self.shift_camera(dt),
            GamePhase::Quiz => {
                // Physics stays frozen; only a submitted answer can move us on
                if let Some(resolution) = self.quiz.as_mut().and_then(ActiveQuiz::poll) {
                    self.resolve_quiz(resolution);
                }
            }
        }

        self.sync_to_ground();
    }

    /// Advance the quiz countdown by real elapsed seconds.
    /// Does nothing when no quiz is open.
    pub fn advance_quiz_clock(&mut self, real_dt: f32) {
        if let Some(resolution) = self
            .quiz
            .as_mut()
            .and_then(|quiz| quiz.advance_clock(real_dt))
        {
            self.resolve_quiz(resolution);
        }
    }

    /// Hand the open quiz to the presentation layer (once per quiz)
    pub fn take_quiz_prompt(&mut self) -> Option<QuizPrompt> {
        self.quiz.as_mut().and_then(ActiveQuiz::take_prompt)
    }

    fn grow(&mut self, dt: f32) {
        let difficulty = self.difficulty();
        let max_len = self.config.stick_max_len();
        self.stick.len = (self.stick.len + difficulty.grow_speed * dt).min(max_len);

        self.grow_tick_timer += dt;
        if self.grow_tick_timer > self.config.grow_tick_interval {
            self.grow_tick_timer = 0.0;
            self.emit(GameEvent::GrowTick);
        }
    }

    fn rotate(&mut self) {
        let difficulty = self.difficulty();
        self.stick.angle += difficulty.rotate_speed;
        if self.stick.angle < FRAC_PI_2 {
            return;
        }
        self.stick.angle = FRAC_PI_2;

        self.ensure_target();
        let Some(target) = self.target().copied() else {
            return;
        };
        let landing = target.landing(self.stick.end_x());
        if landing.ok {
            self.start_walking();
        } else {
            self.open_quiz(landing.stick_end);
        }
    }

    fn start_walking(&mut self) {
        self.phase = GamePhase::Walking;
        self.hero.vel_x = self.difficulty().walk_speed;
        self.step_distance = 0.0;
    }

    fn walk(&mut self, dt: f32) {
        let step = self.hero.vel_x * dt;
        self.hero.pos.x += step;

        self.step_distance += step;
        if self.step_distance >= self.config.step_interval {
            self.step_distance = 0.0;
            self.emit(GameEvent::Step);
        }

        let end_x = self.stick.end_x() - self.hero.size.x / 2.0;
        if self.hero.pos.x < end_x {
            return;
        }
        self.hero.pos.x = end_x;
        self.hero.vel_x = 0.0;

        let Some(target) = self.target().copied() else {
            log::error!("Hero arrived with no target platform; restarting");
            self.fail_round();
            return;
        };
        let landing = target.landing(self.stick.end_x());
        if !landing.ok {
            // The rotation check already accepted this stick
            log::error!(
                "Landing check disagreed on arrival (stick end {} vs platform {}..{}); restarting",
                landing.stick_end,
                target.x,
                target.right()
            );
            self.fail_round();
            return;
        }

        let (points, cue) = if landing.perfect {
            (SCORE_PERFECT, GameEvent::Perfect)
        } else {
            (SCORE_NORMAL, GameEvent::Success)
        };
        if self.scores.award(points, self.store.as_mut()) {
            self.emit(GameEvent::NewBest);
        }
        self.emit(cue);
        log::debug!(
            "Landed at {} ({}), score {}",
            landing.stick_end,
            cue.name(),
            self.scores.score
        );

        self.phase = GamePhase::Shifting;
        self.shift.start(
            self.camera_x,
            target.x - self.config.shift_lead,
            self.config.shift_duration,
        );
    }

    fn shift_camera(&mut self, dt: f32) {
        self.camera_x = self.shift.advance(dt);
        if !self.shift.done {
            return;
        }

        self.platforms.pop_front();
        self.ensure_target();
        let difficulty = self.difficulty();
        spawn_next(&mut self.platforms, &difficulty, &mut self.rng, &self.config);

        self.phase = GamePhase::Ready;
        self.place_hero_on_support();
    }

    fn open_quiz(&mut self, stick_end: f32) {
        let id = self.next_quiz_id;
        self.next_quiz_id += 1;
        self.quiz = Some(ActiveQuiz::open(
            id,
            &mut self.rng,
            self.config.quiz_time_limit_secs,
        ));
        self.phase = GamePhase::Quiz;
        self.emit(GameEvent::QuizOpen);
        log::info!("Missed at {}, rescue quiz {} opened", stick_end, id);
    }

    /// Apply a quiz outcome. The quiz is taken out first, so a second
    /// resolution for the same quiz has nothing to act on.
    fn resolve_quiz(&mut self, resolution: QuizResolution) {
        let Some(quiz) = self.quiz.take() else {
            return;
        };
        log::info!("Quiz {} resolved: {:?}", quiz.id, resolution);
        drop(quiz);

        match resolution {
            QuizResolution::Correct => {
                self.emit(GameEvent::QuizCorrect);
                self.ensure_target();
                if let Some(target) = self.target().copied() {
                    self.stick.len =
                        (target.center() - self.stick.anchor.x).max(STICK_RESCUE_MIN_LEN);
                }
                self.start_walking();
            }
            QuizResolution::Wrong => {
                self.emit(GameEvent::QuizWrong);
                self.fail_round();
            }
            QuizResolution::TimedOut => {
                self.emit(GameEvent::TimeUp);
                self.fail_round();
            }
        }
    }

    fn fail_round(&mut self) {
        self.emit(GameEvent::Fail);
        log::info!(
            "Round {} over with score {} (best {})",
            self.round,
            self.scores.score,
            self.scores.best
        );
        self.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::platforms::Platform;

    const DT: f32 = 1.0 / 60.0;
    const PRESS: TickInput = TickInput {
        hold_start: true,
        hold_end: false,
    };
    const RELEASE: TickInput = TickInput {
        hold_start: false,
        hold_end: true,
    };

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), 12345).unwrap()
    }

    /// Put the stick anchor at `anchor_x` with platform 1 at x=500, width=100
    fn rig(session: &mut GameSession, anchor_x: f32) {
        let config = session.config.clone();
        session.hero.pos.x = anchor_x - session.hero.size.x;
        session.platforms[0] = Platform::new(anchor_x - 200.0, 200.0 + 10.0, &config);
        session.platforms[1] = Platform::new(500.0, 100.0, &config);
        session.sync_to_ground();
    }

    fn run_until(session: &mut GameSession, phase: GamePhase, max_ticks: usize) {
        for _ in 0..max_ticks {
            if session.phase == phase {
                return;
            }
            session.advance(DT);
        }
        panic!("never reached {:?}, stuck in {:?}", phase, session.phase);
    }

    #[test]
    fn test_hold_grows_and_release_drops() {
        let mut s = session();
        tick(&mut s, &PRESS, DT);
        assert_eq!(s.phase, GamePhase::Growing);
        let len = s.stick.len;
        assert!((len - 280.0 * DT).abs() < 1e-3);

        tick(&mut s, &TickInput::default(), DT);
        assert!(s.stick.len > len);
        assert_eq!(s.stick.angle, 0.0);

        tick(&mut s, &RELEASE, DT);
        assert_eq!(s.phase, GamePhase::Rotating);
        assert!(s.drain_events().contains(&GameEvent::Drop));
    }

    #[test]
    fn test_growth_is_capped() {
        let mut s = session();
        s.hold_start();
        for _ in 0..1000 {
            s.advance(DT);
        }
        assert_eq!(s.stick.len, s.config.stick_max_len());
    }

    #[test]
    fn test_dt_is_capped() {
        let mut s = session();
        s.hold_start();
        s.advance(5.0);
        assert!((s.stick.len - 280.0 * s.config.max_frame_dt).abs() < 1e-3);
    }

    #[test]
    fn test_release_outside_growing_is_noop() {
        let mut s = session();
        s.hold_end();
        assert_eq!(s.phase, GamePhase::Ready);
        assert!(s.drain_events().is_empty());

        s.hold_start();
        s.advance(DT);
        s.hold_end();
        s.hold_end();
        assert_eq!(s.phase, GamePhase::Rotating);
        assert_eq!(s.drain_events(), vec![GameEvent::Drop]);
    }

    #[test]
    fn test_hold_start_ignored_while_busy() {
        let mut s = session();
        s.hold_start();
        s.advance(DT);
        s.hold_end();
        let len = s.stick.len;
        s.hold_start();
        assert_eq!(s.phase, GamePhase::Rotating);
        assert_eq!(s.stick.len, len);
    }

    #[test]
    fn test_rotation_is_fixed_step_and_clamps() {
        let mut s = session();
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 450.0;

        s.advance(DT);
        assert!((s.stick.angle - 0.15).abs() < 1e-6);
        // Same step regardless of dt
        s.advance(DT / 4.0);
        assert!((s.stick.angle - 0.30).abs() < 1e-6);

        run_until(&mut s, GamePhase::Walking, 20);
        assert_eq!(s.stick.angle, FRAC_PI_2);
    }

    #[test]
    fn test_perfect_landing_scores_two() {
        let mut s = session();
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 450.0;

        run_until(&mut s, GamePhase::Walking, 20);
        assert_eq!(s.stick.end_x(), 550.0);
        assert_eq!(s.hero.vel_x, 460.0);

        run_until(&mut s, GamePhase::Shifting, 200);
        assert_eq!(s.hero.pos.x, 550.0 - 12.0);
        assert_eq!(s.scores.score, 2);
        assert_eq!(s.level(), 1);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::Perfect));
        assert!(!events.contains(&GameEvent::Success));
    }

    #[test]
    fn test_arrival_recheck_failure_restarts_round() {
        let mut s = session();
        s.scores.score = 6;
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 450.0;
        run_until(&mut s, GamePhase::Walking, 20);

        // Target moves out of reach while the hero is on the stick
        let config = s.config.clone();
        s.platforms[1] = Platform::new(900.0, 100.0, &config);
        run_until(&mut s, GamePhase::Ready, 200);

        assert_eq!(s.scores.score, 0);
        assert_eq!(s.round, 1);
        assert_eq!(s.camera_x, 0.0);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::Fail));
        assert!(!events.contains(&GameEvent::Perfect));
        assert!(!events.contains(&GameEvent::Success));
    }

    #[test]
    fn test_normal_landing_then_shift() {
        let mut s = session();
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 410.0; // tip at 510, outside [541, 559]

        run_until(&mut s, GamePhase::Shifting, 200);
        assert_eq!(s.scores.score, 1);
        assert!(s.drain_events().contains(&GameEvent::Success));
        assert_eq!(s.shift.to, 500.0 - 80.0);

        // Stick stays laid across the gap while the camera moves
        s.advance(DT);
        assert_eq!(s.stick.anchor.x, 100.0);

        run_until(&mut s, GamePhase::Ready, 100);
        assert_eq!(s.camera_x, 420.0);
        assert_eq!(s.platforms[0], Platform::new(500.0, 100.0, &s.config));
        assert!(s.platforms.len() >= 3);
        assert_eq!(s.hero.pos.x, 600.0 - 24.0 - 10.0);
        assert_eq!(s.stick.anchor.x, 600.0 - 10.0);
        assert_eq!(s.stick.len, 0.0);
        assert_eq!(s.stick.angle, 0.0);
    }

    #[test]
    fn test_miss_opens_quiz_and_freezes_physics() {
        let mut s = session();
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 380.0; // tip at 480

        run_until(&mut s, GamePhase::Quiz, 20);
        assert!(s.quiz.is_some());
        assert!(s.drain_events().contains(&GameEvent::QuizOpen));

        let hero = s.hero;
        let stick = s.stick;
        for _ in 0..100 {
            s.advance(DT);
        }
        assert_eq!(s.phase, GamePhase::Quiz);
        assert_eq!(s.hero, hero);
        assert_eq!(s.stick, stick);
    }

    #[test]
    fn test_correct_answer_walks_to_midpoint() {
        let mut s = session();
        s.scores.score = 5;
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 380.0;
        run_until(&mut s, GamePhase::Quiz, 20);

        let prompt = s.take_quiz_prompt().unwrap();
        assert!(s.take_quiz_prompt().is_none());
        prompt.responder.answer(prompt.problem.answer).unwrap();

        s.advance(DT);
        assert!(matches!(s.phase, GamePhase::Walking));
        assert_eq!(s.stick.len, 450.0);
        assert!(s.drain_events().contains(&GameEvent::QuizCorrect));

        run_until(&mut s, GamePhase::Shifting, 200);
        assert_eq!(s.scores.score, 7);
    }

    #[test]
    fn test_wrong_answer_resets_round() {
        let mut s = session();
        s.scores.score = 5;
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 380.0;
        run_until(&mut s, GamePhase::Quiz, 20);

        let prompt = s.take_quiz_prompt().unwrap();
        let wrong = prompt.problem.distractors().next().unwrap();
        prompt.responder.answer(wrong).unwrap();
        s.advance(DT);

        assert_eq!(s.phase, GamePhase::Ready);
        assert_eq!(s.scores.score, 0);
        assert_eq!(s.camera_x, 0.0);
        assert_eq!(s.round, 1);
        assert!(s.quiz.is_none());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::QuizWrong));
        assert!(events.contains(&GameEvent::Fail));
    }

    #[test]
    fn test_timeout_resets_and_late_answer_expires() {
        let mut s = session();
        s.scores.score = 3;
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 380.0;
        run_until(&mut s, GamePhase::Quiz, 20);
        let prompt = s.take_quiz_prompt().unwrap();

        for _ in 0..29 {
            s.advance_quiz_clock(1.0);
        }
        assert_eq!(s.phase, GamePhase::Quiz);
        s.advance_quiz_clock(1.0);
        assert_eq!(s.phase, GamePhase::Ready);
        assert_eq!(s.scores.score, 0);
        assert!(s.drain_events().contains(&GameEvent::TimeUp));

        assert!(prompt.responder.answer(prompt.problem.answer).is_err());
        s.advance(DT);
        assert_eq!(s.scores.score, 0);
        assert_eq!(s.phase, GamePhase::Ready);
    }

    #[test]
    fn test_restart_discards_shift() {
        let mut s = session();
        rig(&mut s, 100.0);
        s.phase = GamePhase::Rotating;
        s.stick.len = 450.0;
        run_until(&mut s, GamePhase::Shifting, 200);
        s.advance(DT);

        s.restart();
        assert_eq!(s.phase, GamePhase::Ready);
        assert_eq!(s.camera_x, 0.0);
        assert!(!s.shift.active);
        for _ in 0..60 {
            s.advance(DT);
        }
        assert_eq!(s.camera_x, 0.0);
        assert_eq!(s.scores.best, 2);
    }

    #[test]
    fn test_hero_y_follows_ground() {
        let mut s = session();
        s.hero.pos.y = -50.0;
        s.advance(DT);
        assert_eq!(s.hero.pos.y, s.config.ground_y() - s.hero.size.y);
    }

    #[test]
    fn test_determinism() {
        let mut a = session();
        let mut b = session();
        let inputs = [PRESS, TickInput::default(), TickInput::default(), RELEASE];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input, DT);
                tick(&mut b, input, DT);
            }
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.hero, b.hero);
        assert_eq!(a.stick, b.stick);
    }
}

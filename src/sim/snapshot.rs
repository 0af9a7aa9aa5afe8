//! Read-only view of a session for rendering and HUD

use serde::Serialize;

use super::platforms::Platform;
use super::quiz::{DotGroup, QuizProblem};
use super::state::{GamePhase, GameSession, Hero, Stick};

/// Open quiz as the overlay shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizView {
    pub id: u64,
    pub text: String,
    pub problem: QuizProblem,
    /// Dot rows for the visual aid
    pub groups: [DotGroup; 2],
    pub remaining_secs: u32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Upper-case phase tag for the page ("READY", "QUIZ", ...)
    pub state: &'static str,
    pub phase: GamePhase,
    pub hero: Hero,
    pub stick: Stick,
    pub platforms: Vec<Platform>,
    pub camera_x: f32,
    pub ground_y: f32,
    pub score: u32,
    pub level: u32,
    pub best: u32,
    pub player_name: String,
    pub quiz: Option<QuizView>,
}

impl GameSession {
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            state: self.phase.as_str(),
            phase: self.phase,
            hero: self.hero,
            stick: self.stick,
            platforms: self.platforms.iter().copied().collect(),
            camera_x: self.camera_x,
            ground_y: self.config.ground_y(),
            score: self.scores.score,
            level: self.level(),
            best: self.scores.best,
            player_name: self.player_name.clone(),
            quiz: self.quiz.as_ref().map(|quiz| QuizView {
                id: quiz.id,
                text: quiz.problem.to_string(),
                problem: quiz.problem.clone(),
                groups: quiz.problem.groups(),
                remaining_secs: quiz.countdown.remaining_secs,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::GameConfig;
    use crate::sim::quiz::ActiveQuiz;
    use crate::sim::state::{GamePhase, GameSession};

    #[test]
    fn test_snapshot_mirrors_session() {
        let mut session = GameSession::new(GameConfig::default(), 5).unwrap();
        session.set_player_name("Sam");
        let snap = session.snapshot();
        assert_eq!(snap.phase, GamePhase::Ready);
        assert_eq!(snap.platforms.len(), session.platforms.len());
        assert_eq!(snap.hero, session.hero);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.player_name, "Sam");
        assert!(snap.quiz.is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = GameSession::new(GameConfig::default(), 5).unwrap();
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Ready\""));
        assert!(json.contains("\"state\":\"READY\""));
        assert!(json.contains("\"camera_x\":0.0"));
    }

    #[test]
    fn test_snapshot_exposes_open_quiz() {
        let mut session = GameSession::new(GameConfig::default(), 5).unwrap();
        session.quiz = Some(ActiveQuiz::open(3, &mut session.rng, 30));
        session.phase = GamePhase::Quiz;

        let snap = session.snapshot();
        assert_eq!(snap.state, "QUIZ");
        let quiz = snap.quiz.unwrap();
        assert_eq!(quiz.id, 3);
        assert_eq!(quiz.remaining_secs, 30);
        assert_eq!(quiz.groups, quiz.problem.groups());
        assert_eq!(quiz.groups[0].count, quiz.problem.a);
        assert_eq!(quiz.text, quiz.problem.to_string());
    }
}

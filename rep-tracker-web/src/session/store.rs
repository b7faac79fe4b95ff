//! Session state - rep count, phase and histories for the UI
//!
//! Owned by the tracker pipeline. The rep detector and the scoring step
//! write it; everything else only reads snapshots.

use serde::{Deserialize, Serialize};

use crate::reps::{Exercise, Phase, RepRecord};
use crate::scoring::ScoreRecord;

/// What the header/UI shows each frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub exercise: Exercise,
    pub reps: u32,
    pub phase: Phase,
}

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    exercise: Exercise,
    reps: u32,
    phase: Phase,
    rep_history: Vec<RepRecord>,
    score_history: Vec<ScoreRecord>,
}

impl SessionState {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            exercise: self.exercise,
            reps: self.reps,
            phase: self.phase,
        }
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Select an exercise. Does not clear anything by itself.
    pub fn set_exercise(&mut self, exercise: Exercise) {
        self.exercise = exercise;
    }

    /// Count one rep, returns the new total
    pub fn increment_reps(&mut self) -> u32 {
        self.reps += 1;
        self.reps
    }

    pub fn add_rep(&mut self, rep: RepRecord) {
        self.rep_history.push(rep);
    }

    pub fn add_score(&mut self, score: ScoreRecord) {
        self.score_history.push(score);
    }

    pub fn rep_history(&self) -> &[RepRecord] {
        &self.rep_history
    }

    pub fn score_history(&self) -> &[ScoreRecord] {
        &self.score_history
    }

    pub fn latest_score(&self) -> Option<&ScoreRecord> {
        self.score_history.last()
    }

    /// Clear counts, phase and histories. The exercise selection stays.
    pub fn reset(&mut self) {
        self.reps = 0;
        self.phase = Phase::Idle;
        self.rep_history.clear();
        self.score_history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(total: u8) -> ScoreRecord {
        ScoreRecord {
            rom_score: total,
            stability_score: total,
            tempo_score: total,
            total_score: total,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_increment_returns_new_count() {
        let mut session = SessionState::new(Exercise::Squat);
        assert_eq!(session.increment_reps(), 1);
        assert_eq!(session.increment_reps(), 2);
        assert_eq!(session.snapshot().reps, 2);
    }

    #[test]
    fn test_reset_keeps_exercise() {
        let mut session = SessionState::new(Exercise::Squat);
        session.increment_reps();
        session.set_phase(Phase::Down);
        session.add_score(score(80));

        session.reset();
        assert_eq!(
            session.snapshot(),
            SessionSnapshot { exercise: Exercise::Squat, reps: 0, phase: Phase::Idle }
        );
        assert!(session.score_history().is_empty());
        assert!(session.latest_score().is_none());
    }

    #[test]
    fn test_latest_score_is_last_appended() {
        let mut session = SessionState::default();
        session.add_score(score(10));
        session.add_score(score(90));
        assert_eq!(session.latest_score().map(|s| s.total_score), Some(90));
        assert_eq!(session.exercise(), Exercise::Pushup);
    }
}

//! Per-frame tracking pipeline
//!
//! landmarks -> angle snapshot -> rep detector -> scoring -> session.
//! The motion tracker sees every landmark frame alongside.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::geometry::FrameInput;
use crate::motion::{MotionMetrics, MotionTracker};
use crate::reps::{Exercise, RepDetector, RepRecord};
use crate::scoring::{self, ScoreRecord};
use crate::session::{SessionSnapshot, SessionState};

/// What one frame produced
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutcome {
    pub rep: Option<RepRecord>,
    pub score: Option<ScoreRecord>,
    pub session: SessionSnapshot,
}

/// Owns all tracking state. One per page.
pub struct FormTracker {
    config: TrackerConfig,
    session: SessionState,
    detector: RepDetector,
    motion: MotionTracker,
    latest_score: Option<ScoreRecord>,
    counting_enabled: bool,
    motion_enabled: bool,
}

impl FormTracker {
    /// `overlay` is the render surface size in pixels, `trail_capacity`
    /// the per-joint trail length for this display.
    pub fn new(config: TrackerConfig, overlay: (f64, f64), trail_capacity: usize) -> Self {
        let exercise = config.initial_exercise;
        Self {
            session: SessionState::new(exercise),
            detector: RepDetector::new(exercise, config.detector_settings()),
            motion: MotionTracker::new(overlay.0, overlay.1, trail_capacity),
            latest_score: None,
            counting_enabled: config.counting_enabled,
            motion_enabled: config.motion_enabled,
            config,
        }
    }

    /// Process one frame. `None` input means the model found no pose.
    pub fn process(&mut self, input: Option<FrameInput>, timestamp: f64) -> FrameOutcome {
        if self.motion_enabled {
            match &input {
                Some(FrameInput::Landmarks(frame)) => self.motion.update(Some(frame), timestamp),
                Some(FrameInput::Angles(_)) => {}
                None => self.motion.update(None, timestamp),
            }
        }

        let mut outcome = FrameOutcome {
            rep: None,
            score: None,
            session: self.session.snapshot(),
        };

        if !self.counting_enabled {
            return outcome;
        }

        let Some(snapshot) = input.and_then(|i| i.into_snapshot(timestamp)) else {
            return outcome;
        };

        if let Some(rep) = self.detector.update_snapshot(snapshot, &mut self.session) {
            if let Some(score) = scoring::score(Some(&rep)) {
                self.session.add_score(score);
                self.latest_score = Some(score);
                outcome.score = Some(score);
            }
            outcome.rep = Some(rep);
        }

        outcome.session = self.session.snapshot();
        outcome
    }

    /// Switch exercise. Everything from the old exercise is discarded
    /// before this returns.
    pub fn set_exercise(&mut self, exercise: Exercise) {
        self.session.set_exercise(exercise);
        self.session.reset();
        self.detector = RepDetector::new(exercise, self.config.detector_settings());
        self.latest_score = None;
        tracing::info!(%exercise, "exercise selected");
    }

    /// Clear reps, phase, histories and the in-progress cycle
    pub fn reset(&mut self) {
        self.session.reset();
        self.detector.reset(&mut self.session);
        self.latest_score = None;
        tracing::info!(exercise = %self.session.exercise(), "tracking reset");
    }

    /// Toggle rep counting. Any in-progress cycle is dropped so a rep
    /// never spans frames the detector did not see.
    pub fn set_counting_enabled(&mut self, enabled: bool) {
        if self.counting_enabled != enabled {
            self.detector.reset(&mut self.session);
        }
        self.counting_enabled = enabled;
    }

    pub fn set_motion_enabled(&mut self, enabled: bool) {
        self.motion_enabled = enabled;
        if !enabled {
            self.motion.reset();
        }
    }

    pub fn resize_overlay(&mut self, width: f64, height: f64) {
        self.motion.resize(width, height);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn detector(&self) -> &RepDetector {
        &self.detector
    }

    pub fn latest_score(&self) -> Option<&ScoreRecord> {
        self.latest_score.as_ref()
    }

    pub fn rep_history(&self) -> &[RepRecord] {
        self.session.rep_history()
    }

    pub fn score_history(&self) -> &[ScoreRecord] {
        self.session.score_history()
    }

    pub fn motion(&self) -> &MotionTracker {
        &self.motion
    }

    pub fn motion_metrics(&self) -> &MotionMetrics {
        self.motion.metrics()
    }

    pub fn is_counting_enabled(&self) -> bool {
        self.counting_enabled
    }

    pub fn is_motion_enabled(&self) -> bool {
        self.motion_enabled
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl Default for FormTracker {
    fn default() -> Self {
        let config = TrackerConfig::default();
        let capacity = config.trail_capacity;
        Self::new(config, (1.0, 1.0), capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::*;
    use crate::reps::Phase;

    /// Front-on squatter; `knee_bend` drops the hips and pushes the knees out
    fn squat_landmarks(knee_bend: f64) -> LandmarkFrame {
        let hip_y = 0.55 + knee_bend * 0.2;
        let mut frame = LandmarkFrame::empty();
        frame.set(NOSE, Some(Landmark::new(0.5, hip_y - 0.4)));
        frame.set(LEFT_SHOULDER, Some(Landmark::new(0.48, hip_y - 0.3)));
        frame.set(RIGHT_SHOULDER, Some(Landmark::new(0.52, hip_y - 0.3)));
        frame.set(LEFT_HIP, Some(Landmark::new(0.48, hip_y)));
        frame.set(RIGHT_HIP, Some(Landmark::new(0.52, hip_y)));
        // Knee pushes forward as the squat deepens
        let knee_x = knee_bend * 0.2;
        frame.set(LEFT_KNEE, Some(Landmark::new(0.48 + knee_x, 0.75)));
        frame.set(RIGHT_KNEE, Some(Landmark::new(0.52 + knee_x, 0.75)));
        frame.set(LEFT_ANKLE, Some(Landmark::new(0.48, 0.95)));
        frame.set(RIGHT_ANKLE, Some(Landmark::new(0.52, 0.95)));
        frame
    }

    fn angles(knee: f64, hip: f64, head_y: f64) -> FrameInput {
        FrameInput::Angles(AngleSnapshot {
            elbow_angle: f64::NAN,
            knee_angle: knee,
            hip_angle: hip,
            body_straightness: 150.0,
            torso_inclination: 65.0,
            head_y,
            torso_length: 0.3,
            timestamp: 0.0,
        })
    }

    fn squat_tracker() -> FormTracker {
        let config = TrackerConfig { initial_exercise: Exercise::Squat, ..TrackerConfig::default() };
        FormTracker::new(config, (640.0, 480.0), 8)
    }

    /// One clean squat rep as angle snapshots, 40ms apart
    fn feed_rep(tracker: &mut FormTracker, start: f64) -> (f64, Vec<FrameOutcome>) {
        let mut t = start;
        let mut outcomes = Vec::new();
        let script = [(170.0, 150.0, 0.2); 5]
            .into_iter()
            .chain([(80.0, 60.0, 0.45); 5])
            .chain([(170.0, 150.0, 0.2); 3]);
        for (knee, hip, head) in script {
            outcomes.push(tracker.process(Some(angles(knee, hip, head)), t));
            t += 40.0;
        }
        (t, outcomes)
    }

    #[test]
    fn test_rep_is_scored_and_recorded() {
        let mut tracker = squat_tracker();
        let (_, outcomes) = feed_rep(&mut tracker, 0.0);

        let counted: Vec<_> = outcomes.iter().filter(|o| o.rep.is_some()).collect();
        assert_eq!(counted.len(), 1);
        let score = counted[0].score.unwrap();
        assert_eq!(score.rom_score, 100);
        assert_eq!(counted[0].session.reps, 1);

        assert_eq!(tracker.latest_score(), Some(&score));
        assert_eq!(tracker.score_history().len(), 1);
        assert_eq!(tracker.rep_history().len(), 1);
    }

    #[test]
    fn test_exercise_switch_clears_everything() {
        let mut tracker = squat_tracker();
        feed_rep(&mut tracker, 0.0);
        assert_eq!(tracker.snapshot().reps, 1);

        tracker.set_exercise(Exercise::Pushup);
        assert_eq!(
            tracker.snapshot(),
            SessionSnapshot { exercise: Exercise::Pushup, reps: 0, phase: Phase::Idle }
        );
        assert!(tracker.latest_score().is_none());
        assert!(tracker.rep_history().is_empty());
        assert!(tracker.detector().cycle().is_none());
        assert_eq!(tracker.detector().exercise(), Exercise::Pushup);
    }

    #[test]
    fn test_reset_keeps_exercise() {
        let mut tracker = squat_tracker();
        let (t, _) = feed_rep(&mut tracker, 0.0);
        tracker.process(Some(angles(170.0, 150.0, 0.2)), t);

        tracker.reset();
        tracker.reset();
        assert_eq!(
            tracker.snapshot(),
            SessionSnapshot { exercise: Exercise::Squat, reps: 0, phase: Phase::Idle }
        );
        assert!(tracker.detector().cycle().is_none());
    }

    #[test]
    fn test_counting_disabled_still_tracks_motion() {
        let mut tracker = squat_tracker();
        tracker.set_counting_enabled(false);

        tracker.process(Some(FrameInput::Landmarks(squat_landmarks(0.0))), 0.0);
        tracker.process(Some(FrameInput::Landmarks(squat_landmarks(0.5))), 40.0);

        assert_eq!(tracker.snapshot().phase, Phase::Idle);
        assert!(tracker.motion_metrics().upper_body_chain > 0.0);
        assert_eq!(tracker.motion_metrics().timestamp, 40.0);
    }

    #[test]
    fn test_counting_toggle_drops_cycle_in_progress() {
        let mut tracker = squat_tracker();
        let mut t = 0.0;
        for (knee, hip, head) in [(170.0, 150.0, 0.2); 6].into_iter().chain([(80.0, 60.0, 0.45); 3]) {
            tracker.process(Some(angles(knee, hip, head)), t);
            t += 40.0;
        }
        assert_eq!(tracker.snapshot().phase, Phase::Down);

        tracker.set_counting_enabled(false);
        assert_eq!(tracker.snapshot().phase, Phase::Idle);
        t += 60_000.0;
        tracker.set_counting_enabled(true);

        let mut counted = 0;
        for _ in 0..3 {
            counted += tracker.process(Some(angles(170.0, 150.0, 0.2)), t).rep.iter().count();
            t += 40.0;
        }
        assert_eq!(counted, 0);
        assert_eq!(tracker.snapshot().reps, 0);
        // Standing again starts a fresh cycle from here
        assert_eq!(tracker.snapshot().phase, Phase::Up);
        assert!(tracker.detector().cycle().unwrap().down_time.is_none());
    }

    #[test]
    fn test_motion_toggle_resets_trails() {
        let mut tracker = squat_tracker();
        tracker.process(Some(FrameInput::Landmarks(squat_landmarks(0.0))), 0.0);
        tracker.process(Some(FrameInput::Landmarks(squat_landmarks(0.5))), 40.0);

        tracker.set_motion_enabled(false);
        assert_eq!(tracker.motion_metrics(), &MotionMetrics::default());

        // Disabled tracker ignores frames entirely
        tracker.process(Some(FrameInput::Landmarks(squat_landmarks(0.2))), 80.0);
        assert_eq!(tracker.motion_metrics().timestamp, 0.0);
    }

    #[test]
    fn test_standing_landmarks_start_a_cycle() {
        let mut tracker = squat_tracker();
        let outcome = tracker.process(Some(FrameInput::Landmarks(squat_landmarks(0.0))), 0.0);
        assert!(outcome.rep.is_none());
        assert_eq!(outcome.session.phase, Phase::Up);
    }

    #[test]
    fn test_missing_pose_changes_nothing() {
        let mut tracker = squat_tracker();
        tracker.process(Some(FrameInput::Landmarks(squat_landmarks(0.0))), 0.0);

        let outcome = tracker.process(None, 40.0);
        assert_eq!(outcome.session.phase, Phase::Up);
        assert!(outcome.rep.is_none());
    }
}

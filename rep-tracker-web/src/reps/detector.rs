//! Rep detection state machine
//!
//! IDLE -> UP -> DOWN -> UP -> ... driven by the primary joint angle.
//! One detector serves one exercise; switching exercise means building a
//! new detector.

use super::cycle::{validate, CycleAccumulator};
use super::debounce::Debouncer;
use super::exercise::{Exercise, Phase};
use super::record::RepRecord;
use super::thresholds::ExerciseThresholds;
use crate::geometry::{AngleSnapshot, FrameInput};
use crate::session::SessionState;

/// Consecutive frames a phase transition must hold for
pub const DEFAULT_DEBOUNCE_FRAMES: u32 = 2;

/// Reps finishing sooner than this after the previous one are false positives
pub const DEFAULT_MIN_REP_INTERVAL_MS: f64 = 220.0;

/// Tunables shared by both exercises
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorSettings {
    pub debounce_frames: u32,
    pub min_rep_interval_ms: f64,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            debounce_frames: DEFAULT_DEBOUNCE_FRAMES,
            min_rep_interval_ms: DEFAULT_MIN_REP_INTERVAL_MS,
        }
    }
}

pub struct RepDetector {
    thresholds: &'static ExerciseThresholds,
    settings: DetectorSettings,
    /// Live only while the phase is not idle
    cycle: Option<CycleAccumulator>,
    /// UP -> DOWN streak
    down_debounce: Debouncer,
    /// DOWN -> UP streak
    up_debounce: Debouncer,
    /// End time of the last counted rep
    last_rep_end: Option<f64>,
}

impl RepDetector {
    pub fn new(exercise: Exercise, settings: DetectorSettings) -> Self {
        Self {
            thresholds: ExerciseThresholds::for_exercise(exercise),
            settings,
            cycle: None,
            down_debounce: Debouncer::new(settings.debounce_frames),
            up_debounce: Debouncer::new(settings.debounce_frames),
            last_rep_end: None,
        }
    }

    pub fn exercise(&self) -> Exercise {
        self.thresholds.exercise
    }

    pub fn thresholds(&self) -> &'static ExerciseThresholds {
        self.thresholds
    }

    pub fn settings(&self) -> DetectorSettings {
        self.settings
    }

    /// The in-progress cycle, if any
    pub fn cycle(&self) -> Option<&CycleAccumulator> {
        self.cycle.as_ref()
    }

    /// Drop the cycle and go back to idle
    pub fn reset(&mut self, session: &mut SessionState) {
        self.cycle = None;
        self.down_debounce.reset();
        self.up_debounce.reset();
        self.last_rep_end = None;
        session.set_phase(Phase::Idle);
    }

    /// Resolve a raw input and run one update
    pub fn update(
        &mut self,
        input: FrameInput,
        timestamp: f64,
        session: &mut SessionState,
    ) -> Option<RepRecord> {
        let snapshot = input.into_snapshot(timestamp)?;
        self.update_snapshot(snapshot, session)
    }

    /// Run one update. Returns the rep if this frame completed one.
    pub fn update_snapshot(
        &mut self,
        snapshot: AngleSnapshot,
        session: &mut SessionState,
    ) -> Option<RepRecord> {
        if !snapshot.is_trackable() {
            return None;
        }

        let primary = self.thresholds.primary_angle(&snapshot);
        if !primary.is_finite() {
            return None;
        }

        let phase = session.phase();
        if phase == Phase::Idle || self.cycle.is_none() {
            if self.thresholds.is_extended(&snapshot) {
                self.begin_cycle(&snapshot, session);
                tracing::debug!(exercise = %self.exercise(), t = snapshot.timestamp, "cycle started");
            }
            return None;
        }

        if !self.thresholds.holds_posture(&snapshot) {
            tracing::debug!(exercise = %self.exercise(), t = snapshot.timestamp, "posture lost, back to idle");
            self.abandon_cycle(session);
            return None;
        }

        let cycle = self.cycle.as_mut()?;
        cycle.sample(primary, &snapshot);

        match phase {
            Phase::Up => {
                let at_bottom = self.thresholds.is_bottom(&snapshot);
                if let Some(edge) = self.down_debounce.observe(at_bottom, snapshot.timestamp) {
                    let hip = match self.thresholds.bottom_hip {
                        Some(_) => snapshot.hip_angle,
                        None => f64::NAN,
                    };
                    cycle.mark_bottom(edge, hip);
                    self.up_debounce.reset();
                    session.set_phase(Phase::Down);
                    tracing::debug!(exercise = %self.exercise(), t = edge, angle = primary, "reached bottom");
                }
                None
            }
            Phase::Down => {
                let extended = self.thresholds.is_extended(&snapshot);
                let edge = self.up_debounce.observe(extended, snapshot.timestamp)?;
                self.complete_rep(edge, &snapshot, session)
            }
            Phase::Idle => None,
        }
    }

    /// The DOWN -> UP edge: gate the candidate, count it or start over
    fn complete_rep(
        &mut self,
        end_time: f64,
        snapshot: &AngleSnapshot,
        session: &mut SessionState,
    ) -> Option<RepRecord> {
        let cycle = self.cycle.take()?;
        let rep = cycle.finish(self.exercise(), end_time);

        let verdict = validate(
            &cycle,
            &rep,
            self.thresholds,
            self.last_rep_end,
            self.settings.min_rep_interval_ms,
        );

        // Either way the next attempt is measured from this frame
        self.begin_cycle(snapshot, session);

        match verdict {
            Ok(()) => {
                let count = session.increment_reps();
                session.add_rep(rep.clone());
                self.last_rep_end = Some(rep.end_time);
                tracing::debug!(
                    exercise = %self.exercise(),
                    reps = count,
                    rom = rep.range_of_motion,
                    "rep counted"
                );
                Some(rep)
            }
            Err(reason) => {
                tracing::debug!(exercise = %self.exercise(), ?reason, "rep rejected");
                None
            }
        }
    }

    /// Anchor a new cycle on this frame; the frame itself is the first sample
    fn begin_cycle(&mut self, snapshot: &AngleSnapshot, session: &mut SessionState) {
        let mut cycle = CycleAccumulator::begin(snapshot.timestamp, snapshot.head_y);
        cycle.sample(self.thresholds.primary_angle(snapshot), snapshot);
        self.cycle = Some(cycle);
        self.down_debounce.reset();
        self.up_debounce.reset();
        session.set_phase(Phase::Up);
    }

    fn abandon_cycle(&mut self, session: &mut SessionState) {
        self.cycle = None;
        self.down_debounce.reset();
        self.up_debounce.reset();
        session.set_phase(Phase::Idle);
    }
}

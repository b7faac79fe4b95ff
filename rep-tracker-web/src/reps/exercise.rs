//! Exercise and phase enums

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Supported exercises
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    #[default]
    Pushup,
    Squat,
}

impl Exercise {
    pub const ALL: [Exercise; 2] = [Exercise::Pushup, Exercise::Squat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exercise::Pushup => "pushup",
            Exercise::Squat => "squat",
        }
    }
}

impl FromStr for Exercise {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pushup" => Ok(Exercise::Pushup),
            "squat" => Ok(Exercise::Squat),
            other => Err(TrackerError::UnknownExercise(other.to_string())),
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in a repetition the subject currently is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Not tracking a cycle (initial, or posture lost)
    #[default]
    Idle,
    /// Extended position: top of a push-up, standing for a squat
    Up,
    /// Flexed position: bottom of the movement
    Down,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Up => "up",
            Phase::Down => "down",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_exercise() {
        assert_eq!("pushup".parse::<Exercise>(), Ok(Exercise::Pushup));
        assert_eq!(" squat ".parse::<Exercise>(), Ok(Exercise::Squat));
        assert_matches!("lunge".parse::<Exercise>(), Err(TrackerError::UnknownExercise(name)) if name == "lunge");
    }

    #[test]
    fn test_names_round_trip() {
        for exercise in Exercise::ALL {
            assert_eq!(exercise.as_str().parse::<Exercise>(), Ok(exercise));
        }
        assert_eq!(Phase::Down.to_string(), "down");
    }
}

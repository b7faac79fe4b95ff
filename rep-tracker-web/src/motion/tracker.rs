//! Joint-chain motion tracking for the overlay
//!
//! Tracks recent positions per joint and the average displacement speed of
//! each chain. Purely cosmetic: nothing in rep counting reads it.

use serde::{Deserialize, Serialize};

use super::trail::{TrailBuffer, DEFAULT_TRAIL_CAPACITY};
use crate::geometry::*;

/// Delta assumed for the first frame after a reset (one 60Hz frame)
const FIRST_FRAME_DELTA_MS: f64 = 16.67;

/// Smallest time step used for speed, avoids dividing by ~0
const MIN_DELTA_SECS: f64 = 0.001;

/// Tracked joint chains
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChainKind {
    UpperBody,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl ChainKind {
    pub const ALL: [ChainKind; 5] = [
        ChainKind::UpperBody,
        ChainKind::LeftArm,
        ChainKind::RightArm,
        ChainKind::LeftLeg,
        ChainKind::RightLeg,
    ];

    /// Landmark indices along the chain
    pub fn joints(&self) -> &'static [usize] {
        match self {
            ChainKind::UpperBody => &[LEFT_SHOULDER, RIGHT_SHOULDER, RIGHT_HIP, LEFT_HIP],
            ChainKind::LeftArm => &[LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST],
            ChainKind::RightArm => &[RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST],
            ChainKind::LeftLeg => &[LEFT_HIP, LEFT_KNEE, LEFT_ANKLE],
            ChainKind::RightLeg => &[RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKind::UpperBody => "upperBodyChain",
            ChainKind::LeftArm => "leftArmChain",
            ChainKind::RightArm => "rightArmChain",
            ChainKind::LeftLeg => "leftLegChain",
            ChainKind::RightLeg => "rightLegChain",
        }
    }
}

/// One joint within a chain
#[derive(Clone, Debug)]
struct JointTrack {
    trail: TrailBuffer,
    /// Seen this frame (and therefore has a valid latest position)
    visible: bool,
}

/// State for one chain
#[derive(Clone, Debug)]
pub struct ChainTrack {
    pub kind: ChainKind,
    joints: Vec<JointTrack>,
    /// Mean joint displacement in pixels per second
    pub speed: f64,
}

impl ChainTrack {
    fn new(kind: ChainKind, capacity: usize) -> Self {
        Self {
            kind,
            joints: kind
                .joints()
                .iter()
                .map(|_| JointTrack { trail: TrailBuffer::new(capacity), visible: false })
                .collect(),
            speed: 0.0,
        }
    }

    /// Current pixel position per joint, `None` where the joint is hidden
    pub fn positions(&self) -> Vec<Option<(f64, f64)>> {
        self.joints
            .iter()
            .map(|j| if j.visible { j.trail.latest() } else { None })
            .collect()
    }

    /// Trail history per joint, oldest first
    pub fn trails(&self) -> Vec<Vec<(f64, f64)>> {
        self.joints.iter().map(|j| j.trail.points()).collect()
    }

    fn hide(&mut self) {
        for joint in &mut self.joints {
            joint.visible = false;
        }
        self.speed = 0.0;
    }

    fn clear(&mut self) {
        for joint in &mut self.joints {
            joint.trail.clear();
            joint.visible = false;
        }
        self.speed = 0.0;
    }

    fn update(&mut self, frame: &LandmarkFrame, delta_secs: f64, scale: (f64, f64)) {
        let mut displacement = 0.0;
        let mut count = 0usize;

        for (joint, &index) in self.joints.iter_mut().zip(self.kind.joints()) {
            let Some(landmark) = frame.get(index).filter(|l| l.is_finite()) else {
                joint.visible = false;
                continue;
            };

            let pos = (landmark.x * scale.0, landmark.y * scale.1);
            if joint.visible {
                if let Some(prev) = joint.trail.latest() {
                    displacement += (pos.0 - prev.0).hypot(pos.1 - prev.1);
                    count += 1;
                }
            }

            joint.trail.push(pos);
            joint.visible = true;
        }

        self.speed = if count > 0 {
            displacement / count as f64 / delta_secs
        } else {
            0.0
        };
    }
}

/// Per-chain speeds exported to the render host
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionMetrics {
    pub timestamp: f64,
    pub upper_body_chain: f64,
    pub left_arm_chain: f64,
    pub right_arm_chain: f64,
    pub left_leg_chain: f64,
    pub right_leg_chain: f64,
}

impl MotionMetrics {
    pub fn speed(&self, kind: ChainKind) -> f64 {
        match kind {
            ChainKind::UpperBody => self.upper_body_chain,
            ChainKind::LeftArm => self.left_arm_chain,
            ChainKind::RightArm => self.right_arm_chain,
            ChainKind::LeftLeg => self.left_leg_chain,
            ChainKind::RightLeg => self.right_leg_chain,
        }
    }

    fn set_speed(&mut self, kind: ChainKind, speed: f64) {
        match kind {
            ChainKind::UpperBody => self.upper_body_chain = speed,
            ChainKind::LeftArm => self.left_arm_chain = speed,
            ChainKind::RightArm => self.right_arm_chain = speed,
            ChainKind::LeftLeg => self.left_leg_chain = speed,
            ChainKind::RightLeg => self.right_leg_chain = speed,
        }
    }
}

/// Motion tracker over all chains
pub struct MotionTracker {
    chains: Vec<ChainTrack>,
    /// Overlay size in pixels
    width: f64,
    height: f64,
    /// Last frame timestamp, `None` right after a reset
    last_timestamp: Option<f64>,
    metrics: MotionMetrics,
}

impl MotionTracker {
    pub fn new(width: f64, height: f64, capacity: usize) -> Self {
        Self {
            chains: ChainKind::ALL.iter().map(|&k| ChainTrack::new(k, capacity)).collect(),
            width: clamp_dimension(width, 1.0),
            height: clamp_dimension(height, 1.0),
            last_timestamp: None,
            metrics: MotionMetrics::default(),
        }
    }

    /// Change overlay size. Old trails are in the wrong pixel space, so
    /// they are dropped.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = clamp_dimension(width, self.width);
        self.height = clamp_dimension(height, self.height);
        self.reset();
    }

    /// Feed one frame. `None` means no pose was detected.
    pub fn update(&mut self, frame: Option<&LandmarkFrame>, timestamp: f64) {
        let frame = match frame {
            Some(frame) if !frame.is_empty() => frame,
            _ => {
                // Keep the clock moving but show nothing
                if timestamp > 0.0 {
                    self.last_timestamp = Some(timestamp);
                    self.metrics.timestamp = timestamp;
                }
                self.hide_all();
                return;
            }
        };

        let delta_ms = match self.last_timestamp {
            Some(prev) => (timestamp - prev).max(1.0),
            None => FIRST_FRAME_DELTA_MS,
        };
        self.last_timestamp = Some(timestamp);
        self.metrics.timestamp = timestamp;

        let delta_secs = (delta_ms / 1000.0).max(MIN_DELTA_SECS);
        let scale = (self.width, self.height);
        for chain in &mut self.chains {
            chain.update(frame, delta_secs, scale);
            self.metrics.set_speed(chain.kind, chain.speed);
        }
    }

    /// Clear all trails and speeds
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.metrics = MotionMetrics::default();
        for chain in &mut self.chains {
            chain.clear();
        }
    }

    pub fn metrics(&self) -> &MotionMetrics {
        &self.metrics
    }

    pub fn chains(&self) -> &[ChainTrack] {
        &self.chains
    }

    pub fn chain(&self, kind: ChainKind) -> Option<&ChainTrack> {
        self.chains.iter().find(|c| c.kind == kind)
    }

    fn hide_all(&mut self) {
        for chain in &mut self.chains {
            chain.hide();
            self.metrics.set_speed(chain.kind, 0.0);
        }
    }
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new(1.0, 1.0, DEFAULT_TRAIL_CAPACITY)
    }
}

fn clamp_dimension(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.max(1.0)
    } else {
        fallback.max(1.0)
    }
}

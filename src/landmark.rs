//! Hand landmark data structures — 21 normalized points per tracked hand
//! in the detector's standard order.
//!
//! Absence of a hand is modeled as `Option::None` at the call site, never
//! as a zero-filled sample. Samples with the wrong point count are
//! rejected at construction so malformed detector output collapses into
//! the same "no hand" state.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete hand sample.
pub const LANDMARK_COUNT: usize = 21;

// ── Landmark ───────────────────────────────────────────────

/// One anatomical point, normalized to [0,1] relative to the frame.
/// Higher y is lower on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another landmark in normalized space.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ── Landmark indices ───────────────────────────────────────

/// The 21 hand landmarks in detector output order: wrist, then four
/// joints per finger from base to tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkIndex {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    LittleMcp,
    LittlePip,
    LittleDip,
    LittleTip,
}

impl LandmarkIndex {
    /// Convert to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

// ── Facing mode ────────────────────────────────────────────

/// Which way the capturing camera faces. Front-facing capture is
/// mirrored, which flips the sign convention for thumb extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacingMode {
    Front,
    Rear,
}

impl Default for FacingMode {
    fn default() -> Self {
        Self::Front
    }
}

// ── Hand sample ────────────────────────────────────────────

/// One frame's worth of hand landmarks: exactly 21 points for at most one
/// tracked hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandSample {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandSample {
    /// Build a sample from detector output. Returns `None` unless exactly
    /// 21 points are supplied; short or long frames are treated the same
    /// as no detection.
    pub fn from_points(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    /// Look up a landmark by anatomical index.
    pub fn landmark(&self, idx: LandmarkIndex) -> &Landmark {
        &self.points[idx.index()]
    }

    /// All 21 points in detector order.
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Translate every point by the same offset. Useful in tests for
    /// checking translation invariance of classification.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        let mut points = self.points;
        for p in &mut points {
            p.x += dx;
            p.y += dy;
        }
        Self { points }
    }
}

// ── Tests ──────────────────────────────────────────────────

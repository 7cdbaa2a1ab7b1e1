//! Per-frame gesture classification from hand landmark geometry.
//!
//! Maps one 21-point hand sample to a symbolic gesture label using
//! tier-adjusted thresholds. Stateless: classification depends only on
//! the sample, the threshold set, and the camera facing mode.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::capability::PerformanceTier;
use crate::landmark::{FacingMode, HandSample, LandmarkIndex};

// ── Gesture labels ─────────────────────────────────────────

/// The closed gesture alphabet. Exactly one label per frame; `None` is
/// emitted when no hand is present or no pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureLabel {
    /// Four or five fingers extended.
    OpenHand,
    /// No fingers extended (one tolerated on the Low tier).
    ClosedFist,
    /// Only the index finger extended.
    PointingRight,
    /// Index, middle, and ring extended; thumb and little not.
    RaisedHand,
    /// Thumb and index extended with their tips pinched together.
    OkGesture,
    /// No hand, or no pattern matched.
    None,
}

impl GestureLabel {
    /// String representation for host IPC and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenHand => "open-hand",
            Self::ClosedFist => "closed-fist",
            Self::PointingRight => "pointing-right",
            Self::RaisedHand => "raised-hand",
            Self::OkGesture => "ok-gesture",
            Self::None => "none",
        }
    }

    /// Parse a label from its string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open-hand" => Some(Self::OpenHand),
            "closed-fist" => Some(Self::ClosedFist),
            "pointing-right" => Some(Self::PointingRight),
            "raised-hand" => Some(Self::RaisedHand),
            "ok-gesture" => Some(Self::OkGesture),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

// ── Threshold set ──────────────────────────────────────────

/// Tier-tuned geometric thresholds, as fractions of normalized
/// landmark-space distance. Lower tiers track at lower resolution, so
/// their extension thresholds are smaller and their pinch tolerance is
/// wider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Tier the set was derived for (drives the Low-tier fist relaxation).
    pub tier: PerformanceTier,
    /// Minimum |tip.x - mcp.x| for the thumb to count as extended.
    pub horizontal_thumb_ratio: f32,
    /// Minimum joint.y - tip.y for a finger to count as extended.
    pub vertical_extension_ratio: f32,
    /// Maximum thumb-tip to index-tip distance for the OK pinch.
    pub ok_pinch_distance: f32,
}

impl ThresholdSet {
    /// The tuned threshold set for a performance tier.
    pub fn for_tier(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::Low => Self {
                tier,
                horizontal_thumb_ratio: 0.01,
                vertical_extension_ratio: 0.02,
                ok_pinch_distance: 0.15,
            },
            PerformanceTier::Medium => Self {
                tier,
                horizontal_thumb_ratio: 0.02,
                vertical_extension_ratio: 0.04,
                ok_pinch_distance: 0.12,
            },
            PerformanceTier::High => Self {
                tier,
                horizontal_thumb_ratio: 0.03,
                vertical_extension_ratio: 0.05,
                ok_pinch_distance: 0.08,
            },
        }
    }

    /// Classify one frame. `None` input (no hand this frame) is a normal
    /// state and classifies as `GestureLabel::None`.
    pub fn classify(&self, sample: Option<&HandSample>, facing: FacingMode) -> GestureLabel {
        let sample = match sample {
            Some(s) => s,
            None => return GestureLabel::None,
        };

        let fingers = FingerState::measure(sample, self, facing);
        let label = self.match_rules(&fingers, sample);
        trace!(
            "classify: {} fingers up -> {}",
            fingers.count(),
            label.as_str()
        );
        label
    }

    /// Rule table, evaluated in fixed order; the first match wins.
    fn match_rules(&self, f: &FingerState, sample: &HandSample) -> GestureLabel {
        let count = f.count();

        if count >= 4 {
            return GestureLabel::OpenHand;
        }

        // The Low tier tolerates one stray non-index extension in a fist,
        // compensating for jittery low-resolution tracking.
        let fist = count == 0
            || (self.tier == PerformanceTier::Low && count == 1 && !f.index);
        if fist {
            return GestureLabel::ClosedFist;
        }

        if f.index && !f.thumb && !f.middle && !f.ring && !f.little {
            return GestureLabel::PointingRight;
        }

        if count == 3 && f.index && f.middle && f.ring {
            return GestureLabel::RaisedHand;
        }

        if f.thumb && f.index && count == 2 {
            let pinch = sample
                .landmark(LandmarkIndex::ThumbTip)
                .distance(sample.landmark(LandmarkIndex::IndexTip));
            if pinch < self.ok_pinch_distance {
                return GestureLabel::OkGesture;
            }
        }

        GestureLabel::None
    }
}

// ── Finger extension predicates ────────────────────────────

/// Which fingers count as extended this frame.
#[derive(Debug, Clone, Copy)]
struct FingerState {
    thumb: bool,
    index: bool,
    middle: bool,
    ring: bool,
    little: bool,
}

impl FingerState {
    fn measure(sample: &HandSample, t: &ThresholdSet, facing: FacingMode) -> Self {
        // The thumb bends sideways, so its extension is measured along x.
        // Front-facing capture is mirrored; rear-facing flips the sign.
        let tip_x = sample.landmark(LandmarkIndex::ThumbTip).x;
        let mcp_x = sample.landmark(LandmarkIndex::ThumbMcp).x;
        let thumb_ratio = match facing {
            FacingMode::Front => tip_x - mcp_x,
            FacingMode::Rear => mcp_x - tip_x,
        };
        let thumb = thumb_ratio.abs() > t.horizontal_thumb_ratio;

        // Extended means the tip sits above the proximal joint by more
        // than the threshold (higher y is lower on screen). The index
        // finger is measured against its MCP, the rest against their PIP.
        let up = |joint: LandmarkIndex, tip: LandmarkIndex| {
            sample.landmark(joint).y - sample.landmark(tip).y > t.vertical_extension_ratio
        };

        Self {
            thumb,
            index: up(LandmarkIndex::IndexMcp, LandmarkIndex::IndexTip),
            middle: up(LandmarkIndex::MiddlePip, LandmarkIndex::MiddleTip),
            ring: up(LandmarkIndex::RingPip, LandmarkIndex::RingTip),
            little: up(LandmarkIndex::LittlePip, LandmarkIndex::LittleTip),
        }
    }

    fn count(&self) -> usize {
        [self.thumb, self.index, self.middle, self.ring, self.little]
            .iter()
            .filter(|&&b| b)
            .count()
    }
}

// ── Test helpers ───────────────────────────────────────────


// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn classify_all_tiers(sample: &HandSample) -> Vec<GestureLabel> {
        [
            PerformanceTier::Low,
            PerformanceTier::Medium,
            PerformanceTier::High,
        ]
        .iter()
        .map(|&t| ThresholdSet::for_tier(t).classify(Some(sample), FacingMode::Front))
        .collect()
    }

    #[test]
    fn test_no_sample_is_none_every_tier() {
        for tier in [
            PerformanceTier::Low,
            PerformanceTier::Medium,
            PerformanceTier::High,
        ] {
            let label = ThresholdSet::for_tier(tier).classify(None, FacingMode::Front);
            assert_eq!(label, GestureLabel::None);
        }
    }

    #[test]
    fn test_open_hand() {
        for label in classify_all_tiers(&open_hand()) {
            assert_eq!(label, GestureLabel::OpenHand);
        }
    }

    #[test]
    fn test_open_hand_translation_invariant() {
        let t = ThresholdSet::for_tier(PerformanceTier::Medium);
        let base = open_hand();
        for (dx, dy) in [(0.1, 0.0), (-0.2, 0.15), (0.0, -0.3)] {
            let moved = base.translated(dx, dy);
            assert_eq!(
                t.classify(Some(&moved), FacingMode::Front),
                GestureLabel::OpenHand,
                "Classification must not depend on absolute position ({}, {})",
                dx,
                dy,
            );
        }
    }

    #[test]
    fn test_closed_fist() {
        for label in classify_all_tiers(&closed_fist()) {
            assert_eq!(label, GestureLabel::ClosedFist);
        }
    }

    #[test]
    fn test_pointing() {
        for label in classify_all_tiers(&pointing()) {
            assert_eq!(label, GestureLabel::PointingRight);
        }
    }

    #[test]
    fn test_raised_hand() {
        for label in classify_all_tiers(&raised_hand()) {
            assert_eq!(label, GestureLabel::RaisedHand);
        }
    }

    #[test]
    fn test_ok_gesture() {
        for label in classify_all_tiers(&ok_gesture()) {
            assert_eq!(label, GestureLabel::OkGesture);
        }
    }

    #[test]
    fn test_pointing_requires_curled_thumb() {
        // An extended thumb disqualifies PointingRight: the frame either
        // pinches into OkGesture or falls through to None.
        let mut pts = neutral();
        extend_thumb(&mut pts);
        extend_finger(&mut pts, LandmarkIndex::IndexTip);
        let s = sample(&pts);
        for tier in [
            PerformanceTier::Low,
            PerformanceTier::Medium,
            PerformanceTier::High,
        ] {
            let label = ThresholdSet::for_tier(tier).classify(Some(&s), FacingMode::Front);
            assert_ne!(
                label,
                GestureLabel::PointingRight,
                "Thumb+index must not read as pointing on {:?}",
                tier
            );
        }
        // Pinching the tips together turns the same hand into OkGesture.
        for label in classify_all_tiers(&ok_gesture()) {
            assert_eq!(label, GestureLabel::OkGesture);
        }
    }

    #[test]
    fn test_two_fingers_without_pinch_is_none() {
        // Thumb and index both extended but tips far apart: falls through
        // the OK pinch test to None, not an error.
        let mut pts = neutral();
        extend_thumb(&mut pts);
        extend_finger(&mut pts, LandmarkIndex::IndexTip);
        set(&mut pts, LandmarkIndex::IndexTip, 0.1, 0.3);
        let s = sample(&pts);
        let t = ThresholdSet::for_tier(PerformanceTier::High);
        assert_eq!(t.classify(Some(&s), FacingMode::Front), GestureLabel::None);
    }

    #[test]
    fn test_low_tier_fist_tolerates_stray_finger() {
        // Little finger barely extended: Low tier still reads a fist,
        // higher tiers fall through to None.
        let mut pts = neutral();
        extend_finger(&mut pts, LandmarkIndex::LittleTip);
        let s = sample(&pts);

        let low = ThresholdSet::for_tier(PerformanceTier::Low);
        assert_eq!(
            low.classify(Some(&s), FacingMode::Front),
            GestureLabel::ClosedFist
        );

        let high = ThresholdSet::for_tier(PerformanceTier::High);
        assert_eq!(high.classify(Some(&s), FacingMode::Front), GestureLabel::None);
    }

    #[test]
    fn test_low_tier_fist_does_not_eat_pointing() {
        // Index-only extension must stay PointingRight on the Low tier.
        let low = ThresholdSet::for_tier(PerformanceTier::Low);
        assert_eq!(
            low.classify(Some(&pointing()), FacingMode::Front),
            GestureLabel::PointingRight
        );
    }

    #[test]
    fn test_tier_leniency_on_marginal_extension() {
        // Tip 0.03 above the joint: clears Low (0.02) but not High (0.05).
        let mut pts = neutral();
        set(&mut pts, LandmarkIndex::IndexTip, 0.5, 0.47);
        let s = sample(&pts);

        let low = ThresholdSet::for_tier(PerformanceTier::Low);
        assert_eq!(
            low.classify(Some(&s), FacingMode::Front),
            GestureLabel::PointingRight,
            "Marginal extension should register on the lenient Low tier"
        );

        let high = ThresholdSet::for_tier(PerformanceTier::High);
        assert_eq!(
            high.classify(Some(&s), FacingMode::Front),
            GestureLabel::ClosedFist,
            "Marginal extension should not register on the High tier"
        );
    }

    #[test]
    fn test_facing_mode_mirroring() {
        // A thumb displaced +0.2 in x reads extended either way (the
        // magnitude is compared), and mirroring the x coordinates with
        // the opposite facing mode gives the same verdict.
        let mut pts = neutral();
        extend_thumb(&mut pts);
        let s = sample(&pts);

        let t = ThresholdSet::for_tier(PerformanceTier::High);
        let front = t.classify(Some(&s), FacingMode::Front);

        let mirrored_pts: Vec<_> = s
            .points()
            .iter()
            .map(|p| crate::landmark::Landmark::new(1.0 - p.x, p.y))
            .collect();
        let mirrored = sample(&mirrored_pts);
        let rear = t.classify(Some(&mirrored), FacingMode::Rear);
        assert_eq!(front, rear, "Mirrored capture should classify identically");
    }

    #[test]
    fn test_threshold_ordering() {
        let low = ThresholdSet::for_tier(PerformanceTier::Low);
        let med = ThresholdSet::for_tier(PerformanceTier::Medium);
        let high = ThresholdSet::for_tier(PerformanceTier::High);
        assert!(low.horizontal_thumb_ratio < med.horizontal_thumb_ratio);
        assert!(med.horizontal_thumb_ratio < high.horizontal_thumb_ratio);
        assert!(low.vertical_extension_ratio < med.vertical_extension_ratio);
        assert!(med.vertical_extension_ratio < high.vertical_extension_ratio);
        // Pinch tolerance widens as tiers get noisier.
        assert!(low.ok_pinch_distance > med.ok_pinch_distance);
        assert!(med.ok_pinch_distance > high.ok_pinch_distance);
    }

    #[test]
    fn test_label_roundtrip() {
        for s in [
            "open-hand",
            "closed-fist",
            "pointing-right",
            "raised-hand",
            "ok-gesture",
            "none",
        ] {
            let l = GestureLabel::from_str(s).expect("should parse");
            assert_eq!(l.as_str(), s);
        }
        assert_eq!(GestureLabel::from_str("wave"), None);
    }
}

//! Gesture stabilization — run-length debounce plus a post-fire cooldown.
//!
//! A single noisy frame must never trigger a banking action, and the
//! system must not double-fire while the user keeps holding a gesture.
//! The stabilizer therefore requires the same non-`None` label on a
//! minimum number of consecutive frames, then enforces a cooldown during
//! which nothing fires.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capability::PerformanceTier;
use crate::classifier::GestureLabel;

// ── Config ─────────────────────────────────────────────────

/// Tier-derived stabilizer timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilizerConfig {
    /// Consecutive frames of the same label required before firing.
    /// Lower tiers sample less often, so fewer repeats cover the same
    /// real time.
    pub min_run_length: u32,
    /// Minimum interval after a fired event before anything fires again.
    pub cooldown_ms: f64,
}

impl StabilizerConfig {
    /// The tuned configuration for a performance tier.
    pub fn for_tier(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::Low => Self {
                min_run_length: 2,
                cooldown_ms: 1500.0,
            },
            PerformanceTier::Medium => Self {
                min_run_length: 3,
                cooldown_ms: 1200.0,
            },
            PerformanceTier::High => Self {
                min_run_length: 3,
                cooldown_ms: 1000.0,
            },
        }
    }
}

// ── Stabilizer ─────────────────────────────────────────────

/// Consumes per-frame classifier output and emits a label exactly when a
/// gesture is confirmed.
#[derive(Debug, Clone)]
pub struct GestureStabilizer {
    config: StabilizerConfig,
    /// Label currently accumulating a run, if any.
    candidate: GestureLabel,
    /// Consecutive frames the candidate has been observed.
    run_length: u32,
    /// No event may fire before this timestamp.
    cooldown_until: f64,
    /// Timestamp of the last fired event, if any.
    last_fired_at: Option<f64>,
}

impl GestureStabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            config,
            candidate: GestureLabel::None,
            run_length: 0,
            cooldown_until: 0.0,
            last_fired_at: None,
        }
    }

    /// Observe one frame's label. Returns `Some(label)` exactly when a
    /// confirmed gesture event fires.
    ///
    /// `None` observations reset the candidate but leave an in-progress
    /// cooldown untouched.
    pub fn observe(&mut self, label: GestureLabel, now_ms: f64) -> Option<GestureLabel> {
        if label == GestureLabel::None {
            if self.candidate != GestureLabel::None {
                debug!("candidate {} dropped (hand lost)", self.candidate.as_str());
            }
            self.candidate = GestureLabel::None;
            self.run_length = 0;
            return None;
        }

        if label == self.candidate {
            self.run_length += 1;
        } else {
            self.candidate = label;
            self.run_length = 1;
        }

        if self.run_length < self.config.min_run_length || now_ms < self.cooldown_until {
            return None;
        }

        // Fire, then clear the candidate so the same held gesture has to
        // re-accumulate a run before it can fire again after cooldown.
        info!(
            "gesture confirmed: {} after {} frames",
            label.as_str(),
            self.run_length
        );
        self.candidate = GestureLabel::None;
        self.run_length = 0;
        self.cooldown_until = now_ms + self.config.cooldown_ms;
        self.last_fired_at = Some(now_ms);
        Some(label)
    }

    /// Timestamp of the most recent fired event.
    pub fn last_fired_at(&self) -> Option<f64> {
        self.last_fired_at
    }

    /// Whether the cooldown window is still open at `now_ms`.
    pub fn in_cooldown(&self, now_ms: f64) -> bool {
        now_ms < self.cooldown_until
    }

    /// Restore the fresh state, as on session stop.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn medium() -> GestureStabilizer {
        GestureStabilizer::new(StabilizerConfig::for_tier(PerformanceTier::Medium))
    }

    #[test]
    fn test_fires_on_third_frame_medium() {
        let mut s = medium();
        assert_eq!(s.observe(GestureLabel::OpenHand, 0.0), None);
        assert_eq!(s.observe(GestureLabel::OpenHand, 33.0), None);
        assert_eq!(
            s.observe(GestureLabel::OpenHand, 66.0),
            Some(GestureLabel::OpenHand),
            "Run length 3 should fire on the Medium tier"
        );
        // The trailing None must not retroactively cancel anything.
        assert_eq!(s.observe(GestureLabel::None, 99.0), None);
        assert_eq!(s.last_fired_at(), Some(66.0));
    }

    #[test]
    fn test_fires_on_second_frame_low() {
        let mut s = GestureStabilizer::new(StabilizerConfig::for_tier(PerformanceTier::Low));
        assert_eq!(s.observe(GestureLabel::ClosedFist, 0.0), None);
        assert_eq!(
            s.observe(GestureLabel::ClosedFist, 100.0),
            Some(GestureLabel::ClosedFist)
        );
    }

    #[test]
    fn test_label_change_resets_run() {
        let mut s = medium();
        s.observe(GestureLabel::OpenHand, 0.0);
        s.observe(GestureLabel::OpenHand, 33.0);
        // Flicker to a different label on the would-be firing frame.
        assert_eq!(s.observe(GestureLabel::ClosedFist, 66.0), None);
        assert_eq!(s.observe(GestureLabel::ClosedFist, 99.0), None);
        assert_eq!(
            s.observe(GestureLabel::ClosedFist, 132.0),
            Some(GestureLabel::ClosedFist)
        );
    }

    #[test]
    fn test_none_resets_candidate() {
        let mut s = medium();
        s.observe(GestureLabel::OpenHand, 0.0);
        s.observe(GestureLabel::OpenHand, 33.0);
        s.observe(GestureLabel::None, 66.0);
        // Run must restart from scratch.
        assert_eq!(s.observe(GestureLabel::OpenHand, 99.0), None);
        assert_eq!(s.observe(GestureLabel::OpenHand, 132.0), None);
        assert_eq!(
            s.observe(GestureLabel::OpenHand, 165.0),
            Some(GestureLabel::OpenHand)
        );
    }

    #[test]
    fn test_cooldown_blocks_refire() {
        let mut s = medium();
        s.observe(GestureLabel::OpenHand, 0.0);
        s.observe(GestureLabel::OpenHand, 33.0);
        assert!(s.observe(GestureLabel::OpenHand, 66.0).is_some());

        // Keep holding: runs re-accumulate but nothing fires in cooldown.
        for i in 3..30 {
            let t = i as f64 * 33.0;
            if t < 66.0 + 1200.0 {
                assert_eq!(
                    s.observe(GestureLabel::OpenHand, t),
                    None,
                    "Nothing may fire at t={} inside the cooldown",
                    t
                );
            }
        }
        assert!(s.in_cooldown(1000.0));
        assert!(!s.in_cooldown(1266.1));
    }

    #[test]
    fn test_continuous_hold_rate_bounded() {
        // 10 seconds of continuous OpenHand at ~30fps, Medium tier
        // (cooldown 1.2s): at most floor(10/1.2)+1 = 9 events, never two
        // inside one cooldown window.
        let mut s = medium();
        let mut fired = Vec::new();
        let mut t = 0.0;
        while t <= 10_000.0 {
            if s.observe(GestureLabel::OpenHand, t).is_some() {
                fired.push(t);
            }
            t += 33.0;
        }
        assert!(
            fired.len() <= 9,
            "Expected at most 9 events in 10s, got {}",
            fired.len()
        );
        for pair in fired.windows(2) {
            assert!(
                pair[1] - pair[0] >= 1200.0,
                "Events at {} and {} violate the cooldown",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_none_does_not_cancel_cooldown() {
        let mut s = medium();
        s.observe(GestureLabel::OpenHand, 0.0);
        s.observe(GestureLabel::OpenHand, 33.0);
        assert!(s.observe(GestureLabel::OpenHand, 66.0).is_some());

        // Hand lost, then immediately re-presented: still in cooldown.
        s.observe(GestureLabel::None, 100.0);
        s.observe(GestureLabel::OpenHand, 133.0);
        s.observe(GestureLabel::OpenHand, 166.0);
        assert_eq!(s.observe(GestureLabel::OpenHand, 199.0), None);
    }

    #[test]
    fn test_cooldown_override() {
        let mut cfg = StabilizerConfig::for_tier(PerformanceTier::Medium);
        cfg.cooldown_ms = 100.0;
        let mut s = GestureStabilizer::new(cfg);
        s.observe(GestureLabel::OpenHand, 0.0);
        s.observe(GestureLabel::OpenHand, 10.0);
        assert!(s.observe(GestureLabel::OpenHand, 20.0).is_some());
        s.observe(GestureLabel::OpenHand, 50.0);
        s.observe(GestureLabel::OpenHand, 90.0);
        s.observe(GestureLabel::OpenHand, 119.0);
        assert!(
            s.observe(GestureLabel::OpenHand, 125.0).is_some(),
            "Shortened cooldown should allow a refire after 100ms"
        );
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut s = medium();
        s.observe(GestureLabel::OpenHand, 0.0);
        s.observe(GestureLabel::OpenHand, 33.0);
        assert!(s.observe(GestureLabel::OpenHand, 66.0).is_some());
        s.reset();
        assert_eq!(s.last_fired_at(), None);
        assert!(!s.in_cooldown(67.0));
        // Behaves exactly like a fresh stabilizer.
        assert_eq!(s.observe(GestureLabel::OpenHand, 70.0), None);
        assert_eq!(s.observe(GestureLabel::OpenHand, 103.0), None);
        assert!(s.observe(GestureLabel::OpenHand, 136.0).is_some());
    }
}

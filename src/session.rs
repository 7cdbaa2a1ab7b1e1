//! Session wiring — owns all per-session recognition state and is the
//! single entry point a host shell drives.
//!
//! The session is built once from a capability profile plus optional
//! overrides, consumes per-frame input with caller-supplied timestamps,
//! and emits the events the host forwards to its action dispatcher.
//! `stop` replaces the whole per-session state in one assignment, so a
//! stop racing an in-flight update can never leave torn state behind.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::capability::{CapabilityProfile, PerformanceTier};
use crate::classifier::{GestureLabel, ThresholdSet};
use crate::confirm::{ConfirmConfig, ConfirmationMachine, PendingConfirmation};
use crate::dwell::{DwellConfig, DwellEvent, DwellSelector};
use crate::events::{ConfirmationEvent, GestureEvent};
use crate::landmark::{FacingMode, HandSample};
use crate::stabilizer::{GestureStabilizer, StabilizerConfig};

// ── Config ─────────────────────────────────────────────────

/// Recognized session options. Everything has a profile-derived default;
/// the host only sets what it wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Camera facing; affects the thumb-extension sign convention.
    pub facing_mode: FacingMode,
    /// Override the profiled performance tier.
    pub tier: Option<PerformanceTier>,
    /// Continuous gaze required to select a target.
    pub dwell_threshold_ms: f64,
    /// Gaze hit radius around a target center, in pixels.
    pub dwell_radius_px: f32,
    /// Window for the second press/affirmative.
    pub confirm_window_ms: f64,
    /// Window for voice-confirmed flows, which wait on recognition.
    pub voice_confirm_window_ms: f64,
    /// Override the tier-derived gesture cooldown.
    pub gesture_cooldown_ms: Option<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Front,
            tier: None,
            dwell_threshold_ms: 3000.0,
            dwell_radius_px: 100.0,
            confirm_window_ms: 3000.0,
            voice_confirm_window_ms: 5000.0,
            gesture_cooldown_ms: None,
        }
    }
}

// ── Session ────────────────────────────────────────────────

/// Mutable per-session recognition state, replaced wholesale on stop.
#[derive(Debug)]
struct SessionState {
    stabilizer: GestureStabilizer,
    confirm: ConfirmationMachine,
    dwell: DwellSelector,
}

/// One recognition session across the three interaction channels.
pub struct IntentSession {
    profile: CapabilityProfile,
    config: SessionConfig,
    thresholds: ThresholdSet,
    state: SessionState,
}

impl IntentSession {
    pub fn new(profile: CapabilityProfile, config: SessionConfig) -> Self {
        let tier = config.tier.unwrap_or(profile.tier);
        let mut stabilizer_config = StabilizerConfig::for_tier(tier);
        if let Some(cooldown) = config.gesture_cooldown_ms {
            stabilizer_config.cooldown_ms = cooldown;
        }
        info!(
            "intent session started: tier={} facing={:?}",
            tier.as_str(),
            config.facing_mode,
        );
        Self {
            profile,
            thresholds: ThresholdSet::for_tier(tier),
            state: SessionState {
                stabilizer: GestureStabilizer::new(stabilizer_config),
                confirm: ConfirmationMachine::new(ConfirmConfig {
                    window_ms: config.confirm_window_ms,
                }),
                dwell: DwellSelector::new(DwellConfig {
                    threshold_ms: config.dwell_threshold_ms,
                    radius_px: config.dwell_radius_px,
                }),
            },
            config,
        }
    }

    /// The tier the session is actually running at.
    pub fn tier(&self) -> PerformanceTier {
        self.thresholds.tier
    }

    // ── Gesture channel ───────────────────────────────────

    /// Classify and stabilize one hand frame. Returns a confirmed
    /// gesture event exactly when one fires.
    pub fn process_hand_frame(
        &mut self,
        sample: Option<&HandSample>,
        now_ms: f64,
    ) -> Option<GestureEvent> {
        let label = self.thresholds.classify(sample, self.config.facing_mode);
        let fired = self.state.stabilizer.observe(label, now_ms)?;
        Some(GestureEvent {
            label: fired,
            timestamp_ms: now_ms,
            buzz: self.profile.has_haptics,
        })
    }

    /// The raw per-frame label, for callers that surface live feedback.
    pub fn classify_frame(&self, sample: Option<&HandSample>) -> GestureLabel {
        self.thresholds.classify(sample, self.config.facing_mode)
    }

    // ── Gaze channel ──────────────────────────────────────

    /// Register a gaze target's hit center.
    pub fn register_target(&mut self, id: &str, center_x: f32, center_y: f32) {
        self.state.dwell.register(id, center_x, center_y);
    }

    /// Unregister a gaze target.
    pub fn unregister_target(&mut self, id: &str) {
        self.state.dwell.unregister(id);
    }

    /// Process one gaze/pointer sample.
    pub fn process_gaze_sample(&mut self, x: f32, y: f32, now_ms: f64) -> Vec<DwellEvent> {
        self.state.dwell.update(x, y, now_ms)
    }

    // ── Confirmation channel ──────────────────────────────

    /// First press (or spoken command) naming an action.
    pub fn request_action(&mut self, action_id: &str, now_ms: f64) -> Vec<ConfirmationEvent> {
        self.state.confirm.request(action_id, now_ms)
    }

    /// First signal for a voice-confirmed flow; uses the longer window.
    pub fn request_action_voice(
        &mut self,
        action_id: &str,
        now_ms: f64,
    ) -> Vec<ConfirmationEvent> {
        self.state.confirm.request_with_window(
            action_id,
            now_ms,
            self.config.voice_confirm_window_ms,
        )
    }

    /// Corroborating second signal (second press or spoken affirmative).
    pub fn confirm_action(&mut self, action_id: &str, now_ms: f64) -> Option<ConfirmationEvent> {
        self.state.confirm.confirm(action_id, now_ms)
    }

    /// Host-timer driven expiry check.
    pub fn tick(&mut self, now_ms: f64) -> Option<ConfirmationEvent> {
        self.state.confirm.tick(now_ms)
    }

    /// The in-flight pending confirmation, if any.
    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        self.state.confirm.pending()
    }

    // ── Lifecycle ─────────────────────────────────────────

    /// Stop the session: one state replacement clears the stabilizer,
    /// any pending confirmation, and the active dwell. The gaze target
    /// registry belongs to the host UI and survives.
    pub fn stop(&mut self) {
        let tier = self.thresholds.tier;
        let mut stabilizer_config = StabilizerConfig::for_tier(tier);
        if let Some(cooldown) = self.config.gesture_cooldown_ms {
            stabilizer_config.cooldown_ms = cooldown;
        }
        self.state = SessionState {
            stabilizer: GestureStabilizer::new(stabilizer_config),
            confirm: ConfirmationMachine::new(ConfirmConfig {
                window_ms: self.config.confirm_window_ms,
            }),
            dwell: self.state.dwell.cleared(),
        };
        info!("intent session stopped");
    }
}

// ── Tests ──────────────────────────────────────────────────

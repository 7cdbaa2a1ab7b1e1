//! Two-signal confirmation — a pending action executes only when a
//! corroborating second input arrives inside the confirmation window.
//!
//! Shared by the press-press and voice-confirm flows: the first press (or
//! spoken command) requests the action, and a second press of the same
//! action, or a recognized spoken affirmative, confirms it. There is no
//! internal timer; expiry is observed by the host's `tick` or lazily on
//! the next call.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::{ConfirmationEvent, ConfirmationOutcome};

// ── Config ─────────────────────────────────────────────────

/// Confirmation window length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfirmConfig {
    /// Time allowed between the first and second signal (ms).
    pub window_ms: f64,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self { window_ms: 3000.0 }
    }
}

// ── Pending confirmation ───────────────────────────────────

/// The single in-flight confirmable action. A new request replaces any
/// existing pending rather than queuing behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub action_id: String,
    pub created_at: f64,
    pub expires_at: f64,
}

// ── State machine ──────────────────────────────────────────

/// Idle / awaiting-confirmation machine holding at most one pending
/// action.
#[derive(Debug, Default)]
pub struct ConfirmationMachine {
    config: ConfirmConfig,
    pending: Option<PendingConfirmation>,
}

impl ConfirmationMachine {
    pub fn new(config: ConfirmConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    /// First-signal entry point using the configured window.
    pub fn request(&mut self, action_id: &str, now_ms: f64) -> Vec<ConfirmationEvent> {
        self.request_with_window(action_id, now_ms, self.config.window_ms)
    }

    /// First-signal entry point with an explicit window, for flows whose
    /// second signal is slower to arrive (voice recognition).
    ///
    /// A repeated request for the same still-pending action is the
    /// confirming second input itself: two presses inside the window
    /// collapse into execution.
    pub fn request_with_window(
        &mut self,
        action_id: &str,
        now_ms: f64,
        window_ms: f64,
    ) -> Vec<ConfirmationEvent> {
        let mut events = Vec::new();

        if let Some(pending) = self.pending.take() {
            if now_ms > pending.expires_at {
                debug!("pending {} lapsed before new request", pending.action_id);
                events.push(ConfirmationEvent {
                    action_id: pending.action_id,
                    outcome: ConfirmationOutcome::Expired,
                    timestamp_ms: now_ms,
                });
            } else if pending.action_id == action_id {
                info!("double request confirms {}", action_id);
                events.push(ConfirmationEvent {
                    action_id: pending.action_id,
                    outcome: ConfirmationOutcome::Confirmed,
                    timestamp_ms: now_ms,
                });
                return events;
            } else {
                debug!(
                    "pending {} superseded by {}",
                    pending.action_id, action_id
                );
                events.push(ConfirmationEvent {
                    action_id: pending.action_id,
                    outcome: ConfirmationOutcome::Superseded,
                    timestamp_ms: now_ms,
                });
            }
        }

        self.pending = Some(PendingConfirmation {
            action_id: action_id.to_string(),
            created_at: now_ms,
            expires_at: now_ms + window_ms,
        });
        events
    }

    /// Second-signal entry point. A matching in-window pending executes;
    /// a lapsed pending expires; a mismatch is a silent no-op (the host
    /// inspects `pending()` if it needs to know why nothing happened).
    pub fn confirm(&mut self, action_id: &str, now_ms: f64) -> Option<ConfirmationEvent> {
        let pending = self.pending.take()?;

        if now_ms > pending.expires_at {
            return Some(ConfirmationEvent {
                action_id: pending.action_id,
                outcome: ConfirmationOutcome::Expired,
                timestamp_ms: now_ms,
            });
        }

        if pending.action_id != action_id {
            debug!(
                "confirm for {} ignored, pending is {}",
                action_id, pending.action_id
            );
            self.pending = Some(pending);
            return None;
        }

        info!("action confirmed: {}", pending.action_id);
        Some(ConfirmationEvent {
            action_id: pending.action_id,
            outcome: ConfirmationOutcome::Confirmed,
            timestamp_ms: now_ms,
        })
    }

    /// Host-driven expiry check.
    pub fn tick(&mut self, now_ms: f64) -> Option<ConfirmationEvent> {
        let pending = self.pending.take()?;
        if now_ms <= pending.expires_at {
            self.pending = Some(pending);
            return None;
        }
        debug!("pending {} expired", pending.action_id);
        Some(ConfirmationEvent {
            action_id: pending.action_id,
            outcome: ConfirmationOutcome::Expired,
            timestamp_ms: now_ms,
        })
    }

    /// The in-flight pending confirmation, if any.
    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// Drop any pending confirmation without emitting an event, as on
    /// session stop.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

// ── Tests ──────────────────────────────────────────────────

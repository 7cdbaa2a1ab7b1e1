//! Events emitted across the library boundary to the host shell.
//!
//! Everything here derives serde so a host can forward events over
//! whatever bridge it uses without re-describing them.

use serde::{Deserialize, Serialize};

use crate::classifier::GestureLabel;

// ── Gesture events ─────────────────────────────────────────

/// A debounced, confirmed gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    /// The recognized label (never `GestureLabel::None`).
    pub label: GestureLabel,
    /// Timestamp of the frame that confirmed the gesture (ms).
    pub timestamp_ms: f64,
    /// Whether the host should play a haptic pulse for this event.
    pub buzz: bool,
}

// ── Confirmation events ────────────────────────────────────

/// How a pending confirmation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationOutcome {
    /// The corroborating second signal arrived inside the window.
    Confirmed,
    /// The window lapsed with no second signal.
    Expired,
    /// A request for a different action replaced this one.
    Superseded,
}

impl ConfirmationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Expired => "expired",
            Self::Superseded => "superseded",
        }
    }
}

/// Terminal report for one pending confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationEvent {
    /// Identifier of the action the host asked to confirm.
    pub action_id: String,
    pub outcome: ConfirmationOutcome,
    /// Timestamp at which the transition happened (ms).
    pub timestamp_ms: f64,
}

// ── Tests ──────────────────────────────────────────────────

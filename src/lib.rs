//! Multimodal intent recognition core for an accessible banking shell.
//!
//! Turns raw per-frame hand/gaze landmark streams into discrete,
//! debounced, confirmed user actions across three interaction channels:
//! hand gestures, gaze dwell, and press-press/voice confirmation.
//!
//! The crate is a pure library boundary: the host owns the camera, the
//! landmark detector, and the clock. Every stateful call takes a
//! caller-supplied monotonic timestamp in milliseconds, so tests (and
//! trace replay) drive time deterministically.

pub mod capability;
pub mod classifier;
pub mod confirm;
pub mod dwell;
pub mod events;
pub mod landmark;
pub mod session;
pub mod stabilizer;

pub use capability::{CapabilityProfile, EnvironmentFacts, PerformanceTier};
pub use classifier::{GestureLabel, ThresholdSet};
pub use confirm::{ConfirmConfig, ConfirmationMachine, PendingConfirmation};
pub use dwell::{DwellConfig, DwellEvent, DwellSelector};
pub use events::{ConfirmationEvent, ConfirmationOutcome, GestureEvent};
pub use landmark::{FacingMode, HandSample, Landmark, LandmarkIndex};
pub use session::{IntentSession, SessionConfig};
pub use stabilizer::{GestureStabilizer, StabilizerConfig};

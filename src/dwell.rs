//! Gaze dwell selection — tracks proximity of a gaze/pointer position to
//! named targets and fires a selection after sustained dwell.
//!
//! The host registers a screen-space center point per selectable element
//! as it mounts and unregisters it on unmount. At most one target dwells
//! at a time; switching targets never carries elapsed time over.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ── Config ─────────────────────────────────────────────────

/// Dwell timing and proximity configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DwellConfig {
    /// Continuous dwell required to select a target.
    pub threshold_ms: f64,
    /// Gaze-to-center distance below which a target is "looked at",
    /// in screen pixels.
    pub radius_px: f32,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            threshold_ms: 3000.0,
            radius_px: 100.0,
        }
    }
}

// ── Targets ────────────────────────────────────────────────

/// One registered hit target.
#[derive(Debug, Clone)]
struct GazeTarget {
    center_x: f32,
    center_y: f32,
}

// ── Events ─────────────────────────────────────────────────

/// Events emitted by the dwell selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DwellEvent {
    /// Gaze entered a target's region; a dwell begins at progress 0.
    Entered { target_id: String },
    /// Gaze left the active target before selection; progress discarded.
    Left { target_id: String },
    /// Fractional progress toward selection, for visual feedback.
    Progress { target_id: String, fraction: f32 },
    /// Dwell threshold reached; the target is selected.
    Selected { target_id: String, timestamp_ms: f64 },
}

// ── Selector ───────────────────────────────────────────────

/// Per-sample dwell tracker over the registered target set.
#[derive(Debug)]
pub struct DwellSelector {
    config: DwellConfig,
    targets: HashMap<String, GazeTarget>,
    /// Target currently being dwelt on, with the dwell start time.
    active: Option<(String, f64)>,
}

impl DwellSelector {
    pub fn new(config: DwellConfig) -> Self {
        Self {
            config,
            targets: HashMap::new(),
            active: None,
        }
    }

    /// Register (or move) a target's hit center. Safe between ticks.
    pub fn register(&mut self, id: &str, center_x: f32, center_y: f32) {
        debug!("target registered: {} at ({:.0}, {:.0})", id, center_x, center_y);
        self.targets
            .insert(id.to_string(), GazeTarget { center_x, center_y });
    }

    /// Remove a target. An in-progress dwell on it is abandoned.
    pub fn unregister(&mut self, id: &str) {
        self.targets.remove(id);
        if matches!(&self.active, Some((active_id, _)) if active_id == id) {
            debug!("active target {} unregistered, dwell abandoned", id);
            self.active = None;
        }
    }

    /// Number of registered targets.
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Process one gaze sample. Returns the state transitions it caused,
    /// in order.
    pub fn update(&mut self, x: f32, y: f32, now_ms: f64) -> Vec<DwellEvent> {
        let mut events = Vec::new();
        let hit = self.nearest_hit(x, y);

        match (&self.active, hit) {
            (None, None) => {}

            (None, Some(id)) => {
                self.active = Some((id.clone(), now_ms));
                events.push(DwellEvent::Entered { target_id: id });
            }

            (Some((active_id, _)), None) => {
                let left = active_id.clone();
                self.active = None;
                events.push(DwellEvent::Left { target_id: left });
            }

            (Some((active_id, started)), Some(id)) if *active_id == id => {
                let fraction = ((now_ms - started) / self.config.threshold_ms) as f32;
                if fraction >= 1.0 {
                    // Terminal for this interaction: the user must leave
                    // and re-enter before the target can fire again.
                    info!("dwell selection: {}", id);
                    self.active = None;
                    events.push(DwellEvent::Selected {
                        target_id: id,
                        timestamp_ms: now_ms,
                    });
                } else {
                    events.push(DwellEvent::Progress {
                        target_id: id,
                        fraction,
                    });
                }
            }

            (Some((active_id, _)), Some(id)) => {
                // Switched regions directly: no credit carries over.
                let left = active_id.clone();
                self.active = Some((id.clone(), now_ms));
                events.push(DwellEvent::Left { target_id: left });
                events.push(DwellEvent::Entered { target_id: id });
            }
        }

        events
    }

    /// The nearest registered target within the hit radius, if any.
    fn nearest_hit(&self, x: f32, y: f32) -> Option<String> {
        let mut best: Option<(&String, f32)> = None;
        for (id, t) in &self.targets {
            let dx = x - t.center_x;
            let dy = y - t.center_y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < self.config.radius_px {
                match best {
                    Some((_, best_dist)) if best_dist <= dist => {}
                    _ => best = Some((id, dist)),
                }
            }
        }
        best.map(|(id, _)| id.clone())
    }

    /// Clear dwell state without touching the registry; targets belong to
    /// the host UI and survive a session stop.
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// A replacement selector with the same config and registry but no
    /// active dwell, for callers that swap state wholesale.
    pub fn cleared(&self) -> Self {
        Self {
            config: self.config,
            targets: self.targets.clone(),
            active: None,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

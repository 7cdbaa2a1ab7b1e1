//! Device capability profiling — maps a bag of environment facts to a
//! discrete performance tier and feature flags.
//!
//! Pure and infallible: unknown facts degrade to conservative mobile-like
//! defaults rather than failing. Called once per session by the host.

use serde::{Deserialize, Serialize};
use tracing::info;

// ── Performance tier ───────────────────────────────────────

/// Coarse device performance class. Immutable for a session; selects the
/// classifier threshold set and the stabilizer timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceTier {
    Low,
    Medium,
    High,
}

impl PerformanceTier {
    /// String representation for logging and host IPC.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a tier from its string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

// ── Environment facts ──────────────────────────────────────

/// Host-supplied environment facts. Everything optional is allowed to be
/// unknown; the profiler never fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentFacts {
    /// Platform identification string (user-agent-like).
    pub platform: String,
    /// Whether a camera was detected, if the host could tell.
    pub has_camera: Option<bool>,
    /// Estimated device memory in gigabytes.
    pub device_memory_gb: Option<f32>,
    /// Estimated logical core count.
    pub core_count: Option<u32>,
    /// Whether the device supports vibration.
    pub has_vibration: bool,
}

/// Substrings identifying a mobile platform, matched case-insensitively.
const MOBILE_MARKERS: [&str; 8] = [
    "android",
    "iphone",
    "ipad",
    "ipod",
    "webos",
    "blackberry",
    "iemobile",
    "opera mini",
];

const IOS_MARKERS: [&str; 3] = ["iphone", "ipad", "ipod"];

// ── Capability profile ─────────────────────────────────────

/// Result of profiling: tier plus the feature flags the session layer
/// consults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    /// Performance tier driving thresholds and debounce timing.
    pub tier: PerformanceTier,
    /// Whether the platform string identifies a mobile device.
    pub is_mobile: bool,
    /// Whether a camera is available (false when unknown).
    pub has_camera: bool,
    /// Whether haptic feedback is available.
    pub has_haptics: bool,
    /// Whether the landmark pipeline is expected to run on this device.
    /// iOS is excluded: the detector runtime does not support it.
    pub supports_tracking: bool,
}

impl CapabilityProfile {
    /// Classify environment facts into a capability profile.
    ///
    /// Mobile with low memory/cores is Low, mobile with plenty of both is
    /// High, anything non-mobile defaults to High. An empty platform
    /// string is treated as mobile with Medium tier.
    pub fn from_facts(facts: &EnvironmentFacts) -> Self {
        let platform = facts.platform.to_lowercase();
        let known_platform = !platform.trim().is_empty();
        let is_mobile =
            !known_platform || MOBILE_MARKERS.iter().any(|m| platform.contains(m));
        let is_ios = IOS_MARKERS.iter().any(|m| platform.contains(m));

        let tier = if is_mobile {
            let low_memory = facts.device_memory_gb.map(|gb| gb < 4.0).unwrap_or(false);
            let low_cores = facts.core_count.map(|c| c < 4).unwrap_or(false);
            let high_memory = facts.device_memory_gb.map(|gb| gb >= 6.0).unwrap_or(false);
            let high_cores = facts.core_count.map(|c| c >= 6).unwrap_or(false);

            if low_memory || low_cores {
                PerformanceTier::Low
            } else if high_memory && high_cores {
                PerformanceTier::High
            } else {
                PerformanceTier::Medium
            }
        } else {
            PerformanceTier::High
        };

        let has_camera = facts.has_camera.unwrap_or(false);
        let profile = Self {
            tier,
            is_mobile,
            has_camera,
            has_haptics: facts.has_vibration,
            supports_tracking: has_camera && !is_ios,
        };
        info!(
            "Capability profile: tier={} mobile={} camera={} haptics={}",
            profile.tier.as_str(),
            profile.is_mobile,
            profile.has_camera,
            profile.has_haptics,
        );
        profile
    }
}

// ── Tests ──────────────────────────────────────────────────

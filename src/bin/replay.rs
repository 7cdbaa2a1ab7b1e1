//! intent-replay - drive an intent session from a recorded input trace
//!
//! Reads a JSON-lines trace of timestamped inputs (hand frames, gaze
//! samples, presses, confirms, ticks) and prints every emitted event as a
//! JSON line, for debugging recognition issues offline.

use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use intent_core::{
    CapabilityProfile, EnvironmentFacts, HandSample, IntentSession, Landmark, SessionConfig,
};

#[derive(Parser, Debug)]
#[command(name = "intent-replay", about = "Replay a recorded intent input trace")]
struct Cli {
    /// Path to the JSONL trace file
    trace: String,

    /// Platform string to profile instead of the trace's environment record
    #[arg(long)]
    platform: Option<String>,

    /// Emit per-frame classifier labels as well as confirmed events
    #[arg(long)]
    raw_labels: bool,
}

/// One trace line: a timestamp plus the input it carries.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TraceRecord {
    Environment { facts: EnvironmentFacts },
    Target { id: String, x: f32, y: f32 },
    HandFrame { t: f64, points: Option<Vec<Landmark>> },
    GazeSample { t: f64, x: f32, y: f32 },
    Press { t: f64, action_id: String },
    VoiceCommand { t: f64, action_id: String },
    Confirm { t: f64, action_id: String },
    Tick { t: f64 },
    Stop,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReplayOutput<'a> {
    RawLabel { t: f64, label: &'a str },
    Gesture(intent_core::GestureEvent),
    Dwell(intent_core::DwellEvent),
    Confirmation(intent_core::ConfirmationEvent),
}

fn emit(out: &ReplayOutput) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(out)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intent_core=info".into()),
        )
        .init();

    let file = File::open(&cli.trace).with_context(|| format!("open {}", cli.trace))?;
    let reader = BufReader::new(file);

    // The session is built from the first environment record (or the
    // --platform override); inputs seen before that are rejected.
    let mut session: Option<IntentSession> = None;
    if let Some(platform) = &cli.platform {
        let profile = CapabilityProfile::from_facts(&EnvironmentFacts {
            platform: platform.clone(),
            has_camera: Some(true),
            ..EnvironmentFacts::default()
        });
        session = Some(IntentSession::new(profile, SessionConfig::default()));
    }

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: TraceRecord = serde_json::from_str(&line)
            .with_context(|| format!("trace line {}", line_no + 1))?;

        if let TraceRecord::Environment { facts } = &record {
            if session.is_none() {
                let profile = CapabilityProfile::from_facts(facts);
                session = Some(IntentSession::new(profile, SessionConfig::default()));
            } else {
                warn!("line {}: extra environment record ignored", line_no + 1);
            }
            continue;
        }

        let session = session
            .as_mut()
            .with_context(|| format!("trace line {}: input before environment", line_no + 1))?;

        match record {
            TraceRecord::Environment { .. } => {}

            TraceRecord::Target { id, x, y } => session.register_target(&id, x, y),

            TraceRecord::HandFrame { t, points } => {
                let sample = match &points {
                    Some(pts) => Some(HandSample::from_points(pts).with_context(|| {
                        format!("trace line {}: bad hand frame", line_no + 1)
                    })?),
                    None => None,
                };
                if cli.raw_labels {
                    let label = session.classify_frame(sample.as_ref());
                    emit(&ReplayOutput::RawLabel {
                        t,
                        label: label.as_str(),
                    })?;
                }
                if let Some(evt) = session.process_hand_frame(sample.as_ref(), t) {
                    emit(&ReplayOutput::Gesture(evt))?;
                }
            }

            TraceRecord::GazeSample { t, x, y } => {
                for evt in session.process_gaze_sample(x, y, t) {
                    emit(&ReplayOutput::Dwell(evt))?;
                }
            }

            TraceRecord::Press { t, action_id } => {
                for evt in session.request_action(&action_id, t) {
                    emit(&ReplayOutput::Confirmation(evt))?;
                }
            }

            TraceRecord::VoiceCommand { t, action_id } => {
                for evt in session.request_action_voice(&action_id, t) {
                    emit(&ReplayOutput::Confirmation(evt))?;
                }
            }

            TraceRecord::Confirm { t, action_id } => {
                if let Some(evt) = session.confirm_action(&action_id, t) {
                    emit(&ReplayOutput::Confirmation(evt))?;
                }
            }

            TraceRecord::Tick { t } => {
                if let Some(evt) = session.tick(t) {
                    emit(&ReplayOutput::Confirmation(evt))?;
                }
            }

            TraceRecord::Stop => session.stop(),
        }
    }

    info!("trace replay complete");
    Ok(())
}

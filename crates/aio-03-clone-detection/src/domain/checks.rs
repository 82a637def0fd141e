//! The six clone-detection checks.
//!
//! Each check is a pure function of configuration, telemetry and the relevant
//! slice of device history. The detector service supplies the history.

use aio_02_entropy::shannon_entropy;
use shared_types::{stats::range, InteractionData, Timestamp};

use super::{CheckOutcome, DetectionMethod};
use crate::config::CloneDetectionConfig;

/// Hardware fingerprint on record vs. the freshly generated one.
pub fn hardware_fingerprint(
    config: &CloneDetectionConfig,
    on_record: Option<&str>,
    fresh: &str,
) -> CheckOutcome {
    let method = DetectionMethod::HardwareFingerprintMismatch;
    match on_record {
        Some(recorded) if recorded != fresh => CheckOutcome {
            method,
            risk: config.hardware_mismatch_risk,
            details: vec!["hardware fingerprint differs from the one on record".into()],
        },
        _ => CheckOutcome::pass(method),
    }
}

/// Touch, pressure, swipe and timing sanity.
pub fn behavioral_pattern(
    config: &CloneDetectionConfig,
    interaction: Option<&InteractionData>,
) -> CheckOutcome {
    let method = DetectionMethod::BehavioralPatternAnomaly;
    let Some(data) = interaction.filter(|d| !d.is_empty()) else {
        return CheckOutcome {
            method,
            risk: config.behavioral_missing_risk,
            details: vec!["no interaction data".into()],
        };
    };

    let mut risk = 0.0;
    let mut details = Vec::new();

    if data.touch_points.len() < config.min_touch_points {
        risk += 15.0;
        details.push(format!("only {} touch points", data.touch_points.len()));
    }

    let pressure_variation = range(&data.pressures());
    if pressure_variation < config.min_pressure_variation {
        risk += 10.0;
        details.push(format!("pressure variation {pressure_variation:.3}"));
    }

    if data.swipe_gestures.len() < config.min_swipes {
        risk += 10.0;
        details.push(format!("only {} swipes", data.swipe_gestures.len()));
    }

    let (v_min, v_max) = config.velocity_range;
    if data
        .swipe_gestures
        .iter()
        .any(|s| !(v_min..=v_max).contains(&s.velocity))
    {
        risk += 10.0;
        details.push("swipe velocity outside human range".into());
    }

    if let Some(timing) = data.timing {
        let (r_min, r_max) = config.response_time_range;
        if !(r_min..=r_max).contains(&timing.response_time) {
            risk += 15.0;
            details.push(format!("response time {}ms", timing.response_time));
        }
    }

    CheckOutcome {
        method,
        risk: f64::min(risk, config.behavioral_cap),
        details,
    }
}

/// Gap since the device's previous activity. No history passes.
pub fn temporal_consistency(
    config: &CloneDetectionConfig,
    last_activity: Option<Timestamp>,
    now: Timestamp,
) -> CheckOutcome {
    let method = DetectionMethod::TemporalInconsistency;
    let Some(last) = last_activity else {
        return CheckOutcome::pass(method);
    };

    let delta = now.saturating_sub(last);
    let (lo, hi) = config.activity_window_ms;
    if delta > lo && delta < hi {
        return CheckOutcome::pass(method);
    }
    CheckOutcome {
        method,
        risk: config.temporal_risk,
        details: vec![format!("{delta}ms since last activity")],
    }
}

/// Age of the device's bound session.
pub fn session_binding(
    config: &CloneDetectionConfig,
    session_started: Timestamp,
    now: Timestamp,
) -> CheckOutcome {
    let method = DetectionMethod::SessionBindingFailure;
    let age = now.saturating_sub(session_started);
    let (lo, hi) = config.session_window_ms;
    if age > lo && age < hi {
        return CheckOutcome::pass(method);
    }
    CheckOutcome {
        method,
        risk: config.session_risk,
        details: vec![format!("session age {age}ms")],
    }
}

/// Average entropy of raw coordinate, pressure and velocity samples.
pub fn entropy_pattern(
    config: &CloneDetectionConfig,
    interaction: Option<&InteractionData>,
) -> CheckOutcome {
    let method = DetectionMethod::EntropyPatternAnomaly;
    let Some(average) = interaction.and_then(average_sample_entropy) else {
        return CheckOutcome {
            method,
            risk: config.entropy_missing_risk,
            details: vec!["no samples to measure entropy".into()],
        };
    };

    let (lo, hi) = config.entropy_band;
    let distance = if average < lo {
        lo - average
    } else if average > hi {
        average - hi
    } else {
        return CheckOutcome::pass(method);
    };

    CheckOutcome {
        method,
        risk: f64::min(10.0 + distance * 100.0, config.entropy_cap),
        details: vec![format!("average entropy {average:.3}")],
    }
}

/// Mean entropy over the sample channels that have at least one value.
pub fn average_sample_entropy(data: &InteractionData) -> Option<f64> {
    let channels = [data.xs(), data.ys(), data.pressures(), data.velocities()];
    let entropies: Vec<f64> = channels
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| shannon_entropy(c))
        .collect();
    if entropies.is_empty() {
        return None;
    }
    Some(entropies.iter().sum::<f64>() / entropies.len() as f64)
}

/// Proximity readings must be finite and physically plausible.
pub fn proximity_environment(
    config: &CloneDetectionConfig,
    interaction: Option<&InteractionData>,
) -> CheckOutcome {
    let method = DetectionMethod::ProximityEnvironmentMismatch;
    let Some(proximity) = interaction.and_then(|d| d.proximity) else {
        return CheckOutcome::pass(method);
    };

    let mut details = Vec::new();
    if !(-120.0..=0.0).contains(&proximity.signal_strength) {
        details.push(format!("signal strength {}", proximity.signal_strength));
    }
    if !(0.0..=100.0).contains(&proximity.distance) {
        details.push(format!("distance {}", proximity.distance));
    }
    if !(0.0..=1.0).contains(&proximity.interference) {
        details.push(format!("interference {}", proximity.interference));
    }

    if details.is_empty() {
        return CheckOutcome::pass(method);
    }
    CheckOutcome {
        method,
        risk: config.proximity_risk,
        details,
    }
}

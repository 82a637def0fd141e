//! Clone-resistance factors.
//!
//! Each factor scores 0-100; the detector blends them around a base of 50.

use std::collections::{BTreeSet, HashMap};

use shared_crypto::sha256_hex;
use shared_types::{
    stats::{mean, range, std_dev},
    InteractionData,
};

use aio_02_entropy::shannon_entropy;

/// Weights of hardware, behavioral, temporal, session and entropy factors.
pub const RESISTANCE_WEIGHTS: [f64; 5] = [0.30, 0.25, 0.20, 0.15, 0.10];

/// Starting point before factors pull the score up or down.
pub const BASE_RESISTANCE: f64 = 50.0;

/// Character diversity of the hashed device id.
pub fn hardware_uniqueness(device_id: &str) -> f64 {
    let hashed = sha256_hex(device_id);
    let distinct: BTreeSet<char> = hashed.chars().collect();
    distinct.len() as f64 / 16.0 * 100.0
}

/// Richness of the behavioral telemetry, each part capped.
pub fn behavioral_complexity(interaction: Option<&InteractionData>) -> f64 {
    let Some(data) = interaction else {
        return 0.0;
    };

    let touches = f64::min(data.touch_points.len() as f64 * 5.0, 25.0);
    let pressure = f64::min(range(&data.pressures()) * 100.0, 25.0);
    let swipes = f64::min(data.swipe_gestures.len() as f64 * 10.0, 20.0);

    let velocities = data.velocities();
    let velocity_mean = mean(&velocities);
    let velocity_variation = if velocity_mean > 0.0 {
        f64::min(std_dev(&velocities) / velocity_mean * 100.0, 15.0)
    } else {
        0.0
    };

    let timing = data
        .timing
        .map(|t| t.pattern_consistency.clamp(0.0, 1.0) * 15.0)
        .unwrap_or(0.0);

    (touches + pressure + swipes + velocity_variation + timing).clamp(0.0, 100.0)
}

/// Digit diversity of a high-precision timestamp string.
pub fn temporal_uniqueness(precise_timestamp: &str) -> f64 {
    let digits: BTreeSet<char> = precise_timestamp
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.len() as f64 / 10.0 * 100.0
}

/// Character entropy of a session id, normalized to the hex alphabet.
pub fn session_binding_strength(session_id: &str) -> f64 {
    char_entropy(session_id) / 16f64.log2() * 100.0
}

/// Entropy of raw coordinate and velocity samples.
pub fn entropy_randomness(interaction: Option<&InteractionData>) -> f64 {
    let Some(data) = interaction else {
        return 0.0;
    };
    let mut samples = data.xs();
    samples.extend(data.ys());
    samples.extend(data.velocities());
    shannon_entropy(&samples) * 100.0
}

/// Shannon entropy (bits) of the character distribution of `s`.
pub fn char_entropy(s: &str) -> f64 {
    let total = s.chars().count();
    if total == 0 {
        return 0.0;
    }
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// Blend factors around the base score and clamp to `[0, 100]`.
pub fn blend(factors: [f64; 5]) -> f64 {
    let adjustment: f64 = factors
        .iter()
        .zip(RESISTANCE_WEIGHTS)
        .map(|(f, w)| w * (f - BASE_RESISTANCE))
        .sum();
    (BASE_RESISTANCE + adjustment).clamp(0.0, 100.0)
}

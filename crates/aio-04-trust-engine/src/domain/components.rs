//! The five trust components.
//!
//! Each function returns a score clamped to `[0, 100]` with the evidence and
//! risk factors that produced it. Weights are filled in by the engine.

use shared_types::{
    stats::{clamp_score, range, std_dev},
    InteractionData,
};

use super::{TrustComponent, TrustFactor};

/// Running score plus its explanation.
struct Tally {
    factor: TrustFactor,
    score: f64,
    evidence: Vec<String>,
    risk_factors: Vec<String>,
}

impl Tally {
    fn new(factor: TrustFactor, base: f64) -> Self {
        Self {
            factor,
            score: base,
            evidence: Vec::new(),
            risk_factors: Vec::new(),
        }
    }

    fn reward(&mut self, points: f64, why: impl Into<String>) {
        self.score += points;
        self.evidence.push(why.into());
    }

    fn penalize(&mut self, points: f64, why: impl Into<String>) {
        self.score -= points;
        self.risk_factors.push(why.into());
    }

    fn finish(self) -> TrustComponent {
        TrustComponent {
            factor: self.factor,
            score: clamp_score(self.score),
            weight: 0.0,
            evidence: self.evidence,
            risk_factors: self.risk_factors,
        }
    }
}

/// Known devices start high; frequent interaction adds a little.
pub fn device_reputation(
    known: bool,
    interaction_count: u64,
    known_base: f64,
    unknown_base: f64,
) -> TrustComponent {
    let mut tally = if known {
        let mut t = Tally::new(TrustFactor::DeviceReputation, known_base);
        t.evidence.push("known device".into());
        t
    } else {
        let mut t = Tally::new(TrustFactor::DeviceReputation, unknown_base);
        t.risk_factors.push("unknown device".into());
        t
    };
    if interaction_count > 10 {
        tally.reward(5.0, format!("{interaction_count} prior interactions"));
    }
    tally.finish()
}

/// Presence of touch and swipe data and natural pressure variation.
pub fn interaction_quality(interaction: Option<&InteractionData>) -> TrustComponent {
    let mut tally = Tally::new(TrustFactor::InteractionQuality, 50.0);
    let empty = InteractionData::default();
    let data = interaction.unwrap_or(&empty);

    if data.touch_points.is_empty() {
        tally.penalize(10.0, "no touch data");
    } else {
        tally.reward(15.0, format!("{} touch points", data.touch_points.len()));
    }

    if !data.swipe_gestures.is_empty() {
        tally.reward(10.0, format!("{} swipes", data.swipe_gestures.len()));
    }

    let pressure_sigma = std_dev(&data.pressures());
    if pressure_sigma > 0.05 {
        tally.reward(15.0, "natural pressure variation");
    } else {
        tally.penalize(15.0, "uniform pressure");
    }

    tally.finish()
}

/// Human response times and a consistent interaction rhythm.
pub fn timing_consistency(interaction: Option<&InteractionData>) -> TrustComponent {
    let Some(timing) = interaction.and_then(|d| d.timing) else {
        let mut tally = Tally::new(TrustFactor::TimingConsistency, 20.0);
        tally.risk_factors.push("no timing data".into());
        return tally.finish();
    };

    let mut tally = Tally::new(TrustFactor::TimingConsistency, 50.0);
    let response = timing.response_time;
    if (100.0..=3000.0).contains(&response) {
        tally.reward(25.0, format!("human response time {response}ms"));
    } else if response < 50.0 {
        tally.penalize(30.0, format!("response time {response}ms too fast"));
    }

    if timing.pattern_consistency > 0.7 {
        tally.reward(15.0, "consistent interaction pattern");
    }

    tally.finish()
}

/// Enough touches spread over the screen.
pub fn behavioral_pattern(interaction: Option<&InteractionData>) -> TrustComponent {
    let mut tally = Tally::new(TrustFactor::BehavioralPattern, 50.0);
    let empty = InteractionData::default();
    let data = interaction.unwrap_or(&empty);

    let touches = data.touch_points.len();
    if touches >= 3 {
        tally.reward(20.0, format!("{touches} touch points"));
    } else {
        tally.penalize(10.0, format!("only {touches} touch points"));
    }

    let spread = f64::max(range(&data.xs()), range(&data.ys()));
    if spread > 10.0 {
        tally.reward(20.0, format!("coordinate spread {spread:.1}px"));
    } else {
        tally.penalize(15.0, "touches clustered in one spot");
    }

    tally.finish()
}

/// Close, strong and clean proximity readings.
pub fn proximity_security(interaction: Option<&InteractionData>) -> TrustComponent {
    let Some(proximity) = interaction.and_then(|d| d.proximity) else {
        let mut tally = Tally::new(TrustFactor::ProximitySecurity, 40.0);
        tally.risk_factors.push("no proximity data".into());
        return tally.finish();
    };

    let mut tally = Tally::new(TrustFactor::ProximitySecurity, 50.0);
    if proximity.signal_strength > -70.0 {
        tally.reward(15.0, format!("signal {}dBm", proximity.signal_strength));
    }

    if proximity.distance < 10.0 {
        tally.reward(20.0, format!("distance {}cm", proximity.distance));
    } else if proximity.distance > 50.0 {
        tally.penalize(20.0, format!("distance {}cm", proximity.distance));
    }

    if proximity.interference < 0.2 {
        tally.reward(15.0, "low interference");
    } else if proximity.interference > 0.5 {
        tally.penalize(10.0, "high interference");
    }

    tally.finish()
}

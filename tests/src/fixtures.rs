//! Interaction telemetry samples shared by tests and benchmarks.

use shared_types::{InteractionData, ProximityData, SwipeGesture, TimingData, TouchPoint};

/// Three identical full-pressure touches answered in 5 ms: a replayed or
/// scripted interaction.
pub fn robotic_interaction() -> InteractionData {
    let point = TouchPoint {
        x: 100.0,
        y: 100.0,
        pressure: 1.0,
        timestamp: 0.0,
    };
    InteractionData {
        touch_points: vec![point; 3],
        swipe_gestures: vec![],
        timing: Some(TimingData {
            response_time: 5.0,
            interaction_delay: 0.0,
            session_duration: 0.0,
            pattern_consistency: 1.0,
        }),
        proximity: None,
    }
}

/// Five smoothly varying touches, two realistic swipes, 250 ms response.
pub fn human_interaction() -> InteractionData {
    let xs = [100.0, 130.0, 165.0, 190.0, 230.0];
    let ys = [200.0, 210.0, 235.0, 250.0, 270.0];
    let pressures = [0.42, 0.48, 0.51, 0.57, 0.61];
    let touch_points = (0..5)
        .map(|i| TouchPoint {
            x: xs[i],
            y: ys[i],
            pressure: pressures[i],
            timestamp: 120.0 * i as f64,
        })
        .collect();
    let swipe = |velocity| SwipeGesture {
        start_x: 50.0,
        start_y: 300.0,
        end_x: 260.0,
        end_y: 340.0,
        duration: 280.0,
        velocity,
    };
    InteractionData {
        touch_points,
        swipe_gestures: vec![swipe(640.0), swipe(910.0)],
        timing: Some(TimingData {
            response_time: 250.0,
            interaction_delay: 180.0,
            session_duration: 45_000.0,
            pattern_consistency: 0.85,
        }),
        proximity: Some(ProximityData {
            signal_strength: -48.0,
            distance: 3.5,
            angle: 20.0,
            interference: 0.1,
        }),
    }
}

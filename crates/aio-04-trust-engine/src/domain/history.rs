//! Bounded per-device score history.

use std::collections::VecDeque;

use shared_types::stats::{clamp_score, mean, std_dev};

use super::{HistoricalTrend, TrendDirection};

/// Samples averaged on each side of the trend comparison.
pub const TREND_WINDOW: usize = 5;

/// Difference between window averages that counts as a trend.
pub const TREND_THRESHOLD: f64 = 5.0;

/// Most recent scores, oldest first.
#[derive(Debug, Clone)]
pub struct ScoreHistory {
    scores: VecDeque<f64>,
    capacity: usize,
}

impl ScoreHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a score, evicting the oldest when full.
    pub fn push(&mut self, score: f64) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.scores.iter().copied().collect()
    }

    /// Compare the latest window against the one before it.
    pub fn trend(&self) -> HistoricalTrend {
        let scores = self.scores();
        if scores.is_empty() {
            return HistoricalTrend::default();
        }

        let split = scores.len().saturating_sub(TREND_WINDOW);
        let recent = &scores[split..];
        let older = &scores[split.saturating_sub(TREND_WINDOW)..split];

        let trend = if older.is_empty() {
            TrendDirection::Stable
        } else {
            let delta = mean(recent) - mean(older);
            if delta > TREND_THRESHOLD {
                TrendDirection::Improving
            } else if delta < -TREND_THRESHOLD {
                TrendDirection::Declining
            } else {
                TrendDirection::Stable
            }
        };

        let avg = mean(&scores);
        let volatility = std_dev(&scores);
        let consistency = if avg > 0.0 {
            (1.0 - volatility / avg).clamp(0.0, 1.0)
        } else {
            0.0
        };

        HistoricalTrend {
            trend,
            volatility,
            consistency,
            mean: avg,
            samples: scores.len(),
        }
    }

    /// Nudge `score` by the trend, regressing to the mean when volatile.
    pub fn predict(&self, score: f64, volatility_threshold: f64) -> f64 {
        let trend = self.trend();
        let nudged = match trend.trend {
            TrendDirection::Improving => score + 5.0,
            TrendDirection::Declining => score - 5.0,
            TrendDirection::Stable => score,
        };
        let predicted = if trend.volatility > volatility_threshold {
            (nudged + trend.mean) / 2.0
        } else {
            nudged
        };
        clamp_score(predicted)
    }

    /// How far `score` sits from the historical mean, as `min(100, 25 * |z|)`.
    pub fn anomaly(&self, score: f64) -> f64 {
        let trend = self.trend();
        if trend.volatility <= 0.0 {
            return 0.0;
        }
        let z = (score - trend.mean).abs() / trend.volatility;
        clamp_score(z * 25.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(scores: &[f64]) -> ScoreHistory {
        let mut h = ScoreHistory::new(50);
        scores.iter().for_each(|s| h.push(*s));
        h
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut h = ScoreHistory::new(3);
        for s in [1.0, 2.0, 3.0, 4.0] {
            h.push(s);
        }
        assert_eq!(h.scores(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_trend_directions() {
        let improving = history(&[40.0, 40.0, 40.0, 40.0, 40.0, 60.0, 60.0, 60.0, 60.0, 60.0]);
        assert_eq!(improving.trend().trend, TrendDirection::Improving);

        let declining = history(&[60.0, 60.0, 60.0, 60.0, 60.0, 40.0, 40.0, 40.0, 40.0, 40.0]);
        assert_eq!(declining.trend().trend, TrendDirection::Declining);

        let stable = history(&[50.0, 52.0, 51.0, 49.0, 50.0, 51.0, 50.0, 52.0]);
        assert_eq!(stable.trend().trend, TrendDirection::Stable);
    }

    #[test]
    fn test_short_history_is_stable() {
        let h = history(&[10.0, 90.0, 10.0]);
        assert_eq!(h.trend().trend, TrendDirection::Stable);
        assert_eq!(h.trend().samples, 3);
    }

    #[test]
    fn test_volatility_and_consistency() {
        let flat = history(&[70.0; 6]);
        let trend = flat.trend();
        assert_eq!(trend.volatility, 0.0);
        assert_eq!(trend.consistency, 1.0);
        assert_eq!(flat.anomaly(95.0), 0.0);
    }

    #[test]
    fn test_prediction() {
        let improving = history(&[40.0, 40.0, 40.0, 40.0, 40.0, 50.0, 50.0, 50.0, 50.0, 50.0]);
        assert_eq!(improving.predict(50.0, 15.0), 55.0);
        assert_eq!(improving.predict(98.0, 15.0), 100.0);

        let volatile = history(&[10.0, 90.0, 10.0, 90.0]);
        // stable, mean 50, sigma 40
        assert_eq!(volatile.predict(70.0, 15.0), 60.0);
    }

    #[test]
    fn test_anomaly_score() {
        let h = history(&[40.0, 60.0]);
        // mean 50, sigma 10
        assert_eq!(h.anomaly(70.0), 50.0);
        assert_eq!(h.anomaly(200.0), 100.0);
    }
}

//! Rate functions mapping linear beat time to eased progress.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateFunction {
    Linear,
    #[default]
    Smooth,
    EaseInSine,
    ThereAndBack,
}

impl RateFunction {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smooth => smooth(t),
            Self::EaseInSine => ease_in_sine(t),
            Self::ThereAndBack => there_and_back(t),
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Logistic ease-in-out normalised to hit 0 and 1 exactly
pub fn smooth(t: f32) -> f32 {
    const INFLECTION: f32 = 10.0;
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let error = sigmoid(-INFLECTION / 2.0);
    ((sigmoid(INFLECTION * (t - 0.5)) - error) / (1.0 - 2.0 * error)).clamp(0.0, 1.0)
}

pub fn ease_in_sine(t: f32) -> f32 {
    1.0 - (t * FRAC_PI_2).cos()
}

/// Rises to 1 at the midpoint and returns to 0
pub fn there_and_back(t: f32) -> f32 {
    let t = if t < 0.5 { 2.0 * t } else { 2.0 * (1.0 - t) };
    smooth(t)
}

/// Half-sine pulse, 0 at both ends and 1 in the middle
pub fn pulse(t: f32) -> f32 {
    (t * PI).sin()
}

/// Local progress of item `index` of `count` in a staggered group, where
/// each item starts `lag_ratio` of an item's run after the previous one
pub fn lagged(t: f32, index: usize, count: usize, lag_ratio: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    let span = 1.0 + lag_ratio * count.saturating_sub(1) as f32;
    (t * span - lag_ratio * index as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for rate in [
            RateFunction::Linear,
            RateFunction::Smooth,
            RateFunction::EaseInSine,
        ] {
            assert!(rate.apply(0.0).abs() < 1e-6, "{:?}", rate);
            assert!((rate.apply(1.0) - 1.0).abs() < 1e-6, "{:?}", rate);
        }
    }

    #[test]
    fn test_there_and_back() {
        assert!(there_and_back(0.0).abs() < 1e-6);
        assert!((there_and_back(0.5) - 1.0).abs() < 1e-6);
        assert!(there_and_back(1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ease_in_sine_starts_slow() {
        assert!(ease_in_sine(0.25) < 0.25);
        assert!(ease_in_sine(0.75) < 0.75);
    }

    #[test]
    fn test_lagged_staggers_items() {
        assert_eq!(lagged(0.0, 0, 3, 0.2), 0.0);
        assert_eq!(lagged(1.0, 2, 3, 0.2), 1.0);
        // The first item is ahead of the last one mid-way
        assert!(lagged(0.5, 0, 3, 0.2) > lagged(0.5, 2, 3, 0.2));
        assert_eq!(lagged(0.5, 0, 1, 0.2), 0.5);
    }

    #[test]
    fn test_apply_clamps_input() {
        assert_eq!(RateFunction::Linear.apply(1.5), 1.0);
        assert_eq!(RateFunction::Linear.apply(-0.5), 0.0);
    }
}

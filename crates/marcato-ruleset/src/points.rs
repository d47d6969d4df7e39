use serde::{Deserialize, Serialize};

/// How a resolved hit converts into score points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointsSpec {
    /// Fixed weight per judgement, normalised by `max_weight`.
    Weights { max_weight: f64, weights: Vec<f64> },
    /// Continuous accuracy curve evaluated on the timing delta, tightened
    /// by the `judge` level.
    Wife { judge: i32 },
}

impl PointsSpec {
    /// Points in `(-inf, 1]` for a hit with the given delta and judgement.
    pub fn points_for(&self, delta_ms: f64, judgement: usize) -> f64 {
        match self {
            Self::Weights {
                max_weight,
                weights,
            } => weights.get(judgement).copied().unwrap_or(0.0) / max_weight,
            Self::Wife { judge } => wife_curve(*judge, delta_ms),
        }
    }
}

/// Polynomial approximation of the Gauss error function
/// (Abramowitz & Stegun 7.1.26, max error ~1.5e-7).
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}

/// Continuous accuracy curve: full credit inside a tiny core window, an
/// erf falloff through the accuracy region, then a linear descent into a
/// flat penalty. `judge` (1..=9) tightens every region; 4 is the baseline.
pub fn wife_curve(judge: i32, delta_ms: f64) -> f64 {
    const MISS_WEIGHT: f64 = -2.75;
    const TIMESCALE_POW: f64 = 0.75;

    let scale = (10.0 - judge as f64) / 6.0;
    let ridiculous = 5.0 * scale;
    let boo_window = 180.0 * scale;
    let zero = 65.0 * scale.powf(TIMESCALE_POW);
    let dev = 22.7 * scale.powf(TIMESCALE_POW);
    let delta = delta_ms.abs();

    if delta <= ridiculous {
        1.0
    } else if delta <= zero {
        erf((zero - delta) / dev)
    } else if delta <= boo_window {
        (delta - zero) * MISS_WEIGHT / (boo_window - zero)
    } else {
        MISS_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_normalised() {
        let points = PointsSpec::Weights {
            max_weight: 300.0,
            weights: vec![300.0, 200.0, 100.0, 0.0],
        };
        assert_eq!(points.points_for(0.0, 0), 1.0);
        assert!((points.points_for(0.0, 1) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(points.points_for(0.0, 3), 0.0);
        // Out-of-range judgement scores nothing rather than panicking.
        assert_eq!(points.points_for(0.0, 10), 0.0);
    }

    #[test]
    fn test_wife_core_and_floor() {
        // Dead-on hits earn full credit at any judge level.
        assert_eq!(wife_curve(4, 0.0), 1.0);
        assert_eq!(wife_curve(7, 2.0), 1.0);
        assert_eq!(wife_curve(4, -4.9), 1.0);

        // Far outside the window the curve bottoms out at the miss weight.
        assert_eq!(wife_curve(4, 400.0), -2.75);
        assert_eq!(wife_curve(4, -400.0), -2.75);
    }

    #[test]
    fn test_wife_is_monotone_decreasing_in_delta() {
        let mut prev = f64::INFINITY;
        for step in 0..200 {
            let value = wife_curve(4, step as f64 * 2.0);
            assert!(value <= prev + 1e-9, "curve rose at {} ms", step * 2);
            prev = value;
        }
    }

    #[test]
    fn test_wife_symmetric() {
        for delta in [3.0, 20.0, 64.9, 65.0, 120.0, 200.0] {
            assert_eq!(wife_curve(4, delta), wife_curve(4, -delta));
        }
    }

    #[test]
    fn test_higher_judge_is_stricter() {
        // The same 40 ms hit is worth less on a tighter judge.
        assert!(wife_curve(7, 40.0) < wife_curve(4, 40.0));
    }
}

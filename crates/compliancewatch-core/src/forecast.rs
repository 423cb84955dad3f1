//! Event-volume forecast with a widening confidence band.
//!
//! The projection is a least-squares linear trend over the observed timeline,
//! plus a periodic seasonal term (weekly for daily buckets, daily for hourly
//! buckets) and bounded uniform noise. The band half-width is
//! `z * sigma * sqrt(h)` for step `h`, where `sigma` is the residual standard
//! deviation of the trend fit.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::source::BucketUnit;
use crate::synth::TimelinePoint;

/// Residual spread never drops below this, so a flat history still gets a band.
const MIN_SIGMA: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    /// Buckets to project past the last observation.
    pub horizon: usize,
    /// Seasonal amplitude as a fraction of the mean level.
    pub seasonal_ratio: f64,
    /// Noise bound as a multiple of sigma.
    pub noise_ratio: f64,
    /// Band width in sigmas (1.96 ≈ 95%).
    pub z: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            horizon: 14,
            seasonal_ratio: 0.15,
            noise_ratio: 0.5,
            z: 1.96,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Intercept and slope of the least-squares line through `(i, ys[i])`.
pub fn linear_fit(ys: &[f64]) -> (f64, f64) {
    let n = ys.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in ys.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    (mean_y - slope * mean_x, slope)
}

/// Standard deviation of the residuals around a fitted line.
pub fn residual_sigma(ys: &[f64], intercept: f64, slope: f64) -> f64 {
    if ys.is_empty() {
        return 0.0;
    }
    let ss: f64 = ys
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let r = y - (intercept + slope * i as f64);
            r * r
        })
        .sum();
    (ss / ys.len() as f64).sqrt()
}

/// Project `params.horizon` buckets past the end of `history`.
pub fn project<R: Rng>(
    history: &[TimelinePoint],
    unit: BucketUnit,
    params: &ForecastParams,
    rng: &mut R,
) -> Vec<ForecastPoint> {
    let Some(last) = history.last() else {
        return Vec::new();
    };

    let ys: Vec<f64> = history.iter().map(|p| p.events as f64).collect();
    let (intercept, slope) = linear_fit(&ys);
    let sigma = residual_sigma(&ys, intercept, slope).max(MIN_SIGMA);
    let mean = ys.iter().sum::<f64>() / ys.len() as f64;
    let amplitude = params.seasonal_ratio * mean;
    let noise = (params.noise_ratio * sigma).abs();
    let period = match unit {
        BucketUnit::Day => 7.0,
        BucketUnit::Hour => 24.0,
    };
    let step = unit.duration();

    (1..=params.horizon)
        .map(|h| {
            let t = (ys.len() - 1 + h) as f64;
            let seasonal = amplitude * (2.0 * PI * t / period).sin();
            let jitter = if noise > 0.0 {
                rng.random_range(-noise..=noise)
            } else {
                0.0
            };
            let raw = intercept + slope * t + seasonal + jitter;
            let half_width = params.z * sigma * (h as f64).sqrt();
            ForecastPoint {
                timestamp: last.timestamp + step * h as i32,
                predicted: raw.max(0.0),
                lower: (raw - half_width).max(0.0),
                upper: (raw + half_width).max(0.0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn series(values: &[u64]) -> Vec<TimelinePoint> {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &events)| TimelinePoint {
                timestamp: start + chrono::Duration::days(i as i64),
                events,
            })
            .collect()
    }

    #[test]
    fn linear_fit_recovers_line() {
        let ys: Vec<f64> = (0..10).map(|i| 3.0 + 2.0 * i as f64).collect();
        let (a, b) = linear_fit(&ys);
        assert!((a - 3.0).abs() < 1e-9);
        assert!((b - 2.0).abs() < 1e-9);
        assert!(residual_sigma(&ys, a, b) < 1e-9);
    }

    #[test]
    fn linear_fit_single_point_is_flat() {
        assert_eq!(linear_fit(&[5.0]), (5.0, 0.0));
        assert_eq!(linear_fit(&[]), (0.0, 0.0));
    }

    #[test]
    fn empty_history_gives_empty_forecast() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = project(&[], BucketUnit::Day, &ForecastParams::default(), &mut rng);
        assert!(out.is_empty());
    }

    #[test]
    fn band_contains_prediction_and_widens() {
        let history = series(&[10, 12, 9, 14, 11, 15, 13, 16, 12, 18]);
        let mut rng = StdRng::seed_from_u64(2);
        let out = project(&history, BucketUnit::Day, &ForecastParams::default(), &mut rng);
        assert_eq!(out.len(), 14);
        for p in &out {
            assert!(p.lower <= p.predicted && p.predicted <= p.upper);
            assert!(p.lower >= 0.0);
        }
        let first = out[0].upper - out[0].lower;
        let last = out[13].upper - out[13].lower;
        assert!(last > first);
    }

    #[test]
    fn timestamps_continue_after_history() {
        let history = series(&[5, 6, 7]);
        let mut rng = StdRng::seed_from_u64(3);
        let params = ForecastParams {
            horizon: 3,
            ..Default::default()
        };
        let out = project(&history, BucketUnit::Day, &params, &mut rng);
        assert_eq!(
            out[0].timestamp,
            history[2].timestamp + chrono::Duration::days(1)
        );
        assert_eq!(
            out[2].timestamp,
            history[2].timestamp + chrono::Duration::days(3)
        );
    }

    #[test]
    fn noiseless_flat_history_stays_near_level() {
        let history = series(&[10; 14]);
        let mut rng = StdRng::seed_from_u64(4);
        let params = ForecastParams {
            horizon: 7,
            seasonal_ratio: 0.0,
            noise_ratio: 0.0,
            z: 1.96,
        };
        let out = project(&history, BucketUnit::Day, &params, &mut rng);
        for p in &out {
            assert!((p.predicted - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn falling_trend_is_clamped_at_zero() {
        let history = series(&[40, 30, 20, 10, 0]);
        let mut rng = StdRng::seed_from_u64(5);
        let out = project(&history, BucketUnit::Day, &ForecastParams::default(), &mut rng);
        assert!(out.iter().all(|p| p.predicted >= 0.0 && p.lower >= 0.0));
        assert_eq!(out.last().unwrap().predicted, 0.0);
    }
}

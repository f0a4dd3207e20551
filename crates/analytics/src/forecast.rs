//! Demand forecasting: single exponential smoothing with a linear trend check.

use serde::{Deserialize, Serialize};

use crate::config::{ForecastConfig, MAX_PERIODS};
use crate::stats::{mean, non_negative_count, ols_slope, round_half_up, stddev_population};

/// Direction of recent demand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
}

impl core::fmt::Display for Trend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Trend::Increasing => "increasing",
            Trend::Stable => "stable",
            Trend::Decreasing => "decreasing",
        })
    }
}

/// Output of [`DemandForecaster::smooth`]: demand per period, whole units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothedForecast {
    pub forecast: u64,
    pub trend: Trend,
}

/// Exponential smoothing forecaster.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandForecaster {
    alpha: f64,
    periods: u32,
    trend_window: usize,
    trend_threshold_pct: f64,
    days_per_period: u32,
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl DemandForecaster {
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            alpha: config.alpha,
            periods: config.periods,
            trend_window: config.trend_window,
            trend_threshold_pct: config.trend_threshold_pct,
            days_per_period: config.days_per_period,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_periods(mut self, periods: u32) -> Self {
        self.periods = periods;
        self
    }

    /// Forecast the next period from `data` (oldest first).
    pub fn smooth(&self, data: &[f64]) -> SmoothedForecast {
        match data {
            [] => SmoothedForecast {
                forecast: 0,
                trend: Trend::Stable,
            },
            [only] => SmoothedForecast {
                forecast: non_negative_count(*only),
                trend: Trend::Stable,
            },
            [first, rest @ ..] => {
                let level = rest
                    .iter()
                    .fold(*first, |f, actual| self.alpha * actual + (1.0 - self.alpha) * f);

                let trend = self.detect_trend(data);
                let exponent = self.trend_exponent();
                let multiplier = match trend {
                    Trend::Increasing => 1.1_f64.powi(exponent),
                    Trend::Decreasing => 0.9_f64.powi(exponent),
                    Trend::Stable => 1.0,
                };

                SmoothedForecast {
                    forecast: non_negative_count(level * multiplier),
                    trend,
                }
            }
        }
    }

    /// Periods compounded by the trend multiplier, capped at [`MAX_PERIODS`] so
    /// the uplift stays finite for forecasters built without a validated config.
    fn trend_exponent(&self) -> i32 {
        i32::try_from(self.periods.min(MAX_PERIODS)).unwrap_or(1)
    }

    /// Classify the trend over the trailing window by OLS slope relative to the
    /// window mean.
    pub fn detect_trend(&self, data: &[f64]) -> Trend {
        let window = &data[data.len().saturating_sub(self.trend_window)..];
        if window.len() < 2 {
            return Trend::Stable;
        }
        let avg = mean(window);
        if avg == 0.0 {
            return Trend::Stable;
        }
        let slope_pct = ols_slope(window) / avg * 100.0;
        if slope_pct > self.trend_threshold_pct {
            Trend::Increasing
        } else if slope_pct < -self.trend_threshold_pct {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    /// Rescale per-period demand to a window of `forecast_days`.
    pub fn scale_to_window(&self, per_period: u64, forecast_days: u32) -> u64 {
        scale_to_window(per_period, self.days_per_period, forecast_days)
    }
}

/// Single exponential smoothing with the default trend window and threshold.
pub fn exponential_smoothing(data: &[f64], alpha: f64, periods: u32) -> SmoothedForecast {
    DemandForecaster::default()
        .with_alpha(alpha)
        .with_periods(periods)
        .smooth(data)
}

/// `round(demand / days_per_period * forecast_days)`.
///
/// Assumes each smoothed period spans `days_per_period` days.
pub fn scale_to_window(per_period: u64, days_per_period: u32, forecast_days: u32) -> u64 {
    if days_per_period == 0 {
        return 0;
    }
    non_negative_count(per_period as f64 / f64::from(days_per_period) * f64::from(forecast_days))
}

/// Confidence (0..=95) in a forecast built from `data`.
///
/// Empty data gives 0 and fewer than three points give 40. Otherwise the score
/// falls with the coefficient of variation and gains up to 15 points for sample
/// size, clamped to `[30, 95]`.
pub fn calculate_confidence(data: &[f64]) -> u8 {
    match data.len() {
        0 => return 0,
        1 | 2 => return 40,
        _ => {}
    }
    let avg = mean(data);
    let cv = if avg == 0.0 {
        100.0
    } else {
        stddev_population(data, avg) / avg * 100.0
    };
    let bonus = data.len().min(15) as f64;
    let confidence = round_half_up((100.0 - cv).max(30.0) + bonus);
    confidence.clamp(30.0, 95.0) as u8
}

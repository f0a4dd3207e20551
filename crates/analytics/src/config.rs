//! Tunable parameters for both pipelines.
//!
//! Defaults reproduce the dashboard's behaviour. Every config deserializes with
//! `#[serde(default)]`, so a host may override a single field from JSON.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Upper bound on `ForecastConfig::periods`; a year of weekly periods.
pub const MAX_PERIODS: u32 = 52;

/// Upper bound on the number of steps in a [`SimulationGrid`].
pub const MAX_GRID_STEPS: usize = 1_000;

/// Which field joins sales records to products.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    /// Stable product id.
    #[default]
    ProductId,
    /// Display name. Renamed or duplicate names merge/split series; compatibility only.
    ProductName,
}

/// How sales records are bucketed into periods before smoothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One period per sales record (legacy behaviour).
    #[default]
    PerRecord,
    /// Quantities summed per ISO week.
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Fewer days of stock than this is high risk.
    pub high_days: f64,
    /// Fewer days of stock than this is medium risk.
    pub medium_days: f64,
    /// current/min stock ratio below this is medium risk.
    pub medium_stock_ratio: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_days: 7.0,
            medium_days: 14.0,
            medium_stock_ratio: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Exponential smoothing factor in (0, 1].
    pub alpha: f64,
    /// Periods ahead the trend multiplier is compounded over.
    pub periods: u32,
    /// Number of trailing points used for trend detection.
    pub trend_window: usize,
    /// Slope (as % of window mean) beyond which a trend is reported.
    pub trend_threshold_pct: f64,
    /// Days one smoothed period stands for when rescaling to the forecast window.
    pub days_per_period: u32,
    pub join_key: JoinKey,
    pub granularity: Granularity,
    pub risk: RiskThresholds,
    /// Share of predicted demand held as safety stock.
    pub safety_stock_ratio: f64,
    /// Fewer sales records than this triggers a data-quality insight.
    pub sparse_sample_threshold: usize,
    /// More rising products than this triggers a growth insight.
    pub rising_products_threshold: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            periods: 1,
            trend_window: 5,
            trend_threshold_pct: 5.0,
            days_per_period: 7,
            join_key: JoinKey::default(),
            granularity: Granularity::default(),
            risk: RiskThresholds::default(),
            safety_stock_ratio: 0.2,
            sparse_sample_threshold: 10,
            rising_products_threshold: 2,
        }
    }
}

impl ForecastConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_periods(mut self, periods: u32) -> Self {
        self.periods = periods;
        self
    }

    pub fn with_join_key(mut self, join_key: JoinKey) -> Self {
        self.join_key = join_key;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_risk(mut self, risk: RiskThresholds) -> Self {
        self.risk = risk;
        self
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !(self.alpha.is_finite() && self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(AnalyticsError::config("alpha must be in (0, 1]"));
        }
        if !(1..=MAX_PERIODS).contains(&self.periods) {
            return Err(AnalyticsError::config(format!(
                "periods must be in 1..={MAX_PERIODS}"
            )));
        }
        if self.trend_window < 2 {
            return Err(AnalyticsError::config(
                "trend_window must be >= 2 to fit a slope",
            ));
        }
        if !(self.trend_threshold_pct.is_finite() && self.trend_threshold_pct >= 0.0) {
            return Err(AnalyticsError::config(
                "trend_threshold_pct must be a finite non-negative number",
            ));
        }
        if self.days_per_period == 0 {
            return Err(AnalyticsError::config("days_per_period must be > 0"));
        }
        if !(self.safety_stock_ratio.is_finite() && self.safety_stock_ratio >= 0.0) {
            return Err(AnalyticsError::config(
                "safety_stock_ratio must be a finite non-negative number",
            ));
        }
        let r = &self.risk;
        if !(r.high_days.is_finite() && r.medium_days.is_finite() && r.high_days <= r.medium_days)
        {
            return Err(AnalyticsError::config(
                "risk.high_days must not exceed risk.medium_days",
            ));
        }
        if !(r.medium_stock_ratio.is_finite() && r.medium_stock_ratio >= 0.0) {
            return Err(AnalyticsError::config(
                "risk.medium_stock_ratio must be a finite non-negative number",
            ));
        }
        Ok(())
    }
}

/// Grid of percentage price changes used by the simulation curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationGrid {
    pub min_pct: f64,
    pub max_pct: f64,
    pub step_pct: f64,
}

impl Default for SimulationGrid {
    fn default() -> Self {
        Self {
            min_pct: -10.0,
            max_pct: 10.0,
            step_pct: 2.5,
        }
    }
}

impl SimulationGrid {
    pub fn new(min_pct: f64, max_pct: f64, step_pct: f64) -> Self {
        Self {
            min_pct,
            max_pct,
            step_pct,
        }
    }

    /// The -15%..+15% grid of the integrated pricing view.
    pub fn wide() -> Self {
        Self::new(-15.0, 15.0, 2.5)
    }

    fn steps(&self) -> f64 {
        ((self.max_pct - self.min_pct) / self.step_pct + 1e-9).floor()
    }

    /// Grid points in ascending order.
    ///
    /// Points are computed by index, so accumulated float error never drops the
    /// upper bound or shifts the zero point. At most `MAX_GRID_STEPS + 1` points
    /// are produced even for a grid that failed validation.
    pub fn points(&self) -> Vec<f64> {
        if !(self.step_pct > 0.0) || self.max_pct < self.min_pct {
            return Vec::new();
        }
        let steps = self.steps();
        if !steps.is_finite() {
            return Vec::new();
        }
        let steps = (steps as usize).min(MAX_GRID_STEPS);
        (0..=steps)
            .map(|i| self.min_pct + (i as f64) * self.step_pct)
            .collect()
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !(self.step_pct.is_finite() && self.step_pct > 0.0) {
            return Err(AnalyticsError::config("grid step_pct must be > 0"));
        }
        if !(self.min_pct.is_finite() && self.max_pct.is_finite()) {
            return Err(AnalyticsError::config("grid bounds must be finite"));
        }
        if self.min_pct < -100.0 {
            return Err(AnalyticsError::config(
                "grid min_pct below -100% would produce negative prices",
            ));
        }
        if !(self.min_pct <= 0.0 && self.max_pct >= 0.0) {
            return Err(AnalyticsError::config("grid must span 0%"));
        }
        let offset = -self.min_pct / self.step_pct;
        if (offset - offset.round()).abs() > 1e-9 {
            return Err(AnalyticsError::config(
                "grid step_pct must land exactly on 0%",
            ));
        }
        if self.steps() > MAX_GRID_STEPS as f64 {
            return Err(AnalyticsError::config(format!(
                "grid spans more than {MAX_GRID_STEPS} steps"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Minimum markup over cost the optimal price may not undercut.
    pub min_margin: f64,
    /// Elasticities at or above this are treated as inelastic/anomalous.
    pub inelastic_cutoff: f64,
    /// Multiplier applied to the current price past `inelastic_cutoff`.
    pub inelastic_markup: f64,
    pub lower_bound_ratio: f64,
    pub upper_bound_ratio: f64,
    /// |PED| above this is elastic.
    pub elastic_threshold: f64,
    /// |PED| below this is inelastic.
    pub inelastic_threshold: f64,
    pub grid: SimulationGrid,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            min_margin: 0.10,
            inelastic_cutoff: -0.1,
            inelastic_markup: 1.15,
            lower_bound_ratio: 0.5,
            upper_bound_ratio: 1.5,
            elastic_threshold: 1.1,
            inelastic_threshold: 0.9,
            grid: SimulationGrid::default(),
        }
    }
}

impl PricingConfig {
    pub fn with_min_margin(mut self, min_margin: f64) -> Self {
        self.min_margin = min_margin;
        self
    }

    pub fn with_grid(mut self, grid: SimulationGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !(self.min_margin.is_finite() && self.min_margin >= 0.0) {
            return Err(AnalyticsError::config(
                "min_margin must be a finite non-negative number",
            ));
        }
        if !(self.lower_bound_ratio > 0.0 && self.lower_bound_ratio <= self.upper_bound_ratio) {
            return Err(AnalyticsError::config(
                "price bounds must satisfy 0 < lower_bound_ratio <= upper_bound_ratio",
            ));
        }
        if !(self.inelastic_threshold > 0.0 && self.inelastic_threshold <= self.elastic_threshold)
        {
            return Err(AnalyticsError::config(
                "elasticity thresholds must satisfy 0 < inelastic <= elastic",
            ));
        }
        if !(self.inelastic_markup.is_finite() && self.inelastic_markup > 0.0) {
            return Err(AnalyticsError::config("inelastic_markup must be > 0"));
        }
        self.grid.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitiveConfig {
    /// Demand lost (%) per 1% we are above the competitor average.
    pub premium_penalty: f64,
    /// Demand gained (%) per 1% we are below the competitor average.
    pub discount_gain: f64,
    pub confidence_floor: f64,
    /// Confidence points lost per 1% of demand adjustment.
    pub confidence_penalty: f64,
    pub base_score: f64,
    /// Price differential (%) below which we count as cheaper.
    pub cheaper_threshold_pct: f64,
    pub cheaper_bonus: f64,
    /// Price differential (%) above which we count as pricier.
    pub pricier_threshold_pct: f64,
    pub pricier_penalty: f64,
    pub rising_bonus: f64,
}

impl Default for CompetitiveConfig {
    fn default() -> Self {
        Self {
            premium_penalty: 0.8,
            discount_gain: 0.3,
            confidence_floor: 60.0,
            confidence_penalty: 0.5,
            base_score: 50.0,
            cheaper_threshold_pct: -5.0,
            cheaper_bonus: 15.0,
            pricier_threshold_pct: 10.0,
            pricier_penalty: 10.0,
            rising_bonus: 10.0,
        }
    }
}

impl CompetitiveConfig {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let all_finite = [
            self.premium_penalty,
            self.discount_gain,
            self.confidence_floor,
            self.confidence_penalty,
            self.base_score,
            self.cheaper_threshold_pct,
            self.cheaper_bonus,
            self.pricier_threshold_pct,
            self.pricier_penalty,
            self.rising_bonus,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(AnalyticsError::config(
                "competitive parameters must be finite",
            ));
        }
        if self.cheaper_threshold_pct > self.pricier_threshold_pct {
            return Err(AnalyticsError::config(
                "cheaper_threshold_pct must not exceed pricier_threshold_pct",
            ));
        }
        Ok(())
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forecast: ForecastConfig,
    pub pricing: PricingConfig,
    pub competitive: CompetitiveConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.forecast.validate()?;
        self.pricing.validate()?;
        self.competitive.validate()
    }
}

//! Stockout risk classification and reorder sizing.

use serde::{Deserialize, Serialize};

use crate::config::{ForecastConfig, RiskThresholds};
use crate::forecast::Trend;
use crate::stats::non_negative_count;

/// Likelihood of running out of stock within the forecast window.
///
/// Ordered `Low < Medium < High`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockoutRisk {
    Low,
    Medium,
    High,
}

impl core::fmt::Display for StockoutRisk {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            StockoutRisk::Low => "low",
            StockoutRisk::Medium => "medium",
            StockoutRisk::High => "high",
        })
    }
}

/// Intermediate figures behind a risk classification.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk: StockoutRisk,
    pub daily_demand: f64,
    /// `None` when there is no demand to deplete the stock.
    pub days_of_stock: Option<f64>,
    pub stock_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockRiskAssessor {
    thresholds: RiskThresholds,
    safety_stock_ratio: f64,
}

impl Default for StockRiskAssessor {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl StockRiskAssessor {
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            thresholds: config.risk.clone(),
            safety_stock_ratio: config.safety_stock_ratio,
        }
    }

    pub fn assess(
        &self,
        current_stock: i64,
        min_stock: i64,
        predicted_demand: u64,
        forecast_days: u32,
    ) -> RiskAssessment {
        let daily_demand = if forecast_days == 0 {
            0.0
        } else {
            predicted_demand as f64 / f64::from(forecast_days)
        };
        let days_of_stock = (daily_demand > 0.0).then(|| current_stock as f64 / daily_demand);
        let stock_ratio = if min_stock == 0 {
            1.0
        } else {
            current_stock as f64 / min_stock as f64
        };

        let t = &self.thresholds;
        let days = days_of_stock.unwrap_or(f64::INFINITY);
        let risk = if days < t.high_days || current_stock < min_stock {
            StockoutRisk::High
        } else if days < t.medium_days || stock_ratio < t.medium_stock_ratio {
            StockoutRisk::Medium
        } else {
            StockoutRisk::Low
        };

        RiskAssessment {
            risk,
            daily_demand,
            days_of_stock,
            stock_ratio,
        }
    }

    /// `max(0, round((demand - stock) + ceil(demand * safety_ratio) + min_stock))`.
    pub fn reorder_quantity(&self, current_stock: i64, predicted_demand: u64, min_stock: i64) -> u64 {
        let demand = predicted_demand as f64;
        let safety_stock = (demand * self.safety_stock_ratio).ceil();
        non_negative_count((demand - current_stock as f64) + safety_stock + min_stock as f64)
    }
}

/// Classify stockout risk with the default thresholds.
pub fn assess_stockout_risk(
    current_stock: i64,
    min_stock: i64,
    predicted_demand: u64,
    forecast_days: u32,
) -> StockoutRisk {
    StockRiskAssessor::default()
        .assess(current_stock, min_stock, predicted_demand, forecast_days)
        .risk
}

/// Reorder quantity with the default 20% safety stock.
pub fn calculate_reorder_quantity(current_stock: i64, predicted_demand: u64, min_stock: i64) -> u64 {
    StockRiskAssessor::default().reorder_quantity(current_stock, predicted_demand, min_stock)
}

/// Operator-facing action for a product.
pub fn recommendation(risk: StockoutRisk, trend: Trend, reorder_qty: u64) -> String {
    match (risk, trend) {
        (StockoutRisk::High, _) => {
            format!("Order {reorder_qty} units immediately to avoid a stockout")
        }
        (StockoutRisk::Medium, _) => {
            format!("Reorder within 1 week ({reorder_qty} units suggested)")
        }
        (_, Trend::Increasing) => "Monitor closely: demand is rising".to_string(),
        (_, Trend::Decreasing) => "Hold orders: demand is declining".to_string(),
        _ => "Stock levels are adequate".to_string(),
    }
}

//! Result structures handed back to the presentation layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockwise_core::{CompetitorPrice, PriceObservation, ProductId};

use crate::elasticity::ElasticityResult;
use crate::forecast::Trend;
use crate::insights::Insight;
use crate::simulation::PriceSimulationPoint;
use crate::stock_risk::StockoutRisk;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub quantity: u64,
}

/// Demand forecast and stock outlook for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    /// Units expected to sell over the forecast window.
    pub predicted_demand: u64,
    /// 30..=95.
    pub confidence_level: u8,
    pub trend: Trend,
    pub stockout_risk: StockoutRisk,
    pub suggested_reorder_qty: u64,
    pub recommendation: String,
    pub current_stock: i64,
    pub min_stock: i64,
    /// `None` when nothing is expected to sell.
    pub days_of_stock: Option<f64>,
    pub historical_data: Vec<HistoricalPoint>,
}

impl ForecastResult {
    pub fn is_below_minimum(&self) -> bool {
        self.current_stock < self.min_stock
    }
}

/// Output of `generate_forecasts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Highest risk first, then by predicted demand descending.
    pub forecasts: Vec<ForecastResult>,
    pub insights: Vec<Insight>,
    pub summary: String,
}

/// Our price against one competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorComparison {
    pub name: String,
    pub price: f64,
    /// `(our_price - their_price) / their_price * 100`, one decimal.
    /// Zero when their price is not positive.
    pub diff_pct: f64,
}

/// Input of `analyze_pricing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub product_id: ProductId,
    pub product_name: String,
    pub current_price: f64,
    pub cost_price: f64,
    #[serde(default)]
    pub sales_history: Vec<PriceObservation>,
    #[serde(default)]
    pub competitor_prices: Vec<CompetitorPrice>,
}

/// Output of `analyze_pricing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingAnalysis {
    pub product_id: ProductId,
    pub product_name: String,
    pub elasticity: ElasticityResult,
    pub optimal_price: f64,
    pub simulations: Vec<PriceSimulationPoint>,
    pub average_competitor_price: Option<f64>,
    pub competitors: Vec<CompetitorComparison>,
    pub recommendation: String,
}

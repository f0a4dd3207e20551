//! Portfolio-level insights over a batch of forecasts.

use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::forecast::Trend;
use crate::report::ForecastResult;
use crate::stock_risk::StockoutRisk;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Opportunity,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightGenerator {
    sparse_sample_threshold: usize,
    rising_products_threshold: usize,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl InsightGenerator {
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            sparse_sample_threshold: config.sparse_sample_threshold,
            rising_products_threshold: config.rising_products_threshold,
        }
    }

    /// Templated insights. `sales_record_count` is the raw sample size the
    /// forecasts were built from.
    pub fn insights(&self, forecasts: &[ForecastResult], sales_record_count: usize) -> Vec<Insight> {
        let high_risk = count(forecasts, |f| f.stockout_risk == StockoutRisk::High);
        let rising = count(forecasts, |f| f.trend == Trend::Increasing);
        let below_min = count(forecasts, ForecastResult::is_below_minimum);

        let mut out = Vec::new();
        if high_risk > 0 {
            out.push(Insight::new(
                InsightKind::Warning,
                "Stockout risk",
                format!("{high_risk} product(s) at high risk of stockout. Reorder now."),
            ));
        }
        if rising > self.rising_products_threshold {
            out.push(Insight::new(
                InsightKind::Opportunity,
                "Rising demand",
                format!("{rising} products show increasing demand. Consider raising stock levels."),
            ));
        }
        if below_min > 0 {
            out.push(Insight::new(
                InsightKind::Warning,
                "Below minimum stock",
                format!("{below_min} product(s) are below their minimum stock level."),
            ));
        }
        if sales_record_count < self.sparse_sample_threshold {
            out.push(Insight::new(
                InsightKind::Info,
                "Limited sales history",
                format!(
                    "Only {sales_record_count} sales record(s) available; forecast accuracy improves with more data."
                ),
            ));
        }
        out
    }

    /// One-sentence summary of at-risk versus healthy products.
    pub fn summary(&self, forecasts: &[ForecastResult]) -> String {
        let at_risk = count(forecasts, |f| f.stockout_risk != StockoutRisk::Low);
        let healthy = forecasts.len() - at_risk;
        format!(
            "Analyzed {} product(s): {at_risk} at risk of stockout, {healthy} with healthy stock levels.",
            forecasts.len()
        )
    }
}

fn count(forecasts: &[ForecastResult], pred: impl Fn(&ForecastResult) -> bool) -> usize {
    forecasts.iter().filter(|f| pred(*f)).count()
}

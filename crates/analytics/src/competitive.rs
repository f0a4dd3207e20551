//! Merges a forecast, a pricing analysis and competitor prices into one
//! per-product opportunity view.

use serde::{Deserialize, Serialize};

use stockwise_core::{CompetitorPrice, ProductId};

use crate::config::CompetitiveConfig;
use crate::forecast::Trend;
use crate::optimal_price::simulate_demand;
use crate::report::{ForecastResult, PricingAnalysis};
use crate::stats::{mean, non_negative_count, round_half_up};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOpportunity {
    pub product_id: ProductId,
    pub product_name: String,
    pub trend: Trend,
    pub current_price: f64,
    pub optimal_price: f64,
    pub predicted_demand: u64,
    /// Predicted demand after the competitor adjustment.
    pub adjusted_demand: u64,
    pub confidence_level: u8,
    pub average_competitor_price: Option<f64>,
    /// `(ours - avg) / avg * 100`; `None` without usable competitor prices.
    pub price_diff_pct: Option<f64>,
    /// Percentage applied to predicted demand.
    pub demand_adjustment_pct: f64,
    /// Revenue at the optimal price minus revenue at the current price, both
    /// on adjusted demand.
    pub revenue_impact: f64,
    /// 0..=100.
    pub opportunity_score: u8,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompetitiveAdjuster {
    config: CompetitiveConfig,
}

impl CompetitiveAdjuster {
    pub fn new(config: CompetitiveConfig) -> Self {
        Self { config }
    }

    /// Demand adjustment (%) for a given price differential (%).
    pub fn demand_adjustment(&self, price_diff_pct: f64) -> f64 {
        if price_diff_pct > 0.0 {
            -price_diff_pct * self.config.premium_penalty
        } else {
            price_diff_pct.abs() * self.config.discount_gain
        }
    }

    pub fn assess(
        &self,
        forecast: &ForecastResult,
        pricing: &PricingAnalysis,
        competitors: &[CompetitorPrice],
    ) -> ProductOpportunity {
        let cfg = &self.config;
        let current_price = pricing.elasticity.current_price;
        let optimal_price = pricing.optimal_price;

        let usable: Vec<f64> = competitors
            .iter()
            .map(|c| c.price)
            .filter(|p| p.is_finite() && *p > 0.0)
            .collect();
        let average_competitor_price = (!usable.is_empty()).then(|| mean(&usable));
        let price_diff_pct =
            average_competitor_price.map(|avg| (current_price - avg) / avg * 100.0);

        let (demand_adjustment_pct, adjusted_demand, confidence_level) = match price_diff_pct {
            Some(diff) => {
                let adjustment = self.demand_adjustment(diff);
                let demand =
                    non_negative_count(forecast.predicted_demand as f64 * (1.0 + adjustment / 100.0));
                let confidence = round_half_up(
                    (f64::from(forecast.confidence_level) - adjustment.abs() * cfg.confidence_penalty)
                        .max(cfg.confidence_floor),
                )
                .clamp(0.0, 100.0) as u8;
                (adjustment, demand, confidence)
            }
            None => (0.0, forecast.predicted_demand, forecast.confidence_level),
        };

        let elasticity = pricing.elasticity.elasticity;
        let demand_at_optimal =
            simulate_demand(current_price, adjusted_demand, optimal_price, elasticity);
        let revenue_impact =
            optimal_price * demand_at_optimal as f64 - current_price * adjusted_demand as f64;

        let mut score = cfg.base_score;
        if current_price > 0.0 {
            score += 100.0 * (optimal_price - current_price).abs() / current_price;
        }
        if let Some(diff) = price_diff_pct {
            if diff < cfg.cheaper_threshold_pct {
                score += cfg.cheaper_bonus;
            } else if diff > cfg.pricier_threshold_pct {
                score -= cfg.pricier_penalty;
            }
        }
        if forecast.trend == Trend::Increasing {
            score += cfg.rising_bonus;
        }
        let opportunity_score = round_half_up(score).clamp(0.0, 100.0) as u8;

        ProductOpportunity {
            product_id: forecast.product_id,
            product_name: forecast.product_name.clone(),
            trend: forecast.trend,
            current_price,
            optimal_price,
            predicted_demand: forecast.predicted_demand,
            adjusted_demand,
            confidence_level,
            average_competitor_price,
            price_diff_pct,
            demand_adjustment_pct,
            revenue_impact,
            opportunity_score,
        }
    }
}

/// Highest opportunity score first, then largest revenue impact.
pub fn rank_opportunities(mut opportunities: Vec<ProductOpportunity>) -> Vec<ProductOpportunity> {
    opportunities.sort_by(|a, b| {
        b.opportunity_score
            .cmp(&a.opportunity_score)
            .then_with(|| b.revenue_impact.total_cmp(&a.revenue_impact))
    });
    opportunities
}

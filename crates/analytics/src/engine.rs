//! `AnalyticsEngine`, the call contract consumed by the dashboard screens.
//!
//! Every method is a pure function of its arguments and the engine's config.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use stockwise_core::{CompetitorPrice, PriceObservation, ProductId, ProductSnapshot, SalesRecord};

use crate::competitive::{CompetitiveAdjuster, ProductOpportunity, rank_opportunities};
use crate::config::EngineConfig;
use crate::elasticity::{ElasticityEstimator, ElasticityResult};
use crate::error::AnalyticsError;
use crate::forecast::{DemandForecaster, calculate_confidence};
use crate::insights::InsightGenerator;
use crate::optimal_price::{OptimalPriceSolver, simulate_demand};
use crate::report::{
    CompetitorComparison, ForecastReport, ForecastResult, HistoricalPoint, PricingAnalysis,
    PricingRequest,
};
use crate::simulation::{PriceSimulationGenerator, PriceSimulationPoint};
use crate::stats::{mean, non_negative_count, round_one_decimal};
use crate::stock_risk::{StockRiskAssessor, recommendation};
use crate::timeseries::{StockLevels, TimeSeries, aggregate};

/// Prices within this fraction of the current price count as "hold".
const HOLD_BAND: f64 = 0.01;

#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: EngineConfig,
}

impl AnalyticsEngine {
    pub fn new(config: EngineConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forecast demand and stock risk for every product.
    ///
    /// Forecasts are sorted by risk (high first), then by predicted demand
    /// descending.
    pub fn generate_forecasts(
        &self,
        sales: &[SalesRecord],
        products: &[ProductSnapshot],
        forecast_days: u32,
    ) -> ForecastReport {
        let cfg = &self.config.forecast;
        let series = aggregate(sales, products, cfg.join_key, cfg.granularity);

        let mut forecasts: Vec<ForecastResult> = series
            .values()
            .map(|ts| {
                let stock = match ts.catalog_stock {
                    Some(s) => s,
                    None => {
                        warn!(
                            product = %ts.product_id,
                            name = %ts.product_name,
                            "sales reference a product missing from the catalog; using stock from its latest sale"
                        );
                        ts.last_seen_stock.unwrap_or(StockLevels {
                            current_stock: 0,
                            min_stock: 0,
                        })
                    }
                };
                self.forecast_series(ts, stock, forecast_days)
            })
            .collect();

        forecasts.sort_by(|a, b| {
            b.stockout_risk
                .cmp(&a.stockout_risk)
                .then_with(|| b.predicted_demand.cmp(&a.predicted_demand))
        });

        let generator = InsightGenerator::from_config(cfg);
        let insights = generator.insights(&forecasts, sales.len());
        let summary = generator.summary(&forecasts);

        info!(
            products = forecasts.len(),
            sales_records = sales.len(),
            forecast_days,
            insights = insights.len(),
            "generated demand forecasts"
        );

        ForecastReport {
            forecasts,
            insights,
            summary,
        }
    }

    /// Forecast one product from its aggregated series.
    pub fn forecast_series(
        &self,
        series: &TimeSeries,
        stock: StockLevels,
        forecast_days: u32,
    ) -> ForecastResult {
        let cfg = &self.config.forecast;
        let values = series.values();

        let forecaster = DemandForecaster::from_config(cfg);
        let smoothed = forecaster.smooth(&values);
        let predicted_demand = forecaster.scale_to_window(smoothed.forecast, forecast_days);
        let confidence_level = calculate_confidence(&values).max(30);

        let assessor = StockRiskAssessor::from_config(cfg);
        let assessment = assessor.assess(
            stock.current_stock,
            stock.min_stock,
            predicted_demand,
            forecast_days,
        );
        let suggested_reorder_qty =
            assessor.reorder_quantity(stock.current_stock, predicted_demand, stock.min_stock);

        debug!(
            product = %series.product_id,
            points = values.len(),
            predicted_demand,
            trend = %smoothed.trend,
            risk = %assessment.risk,
            "forecast computed"
        );

        ForecastResult {
            product_id: series.product_id,
            product_name: series.product_name.clone(),
            category: series.category.clone(),
            predicted_demand,
            confidence_level,
            trend: smoothed.trend,
            stockout_risk: assessment.risk,
            suggested_reorder_qty,
            recommendation: recommendation(assessment.risk, smoothed.trend, suggested_reorder_qty),
            current_stock: stock.current_stock,
            min_stock: stock.min_stock,
            days_of_stock: assessment.days_of_stock,
            historical_data: series
                .points()
                .into_iter()
                .map(|(date, quantity)| HistoricalPoint { date, quantity })
                .collect(),
        }
    }

    /// Elasticity, optimal price, simulation curve and competitor comparison
    /// for one product.
    pub fn analyze_pricing(&self, request: &PricingRequest) -> PricingAnalysis {
        let cfg = &self.config.pricing;
        let current_price = request.current_price;
        if !(current_price.is_finite() && current_price > 0.0) {
            warn!(
                product = %request.product_id,
                current_price,
                "non-positive current price; pricing falls back to neutral defaults"
            );
        }

        let mut history: Vec<PriceObservation> = request.sales_history.clone();
        history.sort_by_key(|o| o.date);

        let estimator = ElasticityEstimator::from_config(cfg);
        let estimate = estimator.estimate(&history);
        let elasticity = estimate.elasticity;

        let current_demand = current_demand(&history);
        let optimal_price =
            OptimalPriceSolver::from_config(cfg).solve(current_price, elasticity, request.cost_price);
        let optimal_demand = simulate_demand(current_price, current_demand, optimal_price, elasticity);

        let simulations = PriceSimulationGenerator::new(cfg.grid.clone()).generate(
            current_price,
            current_demand,
            request.cost_price,
            elasticity,
        );

        let competitors: Vec<CompetitorComparison> = request
            .competitor_prices
            .iter()
            .map(|c| CompetitorComparison {
                name: c.name.clone(),
                price: c.price,
                diff_pct: if c.price > 0.0 {
                    round_one_decimal((current_price - c.price) / c.price * 100.0)
                } else {
                    0.0
                },
            })
            .collect();
        let average_competitor_price = average_price(&request.competitor_prices);

        let result = ElasticityResult {
            product_id: request.product_id,
            elasticity,
            elasticity_type: estimator.classify(elasticity),
            current_price,
            current_demand,
            optimal_price,
            optimal_demand,
            optimal_revenue: optimal_price * optimal_demand as f64,
            confidence_level: estimate.confidence,
        };

        debug!(
            product = %request.product_id,
            elasticity,
            samples = estimate.sample_count,
            optimal_price,
            "pricing analyzed"
        );

        PricingAnalysis {
            product_id: request.product_id,
            product_name: request.product_name.clone(),
            recommendation: pricing_recommendation(&result, average_competitor_price),
            elasticity: result,
            optimal_price,
            simulations,
            average_competitor_price,
            competitors,
        }
    }

    /// Simulation curve over the configured grid.
    pub fn generate_price_simulations(
        &self,
        current_price: f64,
        current_demand: u64,
        cost_price: f64,
        elasticity: f64,
    ) -> Vec<PriceSimulationPoint> {
        PriceSimulationGenerator::new(self.config.pricing.grid.clone()).generate(
            current_price,
            current_demand,
            cost_price,
            elasticity,
        )
    }

    pub fn assess_opportunity(
        &self,
        forecast: &ForecastResult,
        pricing: &PricingAnalysis,
        competitors: &[CompetitorPrice],
    ) -> ProductOpportunity {
        CompetitiveAdjuster::new(self.config.competitive.clone()).assess(forecast, pricing, competitors)
    }

    /// Join forecasts with pricing requests by product id and rank the result.
    ///
    /// Requests without a matching forecast are skipped.
    pub fn opportunities(
        &self,
        forecasts: &[ForecastResult],
        requests: &[PricingRequest],
    ) -> Vec<ProductOpportunity> {
        let by_id: HashMap<ProductId, &ForecastResult> =
            forecasts.iter().map(|f| (f.product_id, f)).collect();

        let opportunities = requests
            .iter()
            .filter_map(|req| match by_id.get(&req.product_id) {
                Some(forecast) => {
                    let pricing = self.analyze_pricing(req);
                    Some(self.assess_opportunity(forecast, &pricing, &req.competitor_prices))
                }
                None => {
                    warn!(product = %req.product_id, "no forecast for pricing request; skipped");
                    None
                }
            })
            .collect();

        rank_opportunities(opportunities)
    }
}

/// Mean quantity over the price history, whole units.
fn current_demand(history: &[PriceObservation]) -> u64 {
    let qty: Vec<f64> = history.iter().map(|o| f64::from(o.quantity)).collect();
    non_negative_count(mean(&qty))
}

fn average_price(competitors: &[CompetitorPrice]) -> Option<f64> {
    let prices: Vec<f64> = competitors
        .iter()
        .map(|c| c.price)
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    (!prices.is_empty()).then(|| mean(&prices))
}

fn pricing_recommendation(result: &ElasticityResult, average_competitor_price: Option<f64>) -> String {
    let current = result.current_price;
    let optimal = result.optimal_price;
    let describe = result.elasticity_type.describe();

    let mut text = if current <= 0.0 {
        "No valid current price; set a selling price before optimizing.".to_string()
    } else {
        let change_pct = (optimal - current) / current * 100.0;
        if change_pct.abs() <= HOLD_BAND * 100.0 {
            format!("Keep the current price of {current:.2}. {describe}.")
        } else if change_pct > 0.0 {
            format!("Raise the price from {current:.2} to {optimal:.2} ({change_pct:+.1}%). {describe}.")
        } else {
            format!("Lower the price from {current:.2} to {optimal:.2} ({change_pct:+.1}%). {describe}.")
        }
    };

    if let Some(avg) = average_competitor_price {
        let diff = (current - avg) / avg * 100.0;
        if diff > 10.0 {
            text.push_str(&format!(
                " Competitors average {avg:.2}; you are {diff:.1}% more expensive."
            ));
        } else if diff < -5.0 {
            text.push_str(&format!(
                " Competitors average {avg:.2}; you are {:.1}% cheaper.",
                diff.abs()
            ));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ForecastConfig, JoinKey};
    use crate::elasticity::ElasticityType;
    use crate::forecast::Trend;
    use crate::stock_risk::StockoutRisk;
    use chrono::{Days, NaiveDate};
    use uuid::Uuid;

    fn pid(n: u128) -> ProductId {
        ProductId::from_uuid(Uuid::from_u128(n))
    }

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(offset)
    }

    fn product(n: u128, name: &str, stock: i64, min: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: pid(n),
            name: name.to_string(),
            category: "General".to_string(),
            current_stock: stock,
            min_stock: min,
            cost_price: 60.0,
            selling_price: 100.0,
        }
    }

    fn weekly_sales(n: u128, name: &str, qty: &[u32]) -> Vec<SalesRecord> {
        qty.iter()
            .enumerate()
            .map(|(i, q)| SalesRecord {
                product_id: pid(n),
                product_name: name.to_string(),
                category: "General".to_string(),
                quantity: *q,
                unit_price: 100.0,
                sale_date: day(7 * i as u64),
                current_stock: 0,
                min_stock: 0,
            })
            .collect()
    }

    #[test]
    fn rejects_invalid_config() {
        let mut cfg = EngineConfig::default();
        cfg.forecast = ForecastConfig::default().with_alpha(2.0);
        assert!(matches!(
            AnalyticsEngine::new(cfg),
            Err(AnalyticsError::InvalidConfig(_))
        ));

        let mut cfg = EngineConfig::default();
        cfg.forecast = ForecastConfig::default().with_periods(8_000);
        assert!(matches!(
            AnalyticsEngine::new(cfg),
            Err(AnalyticsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn forecasts_sorted_by_risk_then_demand() {
        let engine = AnalyticsEngine::default();
        let products = vec![
            product(1, "Calm", 500, 10),
            product(2, "Busy", 500, 10),
            product(3, "Short", 2, 10),
        ];
        let mut sales = weekly_sales(1, "Calm", &[7, 7, 7, 7]);
        sales.extend(weekly_sales(2, "Busy", &[14, 14, 14, 14]));
        sales.extend(weekly_sales(3, "Short", &[7, 7, 7, 7]));

        let report = engine.generate_forecasts(&sales, &products, 30);
        let names: Vec<&str> = report.forecasts.iter().map(|f| f.product_name.as_str()).collect();
        assert_eq!(names, vec!["Short", "Busy", "Calm"]);

        let busy = &report.forecasts[1];
        assert_eq!(busy.predicted_demand, 60);
        assert_eq!(busy.trend, Trend::Stable);
        assert_eq!(busy.stockout_risk, StockoutRisk::Low);
        assert_eq!(busy.confidence_level, 95);
        assert_eq!(busy.historical_data.len(), 4);

        let short = &report.forecasts[0];
        assert_eq!(short.stockout_risk, StockoutRisk::High);
        // demand 30, safety 6, (30 - 2) + 6 + 10
        assert_eq!(short.suggested_reorder_qty, 44);
        assert!(short.recommendation.starts_with("Order 44 units"));
    }

    #[test]
    fn unsold_products_get_zero_forecast_with_floor_confidence() {
        let engine = AnalyticsEngine::default();
        let report = engine.generate_forecasts(&[], &[product(1, "Idle", 100, 10)], 30);
        let f = &report.forecasts[0];
        assert_eq!(f.predicted_demand, 0);
        assert_eq!(f.confidence_level, 30);
        assert_eq!(f.days_of_stock, None);
        assert!(report.insights.iter().any(|i| i.title == "Limited sales history"));
        assert_eq!(
            report.summary,
            "Analyzed 1 product(s): 0 at risk of stockout, 1 with healthy stock levels."
        );
    }

    #[test]
    fn sales_only_products_use_latest_record_stock() {
        let engine = AnalyticsEngine::default();
        let mut sales = weekly_sales(9, "Ghost", &[3, 3]);
        sales[1].current_stock = 1;
        sales[1].min_stock = 4;
        let report = engine.generate_forecasts(&sales, &[], 30);
        let f = &report.forecasts[0];
        assert_eq!(f.current_stock, 1);
        assert_eq!(f.min_stock, 4);
        assert_eq!(f.stockout_risk, StockoutRisk::High);
        assert!(report.insights.iter().any(|i| i.title == "Below minimum stock"));
    }

    #[test]
    fn name_join_shim_is_configurable() {
        let mut cfg = EngineConfig::default();
        cfg.forecast = ForecastConfig::default().with_join_key(JoinKey::ProductName);
        let engine = AnalyticsEngine::new(cfg).unwrap();
        // Catalog id 1, sales recorded under a different id but same name.
        let sales = weekly_sales(2, "Widget", &[7, 7, 7]);
        let report = engine.generate_forecasts(&sales, &[product(1, "Widget", 100, 10)], 7);
        assert_eq!(report.forecasts.len(), 1);
        assert_eq!(report.forecasts[0].product_id, pid(1));
        assert_eq!(report.forecasts[0].predicted_demand, 7);
    }

    fn request(history: Vec<PriceObservation>, competitors: Vec<CompetitorPrice>) -> PricingRequest {
        PricingRequest {
            product_id: pid(1),
            product_name: "Lamp".to_string(),
            current_price: 1000.0,
            cost_price: 600.0,
            sales_history: history,
            competitor_prices: competitors,
        }
    }

    fn obs(offset: u64, price: f64, quantity: u32) -> PriceObservation {
        PriceObservation {
            price,
            quantity,
            date: day(offset),
        }
    }

    #[test]
    fn pricing_without_history_uses_defaults() {
        let engine = AnalyticsEngine::default();
        let a = engine.analyze_pricing(&request(vec![], vec![]));
        assert_eq!(a.elasticity.elasticity, -1.0);
        assert_eq!(a.elasticity.confidence_level, 30);
        assert_eq!(a.elasticity.current_demand, 0);
        assert_eq!(a.elasticity.elasticity_type, ElasticityType::UnitElastic);
        // -1 / 0 -> margin floor 660
        assert_eq!(a.optimal_price, 660.0);
        assert_eq!(a.simulations.len(), 9);
        assert_eq!(a.average_competitor_price, None);
        assert!(a.recommendation.starts_with("Lower the price from 1000.00 to 660.00"));
    }

    #[test]
    fn pricing_sorts_history_before_estimating() {
        let engine = AnalyticsEngine::default();
        let a = engine.analyze_pricing(&request(
            vec![obs(5, 110.0, 45), obs(1, 100.0, 50)],
            vec![],
        ));
        assert!((a.elasticity.elasticity - -1.105).abs() < 1e-3);
        assert_eq!(a.elasticity.elasticity_type, ElasticityType::Elastic);
        // mean(50, 45) = 47.5 -> 48
        assert_eq!(a.elasticity.current_demand, 48);
    }

    #[test]
    fn pricing_compares_competitors() {
        let engine = AnalyticsEngine::default();
        let a = engine.analyze_pricing(&request(
            vec![],
            vec![CompetitorPrice::new("Acme", 800.0), CompetitorPrice::new("Zed", 0.0)],
        ));
        assert_eq!(a.average_competitor_price, Some(800.0));
        assert_eq!(a.competitors[0].diff_pct, 25.0);
        assert_eq!(a.competitors[1].diff_pct, 0.0);
        assert!(a.recommendation.contains("Competitors average 800.00"));
    }

    #[test]
    fn simulations_follow_configured_grid() {
        let mut cfg = EngineConfig::default();
        cfg.pricing.grid = crate::config::SimulationGrid::wide();
        let engine = AnalyticsEngine::new(cfg).unwrap();
        assert_eq!(engine.generate_price_simulations(100.0, 10, 50.0, -1.0).len(), 13);
    }

    #[test]
    fn opportunities_join_by_product_id() {
        let engine = AnalyticsEngine::default();
        let sales = weekly_sales(1, "Lamp", &[7, 7, 7, 7]);
        let report = engine.generate_forecasts(&sales, &[product(1, "Lamp", 500, 10)], 7);
        let mut other = request(vec![], vec![]);
        other.product_id = pid(99);
        let out = engine.opportunities(
            &report.forecasts,
            &[request(vec![], vec![CompetitorPrice::new("Acme", 1000.0)]), other],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product_id, pid(1));
        assert_eq!(out[0].price_diff_pct, Some(0.0));
        // 50 + 34 (|660 - 1000| / 1000)
        assert_eq!(out[0].opportunity_score, 84);
    }
}

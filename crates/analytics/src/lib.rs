//! `stockwise-analytics`
//!
//! **Responsibility:** the inventory analytics engine.
//!
//! Two independent, pure pipelines:
//! - forecasting: [`timeseries`] → [`forecast`] → [`stock_risk`] → [`insights`]
//! - pricing: [`elasticity`] → [`optimal_price`] → [`simulation`]
//!
//! merged per product by [`competitive`]. Nothing here performs I/O or holds
//! state between calls; inputs are records materialized by the caller.

pub mod competitive;
pub mod config;
pub mod elasticity;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod insights;
pub mod job;
pub mod optimal_price;
pub mod report;
pub mod simulation;
pub mod stats;
pub mod stock_risk;
pub mod timeseries;

pub use competitive::{CompetitiveAdjuster, ProductOpportunity, rank_opportunities};
pub use config::{
    CompetitiveConfig, EngineConfig, ForecastConfig, Granularity, JoinKey, MAX_GRID_STEPS,
    MAX_PERIODS, PricingConfig, RiskThresholds, SimulationGrid,
};
pub use elasticity::{
    ElasticityEstimate, ElasticityEstimator, ElasticityResult, ElasticityType,
    calculate_price_elasticity,
};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use forecast::{
    DemandForecaster, SmoothedForecast, Trend, calculate_confidence, exponential_smoothing,
};
pub use insights::{Insight, InsightGenerator, InsightKind};
pub use job::{
    AnalyticsJob, ForecastInput, ForecastJob, OpportunityInput, OpportunityJob, PricingJob,
};
pub use optimal_price::{OptimalPriceSolver, calculate_optimal_price, simulate_demand};
pub use report::{
    CompetitorComparison, ForecastReport, ForecastResult, HistoricalPoint, PricingAnalysis,
    PricingRequest,
};
pub use simulation::{PriceSimulationGenerator, PriceSimulationPoint, generate_price_simulations};
pub use stock_risk::{
    RiskAssessment, StockRiskAssessor, StockoutRisk, assess_stockout_risk,
    calculate_reorder_quantity,
};
pub use timeseries::{SeriesKey, StockLevels, TimeSeries, aggregate};

use serde::{Deserialize, Serialize};

use stockwise_core::{DomainError, ProductSnapshot, SalesRecord};

use crate::competitive::ProductOpportunity;
use crate::config::EngineConfig;
use crate::engine::AnalyticsEngine;
use crate::error::AnalyticsError;
use crate::report::{ForecastReport, PricingAnalysis, PricingRequest};

/// A self-contained analytics request.
///
/// Inputs are materialized by callers (persistence layer, CLI); jobs never fetch
/// anything. `run` validates the config and input shape, then computes.
pub trait AnalyticsJob: Send + Sync + 'static {
    type Input: Send + Sync + 'static;
    type Output;

    /// The snapshot the job will run on.
    fn input(&self) -> &Self::Input;

    /// Execute the job. Must not mutate anything; same input, same output.
    fn run(&self) -> Result<Self::Output, AnalyticsError>;
}

/// Sales history plus catalog, as read from the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastInput {
    pub sales: Vec<SalesRecord>,
    pub products: Vec<ProductSnapshot>,
}

impl ForecastInput {
    fn validate(&self) -> Result<(), DomainError> {
        self.sales.iter().try_for_each(SalesRecord::validate)?;
        self.products.iter().try_for_each(ProductSnapshot::validate)
    }
}

#[derive(Debug, Clone)]
pub struct ForecastJob {
    input: ForecastInput,
    forecast_days: u32,
    config: EngineConfig,
}

impl ForecastJob {
    pub fn new(input: ForecastInput) -> Self {
        Self {
            input,
            forecast_days: 30,
            config: EngineConfig::default(),
        }
    }

    pub fn with_forecast_days(mut self, forecast_days: u32) -> Self {
        self.forecast_days = forecast_days;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

impl AnalyticsJob for ForecastJob {
    type Input = ForecastInput;
    type Output = ForecastReport;

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn run(&self) -> Result<ForecastReport, AnalyticsError> {
        if self.forecast_days == 0 {
            return Err(AnalyticsError::input("forecast_days must be > 0"));
        }
        self.input.validate()?;
        let engine = AnalyticsEngine::new(self.config.clone())?;
        Ok(engine.generate_forecasts(&self.input.sales, &self.input.products, self.forecast_days))
    }
}

fn validate_request(request: &PricingRequest) -> Result<(), AnalyticsError> {
    if !(request.current_price.is_finite() && request.current_price > 0.0) {
        return Err(AnalyticsError::input(format!(
            "{}: current_price must be a positive number",
            request.product_name
        )));
    }
    if !(request.cost_price.is_finite() && request.cost_price >= 0.0) {
        return Err(AnalyticsError::input(format!(
            "{}: cost_price must be a non-negative number",
            request.product_name
        )));
    }
    if request.sales_history.iter().any(|o| !o.price.is_finite() || o.price <= 0.0) {
        return Err(AnalyticsError::input(format!(
            "{}: sales history contains a non-positive price",
            request.product_name
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PricingJob {
    request: PricingRequest,
    config: EngineConfig,
}

impl PricingJob {
    pub fn new(request: PricingRequest) -> Self {
        Self {
            request,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

impl AnalyticsJob for PricingJob {
    type Input = PricingRequest;
    type Output = PricingAnalysis;

    fn input(&self) -> &Self::Input {
        &self.request
    }

    fn run(&self) -> Result<PricingAnalysis, AnalyticsError> {
        validate_request(&self.request)?;
        let engine = AnalyticsEngine::new(self.config.clone())?;
        Ok(engine.analyze_pricing(&self.request))
    }
}

/// Forecast input plus one pricing request per product to review.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpportunityInput {
    pub forecast: ForecastInput,
    pub requests: Vec<PricingRequest>,
}

#[derive(Debug, Clone)]
pub struct OpportunityJob {
    input: OpportunityInput,
    forecast_days: u32,
    config: EngineConfig,
}

impl OpportunityJob {
    pub fn new(input: OpportunityInput) -> Self {
        Self {
            input,
            forecast_days: 30,
            config: EngineConfig::default(),
        }
    }

    pub fn with_forecast_days(mut self, forecast_days: u32) -> Self {
        self.forecast_days = forecast_days;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

impl AnalyticsJob for OpportunityJob {
    type Input = OpportunityInput;
    type Output = Vec<ProductOpportunity>;

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn run(&self) -> Result<Vec<ProductOpportunity>, AnalyticsError> {
        if self.forecast_days == 0 {
            return Err(AnalyticsError::input("forecast_days must be > 0"));
        }
        self.input.forecast.validate()?;
        self.input.requests.iter().try_for_each(validate_request)?;

        let engine = AnalyticsEngine::new(self.config.clone())?;
        let report = engine.generate_forecasts(
            &self.input.forecast.sales,
            &self.input.forecast.products,
            self.forecast_days,
        );
        Ok(engine.opportunities(&report.forecasts, &self.input.requests))
    }
}

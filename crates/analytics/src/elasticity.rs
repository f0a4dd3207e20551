//! Price elasticity of demand from a product's own sales history.

use serde::{Deserialize, Serialize};

use stockwise_core::{PriceObservation, ProductId};

use crate::config::PricingConfig;
use crate::stats::{mean, round_half_up, stddev_population};

/// Elasticity assumed when there are fewer than two observations.
pub const DEFAULT_ELASTICITY: f64 = -1.0;
/// Elasticity assumed when the price never changed.
pub const FLAT_PRICE_ELASTICITY: f64 = -1.2;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElasticityType {
    Elastic,
    Inelastic,
    UnitElastic,
}

impl ElasticityType {
    /// Classify by `|elasticity|` against the two thresholds.
    pub fn classify(elasticity: f64, elastic_threshold: f64, inelastic_threshold: f64) -> Self {
        let magnitude = elasticity.abs();
        if magnitude > elastic_threshold {
            ElasticityType::Elastic
        } else if magnitude < inelastic_threshold {
            ElasticityType::Inelastic
        } else {
            ElasticityType::UnitElastic
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ElasticityType::Elastic => "Demand is price-sensitive; small price cuts can lift revenue",
            ElasticityType::Inelastic => {
                "Demand is not price-sensitive; there is room to raise prices"
            }
            ElasticityType::UnitElastic => {
                "Demand moves in step with price; revenue is near its maximum"
            }
        }
    }
}

impl core::fmt::Display for ElasticityType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ElasticityType::Elastic => "elastic",
            ElasticityType::Inelastic => "inelastic",
            ElasticityType::UnitElastic => "unit_elastic",
        })
    }
}

/// Raw estimate before it is combined with pricing figures.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticityEstimate {
    pub elasticity: f64,
    /// 30..=95.
    pub confidence: u8,
    /// Number of price-changing pairs the estimate is built from.
    pub sample_count: usize,
}

/// Elasticity figures for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticityResult {
    pub product_id: ProductId,
    pub elasticity: f64,
    pub elasticity_type: ElasticityType,
    pub current_price: f64,
    pub current_demand: u64,
    pub optimal_price: f64,
    pub optimal_demand: u64,
    pub optimal_revenue: f64,
    pub confidence_level: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElasticityEstimator {
    elastic_threshold: f64,
    inelastic_threshold: f64,
}

impl Default for ElasticityEstimator {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

impl ElasticityEstimator {
    pub fn from_config(config: &PricingConfig) -> Self {
        Self {
            elastic_threshold: config.elastic_threshold,
            inelastic_threshold: config.inelastic_threshold,
        }
    }

    /// Estimate PED from chronologically sorted observations.
    ///
    /// Uses the midpoint method on each consecutive pair whose price differs and
    /// averages the results.
    pub fn estimate(&self, history: &[PriceObservation]) -> ElasticityEstimate {
        if history.len() < 2 {
            return ElasticityEstimate {
                elasticity: DEFAULT_ELASTICITY,
                confidence: 30,
                sample_count: 0,
            };
        }

        let peds: Vec<f64> = history
            .windows(2)
            .filter_map(|pair| midpoint_elasticity(&pair[0], &pair[1]))
            .collect();

        if peds.is_empty() {
            return ElasticityEstimate {
                elasticity: FLAT_PRICE_ELASTICITY,
                confidence: 40,
                sample_count: 0,
            };
        }

        let avg = mean(&peds);
        let base = if avg == 0.0 {
            30.0
        } else {
            let cv = stddev_population(&peds, avg) / avg.abs();
            (100.0 - cv * 50.0).clamp(30.0, 95.0)
        };
        let bonus = (2 * peds.len()).min(20) as f64;
        let confidence = round_half_up(base + bonus).min(95.0) as u8;

        ElasticityEstimate {
            elasticity: avg,
            confidence,
            sample_count: peds.len(),
        }
    }

    pub fn classify(&self, elasticity: f64) -> ElasticityType {
        ElasticityType::classify(elasticity, self.elastic_threshold, self.inelastic_threshold)
    }
}

/// PED between two observations; `None` when the price did not change.
fn midpoint_elasticity(a: &PriceObservation, b: &PriceObservation) -> Option<f64> {
    if a.price == b.price {
        return None;
    }
    let avg_price = (a.price + b.price) / 2.0;
    if avg_price == 0.0 {
        return None;
    }
    let (q1, q2) = (f64::from(a.quantity), f64::from(b.quantity));
    let avg_qty = (q1 + q2) / 2.0;
    let pct_qty = if avg_qty == 0.0 {
        0.0
    } else {
        (q2 - q1) / avg_qty * 100.0
    };
    let pct_price = (b.price - a.price) / avg_price * 100.0;
    Some(pct_qty / pct_price)
}

/// Estimate elasticity with the default thresholds.
pub fn calculate_price_elasticity(history: &[PriceObservation]) -> ElasticityEstimate {
    ElasticityEstimator::default().estimate(history)
}

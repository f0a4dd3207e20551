//! Revenue-maximizing price from an elasticity coefficient.

use crate::config::PricingConfig;
use crate::stats::{non_negative_count, round_half_up};

#[derive(Debug, Clone, PartialEq)]
pub struct OptimalPriceSolver {
    min_margin: f64,
    inelastic_cutoff: f64,
    inelastic_markup: f64,
    lower_bound_ratio: f64,
    upper_bound_ratio: f64,
}

impl Default for OptimalPriceSolver {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

impl OptimalPriceSolver {
    pub fn from_config(config: &PricingConfig) -> Self {
        Self {
            min_margin: config.min_margin,
            inelastic_cutoff: config.inelastic_cutoff,
            inelastic_markup: config.inelastic_markup,
            lower_bound_ratio: config.lower_bound_ratio,
            upper_bound_ratio: config.upper_bound_ratio,
        }
    }

    pub fn with_min_margin(mut self, min_margin: f64) -> Self {
        self.min_margin = min_margin;
        self
    }

    /// Optimal price in whole currency units.
    ///
    /// Near-zero or positive elasticities get a flat markup. Otherwise the
    /// price is `p * e / (e + 1)`, floored at cost plus the minimum margin, then
    /// bounded to `[lower_bound_ratio * p, upper_bound_ratio * p]`. A
    /// non-positive current price yields 0.
    pub fn solve(&self, current_price: f64, elasticity: f64, cost_price: f64) -> f64 {
        if !(current_price.is_finite() && current_price > 0.0) {
            return 0.0;
        }
        if elasticity >= self.inelastic_cutoff {
            return round_half_up(current_price * self.inelastic_markup);
        }

        let multiplier = elasticity / (elasticity + 1.0);
        let mut price = current_price * multiplier;

        let margin_floor = cost_price * (1.0 + self.min_margin);
        if !(price >= margin_floor) {
            price = margin_floor;
        }

        let lower = current_price * self.lower_bound_ratio;
        let upper = current_price * self.upper_bound_ratio;
        price = price.max(lower).min(upper);

        round_half_up(price)
    }
}

/// Optimal price with the default bounds and markup.
pub fn calculate_optimal_price(
    current_price: f64,
    elasticity: f64,
    cost_price: f64,
    min_margin: f64,
) -> f64 {
    OptimalPriceSolver::default()
        .with_min_margin(min_margin)
        .solve(current_price, elasticity, cost_price)
}

/// Linear demand response to a price change.
///
/// `demand * (1 + e * (new - current) / current)`, rounded, floored at 0. A
/// non-positive current price leaves demand unchanged.
pub fn simulate_demand(current_price: f64, current_demand: u64, new_price: f64, elasticity: f64) -> u64 {
    if !(current_price.is_finite() && current_price > 0.0) {
        return current_demand;
    }
    let change = (new_price - current_price) / current_price;
    non_negative_count(current_demand as f64 * (1.0 + elasticity * change))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strongly_elastic_is_capped_at_upper_bound() {
        // multiplier 2 -> 2000, capped at 1.5 * 1000
        assert_eq!(calculate_optimal_price(1000.0, -2.0, 600.0, 0.10), 1500.0);
    }

    #[test]
    fn very_elastic_sits_inside_bounds() {
        // -3 / -2 = 1.5 exactly -> 150
        assert_eq!(calculate_optimal_price(100.0, -3.0, 50.0, 0.10), 150.0);
        // -5 / -4 = 1.25 -> 125
        assert_eq!(calculate_optimal_price(100.0, -5.0, 50.0, 0.10), 125.0);
    }

    #[test]
    fn inelastic_gets_flat_markup() {
        assert_eq!(calculate_optimal_price(100.0, -0.05, 50.0, 0.10), 115.0);
        assert_eq!(calculate_optimal_price(100.0, 0.4, 50.0, 0.10), 115.0);
        assert_eq!(calculate_optimal_price(100.0, -0.1, 50.0, 0.10), 115.0);
    }

    #[test]
    fn negative_multiplier_falls_back_to_margin_floor() {
        // -0.5 / 0.5 = -1 -> negative price -> floor 88
        assert_eq!(calculate_optimal_price(100.0, -0.5, 80.0, 0.10), 88.0);
    }

    #[test]
    fn unit_elasticity_does_not_produce_nan() {
        let p = calculate_optimal_price(100.0, -1.0, 80.0, 0.10);
        assert_eq!(p, 88.0);
    }

    #[test]
    fn margin_floor_above_upper_bound_is_capped() {
        assert_eq!(calculate_optimal_price(100.0, -3.0, 200.0, 0.10), 150.0);
    }

    #[test]
    fn lower_bound_applies() {
        // -50 / -49 ≈ 1.02 -> 102; floor 11 -> 102. Cheap cost cannot push below half price.
        assert_eq!(calculate_optimal_price(100.0, -50.0, 10.0, 0.10), 102.0);
        // -0.2 / 0.8 = -0.25 -> floor 11 -> lifted to 50
        assert_eq!(calculate_optimal_price(100.0, -0.2, 10.0, 0.10), 50.0);
    }

    #[test]
    fn zero_current_price_is_guarded() {
        assert_eq!(calculate_optimal_price(0.0, -2.0, 10.0, 0.10), 0.0);
    }

    #[test]
    fn simulate_demand_linear_response() {
        assert_eq!(simulate_demand(100.0, 50, 110.0, -2.0), 40);
        assert_eq!(simulate_demand(100.0, 50, 90.0, -2.0), 60);
        assert_eq!(simulate_demand(100.0, 50, 100.0, -2.0), 50);
    }

    #[test]
    fn simulate_demand_floors_at_zero() {
        assert_eq!(simulate_demand(100.0, 50, 200.0, -3.0), 0);
    }

    #[test]
    fn simulate_demand_with_zero_price_is_unchanged() {
        assert_eq!(simulate_demand(0.0, 12, 5.0, -2.0), 12);
    }
}

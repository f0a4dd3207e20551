//! Demand, revenue and margin across a grid of price changes.

use serde::{Deserialize, Serialize};

use crate::config::SimulationGrid;
use crate::optimal_price::simulate_demand;
use crate::stats::round_half_up;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSimulationPoint {
    pub price_change_percent: f64,
    pub simulated_price: f64,
    pub simulated_demand: u64,
    pub simulated_revenue: f64,
    /// Profit as a percentage of revenue, one decimal. 0 without revenue.
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSimulationGenerator {
    grid: SimulationGrid,
}

impl PriceSimulationGenerator {
    pub fn new(grid: SimulationGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &SimulationGrid {
        &self.grid
    }

    /// One point per grid step, ascending by price change.
    ///
    /// Prices are rounded to whole units except at 0%, which is the current
    /// price itself.
    pub fn generate(
        &self,
        current_price: f64,
        current_demand: u64,
        cost_price: f64,
        elasticity: f64,
    ) -> Vec<PriceSimulationPoint> {
        self.grid
            .points()
            .into_iter()
            .map(|change| {
                let simulated_price = if change == 0.0 {
                    current_price
                } else {
                    round_half_up(current_price * (1.0 + change / 100.0))
                };
                let simulated_demand =
                    simulate_demand(current_price, current_demand, simulated_price, elasticity);
                let demand = simulated_demand as f64;
                let simulated_revenue = simulated_price * demand;
                let profit = (simulated_price - cost_price) * demand;
                let profit_margin = if simulated_revenue == 0.0 {
                    0.0
                } else {
                    round_half_up(profit / simulated_revenue * 1000.0) / 10.0
                };

                PriceSimulationPoint {
                    price_change_percent: change,
                    simulated_price,
                    simulated_demand,
                    simulated_revenue,
                    profit_margin,
                }
            })
            .collect()
    }
}

/// Simulation over the default -10%..+10% grid.
pub fn generate_price_simulations(
    current_price: f64,
    current_demand: u64,
    cost_price: f64,
    elasticity: f64,
) -> Vec<PriceSimulationPoint> {
    PriceSimulationGenerator::default().generate(current_price, current_demand, cost_price, elasticity)
}

//! End-to-end checks through the public engine API.

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use stockwise_analytics::{
    AnalyticsEngine, ElasticityType, EngineConfig, Granularity, InsightKind, PricingRequest,
    SimulationGrid, StockoutRisk, Trend, assess_stockout_risk, calculate_optimal_price,
    calculate_reorder_quantity, calculate_price_elasticity,
};
use stockwise_core::{CompetitorPrice, PriceObservation, ProductId, ProductSnapshot, SalesRecord};

fn pid(n: u128) -> ProductId {
    ProductId::from_uuid(Uuid::from_u128(n))
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 5).unwrap() + Days::new(offset)
}

fn product(n: u128, name: &str, stock: i64, min: i64) -> ProductSnapshot {
    ProductSnapshot {
        id: pid(n),
        name: name.to_string(),
        category: "Store".to_string(),
        current_stock: stock,
        min_stock: min,
        cost_price: 6.0,
        selling_price: 10.0,
    }
}

fn sales(n: u128, name: &str, qty: &[u32], spacing_days: u64) -> Vec<SalesRecord> {
    qty.iter()
        .enumerate()
        .map(|(i, q)| SalesRecord {
            product_id: pid(n),
            product_name: name.to_string(),
            category: "Store".to_string(),
            quantity: *q,
            unit_price: 10.0,
            sale_date: day(i as u64 * spacing_days),
            current_stock: 0,
            min_stock: 0,
        })
        .collect()
}

#[test]
fn documented_reference_values() {
    assert_eq!(assess_stockout_risk(2, 10, 70, 30), StockoutRisk::High);
    assert_eq!(calculate_reorder_quantity(5, 30, 10), 41);
    assert_eq!(calculate_optimal_price(1000.0, -2.0, 600.0, 0.10), 1500.0);

    let e = calculate_price_elasticity(&[
        PriceObservation {
            price: 100.0,
            quantity: 50,
            date: day(0),
        },
        PriceObservation {
            price: 110.0,
            quantity: 45,
            date: day(7),
        },
    ]);
    assert!((e.elasticity - -1.105).abs() < 1e-3);
    assert_eq!(
        ElasticityType::classify(e.elasticity, 1.1, 0.9),
        ElasticityType::Elastic
    );
}

#[test]
fn full_portfolio_report() {
    let engine = AnalyticsEngine::default();
    let products = vec![
        product(1, "Rising A", 500, 10),
        product(2, "Rising B", 500, 10),
        product(3, "Rising C", 500, 10),
        product(4, "Fading", 500, 10),
        product(5, "Empty", 3, 10),
    ];
    let mut records = Vec::new();
    records.extend(sales(1, "Rising A", &[5, 10, 15, 20, 25], 7));
    records.extend(sales(2, "Rising B", &[2, 4, 6, 8, 10], 7));
    records.extend(sales(3, "Rising C", &[10, 12, 14, 16, 18], 7));
    records.extend(sales(4, "Fading", &[30, 25, 20, 15, 10], 7));

    let report = engine.generate_forecasts(&records, &products, 30);
    assert_eq!(report.forecasts.len(), 5);
    assert_eq!(report.forecasts[0].product_name, "Empty");
    assert_eq!(report.forecasts[0].stockout_risk, StockoutRisk::High);

    let rising = report
        .forecasts
        .iter()
        .filter(|f| f.trend == Trend::Increasing)
        .count();
    assert_eq!(rising, 3);
    let fading = report.forecasts.iter().find(|f| f.product_name == "Fading").unwrap();
    assert_eq!(fading.trend, Trend::Decreasing);

    for f in &report.forecasts {
        assert!((30..=95).contains(&f.confidence_level));
    }

    let kinds: Vec<InsightKind> = report.insights.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            InsightKind::Warning,
            InsightKind::Opportunity,
            InsightKind::Warning
        ]
    );
    assert_eq!(
        report.summary,
        "Analyzed 5 product(s): 1 at risk of stockout, 4 with healthy stock levels."
    );
}

#[test]
fn weekly_buckets_match_window_rescale() {
    let mut cfg = EngineConfig::default();
    cfg.forecast.granularity = Granularity::Weekly;
    let engine = AnalyticsEngine::new(cfg).unwrap();

    // Seven daily sales of 2 units, then seven more: two weeks of 14.
    let records = sales(1, "Daily", &[2; 14], 1);
    let report = engine.generate_forecasts(&records, &[product(1, "Daily", 500, 10)], 7);
    let f = &report.forecasts[0];
    assert_eq!(f.historical_data.len(), 2);
    assert_eq!(f.predicted_demand, 14);
}

#[test]
fn pricing_and_opportunity_flow() {
    let mut cfg = EngineConfig::default();
    cfg.pricing.grid = SimulationGrid::wide();
    let engine = AnalyticsEngine::new(cfg).unwrap();

    let history: Vec<PriceObservation> = [(10.0, 40), (12.0, 30), (10.0, 41), (12.0, 29)]
        .iter()
        .enumerate()
        .map(|(i, (price, qty))| PriceObservation {
            price: *price,
            quantity: *qty,
            date: day(i as u64 * 7),
        })
        .collect();
    let request = PricingRequest {
        product_id: pid(1),
        product_name: "Rising A".to_string(),
        current_price: 10.0,
        cost_price: 6.0,
        sales_history: history,
        competitor_prices: vec![
            CompetitorPrice::new("Shop 1", 12.0),
            CompetitorPrice::new("Shop 2", 13.0),
        ],
    };

    let analysis = engine.analyze_pricing(&request);
    assert_eq!(analysis.elasticity.elasticity_type, ElasticityType::Elastic);
    assert_eq!(analysis.simulations.len(), 13);
    let zero = analysis
        .simulations
        .iter()
        .find(|p| p.price_change_percent == 0.0)
        .unwrap();
    assert_eq!(zero.simulated_price, 10.0);
    assert_eq!(zero.simulated_demand, analysis.elasticity.current_demand);
    assert!(analysis.optimal_price >= 5.0 && analysis.optimal_price <= 15.0);

    let report = engine.generate_forecasts(
        &sales(1, "Rising A", &[5, 10, 15, 20, 25], 7),
        &[product(1, "Rising A", 500, 10)],
        30,
    );
    let opportunities = engine.opportunities(&report.forecasts, &[request.clone()]);
    assert_eq!(opportunities.len(), 1);
    let o = &opportunities[0];
    // 20% cheaper than the 12.5 average -> +6% demand
    assert!((o.price_diff_pct.unwrap() - -20.0).abs() < 1e-9);
    assert!(o.adjusted_demand > o.predicted_demand);
    assert!(o.opportunity_score >= 75);

    // Identical input, identical output.
    assert_eq!(engine.analyze_pricing(&request), analysis);
}

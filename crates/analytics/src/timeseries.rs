//! Groups raw sales records into per-product quantity sequences.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use stockwise_core::{ProductId, ProductSnapshot, SalesRecord};

use crate::config::{Granularity, JoinKey};

/// Key a series is grouped under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKey {
    Id(ProductId),
    Name(String),
}

impl SeriesKey {
    pub(crate) fn for_product(product: &ProductSnapshot, join_key: JoinKey) -> Self {
        match join_key {
            JoinKey::ProductId => SeriesKey::Id(product.id),
            JoinKey::ProductName => SeriesKey::Name(product.name.clone()),
        }
    }

    pub(crate) fn for_record(record: &SalesRecord, join_key: JoinKey) -> Self {
        match join_key {
            JoinKey::ProductId => SeriesKey::Id(record.product_id),
            JoinKey::ProductName => SeriesKey::Name(record.product_name.clone()),
        }
    }
}

/// Stock levels as read alongside the most recent sale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevels {
    pub current_stock: i64,
    pub min_stock: i64,
}

/// Chronological quantity sequence for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    /// Stock levels from the catalog snapshot; `None` if the product was only
    /// seen in sales.
    pub catalog_stock: Option<StockLevels>,
    /// Period dates, ascending. Same length as `quantities`.
    pub dates: Vec<NaiveDate>,
    pub quantities: Vec<u64>,
    /// Number of raw sales records folded into this series.
    pub record_count: usize,
    /// Stock levels carried on the chronologically last sales record.
    pub last_seen_stock: Option<StockLevels>,
}

impl TimeSeries {
    fn empty(
        product_id: ProductId,
        product_name: String,
        category: String,
        catalog_stock: Option<StockLevels>,
    ) -> Self {
        Self {
            product_id,
            product_name,
            category,
            catalog_stock,
            dates: Vec::new(),
            quantities: Vec::new(),
            record_count: 0,
            last_seen_stock: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Quantities as floats, for the numeric pipelines.
    pub fn values(&self) -> Vec<f64> {
        self.quantities.iter().map(|q| *q as f64).collect()
    }

    /// `(date, quantity)` pairs, ascending by date.
    pub fn points(&self) -> Vec<(NaiveDate, u64)> {
        self.dates
            .iter()
            .copied()
            .zip(self.quantities.iter().copied())
            .collect()
    }
}

/// Group `records` per product, ordered ascending by sale date.
///
/// Every catalog product gets a series, empty if it never sold. Products that
/// appear only in sales still get a series with no `catalog_stock`. Under
/// [`JoinKey::ProductName`] the first catalog product with a given name wins.
pub fn aggregate(
    records: &[SalesRecord],
    products: &[ProductSnapshot],
    join_key: JoinKey,
    granularity: Granularity,
) -> BTreeMap<SeriesKey, TimeSeries> {
    let mut series: BTreeMap<SeriesKey, TimeSeries> = BTreeMap::new();

    for product in products {
        series
            .entry(SeriesKey::for_product(product, join_key))
            .or_insert_with(|| {
                TimeSeries::empty(
                    product.id,
                    product.name.clone(),
                    product.category.clone(),
                    Some(StockLevels {
                        current_stock: product.current_stock,
                        min_stock: product.min_stock,
                    }),
                )
            });
    }

    let mut grouped: BTreeMap<SeriesKey, Vec<&SalesRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(SeriesKey::for_record(record, join_key))
            .or_default()
            .push(record);
    }

    for (key, mut group) in grouped {
        // Stable: same-day records keep their input order.
        group.sort_by_key(|r| r.sale_date);

        let entry = series.entry(key).or_insert_with(|| {
            let first = group[0];
            TimeSeries::empty(
                first.product_id,
                first.product_name.clone(),
                first.category.clone(),
                None,
            )
        });

        entry.record_count = group.len();
        entry.last_seen_stock = group.last().map(|r| StockLevels {
            current_stock: r.current_stock,
            min_stock: r.min_stock,
        });

        match granularity {
            Granularity::PerRecord => {
                for r in &group {
                    entry.dates.push(r.sale_date);
                    entry.quantities.push(u64::from(r.quantity));
                }
            }
            Granularity::Weekly => {
                for r in &group {
                    let week = week_start(r.sale_date);
                    match entry.dates.last() {
                        Some(last) if *last == week => {
                            if let Some(q) = entry.quantities.last_mut() {
                                *q += u64::from(r.quantity);
                            }
                        }
                        _ => {
                            entry.dates.push(week);
                            entry.quantities.push(u64::from(r.quantity));
                        }
                    }
                }
            }
        }
    }

    series
}

/// Monday of the ISO week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pid(n: u128) -> ProductId {
        ProductId::from_uuid(Uuid::from_u128(n))
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn product(n: u128, name: &str) -> ProductSnapshot {
        ProductSnapshot {
            id: pid(n),
            name: name.to_string(),
            category: "General".to_string(),
            current_stock: 20,
            min_stock: 5,
            cost_price: 5.0,
            selling_price: 10.0,
        }
    }

    fn sale(n: u128, name: &str, qty: u32, on: NaiveDate, stock: i64) -> SalesRecord {
        SalesRecord {
            product_id: pid(n),
            product_name: name.to_string(),
            category: "General".to_string(),
            quantity: qty,
            unit_price: 10.0,
            sale_date: on,
            current_stock: stock,
            min_stock: 5,
        }
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(aggregate(&[], &[], JoinKey::ProductId, Granularity::PerRecord).is_empty());
    }

    #[test]
    fn sorts_chronologically_and_keeps_unsold_products() {
        let products = vec![product(1, "A"), product(2, "B")];
        let records = vec![
            sale(1, "A", 5, date(1, 15), 8),
            sale(1, "A", 3, date(1, 1), 12),
            sale(1, "A", 4, date(1, 8), 10),
        ];
        let out = aggregate(&records, &products, JoinKey::ProductId, Granularity::PerRecord);

        let a = &out[&SeriesKey::Id(pid(1))];
        assert_eq!(a.quantities, vec![3, 4, 5]);
        assert_eq!(a.dates, vec![date(1, 1), date(1, 8), date(1, 15)]);
        assert_eq!(a.record_count, 3);
        assert_eq!(
            a.last_seen_stock,
            Some(StockLevels {
                current_stock: 8,
                min_stock: 5
            })
        );

        let b = &out[&SeriesKey::Id(pid(2))];
        assert!(b.is_empty());
        assert_eq!(
            b.catalog_stock,
            Some(StockLevels {
                current_stock: 20,
                min_stock: 5
            })
        );
    }

    #[test]
    fn sales_only_products_are_flagged() {
        let out = aggregate(
            &[sale(9, "Ghost", 2, date(2, 1), 3)],
            &[],
            JoinKey::ProductId,
            Granularity::PerRecord,
        );
        let ghost = &out[&SeriesKey::Id(pid(9))];
        assert_eq!(ghost.catalog_stock, None);
        assert_eq!(ghost.product_name, "Ghost");
    }

    #[test]
    fn name_join_merges_ids_sharing_a_name() {
        let records = vec![
            sale(1, "Widget", 2, date(1, 1), 10),
            sale(2, "Widget", 6, date(1, 2), 10),
        ];
        let by_name = aggregate(&records, &[], JoinKey::ProductName, Granularity::PerRecord);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[&SeriesKey::Name("Widget".into())].quantities, vec![2, 6]);

        let by_id = aggregate(&records, &[], JoinKey::ProductId, Granularity::PerRecord);
        assert_eq!(by_id.len(), 2);
    }

    #[test]
    fn weekly_granularity_sums_per_iso_week() {
        // 2024-01-01 is a Monday.
        let records = vec![
            sale(1, "A", 2, date(1, 1), 10),
            sale(1, "A", 3, date(1, 7), 10),
            sale(1, "A", 4, date(1, 8), 10),
        ];
        let out = aggregate(&records, &[], JoinKey::ProductId, Granularity::Weekly);
        let a = &out[&SeriesKey::Id(pid(1))];
        assert_eq!(a.quantities, vec![5, 4]);
        assert_eq!(a.dates, vec![date(1, 1), date(1, 8)]);
        assert_eq!(a.record_count, 3);
    }
}

//! Input records supplied by the persistence layer.
//!
//! All of these are immutable snapshots. Money is carried as `f64` in the
//! display currency; quantities are whole units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::ProductId;

/// A single sales transaction line, joined with the product's stock levels at
/// the time it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub sale_date: NaiveDate,
    pub current_stock: i64,
    pub min_stock: i64,
}

impl SalesRecord {
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.unit_price.is_finite() && self.unit_price > 0.0) {
            return Err(DomainError::validation(format!(
                "sales record for {} has non-positive unit price {}",
                self.product_name, self.unit_price
            )));
        }
        Ok(())
    }
}

/// Current state of a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub current_stock: i64,
    pub min_stock: i64,
    pub cost_price: f64,
    pub selling_price: f64,
}

impl ProductSnapshot {
    pub fn validate(&self) -> DomainResult<()> {
        if self.current_stock < 0 || self.min_stock < 0 {
            return Err(DomainError::validation(format!(
                "product {} has negative stock levels",
                self.name
            )));
        }
        if !(self.cost_price.is_finite() && self.cost_price >= 0.0) {
            return Err(DomainError::validation(format!(
                "product {} has invalid cost price {}",
                self.name, self.cost_price
            )));
        }
        if !(self.selling_price.is_finite() && self.selling_price > 0.0) {
            return Err(DomainError::validation(format!(
                "product {} has non-positive selling price {}",
                self.name, self.selling_price
            )));
        }
        Ok(())
    }
}

/// One (price, quantity) observation in a product's sales history.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub price: f64,
    pub quantity: u32,
    pub date: NaiveDate,
}

/// A competitor's listed price for the same product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorPrice {
    pub name: String,
    pub price: f64,
}

impl CompetitorPrice {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

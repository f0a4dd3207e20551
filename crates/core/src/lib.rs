//! `stockwise-core`: shared input vocabulary.
//!
//! These are the already-materialized records handed to the analytics engine by the
//! persistence layer. This crate contains **no I/O** and no analytics.

pub mod error;
pub mod id;
pub mod record;

pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use record::{CompetitorPrice, PriceObservation, ProductSnapshot, SalesRecord};

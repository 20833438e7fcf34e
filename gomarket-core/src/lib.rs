// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GoMarketplace` Core
//!
//! Core types, cart transitions, and traits for the `GoMarketplace` cart.
//!
//! This crate provides the foundational abstractions used by the store and
//! the CLI:
//!
//! - Domain models (products, line items, the cart itself)
//! - Pure cart transitions (add, increment, decrement)
//! - Error types
//! - The key-value storage trait the cart persists through
//!
//! ## Key Types
//!
//! - [`Product`] - A cart line item with a quantity
//! - [`ProductInput`] - A catalog product about to be added (no quantity)
//! - [`Cart`] - Ordered, id-unique sequence of line items
//! - [`KeyValueStorage`] - Async get/set/remove storage backend

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{Cart, Product, ProductInput};

// Re-export traits
pub use traits::KeyValueStorage;

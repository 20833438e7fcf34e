//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use gomarket_core::{Cart, Product};
use serde::Serialize;

/// JSON output for a cart.
///
/// Line items keep the persisted field names; the envelope uses camelCase.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartOutput {
    pub products: Vec<Product>,
    pub item_count: usize,
    pub total_quantity: u64,
    pub total_price: f64,
    pub generated_at: DateTime<Utc>,
}

impl From<&Cart> for CartOutput {
    fn from(cart: &Cart) -> Self {
        Self {
            products: cart.products().to_vec(),
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            total_price: round_cents(cart.total_price()),
            generated_at: Utc::now(),
        }
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes any value with the configured layout.
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

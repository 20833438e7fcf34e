//! Product types.
//!
//! - [`Product`] - A line item as it lives in the cart and in storage
//! - [`ProductInput`] - A catalog product handed to `add_to_cart`

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Product
// ============================================================================

/// A cart line item.
///
/// Field names match the persisted JSON format exactly:
/// `{ "id", "title", "image_url", "price", "quantity" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Caller-supplied identifier, unique within a cart.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Number of units in the cart. Always at least 1.
    pub quantity: u32,
}

impl Product {
    /// Returns the price of this line (`price * quantity`).
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Checks the line item against the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingId` for an empty id and
    /// `CoreError::InvalidData` for a non-finite price or a zero quantity.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.is_empty() {
            return Err(CoreError::MissingId);
        }
        // JSON has no NaN or infinity; serde_json would write `null`.
        if !self.price.is_finite() {
            return Err(CoreError::InvalidData(format!(
                "product {} has non-finite price {}",
                self.id, self.price
            )));
        }
        if self.quantity == 0 {
            return Err(CoreError::InvalidData(format!(
                "product {} has quantity 0",
                self.id
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Product Input
// ============================================================================

/// A product descriptor without a quantity.
///
/// This is what the catalog hands to the cart; the cart decides the quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Caller-supplied identifier. Must be non-empty.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl ProductInput {
    /// Creates a new product input.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Converts this input into a line item with the given quantity.
    pub fn into_product(self, quantity: u32) -> Product {
        Product {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

impl From<Product> for ProductInput {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
        }
    }
}

//! The cart collection.
//!
//! A [`Cart`] is an ordered, id-unique sequence of [`Product`] line items.
//! It is never mutated in place: every transition returns a new cart, so a
//! holder of an older value never observes a half-applied change.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::product::{Product, ProductInput};
use crate::error::CoreError;

/// Ordered sequence of line items, unique by `id`.
///
/// Serializes as a bare JSON array of products, which is also the persisted
/// snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    products: Vec<Product>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from an existing list of line items.
    ///
    /// # Errors
    ///
    /// Returns an error if any item has an empty id, a non-finite price or a
    /// zero quantity, or if two items share an id.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id.as_str()) {
                return Err(CoreError::InvalidData(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }
        Ok(Self { products })
    }

    /// Parses a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if the payload is not a JSON array
    /// of products, or a validation error if it breaks a cart invariant.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// Encodes the cart as a persisted snapshot.
    ///
    /// Every line item was validated on the way in, so the output always
    /// decodes again through [`Cart::from_json`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if serde_json fails to encode.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.products)?)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Returns a cart with `item` added.
    ///
    /// An item whose id is already present has its quantity bumped in place;
    /// otherwise the item is appended with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingId` if the item id is empty and
    /// `CoreError::InvalidData` if its price is not finite.
    pub fn with_added(&self, item: ProductInput) -> Result<Self, CoreError> {
        let product = item.into_product(1);
        product.validate()?;
        if self.contains(&product.id) {
            return Ok(self.with_incremented(&product.id));
        }
        let mut products = self.products.clone();
        products.push(product);
        Ok(Self { products })
    }

    /// Returns a cart with the quantity of `id` raised by one.
    ///
    /// Unknown ids leave the cart unchanged.
    #[must_use]
    pub fn with_incremented(&self, id: &str) -> Self {
        self.map_matching(id, |quantity| Some(quantity.saturating_add(1)))
    }

    /// Returns a cart with the quantity of `id` lowered by one.
    ///
    /// Quantities never drop below 1 and entries are never removed, so a
    /// line at quantity 1 (or an unknown id) leaves the cart unchanged.
    #[must_use]
    pub fn with_decremented(&self, id: &str) -> Self {
        self.map_matching(id, |quantity| (quantity > 1).then(|| quantity - 1))
    }

    fn map_matching(&self, id: &str, f: impl Fn(u32) -> Option<u32>) -> Self {
        let products = self
            .products
            .iter()
            .map(|product| match f(product.quantity) {
                Some(quantity) if product.id == id => Product {
                    quantity,
                    ..product.clone()
                },
                _ => product.clone(),
            })
            .collect();
        Self { products }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Returns the line items in cart order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Iterates over the line items in cart order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Returns the line item with the given id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Returns true if a line item with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Total number of units across all line items.
    pub fn total_quantity(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.quantity)).sum()
    }

    /// Sum of `price * quantity` across all line items.
    pub fn total_price(&self) -> f64 {
        self.products.iter().map(Product::line_total).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> ProductInput {
        ProductInput::new("p1", "Shirt", "u", 10.0)
    }

    fn hat() -> ProductInput {
        ProductInput::new("p2", "Hat", "u2", 5.0)
    }

    fn cart_with(items: &[(ProductInput, u32)]) -> Cart {
        Cart::from_products(
            items
                .iter()
                .map(|(item, quantity)| item.clone().into_product(*quantity))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_add_to_empty_cart() {
        let cart = Cart::new().with_added(shirt()).unwrap();
        assert_eq!(cart.products(), &[shirt().into_product(1)]);
    }

    #[test]
    fn test_add_existing_increments_without_duplicate() {
        let cart = cart_with(&[(shirt(), 1)]).with_added(shirt()).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1").unwrap().quantity, 2);
    }

    #[test]
    fn test_add_appends_new_items_at_end() {
        let cart = Cart::new()
            .with_added(shirt())
            .unwrap()
            .with_added(hat())
            .unwrap();
        let ids: Vec<&str> = cart.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_add_rejects_empty_id() {
        let result = Cart::new().with_added(ProductInput::new("", "Nameless", "u", 1.0));
        assert!(matches!(result, Err(CoreError::MissingId)));
    }

    #[test]
    fn test_add_rejects_non_finite_price() {
        let cart = cart_with(&[(shirt(), 1)]);
        for price in [f64::NAN, f64::INFINITY] {
            let result = cart.with_added(ProductInput::new("p1", "Shirt", "u", price));
            assert!(matches!(result, Err(CoreError::InvalidData(_))));
            let result = cart.with_added(ProductInput::new("p9", "Gadget", "u", price));
            assert!(matches!(result, Err(CoreError::InvalidData(_))));
        }
    }

    #[test]
    fn test_added_items_survive_snapshot_roundtrip() {
        let cart = Cart::new()
            .with_added(ProductInput::new("p1", "Shirt", "u", 0.1))
            .unwrap()
            .with_added(ProductInput::new("p2", "Hat", "u2", 1e300))
            .unwrap();
        assert_eq!(Cart::from_json(&cart.to_json().unwrap()).unwrap(), cart);
    }

    #[test]
    fn test_increment_keeps_position() {
        let cart = cart_with(&[(shirt(), 1), (hat(), 1)]).with_incremented("p1");
        assert_eq!(cart.products()[0].id, "p1");
        assert_eq!(cart.products()[0].quantity, 2);
        assert_eq!(cart.products()[1].quantity, 1);
    }

    #[test]
    fn test_increment_unknown_id_is_noop() {
        let cart = cart_with(&[(shirt(), 2), (hat(), 1)]);
        assert_eq!(cart.with_incremented("nonexistent"), cart);
    }

    #[test]
    fn test_decrement_at_one_is_noop() {
        let cart = cart_with(&[(shirt(), 1)]);
        let next = cart.with_decremented("p1");
        assert_eq!(next, cart);
        assert_eq!(next.get("p1").unwrap().quantity, 1);
    }

    #[test]
    fn test_decrement_above_one() {
        let cart = cart_with(&[(shirt(), 3)]).with_decremented("p1");
        assert_eq!(cart.get("p1").unwrap().quantity, 2);
    }

    #[test]
    fn test_decrement_unknown_id_is_noop() {
        let cart = cart_with(&[(shirt(), 3), (hat(), 2)]);
        assert_eq!(cart.with_decremented("nonexistent"), cart);
    }

    #[test]
    fn test_decrement_never_drops_below_one() {
        let mut cart = cart_with(&[(shirt(), 4), (hat(), 1)]);
        for _ in 0..10 {
            cart = cart.with_decremented("p1").with_decremented("p2");
            assert!(cart.iter().all(|p| p.quantity >= 1));
        }
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get("p1").unwrap().quantity, 1);
    }

    #[test]
    fn test_repeated_adds_keep_ids_unique() {
        let mut cart = Cart::new();
        for item in [shirt(), hat(), shirt(), shirt(), hat()] {
            cart = cart.with_added(item).unwrap();
        }
        let ids: HashSet<&str> = cart.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), cart.len());
        assert_eq!(cart.get("p1").unwrap().quantity, 3);
        assert_eq!(cart.get("p2").unwrap().quantity, 2);
    }

    #[test]
    fn test_transitions_leave_original_untouched() {
        let cart = cart_with(&[(shirt(), 2)]);
        let _ = cart.with_incremented("p1");
        let _ = cart.with_decremented("p1");
        assert_eq!(cart.get("p1").unwrap().quantity, 2);
    }

    #[test]
    fn test_totals() {
        let cart = cart_with(&[(shirt(), 2), (hat(), 3)]);
        assert_eq!(cart.total_quantity(), 5);
        assert!((cart.total_price() - 35.0).abs() < f64::EPSILON);
        assert_eq!(Cart::new().total_quantity(), 0);
    }

    #[test]
    fn test_from_products_rejects_duplicates() {
        let result = Cart::from_products(vec![shirt().into_product(1), shirt().into_product(2)]);
        assert!(matches!(result, Err(CoreError::InvalidData(_))));
    }

    #[test]
    fn test_from_products_rejects_non_finite_price() {
        let result = Cart::from_products(vec![
            ProductInput::new("p1", "Shirt", "u", f64::NEG_INFINITY).into_product(1),
        ]);
        assert!(matches!(result, Err(CoreError::InvalidData(_))));
    }

    #[test]
    fn test_from_products_rejects_zero_quantity() {
        let result = Cart::from_products(vec![hat().into_product(0)]);
        assert!(result.is_err());
    }
}

//! Domain models for the cart.
//!
//! ## Submodules
//!
//! - [`product`] - Line items and catalog input
//! - [`cart`] - The ordered cart collection and its transitions

mod cart;
mod product;

pub use cart::Cart;
pub use product::{Product, ProductInput};

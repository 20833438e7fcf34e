//! Integration tests for cart transitions through the public API.

use gomarket_core::{Cart, ProductInput};

fn shirt() -> ProductInput {
    ProductInput::new("p1", "Shirt", "u", 10.0)
}

#[test]
fn test_add_then_adjust_quantities() {
    let cart = Cart::new().with_added(shirt()).unwrap();
    assert_eq!(cart.get("p1").unwrap().quantity, 1);

    let cart = cart.with_incremented("p1").with_incremented("p1");
    assert_eq!(cart.get("p1").unwrap().quantity, 3);

    let cart = cart.with_decremented("p1");
    assert_eq!(cart.get("p1").unwrap().quantity, 2);
}

#[test]
fn test_snapshot_survives_persistence_format() {
    let cart = Cart::new()
        .with_added(shirt())
        .unwrap()
        .with_added(ProductInput::new("p2", "Hat", "u2", 5.0))
        .unwrap()
        .with_incremented("p2");

    let restored = Cart::from_json(&cart.to_json().unwrap()).unwrap();
    assert_eq!(restored, cart);
    assert_eq!(restored.total_quantity(), 3);
}

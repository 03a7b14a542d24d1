//! Test fixtures and helpers.

use marketcart_core::{encode, Cart, Product, ProductId};

/// A product with predictable metadata derived from its id.
pub fn product(id: &str, price: f64) -> Product {
    Product::new(
        id,
        format!("Product {id}"),
        format!("https://cdn.example.com/{id}.png"),
        price,
    )
}

/// A small fixed catalog.
pub fn catalog() -> Vec<Product> {
    vec![
        Product::new("1", "Camiseta Hello World", "https://cdn.example.com/1.png", 120.0),
        Product::new("2", "Camiseta Ruby on Rails", "https://cdn.example.com/2.png", 85.5),
        Product::new("3", "Caneca Preta Rocketseat", "https://cdn.example.com/3.png", 39.9),
        Product::new("4", "Caneca de Cerâmica", "https://cdn.example.com/4.png", 25.0),
    ]
}

/// JSON snapshot of a cart built from explicit line items.
pub fn snapshot_of(items: &[(&str, f64, i64)]) -> String {
    let mut cart = Cart::new();
    for &(id, price, quantity) in items {
        cart.add(product(id, price));
        let id = ProductId::from(id);
        for _ in 1..quantity {
            cart.increment(&id);
        }
        for _ in quantity..1 {
            cart.decrement(&id);
        }
    }
    encode(&cart).expect("cart encodes")
}

/// Install a fmt subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_target(false)
        .try_init();
}

//! Sample catalog used to seed an empty store.

use wholesale_core::{Price, Product, ProductId, ProductImage};

/// `(id, name, category, price, stock, unsplash photo, description)`
const SAMPLES: [(&str, &str, &str, i64, u32, &str, &str); 12] = [
    ("1", "Rice (25kg)", "Grains", 3500, 100, "photo-1586201375761-83865001e31c", "Premium quality rice"),
    ("2", "Wheat Flour (10kg)", "Grains", 800, 150, "photo-1574323347407-f5e1ad6d020b", "Fresh wheat flour"),
    ("3", "Sugar (50kg)", "Groceries", 4500, 80, "photo-1587108280210-13ec0cfc5ac8", "White refined sugar"),
    ("4", "Cooking Oil (5L)", "Oils", 1200, 200, "photo-1474979266404-7eaacbcd87c5", "Pure cooking oil"),
    ("5", "Milk Powder (1kg)", "Dairy", 950, 120, "photo-1563636619-e9143da7973b", "Instant milk powder"),
    ("6", "Tea (500g)", "Beverages", 450, 180, "photo-1564890369478-c89ca6d9cde9", "Premium tea leaves"),
    ("7", "Lentils (5kg)", "Grains", 650, 90, "photo-1604908176997-125f25cc6f3d", "Mixed lentils"),
    ("8", "Spices Mix (500g)", "Spices", 380, 140, "photo-1596040033229-a0b03c7d1cd0", "Assorted spices"),
    ("9", "Salt (1kg)", "Groceries", 60, 300, "photo-1493225457124-a3eb161ffa5f", "Iodized salt"),
    ("10", "Ghee (1kg)", "Dairy", 1500, 70, "photo-1628088062854-d1870b4553da", "Pure cow ghee"),
    ("11", "Biscuits (Pack)", "Snacks", 280, 250, "photo-1558961363-fa8fdf82db35", "Assorted biscuits"),
    ("12", "Pasta (1kg)", "Grains", 320, 160, "photo-1621996346565-e3dbc646d9a9", "Italian pasta"),
];

/// The twelve sample products, ids `"1"` to `"12"`.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    SAMPLES
        .iter()
        .map(|&(id, name, category, price, stock, photo, description)| Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            category: category.to_owned(),
            description: description.to_owned(),
            price: Price::from_rupees(price),
            cost_price: Price::ZERO,
            stock,
            image: ProductImage::url(format!("https://images.unsplash.com/{photo}?w=400")),
        })
        .collect()
}

//! Sales dashboard metrics.
//!
//! Revenue, profit and top products count only sales (confirmed or
//! delivered orders) and read prices from the orders' own item snapshots.

use wholesale_core::{CartLine, Order, Price, ProductId};

const RECENT_ORDERS: usize = 5;
const TOP_PRODUCTS: usize = 5;

/// A best-selling product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct {
    pub product_id: ProductId,
    /// Name from the first order line seen for this product.
    pub name: String,
    pub quantity: u32,
    pub revenue: Price,
}

/// Figures shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardMetrics {
    /// Sum of sale totals.
    pub revenue: Price,
    /// Revenue minus cost of goods sold.
    pub profit: Price,
    /// Number of sales.
    pub order_count: usize,
    /// Latest orders of any status.
    pub recent_orders: Vec<Order>,
    /// Products by units sold, highest first.
    pub top_products: Vec<TopProduct>,
}

impl DashboardMetrics {
    /// Compute metrics over `orders`, given newest first.
    #[must_use]
    pub fn compute(orders: &[Order]) -> Self {
        let sales: Vec<&Order> = orders.iter().filter(|o| o.status.is_sale()).collect();

        let revenue: Price = sales.iter().map(|o| o.total_amount).sum();
        let cost_of_goods: Price = sales
            .iter()
            .flat_map(|o| o.items.iter())
            .map(CartLine::cost)
            .sum();

        // First-seen order is kept so ties rank stably.
        let mut top: Vec<TopProduct> = Vec::new();
        for line in sales.iter().flat_map(|o| o.items.iter()) {
            match top.iter_mut().find(|t| &t.product_id == line.product_id()) {
                Some(entry) => {
                    entry.quantity += line.quantity;
                    entry.revenue = entry.revenue + line.subtotal();
                }
                None => top.push(TopProduct {
                    product_id: line.product_id().clone(),
                    name: line.product.name.clone(),
                    quantity: line.quantity,
                    revenue: line.subtotal(),
                }),
            }
        }
        top.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        top.truncate(TOP_PRODUCTS);

        Self {
            revenue,
            profit: revenue.minus(cost_of_goods),
            order_count: sales.len(),
            recent_orders: orders.iter().take(RECENT_ORDERS).cloned().collect(),
            top_products: top,
        }
    }
}

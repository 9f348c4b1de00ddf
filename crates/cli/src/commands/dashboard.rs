//! Dashboard command (admin).

use super::{CliError, open_admin};

#[allow(clippy::print_stdout)]
pub async fn run() -> Result<(), CliError> {
    let admin = open_admin().await?;
    let metrics = admin.dashboard().await?;

    println!("Revenue:  {}", metrics.revenue.grouped());
    println!("Profit:   {}", metrics.profit.grouped());
    println!("Sales:    {}", metrics.order_count);

    println!("\nTop products:");
    for (rank, product) in metrics.top_products.iter().enumerate() {
        println!(
            "  {}. {} - {} units, {}",
            rank + 1,
            product.name,
            product.quantity,
            product.revenue.grouped()
        );
    }

    println!("\nRecent orders:");
    for order in &metrics.recent_orders {
        println!(
            "  {} {} {} {}",
            order.id,
            order.customer_name,
            order.total_amount,
            order.status.label()
        );
    }
    Ok(())
}

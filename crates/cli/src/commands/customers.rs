//! Customer commands (admin).
//!
//! # Usage
//!
//! ```bash
//! wholesale customers list
//! wholesale customers show <id>
//! ```

use clap::Subcommand;

use wholesale_core::{Customer, CustomerId};

use super::{CliError, open_admin};

#[derive(Subcommand)]
pub enum CustomerAction {
    /// List customers
    List,
    /// Select a customer for a new order and show their record
    Show { id: String },
}

#[allow(clippy::print_stdout)]
pub async fn run(action: CustomerAction) -> Result<(), CliError> {
    let admin = open_admin().await?;

    match action {
        CustomerAction::List => {
            let customers = admin.customers().await?;
            print_customers(&customers);
        }
        CustomerAction::Show { id } => {
            let customer = admin.start_order_for(&CustomerId::new(id)).await?;
            print_customers(std::slice::from_ref(&customer));
            println!("Address: {}", customer.address);
            for order_id in &customer.orders {
                println!("  {order_id}");
            }
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_customers(customers: &[Customer]) {
    println!(
        "{:<38} {:<18} {:<16} {:>6} {:>12} {}",
        "ID", "NAME", "PHONE", "ORDERS", "SPENT", "LAST ORDER"
    );
    for c in customers {
        println!(
            "{:<38} {:<18} {:<16} {:>6} {:>12} {}",
            c.id,
            c.name,
            c.phone,
            c.total_orders,
            c.total_spent.to_string(),
            c.last_order_date.format("%Y-%m-%d")
        );
    }
}

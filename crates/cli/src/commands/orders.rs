//! Order commands (admin).
//!
//! # Usage
//!
//! ```bash
//! wholesale orders list --status pending
//! wholesale orders show ORD-...
//! wholesale orders whatsapp ORD-...
//! wholesale orders status ORD-... confirmed
//! wholesale orders invoice ORD-...
//! wholesale orders delete ORD-... --yes
//! wholesale outbox status
//! wholesale outbox replay
//! ```
//!
//! Status changes and deletes ask for confirmation unless `--yes` is given.

use clap::Subcommand;

use wholesale_core::{Order, OrderId, OrderStatus};

use super::{CliError, confirm, open_admin};

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders, newest first
    List {
        /// pending, whatsapp_sent, confirmed or delivered
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Show one order with its WhatsApp message
    Show { id: String },
    /// Change an order's status
    Status {
        id: String,
        status: OrderStatus,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the WhatsApp link and mark the order as sent
    Whatsapp { id: String },
    /// Write the order's invoice
    Invoice { id: String },
    /// Delete an order
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum OutboxAction {
    /// List orders whose customer update is pending
    Status,
    /// Retry pending customer updates
    Replay,
}

#[allow(clippy::print_stdout)]
pub async fn run(action: OrderAction) -> Result<(), CliError> {
    let admin = open_admin().await?;

    match action {
        OrderAction::List { status } => {
            let orders = admin.orders(status).await?;
            print_orders(&orders);
        }
        OrderAction::Show { id } => {
            let order = admin.order(&OrderId::new(id)).await?;
            print_orders(std::slice::from_ref(&order));
            println!();
            println!("{}", admin.storefront().orders().whatsapp_message(&order));
        }
        OrderAction::Status { id, status, yes } => {
            confirm(&format!("Mark order {id} as {}?", status.label()), yes)?;
            let change = admin.set_order_status(&OrderId::new(id), status).await?;
            println!(
                "Order {}: {} -> {}",
                change.order.id,
                change.previous.label(),
                change.order.status.label()
            );
            for adjustment in &change.adjustments {
                println!(
                    "  stock {}: {} -> {}{}",
                    adjustment.product_id,
                    adjustment.previous,
                    adjustment.current,
                    if adjustment.is_short() {
                        format!(" (short by {})", adjustment.shortfall)
                    } else {
                        String::new()
                    }
                );
            }
            for failure in &change.failures {
                println!(
                    "  stock {} not adjusted: {}",
                    failure.product_id,
                    failure.error.user_message()
                );
            }
        }
        OrderAction::Whatsapp { id } => {
            let link = admin.send_whatsapp(&OrderId::new(id)).await?;
            println!("{link}");
        }
        OrderAction::Invoice { id } => {
            let order = admin.invoice(&OrderId::new(id)).await?;
            println!(
                "Invoice for {} written to {}",
                order.id,
                admin.config().invoice_dir.display()
            );
        }
        OrderAction::Delete { id, yes } => {
            confirm(&format!("Delete order {id}?"), yes)?;
            let order = admin.delete_order(&OrderId::new(id)).await?;
            println!("Deleted order {}", order.id);
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn outbox(action: OutboxAction) -> Result<(), CliError> {
    let admin = open_admin().await?;

    match action {
        OutboxAction::Status => {
            let pending = admin.pending_customer_updates().await?;
            println!("{} pending customer updates", pending.len());
            for id in pending {
                println!("  {id}");
            }
        }
        OutboxAction::Replay => {
            let synced = admin.replay_customer_outbox().await?;
            println!("Synced {synced} customer updates");
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_orders(orders: &[Order]) {
    println!(
        "{:<38} {:<18} {:<14} {:>6} {:>12} {:<14} {}",
        "ID", "CUSTOMER", "PHONE", "ITEMS", "TOTAL", "STATUS", "DATE"
    );
    for o in orders {
        println!(
            "{:<38} {:<18} {:<14} {:>6} {:>12} {:<14} {}",
            o.id,
            o.customer_name,
            o.customer_phone,
            o.item_count(),
            o.total_amount.to_string(),
            o.status.label(),
            o.order_date.format("%Y-%m-%d %H:%M")
        );
    }
}

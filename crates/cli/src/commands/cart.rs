//! Cart and checkout commands.
//!
//! # Usage
//!
//! ```bash
//! wholesale cart add 1 --quantity 2
//! wholesale cart set 1 5
//! wholesale cart show
//! wholesale cart remove 1
//! wholesale cart clear
//! wholesale checkout --name "Ali" --phone 03001234567 --address "Test St"
//! ```

use clap::{Args, Subcommand};

use wholesale_core::{CartLine, ProductId};
use wholesale_storefront::StoreError;
use wholesale_storefront::services::CheckoutForm;

use super::{CliError, open_storefront};

#[derive(Subcommand)]
pub enum CartAction {
    /// Add a product to the cart
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line
    Set { product_id: String, quantity: u32 },
    /// Remove a product from the cart
    Remove { product_id: String },
    /// Empty the cart
    Clear,
    /// Show the cart
    Show,
}

#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(short, long)]
    name: String,

    #[arg(short, long)]
    phone: String,

    #[arg(short, long)]
    address: String,
}

pub async fn run(action: CartAction) -> Result<(), CliError> {
    let storefront = open_storefront().await?;
    let cart = storefront.cart();

    match action {
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let id = ProductId::new(product_id);
            let product = storefront
                .catalog()
                .get(&id)
                .await
                .ok_or_else(|| StoreError::not_found("Product", &id))?;
            cart.add(&product, quantity).await?;
        }
        CartAction::Set {
            product_id,
            quantity,
        } => {
            cart.set_quantity(&ProductId::new(product_id), quantity)
                .await?;
        }
        CartAction::Remove { product_id } => {
            if !cart.remove(&ProductId::new(product_id.clone())).await? {
                return Err(StoreError::not_found("Cart item", product_id).into());
            }
        }
        CartAction::Clear => cart.clear().await?,
        CartAction::Show => {}
    }

    print_cart(&cart.lines().await);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn checkout(args: CheckoutArgs) -> Result<(), CliError> {
    let storefront = open_storefront().await?;
    let form = CheckoutForm {
        name: args.name,
        phone: args.phone,
        address: args.address,
    };

    let order = storefront.checkout().place_order(&form).await?;

    println!("Order {} placed, total {}", order.id, order.total_amount);
    println!("We will confirm your order on WhatsApp.");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(lines: &[CartLine]) {
    if lines.is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in lines {
        println!(
            "{:<8} {:<22} {:>4} x {:>10} = {:>10}",
            line.product_id(),
            line.product.name,
            line.quantity,
            line.product.price.to_string(),
            line.subtotal().to_string()
        );
    }
    let count: u32 = lines.iter().map(|l| l.quantity).sum();
    let total: wholesale_core::Price = lines.iter().map(CartLine::subtotal).sum();
    println!("{count} items, total {total}");
}

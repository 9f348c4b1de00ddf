//! Product commands.
//!
//! # Usage
//!
//! ```bash
//! wholesale products list --search tea --category Beverages
//! wholesale products categories
//! wholesale products add --name "Rice (25kg)" --category Grains --price 3500 --stock 100
//! wholesale products update 1 --price 3600 --stock 90
//! wholesale products delete 1 --yes
//! ```
//!
//! Adding, updating and deleting require an admin session. Deleting asks
//! for confirmation unless `--yes` is given.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use wholesale_core::{Price, Product, ProductDraft, ProductId, ProductImage};
use wholesale_storefront::{Storefront, StorefrontConfig};

use super::{CliError, confirm, open_admin, open_storefront, parse_price};

#[derive(Subcommand)]
pub enum ProductAction {
    /// List products
    List {
        /// Case-insensitive search over name, category and description
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories
    Categories,
    /// Add a product (admin)
    Add(ProductArgs),
    /// Update a product (admin)
    Update {
        id: String,

        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Delete a product (admin)
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct ProductArgs {
    /// Product ID (generated when omitted)
    #[arg(long)]
    id: Option<String>,

    #[arg(short, long)]
    name: String,

    #[arg(short, long)]
    category: String,

    #[arg(short, long, default_value = "")]
    description: String,

    /// Selling price in rupees
    #[arg(short, long, value_parser = parse_price)]
    price: Price,

    /// Purchase cost in rupees
    #[arg(long, value_parser = parse_price, default_value = "0")]
    cost_price: Price,

    #[arg(short, long)]
    stock: u32,

    #[command(flatten)]
    image: ImageArgs,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(short, long)]
    name: Option<String>,

    #[arg(short, long)]
    category: Option<String>,

    #[arg(short, long)]
    description: Option<String>,

    #[arg(short, long, value_parser = parse_price)]
    price: Option<Price>,

    #[arg(long, value_parser = parse_price)]
    cost_price: Option<Price>,

    #[arg(short, long)]
    stock: Option<u32>,

    #[command(flatten)]
    image: ImageArgs,
}

#[derive(Args)]
#[group(multiple = false)]
pub struct ImageArgs {
    /// Remote image URL
    #[arg(long)]
    image_url: Option<String>,

    /// Local image file, stored inline
    #[arg(long)]
    image_file: Option<PathBuf>,
}

/// Seed the sample catalog into an empty store.
#[allow(clippy::print_stdout)]
pub async fn seed() -> Result<(), CliError> {
    let mut config = StorefrontConfig::from_env()?;
    config.seed_catalog = true;
    let storefront = Storefront::open(config).await?;
    let count = storefront.catalog().list().await.len();

    println!("Catalog has {count} products");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn run(action: ProductAction) -> Result<(), CliError> {
    match action {
        ProductAction::List { search, category } => {
            let storefront = open_storefront().await?;
            let products = storefront
                .catalog()
                .search(&search, category.as_deref())
                .await;
            print_products(&products);
        }
        ProductAction::Categories => {
            let storefront = open_storefront().await?;
            let categories = storefront.catalog().categories().await;
            for category in categories {
                println!("{category}");
            }
        }
        ProductAction::Add(args) => {
            let admin = open_admin().await?;
            let image = read_image(&admin, &args.image)?.unwrap_or_default();
            let product = admin
                .add_product(ProductDraft {
                    id: args.id.map(ProductId::new),
                    name: args.name,
                    category: args.category,
                    description: args.description,
                    price: args.price,
                    cost_price: args.cost_price,
                    stock: args.stock,
                    image,
                })
                .await?;
            print_products(&[product]);
        }
        ProductAction::Update { id, fields } => {
            let admin = open_admin().await?;
            let id = ProductId::new(id);
            let mut product = admin
                .storefront()
                .catalog()
                .get(&id)
                .await
                .ok_or_else(|| wholesale_storefront::StoreError::not_found("Product", &id))?;

            if let Some(image) = read_image(&admin, &fields.image)? {
                product.image = image;
            }
            apply_update(&mut product, fields);

            let product = admin.update_product(product).await?;
            print_products(&[product]);
        }
        ProductAction::Delete { id, yes } => {
            let admin = open_admin().await?;
            confirm(&format!("Delete product {id}?"), yes)?;
            let removed = admin.delete_product(&ProductId::new(id)).await?;
            println!("Deleted {} ({})", removed.name, removed.id);
        }
    }
    Ok(())
}

fn apply_update(product: &mut Product, fields: UpdateArgs) {
    if let Some(name) = fields.name {
        product.name = name;
    }
    if let Some(category) = fields.category {
        product.category = category;
    }
    if let Some(description) = fields.description {
        product.description = description;
    }
    if let Some(price) = fields.price {
        product.price = price;
    }
    if let Some(cost_price) = fields.cost_price {
        product.cost_price = cost_price;
    }
    if let Some(stock) = fields.stock {
        product.stock = stock;
    }
}

fn read_image(
    admin: &wholesale_admin::AdminState,
    args: &ImageArgs,
) -> Result<Option<ProductImage>, CliError> {
    if let Some(url) = &args.image_url {
        return Ok(Some(ProductImage::url(url.clone())));
    }
    let Some(path) = &args.image_file else {
        return Ok(None);
    };

    let bytes = std::fs::read(path)
        .map_err(|e| CliError::InvalidArgument(format!("{}: {e}", path.display())))?;
    Ok(Some(admin.upload_image(content_type(path), &bytes)?))
}

fn content_type(path: &std::path::Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[allow(clippy::print_stdout)]
fn print_products(products: &[Product]) {
    println!(
        "{:<34} {:<22} {:<12} {:>10} {:>7}",
        "ID", "NAME", "CATEGORY", "PRICE", "STOCK"
    );
    for p in products {
        println!(
            "{:<34} {:<22} {:<12} {:>10} {:>7}",
            p.id,
            p.name,
            p.category,
            p.price.to_string(),
            p.stock
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type(Path::new("rice.PNG")), "image/png");
        assert_eq!(content_type(Path::new("tea.jpeg")), "image/jpeg");
        assert_eq!(content_type(Path::new("notes.txt")), "application/octet-stream");
    }

    #[test]
    fn test_apply_update_only_touches_given_fields() {
        let mut product = ProductDraft {
            name: "Salt (1kg)".to_owned(),
            category: "Groceries".to_owned(),
            price: Price::from_rupees(60),
            stock: 300,
            ..ProductDraft::default()
        }
        .into_product(ProductId::new("9"));

        apply_update(
            &mut product,
            UpdateArgs {
                name: None,
                category: None,
                description: None,
                price: Some(Price::from_rupees(65)),
                cost_price: None,
                stock: Some(250),
                image: ImageArgs {
                    image_url: None,
                    image_file: None,
                },
            },
        );

        assert_eq!(product.name, "Salt (1kg)");
        assert_eq!(product.price, Price::from_rupees(65));
        assert_eq!(product.stock, 250);
    }
}

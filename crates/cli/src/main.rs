//! Wholesale CLI - storefront and admin operations from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create the PostgreSQL schema (postgres backend only)
//! wholesale migrate
//!
//! # Browse and shop
//! wholesale products list --search rice
//! wholesale cart add 1 --quantity 2
//! wholesale checkout --name "Ali" --phone 03001234567 --address "Test St"
//!
//! # Admin
//! wholesale login --username admin --password admin123
//! wholesale orders whatsapp ORD-...
//! wholesale orders status ORD-... confirmed
//! wholesale dashboard
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the sample catalog
//! - `products` - Browse and manage products
//! - `cart` - Manage the cart
//! - `checkout` - Place an order from the cart
//! - `orders` - Manage orders
//! - `customers` - List customers
//! - `dashboard` - Sales metrics
//! - `login` / `logout` - Admin session
//! - `outbox` - Deferred customer updates

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "wholesale")]
#[command(author, version, about = "Wholesale storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (postgres backend)
    Migrate,
    /// Seed the sample catalog into an empty store
    Seed,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: commands::catalog::ProductAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Place an order for everything in the cart
    Checkout(commands::cart::CheckoutArgs),
    /// Manage orders (admin)
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrderAction,
    },
    /// Customers (admin)
    Customers {
        #[command(subcommand)]
        action: commands::customers::CustomerAction,
    },
    /// Sales dashboard (admin)
    Dashboard,
    /// Start an admin session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// End the admin session
    Logout,
    /// Deferred customer updates (admin)
    Outbox {
        #[command(subcommand)]
        action: commands::orders::OutboxAction,
    },
}

/// Initialize Sentry error tracking when `SENTRY_DSN` is set.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    if guard.is_enabled() {
        Some(guard)
    } else {
        None
    }
}

/// Route tracing events to Sentry: errors and warnings as events,
/// info and debug as breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let _ = dotenvy::dotenv();

    // Sentry must be initialised before the tracing subscriber
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "wholesale=info,wholesale_storefront=info,wholesale_admin=info".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::catalog::seed().await?,
        Commands::Products { action } => commands::catalog::run(action).await?,
        Commands::Cart { action } => commands::cart::run(action).await?,
        Commands::Checkout(args) => commands::cart::checkout(args).await?,
        Commands::Orders { action } => commands::orders::run(action).await?,
        Commands::Customers { action } => commands::customers::run(action).await?,
        Commands::Dashboard => commands::dashboard::run().await?,
        Commands::Login { username, password } => {
            commands::session::login(&username, &password).await?;
        }
        Commands::Logout => commands::session::logout().await?,
        Commands::Outbox { action } => commands::orders::outbox(action).await?,
    }
    Ok(())
}

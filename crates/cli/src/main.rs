//! Shopfront CLI - drive the shopping cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product from the catalog file
//! sf-cart add sku1 --quantity 2 --catalog catalog.yaml
//!
//! # Adjust and remove
//! sf-cart set sku1 1
//! sf-cart remove sku1
//!
//! # Show the cart (optionally as JSON)
//! sf-cart show --json
//!
//! # Empty the cart
//! sf-cart clear
//! ```
//!
//! # Commands
//!
//! - `add` - Add a catalog product
//! - `remove` - Remove a product's line
//! - `set` - Set a product's quantity
//! - `clear` - Empty the cart
//! - `show` - Print the cart
//!
//! Configuration comes from the environment (see `shopfront_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfront_cart::{Cart, CartConfig, totals};
use shopfront_core::ProductId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;
use commands::catalog::Catalog;

#[derive(Parser)]
#[command(name = "sf-cart")]
#[command(author, version, about = "Shopfront cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product from the catalog
    Add {
        /// Catalog product ID
        product_id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Catalog YAML file
        #[arg(short, long, default_value = "catalog.yaml")]
        catalog: PathBuf,
    },
    /// Remove a product's line
    Remove {
        /// Product ID to remove
        product_id: String,
    },
    /// Set a product's quantity (0 removes it)
    Set {
        /// Product ID to update
        product_id: String,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = CartConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_cart=info,sf_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli, &config) {
        tracing::error!("Command failed: {e}");
        // process::exit skips destructors, so flush Sentry first
        drop(sentry_guard);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &CartConfig) -> Result<(), CliError> {
    let storage = config.open_storage()?;
    let mut cart = Cart::hydrate(storage, config.currency);

    // Stand-in for the header badge: log every new snapshot.
    let badge = cart.subscribe(|state| {
        tracing::debug!(
            items = totals::item_count(state),
            total = %totals::grand_total_price(state),
            "Cart badge"
        );
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Add {
            product_id,
            quantity,
            catalog,
        } => {
            let catalog = Catalog::load(&catalog, config.currency)?;
            commands::cart::add(
                &mut cart,
                &catalog,
                &ProductId::new(product_id),
                quantity,
                &mut out,
            )?;
        }
        Commands::Remove { product_id } => {
            commands::cart::remove(&mut cart, &ProductId::new(product_id), &mut out)?;
        }
        Commands::Set {
            product_id,
            quantity,
        } => {
            commands::cart::set(&mut cart, &ProductId::new(product_id), quantity, &mut out)?;
        }
        Commands::Clear => commands::cart::clear(&mut cart, &mut out)?,
        Commands::Show { json } => commands::cart::show(&cart, json, &mut out)?,
    }

    cart.unsubscribe(badge);
    Ok(())
}

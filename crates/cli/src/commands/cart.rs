//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Add two widgets from the catalog
//! sf-cart add sku1 -q 2 -c catalog.yaml
//!
//! # Change or drop a line
//! sf-cart set sku1 5
//! sf-cart remove sku1
//!
//! # Inspect
//! sf-cart show
//! sf-cart show --json
//!
//! # Start over
//! sf-cart clear
//! ```
//!
//! Every invocation is one session: hydrate from storage, apply the command,
//! print the resulting cart.

use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_cart::{Cart, CartState, Outcome, totals};
use shopfront_core::{CurrencyCode, ProductId};
use tracing::{info, instrument};

use super::CliError;
use super::catalog::Catalog;

/// Add `quantity` units of a catalog product.
///
/// # Errors
///
/// Returns an error if the product is unknown, the cart rejects it, or the
/// new cart could not be saved.
#[instrument(skip(cart, catalog, out))]
pub fn add(
    cart: &mut Cart,
    catalog: &Catalog,
    product_id: &ProductId,
    quantity: u32,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let item = catalog
        .find(product_id)
        .ok_or_else(|| CliError::UnknownProduct(product_id.to_string()))?;

    finish(cart.add_item(item, quantity)?)?;
    info!(%product_id, quantity, "Added to cart");
    render(cart.state(), out)
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the new cart could not be saved or printed.
#[instrument(skip(cart, out))]
pub fn remove(cart: &mut Cart, product_id: &ProductId, out: &mut impl Write) -> Result<(), CliError> {
    let outcome = cart.remove_item(product_id);
    if !outcome.is_changed() {
        info!(%product_id, "Product not in cart, nothing to remove");
    }
    finish(outcome)?;
    render(cart.state(), out)
}

/// Replace a product's quantity (`0` removes it).
///
/// # Errors
///
/// Returns an error if the new cart could not be saved or printed.
#[instrument(skip(cart, out))]
pub fn set(
    cart: &mut Cart,
    product_id: &ProductId,
    quantity: u32,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let outcome = cart.set_quantity(product_id, quantity);
    if !outcome.is_changed() {
        info!(%product_id, quantity, "Cart unchanged");
    }
    finish(outcome)?;
    render(cart.state(), out)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the empty cart could not be saved or printed.
#[instrument(skip(cart, out))]
pub fn clear(cart: &mut Cart, out: &mut impl Write) -> Result<(), CliError> {
    finish(cart.clear())?;
    render(cart.state(), out)
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn show(cart: &Cart, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    if json {
        render_json(cart.state(), out)
    } else {
        render(cart.state(), out)
    }
}

/// A one-shot process cannot keep an unsaved cart, so surface the failure.
fn finish(outcome: Outcome) -> Result<(), CliError> {
    match outcome {
        Outcome::Unsaved(e) => Err(e.into()),
        Outcome::Applied | Outcome::Unchanged => Ok(()),
    }
}

/// Drawer-style listing with totals.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render(state: &CartState, out: &mut impl Write) -> Result<(), CliError> {
    if state.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    writeln!(
        out,
        "Cart: {} item(s) in {} line(s)",
        totals::item_count(state),
        state.len()
    )?;
    for line in state {
        writeln!(
            out,
            "  {:<12} {:<24} {:>4} x {:>10} = {:>10}",
            line.product_id.as_str(),
            line.name,
            line.quantity,
            format_money(line.unit_price, state.currency()),
            totals::line_total_price(state, line).display(),
        )?;
    }
    writeln!(out, "Total: {}", totals::grand_total_price(state).display())?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct CartSummary<'a> {
    currency: CurrencyCode,
    item_count: u64,
    grand_total: Decimal,
    lines: Vec<LineSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct LineSummary<'a> {
    product_id: &'a ProductId,
    name: &'a str,
    image: Option<&'a str>,
    unit_price: Decimal,
    quantity: u32,
    line_total: Decimal,
}

/// Machine-readable cart summary.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn render_json(state: &CartState, out: &mut impl Write) -> Result<(), CliError> {
    let summary = CartSummary {
        currency: state.currency(),
        item_count: totals::item_count(state),
        grand_total: totals::grand_total(state),
        lines: state
            .iter()
            .map(|line| LineSummary {
                product_id: &line.product_id,
                name: &line.name,
                image: line.image.as_deref(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                line_total: totals::line_total(line),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &summary)?;
    writeln!(out)?;
    Ok(())
}

fn format_money(amount: Decimal, currency: CurrencyCode) -> String {
    shopfront_core::Price::new(amount, currency).display()
}

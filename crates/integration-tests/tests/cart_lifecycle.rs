//! Integration tests for cart sessions over durable file storage.
//!
//! Each `file_session` call stands for a new page load or process start
//! reading the same storage slot.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use shopfront_cart::{Cart, CartStorage, Outcome, totals};
use shopfront_core::CurrencyCode;
use shopfront_integration_tests::{file_session, product, snapshot_path, widget};

// =============================================================================
// End-to-end scenario
// =============================================================================

#[test]
fn test_widget_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = file_session(dir.path());
    assert!(cart.is_empty());

    let _ = cart.add_item(&widget(), 1).unwrap();
    assert_eq!(cart.state().len(), 1);
    assert_eq!(cart.grand_total(), Decimal::new(10, 0));

    let _ = cart.add_item(&widget(), 2).unwrap();
    assert_eq!(cart.line(&"sku1".into()).unwrap().quantity, 3);
    assert_eq!(cart.grand_total(), Decimal::new(30, 0));

    let _ = cart.set_quantity(&"sku1".into(), 1);
    assert_eq!(cart.grand_total(), Decimal::new(10, 0));

    let _ = cart.remove_item(&"sku1".into());
    assert!(cart.is_empty());
    assert_eq!(cart.grand_total(), Decimal::ZERO);
    assert_eq!(cart.item_count(), 0);
}

// =============================================================================
// Restart / hydration
// =============================================================================

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let expected = {
        let mut cart = file_session(dir.path());
        let _ = cart.add_item(&product("sku2", "Gadget", 25), 2).unwrap();
        let _ = cart.add_item(&widget(), 1).unwrap();
        let _ = cart.add_item(&product("sku3", "Sprocket", 3), 4).unwrap();
        cart.snapshot()
    };

    let reloaded = file_session(dir.path());
    assert_eq!(reloaded.state(), &*expected);

    let order: Vec<_> = reloaded
        .state()
        .iter()
        .map(|l| l.product_id.as_str())
        .collect();
    assert_eq!(order, ["sku2", "sku1", "sku3"]);
    assert_eq!(totals::grand_total_price(reloaded.state()).display(), "$72.00");
}

#[test]
fn test_captured_price_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut cart = file_session(dir.path());
        let _ = cart.add_item(&widget(), 1).unwrap();
    }

    // Catalog price went up since the line was captured.
    let mut cart = file_session(dir.path());
    let _ = cart.add_item(&product("sku1", "Widget", 99), 1).unwrap();

    let line = cart.line(&"sku1".into()).unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.unit_price, Decimal::new(10, 0));
}

#[test]
fn test_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = file_session(dir.path());
    let mut second = file_session(dir.path());

    let _ = first.add_item(&widget(), 5).unwrap();
    let _ = second.add_item(&product("sku2", "Gadget", 25), 1).unwrap();

    let reloaded = file_session(dir.path());
    assert_eq!(reloaded.state(), second.state());
    assert!(!reloaded.contains(&"sku1".into()));
}

#[test]
fn test_corrupt_snapshot_hydrates_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(snapshot_path(dir.path()), "{\"version\":1,\"lines\":[tru").unwrap();

    let mut cart = file_session(dir.path());
    assert!(cart.is_empty());

    // The next write replaces the corrupt value.
    let _ = cart.add_item(&widget(), 1).unwrap();
    assert_eq!(file_session(dir.path()).item_count(), 1);
}

#[test]
fn test_invalid_line_hydrates_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        snapshot_path(dir.path()),
        r#"{"version":1,"currency":"USD","lines":[
            {"product_id":"sku1","name":"Widget","unit_price":"10","quantity":2},
            {"product_id":"sku2","name":"Gadget","unit_price":"-4","quantity":1}
        ]}"#,
    )
    .unwrap();

    assert!(file_session(dir.path()).is_empty());
}

#[test]
fn test_legacy_array_hydrates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        snapshot_path(dir.path()),
        r#"[{"_id":"5f1a","name":"Armchair","quantity":8,"price":120,"image":"chair.jpg",
             "category":"living-room","description":[],"qty":2}]"#,
    )
    .unwrap();

    let mut cart = file_session(dir.path());
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.grand_total(), Decimal::new(240, 0));

    // First write upgrades the slot to the versioned format.
    let _ = cart.set_quantity(&"5f1a".into(), 1);
    let raw = std::fs::read_to_string(snapshot_path(dir.path())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["lines"][0]["quantity"], 1);
}

#[test]
fn test_unwritable_storage_keeps_session_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = file_session(dir.path());
    let _ = cart.add_item(&widget(), 1).unwrap();

    // Replace the snapshot file with a directory so the rename fails.
    std::fs::remove_file(snapshot_path(dir.path())).unwrap();
    std::fs::create_dir(snapshot_path(dir.path())).unwrap();

    let outcome = cart.add_item(&widget(), 1).unwrap();
    assert!(matches!(outcome, Outcome::Unsaved(_)));
    assert_eq!(cart.item_count(), 2);
}

#[test]
fn test_inert_storage_never_touches_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = Cart::hydrate(CartStorage::inert(), CurrencyCode::USD);
    let _ = cart.add_item(&widget(), 3).unwrap();

    assert_eq!(cart.item_count(), 3);
    assert!(!snapshot_path(dir.path()).exists());
}

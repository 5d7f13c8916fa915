//! Randomized operation sequences checked against the cart invariants.
//!
//! After every operation:
//! - product ids are unique and every quantity is positive
//! - the item count and grand total agree with the lines
//! - the stored snapshot hydrates to the same state

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use shopfront_cart::{Cart, CartState, totals};
use shopfront_core::CatalogItem;
use shopfront_integration_tests::{catalog, file_session};

const SEEDS: [u64; 4] = [1, 7, 42, 2024];
const STEPS: usize = 200;

fn assert_invariants(state: &CartState) {
    let mut seen = HashSet::new();
    for line in state {
        assert!(seen.insert(line.product_id.clone()), "duplicate {}", line.product_id);
        assert!(line.quantity > 0, "empty line {}", line.product_id);
        assert!(line.unit_price >= Decimal::ZERO);
    }

    let count: u64 = state.iter().map(|l| u64::from(l.quantity)).sum();
    assert_eq!(totals::item_count(state), count);

    let total: Decimal = state
        .iter()
        .map(|l| l.unit_price * Decimal::from(l.quantity))
        .sum();
    assert_eq!(totals::grand_total(state), total);
}

fn step(cart: &mut Cart, items: &[CatalogItem], rng: &mut StdRng) {
    let item = &items[rng.random_range(0..items.len())];
    match rng.random_range(0..10) {
        0..=4 => {
            let _ = cart.add_item(item, rng.random_range(1..=5)).unwrap();
        }
        5 => {
            let _ = cart.add_one(item).unwrap();
        }
        6 | 7 => {
            let _ = cart.set_quantity(&item.id, rng.random_range(0..=6));
        }
        8 => {
            let _ = cart.remove_item(&item.id);
        }
        _ => {
            if rng.random_bool(0.2) {
                let _ = cart.clear();
            }
        }
    }
}

#[test]
fn test_random_sequences_hold_invariants() {
    let items = catalog();

    for seed in SEEDS {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cart = file_session(dir.path());

        for _ in 0..STEPS {
            step(&mut cart, &items, &mut rng);
            assert_invariants(cart.state());
        }

        let reloaded = file_session(dir.path());
        assert_eq!(reloaded.state(), cart.state(), "seed {seed}");
    }
}

#[test]
fn test_restart_between_every_step() {
    let items = catalog();
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let mut expected = file_session(dir.path()).snapshot();

    for _ in 0..50 {
        let mut cart = file_session(dir.path());
        assert_eq!(cart.state(), &*expected);

        step(&mut cart, &items, &mut rng);
        assert_invariants(cart.state());
        expected = cart.snapshot();
    }
}

#[test]
fn test_lines_keep_insertion_order() {
    let items = catalog();
    let dir = tempfile::tempdir().unwrap();
    let mut cart = file_session(dir.path());

    for item in items.iter().rev() {
        let _ = cart.add_one(item).unwrap();
    }
    // Re-adding and resizing never moves a line.
    let _ = cart.add_item(&items[2], 3).unwrap();
    let _ = cart.set_quantity(&items[4].id, 9);

    let order: Vec<_> = cart.state().iter().map(|l| l.product_id.clone()).collect();
    let expected: Vec<_> = items.iter().rev().map(|i| i.id.clone()).collect();
    assert_eq!(order, expected);
}

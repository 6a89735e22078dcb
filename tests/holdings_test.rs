//! Persistence tests for the holdings file.

use btcbar::holdings::{HoldingsStore, parse_holdings_input};

#[test]
fn save_then_load_keeps_eight_decimals() {
    let dir = tempfile::tempdir().unwrap();
    let store = HoldingsStore::in_dir(dir.path());

    store.save(0.123456789).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(raw, "0.12345679");
    assert_eq!(store.load(), 0.12345679);
}

#[test]
fn save_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = HoldingsStore::in_dir(&dir.path().join("nested").join("btcbar"));

    store.save(2.0).unwrap();

    assert_eq!(store.load(), 2.0);
}

#[test]
fn missing_file_loads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = HoldingsStore::in_dir(dir.path());

    assert_eq!(store.load(), 0.0);
}

#[test]
fn corrupt_file_loads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = HoldingsStore::in_dir(dir.path());
    std::fs::write(store.path(), "lots of bitcoin").unwrap();

    assert_eq!(store.load(), 0.0);
}

#[test]
fn entered_text_round_trips_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = HoldingsStore::in_dir(dir.path());

    let quantity = parse_holdings_input(" 1.5 ").expect("valid input");
    store.save(quantity).unwrap();

    assert_eq!(store.load(), 1.5);
    assert_eq!(parse_holdings_input("abc"), None);
}

use super::*;
use crate::catalog::{Catalog, TrackId};

fn id(s: &str) -> TrackId {
    TrackId::new(s)
}

#[test]
fn adding_twice_keeps_one_entry() {
    let mut cart = Cart::new();
    assert!(cart.add(&id("1")));
    assert!(!cart.add(&id("1")));
    assert_eq!(cart.len(), 1);
    assert!(cart.contains(&id("1")));
}

#[test]
fn removing_a_missing_id_is_a_no_op() {
    let mut cart = Cart::new();
    cart.add(&id("1"));
    assert!(!cart.remove(&id("9")));
    assert_eq!(cart.ids(), &[id("1")]);
    assert!(cart.remove(&id("1")));
    assert!(cart.is_empty());
}

#[test]
fn clear_empties_any_cart() {
    let mut cart = Cart::new();
    cart.clear();
    assert!(cart.is_empty());

    for i in ["3", "1", "2"] {
        cart.add(&id(i));
    }
    assert_eq!(cart.ids(), &[id("3"), id("1"), id("2")]);
    cart.clear();
    assert!(cart.is_empty());
}

#[test]
fn cart_total_sums_catalog_prices() {
    let catalog = Catalog::builtin();
    let mut cart = Cart::new();
    cart.add(&id("1"));
    cart.add(&id("4"));
    cart.add(&id("missing"));
    approx::assert_abs_diff_eq!(cart.total(&catalog), 29.99 + 49.99, epsilon = 1e-9);
}

#[test]
fn store_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let mut store = LocalStore::open(&path);
    assert_eq!(store.get("k"), None);
    store.set("k", "v".into()).unwrap();
    assert!(path.exists());

    let store = LocalStore::open(&path);
    assert_eq!(store.get("k"), Some("v"));
}

#[test]
fn corrupt_store_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = LocalStore::open(&path);
    assert_eq!(store.get(RATINGS_KEY), None);
}

#[test]
fn rating_survives_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut book = RatingBook::load(LocalStore::open(&path));
    assert_eq!(book.rating(&id("2")), 0);
    book.rate(&id("2"), 4).unwrap();
    assert_eq!(book.rating(&id("2")), 4);
    drop(book);

    let book = RatingBook::load(LocalStore::open(&path));
    assert_eq!(book.rating(&id("2")), 4);
    assert_eq!(book.len(), 1);
}

#[test]
fn rerating_overwrites_and_persists() {
    let mut book = RatingBook::load(LocalStore::in_memory());
    book.rate(&id("5"), 1).unwrap();
    book.rate(&id("5"), 5).unwrap();

    let book = RatingBook::load(book.into_store());
    assert_eq!(book.rating(&id("5")), 5);
}

#[test]
fn out_of_range_ratings_are_rejected() {
    let mut book = RatingBook::load(LocalStore::in_memory());
    assert!(matches!(book.rate(&id("1"), 0), Err(RatingError::InvalidValue(0))));
    assert!(matches!(book.rate(&id("1"), 6), Err(RatingError::InvalidValue(6))));
    assert!(book.is_empty());
}

#[test]
fn corrupt_or_out_of_range_ratings_entry_loads_clean() {
    let mut store = LocalStore::in_memory();
    store.set(RATINGS_KEY, "[1, 2".into()).unwrap();
    assert!(RatingBook::load(store).is_empty());

    let mut store = LocalStore::in_memory();
    store
        .set(RATINGS_KEY, r#"{"1": 3, "2": 9, "3": -1}"#.into())
        .unwrap();
    let book = RatingBook::load(store);
    assert_eq!(book.rating(&id("1")), 3);
    assert_eq!(book.rating(&id("2")), 0);
    assert_eq!(book.len(), 1);
}

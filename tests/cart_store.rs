//! Integration tests for the persisted cart store.
//!
//! Drives [`CartStore`] through the bundled catalog and checks the merge rules,
//! the derived totals and the snapshot written to storage.

use std::num::NonZeroU32;

use jiff::civil::date;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tempfile::tempdir;
use testresult::TestResult;

use tripcart::prelude::*;

fn qty(n: u32) -> TestResult<NonZeroU32> {
    Ok(NonZeroU32::new(n).ok_or("quantity must be non-zero")?)
}

fn service(catalog: &Catalog, id: &str) -> TestResult<Service> {
    Ok(catalog.get(id).ok_or("service missing from catalog")?.clone())
}

fn persisted(storage: &MemoryStorage) -> TestResult<Value> {
    let raw = storage
        .load(CART_STORAGE_KEY)?
        .ok_or("cart snapshot not written")?;

    Ok(serde_json::from_str(&raw)?)
}

#[test]
fn identical_keys_merge_into_one_line() -> TestResult {
    let catalog = Catalog::bundled()?;
    let tour = service(&catalog, "4")?;
    let lunch = AddOn::new("Traditional Lunch", Decimal::new(25, 0));

    let mut cart = CartStore::open(MemoryStorage::new());

    for n in [1, 2, 4] {
        cart.add_to_cart(
            NewCartItem::new(tour.clone())
                .quantity(qty(n)?)
                .booking_date(date(2025, 6, 1))
                .booking_time("9:00 AM")
                .add_ons(vec![lunch.clone()]),
        );
    }

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items().first().map(|line| line.quantity), Some(7));

    Ok(())
}

#[test]
fn distinct_keys_get_one_line_each() -> TestResult {
    let catalog = Catalog::bundled()?;
    let tour = service(&catalog, "4")?;
    let pickup = AddOn::new("Hotel Pickup", Decimal::new(15, 0));
    let lunch = AddOn::new("Traditional Lunch", Decimal::new(25, 0));

    let base = || {
        NewCartItem::new(tour.clone())
            .booking_date(date(2025, 6, 1))
            .booking_time("9:00 AM")
    };

    let mut cart = CartStore::open(MemoryStorage::new());

    cart.add_to_cart(NewCartItem::new(tour.clone()));
    cart.add_to_cart(base());
    cart.add_to_cart(base().add_ons(Vec::new()));
    cart.add_to_cart(base().booking_time("10:30 AM"));
    cart.add_to_cart(base().booking_date(date(2025, 6, 2)));
    cart.add_to_cart(base().add_ons(vec![pickup.clone(), lunch.clone()]));
    cart.add_to_cart(base().add_ons(vec![lunch, pickup]));

    // Same key as the second call.
    cart.add_to_cart(base());

    assert_eq!(cart.len(), 7);
    assert_eq!(cart.item_count(), 8);

    Ok(())
}

#[test]
fn totals_follow_line_prices_and_add_ons() -> TestResult {
    let priced = Service::new("x", "Day Trip", Decimal::new(80, 0), "USD");
    let mut cart = CartStore::open(MemoryStorage::new());

    assert_eq!(cart.cart_total(), Decimal::ZERO);

    cart.add_to_cart(NewCartItem::new(priced.clone()).quantity(qty(2)?));

    assert_eq!(cart.cart_total(), Decimal::new(160, 0));

    cart.clear_cart();
    cart.add_to_cart(
        NewCartItem::new(priced)
            .quantity(qty(2)?)
            .add_ons(vec![AddOn::new("Lunch", Decimal::new(30, 0))]),
    );

    assert_eq!(cart.cart_total(), Decimal::new(220, 0));

    Ok(())
}

#[test]
fn item_count_sums_quantities() -> TestResult {
    let catalog = Catalog::bundled()?;
    let tour = service(&catalog, "4")?;
    let mut cart = CartStore::open(MemoryStorage::new());

    cart.add_to_cart(NewCartItem::new(tour.clone()).booking_time("9:00 AM"));
    cart.add_to_cart(NewCartItem::new(tour).booking_time("12:00 PM"));

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 2);

    Ok(())
}

#[test]
fn non_positive_updates_remove_every_variant() -> TestResult {
    let catalog = Catalog::bundled()?;
    let tour = service(&catalog, "4")?;

    for quantity in [0, -5] {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_to_cart(NewCartItem::new(tour.clone()).booking_time("9:00 AM"));
        cart.add_to_cart(NewCartItem::new(tour.clone()).booking_time("1:30 PM"));
        cart.add_to_cart(NewCartItem::new(service(&catalog, "1")?));

        assert_eq!(cart.update_quantity("4", quantity), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().map(CartItem::service_id), Some("1"));
    }

    Ok(())
}

#[test]
fn positive_update_overwrites_every_variant() -> TestResult {
    let catalog = Catalog::bundled()?;
    let tour = service(&catalog, "4")?;
    let mut cart = CartStore::open(MemoryStorage::new());

    cart.add_to_cart(NewCartItem::new(tour.clone()).booking_time("9:00 AM"));
    cart.add_to_cart(
        NewCartItem::new(tour)
            .booking_time("1:30 PM")
            .quantity(qty(4)?),
    );

    cart.update_quantity("4", 3);

    let quantities: Vec<u32> = cart.items().iter().map(|line| line.quantity).collect();

    assert_eq!(quantities, [3, 3]);

    Ok(())
}

#[test]
fn clear_persists_empty_cart() -> TestResult {
    let catalog = Catalog::bundled()?;
    let storage = MemoryStorage::new();
    let mut cart = CartStore::open(storage.clone());

    cart.add_to_cart(NewCartItem::new(service(&catalog, "1")?));
    cart.set_cart_open(true);
    cart.clear_cart();

    assert_eq!(cart.cart_total(), Decimal::ZERO);
    assert_eq!(cart.item_count(), 0);
    assert_eq!(
        persisted(&storage)?,
        json!({ "state": { "cartItems": [], "isCartOpen": true }, "version": 0 })
    );

    Ok(())
}

#[test]
fn corrupt_snapshot_yields_empty_cart() -> TestResult {
    for raw in ["{not json", "[]", r#"{"state":{"cartItems":"nope"}}"#] {
        let storage = MemoryStorage::with_entry(CART_STORAGE_KEY, raw);
        let cart = CartStore::open(storage);

        assert!(cart.is_empty(), "{raw}");
        assert!(!cart.is_cart_open(), "{raw}");
    }

    Ok(())
}

#[test]
fn snapshot_shape_matches_browser_storage() -> TestResult {
    let catalog = Catalog::bundled()?;
    let storage = MemoryStorage::new();
    let mut cart = CartStore::open(storage.clone());

    cart.add_to_cart(
        NewCartItem::new(service(&catalog, "4")?)
            .booking_date(date(2025, 6, 1))
            .booking_time("9:00 AM")
            .add_ons(vec![AddOn::new("Hotel Pickup", Decimal::new(15, 0))]),
    );

    let snapshot = persisted(&storage)?;
    let line = snapshot
        .pointer("/state/cartItems/0")
        .ok_or("no persisted line")?;

    assert_eq!(line.get("id"), Some(&json!("4")));
    assert_eq!(line.get("quantity"), Some(&json!(1)));
    assert_eq!(line.get("bookingDate"), Some(&json!("2025-06-01")));
    assert_eq!(line.get("bookingTime"), Some(&json!("9:00 AM")));
    assert_eq!(
        line.get("selectedAddOns"),
        Some(&json!([{ "name": "Hotel Pickup", "price": 15.0 }]))
    );
    assert_eq!(snapshot.pointer("/state/isCartOpen"), Some(&json!(false)));

    Ok(())
}

#[test]
fn file_storage_survives_reopen() -> TestResult {
    let dir = tempdir()?;
    let catalog = Catalog::bundled()?;

    {
        let mut cart = CartStore::open(FileStorage::new(dir.path()));

        cart.add_to_cart(NewCartItem::new(service(&catalog, "2")?).quantity(qty(2)?));
        cart.set_cart_open(true);
    }

    let cart = CartStore::open(FileStorage::new(dir.path()));

    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.cart_total(), Decimal::new(150, 0));
    assert!(cart.is_cart_open());

    Ok(())
}

#[test]
fn storefront_checkout_round_trip() -> TestResult {
    let storage = MemoryStorage::new();
    let mut storefront = Storefront::open(Catalog::bundled()?, storage.clone(), Toasts::new());

    storefront.book_on(
        &BookingRequest::new("2")
            .date(date(2025, 7, 14))
            .time("12:00 PM")
            .add_on("Audio Guide"),
        date(2025, 7, 1),
    )?;

    let confirmation = storefront.checkout(
        CheckoutDetails {
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            address: "1 Rua Augusta".to_string(),
        },
        &Charges::checkout(),
    )?;

    assert_eq!(confirmation.breakdown.subtotal, Decimal::new(83, 0));
    assert_eq!(confirmation.breakdown.total, Decimal::new(87, 0));
    assert!(confirmation.reference.starts_with("BK"));
    assert_eq!(confirmation.reference.len(), 9);

    let reopened = CartStore::open(storage);

    assert!(reopened.is_empty());

    Ok(())
}

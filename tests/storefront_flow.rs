//! Integration test for the full storefront flow against a file-backed store.
//!
//! Walks the same path a shopper takes in the UI: browse the catalog, filter
//! it, build a cart, sign up, check out, then reopen the store and confirm
//! everything that should persist did.
//!
//! Expected totals for the fixture cart (2 x p1 at $10.00 with 10% off, plus
//! 1 x p2 at $5.00):
//!
//! - per-unit discounted price for p1: $9.00
//! - subtotal: 2 x $9.00 + $5.00 = $23.00
//! - tax at 10%: $2.30
//! - total: $25.30

use std::fs;

use jiff::Timestamp;
use rust_decimal::Decimal;
use testresult::TestResult;

use kiosk::{
    account::SignupForm,
    app::{App, Command, Outcome, Section},
    catalog::FileFeed,
    checkout::CustomerDetails,
    storage::{FileStore, Storage},
};

const FEED: &str = r#"[
    {"id": "p1", "title": "Mug", "category": "Kitchen", "price": 10.00, "discount": 10},
    {"id": 2, "title": "Lamp", "desc": "A small lamp", "category": "Lighting", "price": 5.00}
]"#;

fn open_app(dir: &std::path::Path) -> TestResult<App> {
    let store = FileStore::open(dir.join("store.json"))?;
    let feed = FileFeed::new(dir.join("data.json"));

    Ok(App::new(Storage::new(Box::new(store)), Box::new(feed)))
}

fn details() -> CustomerDetails {
    CustomerDetails {
        name: "Ada Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        address1: "1 Analytical Row".to_owned(),
        city: "London".to_owned(),
        zip: "N1 9GU".to_owned(),
        ..CustomerDetails::default()
    }
}

#[test]
fn browse_shop_signup_and_checkout_persist_across_reopen() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("data.json"), FEED)?;

    let now = Timestamp::from_millisecond(1_700_000_000_000)?;

    let mut app = open_app(dir.path())?;

    // Browse: both products come back, and the numeric feed id is a string.
    let outcome = app.handle(Command::Navigate(Section::Products), now)?;
    match outcome {
        Outcome::ProductList(products) => {
            assert_eq!(products.len(), 2);
            assert!(products.iter().any(|p| p.id == "2"));
        }
        other => return Err(format!("expected ProductList, got {other:?}").into()),
    }

    // Filter down to the lamp.
    let outcome = app.handle(
        Command::SelectCategory {
            category: "Lighting".to_owned(),
        },
        now,
    )?;
    match outcome {
        Outcome::ProductList(products) => assert_eq!(products.len(), 1),
        other => return Err(format!("expected ProductList, got {other:?}").into()),
    }

    // Build the fixture cart.
    for id in ["p1", "p1", "2"] {
        app.handle(
            Command::AddToCart {
                product_id: id.to_owned(),
            },
            now,
        )?;
    }
    assert_eq!(app.cart_count(), 3);

    // Sign up, which also signs in.
    let outcome = app.handle(
        Command::Signup {
            form: SignupForm {
                name: "Ada Lovelace".to_owned(),
                address: String::new(),
                number: "07000000001".to_owned(),
                email: "ada@example.com".to_owned(),
                password: "s3cret".to_owned(),
                confirm: "s3cret".to_owned(),
            },
        },
        now,
    )?;
    assert!(matches!(outcome, Outcome::SignedIn(_)));

    // Checkout totals carry the per-line discount and the 10% tax.
    let outcome = app.handle(Command::Navigate(Section::Order), now)?;
    match outcome {
        Outcome::CartView(totals) => {
            assert_eq!(totals.subtotal, Decimal::new(2300, 2));
            assert_eq!(totals.tax, Decimal::new(230, 2));
            assert_eq!(totals.total, Decimal::new(2530, 2));
        }
        other => return Err(format!("expected CartView, got {other:?}").into()),
    }

    let outcome = app.handle(Command::SubmitCheckout { form: details() }, now)?;
    assert_eq!(
        outcome,
        Outcome::OrderPlaced {
            order_id: "ORD-1700000000000".to_owned()
        }
    );
    assert_eq!(app.cart_count(), 0);
    drop(app);

    // Reopen: session, order history and checkout prefill all survive.
    let mut app = open_app(dir.path())?;

    let session = app.session().ok_or("session should persist")?;
    assert_eq!(session.email, "ada@example.com");

    match app.handle(Command::Navigate(Section::Orders), now)? {
        Outcome::OrderHistory(orders) => {
            assert_eq!(orders.len(), 1);
            assert!(orders.iter().all(|o| o.id == "ORD-1700000000000"));
            assert!(orders.iter().all(|o| o.customer.name == "Ada Lovelace"));
        }
        other => return Err(format!("expected OrderHistory, got {other:?}").into()),
    }

    let prefill = app.last_customer().ok_or("prefill should persist")?;
    assert_eq!(prefill.city, "London");

    assert!(app.cart().is_empty());

    Ok(())
}

#[test]
fn cart_contents_persist_between_sessions() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("data.json"), FEED)?;

    let now = Timestamp::from_millisecond(0)?;

    let mut app = open_app(dir.path())?;
    app.handle(
        Command::AddToCart {
            product_id: "p1".to_owned(),
        },
        now,
    )?;
    app.handle(
        Command::SetQuantity {
            product_id: "p1".to_owned(),
            quantity: 4,
        },
        now,
    )?;
    drop(app);

    let app = open_app(dir.path())?;

    assert_eq!(app.cart_count(), 4);
    assert_eq!(app.cart().items().get("p1"), Some(&4));

    Ok(())
}

#[test]
fn login_fails_against_a_fresh_store() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("data.json"), FEED)?;

    let mut app = open_app(dir.path())?;

    let result = app.handle(
        Command::Login {
            who: "nobody@example.com".to_owned(),
            password: "whatever".to_owned(),
        },
        Timestamp::from_millisecond(0)?,
    );

    let error = result.err().ok_or("expected login to fail")?;

    assert_eq!(error.to_string(), "User not found");

    Ok(())
}

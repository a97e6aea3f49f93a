//! Kiosk
//!
//! Kiosk is a storefront core engine: a load-once product catalog with
//! category and text filtering, a cart keyed by product id, a checkout/order
//! state machine, and local account signup/login, all persisted through a
//! small key-value storage adapter.
//!
//! There is no server component. Orders, users and sessions live in a local
//! store, and the catalog is read from a static `data.json` feed.

pub mod account;
pub mod app;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod debounce;
pub mod pricing;
pub mod storage;

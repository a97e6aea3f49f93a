//! Storage
//!
//! Typed get/set wrappers over a per-profile key-value store. Keys and
//! values mirror the original storefront's browser-local storage layout,
//! including the `sp_` namespace prefix, so existing data remains readable.
//!
//! Corrupt stored values are never surfaced as errors: a value that fails
//! to parse decays silently to its empty default and is logged at `warn`.
//! Write failures are real errors and propagate.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    account::{Session, User},
    checkout::{CustomerDetails, Order},
};

/// Well-known store keys.
pub mod keys {
    /// Cart mapping of product id to quantity.
    pub const CART_ITEMS: &str = "sp_cart_items";

    /// Legacy single-integer cart counter, kept for backward compatibility.
    pub const CART_LEGACY: &str = "sp_cart";

    /// Registered user list.
    pub const USERS: &str = "sp_users";

    /// Current session, when signed in.
    pub const CURRENT_USER: &str = "sp_current_user";

    /// Append-only order history.
    pub const ORDERS: &str = "sp_orders";

    /// Most recent checkout details, kept for form prefill.
    pub const LAST_CUSTOMER: &str = "sp_last_customer";
}

/// Errors raised by the storage adapter.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be written.
    #[error("failed to access the backing store")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded for storage.
    #[error("failed to encode a value for storage")]
    Encode(#[from] serde_json::Error),
}

/// Raw string key-value store.
///
/// Reads are served from memory and cannot fail; every mutation is atomic
/// from the caller's perspective (one key per call, no transactions).
pub trait Store: fmt::Debug {
    /// Read the raw value under a key.
    fn read(&self, key: &str) -> Option<String>;

    /// Write the raw value under a key.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove a key entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Typed view over a [`Store`], owning the well-known keys.
#[derive(Debug)]
pub struct Storage {
    store: Box<dyn Store>,
}

impl Storage {
    /// Wrap a raw store.
    #[must_use]
    pub fn new(store: Box<dyn Store>) -> Self {
        Self { store }
    }

    /// An ephemeral storage, for tests and profile-less runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    fn get_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.store.read(key) else {
            return T::default();
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %error, "stored value failed to parse; using default");
                T::default()
            }
        }
    }

    fn put<T>(&mut self, key: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)?;

        self.store.write(key, raw)
    }

    /// The cart mapping of product id to quantity.
    #[must_use]
    pub fn cart_items(&self) -> FxHashMap<String, u32> {
        self.get_or_default(keys::CART_ITEMS)
    }

    /// Persist the cart mapping.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn set_cart_items(&mut self, items: &FxHashMap<String, u32>) -> Result<(), StorageError> {
        self.put(keys::CART_ITEMS, items)
    }

    /// Remove the cart mapping.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn clear_cart_items(&mut self) -> Result<(), StorageError> {
        self.store.delete(keys::CART_ITEMS)
    }

    /// The legacy single-integer cart counter; 0 when absent.
    #[must_use]
    pub fn legacy_cart_count(&self) -> u64 {
        self.get_or_default(keys::CART_LEGACY)
    }

    /// Persist the legacy cart counter.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn set_legacy_cart_count(&mut self, count: u64) -> Result<(), StorageError> {
        self.put(keys::CART_LEGACY, &count)
    }

    /// Remove the legacy cart counter.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn clear_legacy_cart_count(&mut self) -> Result<(), StorageError> {
        self.store.delete(keys::CART_LEGACY)
    }

    /// The registered user list.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.get_or_default(keys::USERS)
    }

    /// Persist the user list.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn set_users(&mut self, users: &[User]) -> Result<(), StorageError> {
        self.put(keys::USERS, users)
    }

    /// The current session, if signed in.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.get_or_default(keys::CURRENT_USER)
    }

    /// Persist the current session.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn set_session(&mut self, session: &Session) -> Result<(), StorageError> {
        self.put(keys::CURRENT_USER, session)
    }

    /// Remove the current session.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn clear_session(&mut self) -> Result<(), StorageError> {
        self.store.delete(keys::CURRENT_USER)
    }

    /// The order history, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.get_or_default(keys::ORDERS)
    }

    /// Append an order to the history. A corrupt stored history decays to
    /// empty first, leaving the new order as its single element.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn push_order(&mut self, order: &Order) -> Result<(), StorageError> {
        let mut orders = self.orders();
        orders.push(order.clone());

        self.put(keys::ORDERS, &orders)
    }

    /// The most recent checkout details, for form prefill.
    #[must_use]
    pub fn last_customer(&self) -> Option<CustomerDetails> {
        self.get_or_default(keys::LAST_CUSTOMER)
    }

    /// Persist the most recent checkout details.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn set_last_customer(&mut self, customer: &CustomerDetails) -> Result<(), StorageError> {
        self.put(keys::LAST_CUSTOMER, customer)
    }
}

//! Checkout
//!
//! Order assembly state machine: `Browsing → FormEntry → Validated →
//! Committed`. Commit is terminal; there is no undo.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::Cart,
    storage::{Storage, StorageError},
};

/// Errors raised while validating or committing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A required checkout field was empty or missing.
    #[error("Please fill required fields.")]
    MissingRequiredFields,

    /// [`CheckoutFlow::place_order`] was called before validation.
    #[error("checkout form has not been validated")]
    NotValidated,

    /// The order could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Checkout form contents.
///
/// Name, email, first address line, city and zip are required; the rest
/// pass through validation unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Recipient name (required).
    pub name: String,

    /// Contact email (required).
    pub email: String,

    /// First address line (required).
    pub address1: String,

    /// Second address line.
    #[serde(default)]
    pub address2: String,

    /// City (required).
    pub city: String,

    /// Postal code (required).
    pub zip: String,

    /// Delivery notes.
    #[serde(default)]
    pub notes: String,
}

impl CustomerDetails {
    // Only truly empty values fail; whitespace-only passes, matching the
    // falsy check of the legacy order form.
    fn missing_required(&self) -> bool {
        [&self.name, &self.email, &self.address1, &self.city, &self.zip]
            .iter()
            .any(|field| field.is_empty())
    }
}

/// Committed order record. The history is append-only and orders are
/// immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// `"ORD-"` followed by the commit time in epoch milliseconds.
    pub id: String,

    /// Commit time.
    pub created: Timestamp,

    /// Checkout form data as validated.
    pub customer: CustomerDetails,

    /// Snapshot of the cart mapping at commit time.
    pub items: FxHashMap<String, u32>,
}

/// Checkout progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// No checkout in progress.
    #[default]
    Browsing,

    /// The form is on screen and may be edited.
    FormEntry,

    /// Form data passed validation and may be committed.
    Validated(CustomerDetails),

    /// An order was committed; the flow is finished.
    Committed {
        /// Id of the committed order.
        order_id: String,
    },
}

/// State machine driving checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutFlow {
    state: CheckoutState,
}

impl CheckoutFlow {
    /// A flow in the browsing state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Enter form entry. Reopening the form discards prior validation.
    pub fn begin(&mut self) {
        self.state = CheckoutState::FormEntry;
    }

    /// Validate the checkout form and hold it for commit.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingRequiredFields`] when name, email,
    /// address1, city or zip is empty or missing.
    pub fn validate(&mut self, form: CustomerDetails) -> Result<(), CheckoutError> {
        if form.missing_required() {
            return Err(CheckoutError::MissingRequiredFields);
        }

        self.state = CheckoutState::Validated(form);

        Ok(())
    }

    /// Commit the order and return its id.
    ///
    /// Appends the order to the history (a corrupt stored history decays to
    /// empty, leaving this order as its single element), stores the
    /// customer for form prefill, and clears the cart mapping and the
    /// legacy counter. The transition is terminal.
    ///
    /// An empty cart is not rejected here; the caller gates that.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotValidated`] unless the flow is in the
    /// validated state, or a [`CheckoutError::Storage`] when persisting
    /// fails.
    pub fn place_order(
        &mut self,
        storage: &mut Storage,
        cart: &mut Cart,
        now: Timestamp,
    ) -> Result<String, CheckoutError> {
        let CheckoutState::Validated(customer) = &self.state else {
            return Err(CheckoutError::NotValidated);
        };

        let customer = customer.clone();
        let order_id = format!("ORD-{}", now.as_millisecond());
        let order = Order {
            id: order_id.clone(),
            created: now,
            customer: customer.clone(),
            items: cart.items().clone(),
        };

        storage.push_order(&order)?;
        storage.set_last_customer(&customer)?;
        cart.clear(storage)?;

        self.state = CheckoutState::Committed {
            order_id: order_id.clone(),
        };

        Ok(order_id)
    }
}

//! Application state and command routing.
//!
//! Replaces the original storefront's ambient globals and DOM event wiring:
//! a single [`App`] owns the store, catalog cache, cart, checkout flow and
//! active filters, and UI events arrive as typed [`Command`]s. The router
//! shows a [`Section`] by handing [`Command::Navigate`] to the app, which
//! runs that section's refresh action and returns an [`Outcome`] to render.

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    account::{self, AccountError, Session, SignupForm},
    cart::{Cart, Totals},
    catalog::{ALL_CATEGORIES, Catalog, CatalogFeed, LoadState, Product},
    checkout::{CheckoutError, CheckoutFlow, CheckoutState, CustomerDetails, Order},
    debounce::Debouncer,
    storage::{Storage, StorageError},
};

/// UI sections the router can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Product grid with filters.
    Products,

    /// Cart contents and totals.
    Cart,

    /// Checkout summary and form.
    Order,

    /// Login form.
    Login,

    /// Signup form.
    Signup,

    /// Order history.
    Orders,

    /// Profile of the signed-in user.
    Profile,
}

/// A user interaction, with typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show a section and run its refresh action.
    Navigate(Section),

    /// Add one unit of a product to the cart.
    AddToCart {
        /// Product id from the catalog feed.
        product_id: String,
    },

    /// Set a cart line's quantity (clamped to at least 1).
    SetQuantity {
        /// Product id of the line.
        product_id: String,

        /// Requested quantity.
        quantity: u32,
    },

    /// Remove a cart line entirely.
    RemoveFromCart {
        /// Product id of the line.
        product_id: String,
    },

    /// Debounced search input; the filter runs when the wait elapses.
    SearchInput {
        /// Current contents of the search box.
        query: String,
    },

    /// Immediate search (the original's Enter-key and button path).
    Search {
        /// Query to filter by.
        query: String,
    },

    /// Select a category filter.
    SelectCategory {
        /// Category name, or `"All"`.
        category: String,
    },

    /// Validate checkout details and commit the order.
    SubmitCheckout {
        /// Checkout form contents.
        form: CustomerDetails,
    },

    /// Create an account and sign in.
    Signup {
        /// Signup form contents.
        form: SignupForm,
    },

    /// Sign in with an email or number.
    Login {
        /// Email (case-insensitive) or number (exact).
        who: String,

        /// Password to check.
        password: String,
    },

    /// End the session.
    Logout,
}

/// Result of handling a command; the UI renders from these.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Products matching the active filters, in catalog order.
    ProductList(Vec<Product>),

    /// Priced cart contents.
    CartView(Totals),

    /// An order was committed.
    OrderPlaced {
        /// Id of the new order.
        order_id: String,
    },

    /// Order history, oldest first.
    OrderHistory(Vec<Order>),

    /// A session started via signup or login.
    SignedIn(Session),

    /// The session ended.
    SignedOut,

    /// Profile data for the profile section.
    Profile(Option<Session>),

    /// Section shown, with nothing to refresh.
    SectionShown(Section),

    /// Search input accepted; the filter runs when the debounce fires.
    SearchPending,
}

/// Errors surfaced to the UI. All are recoverable inline messages; nothing
/// is fatal and nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout was submitted with an empty cart. The flow itself does not
    /// reject this; the gate lives here, in the checkout UI's caller.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// Checkout validation or commit failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Signup or login failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// The store could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Application state: storage, catalog cache, cart, checkout flow and the
/// active product filters.
#[derive(Debug)]
pub struct App {
    storage: Storage,
    feed: Box<dyn CatalogFeed>,
    catalog: Catalog,
    cart: Cart,
    checkout: CheckoutFlow,
    search: Debouncer<String>,
    active_category: String,
    query: String,
}

impl App {
    /// Build an app over a store and a catalog feed. Cart contents are
    /// loaded from the store eagerly; the catalog loads on the first visit
    /// to a section that needs it.
    #[must_use]
    pub fn new(storage: Storage, feed: Box<dyn CatalogFeed>) -> Self {
        let cart = Cart::load(&storage);

        Self {
            storage,
            feed,
            catalog: Catalog::new(),
            cart,
            checkout: CheckoutFlow::new(),
            search: Debouncer::default(),
            active_category: ALL_CATEGORIES.to_owned(),
            query: String::new(),
        }
    }

    /// Handle one command.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`]; every variant is a recoverable condition to
    /// surface inline.
    pub fn handle(&mut self, command: Command, now: Timestamp) -> Result<Outcome, AppError> {
        match command {
            Command::Navigate(section) => Ok(self.refresh(section)),
            Command::AddToCart { product_id } => {
                self.cart.add(&mut self.storage, &product_id)?;

                Ok(self.cart_view())
            }
            Command::SetQuantity {
                product_id,
                quantity,
            } => {
                self.cart
                    .set_quantity(&mut self.storage, &product_id, quantity)?;

                Ok(self.cart_view())
            }
            Command::RemoveFromCart { product_id } => {
                self.cart.remove(&mut self.storage, &product_id)?;

                Ok(self.cart_view())
            }
            Command::SearchInput { query } => {
                self.search.schedule(query, now);

                Ok(Outcome::SearchPending)
            }
            Command::Search { query } => {
                self.search.cancel();
                self.query = query;

                Ok(self.product_list())
            }
            Command::SelectCategory { category } => {
                self.active_category = category;

                Ok(self.product_list())
            }
            Command::SubmitCheckout { form } => {
                if self.cart.is_empty() {
                    return Err(AppError::EmptyCart);
                }

                self.ensure_catalog();
                self.checkout.validate(form)?;
                let order_id = self
                    .checkout
                    .place_order(&mut self.storage, &mut self.cart, now)?;

                Ok(Outcome::OrderPlaced { order_id })
            }
            Command::Signup { form } => Ok(Outcome::SignedIn(account::signup(
                &mut self.storage,
                &form,
                now,
            )?)),
            Command::Login { who, password } => Ok(Outcome::SignedIn(account::login(
                &mut self.storage,
                &who,
                &password,
            )?)),
            Command::Logout => {
                account::logout(&mut self.storage)?;

                Ok(Outcome::SignedOut)
            }
        }
    }

    /// Run the debounced search if its wait has elapsed.
    pub fn tick(&mut self, now: Timestamp) -> Option<Outcome> {
        let query = self.search.fire(now)?;
        self.query = query;

        Some(self.product_list())
    }

    /// Per-section refresh actions, as the original router triggers them on
    /// navigation.
    fn refresh(&mut self, section: Section) -> Outcome {
        match section {
            Section::Products => {
                self.ensure_catalog();

                self.product_list()
            }
            Section::Cart => self.cart_view(),
            Section::Order => {
                self.checkout.begin();

                self.cart_view()
            }
            Section::Orders => Outcome::OrderHistory(self.storage.orders()),
            Section::Profile => Outcome::Profile(self.storage.session()),
            Section::Login | Section::Signup => Outcome::SectionShown(section),
        }
    }

    fn ensure_catalog(&mut self) {
        if self.catalog.state() == LoadState::NotLoaded {
            let state = self.catalog.load(self.feed.as_ref());
            tracing::debug!(?state, "catalog load attempted");
        }
    }

    fn product_list(&self) -> Outcome {
        Outcome::ProductList(
            self.catalog
                .filter(&self.active_category, &self.query)
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    // Cart views always price against a loaded catalog; without this, a
    // cart command arriving before any catalog-backed section would price
    // every line as a zero-cost placeholder.
    fn cart_view(&mut self) -> Outcome {
        self.ensure_catalog();

        Outcome::CartView(self.cart.compute_totals(&self.catalog))
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart engine.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Header-badge unit count, with the legacy-counter fallback.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count(&self.storage)
    }

    /// Current checkout progress.
    #[must_use]
    pub fn checkout_state(&self) -> &CheckoutState {
        self.checkout.state()
    }

    /// The signed-in session, if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.storage.session()
    }

    /// The most recent checkout details, for form prefill.
    #[must_use]
    pub fn last_customer(&self) -> Option<CustomerDetails> {
        self.storage.last_customer()
    }
}

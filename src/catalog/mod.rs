//! Catalog
//!
//! In-memory, load-once cache of products sourced from the external feed,
//! with category extraction and text/category filtering.

mod feed;

pub use feed::{CatalogFeed, FileFeed, LoadError};

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize};

/// The pseudo-category matching every product.
pub const ALL_CATEGORIES: &str = "All";

/// Product sourced from the catalog feed. Immutable; never created or
/// mutated by this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Feed-assigned identifier. Feed ids may be numbers; they are matched
    /// as strings, as the original storefront does.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,

    /// Display title.
    pub title: String,

    /// Short description.
    #[serde(default)]
    pub desc: String,

    /// Category label used for filtering.
    #[serde(default)]
    pub category: String,

    /// Unit price in USD; never negative in a well-formed feed.
    pub price: Decimal,

    /// Percentage discount, 0-100. Zero means full price.
    #[serde(default)]
    pub discount: u8,

    /// Image URL, when the feed provides one.
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Stand-in for a cart line whose product has left the feed. Renders
    /// with a placeholder title and a zero price instead of failing.
    #[must_use]
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: format!("Item {id}"),
            desc: String::new(),
            category: String::new(),
            price: Decimal::ZERO,
            discount: 0,
            image: None,
        }
    }
}

/// Accept both string and numeric ids from the feed.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Outcome of the one-shot catalog load, distinguishing a failed load from
/// a legitimately empty catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No load attempt has completed.
    NotLoaded,

    /// The feed was fetched and decoded.
    Loaded,

    /// The fetch or decode failed; the product list stays empty.
    Failed,
}

/// Load-once product catalog.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
    state: LoadState,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// An empty, not-yet-loaded catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            state: LoadState::NotLoaded,
        }
    }

    /// A pre-loaded catalog, for fixtures and tests.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products,
            state: LoadState::Loaded,
        }
    }

    /// Load products from the feed, once.
    ///
    /// Any completed attempt, success or failure, makes later calls no-ops;
    /// the original storefront sets its init guard before fetching and never
    /// retries. A failure leaves an empty product list in the [`LoadState::Failed`]
    /// state so callers can tell it apart from an empty feed.
    pub fn load(&mut self, feed: &dyn CatalogFeed) -> LoadState {
        if self.state != LoadState::NotLoaded {
            return self.state;
        }

        match feed.fetch() {
            Ok(products) => {
                self.products = products;
                self.state = LoadState::Loaded;
            }
            Err(error) => {
                tracing::error!(%error, "could not load products");
                self.state = LoadState::Failed;
            }
        }

        self.state
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// All loaded products, in feed order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// `"All"` followed by the unique categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut categories = vec![ALL_CATEGORIES.to_owned()];

        for product in &self.products {
            if seen.insert(product.category.as_str()) {
                categories.push(product.category.clone());
            }
        }

        categories
    }

    /// Filter by exact category (skipped for `"All"`), then by a
    /// case-insensitive substring match of `query` against title,
    /// description or category. An empty or whitespace query matches all.
    /// Feed order is preserved.
    #[must_use]
    pub fn filter(&self, category: &str, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();

        self.products
            .iter()
            .filter(|product| category == ALL_CATEGORIES || product.category == category)
            .filter(|product| {
                query.is_empty()
                    || product.title.to_lowercase().contains(&query)
                    || product.desc.to_lowercase().contains(&query)
                    || product.category.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Look up a product, falling back to the placeholder when the id has
    /// left the feed.
    #[must_use]
    pub fn resolve_or_placeholder(&self, id: &str) -> Product {
        self.resolve(id)
            .cloned()
            .unwrap_or_else(|| Product::placeholder(id))
    }
}

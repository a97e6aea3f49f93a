//! Cart
//!
//! Quantity mapping keyed by product id, persisted through the storage
//! adapter on every mutation. Quantities are always at least 1; an entry
//! that would drop below 1 is removed, not stored.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::{
    catalog::Catalog,
    pricing::{discounted, round2, tax},
    storage::{Storage, StorageError},
};

/// One priced cart line, joined against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Product id the quantity is keyed by.
    pub product_id: String,

    /// Display title; a placeholder when the product has left the feed.
    pub title: String,

    /// Unit price after any product discount, rounded to two places.
    pub unit_price: Decimal,

    /// Quantity, at least 1.
    pub quantity: u32,

    /// Image URL, when the catalog still knows the product.
    pub image: Option<String>,
}

/// Priced cart contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    /// Lines ordered by product id.
    pub lines: Vec<CartLine>,

    /// Sum of unit price times quantity across all lines.
    pub subtotal: Decimal,

    /// 10 percent of the subtotal, rounded to two places.
    pub tax: Decimal,

    /// Subtotal plus tax, rounded to two places.
    pub total: Decimal,
}

/// Cart engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: FxHashMap<String, u32>,
}

impl Cart {
    /// Load cart contents from the store.
    #[must_use]
    pub fn load(storage: &Storage) -> Self {
        Self {
            items: storage.cart_items(),
        }
    }

    /// The raw id-to-quantity mapping.
    #[must_use]
    pub fn items(&self) -> &FxHashMap<String, u32> {
        &self.items
    }

    /// Whether the mapping has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of a product, starting from 0 when absent.
    ///
    /// Persists the mapping and refreshes the legacy counter to the new
    /// unit count, as the original storefront does on every add.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn add(&mut self, storage: &mut Storage, product_id: &str) -> Result<(), StorageError> {
        let quantity = self.items.entry(product_id.to_owned()).or_insert(0);
        *quantity += 1;

        storage.set_cart_items(&self.items)?;
        storage.set_legacy_cart_count(self.mapping_count())
    }

    /// Set the quantity for a product, clamped to a minimum of 1.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn set_quantity(
        &mut self,
        storage: &mut Storage,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), StorageError> {
        self.items.insert(product_id.to_owned(), quantity.max(1));

        storage.set_cart_items(&self.items)
    }

    /// Remove a product's line entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn remove(&mut self, storage: &mut Storage, product_id: &str) -> Result<(), StorageError> {
        self.items.remove(product_id);

        storage.set_cart_items(&self.items)
    }

    /// Total unit count.
    ///
    /// Falls back to the legacy single-integer counter only when the
    /// mapping sum is 0; this exact precedence is kept for compatibility
    /// with the older storage format.
    #[must_use]
    pub fn count(&self, storage: &Storage) -> u64 {
        let sum = self.mapping_count();

        if sum > 0 {
            sum
        } else {
            storage.legacy_cart_count()
        }
    }

    fn mapping_count(&self) -> u64 {
        self.items.values().copied().map(u64::from).sum()
    }

    /// Price the cart against the catalog.
    ///
    /// Unit prices use [`discounted`] when the product carries a discount,
    /// the raw price otherwise; lines whose product has left the feed use
    /// the zero-priced placeholder. The subtotal sums already-rounded unit
    /// prices, and tax and total are rounded again; this double rounding is
    /// part of the price contract.
    #[must_use]
    pub fn compute_totals(&self, catalog: &Catalog) -> Totals {
        let mut lines: Vec<CartLine> = self
            .items
            .iter()
            .map(|(id, &quantity)| {
                let product = catalog.resolve_or_placeholder(id);
                let unit_price = if product.discount > 0 {
                    discounted(product.price, product.discount)
                } else {
                    product.price
                };

                CartLine {
                    product_id: id.clone(),
                    title: product.title,
                    unit_price,
                    quantity,
                    image: product.image,
                }
            })
            .collect();

        lines.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        let subtotal: Decimal = lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum();
        let tax = tax(subtotal);
        let total = round2(subtotal + tax);

        Totals {
            lines,
            subtotal,
            tax,
            total,
        }
    }

    /// Clear the mapping and the legacy counter. Order commit calls this.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be persisted.
    pub fn clear(&mut self, storage: &mut Storage) -> Result<(), StorageError> {
        self.items.clear();

        storage.clear_cart_items()?;
        storage.clear_legacy_cart_count()
    }
}

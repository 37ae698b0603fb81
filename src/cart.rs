//! Cart
//!
//! The client-local cart: an ordered list of lines plus the sidebar flag,
//! written through to [`Storage`] after every mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{Storage, load_state, null_as_default, save_state};

pub mod items;

pub use items::{CartItem, LineKey, NewCartItem};

/// Storage key the cart snapshot is kept under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Persisted cart state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Lines in insertion order
    #[serde(default, deserialize_with = "null_as_default")]
    pub cart_items: Vec<CartItem>,

    /// Whether the cart sidebar is shown
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_cart_open: bool,
}

/// Cart store
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    state: CartState,
}

impl<S: Storage> CartStore<S> {
    /// Rehydrate the cart from `storage`.
    ///
    /// Missing or unparsable snapshots yield an empty, closed cart. Lines whose
    /// stored quantity is zero or negative are dropped one by one.
    pub fn open(storage: S) -> Self {
        let mut state: CartState = load_state(&storage, CART_STORAGE_KEY);

        let before = state.cart_items.len();
        state.cart_items.retain(|item| item.quantity > 0);

        if state.cart_items.len() != before {
            warn!(
                dropped = before - state.cart_items.len(),
                "dropped cart lines without a positive quantity from snapshot"
            );
        }

        debug!(lines = state.cart_items.len(), "cart rehydrated");

        Self { storage, state }
    }

    /// Add `item` to the cart.
    ///
    /// Merges into the line with the same service, booking date, booking time
    /// and add-ons; otherwise appends a new line. Returns the resulting
    /// quantity of the affected line.
    pub fn add_to_cart(&mut self, item: NewCartItem) -> u32 {
        let key = item.key();
        let existing = self
            .state
            .cart_items
            .iter_mut()
            .find(|line| line.key() == key);

        let quantity = if let Some(line) = existing {
            line.quantity = line.quantity.saturating_add(item.quantity.get());

            debug!(
                service_id = %line.service.id,
                quantity = line.quantity,
                "merged into existing cart line"
            );

            line.quantity
        } else {
            let line = CartItem::from(item);
            let quantity = line.quantity;

            debug!(service_id = %line.service.id, quantity, "appended cart line");

            self.state.cart_items.push(line);

            quantity
        };

        self.persist();

        quantity
    }

    /// Remove every line for `service_id`, whatever its booking qualifiers.
    ///
    /// Returns the number of lines removed.
    pub fn remove_from_cart(&mut self, service_id: &str) -> usize {
        let before = self.state.cart_items.len();

        self.state
            .cart_items
            .retain(|line| line.service_id() != service_id);

        let removed = before - self.state.cart_items.len();

        debug!(service_id, removed, "removed cart lines");

        self.persist();

        removed
    }

    /// Set the quantity of every line for `service_id`.
    ///
    /// A quantity of zero or less removes those lines. Returns the number of
    /// lines affected.
    pub fn update_quantity(&mut self, service_id: &str, quantity: i64) -> usize {
        if quantity <= 0 {
            return self.remove_from_cart(service_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let mut updated = 0;

        for line in self
            .state
            .cart_items
            .iter_mut()
            .filter(|line| line.service.id == service_id)
        {
            line.quantity = quantity;
            updated += 1;
        }

        debug!(service_id, quantity, updated, "updated cart quantity");

        self.persist();

        updated
    }

    /// Remove all lines.
    pub fn clear_cart(&mut self) {
        self.state.cart_items.clear();

        debug!("cleared cart");

        self.persist();
    }

    /// Sum of line totals. Zero for an empty cart.
    pub fn cart_total(&self) -> Decimal {
        self.state.cart_items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities across lines.
    pub fn item_count(&self) -> u64 {
        self.state
            .cart_items
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Show or hide the cart sidebar.
    pub fn set_cart_open(&mut self, open: bool) {
        self.state.is_cart_open = open;

        self.persist();
    }

    /// Whether the cart sidebar is shown.
    pub fn is_cart_open(&self) -> bool {
        self.state.is_cart_open
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.state.cart_items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.state.cart_items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.cart_items.is_empty()
    }

    /// Current state as it would be persisted.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        if let Err(err) = save_state(&self.storage, CART_STORAGE_KEY, &self.state) {
            warn!(error = %err, "failed to persist cart");
        }
    }
}

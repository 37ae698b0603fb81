//! Storefront
//!
//! Composition root tying the catalog, cart, session and notifications
//! together for a single storage profile.

use std::num::NonZeroU32;

use jiff::{Zoned, civil::Date};
use thiserror::Error;
use tracing::info;

use crate::{
    booking::{BookingError, BookingQuote, BookingRequest},
    cart::{CartStore, NewCartItem},
    catalog::{Catalog, Service},
    checkout::{Charges, CheckoutDetails, CheckoutError, OrderConfirmation},
    notifications::{Notification, Notifier},
    session::SessionStore,
    storage::Storage,
};

/// Storefront errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorefrontError {
    /// The catalog has no entry with this id.
    #[error("service not found: {0}")]
    UnknownService(String),

    /// The booking form is invalid.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// Checkout failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Storefront
#[derive(Debug)]
pub struct Storefront<S, N> {
    catalog: Catalog,
    cart: CartStore<S>,
    session: SessionStore<S>,
    notifier: N,
}

impl<S, N> Storefront<S, N>
where
    S: Storage + Clone,
    N: Notifier,
{
    /// Open the cart and session stored in `storage`.
    pub fn open(catalog: Catalog, storage: S, notifier: N) -> Self {
        Self {
            catalog,
            cart: CartStore::open(storage.clone()),
            session: SessionStore::open(storage),
            notifier,
        }
    }

    /// The catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart.
    pub fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// The session.
    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// The session, mutably.
    pub fn session_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.session
    }

    /// The notification sink.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The notification sink, mutably.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Look up a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownService`] if there is no such entry.
    pub fn service(&self, id: &str) -> Result<&Service, StorefrontError> {
        self.catalog
            .get(id)
            .ok_or_else(|| StorefrontError::UnknownService(id.to_string()))
    }

    /// Add `item` to the cart and announce it.
    pub fn add_to_cart(&mut self, item: NewCartItem) -> u32 {
        let name = item.service.name.clone();
        let quantity = self.cart.add_to_cart(item);

        self.notifier.notify(Notification::new(
            "Added to cart",
            format!("{name} has been added to your cart."),
        ));

        quantity
    }

    /// Add `quantity` units of catalog entry `id` with no booking qualifiers.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownService`] if there is no such entry.
    pub fn add_by_id(&mut self, id: &str, quantity: NonZeroU32) -> Result<u32, StorefrontError> {
        let service = self.service(id)?.clone();

        Ok(self.add_to_cart(NewCartItem::new(service).quantity(quantity)))
    }

    /// Validate a booking form against the local date and add it to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the service is unknown or the form is
    /// invalid.
    pub fn book(&mut self, request: &BookingRequest) -> Result<BookingQuote, StorefrontError> {
        self.book_on(request, Zoned::now().date())
    }

    /// Validate a booking form as of `today` and add it to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the service is unknown or the form is
    /// invalid.
    pub fn book_on(
        &mut self,
        request: &BookingRequest,
        today: Date,
    ) -> Result<BookingQuote, StorefrontError> {
        let service = self.service(&request.service_id)?;
        let (item, quote) = request.validate(service, today)?;

        self.add_to_cart(item);

        Ok(quote)
    }

    /// Remove every line for `service_id` and announce it.
    pub fn remove_from_cart(&mut self, service_id: &str) -> usize {
        let removed = self.cart.remove_from_cart(service_id);

        self.notifier.notify(Notification::destructive(
            "Removed from cart",
            "Item has been removed from your cart.",
        ));

        removed
    }

    /// Set the quantity of every line for `service_id`; zero or less removes.
    pub fn update_quantity(&mut self, service_id: &str, quantity: i64) -> usize {
        if quantity <= 0 {
            return self.remove_from_cart(service_id);
        }

        self.cart.update_quantity(service_id, quantity)
    }

    /// Empty the cart and announce it.
    pub fn clear_cart(&mut self) {
        self.cart.clear_cart();

        self.notifier.notify(Notification::new(
            "Cart Cleared",
            "All items have been removed from your cart.",
        ));
    }

    /// Show or hide the cart sidebar.
    pub fn set_cart_open(&mut self, open: bool) {
        self.cart.set_cart_open(open);
    }

    /// Place the order for everything in the cart, then empty it.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError::Checkout`] if the details are invalid or
    /// the cart is empty; the cart is left untouched.
    pub fn checkout(
        &mut self,
        details: CheckoutDetails,
        charges: &Charges,
    ) -> Result<OrderConfirmation, StorefrontError> {
        let confirmation = OrderConfirmation::new(details, self.cart.items().to_vec(), charges)?;

        info!(
            reference = %confirmation.reference,
            lines = confirmation.lines.len(),
            total = %confirmation.breakdown.total,
            "order placed"
        );

        self.cart.clear_cart();

        Ok(confirmation)
    }
}

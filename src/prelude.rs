//! Tripcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    booking::{BookingError, BookingQuote, BookingRequest, TIME_SLOTS},
    cart::{CART_STORAGE_KEY, CartItem, CartState, CartStore, LineKey, NewCartItem},
    catalog::{AddOn, BookingOptions, Catalog, CatalogError, Category, Service},
    checkout::{
        Charges, CheckoutDetails, CheckoutError, OrderConfirmation, PaymentMethod, PriceBreakdown,
    },
    money::format_amount,
    notifications::{LogNotifier, Notification, Notifier, Toast, Toasts, Variant},
    receipt::ReceiptError,
    session::{SESSION_STORAGE_KEY, SessionState, SessionStore, User},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    storefront::{Storefront, StorefrontError},
};

//! Tripcart
//!
//! Tripcart is the cart engine behind a travel storefront: a catalog of bookable services and
//! simple products, a persisted shopping cart keyed by booking details, and the booking and
//! checkout flows built on top of it.

pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod money;
pub mod notifications;
pub mod prelude;
pub mod receipt;
pub mod session;
pub mod storage;
pub mod storefront;

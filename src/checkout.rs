//! Checkout

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::cart::CartItem;

/// Checkout errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Nothing to check out.
    #[error("cart is empty")]
    EmptyCart,
}

/// Fees and discounts applied on top of the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Charges {
    /// Flat service fee
    pub service_fee: Decimal,

    /// Flat taxes
    pub taxes: Decimal,

    /// Subtotal above which `threshold_discount` applies
    pub discount_threshold: Option<Decimal>,

    /// Flat discount for large orders
    pub threshold_discount: Decimal,
}

impl Charges {
    /// Checkout flow: a flat 4 service fee.
    pub fn checkout() -> Self {
        Self {
            service_fee: Decimal::new(4, 0),
            ..Self::default()
        }
    }

    /// Cart page: 15 service fee plus 10 taxes.
    pub fn cart_page() -> Self {
        Self {
            service_fee: Decimal::new(15, 0),
            taxes: Decimal::new(10, 0),
            ..Self::default()
        }
    }

    /// Cart sidebar: 20 off orders above 300.
    pub fn sidebar() -> Self {
        Self {
            discount_threshold: Some(Decimal::new(300, 0)),
            threshold_discount: Decimal::new(20, 0),
            ..Self::default()
        }
    }
}

/// Subtotal, charges and grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Cart total
    pub subtotal: Decimal,

    /// Service fee
    pub service_fee: Decimal,

    /// Taxes
    pub taxes: Decimal,

    /// Discount applied
    pub discount: Decimal,

    /// Amount due
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Apply `charges` to `subtotal`.
    pub fn new(subtotal: Decimal, charges: &Charges) -> Self {
        let discount = match charges.discount_threshold {
            Some(threshold) if subtotal > threshold => charges.threshold_discount,
            _ => Decimal::ZERO,
        };

        Self {
            subtotal,
            service_fee: charges.service_fee,
            taxes: charges.taxes,
            discount,
            total: subtotal + charges.service_fee + charges.taxes - discount,
        }
    }
}

/// Customer details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Contact email
    pub email: String,

    /// Full name
    pub name: String,

    /// Shipping address
    pub address: String,
}

impl CheckoutDetails {
    /// Check every field is filled in and the email looks valid.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] for the first invalid field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let email = self.email.trim();

        if email.is_empty() {
            return Err(CheckoutError::MissingField("email"));
        }

        if !is_plausible_email(email) {
            return Err(CheckoutError::InvalidEmail(email.to_string()));
        }

        if self.name.trim().is_empty() {
            return Err(CheckoutError::MissingField("name"));
        }

        if self.address.trim().is_empty() {
            return Err(CheckoutError::MissingField("address"));
        }

        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.contains(char::is_whitespace)
}

/// How the order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    /// Pay on delivery; no payment details are collected.
    #[default]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery (COD)",
        }
    }
}

/// A completed checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Booking reference, e.g. `BK4582913`
    pub reference: String,

    /// Customer details
    pub customer: CheckoutDetails,

    /// Purchased lines
    pub lines: Vec<CartItem>,

    /// Amounts charged
    pub breakdown: PriceBreakdown,

    /// Payment method
    pub payment: PaymentMethod,
}

impl OrderConfirmation {
    /// Confirm `lines` for `customer`.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the details are invalid or there are no
    /// lines.
    pub fn new(
        customer: CheckoutDetails,
        lines: Vec<CartItem>,
        charges: &Charges,
    ) -> Result<Self, CheckoutError> {
        customer.validate()?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let subtotal = lines.iter().map(CartItem::line_total).sum();

        Ok(Self {
            reference: booking_reference(Uuid::now_v7()),
            customer,
            lines,
            breakdown: PriceBreakdown::new(subtotal, charges),
            payment: PaymentMethod::CashOnDelivery,
        })
    }

    /// Currency of the order, taken from the first line.
    pub fn currency(&self) -> &str {
        self.lines
            .first()
            .map_or("USD", |line| line.service.currency.as_str())
    }
}

/// `BK` followed by seven digits drawn from the random bits of `uuid`.
pub fn booking_reference(uuid: Uuid) -> String {
    format!("BK{:07}", uuid.as_u128() % 10_000_000)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use testresult::TestResult;

    use super::*;
    use crate::{cart::NewCartItem, catalog::Service};

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            email: "ana@example.com".to_string(),
            name: "Ana Lima".to_string(),
            address: "123 Main St, Lisbon".to_string(),
        }
    }

    fn line(price: i64, quantity: u32) -> CartItem {
        let service = Service::new("1", "Transfer", Decimal::new(price, 0), "USD");

        CartItem::from(
            NewCartItem::new(service).quantity(NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN)),
        )
    }

    #[test]
    fn checkout_charges_add_service_fee() {
        let breakdown = PriceBreakdown::new(Decimal::new(160, 0), &Charges::checkout());

        assert_eq!(breakdown.total, Decimal::new(164, 0));
    }

    #[test]
    fn cart_page_charges_add_fee_and_taxes() {
        let breakdown = PriceBreakdown::new(Decimal::new(100, 0), &Charges::cart_page());

        assert_eq!(breakdown.total, Decimal::new(125, 0));
    }

    #[test]
    fn sidebar_discount_only_above_threshold() {
        let at = PriceBreakdown::new(Decimal::new(300, 0), &Charges::sidebar());
        let above = PriceBreakdown::new(Decimal::new(301, 0), &Charges::sidebar());

        assert_eq!(at.discount, Decimal::ZERO);
        assert_eq!(above.discount, Decimal::new(20, 0));
        assert_eq!(above.total, Decimal::new(281, 0));
    }

    #[test]
    fn validates_details() {
        let cases = [
            (
                CheckoutDetails {
                    email: " ".to_string(),
                    ..details()
                },
                CheckoutError::MissingField("email"),
            ),
            (
                CheckoutDetails {
                    email: "ana.example.com".to_string(),
                    ..details()
                },
                CheckoutError::InvalidEmail("ana.example.com".to_string()),
            ),
            (
                CheckoutDetails {
                    name: String::new(),
                    ..details()
                },
                CheckoutError::MissingField("name"),
            ),
            (
                CheckoutDetails {
                    address: "  ".to_string(),
                    ..details()
                },
                CheckoutError::MissingField("address"),
            ),
        ];

        for (candidate, expected) in cases {
            assert_eq!(candidate.validate(), Err(expected));
        }
    }

    #[test]
    fn confirmation_totals_lines() -> TestResult {
        let confirmation = OrderConfirmation::new(
            details(),
            vec![line(80, 2), line(30, 1)],
            &Charges::checkout(),
        )?;

        assert_eq!(confirmation.breakdown.subtotal, Decimal::new(190, 0));
        assert_eq!(confirmation.breakdown.total, Decimal::new(194, 0));
        assert_eq!(confirmation.payment, PaymentMethod::CashOnDelivery);
        assert_eq!(confirmation.currency(), "USD");

        Ok(())
    }

    #[test]
    fn confirmation_requires_lines() {
        let result = OrderConfirmation::new(details(), Vec::new(), &Charges::checkout());

        assert_eq!(result.err(), Some(CheckoutError::EmptyCart));
    }

    #[test]
    fn reference_has_seven_digits() {
        let reference = booking_reference(Uuid::from_u128(12_345_678_901));

        assert_eq!(reference, "BK5678901");
        assert_eq!(booking_reference(Uuid::from_u128(42)), "BK0000042");
    }
}

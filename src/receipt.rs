//! Receipt
//!
//! Tabular rendering of cart lines and order confirmations.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartItem,
    checkout::{OrderConfirmation, PriceBreakdown},
    money::format_amount,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Render `items` as a table.
pub fn cart_table(items: &[CartItem]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Booking", "Qty", "Unit", "Add-ons", "Line Total"]);

    for (idx, item) in items.iter().enumerate() {
        let currency = item.service.currency.as_str();

        builder.push_record([
            format!("#{:<3}", idx + 1),
            item.service.name.clone(),
            booking_label(item),
            item.quantity.to_string(),
            format_amount(item.service.price, currency),
            add_ons_label(item),
            format_amount(item.line_total(), currency),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());
    table.modify(Columns::new(6..7), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    table.to_string()
}

fn booking_label(item: &CartItem) -> String {
    match (item.booking_date, item.booking_time.as_deref()) {
        (Some(date), Some(time)) => format!("{} • {time}", date.strftime("%b %-d, %Y")),
        (Some(date), None) => date.strftime("%b %-d, %Y").to_string(),
        (None, Some(time)) => time.to_string(),
        (None, None) => String::new(),
    }
}

fn add_ons_label(item: &CartItem) -> String {
    let currency = item.service.currency.as_str();

    item.selected_add_ons
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|add_on| format!("+ {} {}", add_on.name, format_amount(add_on.price, currency)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `items` followed by the cart subtotal.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing fails.
pub fn write_cart(
    mut out: impl io::Write,
    items: &[CartItem],
    subtotal: Decimal,
    currency: &str,
) -> Result<(), ReceiptError> {
    if items.is_empty() {
        writeln!(out, "Your cart is empty.")?;

        return Ok(());
    }

    writeln!(out, "{}", cart_table(items))?;
    writeln!(out, "Subtotal: {}", format_amount(subtotal, currency))?;

    Ok(())
}

/// Write the subtotal, charges and total.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing fails.
pub fn write_breakdown(
    mut out: impl io::Write,
    breakdown: &PriceBreakdown,
    currency: &str,
) -> Result<(), ReceiptError> {
    writeln!(out, "Subtotal:    {}", format_amount(breakdown.subtotal, currency))?;

    if !breakdown.service_fee.is_zero() {
        writeln!(out, "Service fee: {}", format_amount(breakdown.service_fee, currency))?;
    }

    if !breakdown.taxes.is_zero() {
        writeln!(out, "Taxes:       {}", format_amount(breakdown.taxes, currency))?;
    }

    if !breakdown.discount.is_zero() {
        writeln!(out, "Discount:   -{}", format_amount(breakdown.discount, currency))?;
    }

    writeln!(out, "Total:       {}", format_amount(breakdown.total, currency))?;

    Ok(())
}

impl OrderConfirmation {
    /// Write the confirmation.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        writeln!(out, "Booking Confirmed!")?;
        writeln!(out, "Confirmation # {}", self.reference)?;
        writeln!(out, "{} <{}>", self.customer.name, self.customer.email)?;
        writeln!(out, "{}", self.customer.address)?;
        writeln!(out, "\n{}", cart_table(&self.lines))?;

        write_breakdown(&mut out, &self.breakdown, self.currency())?;

        writeln!(out, "Payment: {}", self.payment.label())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;
    use crate::{
        cart::NewCartItem,
        catalog::{AddOn, Service},
        checkout::{Charges, CheckoutDetails},
    };

    fn booked_tour() -> CartItem {
        let service = Service::new("4", "Walking Tour", Decimal::new(40, 0), "USD");

        CartItem::from(
            NewCartItem::new(service)
                .booking_date(date(2025, 3, 14))
                .booking_time("9:00 AM")
                .add_ons(vec![AddOn::new("Lunch", Decimal::new(25, 0))]),
        )
    }

    #[test]
    fn table_lists_lines_with_booking_details() {
        let table = cart_table(&[booked_tour()]);

        assert!(table.contains("Walking Tour"), "{table}");
        assert!(table.contains("Mar 14, 2025 • 9:00 AM"), "{table}");
        assert!(table.contains("+ Lunch $25.00"), "{table}");
        assert!(table.contains("$65.00"), "{table}");
    }

    #[test]
    fn empty_cart_message() -> TestResult {
        let mut out = Vec::new();

        write_cart(&mut out, &[], Decimal::ZERO, "USD")?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty.\n");

        Ok(())
    }

    #[test]
    fn confirmation_includes_reference_and_total() -> TestResult {
        let confirmation = OrderConfirmation::new(
            CheckoutDetails {
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
                address: "1 Rua Augusta".to_string(),
            },
            vec![booked_tour()],
            &Charges::checkout(),
        )?;

        let mut out = Vec::new();

        confirmation.write_to(&mut out)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains(&confirmation.reference), "{text}");
        assert!(text.contains("Total:       $69.00"), "{text}");
        assert!(text.contains("Cash on Delivery (COD)"), "{text}");

        Ok(())
    }
}

//! Booking
//!
//! Session booking form: quote calculation and the checks a booking must
//! pass before it is added to the cart.

use std::num::NonZeroU32;

use jiff::civil::Date;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::{
    cart::NewCartItem,
    catalog::{AddOn, BookingOptions, Service},
};

/// Time slots offered by the booking form.
pub const TIME_SLOTS: [&str; 4] = ["9:00 AM", "10:30 AM", "12:00 PM", "1:30 PM"];

/// Most sessions a single booking may reserve.
pub const MAX_SESSIONS: u32 = 10;

/// Sessions needed before the booking discount applies.
pub const DISCOUNT_MIN_SESSIONS: u32 = 3;

/// Booking form errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    /// The service has no booking options.
    #[error("service {0} cannot be booked")]
    NotBookable(String),

    /// No date was chosen.
    #[error("Please select a date.")]
    MissingDate,

    /// The chosen date is before today.
    #[error("{0} is in the past.")]
    DateInPast(Date),

    /// No time slot was chosen.
    #[error("Please select a time.")]
    MissingTime,

    /// The time slot is not offered.
    #[error("unknown time slot: {0}")]
    UnknownTimeSlot(String),

    /// Fewer than one session.
    #[error("At least 1 required")]
    TooFewSessions,

    /// More than [`MAX_SESSIONS`] sessions.
    #[error("Max 10 allowed")]
    TooManySessions,

    /// An add-on name does not belong to the service.
    #[error("unknown add-on: {0}")]
    UnknownAddOn(String),
}

/// Price quote shown while filling in the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuote {
    /// Price per session before add-ons
    pub per_session: Decimal,

    /// Add-ons per session
    pub add_ons: Decimal,

    /// Number of sessions
    pub sessions: u32,

    /// `(per_session + add_ons) * sessions`
    pub subtotal: Decimal,

    /// Multi-session discount, rounded to whole units
    pub discount: Decimal,

    /// `subtotal - discount`
    pub total: Decimal,
}

impl BookingQuote {
    /// Quote `sessions` sessions with the given add-ons.
    pub fn new(options: &BookingOptions, sessions: u32, add_ons: &[AddOn]) -> Self {
        let per_session = options.price_per_session;
        let add_ons_total: Decimal = add_ons.iter().map(|add_on| add_on.price).sum();
        let subtotal = (per_session + add_ons_total) * Decimal::from(sessions);

        let discount = if sessions >= DISCOUNT_MIN_SESSIONS {
            (subtotal * options.discount)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };

        Self {
            per_session,
            add_ons: add_ons_total,
            sessions,
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}

/// A filled-in booking form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Service being booked
    pub service_id: String,

    /// Chosen date
    pub date: Option<Date>,

    /// Chosen time slot
    pub time: Option<String>,

    /// Number of sessions
    pub sessions: u32,

    /// Names of the chosen add-ons
    pub add_ons: Vec<String>,
}

impl BookingRequest {
    /// A single-session request with nothing chosen yet.
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            date: None,
            time: None,
            sessions: 1,
            add_ons: Vec::new(),
        }
    }

    /// Set the date.
    #[must_use]
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the time slot.
    #[must_use]
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Set the number of sessions.
    #[must_use]
    pub fn sessions(mut self, sessions: u32) -> Self {
        self.sessions = sessions;
        self
    }

    /// Choose an add-on by name.
    #[must_use]
    pub fn add_on(mut self, name: impl Into<String>) -> Self {
        self.add_ons.push(name.into());
        self
    }

    /// Check the form against `service` and build the cart entry and quote.
    ///
    /// Dates before `today` are rejected. Selected add-ons keep the order the
    /// service lists them in.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError`] describing the first problem found.
    pub fn validate(
        &self,
        service: &Service,
        today: Date,
    ) -> Result<(NewCartItem, BookingQuote), BookingError> {
        let options = service
            .booking
            .as_ref()
            .ok_or_else(|| BookingError::NotBookable(service.id.clone()))?;

        let date = self.date.ok_or(BookingError::MissingDate)?;

        if date < today {
            return Err(BookingError::DateInPast(date));
        }

        let time = self.time.as_deref().ok_or(BookingError::MissingTime)?;

        if !TIME_SLOTS.contains(&time) {
            return Err(BookingError::UnknownTimeSlot(time.to_string()));
        }

        let sessions = NonZeroU32::new(self.sessions).ok_or(BookingError::TooFewSessions)?;

        if self.sessions > MAX_SESSIONS {
            return Err(BookingError::TooManySessions);
        }

        if let Some(unknown) = self
            .add_ons
            .iter()
            .find(|name| options.add_on(name).is_none())
        {
            return Err(BookingError::UnknownAddOn(unknown.clone()));
        }

        let add_ons: Vec<AddOn> = options
            .add_ons
            .iter()
            .filter(|add_on| self.add_ons.contains(&add_on.name))
            .cloned()
            .collect();

        let quote = BookingQuote::new(options, self.sessions, &add_ons);

        let item = NewCartItem::new(service.clone())
            .quantity(sessions)
            .booking_date(date)
            .booking_time(time)
            .add_ons(add_ons);

        Ok((item, quote))
    }
}

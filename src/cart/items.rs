//! Cart Items

use std::num::NonZeroU32;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::catalog::{AddOn, Service};

/// A line in the cart: a catalog entry plus quantity and booking qualifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The catalog entry as it was when added
    #[serde(flatten)]
    pub service: Service,

    /// Units or sessions, always at least one
    #[serde(deserialize_with = "deserialize_quantity")]
    pub quantity: u32,

    /// Booking date
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_booking_date"
    )]
    pub booking_date: Option<Date>,

    /// Time-slot label, e.g. `10:30 AM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_time: Option<String>,

    /// Add-ons chosen for this booking, in selection order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_add_ons: Option<Vec<AddOn>>,
}

impl CartItem {
    /// Identifier of the underlying service.
    pub fn service_id(&self) -> &str {
        &self.service.id
    }

    /// Sum of the selected add-on prices for a single unit.
    pub fn add_ons_total(&self) -> Decimal {
        add_ons_total(self.selected_add_ons.as_deref())
    }

    /// Price of a single unit including add-ons.
    pub fn unit_total(&self) -> Decimal {
        self.service.price + self.add_ons_total()
    }

    /// `(unit price + add-ons) * quantity`
    pub fn line_total(&self) -> Decimal {
        self.unit_total() * Decimal::from(self.quantity)
    }

    /// The compound key identifying this line.
    pub fn key(&self) -> LineKey<'_> {
        LineKey {
            service_id: &self.service.id,
            booking_date: self.booking_date,
            booking_time: self.booking_time.as_deref(),
            add_ons: self.selected_add_ons.as_deref(),
        }
    }
}

/// Compound identity of a cart line.
///
/// Add-ons compare by order and content; no add-ons and an empty selection
/// are different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey<'a> {
    /// Service identifier
    pub service_id: &'a str,

    /// Booking date
    pub booking_date: Option<Date>,

    /// Booking time-slot label
    pub booking_time: Option<&'a str>,

    /// Selected add-ons
    pub add_ons: Option<&'a [AddOn]>,
}

/// Request to add a service to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    /// The catalog entry
    pub service: Service,

    /// Units or sessions to add
    pub quantity: NonZeroU32,

    /// Booking date
    pub booking_date: Option<Date>,

    /// Booking time-slot label
    pub booking_time: Option<String>,

    /// Selected add-ons
    pub selected_add_ons: Option<Vec<AddOn>>,
}

impl NewCartItem {
    /// A single unit of `service` with no booking qualifiers.
    pub fn new(service: Service) -> Self {
        Self {
            service,
            quantity: NonZeroU32::MIN,
            booking_date: None,
            booking_time: None,
            selected_add_ons: None,
        }
    }

    /// Set the quantity.
    #[must_use]
    pub fn quantity(mut self, quantity: NonZeroU32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the booking date.
    #[must_use]
    pub fn booking_date(mut self, date: Date) -> Self {
        self.booking_date = Some(date);
        self
    }

    /// Set the booking time-slot label.
    #[must_use]
    pub fn booking_time(mut self, time: impl Into<String>) -> Self {
        self.booking_time = Some(time.into());
        self
    }

    /// Set the selected add-ons.
    #[must_use]
    pub fn add_ons(mut self, add_ons: Vec<AddOn>) -> Self {
        self.selected_add_ons = Some(add_ons);
        self
    }

    /// The compound key this request merges on.
    pub fn key(&self) -> LineKey<'_> {
        LineKey {
            service_id: &self.service.id,
            booking_date: self.booking_date,
            booking_time: self.booking_time.as_deref(),
            add_ons: self.selected_add_ons.as_deref(),
        }
    }
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            service: item.service,
            quantity: item.quantity.get(),
            booking_date: item.booking_date,
            booking_time: item.booking_time,
            selected_add_ons: item.selected_add_ons,
        }
    }
}

/// Sum of add-on prices; `None` sums to zero.
pub fn add_ons_total(add_ons: Option<&[AddOn]>) -> Decimal {
    add_ons
        .unwrap_or_default()
        .iter()
        .map(|add_on| add_on.price)
        .sum()
}

/// Clamps stored quantities into `0..=u32::MAX`; the store drops zero lines.
fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let quantity = i64::deserialize(deserializer)?;

    Ok(u32::try_from(quantity.max(0)).unwrap_or(u32::MAX))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping the UTC date.
fn deserialize_booking_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(date) = raw.parse::<Date>() {
        return Ok(Some(date));
    }

    raw.parse::<Timestamp>()
        .map(|timestamp| Some(timestamp.to_zoned(TimeZone::UTC).date()))
        .map_err(D::Error::custom)
}

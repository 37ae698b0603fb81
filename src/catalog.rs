//! Catalog
//!
//! Read-only services and products offered by the storefront, loaded from a
//! YAML fixture.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::is_known_currency;

const BUNDLED_CATALOG: &str = include_str!("../fixtures/catalog.yml");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two entries share an identifier
    #[error("Duplicate service id: {0}")]
    DuplicateId(String),

    /// A price is negative
    #[error("Negative price for service {0}")]
    NegativePrice(String),

    /// A booking discount is outside `0..=1`
    #[error("Invalid discount for service {0}")]
    InvalidDiscount(String),

    /// Unknown currency code
    #[error("Unknown currency code {1} for service {0}")]
    UnknownCurrency(String, String),
}

/// Named add-on offered with a bookable service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddOn {
    /// Display name
    pub name: String,

    /// Price added per session
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl AddOn {
    /// Create an add-on.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Structured booking metadata for services sold by session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOptions {
    /// Price of a single session
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_session: Decimal,

    /// Fractional discount for multi-session bookings, e.g. `0.1`
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Optional extras
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
}

impl BookingOptions {
    /// Find an add-on by name.
    pub fn add_on(&self, name: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| add_on.name == name)
    }
}

/// Catalog entry: a bookable service or a purchasable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Long-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// ISO currency code
    pub currency: String,

    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Category name
    #[serde(default)]
    pub category: String,

    /// Average rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Review count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,

    /// Shown on the home page
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub featured: bool,

    /// Part of this week's deals
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub weekly_deal: bool,

    /// Flagged as popular
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub popular: bool,

    /// Product feature bullet points
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    /// Display price label, e.g. `$12.99/mo`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_description: Option<String>,

    /// Booking metadata, present for services sold by session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingOptions>,
}

impl Service {
    /// Create a minimal catalog entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            long_description: None,
            price,
            currency: currency.into(),
            image: None,
            category: String::new(),
            rating: None,
            reviews: None,
            featured: false,
            weekly_deal: false,
            popular: false,
            features: Vec::new(),
            price_description: None,
            booking: None,
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Attach booking metadata.
    #[must_use]
    pub fn with_booking(mut self, booking: BookingOptions) -> Self {
        self.booking = Some(booking);
        self
    }

    /// Whether the service is sold by bookable session.
    pub fn is_bookable(&self) -> bool {
        self.booking.is_some()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.price.is_sign_negative() {
            return Err(CatalogError::NegativePrice(self.id.clone()));
        }

        if !is_known_currency(&self.currency) {
            return Err(CatalogError::UnknownCurrency(
                self.id.clone(),
                self.currency.clone(),
            ));
        }

        if let Some(booking) = &self.booking {
            let negative = booking.price_per_session.is_sign_negative()
                || booking
                    .add_ons
                    .iter()
                    .any(|add_on| add_on.price.is_sign_negative());

            if negative {
                return Err(CatalogError::NegativePrice(self.id.clone()));
            }

            if booking.discount < Decimal::ZERO || booking.discount > Decimal::ONE {
                return Err(CatalogError::InvalidDiscount(self.id.clone()));
            }
        }

        Ok(())
    }
}

/// Service category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name, matched against [`Service::category`]
    pub name: String,

    /// URL slug
    pub slug: String,
}

/// Wrapper for the catalog YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    #[serde(default)]
    categories: Vec<Category>,

    #[serde(default)]
    services: Vec<Service>,
}

/// The storefront catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    services: Vec<Service>,
    index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from categories and services.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for duplicate ids, negative prices, invalid
    /// discounts or unknown currencies.
    pub fn new(categories: Vec<Category>, services: Vec<Service>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();

        for (position, service) in services.iter().enumerate() {
            service.validate()?;

            if index.insert(service.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(service.id.clone()));
            }
        }

        Ok(Self {
            categories,
            services,
            index,
        })
    }

    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the bundled fixture is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml(BUNDLED_CATALOG)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        Self::new(fixture.categories, fixture.services)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Look up a service by id.
    pub fn get(&self, id: &str) -> Option<&Service> {
        self.index
            .get(id)
            .and_then(|position| self.services.get(*position))
    }

    /// All services in catalog order.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// All categories.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Services in the named category.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Service> {
        self.services
            .iter()
            .filter(move |service| service.category == category)
    }

    /// Up to `limit` other services sharing the category of `id`.
    pub fn related(&self, id: &str, limit: usize) -> Vec<&Service> {
        let Some(service) = self.get(id) else {
            return Vec::new();
        };

        self.in_category(&service.category)
            .filter(|other| other.id != service.id)
            .take(limit)
            .collect()
    }

    /// Featured services.
    pub fn featured(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|service| service.featured)
    }

    /// Popular services.
    pub fn popular(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|service| service.popular)
    }

    /// This week's deals.
    pub fn weekly_deals(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|service| service.weekly_deal)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

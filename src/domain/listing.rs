// src/domain/listing.rs
use serde::{Deserialize, Serialize};

use crate::domain::parse;

/// One housing unit as received from the data source.
/// Derived attributes are computed on access and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    /// Raw price text, e.g. "₦1,200,000 / month".
    pub price: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Conventionally "<area>, <city>".
    pub location: String,
    /// [property type, listing type, ...]
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default)]
    pub image: String,
}

impl Listing {
    /// Numeric price, 0 when the raw field doesn't hold a usable amount.
    pub fn price_numeric(&self) -> f64 {
        self.valid_price().unwrap_or(0.0)
    }

    /// The parsed price when it is usable, i.e. strictly positive.
    pub fn valid_price(&self) -> Option<f64> {
        parse::parse_price(&self.price).filter(|p| *p > 0.0)
    }

    pub fn city(&self) -> &str {
        parse::split_location(&self.location).1
    }

    pub fn area(&self) -> &str {
        parse::split_location(&self.location).0
    }

    pub fn property_type(&self) -> &str {
        parse::property_type(&self.status)
    }

    /// "For Rent", "For Sale", "Short Let", ...
    pub fn listing_type(&self) -> &str {
        parse::listing_type(&self.status)
    }
}

/// A listing with its derived attributes spelled out, for single-listing reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingDetail<'a> {
    #[serde(flatten)]
    pub listing: &'a Listing,
    pub price_numeric: f64,
    pub city: &'a str,
    pub area: &'a str,
    pub property_type: &'a str,
    pub listing_type: &'a str,
}

impl<'a> From<&'a Listing> for ListingDetail<'a> {
    fn from(listing: &'a Listing) -> Self {
        Self {
            listing,
            price_numeric: listing.price_numeric(),
            city: listing.city(),
            area: listing.area(),
            property_type: listing.property_type(),
            listing_type: listing.listing_type(),
        }
    }
}

/// Optional, conjunctive listing predicates. Empty strings and `None`
/// bounds mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub location: String,
    pub property_type: String,
    pub city: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub max_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub max_bathrooms: Option<u32>,
}

impl ListingFilter {
    /// Price bounds must be finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        for (name, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(value) = bound {
                if !value.is_finite() || value < 0.0 {
                    return Err(format!("{name} must be a non-negative number"));
                }
            }
        }
        Ok(())
    }
}

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Pagination as supplied by the caller, before defaults are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationRequest {
    pub page: i64,
    pub limit: i64,
}

/// Pagination after defaults: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl PaginationRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    pub fn normalize(self) -> Pagination {
        let page = if self.page <= 0 {
            DEFAULT_PAGE
        } else {
            usize::try_from(self.page).unwrap_or(usize::MAX)
        };

        let limit = if self.limit <= 0 {
            DEFAULT_LIMIT
        } else {
            usize::try_from(self.limit).unwrap_or(MAX_LIMIT).min(MAX_LIMIT)
        };

        Pagination { page, limit }
    }
}

impl Pagination {
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

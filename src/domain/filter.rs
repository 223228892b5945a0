// src/domain/filter.rs

use crate::domain::listing::{Listing, ListingFilter};
use crate::domain::parse::{contains_ci, eq_ci};

/// Returns true when `listing` satisfies every predicate set on `filter`.
///
/// The price range only applies to listings with a valid price; a listing
/// without one passes regardless of the bounds. Bedroom and bathroom bounds
/// are always enforced, zero counts included.
pub fn matches(listing: &Listing, filter: &ListingFilter) -> bool {
    if !filter.location.is_empty() && !contains_ci(&listing.location, &filter.location) {
        return false;
    }

    if !filter.city.is_empty() && !contains_ci(listing.city(), &filter.city) {
        return false;
    }

    if !filter.property_type.is_empty() && !eq_ci(listing.property_type(), &filter.property_type)
    {
        return false;
    }

    if let Some(price) = listing.valid_price() {
        if !within(price, filter.min_price, filter.max_price) {
            return false;
        }
    }

    within(listing.bedrooms, filter.min_bedrooms, filter.max_bedrooms)
        && within(listing.bathrooms, filter.min_bathrooms, filter.max_bathrooms)
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    if let Some(min) = min {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max {
        if value > max {
            return false;
        }
    }
    true
}

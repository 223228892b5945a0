// src/domain/query.rs
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::db::listings::ListingStore;
use crate::domain::listing::{Listing, ListingFilter, PaginationRequest};
use crate::domain::listing_error::{ListingError, LoadError};
use crate::domain::pagination::{calculate_metadata, PageMetadata};
use crate::domain::parse::eq_ci;

/// Relative price band used by `similar_listings`.
const SIMILAR_PRICE_TOLERANCE: f64 = 0.20;
const SIMILAR_BEDROOM_TOLERANCE: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage {
    pub items: Vec<Listing>,
    pub meta: PageMetadata,
}

/// Read-only queries over a `ListingStore`.
///
/// Every operation takes one snapshot up front and works against it, so a
/// concurrent reload never mixes two collections in one result.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<ListingStore>,
}

impl ListingService {
    pub fn new(store: Arc<ListingStore>) -> Self {
        Self { store }
    }

    /// Filtered page of listings ordered by ascending id.
    ///
    /// A page past the end is empty but still reports the real total.
    pub fn list_page(
        &self,
        filter: &ListingFilter,
        pagination: PaginationRequest,
    ) -> Result<ListingPage, ListingError> {
        filter.validate().map_err(ListingError::InvalidInput)?;
        let pagination = pagination.normalize();

        let mut matched = self.store.snapshot().get_all(filter);
        // Stable: duplicate ids keep load order.
        matched.sort_by_key(|l| l.id);

        let total = matched.len();
        let offset = pagination.offset();
        let items = if offset >= total {
            Vec::new()
        } else {
            let end = offset.saturating_add(pagination.limit).min(total);
            matched.drain(offset..end).collect()
        };

        debug!(
            page = pagination.page,
            limit = pagination.limit,
            total,
            returned = items.len(),
            "listed page"
        );

        Ok(ListingPage {
            items,
            meta: calculate_metadata(pagination.page, pagination.limit, total),
        })
    }

    /// Location search: a non-empty `query` becomes the location filter
    /// unless the caller already set one.
    pub fn search(
        &self,
        query: &str,
        filter: &ListingFilter,
        pagination: PaginationRequest,
    ) -> Result<ListingPage, ListingError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ListingError::InvalidInput(
                "search query is required".to_string(),
            ));
        }

        let mut filter = filter.clone();
        if filter.location.is_empty() {
            filter.location = query.to_string();
        }

        self.list_page(&filter, pagination)
    }

    /// Free-text match over title, location and property type, load order.
    pub fn search_text(&self, query: &str) -> Vec<Listing> {
        self.store.snapshot().search_text(query)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Listing, ListingError> {
        self.store
            .snapshot()
            .get_by_id(id)
            .cloned()
            .ok_or(ListingError::NotFound(id))
    }

    pub fn filters_metadata(&self) -> FiltersMetadata {
        let snap = self.store.snapshot();

        let property_types = snap.unique_property_types();
        let filters = FILTER_PARAMS
            .iter()
            .map(|spec| FilterParam {
                spec: *spec,
                options: (spec.name == "property_type").then(|| property_types.clone()),
            })
            .collect();

        FiltersMetadata {
            locations: snap.unique_locations(),
            property_types,
            price_range: snap.price_range().map(|r| Bounds::new(*r.start(), *r.end())),
            bedroom_range: snap.bedroom_range().map(|r| Bounds::new(*r.start(), *r.end())),
            bathroom_range: snap.bathroom_range().map(|r| Bounds::new(*r.start(), *r.end())),
            filters,
            pagination: PAGINATION_PARAMS,
        }
    }

    /// Aggregates over the whole collection in one pass.
    pub fn stats(&self) -> ListingStats {
        let snap = self.store.snapshot();

        let mut stats = ListingStats {
            total_listings: snap.len(),
            ..Default::default()
        };
        let mut sum = 0.0;
        let mut priced = 0usize;

        for listing in snap.listings() {
            *stats
                .property_types
                .entry(listing.property_type().to_string())
                .or_insert(0) += 1;
            *stats.cities.entry(listing.city().to_string()).or_insert(0) += 1;

            let Some(price) = listing.valid_price() else {
                continue;
            };

            stats.price_ranges.record(price);
            sum += price;
            priced += 1;
            stats.price_stats.minimum = Some(stats.price_stats.minimum.map_or(price, |m| m.min(price)));
            stats.price_stats.maximum = Some(stats.price_stats.maximum.map_or(price, |m| m.max(price)));
        }

        if priced > 0 {
            stats.price_stats.average = sum / priced as f64;
        }

        stats
    }

    /// First `limit` listings, in load order, resembling listing `id`:
    /// same city and property type, bedrooms within one, and price within
    /// 20% of the target's when both prices are known.
    ///
    /// This is a first-N scan, not a best-N ranking.
    pub fn similar_listings(&self, id: i64, limit: usize) -> Result<Vec<Listing>, ListingError> {
        let snap = self.store.snapshot();
        let target = snap.get_by_id(id).ok_or(ListingError::NotFound(id))?;

        let similar: Vec<Listing> = snap
            .listings()
            .iter()
            .filter(|candidate| candidate.id != target.id && is_similar(target, candidate))
            .take(limit)
            .cloned()
            .collect();

        debug!(id, limit, found = similar.len(), "similar listings");
        Ok(similar)
    }

    /// Size of the current collection.
    pub fn total(&self) -> usize {
        self.store.snapshot().len()
    }

    pub fn reload(&self) -> Result<usize, LoadError> {
        self.store.reload()
    }
}

fn is_similar(target: &Listing, candidate: &Listing) -> bool {
    if !eq_ci(candidate.city(), target.city()) {
        return false;
    }
    if !eq_ci(candidate.property_type(), target.property_type()) {
        return false;
    }
    if (i64::from(candidate.bedrooms) - i64::from(target.bedrooms)).abs() > SIMILAR_BEDROOM_TOLERANCE
    {
        return false;
    }

    match (target.valid_price(), candidate.valid_price()) {
        (Some(base), Some(price)) => ((price - base) / base).abs() <= SIMILAR_PRICE_TOLERANCE,
        _ => true,
    }
}

// ---------- statistics ----------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingStats {
    pub total_listings: usize,
    pub property_types: BTreeMap<String, usize>,
    pub cities: BTreeMap<String, usize>,
    pub price_ranges: PriceHistogram,
    pub price_stats: PriceStats,
}

/// Counts of valid prices per bucket, in the source currency's base unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriceHistogram {
    pub under_1m: usize,
    #[serde(rename = "1m_to_2m")]
    pub from_1m_to_2m: usize,
    #[serde(rename = "2m_to_3m")]
    pub from_2m_to_3m: usize,
    #[serde(rename = "3m_to_5m")]
    pub from_3m_to_5m: usize,
    pub above_5m: usize,
}

impl PriceHistogram {
    fn record(&mut self, price: f64) {
        const M: f64 = 1_000_000.0;
        let bucket = if price < M {
            &mut self.under_1m
        } else if price < 2.0 * M {
            &mut self.from_1m_to_2m
        } else if price < 3.0 * M {
            &mut self.from_2m_to_3m
        } else if price < 5.0 * M {
            &mut self.from_3m_to_5m
        } else {
            &mut self.above_5m
        };
        *bucket += 1;
    }
}

/// Over valid-price listings only. `minimum`/`maximum` are `None` when there
/// are no such listings; `average` is then 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceStats {
    pub average: f64,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

// ---------- filter metadata ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiltersMetadata {
    pub locations: Vec<String>,
    pub property_types: Vec<String>,
    pub price_range: Option<Bounds<f64>>,
    pub bedroom_range: Option<Bounds<u32>>,
    pub bathroom_range: Option<Bounds<u32>>,
    pub filters: Vec<FilterParam>,
    pub pagination: &'static [ParamSpec],
}

/// A filter parameter, plus the accepted values when they come from the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterParam {
    #[serde(flatten)]
    pub spec: ParamSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T> {
    fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

/// Client-facing description of one accepted query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<ParamValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(&'static str),
    Int(i64),
}

const fn param(
    name: &'static str,
    kind: &'static str,
    description: &'static str,
    example: ParamValue,
) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        description,
        example: Some(example),
        default: None,
        minimum: None,
        maximum: None,
    }
}

pub static FILTER_PARAMS: &[ParamSpec] = &[
    param("location", "string", "Filter by location (partial match)", ParamValue::Text("Lagos")),
    param("property_type", "string", "Filter by property type (exact match)", ParamValue::Text("House")),
    param("city", "string", "Filter by city (partial match)", ParamValue::Text("Lagos")),
    param("min_price", "integer", "Minimum price filter", ParamValue::Int(1_000_000)),
    param("max_price", "integer", "Maximum price filter", ParamValue::Int(5_000_000)),
    param("min_bedrooms", "integer", "Minimum number of bedrooms", ParamValue::Int(2)),
    param("max_bedrooms", "integer", "Maximum number of bedrooms", ParamValue::Int(5)),
    param("min_bathrooms", "integer", "Minimum number of bathrooms", ParamValue::Int(1)),
    param("max_bathrooms", "integer", "Maximum number of bathrooms", ParamValue::Int(4)),
];

pub static PAGINATION_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "page",
        kind: "integer",
        description: "Page number (starts from 1)",
        example: None,
        default: Some(ParamValue::Int(1)),
        minimum: Some(ParamValue::Int(1)),
        maximum: None,
    },
    ParamSpec {
        name: "limit",
        kind: "integer",
        description: "Number of items per page",
        example: None,
        default: Some(ParamValue::Int(10)),
        minimum: Some(ParamValue::Int(1)),
        maximum: Some(ParamValue::Int(100)),
    },
];

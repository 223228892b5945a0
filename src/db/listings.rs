// src/db/listings.rs
use arc_swap::ArcSwap;
use std::collections::BTreeSet;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::filter::matches;
use crate::domain::listing::{Listing, ListingFilter};
use crate::domain::listing_error::LoadError;
use crate::domain::parse::contains_ci;

/// In-memory listing collection.
///
/// Readers take an `Arc<Snapshot>` and never see a partially replaced
/// collection; `reload` and `replace` swap the whole snapshot at once.
pub struct ListingStore {
    current: ArcSwap<Snapshot>,
    source: Option<PathBuf>,
}

impl ListingStore {
    /// Loads the JSON array at `path`. Fails if the file is missing or
    /// doesn't deserialize into listings; there is no partial load.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let listings = read_listings(&path)?;
        info!(path = %path.display(), count = listings.len(), "listings loaded");

        Ok(Self {
            current: ArcSwap::from_pointee(Snapshot::new(listings)),
            source: Some(path),
        })
    }

    /// Store over a fixed collection, mostly for tests.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::new(listings)),
            source: None,
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Re-reads the source file and swaps it in. On error the current
    /// snapshot stays untouched.
    pub fn reload(&self) -> Result<usize, LoadError> {
        let path = self.source.as_ref().ok_or(LoadError::NoSource)?;
        let listings = read_listings(path)?;
        let count = listings.len();
        self.replace(listings);
        info!(path = %path.display(), count, "listings reloaded");
        Ok(count)
    }

    pub fn replace(&self, listings: Vec<Listing>) {
        self.current.store(Arc::new(Snapshot::new(listings)));
    }
}

fn read_listings(path: &Path) -> Result<Vec<Listing>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }

    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Immutable view of the collection in load order.
#[derive(Debug, Default)]
pub struct Snapshot {
    listings: Vec<Listing>,
}

impl Snapshot {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Every listing that passes `filter`, in load order.
    pub fn get_all(&self, filter: &ListingFilter) -> Vec<Listing> {
        let out: Vec<Listing> = self
            .listings
            .iter()
            .filter(|l| matches(l, filter))
            .cloned()
            .collect();
        debug!(matched = out.len(), of = self.listings.len(), "filtered listings");
        out
    }

    /// First listing with `id`; duplicates later in the file are shadowed.
    pub fn get_by_id(&self, id: i64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Distinct non-empty cities, sorted.
    pub fn unique_locations(&self) -> Vec<String> {
        self.unique_by(Listing::city)
    }

    /// Distinct non-empty property types, sorted.
    pub fn unique_property_types(&self) -> Vec<String> {
        self.unique_by(Listing::property_type)
    }

    fn unique_by<F>(&self, key: F) -> Vec<String>
    where
        F: Fn(&Listing) -> &str,
    {
        let set: BTreeSet<&str> = self
            .listings
            .iter()
            .map(key)
            .filter(|v| !v.is_empty())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Min/max over listings with a valid price only.
    pub fn price_range(&self) -> Option<RangeInclusive<f64>> {
        let mut range: Option<(f64, f64)> = None;
        for price in self.listings.iter().filter_map(Listing::valid_price) {
            range = Some(match range {
                None => (price, price),
                Some((lo, hi)) => (lo.min(price), hi.max(price)),
            });
        }
        range.map(|(lo, hi)| lo..=hi)
    }

    /// Min/max bedrooms over every listing, zeros included.
    pub fn bedroom_range(&self) -> Option<RangeInclusive<u32>> {
        self.count_range(|l| l.bedrooms)
    }

    pub fn bathroom_range(&self) -> Option<RangeInclusive<u32>> {
        self.count_range(|l| l.bathrooms)
    }

    fn count_range<F>(&self, key: F) -> Option<RangeInclusive<u32>>
    where
        F: Fn(&Listing) -> u32,
    {
        let min = self.listings.iter().map(&key).min()?;
        let max = self.listings.iter().map(&key).max()?;
        Some(min..=max)
    }

    /// Case-insensitive substring search over title, location and property
    /// type. A blank query returns everything.
    pub fn search_text(&self, query: &str) -> Vec<Listing> {
        let query = query.trim();
        if query.is_empty() {
            return self.listings.clone();
        }

        let needle = query.to_lowercase();
        self.listings
            .iter()
            .filter(|l| {
                contains_ci(&l.title, &needle)
                    || contains_ci(&l.location, &needle)
                    || contains_ci(l.property_type(), &needle)
            })
            .cloned()
            .collect()
    }
}

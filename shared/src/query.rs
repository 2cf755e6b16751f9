//! Listing query engine
//!
//! Search, category filter, sort and pagination over an in-memory collection.
//! The client runs it over a fetched catalog; the server runs the same code
//! when a list endpoint receives `q`, `category` or `sort`.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Destination, Hotel, SearchHit, TourPackage, Transport};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Anything that can be searched, filtered and sorted as a listing
pub trait Listing {
    fn id(&self) -> i64;

    /// Fields the free-text query is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Whether the listing belongs to the category key (already lowercased)
    fn matches_category(&self, category: &str) -> bool;

    fn price(&self) -> Option<f64>;

    fn rating(&self) -> Option<f64>;

    fn display_name(&self) -> &str;

    fn duration(&self) -> Option<u32> {
        None
    }

    /// Case-insensitive substring match; an empty query matches everything
    fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

// =============================================================================
// Sort keys
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceLow,
    PriceHigh,
    Rating,
    Name,
    Duration,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Name => "name",
            SortKey::Duration => "duration",
        }
    }

    /// Parse a UI sort key; unknown keys yield `None` (original order)
    pub fn parse(key: &str) -> Option<Self> {
        key.parse().ok()
    }

    fn compare<T: Listing>(&self, a: &T, b: &T) -> Ordering {
        match self {
            SortKey::PriceLow => cmp_f64_some_first(a.price(), b.price()),
            SortKey::PriceHigh => cmp_f64_some_first_desc(a.price(), b.price()),
            SortKey::Rating => cmp_f64_some_first_desc(a.rating(), b.rating()),
            SortKey::Name => a
                .display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase()),
            SortKey::Duration => match (a.duration(), b.duration()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "price-low" => Ok(SortKey::PriceLow),
            "price-high" => Ok(SortKey::PriceHigh),
            "rating" => Ok(SortKey::Rating),
            "name" => Ok(SortKey::Name),
            "duration" => Ok(SortKey::Duration),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

// Missing values sort after present ones regardless of direction.
fn cmp_f64_some_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_f64_some_first_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        _ => cmp_f64_some_first(a, b),
    }
}

// =============================================================================
// Query
// =============================================================================

/// UI/query-string state for a listing view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListingQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// True when no filter or sort would change the collection
    pub fn is_noop(&self) -> bool {
        self.query_text().is_none() && self.category_key().is_none() && self.sort_key().is_none()
    }

    fn query_text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Lowercased category; "all" and empty mean no filter
    fn category_key(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty() && c != "all")
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_deref().and_then(SortKey::parse)
    }

    pub fn matches<T: Listing>(&self, item: &T) -> bool {
        let query_ok = self.query_text().is_none_or(|q| item.matches_query(q));
        let category_ok = self
            .category_key()
            .is_none_or(|c| item.matches_category(&c));
        query_ok && category_ok
    }

    /// Filter then stable-sort, returning references into `items`
    pub fn select<'a, T: Listing>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut out: Vec<&T> = items.iter().filter(|item| self.matches(*item)).collect();
        if let Some(key) = self.sort_key() {
            out.sort_by(|a, b| key.compare(*a, *b));
        }
        out
    }

    /// Filter then stable-sort an owned collection
    pub fn apply<T: Listing>(&self, items: Vec<T>) -> Vec<T> {
        let mut out: Vec<T> = items.into_iter().filter(|item| self.matches(item)).collect();
        if let Some(key) = self.sort_key() {
            out.sort_by(|a, b| key.compare(a, b));
        }
        out
    }

    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }
}

// =============================================================================
// Pagination
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page)) as u32
    }
}

/// Cut one page out of an already filtered collection
pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let total = items.len() as u64;
    let skip = (page as usize - 1).saturating_mul(per_page as usize);
    let items = items.into_iter().skip(skip).take(per_page as usize).collect();
    Page {
        items,
        total,
        page,
        per_page,
    }
}

// =============================================================================
// Listing impls
// =============================================================================

impl Listing for Destination {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.short_description.as_str(),
            self.detailed_description.as_str(),
            self.province.as_str(),
            self.country.as_str(),
        ]
    }

    fn matches_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.to_lowercase() == category)
    }

    fn price(&self) -> Option<f64> {
        None
    }

    fn rating(&self) -> Option<f64> {
        Some(self.rating)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Listing for TourPackage {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.location.as_str(), self.category.as_str()]
    }

    fn matches_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn rating(&self) -> Option<f64> {
        Some(self.rating)
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn duration(&self) -> Option<u32> {
        Some(self.duration)
    }
}

impl Listing for Hotel {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.location.as_str()]
    }

    fn matches_category(&self, category: &str) -> bool {
        self.amenities.iter().any(|a| a.to_lowercase() == category)
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn rating(&self) -> Option<f64> {
        Some(self.rating)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Listing for Transport {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.vehicle.as_str(),
            self.vehicle_type.as_str(),
            self.provider.name.as_str(),
        ]
    }

    fn matches_category(&self, category: &str) -> bool {
        self.vehicle_type.to_lowercase() == category
    }

    fn price(&self) -> Option<f64> {
        Some(self.price_per_1km)
    }

    fn rating(&self) -> Option<f64> {
        Some(self.provider.rating)
    }

    fn display_name(&self) -> &str {
        &self.vehicle
    }
}

impl Listing for SearchHit {
    fn id(&self) -> i64 {
        SearchHit::id(self)
    }

    fn search_fields(&self) -> Vec<&str> {
        self.as_listing().search_fields()
    }

    fn matches_category(&self, category: &str) -> bool {
        self.as_listing().matches_category(category)
    }

    fn price(&self) -> Option<f64> {
        self.as_listing().price()
    }

    fn rating(&self) -> Option<f64> {
        self.as_listing().rating()
    }

    fn display_name(&self) -> &str {
        self.as_listing().display_name()
    }

    fn duration(&self) -> Option<u32> {
        self.as_listing().duration()
    }
}

impl SearchHit {
    fn as_listing(&self) -> &dyn Listing {
        match self {
            SearchHit::Destination(d) => d,
            SearchHit::Tour(t) => t,
            SearchHit::Hotel(h) => h,
            SearchHit::Transport(t) => t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(id: i64, name: &str, province: &str, categories: &[&str]) -> Destination {
        Destination {
            id,
            name: name.into(),
            short_description: format!("{name} in short"),
            detailed_description: String::new(),
            province: province.into(),
            country: "Sri Lanka".into(),
            rating: 4.0 + id as f64 / 10.0,
            featured: false,
            best_time: None,
            weather: None,
            best_for: vec![],
            categories: categories.iter().map(|c| c.to_string()).collect(),
            activities: vec![],
            hotels: vec![],
            images: vec![],
            highlights: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn tour(id: i64, title: &str, price: f64, duration: u32) -> TourPackage {
        TourPackage {
            id,
            title: title.into(),
            category: "Adventure".into(),
            location: "Ella".into(),
            price,
            rating: 4.5,
            duration,
            destination_id: None,
            highlights: vec![],
            includes: vec![],
            excludes: vec![],
            itinerary: vec![],
            reviews: vec![],
            image: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn destinations() -> Vec<Destination> {
        vec![
            destination(1, "Sigiriya", "Central", &["Heritage"]),
            destination(2, "Ella", "Uva", &["Nature", "Hiking"]),
            destination(3, "Galle Fort", "Southern", &["Heritage", "Beach"]),
            destination(4, "Kandy", "Central", &["Culture"]),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let items = destinations();
        let query = ListingQuery::search("CENTRAL");
        let ids: Vec<i64> = query.select(&items).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 4]);

        let query = ListingQuery::search("fort");
        let ids: Vec<i64> = query.select(&items).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_search_matches_country() {
        let items = destinations();
        assert_eq!(ListingQuery::search("sri lanka").select(&items).len(), 4);
        assert!(ListingQuery::search("maldives").select(&items).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let query = ListingQuery::search("e").with_category("heritage");
        let once = query.apply(destinations());
        let twice = query.apply(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_all_category_means_no_filter() {
        let items = destinations();
        let query = ListingQuery::default().with_category("All");
        assert_eq!(query.select(&items).len(), items.len());
        assert!(query.is_noop());
    }

    #[test]
    fn test_empty_query_returns_collection_unchanged() {
        let items = destinations();
        assert_eq!(ListingQuery::default().apply(items.clone()), items);
    }

    #[test]
    fn test_price_sorts_are_monotonic() {
        let tours = vec![
            tour(1, "A", 300.0, 3),
            tour(2, "B", 100.0, 5),
            tour(3, "C", 200.0, 1),
            tour(4, "D", 100.0, 2),
        ];

        let low = ListingQuery::default().sorted_by("price-low").apply(tours.clone());
        assert!(low.windows(2).all(|w| w[0].price <= w[1].price));
        // stable: 2 before 4 at equal price
        assert_eq!(low.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 4, 3, 1]);

        let high = ListingQuery::default().sorted_by("price-high").apply(tours.clone());
        assert!(high.windows(2).all(|w| w[0].price >= w[1].price));

        let by_duration = ListingQuery::default().sorted_by("duration").apply(tours);
        assert!(by_duration.windows(2).all(|w| w[0].duration <= w[1].duration));
    }

    #[test]
    fn test_unknown_sort_keeps_order() {
        let tours = vec![tour(1, "B", 2.0, 1), tour(2, "A", 1.0, 1)];
        let out = ListingQuery::default().sorted_by("popularity").apply(tours.clone());
        assert_eq!(out, tours);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let items = vec![tour(1, "kandy", 1.0, 1), tour(2, "Anuradhapura", 1.0, 1)];
        let out = ListingQuery::default().sorted_by("name").apply(items);
        assert_eq!(out[0].title, "Anuradhapura");
    }

    #[test]
    fn test_paginate() {
        let page = paginate((1..=45).collect::<Vec<i32>>(), 3, 20);
        assert_eq!(page.items, vec![41, 42, 43, 44, 45]);
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages(), 3);

        let beyond = paginate(vec![1, 2, 3], 5, 20);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 3);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let query = ListingQuery {
            per_page: Some(10_000),
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(query.page_size(), MAX_PER_PAGE);
        assert_eq!(query.page_number(), 1);
    }

    #[test]
    fn test_search_hits_sort_across_kinds() {
        let hits = vec![
            SearchHit::Tour(tour(1, "Yala Safari", 120.0, 2)),
            SearchHit::Destination(destination(2, "Arugam Bay", "Eastern", &["Beach"])),
            SearchHit::Tour(tour(3, "Bay Cruise", 40.0, 1)),
        ];

        let by_name = ListingQuery::default().sorted_by("name").apply(hits.clone());
        let names: Vec<&str> = by_name.iter().map(|h| h.display_name()).collect();
        assert_eq!(names, vec!["Arugam Bay", "Bay Cruise", "Yala Safari"]);

        // Destinations carry no price and sort last
        let by_price = ListingQuery::default().sorted_by("price-low").apply(hits.clone());
        assert_eq!(by_price.iter().map(|h| h.id()).collect::<Vec<_>>(), vec![3, 1, 2]);

        let bay = ListingQuery::search("bay").apply(hits);
        assert_eq!(bay.len(), 2);
    }
}

//! Nearby food search for FoodSpot.
//!
//! Fans a coordinate out to several upstream place searches, collapses
//! duplicates, classifies each place into a cuisine category by keyword
//! scoring, ranks by distance, attaches walking distance/time (routed for the
//! closest places, estimated for the rest) and groups the result by category.
//! Geocoded addresses, exact routes and whole responses are cached in-process.

pub mod cache;
pub mod enrich;
pub mod error;
pub mod geocode;
pub mod identity;
pub mod pipeline;
pub mod scorer;
pub mod types;

pub use cache::TtlCache;
pub use enrich::{estimate, DistanceEnricher, EnrichmentResult, RouteKey, RouteType};
pub use error::SearchError;
pub use geocode::ReverseGeocoder;
pub use identity::{compute_identity, deduplicate};
pub use pipeline::{FoodSearch, SearchCaches};
pub use scorer::{classify, score, CategoryScore, FoodCategory, FOOD_CATEGORIES, MATCH_THRESHOLD};
pub use types::{CategorizedResponse, FoodSpot, LocationDetails, SearchSettings};

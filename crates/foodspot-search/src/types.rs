//! Search settings and the response shape returned to callers.

use std::collections::BTreeMap;
use std::time::Duration;

use foodspot_core::{AppConfig, Coordinate};
use serde::Serialize;

use crate::enrich::EnrichmentResult;
use crate::scorer::FOOD_CATEGORIES;

/// Tunables for one [`crate::FoodSearch`] instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub radius_meters: u32,
    /// How many of the closest places get an exact walking route.
    pub exact_route_limit: usize,
    /// Process-wide cap on in-flight routing requests.
    pub routing_concurrency: usize,
    pub response_ttl: Duration,
    pub geocode_ttl: Duration,
    pub route_ttl: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            radius_meters: 5000,
            exact_route_limit: 20,
            routing_concurrency: 10,
            response_ttl: Duration::from_secs(15 * 60),
            geocode_ttl: Duration::from_secs(60 * 60),
            route_ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            radius_meters: config.search_radius_meters,
            exact_route_limit: config.exact_route_limit,
            routing_concurrency: config.routing_concurrency,
            response_ttl: Duration::from_secs(config.response_cache_ttl_secs),
            geocode_ttl: Duration::from_secs(config.geocode_cache_ttl_secs),
            route_ttl: Duration::from_secs(config.route_cache_ttl_secs),
        }
    }
}

/// One classified, ranked and enriched place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodSpot {
    pub name: String,
    pub address: String,
    pub place_id: String,
    pub image: Option<String>,
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub route: EnrichmentResult,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_score: u32,
}

/// Search metadata echoed alongside the grouped results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationDetails {
    pub precise_address: String,
    pub coordinates: Coordinate,
    pub search_radius: String,
    pub total_categories: usize,
    pub total_restaurants: usize,
    pub categories_with_results: usize,
    pub distance_calculation: String,
    pub walking_speed: String,
    pub note: String,
}

/// Places grouped by category key, closest first within each group.
///
/// Serializes flat: every category key sits at the top level next to
/// `current_location` and `location_details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedResponse {
    #[serde(flatten)]
    pub categories: BTreeMap<String, Vec<FoodSpot>>,
    pub current_location: String,
    pub location_details: LocationDetails,
}

impl CategorizedResponse {
    /// Builds the response from grouped places; every category key is present
    /// even when its list is empty.
    #[must_use]
    pub fn assemble(
        mut categories: BTreeMap<String, Vec<FoodSpot>>,
        origin: Coordinate,
        address: String,
        settings: &SearchSettings,
    ) -> Self {
        for category in &FOOD_CATEGORIES {
            categories.entry(category.key()).or_default();
        }

        let total_restaurants = categories.values().map(Vec::len).sum();
        let categories_with_results = categories.values().filter(|v| !v.is_empty()).count();

        let location_details = LocationDetails {
            precise_address: address.clone(),
            coordinates: origin,
            search_radius: format_radius(settings.radius_meters),
            total_categories: FOOD_CATEGORIES.len(),
            total_restaurants,
            categories_with_results,
            distance_calculation: "Walking routes for the closest places, straight-line estimate for the rest"
                .to_string(),
            walking_speed: "5 km/h average".to_string(),
            note: format!(
                "Routing limited to the {} closest places; others use a haversine estimate with a 1.32 detour factor.",
                settings.exact_route_limit
            ),
        };

        Self {
            categories,
            current_location: address,
            location_details,
        }
    }

    #[must_use]
    pub fn total_restaurants(&self) -> usize {
        self.location_details.total_restaurants
    }
}

fn format_radius(meters: u32) -> String {
    if meters % 1000 == 0 {
        format!("{}km", meters / 1000)
    } else {
        format!("{meters}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::estimate;
    use serde_json::json;

    fn origin() -> Coordinate {
        Coordinate::new(28.6139, 77.209).unwrap()
    }

    fn spot(name: &str, category: &str) -> FoodSpot {
        let at = Coordinate::new(28.615, 77.21).unwrap();
        FoodSpot {
            name: name.to_string(),
            address: "Address unavailable".to_string(),
            place_id: "p1".to_string(),
            image: None,
            rating: None,
            route: estimate(origin(), at),
            category: category.to_string(),
            latitude: at.latitude(),
            longitude: at.longitude(),
            category_score: 10,
        }
    }

    #[test]
    fn assemble_fills_every_category_key() {
        let response = CategorizedResponse::assemble(
            BTreeMap::new(),
            origin(),
            "Connaught Place".to_string(),
            &SearchSettings::default(),
        );
        assert_eq!(response.categories.len(), 10);
        assert!(response.categories.contains_key("ice_cream"));
        assert!(response.categories.contains_key("north_indian"));
        assert_eq!(response.total_restaurants(), 0);
        assert_eq!(response.location_details.categories_with_results, 0);
    }

    #[test]
    fn assemble_counts_results() {
        let mut grouped = BTreeMap::new();
        grouped.insert(
            "biryani".to_string(),
            vec![spot("A", "biryani"), spot("B", "biryani")],
        );
        grouped.insert("pizza".to_string(), vec![spot("C", "pizza")]);

        let response = CategorizedResponse::assemble(
            grouped,
            origin(),
            "Connaught Place".to_string(),
            &SearchSettings::default(),
        );
        assert_eq!(response.total_restaurants(), 3);
        assert_eq!(response.location_details.categories_with_results, 2);
        assert_eq!(response.location_details.total_categories, 10);
        assert_eq!(response.location_details.search_radius, "5km");
    }

    #[test]
    fn response_serializes_flat() {
        let mut grouped = BTreeMap::new();
        grouped.insert("momos".to_string(), vec![spot("Momo Point", "momos")]);
        let response = CategorizedResponse::assemble(
            grouped,
            origin(),
            "Connaught Place".to_string(),
            &SearchSettings::default(),
        );

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["current_location"], json!("Connaught Place"));
        assert_eq!(
            value["location_details"]["coordinates"],
            json!({ "latitude": 28.6139, "longitude": 77.209 })
        );
        let item = &value["momos"][0];
        assert_eq!(item["name"], json!("Momo Point"));
        assert_eq!(item["route_type"], json!("estimated"));
        assert!(item["distance_meters"].is_u64());
        assert!(item["rating"].is_null());
        assert!(item.get("route").is_none());
        assert_eq!(value["chaat"], json!([]));
    }

    #[test]
    fn radius_formatting() {
        assert_eq!(format_radius(5000), "5km");
        assert_eq!(format_radius(2500), "2500m");
    }
}

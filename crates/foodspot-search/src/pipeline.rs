//! The search pipeline: validate, fan out, merge, classify, rank, enrich and
//! assemble, with a whole-response cache in front.

use std::collections::BTreeMap;
use std::sync::Arc;

use foodspot_core::{haversine_distance, Coordinate, GridKey, RawCandidate};
use foodspot_geoapify::{GeoapifyClient, PlaceQuery, PlaceQueryKind};
use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::cache::TtlCache;
use crate::enrich::{estimate, DistanceEnricher, EnrichmentResult, RouteKey};
use crate::error::SearchError;
use crate::geocode::ReverseGeocoder;
use crate::identity::deduplicate;
use crate::scorer::{classify, CategoryScore};
use crate::types::{CategorizedResponse, FoodSpot, SearchSettings};

const DEFAULT_NAME: &str = "Restaurant";
const DEFAULT_ADDRESS: &str = "Address unavailable";

/// The three caches a search instance reads and writes.
///
/// Built once at startup and handed to [`FoodSearch::new`]; clones share
/// storage.
#[derive(Clone)]
pub struct SearchCaches {
    pub responses: TtlCache<GridKey, CategorizedResponse>,
    pub geocodes: TtlCache<GridKey, String>,
    pub routes: TtlCache<RouteKey, EnrichmentResult>,
}

impl SearchCaches {
    #[must_use]
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            responses: TtlCache::new(settings.response_ttl),
            geocodes: TtlCache::new(settings.geocode_ttl),
            routes: TtlCache::new(settings.route_ttl),
        }
    }

    /// Starts one background sweeper per cache.
    pub fn spawn_sweepers(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.responses.spawn_sweeper("responses"),
            self.geocodes.spawn_sweeper("geocodes"),
            self.routes.spawn_sweeper("routes"),
        ]
    }
}

struct Backend {
    client: Arc<GeoapifyClient>,
    geocoder: ReverseGeocoder,
    enricher: DistanceEnricher,
}

/// A deduplicated, classified candidate with its straight-line distance.
struct Ranked {
    identity: String,
    candidate: RawCandidate,
    best: CategoryScore,
    distance: f64,
}

/// Composition root for nearby food search.
///
/// Without a client every search fails with [`SearchError::Configuration`]
/// after input validation, so a missing API key surfaces per request rather
/// than at startup.
pub struct FoodSearch {
    backend: Option<Backend>,
    responses: TtlCache<GridKey, CategorizedResponse>,
    settings: SearchSettings,
}

impl FoodSearch {
    #[must_use]
    pub fn new(
        client: Option<GeoapifyClient>,
        caches: SearchCaches,
        settings: SearchSettings,
    ) -> Self {
        let backend = client.map(|client| {
            let client = Arc::new(client);
            Backend {
                geocoder: ReverseGeocoder::new(Arc::clone(&client), caches.geocodes.clone()),
                enricher: DistanceEnricher::new(
                    Arc::clone(&client),
                    caches.routes.clone(),
                    settings.routing_concurrency,
                ),
                client,
            }
        });

        Self {
            backend,
            responses: caches.responses,
            settings,
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Finds, classifies and enriches food places around a coordinate.
    ///
    /// Upstream failures never fail the search: a failed places query
    /// contributes nothing, a failed geocode yields the coordinate text and a
    /// failed route yields an estimate. Responses with at least one place are
    /// cached per grid cell.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidCoordinates`] for non-finite or out-of-range input.
    /// - [`SearchError::Configuration`] when no upstream client is configured.
    /// - [`SearchError::Internal`] if an enrichment task panics.
    pub async fn search(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CategorizedResponse, SearchError> {
        let origin = Coordinate::new(latitude, longitude)?;
        let backend = self.backend.as_ref().ok_or_else(|| {
            SearchError::Configuration("GEOAPIFY_API_KEY is not set".to_string())
        })?;

        let key = origin.grid_key();
        if let Some(cached) = self.responses.get(&key) {
            tracing::debug!(grid = %key, "response cache hit");
            return Ok(cached);
        }
        tracing::debug!(grid = %key, "response cache miss");

        let (address, candidates) = tokio::join!(
            backend.geocoder.resolve_address(origin),
            self.fan_out(backend, origin),
        );

        let fetched = candidates.len();
        let ranked = rank(origin, candidates);
        tracing::debug!(fetched, matched = ranked.len(), "classified candidates");

        let routes = self.enrich_all(backend, origin, &ranked).await?;

        let mut grouped: BTreeMap<String, Vec<FoodSpot>> = BTreeMap::new();
        for (place, route) in ranked.into_iter().zip(routes) {
            grouped
                .entry(place.best.category.key())
                .or_default()
                .push(into_food_spot(place, route));
        }

        let response = CategorizedResponse::assemble(grouped, origin, address, &self.settings);
        let total = response.total_restaurants();
        if total > 0 {
            self.responses.set(key, response.clone());
        }
        tracing::info!(
            grid = %key,
            total,
            categories = response.location_details.categories_with_results,
            "food search complete"
        );

        Ok(response)
    }

    /// Runs every places query concurrently and concatenates the successes
    /// in query order.
    async fn fan_out(&self, backend: &Backend, origin: Coordinate) -> Vec<RawCandidate> {
        let queries = place_queries(origin, self.settings.radius_meters);
        let results = join_all(queries.iter().map(|q| backend.client.search_places(q))).await;

        let mut merged = Vec::new();
        for (query, result) in queries.iter().zip(results) {
            match result {
                Ok(candidates) => {
                    tracing::debug!(
                        query = query.label(),
                        count = candidates.len(),
                        "places query returned"
                    );
                    merged.extend(candidates);
                }
                Err(e) => {
                    tracing::warn!(
                        query = query.label(),
                        timeout = e.is_timeout(),
                        error = %e,
                        "places query failed; continuing without it"
                    );
                }
            }
        }
        merged
    }

    /// Routes the closest places exactly and estimates the rest. Results are
    /// returned in rank order.
    ///
    /// Routing permits are taken one place at a time in rank order, so the
    /// closest places reach the upstream first.
    async fn enrich_all(
        &self,
        backend: &Backend,
        origin: Coordinate,
        ranked: &[Ranked],
    ) -> Result<Vec<EnrichmentResult>, SearchError> {
        let split = ranked.len().min(self.settings.exact_route_limit);
        let (closest, rest) = ranked.split_at(split);

        let mut pending = Vec::with_capacity(closest.len());
        for place in closest {
            let destination = place.candidate.coordinate;
            if let Some(hit) = backend.enricher.cached(origin, destination) {
                pending.push(PendingRoute::Ready(hit));
                continue;
            }
            let Some(permit) = backend.enricher.acquire_permit().await else {
                tracing::warn!("routing gate closed; using estimate");
                pending.push(PendingRoute::Ready(estimate(origin, destination)));
                continue;
            };
            let enricher = backend.enricher.clone();
            pending.push(PendingRoute::Routing(tokio::spawn(async move {
                enricher.route_with_permit(origin, destination, permit).await
            })));
        }

        let mut routes = Vec::with_capacity(ranked.len());
        for route in pending {
            match route {
                PendingRoute::Ready(result) => routes.push(result),
                PendingRoute::Routing(handle) => {
                    let result = handle.await.map_err(|e| {
                        SearchError::Internal(format!("enrichment task failed: {e}"))
                    })?;
                    routes.push(result);
                }
            }
        }
        routes.extend(rest.iter().map(|place| estimate(origin, place.candidate.coordinate)));
        Ok(routes)
    }
}

enum PendingRoute {
    Ready(EnrichmentResult),
    Routing(JoinHandle<EnrichmentResult>),
}

fn place_queries(origin: Coordinate, radius_meters: u32) -> [PlaceQuery; 3] {
    let query = |kind, limit| PlaceQuery {
        kind,
        origin,
        radius_meters,
        limit,
    };
    [
        query(PlaceQueryKind::Categories("catering.restaurant".to_string()), 100),
        query(PlaceQueryKind::Categories("catering".to_string()), 100),
        query(PlaceQueryKind::Text("restaurant food".to_string()), 50),
    ]
}

/// Dedups, drops non-food candidates and orders by straight-line distance.
/// The sort is stable, so equidistant places keep their merge order.
fn rank(origin: Coordinate, candidates: Vec<RawCandidate>) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = deduplicate(candidates)
        .into_iter()
        .filter_map(|(identity, candidate)| {
            let best = classify(&candidate);
            if !best.is_food_match() {
                return None;
            }
            let distance = haversine_distance(origin, candidate.coordinate);
            Some(Ranked {
                identity,
                candidate,
                best,
                distance,
            })
        })
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

fn into_food_spot(place: Ranked, route: EnrichmentResult) -> FoodSpot {
    let Ranked {
        identity,
        candidate,
        best,
        ..
    } = place;
    FoodSpot {
        name: candidate.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        address: candidate
            .address
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
        place_id: identity,
        image: candidate.photo_url,
        rating: candidate.rating,
        route,
        category: best.category.name.to_string(),
        latitude: candidate.coordinate.latitude(),
        longitude: candidate.coordinate.longitude(),
        category_score: best.score,
    }
}

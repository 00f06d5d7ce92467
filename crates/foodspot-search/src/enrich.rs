//! Walking distance and time for ranked candidates.
//!
//! Exact figures come from the routing endpoint, gated by a process-wide
//! semaphore and memoized by grid cell pair. When routing is unavailable the
//! figures are estimated from the great-circle distance.

use std::sync::Arc;

use foodspot_core::{format_distance, format_time, haversine_distance, Coordinate, GridKey};
use foodspot_geoapify::{GeoapifyClient, RouteSummary};
use serde::Serialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::cache::TtlCache;

/// Street-network detour relative to the straight line.
pub const DETOUR_FACTOR: f64 = 1.32;
/// Average walking speed in meters per second (5 km/h).
pub const WALKING_SPEED_MPS: f64 = 1.39;
/// Speed discount for crossings and other obstacles.
pub const OBSTACLE_DISCOUNT: f64 = 0.92;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    Exact,
    Estimated,
}

/// Walking figures attached to each returned place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentResult {
    pub distance_meters: u64,
    pub distance_formatted: String,
    pub walking_time: String,
    pub route_type: RouteType,
}

impl EnrichmentResult {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn new(distance_meters: f64, duration_secs: f64, route_type: RouteType) -> Self {
        Self {
            distance_meters: distance_meters.max(0.0).round() as u64,
            distance_formatted: format_distance(distance_meters),
            walking_time: format_time(duration_secs),
            route_type,
        }
    }

    fn exact(route: RouteSummary) -> Self {
        Self::new(route.distance_meters, route.duration_secs, RouteType::Exact)
    }
}

/// Closed-form walking estimate between two points.
#[must_use]
pub fn estimate(origin: Coordinate, destination: Coordinate) -> EnrichmentResult {
    let distance = haversine_distance(origin, destination) * DETOUR_FACTOR;
    let duration = distance / (WALKING_SPEED_MPS * OBSTACLE_DISCOUNT);
    EnrichmentResult::new(distance, duration, RouteType::Estimated)
}

pub type RouteKey = (GridKey, GridKey);

/// Routes origin/destination pairs under a shared concurrency budget.
///
/// Clones share the client, the route memo and the permit pool.
#[derive(Clone)]
pub struct DistanceEnricher {
    client: Arc<GeoapifyClient>,
    routes: TtlCache<RouteKey, EnrichmentResult>,
    gate: Arc<Semaphore>,
}

impl DistanceEnricher {
    #[must_use]
    pub fn new(
        client: Arc<GeoapifyClient>,
        routes: TtlCache<RouteKey, EnrichmentResult>,
        max_concurrent_routes: usize,
    ) -> Self {
        Self {
            client,
            routes,
            gate: Arc::new(Semaphore::new(max_concurrent_routes)),
        }
    }

    /// Permits currently free in the routing gate.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.gate.available_permits()
    }

    /// Memoized exact route for the pair, if one is still fresh.
    #[must_use]
    pub fn cached(&self, origin: Coordinate, destination: Coordinate) -> Option<EnrichmentResult> {
        let key = (origin.grid_key(), destination.grid_key());
        let hit = self.routes.get(&key);
        if hit.is_some() {
            tracing::debug!(from = %key.0, to = %key.1, "route cache hit");
        }
        hit
    }

    /// Waits for a routing permit. The gate is FIFO: callers are served in
    /// the order they started waiting. `None` only if the gate was closed.
    pub async fn acquire_permit(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.gate).acquire_owned().await.ok()
    }

    /// Routes one pair while holding `permit`, releasing it when the upstream
    /// call returns. Routing errors degrade to [`estimate`].
    pub async fn route_with_permit(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        permit: OwnedSemaphorePermit,
    ) -> EnrichmentResult {
        let outcome = self.client.walking_route(origin, destination).await;
        drop(permit);

        match outcome {
            Ok(route) => {
                let result = EnrichmentResult::exact(route);
                self.routes
                    .set((origin.grid_key(), destination.grid_key()), result.clone());
                result
            }
            Err(e) => {
                tracing::warn!(
                    from = %origin,
                    to = %destination,
                    timeout = e.is_timeout(),
                    error = %e,
                    "walking route failed; using estimate"
                );
                estimate(origin, destination)
            }
        }
    }

    /// Walking figures for one pair. Never fails: any routing error degrades
    /// to [`estimate`].
    pub async fn enrich(&self, origin: Coordinate, destination: Coordinate) -> EnrichmentResult {
        if let Some(hit) = self.cached(origin, destination) {
            return hit;
        }
        let Some(permit) = self.acquire_permit().await else {
            tracing::warn!("routing gate closed; using estimate");
            return estimate(origin, destination);
        };
        self.route_with_permit(origin, destination, permit).await
    }
}

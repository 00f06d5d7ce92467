use std::sync::Arc;

use foodspot_core::{Coordinate, GridKey};
use foodspot_geoapify::GeoapifyClient;

use crate::cache::TtlCache;

/// Resolves the searcher's coordinate to a human-readable address.
#[derive(Clone)]
pub struct ReverseGeocoder {
    client: Arc<GeoapifyClient>,
    cache: TtlCache<GridKey, String>,
}

impl ReverseGeocoder {
    #[must_use]
    pub fn new(client: Arc<GeoapifyClient>, cache: TtlCache<GridKey, String>) -> Self {
        Self { client, cache }
    }

    /// Cached address for the coordinate's grid cell, else one upstream
    /// lookup. Falls back to `"lat, lng"` on any failure; fallbacks are not
    /// cached.
    pub async fn resolve_address(&self, coordinate: Coordinate) -> String {
        let key = coordinate.grid_key();
        if let Some(address) = self.cache.get(&key) {
            tracing::debug!(grid = %key, "geocode cache hit");
            return address;
        }

        match self.client.reverse_geocode(coordinate).await {
            Ok(address) => {
                self.cache.set(key, address.clone());
                address
            }
            Err(e) => {
                tracing::warn!(
                    coordinate = %coordinate,
                    timeout = e.is_timeout(),
                    error = %e,
                    "reverse geocode failed; using coordinates"
                );
                coordinate.to_string()
            }
        }
    }
}

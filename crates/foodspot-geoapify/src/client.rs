//! HTTP client for the Geoapify REST APIs.
//!
//! Wraps `reqwest` with API key management, per-endpoint timeouts and typed
//! GeoJSON deserialization. Callers decide how to degrade on failure; this
//! client never retries.

use std::time::Duration;

use foodspot_core::{Coordinate, RawCandidate};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::GeoapifyError;
use crate::types::{
    Feature, FeatureCollection, GeocodeProperties, PlaceProperties, RouteProperties, RouteSummary,
};

const DEFAULT_BASE_URL: &str = "https://api.geoapify.com/";

/// Transport settings shared by every Geoapify endpoint.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Deadline for each places search request.
    pub search_timeout: Duration,
    /// Deadline for reverse-geocode and routing requests.
    pub upstream_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "foodspot/0.1 (local-food-discovery)".to_string(),
            search_timeout: Duration::from_secs(10),
            upstream_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientSettings {
    #[must_use]
    pub fn from_app_config(config: &foodspot_core::AppConfig) -> Self {
        Self {
            base_url: config.geoapify_base_url.clone(),
            user_agent: config.user_agent.clone(),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            upstream_timeout: Duration::from_secs(config.upstream_timeout_secs),
        }
    }
}

/// What a places search filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceQueryKind {
    /// Comma-separated Geoapify category list, e.g. `catering.restaurant`.
    Categories(String),
    /// Free-text search.
    Text(String),
}

/// One places search: a query restricted to a circle around `origin` and
/// biased toward it.
#[derive(Debug, Clone)]
pub struct PlaceQuery {
    pub kind: PlaceQueryKind,
    pub origin: Coordinate,
    pub radius_meters: u32,
    pub limit: u32,
}

impl PlaceQuery {
    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.kind {
            PlaceQueryKind::Categories(c) => c,
            PlaceQueryKind::Text(t) => t,
        }
    }
}

/// Client for the Geoapify places, reverse geocoding and routing endpoints.
///
/// Use [`GeoapifyClient::new`] with [`ClientSettings::default`] for
/// production, or point `base_url` at a mock server in tests.
pub struct GeoapifyClient {
    client: Client,
    api_key: String,
    base_url: Url,
    search_timeout: Duration,
    upstream_timeout: Duration,
}

impl GeoapifyClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`GeoapifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeoapifyError::InvalidBaseUrl`] if
    /// `settings.base_url` does not parse.
    pub fn new(api_key: &str, settings: &ClientSettings) -> Result<Self, GeoapifyError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash, so `join` appends to the path instead of
        // replacing its last segment.
        let normalised = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeoapifyError::InvalidBaseUrl {
            base_url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            search_timeout: settings.search_timeout,
            upstream_timeout: settings.upstream_timeout,
        })
    }

    /// Builds a client from application config, or `None` when no API key is
    /// configured.
    ///
    /// # Errors
    ///
    /// Same as [`GeoapifyClient::new`].
    pub fn from_app_config(
        config: &foodspot_core::AppConfig,
    ) -> Result<Option<Self>, GeoapifyError> {
        config
            .geoapify_api_key
            .as_deref()
            .map(|key| Self::new(key, &ClientSettings::from_app_config(config)))
            .transpose()
    }

    /// Runs one places search and returns the located candidates.
    ///
    /// Features without a usable point geometry are skipped.
    ///
    /// # Errors
    ///
    /// - [`GeoapifyError::Http`] on network failure, timeout or non-2xx status.
    /// - [`GeoapifyError::Deserialize`] if the body is not a feature collection.
    pub async fn search_places(
        &self,
        query: &PlaceQuery,
    ) -> Result<Vec<RawCandidate>, GeoapifyError> {
        let url = self.places_url(query)?;
        let collection: FeatureCollection<PlaceProperties> =
            self.get_json(url, self.search_timeout).await?;

        let total = collection.features.len();
        let candidates: Vec<RawCandidate> = collection
            .features
            .into_iter()
            .filter_map(Feature::<PlaceProperties>::into_candidate)
            .collect();

        if candidates.len() < total {
            tracing::debug!(
                query = query.label(),
                skipped = total - candidates.len(),
                "dropped place features without point geometry"
            );
        }

        Ok(candidates)
    }

    /// Resolves a coordinate to the provider's formatted address.
    ///
    /// # Errors
    ///
    /// - [`GeoapifyError::Http`] on network failure, timeout or non-2xx status.
    /// - [`GeoapifyError::Deserialize`] if the body is not a feature collection.
    /// - [`GeoapifyError::EmptyResponse`] if no feature carries an address.
    pub async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<String, GeoapifyError> {
        let url = self.build_url(
            "v1/geocode/reverse",
            &[
                ("lat", &coordinate.latitude().to_string()),
                ("lon", &coordinate.longitude().to_string()),
            ],
        )?;
        let collection: FeatureCollection<GeocodeProperties> =
            self.get_json(url, self.upstream_timeout).await?;

        collection
            .features
            .into_iter()
            .next()
            .and_then(|f| f.properties.formatted)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| GeoapifyError::EmptyResponse {
                context: format!("reverse geocode {coordinate}"),
            })
    }

    /// Requests a walking route between two points.
    ///
    /// # Errors
    ///
    /// - [`GeoapifyError::Http`] on network failure, timeout or non-2xx status.
    /// - [`GeoapifyError::Deserialize`] if the body does not match.
    /// - [`GeoapifyError::EmptyResponse`] if no route was found.
    pub async fn walking_route(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteSummary, GeoapifyError> {
        let waypoints = format!(
            "{},{}|{},{}",
            from.latitude(),
            from.longitude(),
            to.latitude(),
            to.longitude()
        );
        let url = self.build_url("v1/routing", &[("waypoints", &waypoints), ("mode", "walk")])?;
        let collection: FeatureCollection<RouteProperties> =
            self.get_json(url, self.upstream_timeout).await?;

        collection
            .features
            .into_iter()
            .next()
            .map(|f| RouteSummary {
                distance_meters: f.properties.distance,
                duration_secs: f.properties.time,
            })
            .ok_or_else(|| GeoapifyError::EmptyResponse {
                context: format!("walking route {waypoints}"),
            })
    }

    fn places_url(&self, query: &PlaceQuery) -> Result<Url, GeoapifyError> {
        let lng = query.origin.longitude();
        let lat = query.origin.latitude();
        let filter = format!("circle:{lng},{lat},{}", query.radius_meters);
        let bias = format!("proximity:{lng},{lat}");
        let limit = query.limit.to_string();

        let (selector, value) = match &query.kind {
            PlaceQueryKind::Categories(c) => ("categories", c.as_str()),
            PlaceQueryKind::Text(t) => ("text", t.as_str()),
        };

        self.build_url(
            "v2/places",
            &[
                (selector, value),
                ("filter", &filter),
                ("bias", &bias),
                ("limit", &limit),
            ],
        )
    }

    /// Builds an endpoint URL with percent-encoded query parameters and the
    /// API key appended last.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, GeoapifyError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| GeoapifyError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("apiKey", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET with the given deadline, asserts a 2xx status and parses
    /// the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<T, GeoapifyError> {
        let path = url.path().to_string();
        let response = self.client.get(url).timeout(timeout).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeoapifyError::Deserialize {
            context: path,
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

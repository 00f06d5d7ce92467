//! Geoapify response types.
//!
//! Every endpoint used here answers with a GeoJSON `FeatureCollection`;
//! only the fields the search pipeline reads are modelled.

use foodspot_core::{Coordinate, RawCandidate};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct FeatureCollection<P> {
    #[serde(default)]
    pub features: Vec<Feature<P>>,
}

#[derive(Debug, Deserialize)]
pub struct Feature<P> {
    pub properties: P,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// GeoJSON geometry. Coordinates stay untyped because routes return nested
/// line strings while places return a single `[lng, lat]` point.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl Geometry {
    /// The `(lng, lat)` pair of a `Point` geometry.
    #[must_use]
    pub fn point(&self) -> Option<(f64, f64)> {
        if self.kind != "Point" {
            return None;
        }
        let pair = self.coordinates.as_array()?;
        match pair.as_slice() {
            [lng, lat, ..] => Some((lng.as_f64()?, lat.as_f64()?)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// v2/places
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PlaceProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub osm_id: Option<i64>,
    #[serde(default)]
    pub catering: Option<Catering>,
    #[serde(default)]
    pub photo: Option<Photo>,
    /// Some datasets ship ratings as strings; anything unparseable is dropped.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Catering {
    #[serde(default)]
    pub cuisine: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub url: Option<String>,
}

impl Feature<PlaceProperties> {
    /// Converts a place feature into a [`RawCandidate`].
    ///
    /// Returns `None` when the feature has no valid point geometry, since an
    /// unlocated place can be neither ranked nor routed to.
    #[must_use]
    pub fn into_candidate(self) -> Option<RawCandidate> {
        let (lng, lat) = self.geometry.as_ref()?.point()?;
        let coordinate = Coordinate::new(lat, lng).ok()?;
        let props = self.properties;

        let provider_id = non_empty(props.place_id).or_else(|| props.osm_id.map(|id| id.to_string()));

        Some(RawCandidate {
            provider_id,
            name: non_empty(props.name),
            address: non_empty(props.formatted),
            cuisine: props.catering.and_then(|c| non_empty(c.cuisine)),
            coordinate,
            photo_url: props.photo.and_then(|p| non_empty(p.url)),
            rating: props.rate,
        })
    }
}

// ---------------------------------------------------------------------------
// v1/geocode/reverse
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeProperties {
    #[serde(default)]
    pub formatted: Option<String>,
}

// ---------------------------------------------------------------------------
// v1/routing
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RouteProperties {
    /// Path length in meters.
    pub distance: f64,
    /// Travel time in seconds.
    pub time: f64,
}

/// Distance and duration of the first route returned for a waypoint pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub distance_meters: f64,
    pub duration_secs: f64,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

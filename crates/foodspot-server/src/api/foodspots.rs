use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use foodspot_core::CoreError;
use foodspot_search::CategorizedResponse;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_search_error, ApiError, AppState};

/// Browsers and form posts send coordinates as strings as often as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(in crate::api) enum CoordinateInput {
    Number(f64),
    Text(String),
}

impl CoordinateInput {
    fn parse(&self) -> Result<f64, CoreError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| CoreError::InvalidCoordinateFormat),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct FoodspotsRequest {
    pub latitude: Option<CoordinateInput>,
    pub longitude: Option<CoordinateInput>,
}

impl FoodspotsRequest {
    fn coordinates(&self) -> Result<(f64, f64), CoreError> {
        match (&self.latitude, &self.longitude) {
            (Some(lat), Some(lng)) => Ok((lat.parse()?, lng.parse()?)),
            _ => Err(CoreError::InvalidCoordinateFormat),
        }
    }
}

/// POST /api/v1/foodspots — nearby food places grouped by category.
pub(in crate::api) async fn search_foodspots(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<FoodspotsRequest>, JsonRejection>,
) -> Result<Json<CategorizedResponse>, ApiError> {
    let rid = req_id.0;

    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(request_id = %rid, error = %rejection, "rejected foodspots body");
        ApiError::new(rid.clone(), "validation_error", "Invalid request body")
    })?;

    let (latitude, longitude) = body
        .coordinates()
        .map_err(|e| ApiError::new(rid.clone(), "validation_error", e.to_string()))?;

    let response = state
        .search
        .search(latitude, longitude)
        .await
        .map_err(|e| map_search_error(rid.clone(), &e))?;

    tracing::info!(
        request_id = %rid,
        total = response.total_restaurants(),
        "foodspots search served"
    );
    Ok(Json(response))
}

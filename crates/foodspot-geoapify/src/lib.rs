//! HTTP client for the Geoapify places, reverse-geocoding and routing APIs.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientSettings, GeoapifyClient, PlaceQuery, PlaceQueryKind};
pub use error::GeoapifyError;
pub use types::RouteSummary;

use crate::geo::Coordinate;

/// A place record returned by an upstream search, before dedup or scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    /// Provider-assigned identifier, if the upstream exposes one.
    pub provider_id: Option<String>,
    pub name: Option<String>,
    /// Single-line formatted street address.
    pub address: Option<String>,
    /// Free-form cuisine tag, e.g. `"biryani"` or `"pizza;italian"`.
    pub cuisine: Option<String>,
    pub coordinate: Coordinate,
    pub photo_url: Option<String>,
    /// Provider rating; never synthesized when missing.
    pub rating: Option<f64>,
}

impl RawCandidate {
    /// A candidate with only a name and position, everything else absent.
    #[must_use]
    pub fn named(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            provider_id: None,
            name: Some(name.into()),
            address: None,
            cuisine: None,
            coordinate,
            photo_url: None,
            rating: None,
        }
    }
}

use thiserror::Error;

/// Errors returned by the Geoapify client.
#[derive(Debug, Error)]
pub enum GeoapifyError {
    /// Network, TLS, timeout or non-2xx failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed but carried no usable feature.
    #[error("empty response for {context}")]
    EmptyResponse { context: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl GeoapifyError {
    /// `true` when the request was abandoned because its deadline elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, GeoapifyError::Http(e) if e.is_timeout())
    }
}

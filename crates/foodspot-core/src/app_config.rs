use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Absent keys are tolerated at startup; each search then fails with a
    /// configuration error instead.
    pub geoapify_api_key: Option<String>,
    pub geoapify_base_url: String,
    pub user_agent: String,
    pub search_radius_meters: u32,
    pub search_timeout_secs: u64,
    pub upstream_timeout_secs: u64,
    pub routing_concurrency: usize,
    pub exact_route_limit: usize,
    pub response_cache_ttl_secs: u64,
    pub geocode_cache_ttl_secs: u64,
    pub route_cache_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "geoapify_api_key",
                &self.geoapify_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geoapify_base_url", &self.geoapify_base_url)
            .field("user_agent", &self.user_agent)
            .field("search_radius_meters", &self.search_radius_meters)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("routing_concurrency", &self.routing_concurrency)
            .field("exact_route_limit", &self.exact_route_limit)
            .field("response_cache_ttl_secs", &self.response_cache_ttl_secs)
            .field("geocode_cache_ttl_secs", &self.geocode_cache_ttl_secs)
            .field("route_cache_ttl_secs", &self.route_cache_ttl_secs)
            .finish()
    }
}

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Which browser origins may talk to the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigin {
    Any,
    Exact(HeaderValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origin: AllowedOrigin,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Listen on all interfaces so the relay is reachable from containers.
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            cors_origin: AllowedOrigin::Exact(HeaderValue::from_static(DEFAULT_CORS_ORIGIN)),
        }
    }
}

impl Config {
    /// Reads `HOST`, `PORT` and `CORS_ORIGIN`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(value) = lookup("HOST") {
            config.host = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidHost { value, source })?;
        }

        if let Some(value) = lookup("PORT") {
            config.port = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?;
        }

        if let Some(value) = lookup("CORS_ORIGIN") {
            let origin = value.trim();
            config.cors_origin = if origin == "*" {
                AllowedOrigin::Any
            } else {
                let header = HeaderValue::from_str(origin).map_err(|source| {
                    ConfigError::InvalidOrigin {
                        value: value.clone(),
                        source,
                    }
                })?;
                AllowedOrigin::Exact(header)
            };
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods([Method::GET, Method::POST]);
        match &self.cors_origin {
            AllowedOrigin::Any => layer.allow_origin(Any),
            AllowedOrigin::Exact(origin) => layer.allow_origin(origin.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_stock_deployment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(
            config.cors_origin,
            AllowedOrigin::Exact(HeaderValue::from_static("http://localhost:3000"))
        );
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", " 8080 "),
            ("CORS_ORIGIN", "https://board.example.com"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.cors_origin,
            AllowedOrigin::Exact(HeaderValue::from_static("https://board.example.com"))
        );
    }

    #[test]
    fn star_allows_any_origin() {
        let config = Config::from_lookup(lookup(&[("CORS_ORIGIN", "*")])).unwrap();
        assert_eq!(config.cors_origin, AllowedOrigin::Any);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "fivethousand")])),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "70000")])),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("HOST", "localhost:1")])),
            Err(ConfigError::InvalidHost { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("CORS_ORIGIN", "http://bad\norigin")])),
            Err(ConfigError::InvalidOrigin { .. })
        ));
    }
}

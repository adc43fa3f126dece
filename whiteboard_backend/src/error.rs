use std::io;

use thiserror::Error;

/// Problems reading the relay configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("invalid HOST '{value}': {source}")]
    InvalidHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid CORS_ORIGIN '{value}': {source}")]
    InvalidOrigin {
        value: String,
        #[source]
        source: axum::http::header::InvalidHeaderValue,
    },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("server I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_port(value: &str) -> Result<u16, ServerError> {
        let port = value.parse::<u16>().map_err(|source| ConfigError::InvalidPort {
            value: value.to_string(),
            source,
        })?;
        Ok(port)
    }

    #[test]
    fn config_errors_surface_unchanged() {
        let err = parse_port("http").unwrap_err();
        assert!(matches!(err, ServerError::Config(ConfigError::InvalidPort { .. })));
        assert!(err.to_string().starts_with("invalid PORT 'http'"));
        assert_eq!(parse_port("5000").unwrap(), 5000);
    }

    #[test]
    fn io_errors_are_labelled() {
        let err = ServerError::from(io::Error::new(io::ErrorKind::AddrInUse, "port taken"));
        assert_eq!(err.to_string(), "server I/O failed: port taken");
    }
}

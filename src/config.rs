use std::env;
use std::net::SocketAddr;

use crate::error::AppError;

pub const DEFAULT_API_BASE_URL: &str = "https://course-sys-backend.onrender.com/api";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let bind_addr =
            env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        Self::new(&api_base_url, &bind_addr)
    }

    pub fn new(api_base_url: &str, bind_addr: &str) -> Result<Self, AppError> {
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("invalid BIND_ADDR '{}': {}", bind_addr, e)))?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = AppConfig::new("http://localhost:8080/api/", "127.0.0.1:3000").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn test_invalid_bind_addr() {
        let err = AppConfig::new(DEFAULT_API_BASE_URL, "not-an-addr").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}

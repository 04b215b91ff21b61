use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| hcmail::DEFAULT_BASE_URL.to_string()),
            data_dir: env::var("DATA_DIR").ok().map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_override_defaults() {
        env::set_var("PORT", "4100");
        env::set_var("UPSTREAM_URL", "http://localhost:9000");
        env::set_var("DATA_DIR", "/tmp/mailscan-data");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 4100);
        assert_eq!(config.upstream_url, "http://localhost:9000");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/mailscan-data")));

        env::remove_var("PORT");
        env::remove_var("UPSTREAM_URL");
        env::remove_var("DATA_DIR");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_url, hcmail::DEFAULT_BASE_URL);
        assert_eq!(config.data_dir, None);
    }
}

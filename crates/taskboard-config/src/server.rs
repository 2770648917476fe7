use std::env;

use crate::{env_flag, env_or};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `development`, `production` or `test`.
    pub environment: String,
    pub run_migrations: bool,
    pub metrics_enabled: bool,
    pub log_level: String,
    pub log_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
            run_migrations: env_flag("RUN_MIGRATIONS", true),
            metrics_enabled: env_flag("METRICS_ENABLED", true),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "storage/logs".to_string()),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: "test".to_string(),
            run_migrations: false,
            metrics_enabled: false,
            log_level: "info".to_string(),
            log_dir: "storage/logs".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_is_development() {
        let mut config = ServerConfig::default();
        assert!(!config.is_development());

        config.environment = "Development".to_string();
        assert!(config.is_development());
    }
}

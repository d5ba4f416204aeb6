use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub client: ClientConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Where the editor reads and writes the menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub menu: String,
    pub request_timeout_secs: u64,
}

/// Reference menu store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub auth_token: Option<String>,
    pub enable_cors: bool,
    pub enable_request_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Client overrides
        if let Ok(v) = env::var("MENU_API_URL") {
            self.client.api_url = v;
        }
        if let Ok(v) = env::var("MENU_API_TOKEN") {
            self.client.api_token = Some(v).filter(|t| !t.is_empty());
        }
        if let Ok(v) = env::var("MENU_NAME") {
            self.client.menu = v;
        }
        if let Ok(v) = env::var("MENU_REQUEST_TIMEOUT_SECS") {
            self.client.request_timeout_secs = v.parse().unwrap_or(self.client.request_timeout_secs);
        }

        // Server overrides
        if let Ok(v) = env::var("MENU_SERVER_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("MENU_SERVER_TOKEN") {
            self.server.auth_token = Some(v).filter(|t| !t.is_empty());
        }
        if let Ok(v) = env::var("MENU_SERVER_ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }
        if let Ok(v) = env::var("MENU_SERVER_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            client: ClientConfig {
                api_url: "http://localhost:3000".to_string(),
                api_token: None,
                menu: "main".to_string(),
                request_timeout_secs: 30,
            },
            server: ServerConfig {
                port: 3000,
                auth_token: None,
                enable_cors: true,
                enable_request_logging: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            client: ClientConfig {
                api_url: "https://staging.example.com".to_string(),
                api_token: None,
                menu: "main".to_string(),
                request_timeout_secs: 15,
            },
            server: ServerConfig {
                port: 8080,
                auth_token: None,
                enable_cors: true,
                enable_request_logging: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            client: ClientConfig {
                api_url: "https://app.example.com".to_string(),
                api_token: None,
                menu: "main".to_string(),
                request_timeout_secs: 10,
            },
            server: ServerConfig {
                port: 8080,
                auth_token: None,
                enable_cors: false,
                enable_request_logging: false,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.client.api_url, "http://localhost:3000");
        assert_eq!(config.client.menu, "main");
        assert!(config.server.auth_token.is_none());
        assert!(config.server.enable_cors);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.client.api_url.starts_with("https://"));
        assert_eq!(config.client.request_timeout_secs, 10);
        assert!(!config.server.enable_request_logging);
    }
}

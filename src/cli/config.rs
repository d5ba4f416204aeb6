use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HttpMenuBackend;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub description: String,
    pub added_at: DateTime<Utc>,
    pub last_ping: Option<DateTime<Utc>>,
    pub status: ServerStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
    Unknown,
}

/// Registered menu stores, keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerRegistry {
    pub servers: HashMap<String, ServerInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub current_server: Option<String>,
}

impl ServerInfo {
    pub fn new(url: String, token: Option<String>, description: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            description,
            added_at: Utc::now(),
            last_ping: None,
            status: ServerStatus::Unknown,
        }
    }

    pub fn update_ping(&mut self, status: ServerStatus) {
        self.last_ping = Some(Utc::now());
        self.status = status;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("MENU_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("menu-admin").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_server_registry() -> anyhow::Result<ServerRegistry> {
    let server_file = get_config_dir()?.join("server.json");

    if !server_file.exists() {
        return Ok(ServerRegistry::default());
    }

    let content = fs::read_to_string(server_file)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_server_registry(registry: &ServerRegistry) -> anyhow::Result<()> {
    let server_file = get_config_dir()?.join("server.json");
    fs::write(server_file, serde_json::to_string_pretty(registry)?)?;
    Ok(())
}

pub fn load_environment_config() -> anyhow::Result<EnvironmentConfig> {
    let env_file = get_config_dir()?.join("env.json");

    if !env_file.exists() {
        return Ok(EnvironmentConfig::default());
    }

    let content = fs::read_to_string(env_file)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_environment_config(config: &EnvironmentConfig) -> anyhow::Result<()> {
    let env_file = get_config_dir()?.join("env.json");
    fs::write(env_file, serde_json::to_string_pretty(config)?)?;
    Ok(())
}

pub async fn ping_server(server_info: &ServerInfo) -> ServerStatus {
    let client = reqwest::Client::new();
    let url = format!("{}/health", server_info.url);

    match client.get(&url).timeout(Duration::from_secs(5)).send().await {
        Ok(response) if response.status().is_success() => ServerStatus::Up,
        _ => ServerStatus::Down,
    }
}

/// Backend for `menu`: the current registered server when one is selected,
/// otherwise the URL and token from the environment.
pub fn resolve_backend(menu: Option<String>) -> anyhow::Result<HttpMenuBackend> {
    let app = &crate::config::config().client;
    let menu = menu.unwrap_or_else(|| app.menu.clone());
    let timeout = Duration::from_secs(app.request_timeout_secs);

    let env_config = load_environment_config()?;
    let backend = match env_config.current_server {
        Some(name) => {
            let registry = load_server_registry()?;
            let info = registry
                .servers
                .get(&name)
                .ok_or_else(|| anyhow::anyhow!("Current server '{}' not found in configuration", name))?;
            let token = info.token.clone().or_else(|| app.api_token.clone());
            HttpMenuBackend::new(&info.url, menu, token, timeout)?
        }
        None => HttpMenuBackend::new(&app.api_url, menu, app.api_token.clone(), timeout)?,
    };
    Ok(backend)
}

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Register a menu store")]
    Add {
        #[arg(help = "Server URL")]
        url: String,
        #[arg(help = "Server name (defaults to the URL host)")]
        name: Option<String>,
        #[arg(long, help = "Bearer token sent with every request")]
        token: Option<String>,
        #[arg(long, default_value = "", help = "Free-form description")]
        description: String,
    },

    #[command(about = "List registered servers")]
    List,

    #[command(about = "Switch to server (persistent selection)")]
    Use {
        #[arg(help = "Server name to switch to")]
        name: String,
    },

    #[command(about = "Remove server from registry")]
    Delete {
        #[arg(help = "Server name to delete")]
        name: String,
    },

    #[command(about = "Health check a server (defaults to current server)")]
    Ping {
        #[arg(help = "Server name to ping")]
        name: Option<String>,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Add {
            url,
            name,
            token,
            description,
        } => {
            let parsed = url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;
            let name = match name {
                Some(name) => name,
                None => parsed
                    .host_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("Server URL '{}' has no host, pass a name", url))?,
            };

            let mut registry = load_server_registry()?;
            if registry.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' already exists", name));
            }
            registry.servers.insert(name.clone(), ServerInfo::new(url, token, description));
            save_server_registry(&registry)?;

            // first server becomes current
            let mut env_config = load_environment_config()?;
            if env_config.current_server.is_none() {
                env_config.current_server = Some(name.clone());
                save_environment_config(&env_config)?;
            }

            output_success(
                &output_format,
                &format!("Server '{}' added", name),
                Some(json!({ "server": name })),
            )
        }
        ServerCommands::List => {
            let registry = load_server_registry()?;
            let env_config = load_environment_config()?;

            if registry.servers.is_empty() {
                return output_empty_collection(&output_format, "servers", "No servers configured");
            }

            let mut names: Vec<&String> = registry.servers.keys().collect();
            names.sort();

            match output_format {
                OutputFormat::Json => {
                    let servers: Vec<_> = names
                        .iter()
                        .map(|name| {
                            let info = &registry.servers[*name];
                            json!({
                                "name": name,
                                "url": info.url,
                                "description": info.description,
                                "status": info.status,
                                "added_at": info.added_at,
                                "last_ping": info.last_ping,
                                "current": env_config.current_server.as_ref() == Some(*name)
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json!({ "servers": servers }))?);
                }
                OutputFormat::Text => {
                    println!("{:<15} {:<35} {:<8} {:<17} {}", "NAME", "URL", "STATUS", "ADDED", "DESCRIPTION");
                    println!("{}", "-".repeat(90));

                    for name in names {
                        let info = &registry.servers[name];
                        let current_marker = if env_config.current_server.as_ref() == Some(name) { "*" } else { " " };
                        let status = serde_json::to_value(info.status)?;
                        println!(
                            "{}{:<14} {:<35} {:<8} {:<17} {}",
                            current_marker,
                            name,
                            info.url,
                            status.as_str().unwrap_or("unknown"),
                            info.added_at.format("%Y-%m-%d %H:%M"),
                            info.description
                        );
                    }
                }
            }
            Ok(())
        }
        ServerCommands::Use { name } => {
            if !load_server_registry()?.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' not found", name));
            }
            let mut env_config = load_environment_config()?;
            env_config.current_server = Some(name.clone());
            save_environment_config(&env_config)?;

            output_success(
                &output_format,
                &format!("Switched to server '{}'", name),
                Some(json!({ "current_server": name })),
            )
        }
        ServerCommands::Delete { name } => {
            let mut registry = load_server_registry()?;
            if registry.servers.remove(&name).is_none() {
                return Err(anyhow::anyhow!("Server '{}' not found", name));
            }
            save_server_registry(&registry)?;

            let mut env_config = load_environment_config()?;
            if env_config.current_server.as_deref() == Some(name.as_str()) {
                env_config.current_server = None;
                save_environment_config(&env_config)?;
            }

            output_success(&output_format, &format!("Server '{}' deleted successfully", name), None)
        }
        ServerCommands::Ping { name } => {
            let name = match name {
                Some(name) => name,
                None => load_environment_config()?
                    .current_server
                    .ok_or_else(|| anyhow::anyhow!("No current server set"))?,
            };

            let mut registry = load_server_registry()?;
            let info = registry
                .servers
                .get_mut(&name)
                .ok_or_else(|| anyhow::anyhow!("Server '{}' not found", name))?;
            let status = ping_server(info).await;
            info.update_ping(status);
            save_server_registry(&registry)?;

            match status {
                ServerStatus::Up => output_success(
                    &output_format,
                    &format!("Server '{}' is up", name),
                    Some(json!({ "server": name, "status": status })),
                ),
                _ => Err(anyhow::anyhow!("Server '{}' did not answer the health check", name)),
            }
        }
    }
}

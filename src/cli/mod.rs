pub mod commands;
pub mod config;
pub mod repl;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "menu")]
#[command(about = "Menu CLI - edit the site navigation menu")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Menu store registry")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Print a menu tree")]
    Show {
        #[arg(help = "Menu name (defaults to MENU_NAME or 'main')")]
        menu: Option<String>,
    },

    #[command(about = "Edit a menu interactively")]
    Edit {
        #[arg(help = "Menu name (defaults to MENU_NAME or 'main')")]
        menu: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format).await,
        Commands::Show { menu } => commands::menu::show(menu, output_format).await,
        Commands::Edit { menu } => commands::menu::edit(menu, output_format).await,
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod context;
mod logging;

use commands::layout::{LayoutAction, Panel};

#[derive(Parser)]
#[command(name = "harbor")]
#[command(about = "Harbor - browse projects and coding-assistant sessions", long_about = None)]
struct Cli {
    /// Use this directory instead of ~/.config/harbor
    #[arg(long, global = true, env = "HARBOR_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered and discovered projects
    Projects {
        /// Case-insensitive filter on path, id and name
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Register a project directory
    Add {
        path: PathBuf,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Remove a registered project
    Remove { project_id: String },
    /// Set or clear a registered project's display name
    Rename {
        project_id: String,
        name: Option<String>,
    },
    /// List the sessions of a project
    Sessions { project_id: String },
    /// Show or change the panel layout
    Layout {
        #[command(subcommand)]
        action: Option<LayoutCommand>,
    },
}

#[derive(Subcommand)]
enum LayoutCommand {
    /// Print the current layout
    Show,
    /// Collapse or expand a panel
    Toggle { panel: Panel },
    /// Set a side panel's width in pixels
    Resize { panel: Panel, width: u32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = context::AppContext::load(cli.config_dir)?;
    let _guard = logging::init(&ctx.paths, &ctx.config.log_level)?;
    if let Some(e) = &ctx.config_error {
        tracing::warn!("[Config] Ignoring unreadable config, using defaults: {}", e);
    }
    let json = cli.json;

    match cli.command {
        Commands::Projects { query } => commands::projects::list(&ctx, query, json).await?,
        Commands::Add { path, name } => commands::projects::add(&ctx, path, name, json).await?,
        Commands::Remove { project_id } => commands::projects::remove(&ctx, &project_id).await?,
        Commands::Rename { project_id, name } => {
            commands::projects::rename(&ctx, &project_id, name, json).await?
        }
        Commands::Sessions { project_id } => {
            commands::sessions::list(&ctx, &project_id, json).await?
        }
        Commands::Layout { action } => {
            let action = match action.unwrap_or(LayoutCommand::Show) {
                LayoutCommand::Show => LayoutAction::Show,
                LayoutCommand::Toggle { panel } => LayoutAction::Toggle(panel),
                LayoutCommand::Resize { panel, width } => LayoutAction::Resize(panel, width),
            };
            commands::layout::run(&ctx, action, json).await?
        }
    }

    Ok(())
}

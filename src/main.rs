//! Marginalia CLI - incremental Apple Books highlight export
//!
//! Usage: marginalia <COMMAND>
//!
//! Commands:
//!   sync    Export new highlights once and exit
//!   watch   Sync on start, on database changes, and periodically
//!   status  Show the watermark, vault, and source databases
//!   reset   Move the watermark

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use ui::context::UiContext;
use ui::views::config::render_config_warning;

fn main() -> Result<()> {
    let cli = Cli::parse();
    marginalia::logging::init(cli.verbose)?;

    let cwd = std::env::current_dir()?;
    let loaded = marginalia::config::discover(cli.config.as_deref(), &cwd)?;
    let mut config = loaded.config;
    if let Some(vault) = cli.vault {
        config.vault.path = Some(marginalia::infrastructure::fs::expand_home(&vault));
    }
    debug!(?config, "resolved configuration");

    let ui = UiContext::new(cli.json);
    for warning in &loaded.warnings {
        eprint!("{}", render_config_warning(warning, ui.color, ui.unicode));
    }

    match cli.command {
        Commands::Sync { full } => commands::sync::cmd_sync(&config, full, ui, cli.verbose),
        Commands::Watch => commands::watch::cmd_watch(&config, ui),
        Commands::Status => commands::status::cmd_status(&config, loaded.origin.as_deref(), ui),
        Commands::Reset { to } => commands::reset::cmd_reset(&config, to, ui),
    }
}

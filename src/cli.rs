use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Marginalia - incremental Apple Books highlight export
#[derive(Parser, Debug)]
#[command(name = "marginalia")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./marginalia.toml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Vault directory (overrides config and MARGINALIA_VAULT)
    #[arg(long, global = true, value_name = "PATH")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export new highlights once and exit
    Sync {
        /// Re-export every highlight, not just those above the watermark
        #[arg(long)]
        full: bool,
    },

    /// Sync on start, then on database changes and periodically
    Watch,

    /// Show the watermark, vault, and resolved source databases
    Status,

    /// Move the watermark so the next sync re-exports from that position
    Reset {
        /// New watermark position
        #[arg(long, default_value_t = 0, value_name = "POSITION", value_parser = clap::value_parser!(i64).range(0..))]
        to: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::try_parse_from(["marginalia", "sync"]).unwrap();
        assert!(matches!(cli.command, Commands::Sync { full: false }));
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_sync_full_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "marginalia",
            "sync",
            "--full",
            "--json",
            "-vv",
            "--vault",
            "/notes",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Sync { full: true }));
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.vault, Some(PathBuf::from("/notes")));
    }

    #[test]
    fn test_cli_parse_watch_with_config() {
        let cli =
            Cli::try_parse_from(["marginalia", "--config", "m.toml", "watch"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch));
        assert_eq!(cli.config, Some(PathBuf::from("m.toml")));
    }

    #[test]
    fn test_cli_parse_reset_defaults_to_zero() {
        let cli = Cli::try_parse_from(["marginalia", "reset"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { to: 0 }));

        let cli = Cli::try_parse_from(["marginalia", "reset", "--to", "120"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { to: 120 }));
    }

    #[test]
    fn test_cli_rejects_negative_reset() {
        assert!(Cli::try_parse_from(["marginalia", "reset", "--to", "-1"]).is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["marginalia"]).is_err());
    }
}

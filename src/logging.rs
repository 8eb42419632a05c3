//! Tracing subscriber setup
//!
//! Logs go to stderr so stdout stays clean for human output and NDJSON.

use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Preferred filter variable; `RUST_LOG` is honoured when it is unset
pub const LOG_ENV_VAR: &str = "MARGINALIA_LOG";

/// Default filter directive for a `-v` count
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "marginalia=info,warn",
        2 => "marginalia=debug,info",
        _ => "trace",
    }
}

fn build_filter(verbose: u8) -> EnvFilter {
    let from_env = std::env::var(LOG_ENV_VAR)
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .filter(|v| !v.trim().is_empty());

    from_env
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber.
///
/// Returns an error if a subscriber was already installed.
pub fn init(verbose: u8) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(verbose >= 2)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

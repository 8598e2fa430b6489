//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for reports and JSON lines. The
//! `TOZ_LOG` environment variable takes an `EnvFilter` directive and wins
//! over the `-v` count.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TOZ_LOG";

/// Default filter directive for a `-v` repetition count.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(error) = installed {
        tracing::debug!(%error, "tracing subscriber already installed");
    }
}

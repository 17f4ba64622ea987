//! Diagnostic logging setup.
//!
//! Events go to stderr so stdout stays clean for results and `--json`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "AGENTDEPLOY_LOG";

/// Filter directive used when `AGENTDEPLOY_LOG` is unset.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "agentdeploy_cli=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

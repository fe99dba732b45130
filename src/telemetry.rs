//! Logging initialization.
//!
//! Controlled by two environment variables:
//! - `MODSCOPE_LOG`: an `EnvFilter` directive (default `info`, or `debug`
//!   with `--verbose`)
//! - `MODSCOPE_LOG_FORMAT`: `json` for JSON events, anything else for
//!   human-readable lines
//!
//! Everything goes to stderr so stdout stays clean for the report.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Filter directive variable.
pub const LOG_ENV: &str = "MODSCOPE_LOG";
/// Output format variable.
pub const LOG_FORMAT_ENV: &str = "MODSCOPE_LOG_FORMAT";

/// Install the global subscriber. Call once, from `main`.
pub fn init(verbose: bool) {
    let filter = filter(std::env::var(LOG_ENV).ok().as_deref(), verbose);
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// An explicit directive wins; otherwise the level follows `verbose`.
fn filter(directive: Option<&str>, verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    match directive {
        Some(d) if !d.trim().is_empty() => {
            EnvFilter::try_new(d).unwrap_or_else(|_| EnvFilter::new(default))
        }
        _ => EnvFilter::new(default),
    }
}

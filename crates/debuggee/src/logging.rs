//! Structured logging for the harness.
//!
//! Scenario output on stdout/stderr is part of the contract with the debugger
//! tests, so diagnostics stay at `warn` unless `DEBUGGEE_LOG` asks for more.

use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

use crate::config::LOG_ENV;

pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Safe to call more than once; later calls are
/// no-ops.
pub fn init(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!("invalid {LOG_ENV} directive ({err}); using {DEFAULT_FILTER}");
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::new(DEFAULT_FILTER),
    };

    let _ = Registry::default()
        .with(filter)
        .with(
            subscriber_fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(None);
        init(Some("debug"));
        tracing::debug!(scenario = "none", "logging initialized twice");
    }

    #[test]
    fn bad_directive_falls_back() {
        init(Some("[[not a directive"));
    }
}

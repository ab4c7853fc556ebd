//! Diagnostic logging
//!
//! Logs go to stderr so command output on stdout stays pipeable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable that overrides the computed filter
pub const LOG_ENV: &str = "AMOSHELF_LOG";

/// Default filter directive for a verbosity level
///
/// `-1` is `--quiet`, `0` the default, each `-v` raises it by one.
pub fn default_directive(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-1 => "amoshelf=error",
        0 => "amoshelf=warn",
        1 => "amoshelf=info",
        _ => "amoshelf=debug",
    }
}

/// Install the global subscriber
///
/// `AMOSHELF_LOG` (or `RUST_LOG`) takes precedence over the verbosity flags.
pub fn init(verbosity: i8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(-1), "amoshelf=error");
        assert_eq!(default_directive(0), "amoshelf=warn");
        assert_eq!(default_directive(1), "amoshelf=info");
        assert_eq!(default_directive(2), "amoshelf=debug");
        assert_eq!(default_directive(7), "amoshelf=debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(0);
        init(2);
    }
}

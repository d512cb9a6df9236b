//! Diagnostic logging for the binary.

use std::env;
use std::io;

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "pendant=info";

/// Installs a stderr `tracing` subscriber.
///
/// Directives come from `PENDANT_LOG`, then `RUST_LOG`, then
/// `pendant=info`. Invalid directives fall back to the default.
pub fn init() {
    let pendant_log = env::var("PENDANT_LOG").ok();
    let rust_log = env::var("RUST_LOG").ok();
    let directives = select_directives(pendant_log.as_deref(), rust_log.as_deref());
    let filter =
        EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn select_directives<'value>(
    pendant_log: Option<&'value str>,
    rust_log: Option<&'value str>,
) -> &'value str {
    [pendant_log, rust_log]
        .into_iter()
        .flatten()
        .find(|directives| !directives.trim().is_empty())
        .unwrap_or(DEFAULT_DIRECTIVES)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{DEFAULT_DIRECTIVES, select_directives};

    #[rstest]
    #[case::pendant_wins(Some("pendant=debug"), Some("warn"), "pendant=debug")]
    #[case::rust_log_fallback(None, Some("warn"), "warn")]
    #[case::blank_pendant_ignored(Some("  "), Some("warn"), "warn")]
    #[case::default_when_unset(None, None, DEFAULT_DIRECTIVES)]
    fn directives_follow_precedence(
        #[case] pendant_log: Option<&str>,
        #[case] rust_log: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(select_directives(pendant_log, rust_log), expected);
    }
}

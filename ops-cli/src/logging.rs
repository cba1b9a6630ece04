use tracing::Level;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    format!(
        "permctl={level},ops_cli={level},auth_permissions={level},auth_identity={level},sqlx=warn,reqwest=info"
    )
}

/// Install the global subscriber: human-readable lines, or JSON for log
/// shippers. Logs go to stderr so command output stays parseable.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbose: bool, json: bool) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into());

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(false).starts_with("permctl=INFO"));
        assert!(default_filter(true).contains("auth_permissions=DEBUG"));
        assert!(default_filter(true).contains("sqlx=warn"));
        assert!(EnvFilter::try_new(default_filter(true)).is_ok());
    }
}

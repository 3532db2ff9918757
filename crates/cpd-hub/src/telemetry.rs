//! Tracing setup for the CPD hub.

use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("could not install the tracing subscriber")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn filter_from(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(level).map_err(|source| TelemetryError::Filter {
        value: level.to_string(),
        source,
    })
}

/// Install the global subscriber. `RUST_LOG` wins when set so operators
/// can raise verbosity without touching the service configuration; the
/// configured `CPD_HUB_LOG` level is the fallback.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter_from(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Install)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_level_names_build_a_filter() {
        assert!(filter_from("debug").is_ok());
        assert!(filter_from("info,cpd_hub=trace").is_ok());
    }

    #[test]
    fn malformed_filter_is_reported_with_its_value() {
        let err = filter_from("no=such=filter").expect_err("filter must be rejected");
        assert!(matches!(err, TelemetryError::Filter { ref value, .. } if value == "no=such=filter"));
    }
}

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::cpd::events::registry::{EventRegistryError, EventStoreError};
use crate::workflows::cpd::proposals::ProposalServiceError;
use crate::workflows::cpd::registrations::{RegistrationLedgerError, RegistrationStoreError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Proposal(ProposalServiceError),
    Registry(EventRegistryError),
    Ledger(RegistrationLedgerError),
    Allowlist(csv::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Proposal(err) => write!(f, "proposal workflow error: {}", err),
            AppError::Registry(err) => write!(f, "event registry error: {}", err),
            AppError::Ledger(err) => write!(f, "registration ledger error: {}", err),
            AppError::Allowlist(err) => write!(f, "allowlist ingest error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Proposal(err) => Some(err),
            AppError::Registry(err) => Some(err),
            AppError::Ledger(err) => Some(err),
            AppError::Allowlist(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Proposal(_)
            | AppError::Registry(_)
            | AppError::Ledger(_)
            | AppError::Allowlist(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ProposalServiceError> for AppError {
    fn from(value: ProposalServiceError) -> Self {
        Self::Proposal(value)
    }
}

impl From<EventRegistryError> for AppError {
    fn from(value: EventRegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<EventStoreError> for AppError {
    fn from(value: EventStoreError) -> Self {
        Self::Registry(value.into())
    }
}

impl From<RegistrationLedgerError> for AppError {
    fn from(value: RegistrationLedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<RegistrationStoreError> for AppError {
    fn from(value: RegistrationStoreError) -> Self {
        Self::Ledger(value.into())
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Allowlist(value)
    }
}

// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use betledger_common::ErrorResponse;
use thiserror::Error;

use crate::auth::password::PolicyViolation;
use crate::auth::session::SessionError;
use crate::ledger::MoneyOverflow;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Weak password: {}", join_violations(.0))]
    WeakPassword(Vec<PolicyViolation>),

    #[error("Password found in breach corpus")]
    BreachedPassword,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked")]
    AccountLocked,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_violations(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(PolicyViolation::message)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::WeakPassword(_)
            | AppError::BreachedPassword
            | AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::AccountLocked => StatusCode::LOCKED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Session(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::WeakPassword(_) => "PWD_001",
            AppError::BreachedPassword => "PWD_002",
            AppError::DuplicateEmail => "ACC_001",
            AppError::InvalidCredentials => "AUTH_001",
            AppError::AccountLocked => "AUTH_002",
            AppError::Unauthenticated => "AUTH_003",
            AppError::NotFound(_) => "NF_001",
            AppError::Session(_) => "SES_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Message shown to the client. Internal details never leave the server.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.client_message().to_string(),
            AppError::WeakPassword(violations) => join_violations(violations),
            AppError::BreachedPassword => {
                "Dieses Passwort wurde in einem Datenleck gefunden. Bitte wählen Sie ein anderes Passwort."
                    .to_string()
            },
            AppError::DuplicateEmail => "E-Mail bereits registriert".to_string(),
            AppError::InvalidCredentials => "Ungültige Anmeldedaten".to_string(),
            AppError::AccountLocked => {
                "Konto ist gesperrt. Versuchen Sie es später erneut.".to_string()
            },
            AppError::Unauthenticated => "Anmeldung erforderlich".to_string(),
            AppError::NotFound(what) => format!("{what} nicht gefunden"),
            AppError::Session(_) => "Fehler beim Abmelden".to_string(),
            AppError::Internal(_) => "Interner Serverfehler".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: self.client_message(),
            code: self.error_code().to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<MoneyOverflow> for AppError {
    fn from(err: MoneyOverflow) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

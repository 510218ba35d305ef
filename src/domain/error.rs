//! Uniform service error: a message plus an HTTP-like status code.
//!
//! Every failure coming out of the Solana SDK is wrapped the same way (status 500, SDK message
//! preserved). Input validation and "not found" lookups use 400 / 404 so the HTTP layer can pass
//! the status through untouched.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (status {status_code})")]
pub struct ServiceError {
    pub message: String,
    pub status_code: u16,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, 400)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, 404)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, 500)
    }

    /// Wraps an SDK / RPC failure with the name of the operation that failed.
    pub fn ledger(action: &str, err: anyhow::Error) -> Self {
        Self::internal(format!("{} failed: {:#}", action, err))
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the whole context chain on one line.
        Self::internal(format!("{:#}", err))
    }
}

impl From<solana_program::program_error::ProgramError> for ServiceError {
    fn from(err: solana_program::program_error::ProgramError) -> Self {
        Self::internal(format!("instruction build failed: {}", err))
    }
}

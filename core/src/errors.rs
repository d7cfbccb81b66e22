use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("account {0} not found")]
    AccountNotFound(String),
    #[error("accounts service returned HTTP {status}")]
    Status { status: u16, body: String },
    #[error("accounts service request failed")]
    Transport(#[source] reqwest::Error),
    #[error("build accounts service HTTP client")]
    TransportSetup(#[source] reqwest::Error),
    #[error("decode accounts service response")]
    Decode(#[from] serde_json::Error),
    #[error("config path unavailable (no home directory)")]
    ConfigPathUnavailable,
    #[error("config already exists at {0}")]
    ConfigExists(PathBuf),
    #[error("unknown protocol: {0} (expected http or https)")]
    InvalidProtocol(String),
    #[error("accounts service url not configured")]
    MissingServiceUrl,
}

impl AccountsError {
    /// HTTP status of a [`AccountsError::Status`] error.
    ///
    /// Transport errors never carry one: error statuses are returned as
    /// responses, so a `Transport` error means no response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AccountsError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_status_errors_carry_a_status() {
        let err = AccountsError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(AccountsError::AccountNotFound("1".to_string()).status(), None);
        assert_eq!(AccountsError::MissingServiceUrl.status(), None);
    }
}

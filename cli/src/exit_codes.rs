use accounts_core::errors::AccountsError;
use accounts_core::model::ErrorKind;

pub fn exit_code_for_error(err: &anyhow::Error) -> i32 {
    if let Some(accounts_err) = err.downcast_ref::<AccountsError>() {
        return match accounts_err {
            AccountsError::AccountNotFound(_) => 2,
            AccountsError::Status { .. } => 5,
            AccountsError::Transport(req_err) if req_err.is_timeout() => 4,
            AccountsError::Transport(_) => 1,
            AccountsError::TransportSetup(_) => 3,
            AccountsError::Decode(_) => 3,
            AccountsError::ConfigPathUnavailable
            | AccountsError::ConfigExists(_)
            | AccountsError::InvalidProtocol(_)
            | AccountsError::MissingServiceUrl => 3,
        };
    }
    if let Some(req_err) = err.downcast_ref::<reqwest::Error>()
        && req_err.is_timeout()
    {
        return 4;
    }
    if err.downcast_ref::<serde_json::Error>().is_some() {
        return 3;
    }
    1
}

pub fn error_kind_for_error(err: &anyhow::Error) -> ErrorKind {
    if let Some(accounts_err) = err.downcast_ref::<AccountsError>() {
        return match accounts_err {
            AccountsError::AccountNotFound(_) => ErrorKind::NotFound,
            AccountsError::Status { .. } | AccountsError::Decode(_) => ErrorKind::Remote,
            AccountsError::Transport(_) => ErrorKind::Runtime,
            AccountsError::TransportSetup(_)
            | AccountsError::ConfigPathUnavailable
            | AccountsError::ConfigExists(_)
            | AccountsError::InvalidProtocol(_)
            | AccountsError::MissingServiceUrl => ErrorKind::Config,
        };
    }
    if err.downcast_ref::<serde_json::Error>().is_some() {
        return ErrorKind::Config;
    }
    ErrorKind::Runtime
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn not_found_survives_context() {
        let err = Err::<(), _>(AccountsError::AccountNotFound("999".to_string()))
            .context("find account 999")
            .unwrap_err();
        assert_eq!(exit_code_for_error(&err), 2);
        assert_eq!(error_kind_for_error(&err), ErrorKind::NotFound);
    }

    #[test]
    fn remote_status_has_its_own_code() {
        let err = anyhow::Error::new(AccountsError::Status {
            status: 500,
            body: String::new(),
        });
        assert_eq!(exit_code_for_error(&err), 5);
        assert_eq!(error_kind_for_error(&err), ErrorKind::Remote);
    }

    #[test]
    fn config_errors() {
        let err = anyhow::Error::new(AccountsError::MissingServiceUrl);
        assert_eq!(exit_code_for_error(&err), 3);
        assert_eq!(error_kind_for_error(&err), ErrorKind::Config);

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = anyhow::Error::new(parse).context("parse config");
        assert_eq!(exit_code_for_error(&err), 3);
    }

    #[test]
    fn anything_else_is_runtime() {
        let err = anyhow::anyhow!("something odd");
        assert_eq!(exit_code_for_error(&err), 1);
        assert_eq!(error_kind_for_error(&err), ErrorKind::Runtime);
    }
}

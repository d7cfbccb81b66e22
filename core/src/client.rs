use crate::config::ServiceConfig;
use crate::errors::AccountsError;
use crate::model::Account;
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport};
use std::sync::Arc;
use tracing::{debug, info};

/// Local facade over the remote accounts service.
pub struct AccountsClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl AccountsClient {
    pub fn new(config: &ServiceConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let base_url = config.base_url();
        info!(base_url = %base_url, "Using accounts service url");
        debug!(transport = transport.name(), "accounts service transport");
        Self {
            base_url,
            transport,
        }
    }

    /// Builds the default reqwest transport for `config`. TLS setup failures
    /// are returned rather than falling back to a verifying client.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AccountsError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn find_by_number(&self, account_number: &str) -> Result<Account, AccountsError> {
        info!(account_number, "find_by_number() invoked");
        let url = format!(
            "{}/accounts/{}",
            self.base_url,
            urlencoding::encode(account_number)
        );
        let resp = self.transport.get(&url).await?;

        if resp.status == 404 {
            return Err(AccountsError::AccountNotFound(account_number.to_string()));
        }
        if !resp.is_success() {
            return Err(status_error(resp));
        }
        if resp.is_blank() {
            return Err(AccountsError::AccountNotFound(account_number.to_string()));
        }
        Ok(serde_json::from_slice(&resp.body)?)
    }

    /// Accounts whose owner matches `name`.
    ///
    /// Any HTTP error status or transport failure yields an empty list, the
    /// same as a search without matches.
    pub async fn by_owner_contains(&self, name: &str) -> Result<Vec<Account>, AccountsError> {
        info!(name, "by_owner_contains() invoked");
        let url = format!(
            "{}/accounts/owner/{}",
            self.base_url,
            urlencoding::encode(name)
        );
        let resp = match self.transport.get(&url).await {
            Ok(resp) => resp,
            Err(err) => {
                debug!(error = %err, "owner search failed; returning no accounts");
                return Ok(Vec::new());
            }
        };
        if !resp.is_success() {
            debug!(status = resp.status, "owner search failed; returning no accounts");
            return Ok(Vec::new());
        }
        if resp.is_blank() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&resp.body)?)
    }
}

fn status_error(resp: HttpResponse) -> AccountsError {
    AccountsError::Status {
        status: resp.status,
        body: resp.body_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Protocol;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned responses keyed by request URL; unknown URLs answer 404.
    #[derive(Default)]
    struct FakeTransport {
        routes: HashMap<String, HttpResponse>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn route(mut self, url: &str, status: u16, body: &str) -> Self {
            self.routes
                .insert(url.to_string(), HttpResponse::new(status, body));
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().expect("lock requests").clone()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn get(&self, url: &str) -> Result<HttpResponse, AccountsError> {
            self.requests
                .lock()
                .expect("lock requests")
                .push(url.to_string());
            Ok(self
                .routes
                .get(url)
                .cloned()
                .unwrap_or_else(|| HttpResponse::new(404, "")))
        }
    }

    fn client_with(transport: FakeTransport) -> (AccountsClient, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        let config = ServiceConfig::new("accounts-service", Protocol::Http);
        let client = AccountsClient::new(&config, transport.clone());
        (client, transport)
    }

    const BASE: &str = "http://accounts-service";

    #[test]
    fn base_url_gains_configured_protocol() {
        let config = ServiceConfig::new("accounts.example.com:8443", Protocol::Https);
        let client = AccountsClient::new(&config, Arc::new(FakeTransport::default()));
        assert_eq!(client.base_url(), "https://accounts.example.com:8443");
        assert!(client.base_url().starts_with("https://"));
    }

    #[test]
    fn from_config_builds_insecure_transport_on_request() {
        let config = ServiceConfig::new("accounts.example.com", Protocol::Https)
            .with_skip_ssl_verification(true);
        let client = AccountsClient::from_config(&config).expect("build client");
        assert_eq!(client.transport.name(), "reqwest (insecure tls)");
    }

    #[tokio::test]
    async fn find_by_number_decodes_account() {
        let (client, transport) = client_with(FakeTransport::default().route(
            &format!("{}/accounts/123", BASE),
            200,
            r#"{"id":1,"number":"123","owner":"Keri Lee","balance":250.75}"#,
        ));

        let account = client.find_by_number("123").await.expect("account");
        assert_eq!(account.number.as_deref(), Some("123"));
        assert_eq!(account.owner.as_deref(), Some("Keri Lee"));
        assert_eq!(transport.requests(), vec![format!("{}/accounts/123", BASE)]);
    }

    #[tokio::test]
    async fn find_by_number_maps_404_to_not_found() {
        let (client, _) = client_with(FakeTransport::default());
        let err = client.find_by_number("999").await.expect_err("not found");
        assert!(matches!(err, AccountsError::AccountNotFound(ref n) if n == "999"));
    }

    #[tokio::test]
    async fn find_by_number_maps_empty_success_to_not_found() {
        let (client, _) = client_with(
            FakeTransport::default()
                .route(&format!("{}/accounts/000", BASE), 200, "null")
                .route(&format!("{}/accounts/001", BASE), 200, ""),
        );

        for number in ["000", "001"] {
            let err = client.find_by_number(number).await.expect_err("not found");
            assert!(matches!(err, AccountsError::AccountNotFound(ref n) if n == number));
        }
    }

    #[tokio::test]
    async fn find_by_number_propagates_other_statuses() {
        let (client, _) = client_with(
            FakeTransport::default()
                .route(&format!("{}/accounts/500", BASE), 500, "boom")
                .route(&format!("{}/accounts/403", BASE), 403, ""),
        );

        let err = client.find_by_number("500").await.expect_err("status");
        match err {
            AccountsError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = client.find_by_number("403").await.expect_err("status");
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn find_by_number_reports_malformed_body() {
        let (client, _) = client_with(FakeTransport::default().route(
            &format!("{}/accounts/42", BASE),
            200,
            "[not an account",
        ));
        let err = client.find_by_number("42").await.expect_err("decode");
        assert!(matches!(err, AccountsError::Decode(_)));
    }

    #[tokio::test]
    async fn path_segments_are_encoded() {
        let (client, transport) = client_with(FakeTransport::default());
        let _ = client.find_by_number("12/34").await;
        let _ = client.by_owner_contains("Mary Ann").await;
        assert_eq!(
            transport.requests(),
            vec![
                format!("{}/accounts/12%2F34", BASE),
                format!("{}/accounts/owner/Mary%20Ann", BASE),
            ]
        );
    }

    #[tokio::test]
    async fn by_owner_contains_returns_matches() {
        let (client, _) = client_with(FakeTransport::default().route(
            &format!("{}/accounts/owner/Smith", BASE),
            200,
            r#"[{"number":"1","owner":"Anna Smith"},{"number":"2","owner":"Bob Smith"}]"#,
        ));

        let accounts = client.by_owner_contains("Smith").await.expect("accounts");
        let numbers: Vec<_> = accounts.iter().filter_map(|a| a.number.as_deref()).collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn by_owner_contains_empty_results() {
        let (client, _) = client_with(
            FakeTransport::default()
                .route(&format!("{}/accounts/owner/Nobody", BASE), 200, "[]")
                .route(&format!("{}/accounts/owner/Null", BASE), 200, "null"),
        );

        assert!(client.by_owner_contains("Nobody").await.expect("empty").is_empty());
        assert!(client.by_owner_contains("Null").await.expect("empty").is_empty());
    }

    #[tokio::test]
    async fn by_owner_contains_swallows_error_statuses() {
        let (client, _) = client_with(
            FakeTransport::default()
                .route(&format!("{}/accounts/owner/Nobody", BASE), 500, "boom")
                .route(&format!("{}/accounts/owner/Denied", BASE), 403, ""),
        );

        assert!(client.by_owner_contains("Nobody").await.expect("empty").is_empty());
        assert!(client.by_owner_contains("Denied").await.expect("empty").is_empty());
        assert!(client.by_owner_contains("Unrouted").await.expect("empty").is_empty());
    }

    #[tokio::test]
    async fn by_owner_contains_swallows_transport_failures() {
        struct Unreachable;

        #[async_trait]
        impl HttpTransport for Unreachable {
            fn name(&self) -> &'static str {
                "unreachable"
            }

            async fn get(&self, _url: &str) -> Result<HttpResponse, AccountsError> {
                Err(AccountsError::MissingServiceUrl)
            }
        }

        let config = ServiceConfig::new("accounts-service", Protocol::Http);
        let client = AccountsClient::new(&config, Arc::new(Unreachable));
        assert!(client.by_owner_contains("Smith").await.expect("empty").is_empty());
        assert!(matches!(
            client.find_by_number("1").await,
            Err(AccountsError::MissingServiceUrl)
        ));
    }

    #[tokio::test]
    async fn by_owner_contains_reports_malformed_body() {
        let (client, _) = client_with(FakeTransport::default().route(
            &format!("{}/accounts/owner/Smith", BASE),
            200,
            r#"{"number":"1"}"#,
        ));
        let err = client.by_owner_contains("Smith").await.expect_err("decode");
        assert!(matches!(err, AccountsError::Decode(_)));
    }
}

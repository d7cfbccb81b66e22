use crate::config::ServiceConfig;
use crate::errors::AccountsError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for an empty, whitespace-only, or JSON `null` body.
    pub fn is_blank(&self) -> bool {
        let trimmed = self.body.trim_ascii();
        trimmed.is_empty() || trimmed == b"null"
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Issues GET requests on behalf of [`crate::client::AccountsClient`].
///
/// Error statuses come back as an [`HttpResponse`]; only failures to get a
/// response at all are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get(&self, url: &str) -> Result<HttpResponse, AccountsError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    insecure: bool,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            insecure: false,
        }
    }

    /// Builds the transport for `config`. With https and skip verification
    /// requested, any certificate is accepted and hostnames are not checked.
    /// Never use that mode against production services.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AccountsError> {
        if !config.insecure_tls() {
            return Ok(Self::new());
        }

        warn!(
            url = %config.url,
            "TLS certificate and hostname verification disabled for accounts service"
        );
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()
            .map_err(AccountsError::TransportSetup)?;
        Ok(Self {
            client,
            insecure: true,
        })
    }

    pub fn is_insecure(&self) -> bool {
        self.insecure
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    fn name(&self) -> &'static str {
        if self.insecure {
            "reqwest (insecure tls)"
        } else {
            "reqwest"
        }
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, AccountsError> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(AccountsError::Transport)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(AccountsError::Transport)?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

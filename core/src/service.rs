use crate::client::AccountsClient;
use crate::config::{AccountsServiceConfig, Config, Protocol, ServiceConfig};
use crate::model::{AccountsPayload, LookupCommand};
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct FindRequest {
    pub number: String,
}

#[derive(Debug, Clone)]
pub struct OwnerRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct SetupRequest {
    pub url: String,
    pub protocol: Option<Protocol>,
    pub skip_ssl_verification: bool,
}

pub async fn lookup_account(
    client: &AccountsClient,
    request: &FindRequest,
) -> Result<AccountsPayload> {
    let account = client
        .find_by_number(&request.number)
        .await
        .with_context(|| format!("find account {}", request.number))?;
    Ok(AccountsPayload::ok(
        LookupCommand::Find,
        request.number.clone(),
        client.base_url(),
        vec![account],
    ))
}

pub async fn search_owner(
    client: &AccountsClient,
    request: &OwnerRequest,
) -> Result<AccountsPayload> {
    let accounts = client
        .by_owner_contains(&request.name)
        .await
        .with_context(|| format!("search accounts owned by {}", request.name))?;
    Ok(AccountsPayload::ok(
        LookupCommand::Owner,
        request.name.clone(),
        client.base_url(),
        accounts,
    ))
}

impl SetupRequest {
    /// True when the written config turns off TLS verification. The skip flag
    /// only has an effect for https.
    pub fn disables_tls_verification(&self) -> bool {
        ServiceConfig::new(self.url.trim(), self.protocol.unwrap_or_default())
            .with_skip_ssl_verification(self.skip_ssl_verification)
            .insecure_tls()
    }
}

pub fn build_setup_config(request: &SetupRequest) -> Config {
    Config {
        version: Some(1),
        accounts: Some(AccountsServiceConfig {
            url: Some(request.url.trim().to_string()),
            protocol: Some(request.protocol.unwrap_or_default()),
            skip_ssl_verification: Some(request.skip_ssl_verification),
        }),
    }
}

pub fn format_error_chain(err: &anyhow::Error) -> String {
    let mut parts: Vec<String> = err.chain().map(|e| e.to_string()).collect();
    if parts.is_empty() {
        return "Unknown error".to_string();
    }
    parts.dedup();
    parts.join(": ")
}

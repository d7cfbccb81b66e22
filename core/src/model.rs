use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Account as served by the accounts service.
///
/// Only the commonly used fields are typed; anything else the service sends
/// is kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupCommand {
    Find,
    Owner,
}

impl LookupCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupCommand::Find => "find",
            LookupCommand::Owner => "owner",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsPayload {
    pub command: String,
    pub query: String,
    pub base_url: Option<String>,
    pub accounts: Vec<Account>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub error: Option<ErrorPayload>,
}

impl AccountsPayload {
    pub fn ok(
        command: LookupCommand,
        query: impl Into<String>,
        base_url: impl Into<String>,
        accounts: Vec<Account>,
    ) -> Self {
        Self {
            command: command.as_str().to_string(),
            query: query.into(),
            base_url: Some(base_url.into()),
            accounts,
            fetched_at: Some(Utc::now()),
            error: None,
        }
    }

    pub fn error(command: String, query: String, error: ErrorPayload) -> Self {
        Self {
            command,
            query,
            base_url: None,
            accounts: Vec::new(),
            fetched_at: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: i32,
    pub message: String,
    pub kind: Option<ErrorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Config,
    NotFound,
    Remote,
    Runtime,
}

pub mod client;
pub mod config;
pub mod errors;
pub mod model;
pub mod service;
pub mod transport;

pub use client::AccountsClient;
pub use config::{Config, Protocol, ServiceConfig};
pub use errors::AccountsError;
pub use model::Account;

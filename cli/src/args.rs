use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use accounts_core::config::{Protocol, ServiceOverrides};
use accounts_core::model::OutputFormat;

use crate::logger::LogLevel;

#[derive(Parser, Debug)]
#[command(author, version, about = "Look up accounts on the accounts microservice")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug, Clone)]
pub struct GlobalArgs {
    #[arg(long, global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
    #[arg(long, global = true)]
    pub json_output: bool,
    #[arg(long, global = true)]
    pub json_only: bool,
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a single account by its number.
    Find(FindArgs),
    /// List accounts whose owner matches a name.
    Owner(OwnerArgs),
    Config(ConfigCommandArgs),
    /// Write a config file pointing at an accounts service.
    Setup(SetupArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ConnectionArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub protocol: Option<ProtocolArg>,
    /// Accept any TLS certificate and hostname (https only). Unsafe.
    #[arg(long)]
    pub skip_ssl_verification: bool,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> ServiceOverrides {
        ServiceOverrides {
            url: self.url.clone(),
            protocol: self.protocol.map(Into::into),
            skip_ssl_verification: self.skip_ssl_verification.then_some(true),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct FindArgs {
    pub number: String,
    #[command(flatten)]
    pub connection: ConnectionArgs,
    #[arg(long, default_value = "text")]
    pub format: OutputFormatArg,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct OwnerArgs {
    pub name: String,
    #[command(flatten)]
    pub connection: ConnectionArgs,
    #[arg(long, default_value = "text")]
    pub format: OutputFormatArg,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SetupArgs {
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub protocol: Option<ProtocolArg>,
    #[arg(long)]
    pub skip_ssl_verification: bool,
    #[arg(long)]
    pub force: bool,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConfigCommandArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Validate(ConfigArgs),
    Dump(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long)]
    pub format: Option<OutputFormatArg>,
    #[arg(long)]
    pub pretty: bool,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Validate(args) => args.format.map(Into::into).unwrap_or(OutputFormat::Text),
            Self::Dump(args) => args.format.map(Into::into).unwrap_or(OutputFormat::Json),
        }
    }

    pub fn pretty(&self) -> bool {
        match self {
            Self::Validate(args) | Self::Dump(args) => args.pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProtocolArg {
    Http,
    Https,
}

impl From<ProtocolArg> for Protocol {
    fn from(value: ProtocolArg) -> Self {
        match value {
            ProtocolArg::Http => Protocol::Http,
            ProtocolArg::Https => Protocol::Https,
        }
    }
}

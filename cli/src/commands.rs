use accounts_core::client::AccountsClient;
use accounts_core::config::Config;
use accounts_core::errors::AccountsError;
use accounts_core::model::{AccountsPayload, ErrorKind, ErrorPayload, OutputFormat};
use accounts_core::service::{
    FindRequest, OwnerRequest, SetupRequest, build_setup_config, lookup_account, search_owner,
};
use accounts_ui::text::{RenderOptions as TextRenderOptions, render_payloads};
use anyhow::Result;
use std::io::IsTerminal;
use tracing::info;

use crate::args::{
    ConfigArgs, ConfigCommand, ConfigCommandArgs, ConnectionArgs, FindArgs, GlobalArgs,
    OutputFormatArg, OwnerArgs, SetupArgs,
};

pub struct OutputPreferences {
    pub format: OutputFormat,
    pub pretty: bool,
    pub json_only: bool,
    pub no_color: bool,
}

impl OutputPreferences {
    pub fn uses_json_output(&self) -> bool {
        self.json_only || self.format == OutputFormat::Json
    }

    pub fn use_color(&self) -> bool {
        if self.format == OutputFormat::Json {
            return false;
        }
        if self.no_color {
            return false;
        }
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }
        std::io::stdout().is_terminal()
    }
}

pub fn output_format(format: OutputFormatArg, json: bool, global: &GlobalArgs) -> OutputFormat {
    if json || global.json_only {
        OutputFormat::Json
    } else {
        format.into()
    }
}

pub async fn run_find(args: FindArgs, global: &GlobalArgs) -> Result<()> {
    let client = connect(&args.connection)?;
    let payload = lookup_account(
        &client,
        &FindRequest {
            number: args.number,
        },
    )
    .await?;

    let prefs = OutputPreferences {
        format: output_format(args.format, args.json, global),
        pretty: args.pretty,
        json_only: global.json_only,
        no_color: global.no_color,
    };
    print_payloads(&[payload], &prefs)
}

pub async fn run_owner(args: OwnerArgs, global: &GlobalArgs) -> Result<()> {
    let client = connect(&args.connection)?;
    let payload = search_owner(&client, &OwnerRequest { name: args.name }).await?;

    let prefs = OutputPreferences {
        format: output_format(args.format, args.json, global),
        pretty: args.pretty,
        json_only: global.json_only,
        no_color: global.no_color,
    };
    print_payloads(&[payload], &prefs)
}

fn connect(args: &ConnectionArgs) -> Result<AccountsClient> {
    let config = Config::load(args.config.as_ref())?;
    if let Ok(path) = Config::path(args.config.as_ref()) {
        info!(
            path = %path.display(),
            missing = !path.exists(),
            "Loaded config"
        );
    }

    let service = config.service_config(&args.overrides())?;
    service.validate()?;
    Ok(AccountsClient::from_config(&service)?)
}

pub async fn run_config(cmd: ConfigCommandArgs, global: &GlobalArgs) -> Result<()> {
    let mut command = cmd.command;
    if global.json_only {
        match &mut command {
            ConfigCommand::Validate(args) => args.format = Some(OutputFormatArg::Json),
            ConfigCommand::Dump(args) => args.format = Some(OutputFormatArg::Json),
        }
    }

    match command {
        ConfigCommand::Validate(args) => validate_config(args),
        ConfigCommand::Dump(args) => dump_config(args),
    }
}

pub async fn run_setup(args: SetupArgs) -> Result<()> {
    let config_path = Config::path(args.config.as_ref())?;
    if config_path.exists() && !args.force {
        return Err(AccountsError::ConfigExists(config_path).into());
    }

    let request = SetupRequest {
        url: args.url,
        protocol: args.protocol.map(Into::into),
        skip_ssl_verification: args.skip_ssl_verification,
    };
    let config = build_setup_config(&request);
    config.save(args.config.as_ref())?;

    println!(
        "Setup complete. Config written to {}",
        config_path.display()
    );
    if request.disables_tls_verification() {
        println!(
            "Warning: TLS verification is disabled for https. Do not use this against production services."
        );
    }

    Ok(())
}

fn validate_config(args: ConfigArgs) -> Result<()> {
    let path = Config::path(args.config.as_ref())?;
    let missing = !path.exists();
    let config = Config::load(args.config.as_ref())?;
    let service = config.service_config(&Default::default())?;
    let url_configured = service.validate().is_ok();

    match args.format.map(Into::into).unwrap_or(OutputFormat::Text) {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "missing": missing,
                "path": path.display().to_string(),
                "baseUrl": url_configured.then(|| service.base_url()),
            });
            if args.pretty {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", serde_json::to_string(&output)?);
            }
        }
        OutputFormat::Text => {
            if missing {
                println!("config ok (missing; using defaults): {}", path.display());
            } else {
                println!("config ok: {}", path.display());
            }
            if url_configured {
                println!("accounts service: {}", service.base_url());
            } else {
                println!("accounts service: not configured");
            }
        }
    }

    Ok(())
}

fn dump_config(args: ConfigArgs) -> Result<()> {
    let config = Config::load(args.config.as_ref())?;
    match args.format.map(Into::into).unwrap_or(OutputFormat::Json) {
        OutputFormat::Json => {
            if args.pretty {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("{}", serde_json::to_string(&config)?);
            }
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn print_payloads(payloads: &[AccountsPayload], prefs: &OutputPreferences) -> Result<()> {
    let rendered = render_payloads(
        payloads,
        &TextRenderOptions {
            format: prefs.format,
            pretty: prefs.pretty,
            json_only: prefs.json_only,
            use_color: prefs.use_color(),
        },
    )?;

    if let Some(text) = rendered {
        println!("{}", text);
    }

    Ok(())
}

pub fn cli_error_payload(
    command: &str,
    query: &str,
    code: i32,
    message: String,
    kind: ErrorKind,
) -> AccountsPayload {
    AccountsPayload::error(
        command.to_string(),
        query.to_string(),
        ErrorPayload {
            code,
            message,
            kind: Some(kind),
        },
    )
}

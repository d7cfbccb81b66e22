use anyhow::Result;
use clap::Parser;

use accounts_cli::args::{Cli, Command};
use accounts_cli::commands::{
    OutputPreferences, cli_error_payload, output_format, run_config, run_find, run_owner,
    run_setup,
};
use accounts_cli::exit_codes::{error_kind_for_error, exit_code_for_error};
use accounts_cli::logger::{self, LogLevel, LoggerConfig};
use accounts_core::model::OutputFormat;
use accounts_core::service::format_error_chain;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if let Some(level) = cli.global.log_level {
        level
    } else if cli.global.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Warning
    };
    logger::init(LoggerConfig {
        level: log_level,
        json_output: cli.global.json_output,
        json_only: cli.global.json_only,
    });

    let (result, command, query, output_prefs) = match cli.command {
        Command::Find(args) => {
            let prefs = OutputPreferences {
                format: output_format(args.format, args.json, &cli.global),
                pretty: args.pretty,
                json_only: cli.global.json_only,
                no_color: cli.global.no_color,
            };
            let query = args.number.clone();
            (
                run_find(args, &cli.global).await,
                "find",
                query,
                Some(prefs),
            )
        }
        Command::Owner(args) => {
            let prefs = OutputPreferences {
                format: output_format(args.format, args.json, &cli.global),
                pretty: args.pretty,
                json_only: cli.global.json_only,
                no_color: cli.global.no_color,
            };
            let query = args.name.clone();
            (
                run_owner(args, &cli.global).await,
                "owner",
                query,
                Some(prefs),
            )
        }
        Command::Config(cmd) => {
            let mut format = cmd.command.format();
            if cli.global.json_only {
                format = OutputFormat::Json;
            }
            let prefs = OutputPreferences {
                format,
                pretty: cmd.command.pretty(),
                json_only: cli.global.json_only,
                no_color: cli.global.no_color,
            };
            (
                run_config(cmd, &cli.global).await,
                "config",
                String::new(),
                Some(prefs),
            )
        }
        Command::Setup(args) => (run_setup(args).await, "setup", String::new(), None),
    };

    if let Err(err) = result {
        let code = exit_code_for_error(&err);
        let kind = error_kind_for_error(&err);
        let message = format_error_chain(&err);
        if let Some(prefs) = output_prefs
            && prefs.uses_json_output()
        {
            let outputs = vec![cli_error_payload(command, &query, code, message, kind)];
            if prefs.pretty {
                if let Ok(json) = serde_json::to_string_pretty(&outputs) {
                    println!("{}", json);
                }
            } else if let Ok(json) = serde_json::to_string(&outputs) {
                println!("{}", json);
            }
        } else {
            eprintln!("Error: {}", message);
        }
        std::process::exit(code);
    }

    Ok(())
}

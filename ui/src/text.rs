use accounts_core::model::{Account, AccountsPayload, OutputFormat};
use anyhow::Result;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub json_only: bool,
    pub use_color: bool,
}

pub fn render_payloads(
    payloads: &[AccountsPayload],
    options: &RenderOptions,
) -> Result<Option<String>> {
    match options.format {
        OutputFormat::Json => {
            let json = if options.pretty {
                serde_json::to_string_pretty(payloads)?
            } else {
                serde_json::to_string(payloads)?
            };
            Ok(Some(json))
        }
        OutputFormat::Text => {
            if options.json_only {
                return Ok(None);
            }
            let text = payloads
                .iter()
                .map(|payload| format_payload_text(payload, options))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(Some(text))
        }
    }
}

pub fn format_payload_text(payload: &AccountsPayload, options: &RenderOptions) -> String {
    if let Some(error) = &payload.error {
        return format!("{}: error: {}", payload.command, error.message);
    }

    let mut lines = Vec::new();
    let header = format!("== Accounts: {} {} ==", payload.command, payload.query);
    lines.push(colorize_header(&header, options.use_color));
    if let Some(base_url) = &payload.base_url {
        lines.push(subtle_line(
            &format!("Service: {}", base_url),
            options.use_color,
        ));
    }

    if payload.accounts.is_empty() {
        lines.push("No accounts found".to_string());
        return lines.join("\n");
    }

    if payload.accounts.len() == 1 && payload.command == "find" {
        let account = &payload.accounts[0];
        lines.push(label_line("Number", &field(&account.number), options.use_color));
        lines.push(label_line("Owner", &field(&account.owner), options.use_color));
        lines.push(label_line(
            "Balance",
            &format_balance(account.balance),
            options.use_color,
        ));
        return lines.join("\n");
    }

    let number_width = column_width(&payload.accounts, |a| field(&a.number));
    let owner_width = column_width(&payload.accounts, |a| field(&a.owner));
    for account in &payload.accounts {
        lines.push(format!(
            "{:<nw$}  {:<ow$}  {}",
            field(&account.number),
            field(&account.owner),
            format_balance(account.balance),
            nw = number_width,
            ow = owner_width,
        ));
    }
    lines.push(subtle_line(
        &format!("{} account(s)", payload.accounts.len()),
        options.use_color,
    ));

    lines.join("\n")
}

fn field(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_string()
}

fn format_balance(balance: Option<f64>) -> String {
    match balance {
        Some(value) => format!("{:.2}", value),
        None => "-".to_string(),
    }
}

fn column_width(accounts: &[Account], value: impl Fn(&Account) -> String) -> usize {
    accounts
        .iter()
        .map(|a| value(a).chars().count())
        .max()
        .unwrap_or(0)
}

fn label_line(label: &str, value: &str, use_color: bool) -> String {
    let label_text = if use_color {
        ansi("95", label)
    } else {
        label.to_string()
    };
    format!("{}: {}", label_text, value)
}

fn subtle_line(text: &str, use_color: bool) -> String {
    if use_color {
        ansi("90", text)
    } else {
        text.to_string()
    }
}

fn colorize_header(text: &str, use_color: bool) -> String {
    if use_color {
        ansi("1;95", text)
    } else {
        text.to_string()
    }
}

fn ansi(code: &str, text: &str) -> String {
    format!("\u{001B}[{}m{}\u{001B}[0m", code, text)
}

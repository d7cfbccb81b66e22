use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Verbose,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `tracing` has no verbose or critical level; they fold into trace and error.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace | LogLevel::Verbose => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub json_output: bool,
    pub json_only: bool,
}

impl LoggerConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.directive()))
    }
}

/// Installs the global subscriber on stderr. Structured JSON lines with
/// `json_output`; nothing at all with `json_only` alone.
pub fn init(config: LoggerConfig) {
    if config.json_output {
        let _ = tracing_subscriber::registry()
            .with(config.filter())
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init();
        return;
    }

    if config.json_only {
        return;
    }

    let _ = tracing_subscriber::registry()
        .with(config.filter())
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_onto_tracing_directives() {
        assert_eq!(LogLevel::Verbose.directive(), "trace");
        assert_eq!(LogLevel::Warning.directive(), "warn");
        assert_eq!(LogLevel::Critical.directive(), "error");
    }

    #[test]
    fn log_level_parses_from_flag_values() {
        assert_eq!(
            LogLevel::from_str("warning", true).unwrap(),
            LogLevel::Warning
        );
        assert!(LogLevel::from_str("loud", true).is_err());
    }
}

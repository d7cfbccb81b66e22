pub mod args;
pub mod commands;
pub mod exit_codes;
pub mod logger;

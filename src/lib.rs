// Library root
// -----------
// This crate exposes the library surface for the `exercism` CLI. The binary
// (`main.rs`) parses arguments, sets up logging and hands off to a command.
//
// Module responsibilities:
// - `cli`: clap argument model (global config flags + subcommands).
// - `config`: merges flags, the persisted user config and defaults.
// - `workspace`: maps files onto the one solution directory they belong to.
// - `submit`: the submit command (collect documents, package, send).
// - `configure`: the configure command (persist flag overrides).
// - `api`: multipart packaging and the blocking HTTP client.
// - `ui`: the stdout/stderr channels and user-facing messages.
// - `error`: error types and exit codes.
pub mod api;
pub mod cli;
pub mod config;
pub mod configure;
pub mod error;
pub mod submit;
pub mod ui;
pub mod workspace;

/// Name used in messages that tell the user which command to run.
pub const BINARY_NAME: &str = "exercism";

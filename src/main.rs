// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, run one command.
// - Command errors are printed and mapped to an exit code; setup failures
//   surface through `anyhow`.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use exercism_cli::cli::{Command, RootArgs};
use exercism_cli::config::{config_dir, resolve, Defaults, UserConfig};
use exercism_cli::configure::ConfigureCommand;
use exercism_cli::error::CliError;
use exercism_cli::submit::SubmitCommand;
use exercism_cli::ui::Output;

const LOG_ENV: &str = "EXERCISM_LOG";

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(anyhow::Error::msg)
}

fn run(args: RootArgs) -> Result<(), CliError> {
    let dir = config_dir()?;
    let flags = args.config.flags();
    let mut output = Output::stdio();

    match args.command {
        Command::Submit(submit) => {
            let user = UserConfig::load(&dir)?;
            let cfg = resolve(&flags, &user, &Defaults::default());
            SubmitCommand::new(submit.files).run(&cfg, &mut output)
        }
        Command::Configure(configure) => ConfigureCommand {
            show: configure.show,
        }
        .run(&flags, &dir, &mut output)
        .map(|_| ()),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = RootArgs::parse();
    init_logging(args.verbose)?;

    match run(args) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("Error: {err}");
            Ok(ExitCode::from(err.exit_code() as u8))
        }
    }
}

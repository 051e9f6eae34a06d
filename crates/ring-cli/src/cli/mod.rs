mod commands;
mod helpers;
mod script;

use clap::Parser;
use ring_core::domain::{ErrorKind, RingError};
use tracing_subscriber::EnvFilter;

const PROGRAM_NAME: &str = "ring-builder";
const LOG_ENV_VAR: &str = "RING_BUILDER_LOG";

pub fn run_from_env() -> i32 {
    init_tracing();
    let remaining: Vec<String> = std::env::args().skip(1).collect();

    match run(remaining) {
        Ok(code) => code,
        Err(error) => {
            let ring_error = error.as_ring_error();
            eprintln!("{}", ring_error.diagnostic_line());
            ring_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once(PROGRAM_NAME.to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(name = PROGRAM_NAME, about = "Interactive FFA ring builder", version)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the resolved parameter bounds for a ring as JSON
    Bounds(commands::BoundsArgs),
    /// Drive a ring-building session from a command script
    Session(commands::SessionArgs),
    /// Print the ring diagram colour key
    Legend,
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Bounds(args) => commands::run_bounds_command(args),
        CliCommand::Session(args) => commands::run_session_command(args),
        CliCommand::Legend => commands::run_legend_command(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(RingError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RingError> for CliError {
    fn from(error: RingError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_ring_error(&self) -> RingError {
        match self {
            Self::Usage(message) => RingError::new(
                ErrorKind::Usage,
                "INPUT.CLI_USAGE",
                message.trim_end().to_string(),
            ),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => RingError::new(ErrorKind::Io, "IO.CLI", format!("{error:#}")),
        }
    }
}

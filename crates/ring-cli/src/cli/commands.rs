use super::CliError;
use super::helpers::{load_config, print_json, read_script};
use super::script::{ScriptCommand, parse_line};
use ring_core::assembly::{AddOutcome, Session};
use ring_core::bounds::resolve_bounds_with;
use ring_core::common::SessionConfig;
use ring_core::common::constants::{MAX_VALUE, MIN_POSITIVE};
use ring_core::domain::{RingError, RingResult};
use ring_core::engine::ProcessEngine;
use ring_core::layout::legend_lines;
use ring_core::validation::validate_one;
use serde_json::json;
use std::f64::consts::TAU;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct BoundsArgs {
    /// Ring radius in metres
    #[arg(long)]
    radius: String,

    /// Space left in the ring; defaults to the full circumference
    #[arg(long, allow_hyphen_values = true)]
    ring_space: Option<String>,

    /// Session config JSON path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct SessionArgs {
    /// Command script path; reads stdin when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Session config JSON path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engine program launched by the `run` command
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Argument passed to the engine program (repeatable)
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    /// Stop at the first failing command
    #[arg(long)]
    fail_fast: bool,
}

pub(super) fn run_bounds_command(args: BoundsArgs) -> Result<i32, CliError> {
    let config = load_config(args.config.as_deref())?;
    let radius = validate_one(&args.radius, MIN_POSITIVE, MAX_VALUE)?;
    let ring_space = match &args.ring_space {
        Some(raw) => validate_one(raw, -MAX_VALUE, MAX_VALUE)?,
        None => TAU * radius,
    };

    let table = resolve_bounds_with(radius, ring_space, config.bounds);
    print_json(&table)?;
    Ok(0)
}

pub(super) fn run_legend_command() -> Result<i32, CliError> {
    for line in legend_lines() {
        println!("{line}");
    }
    Ok(0)
}

pub(super) fn run_session_command(args: SessionArgs) -> Result<i32, CliError> {
    let config = load_config(args.config.as_deref())?;
    let script = read_script(args.script.as_deref())?;
    let engine = args
        .engine
        .map(|program| ProcessEngine::new(program).with_args(args.engine_args));

    let mut driver = SessionDriver {
        config,
        engine,
        session: None,
    };
    let mut first_failure = None;

    for (index, line) in script.lines().enumerate() {
        let result = parse_line(line).and_then(|command| match command {
            Some(command) => driver.execute(command),
            None => Ok(()),
        });

        if let Err(error) = result {
            eprintln!("line {}: {}", index + 1, error.diagnostic_line());
            let exit_code = *first_failure.get_or_insert(error.exit_code());
            if args.fail_fast {
                return Ok(exit_code);
            }
        }
    }

    Ok(first_failure.unwrap_or(0))
}

/// Owns the session between script lines; `reset-all` drops it until the
/// next `radius`.
struct SessionDriver {
    config: SessionConfig,
    engine: Option<ProcessEngine>,
    session: Option<Session>,
}

fn require_session(session: &mut Option<Session>) -> RingResult<&mut Session> {
    session
        .as_mut()
        .ok_or_else(|| RingError::invalid_state("STATE.NO_RADIUS", "set the ring radius first"))
}

fn print_add(session: &Session, outcome: &AddOutcome) {
    println!("{}", session.ring_space_line());
    if let Some(warning) = outcome.warning {
        println!("{warning}");
    }
}

impl SessionDriver {
    fn execute(&mut self, command: ScriptCommand) -> RingResult<()> {
        if let ScriptCommand::Radius(raw) = &command {
            let session = Session::from_input(raw, self.config.clone())?;
            println!("{}", session.ring_space_line());
            self.session = Some(session);
            return Ok(());
        }
        if command == ScriptCommand::ResetAll {
            self.session = None;
            println!("session cleared");
            return Ok(());
        }
        if command == ScriptCommand::Legend {
            for line in legend_lines() {
                println!("{line}");
            }
            return Ok(());
        }

        let session = require_session(&mut self.session)?;
        match command {
            ScriptCommand::Beam { species, values } => {
                let beam = session.configure_beam(&species, &values)?;
                for line in beam.summary_lines() {
                    println!("{line}");
                }
            }
            ScriptCommand::BeginCell => {
                session.begin_cell()?;
                println!("phase: {}", session.phase().as_str());
            }
            ScriptCommand::SkipCell => {
                session.skip_cell()?;
                println!("phase: {}", session.phase().as_str());
            }
            ScriptCommand::FinalizeCell => {
                session.finalize_cell()?;
                println!("phase: {}", session.phase().as_str());
            }
            ScriptCommand::Add {
                kind,
                primary,
                follow_up,
            } => {
                let outcome = session.add_from_input(kind, &primary, &follow_up)?;
                print_add(session, &outcome);
            }
            ScriptCommand::Replay => {
                let outcome = session.replay_cell()?;
                print_add(session, &outcome);
            }
            ScriptCommand::Check { key, values } => {
                let outcome = session.check_inputs(key, &values);
                print_json(&json!({
                    "row": key.as_str(),
                    "succeeded": outcome.succeeded,
                    "values": outcome.values,
                    "error": outcome.first_error.as_ref().map(RingError::message),
                }))?;
            }
            ScriptCommand::Delete => {
                let outcome = session.delete_last()?;
                println!("removed: {}", outcome.removed_line);
                println!("{}", session.ring_space_line());
            }
            ScriptCommand::Run => {
                let engine = self.engine.as_ref().ok_or_else(|| {
                    RingError::engine(
                        "ENGINE.NOT_CONFIGURED",
                        "no engine program configured; pass --engine",
                    )
                })?;
                let run = session.submit(engine)?;
                print_json(run)?;
            }
            ScriptCommand::ResetRing => {
                session.reset_ring();
                println!("phase: {}", session.phase().as_str());
            }
            ScriptCommand::Status => {
                let cell = session.cell().map(|cell| {
                    json!({
                        "entries": cell.log().len(),
                        "size": cell.size(),
                        "finalized": cell.is_finalized(),
                    })
                });
                print_json(&json!({
                    "phase": session.phase(),
                    "radius": session.radius(),
                    "ring_space": session.ring_space(),
                    "full": session.is_full(),
                    "entries": session.ring().log().len(),
                    "elements": session.ring().log().elements().len(),
                    "beam": session.beam(),
                    "cell": cell,
                    "available": session.available_kinds(),
                }))?;
            }
            ScriptCommand::Log => print!("{}", session.display_log()),
            ScriptCommand::Bounds => print_json(&session.bounds())?,
            ScriptCommand::Radius(_) | ScriptCommand::ResetAll | ScriptCommand::Legend => {}
        }
        Ok(())
    }
}

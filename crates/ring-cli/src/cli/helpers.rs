use super::CliError;
use anyhow::Context;
use ring_core::common::{SessionConfig, load_session_config};
use ring_core::domain::{ErrorKind, RingError, RingResult};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;

pub(super) fn load_config(path: Option<&Path>) -> Result<SessionConfig, CliError> {
    match path {
        Some(path) => load_session_config(path).map_err(|error| CliError::Compute(error.into())),
        None => Ok(SessionConfig::default()),
    }
}

/// Script text from `path`, or all of stdin when no path is given.
pub(super) fn read_script(path: Option<&Path>) -> Result<String, CliError> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read session script '{}'", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read session script from stdin")?;
            text
        }
    };
    Ok(text)
}

pub(super) fn to_json_line<T: Serialize>(value: &T) -> RingResult<String> {
    serde_json::to_string(value).map_err(|source| {
        RingError::new(
            ErrorKind::Io,
            "IO.JSON_ENCODE",
            format!("failed to encode output as JSON: {source}"),
        )
    })
}

pub(super) fn print_json<T: Serialize>(value: &T) -> RingResult<()> {
    println!("{}", to_json_line(value)?);
    Ok(())
}

//! Line-oriented session scripts.
//!
//! One command per line; `#` starts a comment. `add` takes the element kind,
//! the primary values and, after a `|`, the follow-up values:
//!
//! ```text
//! radius 5
//! beam proton 1.2 0 0 0 0 0 0
//! skip
//! add multipole 1 0.1 0.1 2 | 0.5 -0.2
//! run
//! ```

use ring_core::bounds::BoundsKey;
use ring_core::domain::{ElementKind, ErrorKind, RingError, RingResult};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum ScriptCommand {
    Radius(String),
    Beam {
        species: String,
        values: Vec<String>,
    },
    BeginCell,
    SkipCell,
    FinalizeCell,
    Add {
        kind: ElementKind,
        primary: Vec<String>,
        follow_up: Vec<String>,
    },
    Check {
        key: BoundsKey,
        values: Vec<String>,
    },
    Delete,
    Replay,
    Run,
    ResetRing,
    ResetAll,
    Status,
    Log,
    Bounds,
    Legend,
}

fn script_error(placeholder: &'static str, message: impl Into<String>) -> RingError {
    RingError::new(ErrorKind::Usage, placeholder, message)
}

fn no_arguments(word: &str, rest: &[&str], command: ScriptCommand) -> RingResult<ScriptCommand> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(script_error(
            "INPUT.SCRIPT_ARGUMENTS",
            format!("'{word}' takes no arguments"),
        ))
    }
}

fn owned(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| (*token).to_string()).collect()
}

pub(super) fn parse_bounds_key(token: &str) -> RingResult<BoundsKey> {
    match token.to_ascii_lowercase().replace('-', "_").as_str() {
        "beam" => Ok(BoundsKey::Beam),
        "magnet" | "scaling_ffa_magnet" => Ok(BoundsKey::ScalingFfaMagnet),
        "drift" => Ok(BoundsKey::Drift),
        "rf" | "rf_cavity" => Ok(BoundsKey::RfCavity),
        "rf_more" => Ok(BoundsKey::RfMore),
        "multipole" => Ok(BoundsKey::Multipole),
        "multipole_more" => Ok(BoundsKey::MultipoleMore),
        _ => Err(script_error(
            "INPUT.SCRIPT_BOUNDS_KEY",
            format!("unknown bounds row '{token}'"),
        )),
    }
}

fn parse_add(rest: &[&str]) -> RingResult<ScriptCommand> {
    let Some((kind_token, values)) = rest.split_first() else {
        return Err(script_error(
            "INPUT.SCRIPT_ARGUMENTS",
            "'add' needs an element kind",
        ));
    };
    let kind: ElementKind = kind_token.parse()?;

    let (primary, follow_up) = match values.iter().position(|token| *token == "|") {
        Some(split) => (&values[..split], &values[split + 1..]),
        None => (values, &[][..]),
    };

    Ok(ScriptCommand::Add {
        kind,
        primary: owned(primary),
        follow_up: owned(follow_up),
    })
}

/// Parses one script line; blank and comment lines yield `None`.
pub(super) fn parse_line(line: &str) -> RingResult<Option<ScriptCommand>> {
    let content = line.split('#').next().unwrap_or_default().replace('|', " | ");
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let Some((word, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "radius" => match rest {
            [radius] => ScriptCommand::Radius((*radius).to_string()),
            _ => {
                return Err(script_error(
                    "INPUT.SCRIPT_ARGUMENTS",
                    "'radius' takes exactly one value",
                ));
            }
        },
        "beam" => match rest.split_first() {
            Some((species, values)) => ScriptCommand::Beam {
                species: (*species).to_string(),
                values: owned(values),
            },
            None => {
                return Err(script_error(
                    "INPUT.SCRIPT_ARGUMENTS",
                    "'beam' needs a particle and its values",
                ));
            }
        },
        "add" => parse_add(rest)?,
        "check" => match rest.split_first() {
            Some((key, values)) => ScriptCommand::Check {
                key: parse_bounds_key(key)?,
                values: owned(values),
            },
            None => {
                return Err(script_error(
                    "INPUT.SCRIPT_ARGUMENTS",
                    "'check' needs a bounds row",
                ));
            }
        },
        "cell" => no_arguments(word, rest, ScriptCommand::BeginCell)?,
        "skip" => no_arguments(word, rest, ScriptCommand::SkipCell)?,
        "finalize" => no_arguments(word, rest, ScriptCommand::FinalizeCell)?,
        "delete" => no_arguments(word, rest, ScriptCommand::Delete)?,
        "replay" => no_arguments(word, rest, ScriptCommand::Replay)?,
        "run" => no_arguments(word, rest, ScriptCommand::Run)?,
        "reset-ring" => no_arguments(word, rest, ScriptCommand::ResetRing)?,
        "reset-all" => no_arguments(word, rest, ScriptCommand::ResetAll)?,
        "status" => no_arguments(word, rest, ScriptCommand::Status)?,
        "log" => no_arguments(word, rest, ScriptCommand::Log)?,
        "bounds" => no_arguments(word, rest, ScriptCommand::Bounds)?,
        "legend" => no_arguments(word, rest, ScriptCommand::Legend)?,
        other => {
            return Err(script_error(
                "INPUT.SCRIPT_COMMAND",
                format!("unknown command '{other}'"),
            ));
        }
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::{ScriptCommand, parse_line};
    use ring_core::bounds::BoundsKey;
    use ring_core::domain::{ElementKind, ErrorKind};

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("").expect("blank"), None);
        assert_eq!(parse_line("   # radius 5").expect("comment"), None);
    }

    #[test]
    fn add_splits_primary_and_follow_up_values() {
        let command = parse_line("add multipole 1 0.1 0.1 2|0.5 -0.2  # two orders")
            .expect("valid line")
            .expect("command");

        assert_eq!(
            command,
            ScriptCommand::Add {
                kind: ElementKind::Multipole,
                primary: vec!["1".into(), "0.1".into(), "0.1".into(), "2".into()],
                follow_up: vec!["0.5".into(), "-0.2".into()],
            }
        );
    }

    #[test]
    fn element_kind_aliases_are_accepted() {
        for (token, kind) in [
            ("magnet", ElementKind::ScalingFfaMagnet),
            ("RF", ElementKind::RfCavity),
            ("rf_cavity", ElementKind::RfCavity),
            ("cell", ElementKind::Cell),
        ] {
            let command = parse_line(&format!("add {token}"))
                .expect("valid line")
                .expect("command");
            assert!(matches!(command, ScriptCommand::Add { kind: parsed, .. } if parsed == kind));
        }
    }

    #[test]
    fn check_takes_a_bounds_row() {
        let command = parse_line("check multipole-more 0.1 3")
            .expect("valid line")
            .expect("command");
        assert_eq!(
            command,
            ScriptCommand::Check {
                key: BoundsKey::MultipoleMore,
                values: vec!["0.1".into(), "3".into()],
            }
        );
    }

    #[test]
    fn malformed_lines_are_usage_errors() {
        for line in ["radius", "radius 1 2", "delete now", "launch", "check nowhere 1"] {
            let error = parse_line(line).expect_err("malformed");
            assert_eq!(error.kind(), ErrorKind::Usage, "line {line}");
        }

        let error = parse_line("add wiggler 1").expect_err("unknown kind");
        assert_eq!(error.kind(), ErrorKind::UnknownElementType);
    }
}

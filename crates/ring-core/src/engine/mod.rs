//! The narrow seam to the external tracking engine.
//!
//! The core only knows how to describe a ring ([`EngineRequest`]) and how to
//! read back where the engine placed each element. [`ProcessEngine`] is the
//! adapter that runs an engine as a child process speaking JSON.

use crate::domain::{Beam, ParameterValue, PlacedElement, RingError, RingResult};
use crate::elements::{ElementDescriptor, PolynomialCoefficients};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

pub trait Engine {
    fn run(&self, request: &EngineRequest) -> RingResult<Vec<PlacedElement>>;
}

/// `p0 + p1·t + p2·t²` curve the engine instantiates once and binds by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeDependence {
    pub name: String,
    pub p0: f64,
    pub p1: f64,
    pub p2: f64,
}

impl TimeDependence {
    fn polynomial(name: String, coefficients: PolynomialCoefficients) -> Self {
        Self {
            name,
            p0: coefficients.p0,
            p1: coefficients.p1,
            p2: coefficients.p2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineElement {
    pub type_name: String,
    pub attributes: BTreeMap<String, ParameterValue>,
    /// Model slot → time dependence name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub models: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRequest {
    pub radius: f64,
    pub beam: Beam,
    /// One-particle distribution text derived from the beam.
    pub distribution: String,
    pub time_dependences: Vec<TimeDependence>,
    pub elements: Vec<EngineElement>,
}

impl EngineRequest {
    /// Maps descriptors to engine elements in ring order.
    ///
    /// Each RF cavity contributes three time dependences named `phase_<i>`,
    /// `voltage_<i>` and `frequency_<i>`, where `i` is the cavity's index in
    /// `descriptors`.
    pub fn new(radius: f64, beam: Beam, descriptors: &[ElementDescriptor]) -> Self {
        let mut time_dependences = Vec::new();
        let mut elements = Vec::with_capacity(descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            let type_name = descriptor.engine_type_name().to_string();
            let element = match descriptor {
                ElementDescriptor::RfCavity(cavity) => {
                    let curves = [
                        ("phase_model", format!("phase_{index}"), cavity.phase),
                        ("amplitude_model", format!("voltage_{index}"), cavity.amplitude),
                        ("frequency_model", format!("frequency_{index}"), cavity.frequency),
                    ];
                    let mut models = BTreeMap::new();
                    for (slot, name, coefficients) in curves {
                        models.insert(slot.to_string(), name.clone());
                        time_dependences.push(TimeDependence::polynomial(name, coefficients));
                    }

                    let attributes = [
                        ("length", cavity.length),
                        ("width", cavity.width),
                        ("height", cavity.height),
                    ]
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), ParameterValue::Scalar(value)))
                    .collect();

                    EngineElement {
                        type_name,
                        attributes,
                        models,
                    }
                }
                other => EngineElement {
                    type_name,
                    attributes: other
                        .parameters()
                        .into_iter()
                        .map(|(name, value)| (name.to_string(), value))
                        .collect(),
                    models: BTreeMap::new(),
                },
            };
            elements.push(element);
        }

        Self {
            radius,
            distribution: beam.distribution_line(),
            beam,
            time_dependences,
            elements,
        }
    }
}

/// Runs an engine program: request JSON on stdin, placed elements as a JSON
/// array on stdout. The caller blocks until the child exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Engine for ProcessEngine {
    fn run(&self, request: &EngineRequest) -> RingResult<Vec<PlacedElement>> {
        let payload = serde_json::to_vec(request).map_err(|source| {
            RingError::engine(
                "ENGINE.REQUEST_ENCODE",
                format!("failed to encode engine request: {source}"),
            )
        })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                RingError::engine(
                    "ENGINE.SPAWN",
                    format!(
                        "failed to launch engine '{}': {}",
                        self.program.display(),
                        source
                    ),
                )
            })?;

        // Stdin is fed from its own thread while both output pipes drain.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(|| write_request(stdin, &payload));
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or_else(|_| {
                Err(RingError::engine(
                    "ENGINE.REQUEST_WRITE",
                    "request writer thread panicked",
                ))
            });
            (written, output)
        });
        written?;

        let output = output.map_err(|source| {
            RingError::engine(
                "ENGINE.WAIT",
                format!(
                    "failed to wait for engine '{}': {}",
                    self.program.display(),
                    source
                ),
            )
        })?;

        if !output.status.success() {
            let status_text = output.status.code().map_or_else(
                || "terminated by signal".to_string(),
                |code| format!("exit code {code}"),
            );
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RingError::engine(
                "ENGINE.EXIT",
                format!(
                    "engine '{}' failed with {}: {}",
                    self.program.display(),
                    status_text,
                    stderr.trim()
                ),
            ));
        }

        serde_json::from_slice(&output.stdout).map_err(|source| {
            RingError::engine(
                "ENGINE.OUTPUT_PARSE",
                format!("engine output is not a placed-element list: {source}"),
            )
        })
    }
}

/// Sends the request and closes stdin so the child sees end of input.
fn write_request(stdin: Option<ChildStdin>, payload: &[u8]) -> RingResult<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(payload) {
        Ok(()) => Ok(()),
        // A child that exits without reading its input is judged by its status.
        Err(source) if source.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(source) => Err(RingError::engine(
            "ENGINE.REQUEST_WRITE",
            format!("failed to send request to engine: {source}"),
        )),
    }
}

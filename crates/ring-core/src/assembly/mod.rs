//! Ring and cell assembly driven by a single [`Session`] controller.

pub mod log;
pub mod session;
pub mod state;

pub use log::{ElementLog, LogEntry, PoppedEntry};
pub use session::{AddOutcome, DeleteOutcome, RunOutput, Session, SessionPhase, Target};
pub use state::{CellState, RingState};

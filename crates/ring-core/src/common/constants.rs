//! Fixed numeric limits shared by the resolver, builders and layout.

/// Smallest positive normal `f64`; lower bound for length-like inputs.
pub const MIN_POSITIVE: f64 = f64::MIN_POSITIVE;

/// Stand-in for an unbounded upper limit.
pub const MAX_VALUE: f64 = f64::MAX;

pub const GAMMA_FLOOR: f64 = 1.000_000_01;

pub const MAGNET_FIELD_LIMIT: f64 = 2.0;
pub const MAGNET_FIELD_INDEX_MAX: f64 = 10.0;

pub const MAX_MULTIPOLE_ORDERS: usize = 5;
pub const MULTIPOLE_FIELD_LIMIT: f64 = 2.0;

/// Width/height cap for RF cavities when bounds do not follow the ring.
pub const FIXED_RF_DIMENSION_CAP: f64 = 5.0;

pub const MULTIPOLE_FRINGE_WIDTH: f64 = 0.01;
pub const MULTIPOLE_MAX_EXPANSION_ORDER: u32 = 5;
pub const MULTIPOLE_BOUNDING_BOX_LENGTH: f64 = 100.0;

/// Logical canvas edge length used by the ring diagram.
pub const CANVAS_SIZE: f64 = 600.0;
pub const CANVAS_CENTRE: f64 = CANVAS_SIZE / 2.0;
/// The ring occupies `1 / CANVAS_MARGIN` of the half-canvas.
pub const CANVAS_MARGIN: f64 = 1.5;

pub const RING_FULL_WARNING: &str = "Ring full. Add different element or execute";
pub const CELL_REPLAY_MARKER: &str = "Cell";

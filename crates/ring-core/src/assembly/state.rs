use super::log::{ElementLog, PoppedEntry};
use crate::common::constants::CELL_REPLAY_MARKER;
use crate::elements::BuiltElement;
use std::f64::consts::TAU;

/// The ring under construction.
///
/// `ring_space` is always `capacity - Σ lengths`, recomputed from the
/// length stack so an add followed by a delete restores it exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct RingState {
    radius: f64,
    capacity: f64,
    ring_space: f64,
    log: ElementLog,
}

impl RingState {
    pub fn new(radius: f64) -> Self {
        let capacity = TAU * radius;
        Self {
            radius,
            capacity,
            ring_space: capacity,
            log: ElementLog::default(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Circumference `2π·radius`.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn ring_space(&self) -> f64 {
        self.ring_space
    }

    /// Advisory only; adds are still accepted once full.
    pub fn is_full(&self) -> bool {
        self.ring_space <= 0.0
    }

    pub fn log(&self) -> &ElementLog {
        &self.log
    }

    pub(crate) fn push_element(&mut self, built: BuiltElement) {
        self.log.push_element(built);
        self.recompute_space();
    }

    pub(crate) fn push_cell(&mut self, cell: &CellState) {
        self.log.push_group(
            cell.log.elements().to_vec(),
            cell.size(),
            CELL_REPLAY_MARKER.to_string(),
        );
        self.recompute_space();
    }

    pub(crate) fn pop(&mut self) -> Option<PoppedEntry> {
        let popped = self.log.pop();
        self.recompute_space();
        popped
    }

    fn recompute_space(&mut self) {
        self.ring_space = if self.log.is_empty() {
            self.capacity
        } else {
            self.capacity - self.log.total_length()
        };
    }
}

/// A reusable sub-sequence, recorded once and replayed as one unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellState {
    log: ElementLog,
    finalized: bool,
}

impl CellState {
    pub fn log(&self) -> &ElementLog {
        &self.log
    }

    /// Total length of the recorded elements.
    pub fn size(&self) -> f64 {
        self.log.total_length()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn push_element(&mut self, built: BuiltElement) {
        self.log.push_element(built);
    }

    pub(crate) fn pop(&mut self) -> Option<PoppedEntry> {
        self.log.pop()
    }

    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{CellState, RingState};
    use crate::common::SessionConfig;
    use crate::elements::{RingContext, build_drift};
    use std::f64::consts::TAU;

    #[test]
    fn ring_space_starts_at_circumference_and_is_restored_exactly() {
        let context = RingContext::from_config(5.0, &SessionConfig::default());
        let mut ring = RingState::new(5.0);
        assert_eq!(ring.ring_space(), TAU * 5.0);

        for angle in [0.1, 0.7, 0.33, 1.9] {
            ring.push_element(build_drift(angle, &context));
        }
        assert!(ring.ring_space() < TAU * 5.0);
        while ring.pop().is_some() {}

        assert_eq!(ring.ring_space(), TAU * 5.0);
        assert!(ring.log().elements().is_empty());
    }

    #[test]
    fn fullness_is_reported_once_space_reaches_zero() {
        let context = RingContext::from_config(1.0, &SessionConfig::default());
        let mut ring = RingState::new(1.0);
        ring.push_element(build_drift(TAU, &context));
        assert!(ring.is_full());

        ring.push_element(build_drift(0.5, &context));
        assert!(ring.is_full());
        assert!(ring.ring_space() < 0.0);
    }

    #[test]
    fn replayed_cell_is_one_entry_of_the_cell_size() {
        let context = RingContext::from_config(5.0, &SessionConfig::default());
        let mut cell = CellState::default();
        cell.push_element(build_drift(0.2, &context));
        cell.push_element(build_drift(0.4, &context));
        cell.finalize();

        let mut ring = RingState::new(5.0);
        ring.push_cell(&cell);

        assert_eq!(ring.log().len(), 1);
        assert_eq!(ring.log().elements().len(), 2);
        assert!((ring.capacity() - ring.ring_space() - 3.0).abs() < 1e-12);
        assert_eq!(ring.log().render_display(), "Cell\n");
    }
}

//! Raw text input → validated floats.

use crate::bounds::Bound;
use crate::domain::{RingError, RingResult};
use serde::{Deserialize, Serialize};

/// How a failed batch is reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Any failure discards every value of the batch.
    #[default]
    DiscardOnFailure,
    /// Keep every individually valid value even after a failure; the
    /// returned values are then not aligned with the inputs.
    LegacyPartial,
}

/// Parses `raw` and checks it against the inclusive range `[lower, upper]`.
pub fn validate_one(raw: &str, lower: f64, upper: f64) -> RingResult<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| RingError::not_numeric(raw))?;

    if Bound::new(lower, upper).contains(value) {
        Ok(value)
    } else {
        Err(RingError::out_of_bounds(value, lower, upper))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub values: Vec<f64>,
    pub succeeded: bool,
    pub first_error: Option<RingError>,
}

impl BatchOutcome {
    pub fn first_error_message(&self) -> &str {
        self.first_error.as_ref().map_or("", RingError::message)
    }

    /// Values in input order, or the first failure.
    pub fn into_result(self) -> RingResult<Vec<f64>> {
        match self.first_error {
            Some(error) => Err(error),
            None => Ok(self.values),
        }
    }

    pub fn apply_policy(mut self, policy: BatchPolicy) -> Self {
        if policy == BatchPolicy::DiscardOnFailure && !self.succeeded {
            self.values.clear();
        }
        self
    }
}

/// Validates `raws[i]` against `bounds[i]` for every position.
///
/// Scanning continues past a failure and every later value that passes is
/// still appended, so `values` is only index-aligned with `raws` when
/// `succeeded` is true. A count mismatch fails the batch without scanning.
pub fn validate_batch<S: AsRef<str>>(raws: &[S], bounds: &[Bound]) -> BatchOutcome {
    if raws.len() != bounds.len() {
        return BatchOutcome {
            values: Vec::new(),
            succeeded: false,
            first_error: Some(RingError::input_count(bounds.len(), raws.len())),
        };
    }

    let mut values = Vec::with_capacity(raws.len());
    let mut first_error = None;
    for (raw, bound) in raws.iter().zip(bounds) {
        match validate_one(raw.as_ref(), bound.lower, bound.upper) {
            Ok(value) => values.push(value),
            Err(error) => {
                first_error.get_or_insert(error);
            }
        }
    }

    BatchOutcome {
        values,
        succeeded: first_error.is_none(),
        first_error,
    }
}

/// Batch validation that never hands back a partial result.
pub fn validate_all<S: AsRef<str>>(raws: &[S], bounds: &[Bound]) -> RingResult<Vec<f64>> {
    validate_batch(raws, bounds).into_result()
}

//! Parameter bounds for every element type and the beam.
//!
//! Bounds are derived from the ring radius and, for the space-aware variant,
//! from the space still free in the ring. The table is cheap to build and is
//! recomputed before every element add rather than cached.

use crate::common::constants::{
    FIXED_RF_DIMENSION_CAP, GAMMA_FLOOR, MAGNET_FIELD_INDEX_MAX, MAGNET_FIELD_LIMIT, MAX_VALUE,
    MAX_MULTIPOLE_ORDERS, MIN_POSITIVE, MULTIPOLE_FIELD_LIMIT,
};
use crate::domain::ElementKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

/// Inclusive `[lower, upper]` range for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub lower: f64,
    pub upper: f64,
}

impl Bound {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoundsKey {
    #[serde(rename = "beam")]
    Beam,
    #[serde(rename = "Scaling FFA magnet")]
    ScalingFfaMagnet,
    #[serde(rename = "Drift")]
    Drift,
    #[serde(rename = "RF Cavity")]
    RfCavity,
    #[serde(rename = "RF more")]
    RfMore,
    #[serde(rename = "Multipole")]
    Multipole,
    #[serde(rename = "Multipole more")]
    MultipoleMore,
}

impl BoundsKey {
    pub const ALL: [BoundsKey; 7] = [
        Self::Beam,
        Self::ScalingFfaMagnet,
        Self::Drift,
        Self::RfCavity,
        Self::RfMore,
        Self::Multipole,
        Self::MultipoleMore,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beam => "beam",
            Self::ScalingFfaMagnet => "Scaling FFA magnet",
            Self::Drift => "Drift",
            Self::RfCavity => "RF Cavity",
            Self::RfMore => "RF more",
            Self::Multipole => "Multipole",
            Self::MultipoleMore => "Multipole more",
        }
    }

    /// Key for the first input screen of an element kind.
    pub const fn primary_for(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::ScalingFfaMagnet => Some(Self::ScalingFfaMagnet),
            ElementKind::Drift => Some(Self::Drift),
            ElementKind::Multipole => Some(Self::Multipole),
            ElementKind::RfCavity => Some(Self::RfCavity),
            ElementKind::Cell => None,
        }
    }

    /// Key for the second input screen, if the kind has one.
    pub const fn follow_up_for(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Multipole => Some(Self::MultipoleMore),
            ElementKind::RfCavity => Some(Self::RfMore),
            ElementKind::ScalingFfaMagnet | ElementKind::Drift | ElementKind::Cell => None,
        }
    }
}

impl Display for BoundsKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamBoundsPolicy {
    /// Start coordinates may take either sign.
    #[default]
    Unbounded,
    NonNegative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsVariant {
    /// Lengths and drift angles are capped by the space left in the ring.
    #[default]
    SpaceAware,
    /// Caps independent of ring occupancy.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsPolicy {
    pub beam: BeamBoundsPolicy,
    pub variant: BoundsVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundsTable {
    radius: f64,
    ring_space: f64,
    entries: BTreeMap<BoundsKey, Vec<Bound>>,
}

impl BoundsTable {
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn ring_space(&self) -> f64 {
        self.ring_space
    }

    pub fn get(&self, key: BoundsKey) -> &[Bound] {
        self.entries.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Per-order field bounds for a multipole with `order_count` orders.
    pub fn multipole_orders(&self, order_count: usize) -> &[Bound] {
        let orders = self.get(BoundsKey::MultipoleMore);
        &orders[..order_count.min(orders.len())]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoundsKey, &[Bound])> {
        self.entries
            .iter()
            .map(|(key, bounds)| (*key, bounds.as_slice()))
    }
}

pub fn resolve_bounds(radius: f64, ring_space: f64) -> BoundsTable {
    resolve_bounds_with(radius, ring_space, BoundsPolicy::default())
}

pub fn resolve_bounds_with(radius: f64, ring_space: f64, policy: BoundsPolicy) -> BoundsTable {
    let coordinate = match policy.beam {
        BeamBoundsPolicy::Unbounded => Bound::new(-MAX_VALUE, MAX_VALUE),
        BeamBoundsPolicy::NonNegative => Bound::new(0.0, MAX_VALUE),
    };
    let mut beam = vec![Bound::new(GAMMA_FLOOR, MAX_VALUE)];
    beam.extend(std::iter::repeat_n(coordinate, 6));

    let magnet = vec![
        Bound::new(-MAGNET_FIELD_LIMIT, MAGNET_FIELD_LIMIT),
        Bound::new(MIN_POSITIVE, MAGNET_FIELD_INDEX_MAX),
        Bound::new(MIN_POSITIVE, radius / 4.0),
        Bound::new(MIN_POSITIVE, radius / 4.0),
        Bound::new(MIN_POSITIVE, radius / 40.0),
        Bound::new(MIN_POSITIVE, radius),
        Bound::new(MIN_POSITIVE, radius),
    ];

    let (drift_max, rf_length, rf_dimension, multipole_length) = match policy.variant {
        BoundsVariant::SpaceAware => (
            ring_space / radius,
            Bound::new(MIN_POSITIVE, ring_space),
            radius,
            Bound::new(0.0, ring_space),
        ),
        BoundsVariant::Fixed => (
            PI,
            Bound::new(MIN_POSITIVE, MAX_VALUE),
            FIXED_RF_DIMENSION_CAP,
            Bound::new(MIN_POSITIVE, MAX_VALUE),
        ),
    };

    let rf_more = vec![
        rf_length,
        Bound::new(MIN_POSITIVE, rf_dimension),
        Bound::new(MIN_POSITIVE, rf_dimension),
    ];
    let multipole = vec![
        multipole_length,
        Bound::new(0.0, radius),
        Bound::new(0.0, radius),
        Bound::new(0.0, MAX_MULTIPOLE_ORDERS as f64),
    ];

    let entries = BTreeMap::from([
        (BoundsKey::Beam, beam),
        (BoundsKey::ScalingFfaMagnet, magnet),
        (BoundsKey::Drift, vec![Bound::new(MIN_POSITIVE, drift_max)]),
        (BoundsKey::RfCavity, vec![Bound::new(0.0, MAX_VALUE); 9]),
        (BoundsKey::RfMore, rf_more),
        (BoundsKey::Multipole, multipole),
        (
            BoundsKey::MultipoleMore,
            vec![Bound::new(-MULTIPOLE_FIELD_LIMIT, MULTIPOLE_FIELD_LIMIT); MAX_MULTIPOLE_ORDERS],
        ),
    ]);

    BoundsTable {
        radius,
        ring_space,
        entries,
    }
}

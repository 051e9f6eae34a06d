use super::state::{CellState, RingState};
use crate::bounds::{Bound, BoundsKey, BoundsTable, resolve_bounds_with};
use crate::common::SessionConfig;
use crate::common::constants::{MAX_VALUE, MIN_POSITIVE, RING_FULL_WARNING};
use crate::domain::{Beam, ElementKind, ParticleSpecies, PlacedElement, RingError, RingResult};
use crate::elements::{BuiltElement, MultipoleParameters, RingContext, build_element};
use crate::engine::{Engine, EngineRequest};
use crate::layout::{RingLayout, layout_filtered};
use crate::validation::{BatchOutcome, validate_batch, validate_one};
use globset::GlobSet;
use serde::Serialize;

/// Where the session is in building a ring.
///
/// `AwaitingCellDecision → (RecordingCell →)? BuildingRing → Submitted`.
/// Finalizing a cell moves straight to `BuildingRing`; any edit after a run
/// drops back from `Submitted` to `BuildingRing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    AwaitingCellDecision,
    RecordingCell,
    BuildingRing,
    Submitted,
}

impl SessionPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingCellDecision => "awaiting_cell_decision",
            Self::RecordingCell => "recording_cell",
            Self::BuildingRing => "building_ring",
            Self::Submitted => "submitted",
        }
    }
}

/// Which sequence receives adds and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Ring,
    Cell,
}

impl Target {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Cell => "cell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddOutcome {
    pub target: Target,
    pub length_consumed: f64,
    pub ring_space: f64,
    /// Set once the ring has no space left; the add itself still happened.
    pub warning: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteOutcome {
    pub target: Target,
    pub removed_line: String,
    pub length_restored: f64,
    pub descriptors_removed: usize,
    pub ring_space: f64,
}

/// Output of the last engine run, kept until the ring is edited again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    pub placed: Vec<PlacedElement>,
    pub layout: RingLayout,
}

/// Sole owner of the ring, the cell and the beam.
///
/// Every mutation goes through one of the methods below; a failed call
/// leaves the session untouched.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    auxiliary: GlobSet,
    phase: SessionPhase,
    ring: RingState,
    cell: Option<CellState>,
    beam: Option<Beam>,
    last_run: Option<RunOutput>,
}

impl Session {
    pub fn new(radius: f64, config: SessionConfig) -> RingResult<Self> {
        if !Bound::new(MIN_POSITIVE, MAX_VALUE).contains(radius) {
            return Err(RingError::out_of_bounds(radius, MIN_POSITIVE, MAX_VALUE));
        }
        config.validate()?;
        let auxiliary = config.auxiliary_matcher()?;

        tracing::info!(radius, "ring session started");
        Ok(Self {
            config,
            auxiliary,
            phase: SessionPhase::AwaitingCellDecision,
            ring: RingState::new(radius),
            cell: None,
            beam: None,
            last_run: None,
        })
    }

    /// Creates a session from the radius as typed by the user.
    pub fn from_input(raw_radius: &str, config: SessionConfig) -> RingResult<Self> {
        let radius = validate_one(raw_radius, MIN_POSITIVE, MAX_VALUE)?;
        Self::new(radius, config)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn radius(&self) -> f64 {
        self.ring.radius()
    }

    pub fn ring_space(&self) -> f64 {
        self.ring.ring_space()
    }

    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    pub fn ring(&self) -> &RingState {
        &self.ring
    }

    pub fn cell(&self) -> Option<&CellState> {
        self.cell.as_ref()
    }

    pub fn beam(&self) -> Option<&Beam> {
        self.beam.as_ref()
    }

    pub fn last_run(&self) -> Option<&RunOutput> {
        self.last_run.as_ref()
    }

    pub fn ring_context(&self) -> RingContext {
        RingContext::from_config(self.radius(), &self.config)
    }

    /// Bounds against the ring's current space, also while recording a cell.
    pub fn bounds(&self) -> BoundsTable {
        resolve_bounds_with(self.radius(), self.ring_space(), self.config.bounds)
    }

    pub fn ring_space_line(&self) -> String {
        format!("Ring space: {:?}", self.ring_space())
    }

    /// Display log of whichever sequence currently receives edits.
    pub fn display_log(&self) -> String {
        match (self.phase, self.cell.as_ref()) {
            (SessionPhase::RecordingCell, Some(cell)) => cell.log().render_display(),
            _ => self.ring.log().render_display(),
        }
    }

    /// Kinds that can be added right now; `Cell` appears once a cell is
    /// finalized and the ring is being built.
    pub fn available_kinds(&self) -> Vec<ElementKind> {
        let mut kinds = ElementKind::BUILDABLE.to_vec();
        if matches!(self.active_target(), Ok(Target::Ring)) && self.finalized_cell().is_some() {
            kinds.push(ElementKind::Cell);
        }
        kinds
    }

    /// Validates a beam typed by the user and makes it current.
    ///
    /// `raws` is gamma followed by the six start coordinates.
    pub fn configure_beam<S: AsRef<str>>(&mut self, species: &str, raws: &[S]) -> RingResult<Beam> {
        let species: ParticleSpecies = species.parse()?;
        let values = validate_batch(raws, self.bounds().get(BoundsKey::Beam)).into_result()?;

        let mut start_coords = [0.0; 6];
        start_coords.copy_from_slice(&values[1..]);
        let beam = Beam {
            species,
            gamma: values[0],
            start_coords,
        };
        self.set_beam(beam);
        Ok(beam)
    }

    /// The beam can change at any phase without touching the ring.
    pub fn set_beam(&mut self, beam: Beam) {
        tracing::info!(species = %beam.species, gamma = beam.gamma, "beam configured");
        self.beam = Some(beam);
        self.invalidate_run();
    }

    /// Validates `raws` against one bounds row and applies the configured
    /// batch policy, without touching the session.
    pub fn check_inputs<S: AsRef<str>>(&self, key: BoundsKey, raws: &[S]) -> BatchOutcome {
        let table = self.bounds();
        let bounds = if key == BoundsKey::MultipoleMore {
            table.multipole_orders(raws.len())
        } else {
            table.get(key)
        };
        validate_batch(raws, bounds).apply_policy(self.config.batch_validation)
    }

    pub fn begin_cell(&mut self) -> RingResult<()> {
        self.expect_phase(SessionPhase::AwaitingCellDecision, "STATE.CELL_DECISION")?;
        self.cell = Some(CellState::default());
        self.phase = SessionPhase::RecordingCell;
        tracing::debug!("recording cell");
        Ok(())
    }

    pub fn skip_cell(&mut self) -> RingResult<()> {
        self.expect_phase(SessionPhase::AwaitingCellDecision, "STATE.CELL_DECISION")?;
        self.phase = SessionPhase::BuildingRing;
        tracing::debug!("building ring without a cell");
        Ok(())
    }

    /// Ends cell recording and unlocks `Cell` as a ring addition.
    pub fn finalize_cell(&mut self) -> RingResult<()> {
        self.expect_phase(SessionPhase::RecordingCell, "STATE.CELL_FINALIZE")?;
        let cell = self.cell_mut()?;
        cell.finalize();
        let size = cell.size();
        self.phase = SessionPhase::BuildingRing;
        tracing::debug!(size, "cell finalized");
        Ok(())
    }

    /// Appends an already validated and built element to the active target.
    pub fn add_element(&mut self, built: BuiltElement) -> RingResult<AddOutcome> {
        let target = self.active_target()?;
        let kind = built.summary.kind;
        let length = built.length_consumed;

        match target {
            Target::Ring => self.ring.push_element(built),
            Target::Cell => self.cell_mut()?.push_element(built),
        }
        self.invalidate_run();
        tracing::debug!(%kind, length, target = target.as_str(), "element added");

        Ok(self.add_outcome(target, length))
    }

    /// Validates, builds and adds one element from raw text.
    ///
    /// `primary` fills the kind's first bounds row; `follow_up` fills
    /// `"Multipole more"` (sliced to the chosen order count) or `"RF more"`.
    /// Nothing is committed unless every stage succeeds.
    pub fn add_from_input<S: AsRef<str>>(
        &mut self,
        kind: ElementKind,
        primary: &[S],
        follow_up: &[S],
    ) -> RingResult<AddOutcome> {
        let Some(primary_key) = BoundsKey::primary_for(kind) else {
            let supplied = primary.len() + follow_up.len();
            if supplied != 0 {
                return Err(RingError::input_count(0, supplied));
            }
            return self.replay_cell();
        };
        self.active_target()?;

        let table = self.bounds();
        let mut values = validate_batch(primary, table.get(primary_key)).into_result()?;
        match BoundsKey::follow_up_for(kind) {
            Some(BoundsKey::MultipoleMore) => {
                let orders = MultipoleParameters::order_count(&values);
                values.extend(validate_batch(follow_up, table.multipole_orders(orders)).into_result()?);
            }
            Some(key) => {
                values.extend(validate_batch(follow_up, table.get(key)).into_result()?);
            }
            None if follow_up.is_empty() => {}
            None => return Err(RingError::input_count(0, follow_up.len())),
        }

        let built = build_element(kind, &values, &self.ring_context())?;
        self.add_element(built)
    }

    /// Appends a copy of the finalized cell to the ring as one undo unit.
    pub fn replay_cell(&mut self) -> RingResult<AddOutcome> {
        if self.active_target()? != Target::Ring {
            return Err(RingError::invalid_state(
                "STATE.CELL_REPLAY",
                "a cell can only be replayed into the ring",
            ));
        }
        let Some(cell) = self.cell.as_ref().filter(|cell| cell.is_finalized()) else {
            return Err(RingError::invalid_state(
                "STATE.NO_CELL",
                "there is no finalized cell to replay",
            ));
        };

        let size = cell.size();
        let count = cell.log().elements().len();
        self.ring.push_cell(cell);
        self.invalidate_run();
        tracing::debug!(size, elements = count, "cell replayed into ring");

        Ok(self.add_outcome(Target::Ring, size))
    }

    /// Undoes the last entry of the active target.
    pub fn delete_last(&mut self) -> RingResult<DeleteOutcome> {
        let target = self.active_target()?;
        let popped = match target {
            Target::Ring => self.ring.pop(),
            Target::Cell => self.cell_mut()?.pop(),
        };
        let Some(popped) = popped else {
            return Err(RingError::empty_collection(target.as_str()));
        };
        self.invalidate_run();
        tracing::debug!(
            line = %popped.line,
            length = popped.length,
            target = target.as_str(),
            "entry deleted"
        );

        Ok(DeleteOutcome {
            target,
            removed_line: popped.line,
            length_restored: popped.length,
            descriptors_removed: popped.descriptors.len(),
            ring_space: self.ring_space(),
        })
    }

    /// Discards ring, cell and run output; keeps the radius and the beam.
    pub fn reset_ring(&mut self) {
        self.ring = RingState::new(self.radius());
        self.cell = None;
        self.last_run = None;
        self.phase = SessionPhase::AwaitingCellDecision;
        tracing::info!("ring reset");
    }

    pub fn engine_request(&self) -> RingResult<EngineRequest> {
        let beam = self.beam.ok_or_else(|| {
            RingError::invalid_state("STATE.NO_BEAM", "configure the beam before running")
        })?;
        Ok(EngineRequest::new(
            self.radius(),
            beam,
            self.ring.log().elements(),
        ))
    }

    /// Runs the ring through `engine` and lays out what it placed.
    pub fn submit(&mut self, engine: &dyn Engine) -> RingResult<&RunOutput> {
        if !matches!(
            self.phase,
            SessionPhase::BuildingRing | SessionPhase::Submitted
        ) {
            return Err(RingError::invalid_state(
                "STATE.NOT_READY",
                format!("cannot run while {}", self.phase.as_str()),
            ));
        }
        let request = self.engine_request()?;

        let span = tracing::info_span!("engine_run", elements = request.elements.len());
        let _guard = span.enter();
        tracing::info!("submitting ring to engine");

        let placed = engine.run(&request)?;
        let layout = layout_filtered(&placed, self.radius(), &self.auxiliary)?;
        tracing::info!(
            placed = placed.len(),
            regions = layout.regions.len(),
            "engine run complete"
        );

        self.phase = SessionPhase::Submitted;
        Ok(&*self.last_run.insert(RunOutput { placed, layout }))
    }

    fn expect_phase(&self, expected: SessionPhase, placeholder: &'static str) -> RingResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RingError::invalid_state(
                placeholder,
                format!(
                    "expected {} but session is {}",
                    expected.as_str(),
                    self.phase.as_str()
                ),
            ))
        }
    }

    fn active_target(&self) -> RingResult<Target> {
        match self.phase {
            SessionPhase::RecordingCell => Ok(Target::Cell),
            SessionPhase::BuildingRing | SessionPhase::Submitted => Ok(Target::Ring),
            SessionPhase::AwaitingCellDecision => Err(RingError::invalid_state(
                "STATE.CELL_DECISION",
                "choose to record a cell or skip it before adding elements",
            )),
        }
    }

    fn finalized_cell(&self) -> Option<&CellState> {
        self.cell.as_ref().filter(|cell| cell.is_finalized())
    }

    fn cell_mut(&mut self) -> RingResult<&mut CellState> {
        self.cell.as_mut().ok_or_else(|| {
            RingError::invalid_state("STATE.NO_CELL", "no cell is being recorded")
        })
    }

    fn invalidate_run(&mut self) {
        if self.phase == SessionPhase::Submitted {
            self.phase = SessionPhase::BuildingRing;
        }
        self.last_run = None;
    }

    fn add_outcome(&self, target: Target, length_consumed: f64) -> AddOutcome {
        let warning = if target == Target::Ring && self.ring.is_full() {
            tracing::warn!(ring_space = self.ring_space(), "{RING_FULL_WARNING}");
            Some(RING_FULL_WARNING)
        } else {
            None
        };

        AddOutcome {
            target,
            length_consumed,
            ring_space: self.ring_space(),
            warning,
        }
    }
}

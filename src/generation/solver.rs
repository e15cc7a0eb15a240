//! # Placement Solver
//!
//! Depth-first backtracking over the request list. Each frame places one entity:
//! it tries candidate cells in random order, commits a trial, checks the spacing
//! rules, recurses on the remaining requests, and rolls the trial back if the
//! branch fails.
//!
//! The grid and placement record are mutated in place and never cloned per
//! branch. A shared [`SearchGovernor`] bounds the total number of frames one
//! attempt may open.

use crate::{
    candidates_for, check_distribution, CellType, EntityId, EntityRequest, ForgeResult, Grid,
    PlacementRecord, Position, SpacingRules,
};
use log::trace;
use rand::rngs::StdRng;

/// Step counter and ceiling for one attempt's search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGovernor {
    steps: u32,
    step_limit: u32,
}

impl SearchGovernor {
    /// Creates a governor with no steps taken.
    pub fn new(step_limit: u32) -> Self {
        Self {
            steps: 0,
            step_limit,
        }
    }

    /// Counts one step. Returns false once the ceiling has been exceeded.
    pub fn tick(&mut self) -> bool {
        self.steps = self.steps.saturating_add(1);
        self.steps <= self.step_limit
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// The configured ceiling.
    pub fn step_limit(&self) -> u32 {
        self.step_limit
    }

    /// Whether the ceiling has been exceeded.
    pub fn is_tripped(&self) -> bool {
        self.steps > self.step_limit
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every request received a cell
    Solved,
    /// Some request ran out of candidates within the step budget
    Exhausted,
    /// The step ceiling was exceeded
    Aborted,
}

/// A committed but not yet accepted placement.
///
/// Holds exactly what is needed to restore the grid cell and record entry.
#[derive(Debug)]
#[must_use = "a trial must be kept or rolled back"]
pub struct Trial {
    entity: EntityId,
    position: Position,
    original_cell: CellType,
    previous_position: Option<Position>,
}

impl Trial {
    /// Writes the request into the grid and the placement record.
    pub fn commit(
        grid: &mut Grid,
        placements: &mut PlacementRecord,
        request: &EntityRequest,
        position: Position,
    ) -> ForgeResult<Self> {
        let original_cell = grid.set(position, request.cell)?;
        let previous_position = placements.insert(request.entity, position);
        Ok(Self {
            entity: request.entity,
            position,
            original_cell,
            previous_position,
        })
    }

    /// Restores the grid cell and record entry to their pre-trial values.
    pub fn rollback(self, grid: &mut Grid, placements: &mut PlacementRecord) -> ForgeResult<()> {
        grid.set(self.position, self.original_cell)?;
        match self.previous_position {
            Some(previous) => {
                placements.insert(self.entity, previous);
            }
            None => {
                placements.remove(self.entity);
            }
        }
        Ok(())
    }

    /// The cell this trial occupies.
    pub fn position(&self) -> Position {
        self.position
    }
}

/// Backtracking solver for one attempt.
///
/// Owns the attempt's governor; the grid and record are borrowed from the
/// orchestrator for the duration of the search.
pub struct PlacementSolver<'a> {
    rules: &'a SpacingRules,
    rng: &'a mut StdRng,
    governor: SearchGovernor,
}

impl<'a> PlacementSolver<'a> {
    /// Creates a solver with a fresh governor.
    pub fn new(rules: &'a SpacingRules, rng: &'a mut StdRng, step_limit: u32) -> Self {
        Self {
            rules,
            rng,
            governor: SearchGovernor::new(step_limit),
        }
    }

    /// The governor tracking this search.
    pub fn governor(&self) -> &SearchGovernor {
        &self.governor
    }

    /// Assigns a cell to every pending request.
    ///
    /// On [`SearchOutcome::Solved`] the grid and record hold the full placement.
    /// On any other outcome both are left exactly as they were passed in.
    pub fn solve(
        &mut self,
        grid: &mut Grid,
        placements: &mut PlacementRecord,
        pending: &[EntityRequest],
    ) -> ForgeResult<SearchOutcome> {
        if !self.governor.tick() {
            return Ok(SearchOutcome::Aborted);
        }

        let Some((request, rest)) = pending.split_first() else {
            return Ok(SearchOutcome::Solved);
        };

        for position in candidates_for(request.entity, grid, self.rng) {
            if !request.accepts(grid.get(position)) {
                continue;
            }

            let trial = Trial::commit(grid, placements, request, position)?;
            match check_distribution(placements, request.entity, position, self.rules) {
                Ok(()) => match self.solve(grid, placements, rest)? {
                    SearchOutcome::Solved => return Ok(SearchOutcome::Solved),
                    SearchOutcome::Aborted => {
                        trial.rollback(grid, placements)?;
                        return Ok(SearchOutcome::Aborted);
                    }
                    SearchOutcome::Exhausted => {}
                },
                Err(violation) => {
                    trace!("{} rejected at {}: {}", request.entity, position, violation);
                }
            }
            trial.rollback(grid, placements)?;
        }

        trace!(
            "No cell left for {} after {} steps",
            request.entity,
            self.governor.steps()
        );
        Ok(SearchOutcome::Exhausted)
    }
}

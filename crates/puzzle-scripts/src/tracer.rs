//! Ray tracing checks over a mirror grid.
//!
//! Two independent checks, both fail-fast:
//!
//! - boundary consistency: a ray entering from every border cell is traced
//!   until it leaves the grid, and its displacement along the exit
//!   direction is compared with the grid extent;
//! - cycle detection: a ray starting on every cell in every cardinal
//!   direction must never revisit a cell.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::grid::{Direction, Grid, Position};

/// Extent below which the boundary check never fires
pub const DEFAULT_EXTENT_THRESHOLD: i64 = 8;

/// Configuration for grid validation
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Minimum `|extent · direction|` for a boundary violation
    pub extent_threshold: i64,
    pub check_boundaries: bool,
    pub check_cycles: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            extent_threshold: DEFAULT_EXTENT_THRESHOLD,
            check_boundaries: true,
            check_cycles: true,
        }
    }
}

/// First problem found in a grid
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("ray entering at {start} heading {heading} crosses the grid to {exit}")]
    #[serde(rename_all = "camelCase")]
    Boundary {
        start: Position,
        heading: Direction,
        exit: Position,
        exit_heading: Direction,
        displacement: i64,
        extent: i64,
    },

    #[error("ray from {start} heading {heading} loops back to {revisited}")]
    #[serde(rename_all = "camelCase")]
    Cycle {
        start: Position,
        heading: Direction,
        revisited: Position,
    },
}

/// Follow a ray until it reaches a cell without a mirror.
///
/// Returns the first mirrorless position and the direction the ray had when
/// it got there. Only call this for rays entering from outside the grid:
/// stepping is one-to-one, so such a ray cannot be caught in a loop.
pub fn trace_to_exit(grid: &Grid, start: Position, heading: Direction) -> (Position, Direction) {
    let (mut position, mut direction) = (start, heading);
    while let Some((next, outgoing)) = grid.step(position, direction) {
        position = next;
        direction = outgoing;
    }
    (position, direction)
}

/// Follow a ray and report the first cell it enters twice, if any.
pub fn find_revisit(grid: &Grid, start: Position, heading: Direction) -> Option<Position> {
    let mut visited = HashSet::new();
    let (mut position, mut direction) = (start, heading);
    while let Some((next, outgoing)) = grid.step(position, direction) {
        visited.insert(position);
        if visited.contains(&next) {
            return Some(next);
        }
        position = next;
        direction = outgoing;
    }
    None
}

fn check_entry(
    grid: &Grid,
    start: Position,
    heading: Direction,
    config: &TraceConfig,
) -> Result<(), Violation> {
    let (exit, exit_heading) = trace_to_exit(grid, start, heading);
    let displacement = (start.along(exit_heading) - exit.along(exit_heading)).abs();
    let extent = grid.extent().along(exit_heading).abs();

    if displacement >= extent && extent >= config.extent_threshold {
        return Err(Violation::Boundary {
            start,
            heading,
            exit,
            exit_heading,
            displacement,
            extent,
        });
    }
    Ok(())
}

/// Trace inward from every border cell.
///
/// Columns are visited first (top then bottom entry), then rows (left then
/// right entry).
pub fn check_boundaries(grid: &Grid, config: &TraceConfig) -> Result<(), Violation> {
    let width = grid.width() as i32;
    let height = grid.height() as i32;

    for x in 0..width {
        check_entry(grid, Position::new(x, 0), Direction::DOWN, config)?;
        check_entry(grid, Position::new(x, height - 1), Direction::UP, config)?;
    }
    for y in 0..height {
        check_entry(grid, Position::new(0, y), Direction::RIGHT, config)?;
        check_entry(grid, Position::new(width - 1, y), Direction::LEFT, config)?;
    }
    Ok(())
}

/// Trace from every cell in every cardinal direction.
pub fn check_cycles(grid: &Grid) -> Result<(), Violation> {
    for y in 0..grid.height() {
        for x in 0..grid.row_len(y) {
            let start = Position::new(x as i32, y as i32);
            for heading in Direction::CARDINAL {
                if let Some(revisited) = find_revisit(grid, start, heading) {
                    return Err(Violation::Cycle {
                        start,
                        heading,
                        revisited,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Run the enabled checks, boundaries first, stopping at the first violation.
pub fn validate(grid: &Grid, config: &TraceConfig) -> Result<(), Violation> {
    debug!("validating {}x{} grid", grid.width(), grid.height());
    if config.check_boundaries {
        check_boundaries(grid, config)?;
    }
    if config.check_cycles {
        check_cycles(grid)?;
    }
    Ok(())
}

//! Closest-to-target search over shapes and digit orderings.
//!
//! Every shape from the enumerator is paired with every ordering of digits
//! that fills its slots. The first candidate with the smallest distance to
//! the target wins; undefined results never win.

use std::rc::Rc;

use log::{debug, trace};
use serde::Serialize;
use smallvec::SmallVec;

use crate::bag::Bag;
use crate::error::{PuzzleError, Result};
use crate::shape::{shapes, Shape, Value};

/// Digits filling the slots of one shape
pub type Params = SmallVec<[u8; 16]>;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Stop at the first candidate that hits the target exactly
    pub stop_at_exact: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            stop_at_exact: true,
        }
    }
}

/// Best candidate found by the solver
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    /// Winning value; quotients print as floats, e.g. `4.0`
    pub value: Value,
    pub target: i64,
    pub distance: u128,
    /// Winning expression with its digits, e.g. `2 * 5`
    pub expression: String,
    pub shapes_tried: usize,
    pub candidates_evaluated: usize,
}

/// Ordered selections of `r` tiles from `pool`, in lexicographic order of
/// tile positions. Repeated tiles give repeated selections.
#[derive(Debug, Clone)]
pub struct Permutations<'a> {
    pool: &'a [u8],
    r: usize,
    indices: Vec<usize>,
    cycles: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'a> Permutations<'a> {
    pub fn new(pool: &'a [u8], r: usize) -> Self {
        let n = pool.len();
        Self {
            pool,
            r,
            indices: (0..n).collect(),
            cycles: (0..r.min(n)).map(|i| n - i).collect(),
            started: false,
            done: r > n,
        }
    }

    fn current(&self) -> Params {
        self.indices[..self.r].iter().map(|&i| self.pool[i]).collect()
    }
}

impl Iterator for Permutations<'_> {
    type Item = Params;

    fn next(&mut self) -> Option<Params> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }

        let n = self.pool.len();
        for i in (0..self.r).rev() {
            self.cycles[i] -= 1;
            if self.cycles[i] == 0 {
                let moved = self.indices.remove(i);
                self.indices.push(moved);
                self.cycles[i] = n - i;
            } else {
                let j = self.cycles[i];
                self.indices.swap(i, n - j);
                return Some(self.current());
            }
        }

        self.done = true;
        None
    }
}

struct Best {
    value: Value,
    distance: u128,
    shape: Rc<Shape>,
    params: Params,
}

/// Find the value closest to `target` buildable from `bag`.
///
/// Fails with [`PuzzleError::NoCandidates`] when the bag holds no digits.
pub fn solve(bag: &Bag, target: i64, config: &SolverConfig) -> Result<Solution> {
    let digits = bag.digits.flatten();
    let mut best: Option<Best> = None;
    let mut shapes_tried: usize = 0;
    let mut candidates_evaluated: usize = 0;

    'search: for shape in shapes(bag.operators) {
        // Shapes with more slots than digit tiles have no orderings
        if shape.size() > digits.len() {
            continue;
        }
        shapes_tried += 1;

        for params in Permutations::new(&digits, shape.size()) {
            candidates_evaluated += 1;
            let value = shape.eval(&mut params.iter().copied())?;
            let Some(distance) = value.distance(target) else {
                trace!("{} = {}", shape.render(&params), value);
                continue;
            };

            if best.as_ref().map_or(true, |b| distance < b.distance) {
                best = Some(Best {
                    value,
                    distance,
                    shape: Rc::clone(&shape),
                    params,
                });
                if distance == 0 && config.stop_at_exact {
                    break 'search;
                }
            }
        }
    }

    debug!(
        "tried {} shapes, evaluated {} candidates",
        shapes_tried, candidates_evaluated
    );

    let best = best.ok_or(PuzzleError::NoCandidates)?;
    Ok(Solution {
        value: best.value,
        target,
        distance: best.distance,
        expression: best.shape.render(&best.params),
        shapes_tried,
        candidates_evaluated,
    })
}

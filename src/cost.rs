// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The cumulative-cost dynamic program, host form.
//!
//! Cell (x, y) of the result holds the minimum total energy of any
//! top-to-bottom path ending at (x, y): row 0 is the energy row
//! verbatim, and every later cell adds its own energy to the cheapest
//! of its three upper neighbors, with the edge columns reusing the
//! edge value rather than wrapping.  Rows are strictly ordered -- a
//! row only ever reads the row above it -- which is the one structural
//! fact every engine in this crate is built around.

use crate::cq;
use crate::error::CarveError;
use crate::matrix::Matrix;

/// Compute the cumulative-cost matrix sequentially.  Deterministic,
/// and the reference implementation every other engine is checked
/// against.
pub fn cumulative_cost(energy: &Matrix) -> Matrix {
    let (height, width) = (energy.height(), energy.width());
    let mut cost = Matrix::new(height, width);
    cost.row_mut(0).copy_from_slice(energy.row(0));

    for y in 1..height {
        for x in 0..width {
            let left = cost[(cq!(x == 0, 0, x - 1), y - 1)];
            let mid = cost[(x, y - 1)];
            let right = cost[(cq!(x + 1 >= width, width - 1, x + 1), y - 1)];
            cost[(x, y)] = energy[(x, y)] + left.min(mid).min(right);
        }
    }
    cost
}

/// The seam between the carver and whichever engine computes the DP.
/// Any implementation must be substitutable for any other with
/// numerically identical results.
pub trait CostEngine {
    fn cumulative_cost(&self, energy: &Matrix) -> Result<Matrix, CarveError>;
}

impl<E: CostEngine + ?Sized> CostEngine for Box<E> {
    fn cumulative_cost(&self, energy: &Matrix) -> Result<Matrix, CarveError> {
        (**self).cumulative_cost(energy)
    }
}

/// The sequential engine: [`cumulative_cost`] behind the trait.
#[derive(Debug, Default)]
pub struct HostEngine;

impl CostEngine for HostEngine {
    fn cumulative_cost(&self, energy: &Matrix) -> Result<Matrix, CarveError> {
        Ok(cumulative_cost(energy))
    }
}

#[cfg(test)]
pub(crate) fn golden_energy() -> Matrix {
    Matrix::from_rows(&[
        vec![1.0, 5.0, 1.0],
        vec![2.0, 1.0, 2.0],
        vec![1.0, 5.0, 1.0],
        vec![3.0, 1.0, 3.0],
    ])
}

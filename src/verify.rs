// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The verification oracle.
//!
//! Recomputes the cumulative-cost matrix on the trusted sequential
//! path and compares it cell by cell against a device-produced result.
//! This is a correctness gate for the parallel engine, not part of the
//! production carve path, and it can be invoked in isolation.

use crate::cost;
use crate::error::CarveError;
use crate::matrix::Matrix;
use itertools::iproduct;

/// The comparison tolerance used when none is given explicitly.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// True when every logical cell of `device_result` is within
/// `tolerance` of the host recomputation from `energy`.
pub fn matches(device_result: &Matrix, energy: &Matrix, tolerance: f32) -> bool {
    check(device_result, energy, tolerance).is_ok()
}

/// Like [`matches`], but reports the first offending cell.
pub fn check(device_result: &Matrix, energy: &Matrix, tolerance: f32) -> Result<(), CarveError> {
    assert!(
        device_result.height() == energy.height() && device_result.width() == energy.width(),
        "verify requires same-shape matrices"
    );
    let host_result = cost::cumulative_cost(energy);
    for (y, x) in iproduct!(0..energy.height(), 0..energy.width()) {
        let expected = host_result[(x, y)];
        let actual = device_result[(x, y)];
        if (expected - actual).abs() > tolerance {
            return Err(CarveError::VerificationMismatch {
                x,
                y,
                expected,
                actual,
                tolerance,
            });
        }
    }
    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam extraction and the carve operator.
//!
//! A seam is one column index per row, top to bottom, vertically
//! contiguous, tracing a minimal-cost path through the cumulative-cost
//! matrix.  Carving either removes that path (one pixel narrower) or
//! paints it with a sentinel for visualization.

use crate::cq;
use crate::error::CarveError;
use crate::matrix::{Matrix, PixelFormat};

/// What to do with an extracted seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveMode {
    /// Shift everything right of the seam left by one pixel and
    /// narrow the logical width.
    Remove,
    /// Overwrite the seam pixels with a highlight, keeping the shape.
    Mark,
}

// Leftmost strict minimum, so ties always break toward the lowest
// column index.
fn argmin(cells: &[f32]) -> usize {
    let mut best = 0;
    for (x, &cell) in cells.iter().enumerate() {
        if cell < cells[best] {
            best = x;
        }
    }
    best
}

/// Backtrack the minimal-cost seam out of a cumulative-cost matrix.
/// The bottom entry is the argmin of the bottom row; each entry above
/// is the cheapest of the three (clamped) parents.
pub fn extract_seam(cost: &Matrix) -> Vec<u32> {
    let (height, width) = (cost.height(), cost.width());
    let mut seam = vec![0u32; height];
    let mut x = argmin(cost.row(height - 1));
    seam[height - 1] = x as u32;

    for y in (0..height.saturating_sub(1)).rev() {
        let row = cost.row(y);
        let lo = cq!(x == 0, 0, x - 1);
        let hi = cq!(x + 1 >= width, width - 1, x + 1);
        // lo..=hi scans left to right, so strict < keeps the lowest
        // column on a tie.
        let mut best = lo;
        for c in lo..=hi {
            if row[c] < row[best] {
                best = c;
            }
        }
        x = best;
        seam[y] = x as u32;
    }
    seam
}

fn validate(image: &Matrix, seam: &[u32], pixel_width: usize) -> Result<(), CarveError> {
    if seam.len() != image.height() {
        return Err(CarveError::SeamOutOfBounds(format!(
            "seam has {} entries for {} rows",
            seam.len(),
            image.height()
        )));
    }
    for (y, &sx) in seam.iter().enumerate() {
        if sx as usize >= pixel_width {
            return Err(CarveError::SeamOutOfBounds(format!(
                "column {} at row {} exceeds width {}",
                sx, y, pixel_width
            )));
        }
    }
    Ok(())
}

/// Apply a seam to an image matrix.  The seam is validated in full
/// before the first cell is written, so a malformed seam never leaves
/// a half-carved matrix behind.
pub fn carve(
    mut image: Matrix,
    seam: &[u32],
    mode: CarveMode,
    format: PixelFormat,
) -> Result<Matrix, CarveError> {
    let depth = format.depth();
    let pixel_width = image.width() / depth;
    validate(&image, seam, pixel_width)?;

    match mode {
        CarveMode::Remove => {
            for (y, &sx) in seam.iter().enumerate() {
                let row = image.row_mut(y);
                let start = sx as usize * depth;
                row.copy_within(start + depth.., start);
            }
            image.shrink_width(depth);
        }
        CarveMode::Mark => {
            // Opaque red for RGBA, full intensity for grayscale.
            let sentinel = [1.0, 0.0, 0.0, 1.0];
            for (y, &sx) in seam.iter().enumerate() {
                let row = image.row_mut(y);
                let start = sx as usize * depth;
                row[start..start + depth].copy_from_slice(&sentinel[..depth]);
            }
        }
    }
    Ok(image)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-pixel energy via a fixed convolution kernel.
//!
//! The energy of a pixel is how much it stands out from its
//! neighborhood, and the stock kernel here is the 3x3 eight-connected
//! Laplacian edge detector.  Cells within half the kernel's extent of
//! an edge replicate the nearest valid input cell, so the border does
//! not read as an artificial high-energy ridge.

use crate::error::CarveError;
use crate::matrix::{Matrix, PixelFormat};
use itertools::iproduct;

/// Rows/columns of the (square) kernel.
pub const KERNEL_EXTENT: usize = 3;

/// A fixed 3x3 convolution kernel.  Constant for the process
/// lifetime; every convolution call sees the same weights.
#[derive(Debug, Clone, Copy)]
pub struct EnergyKernel {
    weights: [[f32; KERNEL_EXTENT]; KERNEL_EXTENT],
}

impl Default for EnergyKernel {
    /// The eight-connected Laplacian: strong response on edges, zero
    /// on flat fields.
    fn default() -> Self {
        EnergyKernel {
            weights: [
                [-1.0, -1.0, -1.0],
                [-1.0, 8.0, -1.0],
                [-1.0, -1.0, -1.0],
            ],
        }
    }
}

impl EnergyKernel {
    pub fn new(weights: [[f32; KERNEL_EXTENT]; KERNEL_EXTENT]) -> Self {
        EnergyKernel { weights }
    }

    /// Convolve an intensity matrix with this kernel, producing an
    /// energy matrix of the same logical shape.  Pure: neither input
    /// is touched.  Fails with `InvalidShape` when the input is
    /// smaller than the kernel in either dimension.
    pub fn convolve(&self, input: &Matrix) -> Result<Matrix, CarveError> {
        let (height, width) = (input.height(), input.width());
        if height < KERNEL_EXTENT || width < KERNEL_EXTENT {
            return Err(CarveError::InvalidShape {
                height,
                width,
                extent: KERNEL_EXTENT,
            });
        }

        let mut output = Matrix::new(height, width);
        for (y, x) in iproduct!(0..height, 0..width) {
            let mut acc = 0.0;
            for (ky, kx) in iproduct!(0..KERNEL_EXTENT, 0..KERNEL_EXTENT) {
                // Kernel offsets are -1..=1, so saturating_sub is a
                // sufficient left/top clamp.
                let sy = (y + ky).saturating_sub(1).min(height - 1);
                let sx = (x + kx).saturating_sub(1).min(width - 1);
                acc += self.weights[ky][kx] * input[(sx, sy)];
            }
            output[(x, y)] = acc;
        }
        Ok(output)
    }
}

/// Collapse an image matrix down to the single intensity plane the
/// cost engines run on.  Intensity images copy through; RGBA images
/// combine channels with the Rec.709 luma weights.
pub fn luma_plane(image: &Matrix, format: PixelFormat) -> Matrix {
    let height = image.height();
    match format {
        PixelFormat::I => {
            let mut plane = Matrix::new(height, image.width());
            for y in 0..height {
                plane.row_mut(y).copy_from_slice(image.row(y));
            }
            plane
        }
        PixelFormat::Rgba => {
            let pixel_width = image.width() / PixelFormat::Rgba.depth();
            let mut plane = Matrix::new(height, pixel_width);
            for (y, x) in iproduct!(0..height, 0..pixel_width) {
                let row = image.row(y);
                let (r, g, b) = (row[x * 4], row[x * 4 + 1], row[x * 4 + 2]);
                plane[(x, y)] = 0.2126 * r + 0.7152 * g + 0.0722 * b;
            }
            plane
        }
    }
}

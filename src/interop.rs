// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The boundary with the imaging collaborator.
//!
//! Everything here moves pixel rows between the image crate's buffers
//! and this crate's [`Matrix`], one row of floats at a time.  Once a
//! matrix has been extracted from an image the image is done with;
//! nothing in the pipeline reaches back through the old handle.

use crate::error::CarveError;
use crate::matrix::{Matrix, PixelFormat};
use image::{GrayImage, Rgba32FImage, RgbaImage};
use num_traits::clamp;
use std::path::Path;

fn luma(px: &[f32; 4]) -> f32 {
    0.2126 * px[0] + 0.7152 * px[1] + 0.0722 * px[2]
}

// [0,1] float to 8-bit channel.
fn quantize(v: f32) -> u8 {
    (clamp(v, 0.0, 1.0) * 255.0).round() as u8
}

/// Read an image file into a freshly pitched matrix in the requested
/// pixel format.  Grayscale collapses each pixel to its Rec.709 luma.
pub fn decode<P: AsRef<Path>>(path: P, format: PixelFormat) -> Result<Matrix, CarveError> {
    let img: Rgba32FImage = image::open(path)?.to_rgba32f();
    let (width, height) = img.dimensions();
    let (width, height) = (width as usize, height as usize);

    let mut matrix = Matrix::new(height, width * format.depth());
    for y in 0..height {
        let row = matrix.row_mut(y);
        for x in 0..width {
            let px = &img.get_pixel(x as u32, y as u32).0;
            match format {
                PixelFormat::I => row[x] = luma(px),
                PixelFormat::Rgba => row[x * 4..x * 4 + 4].copy_from_slice(px),
            }
        }
    }
    Ok(matrix)
}

/// Quantize a matrix back to 8-bit pixels and write it out, with the
/// container picked by the file extension.
pub fn encode<P: AsRef<Path>>(
    matrix: &Matrix,
    format: PixelFormat,
    path: P,
) -> Result<(), CarveError> {
    let height = matrix.height();
    let pixel_width = matrix.width() / format.depth();
    match format {
        PixelFormat::I => {
            let mut out = GrayImage::new(pixel_width as u32, height as u32);
            for y in 0..height {
                let row = matrix.row(y);
                for x in 0..pixel_width {
                    out.put_pixel(x as u32, y as u32, image::Luma([quantize(row[x])]));
                }
            }
            out.save(path)?;
        }
        PixelFormat::Rgba => {
            let mut out = RgbaImage::new(pixel_width as u32, height as u32);
            for y in 0..height {
                let row = matrix.row(y);
                for x in 0..pixel_width {
                    let px = [
                        quantize(row[x * 4]),
                        quantize(row[x * 4 + 1]),
                        quantize(row[x * 4 + 2]),
                        quantize(row[x * 4 + 3]),
                    ];
                    out.put_pixel(x as u32, y as u32, image::Rgba(px));
                }
            }
            out.save(path)?;
        }
    }
    Ok(())
}

/// Write an energy matrix as a gray image, scaled by its largest
/// absolute response so the edges show regardless of kernel gain.
pub fn dump_energy<P: AsRef<Path>>(energy: &Matrix, path: P) -> Result<(), CarveError> {
    let mut peak = 0.0f32;
    for y in 0..energy.height() {
        for &cell in energy.row(y) {
            peak = peak.max(cell.abs());
        }
    }
    let scale = if peak > 0.0 { 1.0 / peak } else { 1.0 };

    let mut out = GrayImage::new(energy.width() as u32, energy.height() as u32);
    for y in 0..energy.height() {
        let row = energy.row(y);
        for (x, &cell) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, image::Luma([quantize(cell.abs() * scale)]));
        }
    }
    out.save(path)?;
    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pitched two-dimensional buffer every stage of the pipeline
//! trades in.
//!
//! A `Matrix` has a logical width and a row stride ("pitch") that may
//! be larger than the width, so that rows can be padded out to an
//! alignment boundary.  Cells in the padding region `[width, pitch)`
//! are never part of any intensity computation; a fresh allocation
//! zero-fills them and in-place transforms leave them alone.

use std::ops::{Index, IndexMut};

/// Fresh allocations round their pitch up to this many cells, which
/// puts every row on a 64-byte boundary for f32 data.
pub const PITCH_ALIGN: usize = 16;

/// The two pixel layouts the image boundary speaks: single-channel
/// intensity, or interleaved 4-channel RGBA.  `Matrix` widths count
/// f32 cells, so an RGBA image of pixel width W has `width == 4 * W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    I,
    Rgba,
}

impl PixelFormat {
    /// Cells per pixel.
    pub fn depth(self) -> usize {
        match self {
            PixelFormat::I => 1,
            PixelFormat::Rgba => 4,
        }
    }
}

/// A row-major f32 buffer of `height` rows, each `width` cells long,
/// stored `pitch` cells apart.
#[derive(Debug, Clone)]
pub struct Matrix {
    height: usize,
    width: usize,
    pitch: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Allocate a zero-filled matrix with the pitch rounded up to
    /// [`PITCH_ALIGN`].
    pub fn new(height: usize, width: usize) -> Self {
        let pitch = (width + PITCH_ALIGN - 1) / PITCH_ALIGN * PITCH_ALIGN;
        Matrix::with_pitch(height, width, pitch)
    }

    /// Allocate a zero-filled matrix with an explicit pitch.  Panics
    /// if `pitch < width`.
    pub fn with_pitch(height: usize, width: usize, pitch: usize) -> Self {
        assert!(pitch >= width, "pitch must be at least the logical width");
        Matrix {
            height,
            width,
            pitch,
            data: vec![0.0; height * pitch],
        }
    }

    /// Build a matrix from logical rows, mostly useful for fixtures.
    /// All rows must be the same length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Self {
        let mut matrix = Matrix::new(rows.len(), rows.first().map_or(0, Vec::len));
        for (y, row) in rows.iter().enumerate() {
            matrix.row_mut(y).copy_from_slice(row);
        }
        matrix
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    fn get_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.pitch + x
    }

    /// The logical cells of row `y`: exactly `width` of them, padding
    /// excluded.
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.pitch;
        &self.data[start..start + self.width]
    }

    /// Mutable view of the logical cells of row `y`.
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.pitch;
        &mut self.data[start..start + self.width]
    }

    // Narrowing only adjusts the logical width; the pitch and the
    // now-stale tail cells stay where they are.
    pub(crate) fn shrink_width(&mut self, cells: usize) {
        assert!(cells < self.width);
        self.width -= cells;
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    /// A convenience addressing mode for getting values, `(x, y)`.
    fn index(&self, (x, y): (usize, usize)) -> &f32 {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    /// A convenience addressing mode for setting values, `(x, y)`.
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f32 {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

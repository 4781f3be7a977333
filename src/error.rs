// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong while carving.

use failure::Fail;

/// The error kinds of the carve pipeline.  Shape and bounds problems
/// are caught before any work is dispatched; device problems are fatal
/// to the invocation and are never silently retried on the host
/// engine.
#[derive(Debug, Fail)]
pub enum CarveError {
    /// The input is smaller than the convolution kernel's extent.
    #[fail(
        display = "input of {} rows x {} cols is smaller than the {}x{} kernel",
        height, width, extent, extent
    )]
    InvalidShape {
        height: usize,
        width: usize,
        extent: usize,
    },

    /// A seam that does not fit the image it is being carved from.
    #[fail(display = "malformed seam: {}", _0)]
    SeamOutOfBounds(String),

    /// More columns requested than the image has to give.
    #[fail(
        display = "cannot remove {} columns from a {}-column image",
        requested, width
    )]
    InsufficientWidth { requested: usize, width: usize },

    /// The compute context could not be brought up.
    #[fail(display = "compute device bootstrap failed: {}", _0)]
    DeviceInit(String),

    /// A row dispatch against the compute context went wrong.
    #[fail(display = "compute device dispatch failed: {}", _0)]
    DeviceDispatch(String),

    /// The oracle found a cell where the device result diverges from
    /// the host recomputation beyond the tolerance.
    #[fail(
        display = "verification mismatch at ({}, {}): expected {}, got {} (tolerance {})",
        x, y, expected, actual, tolerance
    )]
    VerificationMismatch {
        x: usize,
        y: usize,
        expected: f32,
        actual: f32,
        tolerance: f32,
    },

    /// Decode or encode failure from the imaging collaborator.
    #[fail(display = "image error: {}", _0)]
    Image(#[fail(cause)] image::ImageError),
}

impl From<image::ImageError> for CarveError {
    fn from(err: image::ImageError) -> Self {
        CarveError::Image(err)
    }
}

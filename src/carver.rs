// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The orchestration loop: energy, cost, extract, carve, repeat.

use crate::cost::CostEngine;
use crate::energy::{self, EnergyKernel};
use crate::error::CarveError;
use crate::matrix::{Matrix, PixelFormat};
use crate::seam::{self, CarveMode};
use crate::verify;
use log::{debug, error, info};
use std::time::Instant;

/// Knobs for a carve run.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Pixel layout of the matrices being carved.
    pub format: PixelFormat,
    /// When set, every cost matrix the engine produces is re-checked
    /// against the host oracle at this tolerance.  A mismatch is
    /// logged as an error and the run continues with the engine's
    /// result; the oracle diagnoses, it never overrides.
    pub verify_tolerance: Option<f32>,
}

impl Config {
    pub fn new(format: PixelFormat) -> Self {
        Config {
            format,
            verify_tolerance: None,
        }
    }
}

/// Drives repeated carves through whichever cost engine it was built
/// with.
pub struct SeamCarver<E: CostEngine> {
    engine: E,
    kernel: EnergyKernel,
    config: Config,
}

impl<E: CostEngine> SeamCarver<E> {
    pub fn new(engine: E, config: Config) -> Self {
        SeamCarver {
            engine,
            kernel: EnergyKernel::default(),
            config,
        }
    }

    // One full pipeline pass.  The image moves through by value and
    // comes back transformed; on any error it is dropped rather than
    // returned half-carved.
    fn carve_once(&self, image: Matrix, mode: CarveMode) -> Result<Matrix, CarveError> {
        let plane = energy::luma_plane(&image, self.config.format);
        let energy = self.kernel.convolve(&plane)?;
        let cost = self.engine.cumulative_cost(&energy)?;
        if let Some(tolerance) = self.config.verify_tolerance {
            if let Err(mismatch) = verify::check(&cost, &energy, tolerance) {
                error!("cost engine diverged from the host oracle: {}", mismatch);
            }
        }
        let seam = seam::extract_seam(&cost);
        seam::carve(image, &seam, mode, self.config.format)
    }

    /// Remove `cols` minimal seams, one at a time, each pass working
    /// on the previous pass's output.  Zero columns hands the image
    /// straight back; asking for the whole width (or more) is refused
    /// before any work happens.
    pub fn carve(&self, image: Matrix, cols: usize) -> Result<Matrix, CarveError> {
        let depth = self.config.format.depth();
        let pixel_width = image.width() / depth;
        if cols == 0 {
            return Ok(image);
        }
        if cols >= pixel_width {
            return Err(CarveError::InsufficientWidth {
                requested: cols,
                width: pixel_width,
            });
        }

        let start = Instant::now();
        let mut image = image;
        for n in 0..cols {
            image = self.carve_once(image, CarveMode::Remove)?;
            debug!(
                "seam {}/{} removed, {} columns left",
                n + 1,
                cols,
                image.width() / depth
            );
        }
        info!("removed {} seams in {:?}", cols, start.elapsed());
        Ok(image)
    }

    /// Highlight the next minimal seam without shrinking the image.
    pub fn mark(&self, image: Matrix) -> Result<Matrix, CarveError> {
        self.carve_once(image, CarveMode::Mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::HostEngine;
    use crate::device::{ComputeContext, DeviceEngine};

    fn gradient_image(height: usize, width: usize) -> Matrix {
        let mut image = Matrix::new(height, width);
        for y in 0..height {
            for (x, cell) in image.row_mut(y).iter_mut().enumerate() {
                *cell = x as f32 / width as f32;
            }
        }
        image
    }

    fn carver() -> SeamCarver<HostEngine> {
        SeamCarver::new(HostEngine, Config::new(PixelFormat::I))
    }

    #[test]
    fn zero_columns_is_the_identity() {
        let image = gradient_image(5, 8);
        let back = carver().carve(image, 0).unwrap();
        assert_eq!(back.width(), 8);
        assert_eq!(back.height(), 5);
    }

    #[test]
    fn carving_n_columns_narrows_by_n() {
        let image = gradient_image(12, 10);
        let carved = carver().carve(image, 3).unwrap();
        assert_eq!(carved.width(), 7);
        assert_eq!(carved.height(), 12);
    }

    #[test]
    fn whole_width_removal_is_refused() {
        let image = gradient_image(6, 6);
        match carver().carve(image, 6) {
            Err(CarveError::InsufficientWidth {
                requested: 6,
                width: 6,
            }) => (),
            other => panic!("expected InsufficientWidth, got {:?}", other),
        }
    }

    #[test]
    fn overshoot_is_refused_too() {
        let image = gradient_image(6, 6);
        assert!(carver().carve(image, 9).is_err());
    }

    #[test]
    fn marking_keeps_the_shape() {
        let image = gradient_image(7, 9);
        let marked = carver().mark(image).unwrap();
        assert_eq!(marked.width(), 9);
        assert_eq!(marked.height(), 7);
    }

    #[test]
    fn device_engine_carves_like_the_host() {
        let host_carved = carver().carve(gradient_image(9, 11), 2).unwrap();
        let device = SeamCarver::new(
            DeviceEngine::new(ComputeContext::with_workers(3).unwrap()),
            Config::new(PixelFormat::I),
        );
        let device_carved = device.carve(gradient_image(9, 11), 2).unwrap();
        assert_eq!(device_carved.width(), host_carved.width());
        for y in 0..host_carved.height() {
            assert_eq!(device_carved.row(y), host_carved.row(y));
        }
    }

    #[test]
    fn rgba_carving_counts_pixels_not_cells() {
        let mut image = Matrix::new(6, 5 * 4);
        for y in 0..6 {
            for x in 0..5 {
                let row = image.row_mut(y);
                let v = (x + y) as f32 / 10.0;
                row[x * 4..x * 4 + 4].copy_from_slice(&[v, v, v, 1.0]);
            }
        }
        let carver = SeamCarver::new(HostEngine, Config::new(PixelFormat::Rgba));
        let carved = carver.carve(image, 2).unwrap();
        assert_eq!(carved.width(), 3 * 4);
    }

    #[test]
    fn verification_gate_accepts_an_honest_engine() {
        let mut config = Config::new(PixelFormat::I);
        config.verify_tolerance = Some(crate::verify::DEFAULT_TOLERANCE);
        let carver = SeamCarver::new(HostEngine, config);
        let carved = carver.carve(gradient_image(8, 8), 1).unwrap();
        assert_eq!(carved.width(), 7);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image narrowing by seam carving.
//!
//! The pipeline: an image becomes a pitched float [`Matrix`], a fixed
//! convolution kernel turns it into an energy map, a dynamic program
//! accumulates minimum path costs row by row, and the cheapest
//! top-to-bottom seam is backtracked out and removed (or highlighted).
//! The cost DP exists twice, as a sequential [`HostEngine`] and as a
//! worker-pool [`DeviceEngine`], with a verification oracle that can
//! cross-check the two within a floating-point tolerance.

pub mod ternary;

pub mod matrix;
pub use crate::matrix::{Matrix, PixelFormat};

pub mod error;
pub use crate::error::CarveError;

pub mod energy;
pub use crate::energy::EnergyKernel;

pub mod cost;
pub use crate::cost::{cumulative_cost, CostEngine, HostEngine};

pub mod device;
pub use crate::device::{ComputeContext, DeviceEngine};

pub mod verify;

pub mod seam;
pub use crate::seam::{carve, extract_seam, CarveMode};

pub mod carver;
pub use crate::carver::{Config, SeamCarver};

pub mod interop;

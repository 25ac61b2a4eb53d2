#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot explorer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit of zero under `z = z*z + c` stays bounded.  To
//! draw it, we take a rectangle of the plane, lay a grid of samples
//! over it, and iterate every sample until it either leaves a circle
//! of fixed radius (the divergence threshold) or runs out of
//! iterations.  The number of iterations a point survives is its
//! "velocity", and it is the number used to render the image.
//!
//! Every sample is independent of every other, so the grid is split
//! into rows and the rows are rendered on a pool of worker threads,
//! each writing only to a buffer it owns.  The finished rows are then
//! stitched back together in order.
//!
//! The same grid feeds two front ends: an interactive terminal view
//! that only cares whether a point escaped, and an exporter that
//! writes the iteration counts into an image file.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

pub mod bitmap;
pub mod complex;
pub mod errors;
pub mod escape;
pub mod export;
pub mod grid;
pub mod navigate;
pub mod planes;
pub mod scheduler;
pub mod settings;
pub mod terminal;

pub use errors::{Error, Result};
pub use escape::{evaluate, EscapeParams, EscapeResult, EscapeTime, Evaluator};
pub use grid::SampleGrid;
pub use navigate::Command;
pub use planes::{map_sample, Viewport};
pub use scheduler::{render, CancelToken, Scheduler, WorkUnit};
pub use settings::Settings;

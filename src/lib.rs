#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which z -> z^2 + c, iterated from zero, never runs off to infinity.
//! Points outside the set do run off, some faster than others, and how
//! fast they go is what gets painted.
//!
//! This renderer counts the iterations each point of a square grid
//! takes to escape, smooths that count into a continuous value so the
//! image doesn't band, then normalizes the whole field against its own
//! minimum and maximum and runs it through a fixed color gradient.
//! Both stages are split into contiguous chunks of the grid and run in
//! parallel, with a join between them: the colors can't be chosen until
//! the extremes of the whole field are known.
//!
//! ```no_run
//! let pixels = mandelbrot::render(1000, 200, 400.0, 8).unwrap();
//! assert_eq!(pixels.len(), 1000 * 1000);
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod error;
pub mod escape;
pub mod field;
pub mod palette;
pub mod partition;
pub mod planes;
pub mod render;

pub use error::{ConfigError, RenderError};
pub use escape::{Escape, EscapeFieldComputer};
pub use field::{EscapeField, PixelField};
pub use palette::{Bounds, ColorMapper, ColorStop, COLOR_STOPS};
pub use partition::{ParallelFor, Sequential, WorkPartitioner};
pub use planes::{Pixel, PlaneMapper};
pub use render::{RenderConfig, Renderer};

/// Renders the standard view of the set on a `size` x `size` grid,
/// iterating each point at most `depth` times against the squared
/// escape radius `escape2`, spread over `workers` threads.
pub fn render(
    size: usize,
    depth: usize,
    escape2: f64,
    workers: usize,
) -> Result<PixelField, RenderError> {
    let config = RenderConfig {
        size,
        depth,
        escape2,
        workers,
    };
    Renderer::new(config)?.render()
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ties the two stages together.  A render is: compute the escape
//! field, join, scan the field for its bounds, map it to pixels, join.
//! Nothing survives from one render to the next; the bounds live only
//! for the duration of the mapping pass.

use num_cpus;

use error::{ConfigError, RenderError};
use escape::{EscapeFieldComputer, DEPTH, ESCAPE2};
use field::{EscapeField, PixelField};
use palette::ColorMapper;
use partition::{ParallelFor, Sequential, WorkPartitioner};
use planes::PlaneMapper;

/// Default number of pixels along each side of the grid.
pub const SIZE: usize = 1000;

/// The knobs a render can be tuned with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Pixels per side of the square grid.
    pub size: usize,
    /// Maximum iterations per point.
    pub depth: usize,
    /// Squared escape radius.
    pub escape2: f64,
    /// Number of chunks the work is split into.
    pub workers: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            size: SIZE,
            depth: DEPTH,
            escape2: ESCAPE2,
            workers: num_cpus::get().max(1),
        }
    }
}

impl RenderConfig {
    /// Checks that the configuration describes a renderable image.
    /// Each setting is checked by the stage that consumes it, so this
    /// only builds those stages and throws them away.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Renderer::new(*self).map(|_| ())
    }
}

/// Holds everything a render needs once the configuration has been
/// checked.  Once built, this object is not mutable, and a single
/// renderer can be shared between threads to run independent renders.
#[derive(Debug, Clone)]
pub struct Renderer {
    computer: EscapeFieldComputer,
    mapper: ColorMapper<'static>,
    partitioner: WorkPartitioner,
}

impl Renderer {
    /// Validates the configuration and builds the standard view of the
    /// set at the configured size.
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        let plane = PlaneMapper::standard(config.size)?;
        Ok(Renderer {
            computer: EscapeFieldComputer::new(plane, config.depth, config.escape2)?,
            mapper: ColorMapper::default(),
            partitioner: WorkPartitioner::new(config.workers)?,
        })
    }

    /// The escape-time stage.
    pub fn computer(&self) -> &EscapeFieldComputer {
        &self.computer
    }

    /// The color mapping stage.
    pub fn mapper(&self) -> &ColorMapper<'static> {
        &self.mapper
    }

    /// Pixels per side.
    pub fn size(&self) -> usize {
        self.computer.plane().size
    }

    /// Total pixels in the grid.
    pub fn len(&self) -> usize {
        self.computer.plane().len()
    }

    /// Never true for a renderer built through `new`.
    pub fn is_empty(&self) -> bool {
        self.computer.plane().is_empty()
    }

    /// Renders into caller-owned buffers, each of which must hold
    /// exactly size * size cells.  Neither buffer is reallocated.
    pub fn render_into<P: ParallelFor>(
        &self,
        partitioner: &P,
        field: &mut [f64],
        pixels: &mut [u32],
    ) -> Result<(), RenderError> {
        for actual in &[field.len(), pixels.len()] {
            if *actual != self.len() {
                return Err(RenderError::BufferSize {
                    expected: self.len(),
                    actual: *actual,
                });
            }
        }

        self.computer.compute_into(partitioner, field)?;
        self.mapper.map_into(partitioner, field, pixels)?;
        Ok(())
    }

    /// Renders with an arbitrary parallel-for back-end, returning both
    /// the field and the pixels derived from it.
    pub fn render_with<P: ParallelFor>(
        &self,
        partitioner: &P,
    ) -> Result<(EscapeField, PixelField), RenderError> {
        let field = self.computer.compute_field(partitioner)?;
        let pixels = self.mapper.map(partitioner, &field)?;
        Ok((field, pixels))
    }

    /// The single-threaded render.
    pub fn render_single(&self) -> Result<PixelField, RenderError> {
        self.render_with(&Sequential).map(|(_, pixels)| pixels)
    }

    /// The multi-threaded render, split across the configured number of
    /// workers.
    pub fn render(&self) -> Result<PixelField, RenderError> {
        debug!(
            "rendering {0}x{0} across {1} workers",
            self.size(),
            self.partitioner.workers()
        );
        self.render_with(&self.partitioner).map(|(_, pixels)| pixels)
    }
}

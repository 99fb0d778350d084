// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time half of the renderer.  Every pixel is mapped to a
//! point c on the complex plane, and z -> z^2 + c is iterated from zero
//! until |z|^2 passes the escape threshold or the depth runs out.  The
//! raw iteration count is then smoothed with a log-log correction so
//! neighbouring pixels that escape on different iterations still land
//! on a continuous scale, which is what keeps the gradient free of
//! bands.

use num::Complex;

use error::{ConfigError, RenderError};
use field::EscapeField;
use partition::ParallelFor;
use planes::PlaneMapper;

/// Default maximum number of iterations per point.
pub const DEPTH: usize = 200;

/// Default escape threshold, as the square of the escape radius.
pub const ESCAPE2: f64 = 400.0;

/// How a single point left (or failed to leave) the iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// Number of times z was updated.  Equal to the depth when the
    /// point never escaped.
    pub iterations: usize,
    /// The last |z|^2 that was tested against the threshold.
    pub norm_sqr: f64,
}

/// Computes smoothed escape values for the pixels of a plane.
#[derive(Debug, Clone)]
pub struct EscapeFieldComputer {
    plane: PlaneMapper,
    depth: usize,
    escape2: f64,
}

impl EscapeFieldComputer {
    /// Takes the plane to sample, the iteration cap and the squared
    /// escape radius.
    pub fn new(plane: PlaneMapper, depth: usize, escape2: f64) -> Result<Self, ConfigError> {
        if !escape2.is_finite() || escape2 <= 0.0 {
            return Err(ConfigError::BadEscapeRadius(escape2));
        }
        Ok(EscapeFieldComputer {
            plane,
            depth,
            escape2,
        })
    }

    /// The plane this computer samples.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Iterates a single point.  |z|^2 is tested before each update,
    /// so a point that starts outside the threshold reports one
    /// iteration, not zero.
    pub fn escape(&self, c: Complex<f64>) -> Escape {
        let mut z: Complex<f64> = Complex::new(0.0, 0.0);
        let mut iterations = 0;
        let mut norm_sqr = 0.0;
        while iterations < self.depth {
            norm_sqr = z.norm_sqr();
            if norm_sqr >= self.escape2 {
                break;
            }
            z = z * z + c;
            iterations += 1;
        }
        Escape {
            iterations,
            norm_sqr,
        }
    }

    /// Turns an escape into a continuous value.  Points that hit the
    /// depth cap have a |z|^2 below the threshold; clamping up to the
    /// threshold keeps log(log(x)) defined for them.
    pub fn smooth(&self, escape: &Escape) -> f64 {
        let v = escape.norm_sqr.max(self.escape2);
        (escape.iterations as f64 + 1.0 - (v.ln() / 2.0).ln() / 2.0_f64.ln()).ln()
    }

    /// The smoothed escape value of the pixel at `offset`.
    #[inline]
    pub fn compute(&self, offset: usize) -> f64 {
        self.smooth(&self.escape(self.plane.offset_to_point(offset)))
    }

    /// Fills `values` with the smoothed escape value of every pixel.
    pub fn compute_into<P: ParallelFor>(
        &self,
        partitioner: &P,
        values: &mut [f64],
    ) -> Result<(), RenderError> {
        if values.len() != self.plane.len() {
            return Err(RenderError::BufferSize {
                expected: self.plane.len(),
                actual: values.len(),
            });
        }
        partitioner.fill(values, |offset| self.compute(offset))
    }

    /// Allocates and computes a whole field.
    pub fn compute_field<P: ParallelFor>(
        &self,
        partitioner: &P,
    ) -> Result<EscapeField, RenderError> {
        let mut values = vec![0.0; self.plane.len()];
        self.compute_into(partitioner, &mut values)?;
        EscapeField::new(self.plane.size, values)
    }
}

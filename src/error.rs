// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Failures the renderer can report.  Configuration is checked before
//! any work starts; once a render is under way the only thing that can
//! go wrong is a worker thread dying.

/// A render was asked for with parameters that cannot describe an image.
#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    /// The grid must have at least one pixel per side.
    #[fail(display = "grid size must be at least 1")]
    EmptyGrid,

    /// N * N does not fit in memory addressing.
    #[fail(display = "grid size {} is too large to address", _0)]
    GridTooLarge(usize),

    /// At least one worker is needed to run anything.
    #[fail(display = "worker count must be at least 1")]
    NoWorkers,

    /// The squared escape radius must be a positive, finite number.
    #[fail(display = "escape radius squared must be positive and finite, got {}", _0)]
    BadEscapeRadius(f64),

    /// The corners of the complex plane are inverted.
    #[fail(display = "{}", _0)]
    BadPlane(String),

    /// A color stop has a channel outside [0, 1], or one that is not a
    /// number at all.
    #[fail(display = "color stop {} has a channel outside [0, 1]", _0)]
    BadColorStop(usize),

    /// A gradient needs two stops to interpolate between.
    #[fail(display = "a gradient needs at least 2 color stops, got {}", _0)]
    TooFewStops(usize),
}

/// Something went wrong while a render was running.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The render was configured badly.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(#[cause] ConfigError),

    /// A caller-supplied buffer does not hold exactly N * N cells.
    #[fail(display = "buffer holds {} cells, expected {}", actual, expected)]
    BufferSize {
        /// N * N
        expected: usize,
        /// What was handed in.
        actual: usize,
    },

    /// One of the partition workers panicked before the join.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

impl From<ConfigError> for RenderError {
    fn from(err: ConfigError) -> Self {
        RenderError::Config(err)
    }
}

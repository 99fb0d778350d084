// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a field of smoothed escape values into pixels.  The field is
//! first scanned for its smallest and largest values, then every value
//! is rescaled into that range and looked up in a piecewise-linear
//! gradient.  The scan has to finish before any pixel is mapped, so
//! the bounds are handed to the mapping pass as a plain value.

use itertools::{Itertools, MinMaxResult};

use error::{ConfigError, RenderError};
use field::{EscapeField, PixelField};
use partition::ParallelFor;

/// Opaque black.  Used for values that land on (or past) the last
/// stop, and for values that cannot be placed at all.
pub const BLACK: u32 = 0xff00_0000;

/// An r, g, b anchor in a gradient, each channel in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorStop(pub f64, pub f64, pub f64);

/// Dark blue through cyan, yellow and red to dark red, then back down
/// the same way, ending in black.
pub const COLOR_STOPS: [ColorStop; 19] = [
    ColorStop(0.0, 0.0, 0.5),
    ColorStop(0.0, 0.0, 1.0),
    ColorStop(0.0, 0.5, 1.0),
    ColorStop(0.0, 1.0, 1.0),
    ColorStop(0.5, 1.0, 0.5),
    ColorStop(1.0, 1.0, 0.0),
    ColorStop(1.0, 0.5, 0.0),
    ColorStop(1.0, 0.0, 0.0),
    ColorStop(0.5, 0.0, 0.0),
    ColorStop(0.5, 0.0, 0.0),
    ColorStop(1.0, 0.0, 0.0),
    ColorStop(1.0, 0.5, 0.0),
    ColorStop(1.0, 1.0, 0.0),
    ColorStop(0.5, 1.0, 0.5),
    ColorStop(0.0, 1.0, 1.0),
    ColorStop(0.0, 0.5, 1.0),
    ColorStop(0.0, 0.0, 1.0),
    ColorStop(0.0, 0.0, 0.5),
    ColorStop(0.0, 0.0, 0.0),
];

/// The smallest and largest values found in a field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    /// Maps to the first stop.
    pub min: f64,
    /// Maps to black.
    pub max: f64,
}

impl Bounds {
    /// Scans the values for their extremes, skipping NaN.  None if
    /// there is nothing but NaN.
    pub fn scan(values: &[f64]) -> Option<Bounds> {
        match values.iter().cloned().filter(|v| !v.is_nan()).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some(Bounds { min: v, max: v }),
            MinMaxResult::MinMax(min, max) => Some(Bounds { min, max }),
        }
    }

    /// Every value in the field is the same, so nothing can be placed
    /// along the gradient.
    pub fn is_flat(&self) -> bool {
        self.max <= self.min || self.max.is_nan() || self.min.is_nan()
    }
}

#[inline]
fn interpolate(d: f64, v0: f64, v1: f64) -> u32 {
    ((d * (v1 - v0) + v0) * 255.0) as u32
}

/// Maps escape values to packed pixels through a gradient.
#[derive(Copy, Clone, Debug)]
pub struct ColorMapper<'a> {
    stops: &'a [ColorStop],
}

impl Default for ColorMapper<'static> {
    fn default() -> Self {
        ColorMapper {
            stops: &COLOR_STOPS,
        }
    }
}

impl<'a> ColorMapper<'a> {
    /// A mapper over a custom gradient.  The stops are spaced evenly
    /// across the range of the field.  Every channel must lie in
    /// [0, 1]; anything else would spill into the neighbouring byte of
    /// the packed pixel.
    pub fn new(stops: &'a [ColorStop]) -> Result<Self, ConfigError> {
        if stops.len() < 2 {
            return Err(ConfigError::TooFewStops(stops.len()));
        }
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if let Some(index) = stops
            .iter()
            .position(|s| !(in_range(s.0) && in_range(s.1) && in_range(s.2)))
        {
            return Err(ConfigError::BadColorStop(index));
        }
        Ok(ColorMapper { stops })
    }

    /// The number of interpolated segments between the stops.
    pub fn segments(&self) -> usize {
        self.stops.len() - 1
    }

    /// Maps a single value.  A value equal to `bounds.max` lands
    /// exactly on the last stop boundary and comes out black, as does
    /// anything that rescales to NaN: NaN cells, and every cell of a
    /// flat field.
    pub fn map_value(&self, x: f64, bounds: &Bounds) -> u32 {
        let segments = self.segments();
        let scaled = (x - bounds.min) / (bounds.max - bounds.min) * segments as f64;
        if scaled.is_nan() || scaled >= segments as f64 {
            return BLACK;
        }

        let bin = scaled as usize;
        let d = scaled - bin as f64;
        let (c0, c1) = (&self.stops[bin], &self.stops[bin + 1]);
        let r = interpolate(d, c0.0, c1.0);
        let g = interpolate(d, c0.1, c1.1);
        let b = interpolate(d, c0.2, c1.2);
        b | (g << 8) | (r << 16) | BLACK
    }

    /// Scans `values` for its bounds, then maps every value into
    /// `pixels`.  Returns the bounds used, if there were any.
    pub fn map_into<P: ParallelFor>(
        &self,
        partitioner: &P,
        values: &[f64],
        pixels: &mut [u32],
    ) -> Result<Option<Bounds>, RenderError> {
        if values.len() != pixels.len() {
            return Err(RenderError::BufferSize {
                expected: values.len(),
                actual: pixels.len(),
            });
        }

        let bounds = Bounds::scan(values);
        match bounds {
            Some(bounds) => {
                debug!("normalizing against [{}, {}]", bounds.min, bounds.max);
                partitioner.fill(pixels, |i| self.map_value(values[i], &bounds))?;
            }
            None => {
                debug!("field holds no comparable values; rendering black");
                partitioner.fill(pixels, |_| BLACK)?;
            }
        }
        Ok(bounds)
    }

    /// Maps a whole field to a freshly allocated pixel buffer.
    pub fn map<P: ParallelFor>(
        &self,
        partitioner: &P,
        field: &EscapeField,
    ) -> Result<PixelField, RenderError> {
        let mut pixels = vec![0; field.len()];
        self.map_into(partitioner, field.values(), &mut pixels)?;
        PixelField::new(field.size(), pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partition::{Sequential, WorkPartitioner};

    const UNIT: Bounds = Bounds { min: 0.0, max: 1.0 };

    #[test]
    fn default_gradient_has_eighteen_segments() {
        assert_eq!(ColorMapper::default().segments(), 18);
    }

    #[test]
    fn gradient_needs_two_stops() {
        let one = [ColorStop(0.0, 0.0, 0.0)];
        assert_eq!(
            ColorMapper::new(&one).unwrap_err(),
            ConfigError::TooFewStops(1)
        );
    }

    #[test]
    fn gradient_rejects_channels_outside_the_unit_range() {
        let bright = [ColorStop(0.0, 0.0, 1.0), ColorStop(0.0, 0.0, 2.0)];
        assert_eq!(
            ColorMapper::new(&bright).unwrap_err(),
            ConfigError::BadColorStop(1)
        );
        let negative = [ColorStop(-0.5, 0.0, 0.0), ColorStop(1.0, 1.0, 1.0)];
        assert_eq!(
            ColorMapper::new(&negative).unwrap_err(),
            ConfigError::BadColorStop(0)
        );
        let nan = [ColorStop(0.0, 0.0, 0.0), ColorStop(0.0, ::std::f64::NAN, 0.0)];
        assert_eq!(
            ColorMapper::new(&nan).unwrap_err(),
            ConfigError::BadColorStop(1)
        );
    }

    #[test]
    fn default_gradient_passes_its_own_checks() {
        assert!(ColorMapper::new(&COLOR_STOPS).is_ok());
    }

    #[test]
    fn flatness_accounts_for_nan_bounds() {
        assert!(!UNIT.is_flat());
        assert!(Bounds { min: 2.0, max: 2.0 }.is_flat());
        let nan = ::std::f64::NAN;
        assert!(Bounds { min: nan, max: 1.0 }.is_flat());
        assert!(Bounds { min: 0.0, max: nan }.is_flat());
    }

    #[test]
    fn minimum_maps_to_the_first_stop() {
        assert_eq!(ColorMapper::default().map_value(0.0, &UNIT), 0xff00_007f);
    }

    #[test]
    fn maximum_maps_to_black() {
        assert_eq!(ColorMapper::default().map_value(1.0, &UNIT), BLACK);
    }

    #[test]
    fn midpoint_lands_on_stop_nine() {
        // bin 9 with no fractional part: ColorStop(0.5, 0.0, 0.0)
        assert_eq!(ColorMapper::default().map_value(0.5, &UNIT), 0xff7f_0000);
    }

    #[test]
    fn interpolates_within_a_segment() {
        let bounds = Bounds { min: 0.0, max: 18.0 };
        // Halfway from (0, 0, 0.5) to (0, 0, 1): 191.25 truncates to 191.
        assert_eq!(ColorMapper::default().map_value(0.5, &bounds), 0xff00_00bf);
    }

    #[test]
    fn custom_gradient_interpolates_every_channel() {
        let greys = [ColorStop(0.0, 0.0, 0.0), ColorStop(1.0, 1.0, 1.0)];
        let mapper = ColorMapper::new(&greys).unwrap();
        assert_eq!(mapper.map_value(0.5, &UNIT), 0xff7f_7f7f);
    }

    #[test]
    fn nan_maps_to_black() {
        let nan = ::std::f64::NAN;
        assert_eq!(ColorMapper::default().map_value(nan, &UNIT), BLACK);
    }

    #[test]
    fn bounds_skip_nan() {
        let nan = ::std::f64::NAN;
        assert_eq!(
            Bounds::scan(&[nan, 3.0, -1.0, nan, 2.0]),
            Some(Bounds {
                min: -1.0,
                max: 3.0
            })
        );
        assert_eq!(Bounds::scan(&[nan, nan]), None);
    }

    #[test]
    fn flat_field_renders_black() {
        let field = EscapeField::new(2, vec![4.0; 4]).unwrap();
        let pixels = ColorMapper::default().map(&Sequential, &field).unwrap();
        assert!(pixels.pixels().iter().all(|p| *p == BLACK));
        assert!(Bounds::scan(field.values()).unwrap().is_flat());
    }

    #[test]
    fn all_nan_field_renders_black() {
        let field = EscapeField::new(1, vec![::std::f64::NAN]).unwrap();
        let pixels = ColorMapper::default().map(&Sequential, &field).unwrap();
        assert_eq!(pixels.pixels(), &[BLACK]);
    }

    #[test]
    fn every_pixel_is_opaque() {
        let values: Vec<f64> = (0..100).map(|i| (i as f64).sqrt()).collect();
        let field = EscapeField::new(10, values).unwrap();
        let pixels = ColorMapper::default().map(&Sequential, &field).unwrap();
        assert!(pixels.pixels().iter().all(|p| p >> 24 == 0xff));
    }

    #[test]
    fn partitioned_mapping_matches_sequential() {
        let values: Vec<f64> = (0..400).map(|i| ((i * 37) % 101) as f64).collect();
        let field = EscapeField::new(20, values).unwrap();
        let mapper = ColorMapper::default();
        let expected = mapper.map(&Sequential, &field).unwrap();
        let partitioner = WorkPartitioner::new(4).unwrap();
        assert_eq!(mapper.map(&partitioner, &field).unwrap(), expected);
    }

    #[test]
    fn map_into_checks_the_buffer() {
        let mut pixels = vec![0u32; 3];
        let result = ColorMapper::default().map_into(&Sequential, &[1.0, 2.0], &mut pixels);
        assert!(result.is_err());
    }
}

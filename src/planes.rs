// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a square grid of pixels stored row-major in a flat buffer,
//! and a rectangle on the complex plane defined by its leftlower and
//! rightupper corners.
use num::Complex;

use error::ConfigError;

/// The default left-lower corner of the rendered region.
pub const LEFTLOWER: Complex<f64> = Complex { re: -2.0, im: -1.5 };

/// The default right-upper corner of the rendered region.  Together
/// with LEFTLOWER this is a three-unit square, which matches a square
/// grid.
pub const RIGHTUPPER: Complex<f64> = Complex { re: 1.0, im: 1.5 };

/// Describes the x, y of a pixel in the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Maps indices of a square, row-major pixel grid onto a region of
/// the complex plane.  Index zero is the leftlower corner; the
/// rightupper corner itself is never reached, as the last pixel is one
/// step short of it.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The number of pixels along each side of the grid.
    pub size: usize,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // Width and height of the complex region.
    extent: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the side of the grid and two points
    /// describing the complex plane.
    pub fn new(
        size: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<PlaneMapper, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }

        if size.checked_mul(size).is_none() {
            return Err(ConfigError::GridTooLarge(size));
        }

        if rightupper.re < leftlower.re {
            return Err(ConfigError::BadPlane(
                "The left lower corner is not to the left of the right upper corner.".to_string(),
            ));
        }

        if rightupper.im < leftlower.im {
            return Err(ConfigError::BadPlane(
                "The left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        Ok(PlaneMapper {
            size,
            complex_plane: ComplexPlane(leftlower, rightupper),
            extent: (rightupper.re - leftlower.re, rightupper.im - leftlower.im),
        })
    }

    /// The standard view of the whole set: re in [-2, 1], im in
    /// [-1.5, 1.5].
    pub fn standard(size: usize) -> Result<PlaneMapper, ConfigError> {
        PlaneMapper::new(size, LEFTLOWER, RIGHTUPPER)
    }

    /// The total number of pixels in the grid.
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    /// Describes that the grid is of a size.  Never true for a mapper
    /// built through `new`.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Splits a linear offset into the buffer into its column and row.
    pub fn offset_to_pixel(&self, offset: usize) -> Pixel {
        Pixel(offset % self.size, offset / self.size)
    }

    /// Given a pixel on the grid, return the complex number at the
    /// equivalent location on the complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let size = self.size as f64;
        Complex::new(
            self.extent.0 * (pixel.0 as f64 / size) + self.complex_plane.0.re,
            self.extent.1 * (pixel.1 as f64 / size) + self.complex_plane.0.im,
        )
    }

    /// Maps a linear offset into the buffer straight to the complex
    /// plane.
    #[inline]
    pub fn offset_to_point(&self, offset: usize) -> Complex<f64> {
        self.pixel_to_point(&self.offset_to_pixel(offset))
    }

    /// The linear offset of the pixel whose point lies closest to
    /// `point`.  None if the point falls outside the grid.
    pub fn nearest_offset(&self, point: &Complex<f64>) -> Option<usize> {
        let size = self.size as f64;
        let left = ((point.re - self.complex_plane.0.re) / self.extent.0 * size).round();
        let top = ((point.im - self.complex_plane.0.im) / self.extent.1 * size).round();
        if left < 0.0 || left >= size || top < 0.0 || top >= size {
            return None;
        }
        Some((top as usize) * self.size + (left as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let pm = PlaneMapper::new(4, Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_fails_on_empty_grid() {
        let pm = PlaneMapper::standard(0);
        assert_eq!(pm.unwrap_err(), ConfigError::EmptyGrid);
    }

    #[test]
    fn planemapper_fails_on_unaddressable_grid() {
        let pm = PlaneMapper::standard(usize::max_value());
        assert_eq!(
            pm.unwrap_err(),
            ConfigError::GridTooLarge(usize::max_value())
        );
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
        assert!(pm.is_ok());
    }

    #[test]
    fn offsets_split_row_major() {
        let pm = PlaneMapper::standard(4).unwrap();
        assert_eq!(pm.len(), 16);
        assert_eq!(pm.offset_to_pixel(0), Pixel(0, 0));
        assert_eq!(pm.offset_to_pixel(3), Pixel(3, 0));
        assert_eq!(pm.offset_to_pixel(4), Pixel(0, 1));
        assert_eq!(pm.offset_to_pixel(15), Pixel(3, 3));
    }

    #[test]
    fn pixel_to_point_on_standard_plane() {
        let pm = PlaneMapper::standard(4).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -1.5));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(-0.5, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 3)), Complex::new(0.25, 0.75));
    }

    #[test]
    fn offset_to_point_matches_pixel_to_point() {
        let pm = PlaneMapper::standard(10).unwrap();
        for offset in 0..pm.len() {
            assert_eq!(
                pm.offset_to_point(offset),
                pm.pixel_to_point(&pm.offset_to_pixel(offset))
            );
        }
    }

    #[test]
    fn nearest_offset_finds_the_origin() {
        let pm = PlaneMapper::standard(6).unwrap();
        let offset = pm.nearest_offset(&Complex::new(0.0, 0.0)).unwrap();
        assert_eq!(pm.offset_to_pixel(offset), Pixel(4, 3));
        assert_eq!(pm.offset_to_point(offset), Complex::new(0.0, 0.0));
    }

    #[test]
    fn nearest_offset_rejects_points_off_the_grid() {
        let pm = PlaneMapper::standard(6).unwrap();
        assert_eq!(pm.nearest_offset(&Complex::new(-3.0, 0.0)), None);
        assert_eq!(pm.nearest_offset(&Complex::new(0.0, 1.5)), None);
    }
}

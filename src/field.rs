// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two buffers a render produces: the raw smoothed escape values,
//! and the packed pixels derived from them.  Both are square and
//! stored row-major.

use error::RenderError;
use planes::Pixel;

fn check_len(size: usize, actual: usize) -> Result<(), RenderError> {
    let expected = size.checked_mul(size).unwrap_or(usize::max_value());
    if actual != expected {
        return Err(RenderError::BufferSize { expected, actual });
    }
    Ok(())
}

/// The smoothed escape value of every pixel on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EscapeField {
    size: usize,
    values: Vec<f64>,
}

impl EscapeField {
    /// Wraps a buffer of `size * size` values.
    pub fn new(size: usize, values: Vec<f64>) -> Result<Self, RenderError> {
        check_len(size, values.len())?;
        Ok(EscapeField { size, values })
    }

    /// Pixels per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The total number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True only for a zero-sized grid.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Packed 0xAARRGGBB pixels, one per grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelField {
    size: usize,
    pixels: Vec<u32>,
}

impl PixelField {
    /// Wraps a buffer of `size * size` pixels.
    pub fn new(size: usize, pixels: Vec<u32>) -> Result<Self, RenderError> {
        check_len(size, pixels.len())?;
        Ok(PixelField { size, pixels })
    }

    /// Pixels per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes per row when the buffer is viewed as raw 32-bit pixels.
    pub fn stride(&self) -> usize {
        self.size * 4
    }

    /// The pixels, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Releases the underlying buffer.
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// The total number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True only for a zero-sized grid.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The pixel at a column and row, if it is on the grid.
    pub fn get(&self, pixel: &Pixel) -> Option<u32> {
        if pixel.0 >= self.size || pixel.1 >= self.size {
            return None;
        }
        Some(self.pixels[pixel.1 * self.size + pixel.0])
    }

    /// Drops the alpha channel, producing three bytes per pixel in
    /// r, g, b order, ready for an RGB image encoder.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for argb in &self.pixels {
            rgb.push(((argb & 0x00ff_0000) >> 16) as u8);
            rgb.push(((argb & 0x0000_ff00) >> 8) as u8);
            rgb.push((argb & 0x0000_00ff) as u8);
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_lookup_is_row_major() {
        let field = PixelField::new(2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(field.get(&Pixel(1, 0)), Some(2));
        assert_eq!(field.get(&Pixel(0, 1)), Some(3));
        assert_eq!(field.get(&Pixel(2, 0)), None);
        assert_eq!(field.stride(), 8);
    }

    #[test]
    fn rgb_drops_alpha() {
        let field = PixelField::new(1, vec![0xff12_3456]).unwrap();
        assert_eq!(field.to_rgb(), vec![0x12, 0x34, 0x56]);
    }

    #[test]
    fn fields_reject_buffers_that_do_not_fill_the_grid() {
        match EscapeField::new(2, vec![1.0]) {
            Err(RenderError::BufferSize { expected, actual }) => {
                assert_eq!((expected, actual), (4, 1));
            }
            _ => panic!("short escape buffer was accepted"),
        }
        match PixelField::new(2, vec![0xff00_0000; 5]) {
            Err(RenderError::BufferSize { expected, actual }) => {
                assert_eq!((expected, actual), (4, 5));
            }
            _ => panic!("long pixel buffer was accepted"),
        }
    }
}

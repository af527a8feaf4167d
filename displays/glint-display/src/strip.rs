//! Byte-buffer draw target
//!
//! Lets `embedded-graphics` primitives render into a packed RGB565
//! big-endian buffer that can be blitted as-is.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::Pixel;

/// Convert a face color to the `embedded-graphics` type
pub fn eg_color(color: glint_core::Rgb888) -> Rgb565 {
    Rgb565::from(RawU16::new(color.to_rgb565().0))
}

/// A `width` x `height` view over a pixel buffer, rows packed back to back
pub struct PixelStrip<'a> {
    buffer: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelStrip<'a> {
    /// Wrap the first `width * height * 2` bytes of `buffer`
    ///
    /// The height is reduced if the buffer is too short.
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32) -> Self {
        let rows = if width == 0 {
            0
        } else {
            (buffer.len() as u32 / (width * 2)).min(height)
        };
        Self {
            buffer,
            width,
            height: rows,
        }
    }

    /// Set every pixel in the view to black
    pub fn clear_black(&mut self) {
        let len = (self.width * self.height * 2) as usize;
        self.buffer[..len].fill(0);
    }
}

impl OriginDimensions for PixelStrip<'_> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelStrip<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x >= self.width || y >= self.height {
                continue;
            }
            let i = ((y * self.width + x) * 2) as usize;
            let [hi, lo] = color.into_storage().to_be_bytes();
            self.buffer[i] = hi;
            self.buffer[i + 1] = lo;
        }
        Ok(())
    }
}

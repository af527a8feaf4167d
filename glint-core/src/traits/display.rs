//! Display capability consumed by the eye engine
//!
//! The engine never reads back from the panel. It draws with three
//! primitives: solid rectangle fills, window-then-stream blits of packed
//! RGB565 bytes, and backlight control.

use crate::color::Rgb888;

/// Trait for a color panel the face is drawn on
///
/// Coordinates are device pixels with the origin at the top-left corner.
/// Colors are 24-bit; implementations down-convert to their native format.
pub trait FaceDisplay {
    /// Transport error (SPI, pin or PWM failure)
    type Error;

    /// Panel width in pixels
    fn width(&self) -> u16;

    /// Panel height in pixels
    fn height(&self) -> u16;

    /// Fill the whole screen with one color
    fn fill(&mut self, color: Rgb888) -> Result<(), Self::Error>;

    /// Fill a rectangle that lies entirely on screen
    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb888)
        -> Result<(), Self::Error>;

    /// Declare the inclusive addressing window for `write_pixels`
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error>;

    /// Stream row-major RGB565 big-endian bytes into the current window
    fn write_pixels(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Switch the backlight fully on or off
    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Dim the backlight, `percent` is clamped to 0-100
    fn set_brightness(&mut self, percent: u8) -> Result<(), Self::Error>;
}

impl<T: FaceDisplay + ?Sized> FaceDisplay for &mut T {
    type Error = T::Error;

    fn width(&self) -> u16 {
        (**self).width()
    }

    fn height(&self) -> u16 {
        (**self).height()
    }

    fn fill(&mut self, color: Rgb888) -> Result<(), Self::Error> {
        (**self).fill(color)
    }

    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: Rgb888,
    ) -> Result<(), Self::Error> {
        (**self).fill_rect(x, y, w, h, color)
    }

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error> {
        (**self).set_window(x0, y0, x1, y1)
    }

    fn write_pixels(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_pixels(data)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        (**self).set_backlight(on)
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), Self::Error> {
        (**self).set_brightness(percent)
    }
}

/// Helper trait for drawing with signed, possibly off-screen coordinates
pub trait FaceDisplayExt: FaceDisplay {
    /// Fill a rectangle, clipped to the screen. Nothing is sent when the
    /// clipped area is empty.
    fn fill_rect_clipped(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgb888,
    ) -> Result<(), Self::Error> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width() as i32);
        let y1 = y.saturating_add(h).min(self.height() as i32);

        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }

        self.fill_rect(
            x0 as u16,
            y0 as u16,
            (x1 - x0) as u16,
            (y1 - y0) as u16,
            color,
        )
    }

    /// Blit a `w` x `h` block of packed pixels at (x, y)
    fn blit(&mut self, x: u16, y: u16, w: u16, h: u16, data: &[u8]) -> Result<(), Self::Error> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_window(x, y, x + w - 1, y + h - 1)?;
        self.write_pixels(data)
    }
}

// Blanket implementation for all FaceDisplay types
impl<T: FaceDisplay + ?Sized> FaceDisplayExt for T {}

//! Framebuffer-backed display for host tests

use super::FaceDisplay;
use crate::color::{Rgb565, Rgb888};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Records every primitive and keeps a full RGB565 framebuffer
pub struct MockDisplay {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<Rgb565>,
    pub fills: usize,
    pub rects: Vec<(u16, u16, u16, u16, Rgb888)>,
    pub windows: Vec<(u16, u16, u16, u16)>,
    pub pixel_bytes: usize,
    pub backlight: Option<bool>,
    pub brightness: Option<u8>,
    /// When set, every write fails without touching the framebuffer
    pub fail_writes: bool,
    window: (u16, u16, u16, u16),
}

impl MockDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width as usize * height as usize],
            fills: 0,
            rects: Vec::new(),
            windows: Vec::new(),
            pixel_bytes: 0,
            backlight: None,
            brightness: None,
            fail_writes: false,
            window: (0, 0, 0, 0),
        }
    }

    pub fn pixel(&self, x: u16, y: u16) -> Rgb565 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Number of `write_pixels` calls
    pub fn blits(&self) -> usize {
        self.windows.len()
    }

    pub fn clear_log(&mut self) {
        self.fills = 0;
        self.rects.clear();
        self.windows.clear();
        self.pixel_bytes = 0;
    }

    fn check(&self) -> Result<(), MockError> {
        if self.fail_writes {
            Err(MockError)
        } else {
            Ok(())
        }
    }
}

impl FaceDisplay for MockDisplay {
    type Error = MockError;

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn fill(&mut self, color: Rgb888) -> Result<(), MockError> {
        self.check()?;
        self.fills += 1;
        let packed = color.to_rgb565();
        self.pixels.iter_mut().for_each(|p| *p = packed);
        Ok(())
    }

    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb888) -> Result<(), MockError> {
        self.check()?;
        assert!(x + w <= self.width && y + h <= self.height, "rect off screen");
        self.rects.push((x, y, w, h, color));
        let packed = color.to_rgb565();
        for row in y..y + h {
            for col in x..x + w {
                self.pixels[row as usize * self.width as usize + col as usize] = packed;
            }
        }
        Ok(())
    }

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), MockError> {
        self.check()?;
        assert!(x0 <= x1 && y0 <= y1 && x1 < self.width && y1 < self.height);
        self.window = (x0, y0, x1, y1);
        Ok(())
    }

    fn write_pixels(&mut self, data: &[u8]) -> Result<(), MockError> {
        self.check()?;
        let (x0, y0, x1, y1) = self.window;
        let w = (x1 - x0 + 1) as usize;
        let h = (y1 - y0 + 1) as usize;
        assert_eq!(data.len(), w * h * 2, "blit size does not match window");
        for (i, px) in data.chunks_exact(2).enumerate() {
            let x = x0 as usize + i % w;
            let y = y0 as usize + i / w;
            self.pixels[y * self.width as usize + x] = Rgb565::from_be_bytes([px[0], px[1]]);
        }
        self.windows.push(self.window);
        self.pixel_bytes += data.len();
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), MockError> {
        self.check()?;
        self.backlight = Some(on);
        Ok(())
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), MockError> {
        self.check()?;
        self.brightness = Some(percent.min(100));
        Ok(())
    }
}

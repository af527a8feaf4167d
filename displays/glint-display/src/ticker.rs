//! Scrolling status ticker
//!
//! One line of text in a band below the eyes. The whole text is rendered
//! once per `set_text` into a strip buffer; each frame copies the visible
//! slice of the strip into a display-width window buffer and blits it.
//!
//! Text wider than the screen scrolls after an initial pause and wraps
//! back in from the right. Shorter text is centered and static.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::geometry::Point;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use glint_core::timing::{has_elapsed, Millis};
use glint_core::traits::{FaceDisplay, FaceDisplayExt};
use glint_core::Rgb888;
use heapless::String;

use crate::strip::{eg_color, PixelStrip};

/// Glyph size of the ticker font
pub const CHAR_WIDTH: u16 = 10;
pub const CHAR_HEIGHT: u16 = 20;

/// Band height, one blank row above and below the glyphs
pub const ROW_HEIGHT: u16 = CHAR_HEIGHT + 2;

/// Longest text shown; anything after is cut
pub const MAX_CHARS: usize = 41;

/// Storage for the text, enough for any line the protocol accepts
pub const MAX_TEXT_BYTES: usize = 128;

/// Ticker band width, the panel width
pub const WINDOW_WIDTH: u16 = 240;

/// Default band position
pub const DEFAULT_Y: u16 = 205;

/// Hold before scrolling starts
pub const SCROLL_PAUSE_MS: u32 = 2000;
/// Scroll step period and distance
pub const SCROLL_STEP_MS: u32 = 30;
pub const SCROLL_STEP_PX: i32 = 3;
/// Blank run after the text before it wraps
pub const SCROLL_TAIL_PX: i32 = 40;

const STRIP_WIDTH: usize = MAX_CHARS * CHAR_WIDTH as usize;
const STRIP_LEN: usize = STRIP_WIDTH * ROW_HEIGHT as usize * 2;
const WINDOW_LEN: usize = WINDOW_WIDTH as usize * ROW_HEIGHT as usize * 2;

/// Scroll phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Phase {
    /// New content, draw on the next update and restart the pause
    Restart,
    /// Waiting out the initial pause
    Paused,
    /// Stepping
    Scrolling,
    /// Nothing to animate
    Static,
}

/// Status text strip
pub struct StatusTicker {
    strip: [u8; STRIP_LEN],
    window: [u8; WINDOW_LEN],
    text: String<MAX_TEXT_BYTES>,
    /// Rendered width of `text` in pixels, also the strip stride
    text_width: u16,
    color: Rgb888,
    y: u16,
    scroll_x: i32,
    phase: Phase,
    last_step: Millis,
    /// Window must be recomposed and blitted on the next update
    redraw: bool,
}

impl StatusTicker {
    /// Empty ticker with its band at `y`
    pub fn new(y: u16, color: Rgb888) -> Self {
        Self {
            strip: [0; STRIP_LEN],
            window: [0; WINDOW_LEN],
            text: String::new(),
            text_width: 0,
            color,
            y,
            scroll_x: 0,
            phase: Phase::Restart,
            last_step: 0,
            redraw: true,
        }
    }

    /// Replace the text
    ///
    /// Leading and trailing whitespace is dropped and the text is cut to
    /// `MAX_CHARS`. Empty text blanks the band. Shown on the next update.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        for c in text.trim().chars().take(MAX_CHARS) {
            if self.text.push(c).is_err() {
                break;
            }
        }
        self.text_width = self.text.chars().count() as u16 * CHAR_WIDTH;
        self.render_strip();
        self.scroll_x = 0;
        self.phase = Phase::Restart;
        self.redraw = true;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    /// Change the text color, re-rendering the current text
    pub fn set_color(&mut self, color: Rgb888) {
        if color == self.color {
            return;
        }
        self.color = color;
        if !self.text.is_empty() {
            self.render_strip();
            self.redraw = true;
        }
    }

    /// Advance scrolling and blit the band if it changed
    pub fn update<D: FaceDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        now: Millis,
    ) -> Result<(), D::Error> {
        match self.phase {
            Phase::Restart => {
                self.phase = if self.scrolls() {
                    Phase::Paused
                } else {
                    Phase::Static
                };
                self.last_step = now;
                self.redraw = true;
            }
            Phase::Paused => {
                if has_elapsed(now, self.last_step, SCROLL_PAUSE_MS) {
                    self.phase = Phase::Scrolling;
                    self.last_step = now;
                }
            }
            Phase::Scrolling => {
                if has_elapsed(now, self.last_step, SCROLL_STEP_MS) {
                    self.scroll_x += SCROLL_STEP_PX;
                    if self.scroll_x > self.text_width as i32 + SCROLL_TAIL_PX {
                        self.scroll_x = -(WINDOW_WIDTH as i32);
                    }
                    self.last_step = now;
                    self.redraw = true;
                }
            }
            Phase::Static => {}
        }

        if !self.redraw {
            return Ok(());
        }
        self.redraw = false;
        self.compose_window();
        display.blit(0, self.y, WINDOW_WIDTH, ROW_HEIGHT, &self.window)
    }

    fn scrolls(&self) -> bool {
        self.text_width > WINDOW_WIDTH
    }

    /// Draw the text into the strip, one pixel below its top edge
    fn render_strip(&mut self) {
        let mut strip = PixelStrip::new(&mut self.strip, self.text_width as u32, ROW_HEIGHT as u32);
        strip.clear_black();
        if self.text.is_empty() {
            return;
        }
        let style = MonoTextStyle::new(&FONT_10X20, eg_color(self.color));
        let _ = Text::with_baseline(&self.text, Point::new(0, 1), style, Baseline::Top)
            .draw(&mut strip);
    }

    /// Copy the visible part of the strip into the window buffer
    fn compose_window(&mut self) {
        self.window.fill(0);

        let text_w = self.text_width as i32;
        let window_w = WINDOW_WIDTH as i32;
        if text_w == 0 {
            return;
        }

        // Strip column shown at window column 0
        let src_x = if self.scrolls() {
            self.scroll_x
        } else {
            -((window_w - text_w) / 2)
        };

        let start = src_x.max(0);
        let end = (src_x + window_w).min(text_w);
        if start >= end {
            return;
        }

        let dst = ((start - src_x) * 2) as usize;
        let bytes = ((end - start) * 2) as usize;
        let src_stride = text_w as usize * 2;
        let dst_stride = window_w as usize * 2;
        for row in 0..ROW_HEIGHT as usize {
            let si = row * src_stride + start as usize * 2;
            let di = row * dst_stride + dst;
            self.window[di..di + bytes].copy_from_slice(&self.strip[si..si + bytes]);
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Rgb888 {
        self.color
    }

    /// Rendered text width in pixels
    pub fn text_width(&self) -> u16 {
        self.text_width
    }

    pub fn scroll_x(&self) -> i32 {
        self.scroll_x
    }

    pub fn is_scrolling(&self) -> bool {
        self.phase == Phase::Scrolling
    }

    /// Band contents as last composed
    pub fn window(&self) -> &[u8] {
        &self.window
    }
}

impl Default for StatusTicker {
    fn default() -> Self {
        Self::new(DEFAULT_Y, Rgb888::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records blits
    #[derive(Default)]
    struct BlitLog {
        blits: Vec<(u16, u16, u16, u16, usize)>,
        window: (u16, u16, u16, u16),
    }

    impl FaceDisplay for BlitLog {
        type Error = ();

        fn width(&self) -> u16 {
            240
        }

        fn height(&self) -> u16 {
            280
        }

        fn fill(&mut self, _color: Rgb888) -> Result<(), ()> {
            Ok(())
        }

        fn fill_rect(&mut self, _x: u16, _y: u16, _w: u16, _h: u16, _c: Rgb888) -> Result<(), ()> {
            Ok(())
        }

        fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), ()> {
            self.window = (x0, y0, x1, y1);
            Ok(())
        }

        fn write_pixels(&mut self, data: &[u8]) -> Result<(), ()> {
            let (x0, y0, x1, y1) = self.window;
            self.blits.push((x0, y0, x1, y1, data.len()));
            Ok(())
        }

        fn set_backlight(&mut self, _on: bool) -> Result<(), ()> {
            Ok(())
        }

        fn set_brightness(&mut self, _percent: u8) -> Result<(), ()> {
            Ok(())
        }
    }

    /// Window columns that hold any lit pixel
    fn lit_columns(ticker: &StatusTicker) -> Vec<usize> {
        let w = WINDOW_WIDTH as usize;
        (0..w)
            .filter(|&x| {
                (0..ROW_HEIGHT as usize).any(|y| {
                    let i = (y * w + x) * 2;
                    ticker.window()[i] != 0 || ticker.window()[i + 1] != 0
                })
            })
            .collect()
    }

    #[test]
    fn test_band_geometry() {
        let mut ticker = StatusTicker::default();
        let mut display = BlitLog::default();
        ticker.update(&mut display, 0).unwrap();
        assert_eq!(display.blits, [(0, 205, 239, 226, 240 * 22 * 2)]);
    }

    #[test]
    fn test_short_text_is_centered_and_static() {
        let mut ticker = StatusTicker::default();
        let mut display = BlitLog::default();
        ticker.set_text("  hello  ");
        assert_eq!(ticker.text(), "hello");
        assert_eq!(ticker.text_width(), 50);

        ticker.update(&mut display, 0).unwrap();
        let lit = lit_columns(&ticker);
        assert!(!lit.is_empty());
        assert!(*lit.first().unwrap() >= 95);
        assert!(*lit.last().unwrap() < 145);

        for t in (20..10_000).step_by(20) {
            ticker.update(&mut display, t).unwrap();
        }
        assert_eq!(display.blits.len(), 1);
        assert!(!ticker.is_scrolling());
    }

    #[test]
    fn test_glyph_pixels_use_text_color() {
        let mut ticker = StatusTicker::new(DEFAULT_Y, Rgb888(0xFF0000));
        let mut display = BlitLog::default();
        ticker.set_text("W");
        ticker.update(&mut display, 0).unwrap();
        let lit: Vec<&[u8]> = ticker
            .window()
            .chunks_exact(2)
            .filter(|px| px[0] != 0 || px[1] != 0)
            .collect();
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|px| *px == [0xF8, 0x00]));
    }

    #[test]
    fn test_pad_rows_stay_blank() {
        let mut ticker = StatusTicker::default();
        let mut display = BlitLog::default();
        ticker.set_text("|||||||");
        ticker.update(&mut display, 0).unwrap();
        let row_bytes = WINDOW_WIDTH as usize * 2;
        let last = (ROW_HEIGHT as usize - 1) * row_bytes;
        assert!(ticker.window()[..row_bytes].iter().all(|&b| b == 0));
        assert!(ticker.window()[last..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_long_text_pauses_then_scrolls() {
        let mut ticker = StatusTicker::default();
        let mut display = BlitLog::default();
        ticker.set_text("Compiling glint-core with proptest");
        assert!(ticker.text_width() > WINDOW_WIDTH);

        ticker.update(&mut display, 1000).unwrap();
        assert_eq!(display.blits.len(), 1);

        ticker.update(&mut display, 2999).unwrap();
        assert_eq!(ticker.scroll_x(), 0);
        ticker.update(&mut display, 3000).unwrap();
        assert!(ticker.is_scrolling());
        assert_eq!(display.blits.len(), 1);

        ticker.update(&mut display, 3029).unwrap();
        assert_eq!(ticker.scroll_x(), 0);
        ticker.update(&mut display, 3030).unwrap();
        assert_eq!(ticker.scroll_x(), 3);
        assert_eq!(display.blits.len(), 2);
    }

    #[test]
    fn test_scroll_wraps_from_the_right() {
        let mut ticker = StatusTicker::default();
        let mut display = BlitLog::default();
        ticker.set_text("0123456789012345678901234567890");
        let width = ticker.text_width() as i32;

        ticker.update(&mut display, 0).unwrap();
        ticker.update(&mut display, SCROLL_PAUSE_MS).unwrap();
        let mut t = SCROLL_PAUSE_MS;
        let mut wrapped = false;
        for _ in 0..200 {
            t += SCROLL_STEP_MS;
            ticker.update(&mut display, t).unwrap();
            assert!(ticker.scroll_x() <= width + SCROLL_TAIL_PX);
            if ticker.scroll_x() == -(WINDOW_WIDTH as i32) {
                wrapped = true;
                break;
            }
        }
        assert!(wrapped);
        // Fully off to the left of the text: blank band
        assert!(lit_columns(&ticker).is_empty());
    }

    #[test]
    fn test_text_is_cut_to_max_chars() {
        let mut ticker = StatusTicker::default();
        ticker.set_text(&"x".repeat(60));
        assert_eq!(ticker.text().len(), MAX_CHARS);
        assert_eq!(ticker.text_width(), 410);
    }

    #[test]
    fn test_clear_blanks_band() {
        let mut ticker = StatusTicker::default();
        let mut display = BlitLog::default();
        ticker.set_text("busy");
        ticker.update(&mut display, 0).unwrap();
        ticker.clear();
        ticker.update(&mut display, 20).unwrap();
        assert_eq!(display.blits.len(), 2);
        assert!(ticker.window().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_color_rerenders() {
        let mut ticker = StatusTicker::default();
        let mut display = BlitLog::default();
        ticker.set_text("ok");
        ticker.update(&mut display, 0).unwrap();

        ticker.set_color(Rgb888(0x00FF00));
        ticker.update(&mut display, 20).unwrap();
        assert_eq!(display.blits.len(), 2);
        assert!(ticker
            .window()
            .chunks_exact(2)
            .filter(|px| px[0] != 0 || px[1] != 0)
            .all(|px| px == [0x07, 0xE0]));

        // Same color again does nothing
        ticker.set_color(Rgb888(0x00FF00));
        ticker.update(&mut display, 40).unwrap();
        assert_eq!(display.blits.len(), 2);
    }
}

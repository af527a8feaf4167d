//! Face buffer compositor
//!
//! Builds the pixel content of one eye into fixed buffers allocated with
//! the engine. Both eyes share the same content since gaze is symmetric.
//!
//! - `base`: sclera, iris, pupil and highlight for the current gaze, with
//!   the rounded corners stamped in the background color
//! - `composited`: the base with the eyelid rows blacked out, ready to blit
//!
//! The base is rebuilt only when gaze changes. The eyelid overlay is a
//! buffer copy plus whole-row copies from a precomputed lid row.

use super::geometry::{CornerMask, EyeGeometry, EYE_BUFFER_LEN, MAX_EYE_WIDTH};
use super::gaze::GazeOffset;
use crate::color::{Palette, Rgb565};

/// Highlight square size and offset from the pupil's top-left corner
pub const HIGHLIGHT_SIZE: i32 = 5;
pub const HIGHLIGHT_OFFSET: i32 = 4;

/// Work counters, useful to check the dirty logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompositorStats {
    pub base_rebuilds: u32,
    pub overlays: u32,
}

/// Per-eye pixel buffers
pub struct Compositor {
    base: [u8; EYE_BUFFER_LEN],
    composited: [u8; EYE_BUFFER_LEN],
    lid_row: [u8; MAX_EYE_WIDTH as usize * 2],
    width: u16,
    height: u16,
    iris_size: u16,
    pupil_size: u16,
    mask: CornerMask,
    palette: Palette,
    stats: CompositorStats,
}

impl Compositor {
    /// Allocate buffers for `geometry`, which must not exceed the maximum
    /// eye size
    pub fn new(geometry: &EyeGeometry, palette: Palette) -> Self {
        let width = geometry.width.min(MAX_EYE_WIDTH);
        let height = geometry.height.min(super::geometry::MAX_EYE_HEIGHT);

        let mut lid_row = [0u8; MAX_EYE_WIDTH as usize * 2];
        fill_pixels(&mut lid_row, palette.lid);

        Self {
            base: [0; EYE_BUFFER_LEN],
            composited: [0; EYE_BUFFER_LEN],
            lid_row,
            width,
            height,
            iris_size: geometry.iris_size,
            pupil_size: geometry.pupil_size,
            mask: CornerMask::new(width, height, geometry.corner_radius),
            palette,
            stats: CompositorStats::default(),
        }
    }

    fn len(&self) -> usize {
        self.width as usize * self.height as usize * 2
    }

    /// Redraw the base buffer for `gaze`
    pub fn rebuild_base(&mut self, gaze: GazeOffset) {
        let len = self.len();
        let palette = self.palette;
        fill_pixels(&mut self.base[..len], palette.sclera);

        let cx = self.width as i32 / 2 + gaze.x as i32;
        let cy = self.height as i32 / 2 + gaze.y as i32;

        let iris = self.iris_size as i32;
        self.fill_square(cx - iris / 2, cy - iris / 2, iris, palette.iris);

        let pupil = self.pupil_size as i32;
        let pupil_x = cx - pupil / 2;
        let pupil_y = cy - pupil / 2;
        self.fill_square(pupil_x, pupil_y, pupil, palette.pupil);

        self.fill_square(
            pupil_x + HIGHLIGHT_OFFSET,
            pupil_y + HIGHLIGHT_OFFSET,
            HIGHLIGHT_SIZE,
            palette.highlight,
        );

        // Corners last so nothing drawn above can leak into them
        let [hi, lo] = palette.background.to_be_bytes();
        for &idx in self.mask.indices() {
            let i = idx as usize * 2;
            if let Some(px) = self.base.get_mut(i..i + 2) {
                px[0] = hi;
                px[1] = lo;
            }
        }

        self.stats.base_rebuilds = self.stats.base_rebuilds.wrapping_add(1);
    }

    /// Copy the base into the composited buffer and cover the top
    /// `height * level / 100` rows with the lid color
    pub fn apply_eyelid(&mut self, level: u8) {
        let len = self.len();
        self.composited[..len].copy_from_slice(&self.base[..len]);

        let row_bytes = self.width as usize * 2;
        if row_bytes == 0 {
            return;
        }
        let rows = (self.height as usize * level.min(100) as usize) / 100;
        for row in self.composited[..len].chunks_exact_mut(row_bytes).take(rows) {
            row.copy_from_slice(&self.lid_row[..row_bytes]);
        }

        self.stats.overlays = self.stats.overlays.wrapping_add(1);
    }

    /// Clipped square fill into the base buffer
    fn fill_square(&mut self, x: i32, y: i32, size: i32, color: Rgb565) {
        let w = self.width as i32;
        let h = self.height as i32;
        let x0 = x.clamp(0, w);
        let x1 = (x + size).clamp(0, w);
        let y0 = y.clamp(0, h);
        let y1 = (y + size).clamp(0, h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize * 2;
        for row in y0 as usize..y1 as usize {
            let start = row * stride + x0 as usize * 2;
            let end = row * stride + x1 as usize * 2;
            fill_pixels(&mut self.base[start..end], color);
        }
    }

    /// The frame to blit
    pub fn frame(&self) -> &[u8] {
        &self.composited[..self.len()]
    }

    pub fn base(&self) -> &[u8] {
        &self.base[..self.len()]
    }

    /// Pixel of the composited frame
    pub fn pixel(&self, x: u16, y: u16) -> Rgb565 {
        read_pixel(&self.composited, self.width, x, y)
    }

    /// Pixel of the base buffer
    pub fn base_pixel(&self, x: u16, y: u16) -> Rgb565 {
        read_pixel(&self.base, self.width, x, y)
    }

    pub fn mask(&self) -> &CornerMask {
        &self.mask
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    /// Addresses of the base and composited buffers
    pub fn buffer_addresses(&self) -> (usize, usize) {
        (self.base.as_ptr() as usize, self.composited.as_ptr() as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}

/// Fill a byte slice with repeated big-endian pixels
fn fill_pixels(buf: &mut [u8], color: Rgb565) {
    let [hi, lo] = color.to_be_bytes();
    for px in buf.chunks_exact_mut(2) {
        px[0] = hi;
        px[1] = lo;
    }
}

fn read_pixel(buf: &[u8], width: u16, x: u16, y: u16) -> Rgb565 {
    let i = (y as usize * width as usize + x as usize) * 2;
    Rgb565::from_be_bytes([buf[i], buf[i + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb888;
    use crate::config::EyeDimensions;
    use crate::eyes::gaze::GazeLimits;
    use proptest::prelude::*;

    fn compositor() -> Compositor {
        let geometry = EyeGeometry::new(&EyeDimensions::default(), 240, 280);
        Compositor::new(&geometry, Palette::with_iris(Rgb888(0x2288FF)))
    }

    #[test]
    fn test_centered_layout() {
        let mut c = compositor();
        c.rebuild_base(GazeOffset::CENTER);
        let palette = *c.palette();
        // 70x80 eye: iris spans 15..55 x 20..60, pupil 25..45 x 30..50
        assert_eq!(c.base_pixel(35, 5), palette.sclera);
        assert_eq!(c.base_pixel(16, 40), palette.iris);
        assert_eq!(c.base_pixel(26, 40), palette.pupil);
        assert_eq!(c.base_pixel(29, 34), palette.highlight);
        assert_eq!(c.base_pixel(0, 0), palette.background);
    }

    #[test]
    fn test_gaze_moves_iris() {
        let mut c = compositor();
        c.rebuild_base(GazeOffset { x: 12, y: 20 });
        let palette = *c.palette();
        assert_eq!(c.base_pixel(16, 40), palette.sclera);
        // Iris now spans 27..67 x 40..80
        assert_eq!(c.base_pixel(60, 45), palette.iris);
        assert_eq!(c.base_pixel(20, 45), palette.sclera);
    }

    #[test]
    fn test_extreme_gaze_is_clipped() {
        let mut c = compositor();
        c.rebuild_base(GazeOffset { x: 100, y: -100 });
        // Fully off the eye, so only sclera and background remain
        let palette = *c.palette();
        for y in 0..80 {
            for x in 0..70 {
                let px = c.base_pixel(x, y);
                assert!(px == palette.sclera || px == palette.background);
            }
        }
    }

    #[test]
    fn test_eyelid_rows() {
        let mut c = compositor();
        c.rebuild_base(GazeOffset::CENTER);
        c.apply_eyelid(25);
        let palette = *c.palette();
        // 80 * 25 / 100 = 20 rows
        assert_eq!(c.pixel(35, 19), palette.lid);
        assert_eq!(c.pixel(5, 19), palette.lid);
        assert_eq!(c.pixel(5, 20), palette.sclera);
        assert_eq!(c.pixel(16, 40), palette.iris);
    }

    #[test]
    fn test_zero_width_eye_draws_nothing() {
        let dims = EyeDimensions {
            width: 0,
            ..EyeDimensions::default()
        };
        let geometry = EyeGeometry::new(&dims, 240, 280);
        let mut c = Compositor::new(&geometry, Palette::with_iris(Rgb888(0x2288FF)));
        c.rebuild_base(GazeOffset::CENTER);
        c.apply_eyelid(50);
        assert!(c.frame().is_empty());
    }

    #[test]
    fn test_eyelid_open_and_closed() {
        let mut c = compositor();
        c.rebuild_base(GazeOffset::CENTER);
        c.apply_eyelid(0);
        assert_eq!(c.frame(), c.base());
        c.apply_eyelid(100);
        assert!(c.frame().iter().all(|&b| b == 0));
        // The base is untouched by the overlay
        assert_eq!(c.base_pixel(35, 5), c.palette().sclera);
    }

    #[test]
    fn test_buffers_are_reused() {
        let mut c = compositor();
        let before = c.buffer_addresses();
        for step in 0..10 {
            c.rebuild_base(GazeOffset { x: step, y: -step });
            c.apply_eyelid(step as u8 * 10);
            assert_eq!(c.buffer_addresses(), before);
            assert_eq!(c.frame().as_ptr() as usize, before.1);
        }
        assert_eq!(c.stats(), CompositorStats { base_rebuilds: 10, overlays: 10 });
    }

    #[test]
    fn test_frame_length_matches_geometry() {
        let c = compositor();
        assert_eq!(c.frame().len(), 70 * 80 * 2);
    }

    proptest! {
        #[test]
        fn prop_corners_never_show_the_eye(x in -1.0f32..=1.0, y in -1.0f32..=1.0) {
            let mut c = compositor();
            let gaze = GazeLimits::default().offset(x, y);
            c.rebuild_base(gaze);
            let palette = *c.palette();
            for &idx in c.mask().indices() {
                let px = c.base_pixel(idx % 70, idx / 70);
                prop_assert_eq!(px, palette.background);
                prop_assert!(px != palette.iris && px != palette.sclera);
            }
        }

        #[test]
        fn prop_corners_hold_at_extremes(sx in prop::sample::select(vec![-12i16, 12]),
                                         sy in prop::sample::select(vec![-20i16, 20])) {
            let mut c = compositor();
            c.rebuild_base(GazeOffset { x: sx, y: sy });
            let palette = *c.palette();
            for &idx in c.mask().indices() {
                prop_assert_eq!(c.base_pixel(idx % 70, idx / 70), palette.background);
            }
        }
    }
}

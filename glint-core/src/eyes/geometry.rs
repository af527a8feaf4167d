//! Eye geometry and rounded-corner mask
//!
//! Geometry is fixed at construction. The corner mask lists every buffer
//! index outside the rounded rectangle and is computed exactly once.

use heapless::Vec;

use crate::config::EyeDimensions;

/// Largest supported eye, bounds the compositor buffers
pub const MAX_EYE_WIDTH: u16 = 96;
pub const MAX_EYE_HEIGHT: u16 = 112;

/// Smallest eye side that still leaves room for an iris
pub const MIN_EYE_SIZE: u16 = 8;

/// Bytes in one full-size eye buffer (RGB565)
pub const EYE_BUFFER_LEN: usize = MAX_EYE_WIDTH as usize * MAX_EYE_HEIGHT as usize * 2;

/// Largest supported corner radius
pub const MAX_CORNER_RADIUS: u16 = 32;

/// Capacity of the corner mask. Each corner outside a quarter circle of
/// radius r holds roughly 0.22 * r^2 pixels.
pub const MAX_MASK_PIXELS: usize = 1024;

/// Screen rectangle with a possibly negative origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    /// True if the rectangle lies entirely inside a `width` x `height` screen
    pub const fn fits(&self, width: u16, height: u16) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= width as i32 && self.bottom() <= height as i32
    }
}

/// Placement and proportions of both eyes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeGeometry {
    pub width: u16,
    pub height: u16,
    pub corner_radius: u16,
    pub iris_size: u16,
    pub pupil_size: u16,
    pub spacing: u16,
    pub left_cx: i32,
    pub right_cx: i32,
    pub cy: i32,
}

impl EyeGeometry {
    /// Place two eyes on a `display_w` x `display_h` screen
    pub fn new(dims: &EyeDimensions, display_w: u16, display_h: u16) -> Self {
        let half_screen_w = display_w as i32 / 2;
        let half_eye_w = dims.width as i32 / 2;
        let half_spacing = dims.spacing as i32 / 2;

        Self {
            width: dims.width,
            height: dims.height,
            corner_radius: dims.corner_radius,
            iris_size: dims.iris_size,
            pupil_size: dims.pupil_size,
            spacing: dims.spacing,
            left_cx: half_screen_w - half_eye_w - half_spacing,
            right_cx: half_screen_w + half_eye_w + half_spacing,
            cy: display_h as i32 / 2 - dims.offset_y as i32,
        }
    }

    fn rect_at(&self, cx: i32) -> Rect {
        Rect {
            x: cx - self.width as i32 / 2,
            y: self.cy - self.height as i32 / 2,
            w: self.width,
            h: self.height,
        }
    }

    pub fn left_rect(&self) -> Rect {
        self.rect_at(self.left_cx)
    }

    pub fn right_rect(&self) -> Rect {
        self.rect_at(self.right_cx)
    }

    /// Left then right
    pub fn rects(&self) -> [Rect; 2] {
        [self.left_rect(), self.right_rect()]
    }

    /// True if both eyes lie entirely on screen
    pub fn fits(&self, display_w: u16, display_h: u16) -> bool {
        self.rects().iter().all(|r| r.fits(display_w, display_h))
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn buffer_len(&self) -> usize {
        self.pixel_count() * 2
    }
}

/// Buffer indices outside the rounded rectangle
#[derive(Debug, Clone)]
pub struct CornerMask {
    indices: Vec<u16, MAX_MASK_PIXELS>,
}

impl CornerMask {
    /// Compute the mask for a `width` x `height` eye
    ///
    /// A pixel is outside when its center is farther than `radius` from the
    /// corner's arc center. The test runs on doubled coordinates so it stays
    /// in integers. The radius is clamped to half the shorter side.
    pub fn new(width: u16, height: u16, radius: u16) -> Self {
        let radius = radius.min(width / 2).min(height / 2).min(MAX_CORNER_RADIUS);
        let mut indices = Vec::new();
        let r = radius as i32;
        let limit = 4 * r * r;
        let w = width as usize;

        for y in 0..radius {
            for x in 0..radius {
                let dx = 2 * (r - x as i32) - 1;
                let dy = 2 * (r - y as i32) - 1;
                if dx * dx + dy * dy <= limit {
                    continue;
                }

                let left = x as usize;
                let right = (width - 1 - x) as usize;
                let top = y as usize;
                let bottom = (height - 1 - y) as usize;

                for idx in [top * w + left, top * w + right, bottom * w + left, bottom * w + right] {
                    // Fits by construction: four corners of r <= 32
                    let _ = indices.push(idx as u16);
                }
            }
        }

        Self { indices }
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True if the pixel at (x, y) is masked
    pub fn contains(&self, x: u16, y: u16, width: u16) -> bool {
        let idx = y as usize * width as usize + x as usize;
        self.indices.iter().any(|&i| i as usize == idx)
    }
}

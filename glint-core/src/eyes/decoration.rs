//! Static face decorations
//!
//! Drawn straight to the display with rectangle fills after every blit of
//! the eyes, since a blit overwrites anything inside the eye rectangle.

use super::geometry::Rect;
use crate::color::Rgb888;
use crate::traits::FaceDisplayExt;

/// Eyebrow bar thickness and gap above the eye
pub const EYEBROW_THICKNESS: i32 = 6;
pub const EYEBROW_GAP: i32 = 8;

/// Crow's feet mark size
pub const CROWS_FOOT_SIZE: i32 = 3;

/// Closed line thickness and its distance from the eye's bottom edge
pub const CLOSED_LINE_THICKNESS: i32 = 4;
pub const CLOSED_LINE_INSET: i32 = 6;

/// Closed line drawn across the eye at the bottom of a blink
pub const BLINK_LINE_THICKNESS: i32 = 6;

/// Which decorations are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decorations {
    pub eyebrows: bool,
    pub crows_feet: bool,
}

/// Which side of the face an eye is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

impl Decorations {
    /// Draw every enabled decoration for one eye
    ///
    /// The closed line is added when `lid_level` is fully closed.
    pub fn draw<D: FaceDisplayExt + ?Sized>(
        &self,
        display: &mut D,
        rect: Rect,
        side: Side,
        lid_level: u8,
        color: Rgb888,
    ) -> Result<(), D::Error> {
        if self.eyebrows {
            draw_eyebrow(display, rect, color)?;
        }
        if self.crows_feet {
            draw_crows_feet(display, rect, side, color)?;
        }
        if lid_level >= super::eyelid::CLOSED {
            draw_closed_line(display, rect, color)?;
        }
        Ok(())
    }
}

fn draw_eyebrow<D: FaceDisplayExt + ?Sized>(
    display: &mut D,
    rect: Rect,
    color: Rgb888,
) -> Result<(), D::Error> {
    let y = rect.y - EYEBROW_GAP - EYEBROW_THICKNESS;
    display.fill_rect_clipped(rect.x, y, rect.w as i32, EYEBROW_THICKNESS, color)
}

/// Three marks fanning out from the outer corner, upper, middle and lower
fn draw_crows_feet<D: FaceDisplayExt + ?Sized>(
    display: &mut D,
    rect: Rect,
    side: Side,
    color: Rgb888,
) -> Result<(), D::Error> {
    let cy = rect.y + rect.h as i32 / 2;
    let s = CROWS_FOOT_SIZE;
    let marks = [(3, -8), (5, -1), (3, 6)];

    for (dx, dy) in marks {
        let x = match side {
            Side::Left => rect.x - dx - s,
            Side::Right => rect.right() + dx,
        };
        display.fill_rect_clipped(x, cy + dy, s, s, color)?;
    }
    Ok(())
}

fn draw_closed_line<D: FaceDisplayExt + ?Sized>(
    display: &mut D,
    rect: Rect,
    color: Rgb888,
) -> Result<(), D::Error> {
    let y = rect.bottom() - CLOSED_LINE_INSET - CLOSED_LINE_THICKNESS;
    display.fill_rect_clipped(rect.x, y, rect.w as i32, CLOSED_LINE_THICKNESS, color)
}

/// Horizontal line centered vertically, shown while a blink is closed
pub fn draw_blink_line<D: FaceDisplayExt + ?Sized>(
    display: &mut D,
    rect: Rect,
    color: Rgb888,
) -> Result<(), D::Error> {
    let cy = rect.y + rect.h as i32 / 2;
    display.fill_rect_clipped(
        rect.x,
        cy - BLINK_LINE_THICKNESS / 2,
        rect.w as i32,
        BLINK_LINE_THICKNESS,
        color,
    )
}

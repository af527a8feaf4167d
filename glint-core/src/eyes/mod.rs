//! Eye animation engine
//!
//! Owns the compositor buffers, the blink, eyelid and gaze state machines
//! and the current expression. Draws to an injected `FaceDisplay`.
//!
//! Each call to `Eyes::update` does at most one visible thing, in priority
//! order: a blink stage, an eyelid step, then idle gaze motion followed by
//! a redraw if anything changed since the last blit.

pub mod blink;
pub mod compositor;
pub mod decoration;
pub mod expression;
pub mod eyelid;
pub mod gaze;
pub mod geometry;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub use blink::{Blink, BlinkAction, BlinkStage};
pub use compositor::{Compositor, CompositorStats};
pub use decoration::{Decorations, Side};
pub use expression::{BlinkCadence, EntryGaze, Expression, ExpressionProfile, LidTarget};
pub use eyelid::{Eyelid, LidRate};
pub use gaze::{GazeLimits, GazeOffset, GazeScheduler, MotionPolicy};
pub use geometry::{CornerMask, EyeGeometry, Rect};

use crate::color::{Palette, Rgb888};
use crate::config::{EyeDimensions, FaceSettings};
use crate::timing::Millis;
use crate::traits::{FaceDisplay, FaceDisplayExt};
use geometry::{MAX_EYE_HEIGHT, MAX_EYE_WIDTH, MIN_EYE_SIZE};

/// What was last sent to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rendered {
    gaze: GazeOffset,
    lid: u8,
}

/// The two-eye face
pub struct Eyes<D: FaceDisplay> {
    display: D,
    geometry: EyeGeometry,
    compositor: Compositor,
    decorations: Decorations,
    limits: GazeLimits,
    blink: Blink,
    blink_range: (u32, u32),
    eyelid: Eyelid,
    gaze: GazeOffset,
    scheduler: GazeScheduler,
    expression: Expression,
    happy_squint: u8,
    squint_by_default: bool,
    rng: SmallRng,
    /// Gaze the base buffer was last built for
    base_gaze: Option<GazeOffset>,
    rendered: Option<Rendered>,
    now: Millis,
}

impl<D: FaceDisplay> Eyes<D> {
    /// Build the engine without touching the display
    ///
    /// Eyes that would not fit on the panel, or whose proportions are
    /// degenerate, fall back to the default dimensions. The default expression is applied with its eyelid
    /// already settled.
    pub fn new(display: D, settings: &FaceSettings, seed: u64, now: Millis) -> Self {
        let (width, height) = (display.width(), display.height());
        let mut geometry = EyeGeometry::new(&settings.eye, width, height);
        if !usable(&geometry) || !geometry.fits(width, height)
        {
            geometry = EyeGeometry::new(&EyeDimensions::default(), width, height);
        }

        let palette = Palette::with_iris(settings.iris_color);
        let mut rng = SmallRng::seed_from_u64(seed);
        let expression = settings.default_expression;
        let profile = expression.profile();
        let level = profile
            .lid
            .level(settings.happy_squint, settings.squint_by_default);
        let blink_min = settings.blink_min_ms.min(settings.blink_max_ms);

        let scheduler = GazeScheduler::new(profile.motion, now, &mut rng);

        let mut eyes = Self {
            display,
            geometry,
            compositor: Compositor::new(&geometry, palette),
            decorations: Decorations {
                eyebrows: settings.eyebrows,
                crows_feet: settings.crows_feet,
            },
            limits: GazeLimits::default(),
            blink: Blink::new(now, 0),
            blink_range: (blink_min, settings.blink_max_ms),
            eyelid: Eyelid::settled(level),
            gaze: GazeOffset::CENTER,
            scheduler,
            expression,
            happy_squint: settings.happy_squint,
            squint_by_default: settings.squint_by_default,
            rng,
            base_gaze: None,
            rendered: None,
            now,
        };

        let home = eyes.enter_gaze(profile.gaze);
        eyes.scheduler
            .set_policy(profile.motion, home, now, &mut eyes.rng);
        let interval = eyes.next_blink_interval();
        eyes.blink.schedule(interval);
        eyes
    }

    /// Clear the screen and draw the first frame
    pub fn begin(&mut self) -> Result<(), D::Error> {
        self.display.fill(Rgb888::BLACK)?;
        self.render()
    }

    /// Advance the animation to `now`
    ///
    /// State always advances before any display write, so a failed write
    /// leaves the engine ready to draw the next frame.
    pub fn update(&mut self, now: Millis) -> Result<(), D::Error> {
        self.now = now;

        if let Some(action) = self.blink.poll(now, self.eyelid.is_closed()) {
            return self.apply_blink(action);
        }

        if self.eyelid.step() {
            return self.render();
        }

        let sleeping = self.expression == Expression::Asleep && self.eyelid.is_closed();
        if !sleeping {
            if let Some((x, y)) = self.scheduler.poll(now, &mut self.rng) {
                self.gaze = self.limits.offset(x, y);
            }
        }

        if self.is_dirty() {
            self.render()
        } else {
            Ok(())
        }
    }

    /// Switch expression by name; unknown names mean `normal`
    pub fn set_expression(&mut self, name: &str) {
        self.apply_expression(Expression::parse(name));
    }

    /// Switch expression. Re-entering the current one does nothing.
    pub fn apply_expression(&mut self, expression: Expression) {
        if expression == self.expression {
            return;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Expression {} -> {}", self.expression, expression);

        self.expression = expression;
        let profile = expression.profile();
        let level = profile.lid.level(self.happy_squint, self.squint_by_default);
        self.eyelid.retarget(level, profile.rate);

        let home = self.enter_gaze(profile.gaze);
        self.scheduler
            .set_policy(profile.motion, home, self.now, &mut self.rng);
    }

    /// Replace the per-axis gaze maxima, used from the next movement on
    pub fn set_gaze_limits(&mut self, limits: GazeLimits) {
        self.limits = limits;
    }

    pub fn gaze_limits(&self) -> GazeLimits {
        self.limits
    }

    /// Look in a normalized direction, each axis in [-1, 1]
    pub fn look_at(&mut self, x: f32, y: f32) {
        self.gaze = self.limits.offset(x, y);
    }

    pub fn look_center(&mut self) {
        self.gaze = GazeOffset::CENTER;
    }

    pub fn look_random(&mut self) {
        let (x, y) = gaze::random_direction(&mut self.rng);
        self.look_at(x, y);
    }

    /// Apply an expression's entry gaze, returning the resting direction
    fn enter_gaze(&mut self, entry: EntryGaze) -> (f32, f32) {
        match entry {
            EntryGaze::Keep => (0.0, 0.0),
            EntryGaze::Look(x, y) => {
                self.look_at(x, y);
                (x, y)
            }
            EntryGaze::SweepStart => {
                let (x, y) = gaze::ReadingSweep::default().direction();
                self.look_at(x, y);
                (x, y)
            }
        }
    }

    fn next_blink_interval(&mut self) -> u32 {
        let (min, max) = self.blink_range;
        let base = self.rng.gen_range(min..=max);
        self.expression.profile().cadence.scale(base)
    }

    fn apply_blink(&mut self, action: BlinkAction) -> Result<(), D::Error> {
        let color = self.compositor.palette().lid_fill;
        match action {
            BlinkAction::Hold => Ok(()),
            BlinkAction::Band(eighths) => {
                for rect in self.geometry.rects() {
                    let band = (rect.h * eighths / 8) as i32;
                    let w = rect.w as i32;
                    self.display
                        .fill_rect_clipped(rect.x, rect.y, w, band, color)?;
                    self.display
                        .fill_rect_clipped(rect.x, rect.bottom() - band, w, band, color)?;
                }
                Ok(())
            }
            BlinkAction::Close => {
                let line = self.compositor.palette().decoration;
                for rect in self.geometry.rects() {
                    self.display.fill_rect_clipped(
                        rect.x,
                        rect.y,
                        rect.w as i32,
                        rect.h as i32,
                        color,
                    )?;
                    decoration::draw_blink_line(&mut self.display, rect, line)?;
                }
                Ok(())
            }
            BlinkAction::Reopen => {
                let interval = self.next_blink_interval();
                self.blink.schedule(interval);

                #[cfg(feature = "defmt")]
                defmt::trace!("Blink done, next in {} ms", interval);

                self.render()
            }
        }
    }

    fn is_dirty(&self) -> bool {
        self.rendered
            != Some(Rendered {
                gaze: self.gaze,
                lid: self.eyelid.current(),
            })
    }

    /// Bring the buffers up to date and blit both eyes
    fn render(&mut self) -> Result<(), D::Error> {
        if self.base_gaze != Some(self.gaze) {
            self.compositor.rebuild_base(self.gaze);
            self.base_gaze = Some(self.gaze);
        }
        let lid = self.eyelid.current();
        self.compositor.apply_eyelid(lid);
        self.rendered = Some(Rendered {
            gaze: self.gaze,
            lid,
        });

        let frame = self.compositor.frame();
        let color = self.compositor.palette().decoration;
        let sides = [Side::Left, Side::Right];
        for (rect, side) in self.geometry.rects().into_iter().zip(sides) {
            let (Ok(x), Ok(y)) = (u16::try_from(rect.x), u16::try_from(rect.y)) else {
                continue;
            };
            self.display.blit(x, y, rect.w, rect.h, frame)?;
            self.decorations
                .draw(&mut self.display, rect, side, lid, color)?;
        }
        Ok(())
    }

    pub fn gaze(&self) -> GazeOffset {
        self.gaze
    }

    pub fn eyelid(&self) -> &Eyelid {
        &self.eyelid
    }

    pub fn blink_stage(&self) -> BlinkStage {
        self.blink.stage()
    }

    /// Completed blinks since construction
    pub fn blinks(&self) -> u32 {
        self.blink.completed()
    }

    pub fn expression(&self) -> Expression {
        self.expression
    }

    pub fn motion(&self) -> MotionPolicy {
        self.scheduler.policy()
    }

    pub fn geometry(&self) -> &EyeGeometry {
        &self.geometry
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn compositor_stats(&self) -> CompositorStats {
        self.compositor.stats()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Borrow the display between ticks, e.g. for a ticker or backlight
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Give the display back
    pub fn release(self) -> D {
        self.display
    }
}

/// Proportions the compositor can draw, the same floor `resolve` applies
fn usable(geometry: &EyeGeometry) -> bool {
    let shortest = geometry.width.min(geometry.height);
    (MIN_EYE_SIZE..=MAX_EYE_WIDTH).contains(&geometry.width)
        && (MIN_EYE_SIZE..=MAX_EYE_HEIGHT).contains(&geometry.height)
        && geometry.corner_radius <= shortest / 2
        && (2..=shortest).contains(&geometry.iris_size)
        && (1..=geometry.iris_size).contains(&geometry.pupil_size)
}

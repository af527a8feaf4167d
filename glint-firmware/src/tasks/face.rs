//! Face render task
//!
//! Owns the eyes and the status ticker. Frames are driven by a fixed
//! ticker; host commands wake the task early and are applied before the
//! next frame is drawn.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::pwm::PwmOutput;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Duration, Instant, Ticker};

use glint_core::config::TickerPalette;
use glint_core::timing::Millis;
use glint_core::{Eyes, FaceDisplay};
use glint_display::StatusTicker;
use glint_drivers::display::St7789;
use glint_protocol::ScreenCommand;

use crate::channels::{FaceCommand, COMMAND_CHANNEL};

/// Frame interval in milliseconds
pub const FRAME_INTERVAL_MS: u64 = 20;

/// The panel as wired on the board
pub type Panel = St7789<
    Spi<'static, SPI0, Blocking>,
    Output<'static>,
    Output<'static>,
    Output<'static>,
    PwmOutput<'static>,
>;

/// Milliseconds since boot, wrapping
pub fn now_ms() -> Millis {
    Instant::now().as_millis() as Millis
}

/// Face task - animates the eyes and the ticker
#[embassy_executor::task]
pub async fn face_task(
    eyes: &'static mut Eyes<Panel>,
    status: &'static mut StatusTicker,
    palette: TickerPalette,
) {
    info!("Face task started");

    let mut frames = Ticker::every(Duration::from_millis(FRAME_INTERVAL_MS));

    loop {
        if let Either::Second(command) = select(frames.next(), COMMAND_CHANNEL.receive()).await {
            handle_command(eyes, status, &palette, command);
        }

        let now = now_ms();
        if let Err(e) = eyes.update(now) {
            warn!("Eye frame failed: {:?}", e);
        }
        if let Err(e) = status.update(eyes.display_mut(), now) {
            warn!("Ticker frame failed: {:?}", e);
        }
    }
}

fn handle_command(
    eyes: &mut Eyes<Panel>,
    status: &mut StatusTicker,
    palette: &TickerPalette,
    command: FaceCommand,
) {
    match command {
        FaceCommand::Status(text) => {
            debug!("Status: {}", text.as_str());
            status.set_text(&text);
        }
        FaceCommand::Clear => {
            debug!("Status cleared");
            status.clear();
        }
        FaceCommand::Expression(expression) => {
            info!("Expression: {}", expression.name());
            eyes.apply_expression(expression);
            status.set_color(palette.color_for(eyes.expression()));
        }
        FaceCommand::Screen(screen) => {
            let panel = eyes.display_mut();
            let result = match screen {
                ScreenCommand::On => panel.set_backlight(true),
                ScreenCommand::Off => panel.set_backlight(false),
                ScreenCommand::Dim(percent) => panel.set_brightness(percent),
            };
            match result {
                Ok(()) => info!("Screen: {:?}", screen),
                Err(e) => warn!("Backlight change failed: {:?}", e),
            }
        }
    }
}

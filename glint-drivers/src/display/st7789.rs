//! ST7789 TFT display driver
//!
//! Driver for the 240x280 ST7789 panel over a write-only SPI bus with
//! manual chip select and data/command pins, plus a PWM backlight.
//!
//! The panel sits in the middle of the controller's 240x320 RAM, so every
//! row address is shifted down by `ROW_OFFSET`.
//!
//! ```ignore
//! let mut lcd = St7789::new(spi, cs, dc, rst, backlight);
//! lcd.init(&mut delay)?;
//! lcd.fill(Rgb888::BLACK)?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiBus;
use glint_core::color::{Rgb565, Rgb888};
use glint_core::traits::FaceDisplay;

/// Panel dimensions
pub const WIDTH: u16 = 240;
pub const HEIGHT: u16 = 280;

/// First visible RAM row
pub const ROW_OFFSET: u16 = 20;

/// Pixels sent per SPI write while filling
const FILL_CHUNK_PIXELS: usize = WIDTH as usize;

/// ST7789 commands
#[allow(dead_code)]
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const PORCTRL: u8 = 0xB2;
    pub const GCTRL: u8 = 0xB7;
    pub const VCOMS: u8 = 0xBB;
    pub const LCMCTRL: u8 = 0xC0;
    pub const VDVVRHEN: u8 = 0xC2;
    pub const VRHS: u8 = 0xC3;
    pub const VDVS: u8 = 0xC4;
    pub const FRCTRL2: u8 = 0xC6;
    pub const PWCTRL1: u8 = 0xD0;
}

/// Register writes after sleep-out, as (command, parameters)
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::MADCTL, &[0x08]), // BGR order
    (cmd::COLMOD, &[0x55]), // 16 bits per pixel
    (cmd::PORCTRL, &[0x0C, 0x0C, 0x00, 0x33, 0x33]),
    (cmd::GCTRL, &[0x35]),
    (cmd::VCOMS, &[0x28]),
    (cmd::LCMCTRL, &[0x0C]),
    (cmd::VDVVRHEN, &[0x01, 0xFF]),
    (cmd::VRHS, &[0x10]),
    (cmd::VDVS, &[0x20]),
    (cmd::FRCTRL2, &[0x0F]), // 60 Hz
    (cmd::PWCTRL1, &[0xA4, 0xA1]),
    (cmd::INVON, &[]),
];

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum St7789Error {
    /// SPI transfer failed
    Spi,
    /// CS, DC or RST pin could not be driven
    Pin,
    /// Backlight PWM rejected the duty cycle
    Backlight,
}

/// ST7789 driver
pub struct St7789<SPI, CS, DC, RST, BL> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    backlight: BL,
}

impl<SPI, CS, DC, RST, BL> St7789<SPI, CS, DC, RST, BL>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BL: SetDutyCycle,
{
    /// Create a new driver. Nothing is sent until `init`.
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST, backlight: BL) -> Self {
        Self {
            spi,
            cs,
            dc,
            rst,
            backlight,
        }
    }

    /// Reset the panel and run the power-up sequence
    ///
    /// Blocks for roughly 570 ms. Leaves the backlight fully on.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), St7789Error> {
        self.cs.set_high().map_err(|_| St7789Error::Pin)?;

        self.rst.set_low().map_err(|_| St7789Error::Pin)?;
        delay.delay_ms(100);
        self.rst.set_high().map_err(|_| St7789Error::Pin)?;
        delay.delay_ms(150);

        self.set_backlight_on(true)?;

        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);

        for &(command, params) in INIT_SEQUENCE {
            self.command(command, params)?;
        }

        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(50);

        Ok(())
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), St7789Error> {
        self.cs.set_low().map_err(|_| St7789Error::Pin)?;
        self.dc.set_low().map_err(|_| St7789Error::Pin)?;
        let result = self.spi.write(&[command]);
        self.end(result)?;

        if !params.is_empty() {
            self.data(params)?;
        }
        Ok(())
    }

    /// Send data bytes
    fn data(&mut self, data: &[u8]) -> Result<(), St7789Error> {
        self.cs.set_low().map_err(|_| St7789Error::Pin)?;
        self.dc.set_high().map_err(|_| St7789Error::Pin)?;
        let result = self.spi.write(data);
        self.end(result)
    }

    /// Flush and release chip select, even after a failed write
    fn end(&mut self, result: Result<(), SPI::Error>) -> Result<(), St7789Error> {
        let flushed = result.and_then(|_| self.spi.flush());
        self.cs.set_high().map_err(|_| St7789Error::Pin)?;
        flushed.map_err(|_| St7789Error::Spi)
    }

    fn set_backlight_on(&mut self, on: bool) -> Result<(), St7789Error> {
        let result = if on {
            self.backlight.set_duty_cycle_fully_on()
        } else {
            self.backlight.set_duty_cycle_fully_off()
        };
        result.map_err(|_| St7789Error::Backlight)
    }

    /// Give the bus and pins back
    pub fn release(self) -> (SPI, CS, DC, RST, BL) {
        (self.spi, self.cs, self.dc, self.rst, self.backlight)
    }
}

/// Column or row address parameters, big-endian start then end
fn address_range(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

impl<SPI, CS, DC, RST, BL> FaceDisplay for St7789<SPI, CS, DC, RST, BL>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BL: SetDutyCycle,
{
    type Error = St7789Error;

    fn width(&self) -> u16 {
        WIDTH
    }

    fn height(&self) -> u16 {
        HEIGHT
    }

    fn fill(&mut self, color: Rgb888) -> Result<(), St7789Error> {
        self.fill_rect(0, 0, WIDTH, HEIGHT, color)
    }

    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: Rgb888,
    ) -> Result<(), St7789Error> {
        let w = w.min(WIDTH.saturating_sub(x));
        let h = h.min(HEIGHT.saturating_sub(y));
        if w == 0 || h == 0 {
            return Ok(());
        }

        self.set_window(x, y, x + w - 1, y + h - 1)?;

        let [hi, lo] = Rgb565::from(color).to_be_bytes();
        let mut chunk = [0u8; FILL_CHUNK_PIXELS * 2];
        for px in chunk.chunks_exact_mut(2) {
            px[0] = hi;
            px[1] = lo;
        }

        self.cs.set_low().map_err(|_| St7789Error::Pin)?;
        self.dc.set_high().map_err(|_| St7789Error::Pin)?;
        let mut remaining = w as usize * h as usize * 2;
        let mut result = Ok(());
        while remaining > 0 && result.is_ok() {
            let n = remaining.min(chunk.len());
            result = self.spi.write(&chunk[..n]);
            remaining -= n;
        }
        self.end(result)
    }

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), St7789Error> {
        self.command(cmd::CASET, &address_range(x0, x1))?;
        self.command(
            cmd::RASET,
            &address_range(y0.saturating_add(ROW_OFFSET), y1.saturating_add(ROW_OFFSET)),
        )?;
        self.command(cmd::RAMWR, &[])
    }

    fn write_pixels(&mut self, data: &[u8]) -> Result<(), St7789Error> {
        self.data(data)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), St7789Error> {
        self.set_backlight_on(on)
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), St7789Error> {
        self.backlight
            .set_duty_cycle_percent(percent.min(100))
            .map_err(|_| St7789Error::Backlight)
    }
}

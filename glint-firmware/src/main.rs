//! Glint - Animated Eyes Firmware
//!
//! Main firmware binary for an RP2040 board driving a 240x280 ST7789
//! panel. The eyes animate on their own; a host sets the expression and
//! the status ticker over UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Config as SpiConfig, Phase, Polarity, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use rand::RngCore;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use glint_core::config::{parse_config, FaceSettings};
use glint_core::Eyes;
use glint_display::ticker::DEFAULT_Y;
use glint_display::StatusTicker;
use glint_drivers::display::St7789;

use crate::tasks::{now_ms, Panel};

/// Embedded face configuration (compiled into firmware)
/// Edit face.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../face.toml");

/// Panel SPI clock
const SPI_FREQUENCY_HZ: u32 = 62_500_000;

/// Backlight PWM period in counts
const BACKLIGHT_PWM_TOP: u16 = 1000;

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Frame buffers live inside these, keep them off the stack
static EYES: StaticCell<Eyes<Panel>> = StaticCell::new();
static STATUS: StaticCell<StatusTicker> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Glint firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let settings = load_settings();

    // Panel: SPI0 SCK=GPIO18 MOSI=GPIO19, CS=GPIO17, DC=GPIO16, RST=GPIO20
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    spi_config.phase = Phase::CaptureOnSecondTransition;
    spi_config.polarity = Polarity::IdleHigh;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);

    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let rst = Output::new(p.PIN_20, Level::High);

    // Backlight on GPIO15 (PWM slice 7, channel B), starts fully on
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = BACKLIGHT_PWM_TOP;
    pwm_config.compare_b = BACKLIGHT_PWM_TOP;
    let pwm = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, pwm_config);
    let (_, backlight) = pwm.split();
    let backlight = unwrap!(backlight);

    let mut panel = St7789::new(spi, cs, dc, rst, backlight);
    match panel.init(&mut Delay) {
        Ok(()) => info!("ST7789 initialized"),
        Err(e) => error!("ST7789 init failed: {:?}", e),
    }

    let seed = RoscRng.next_u64();
    let eyes = EYES.init_with(|| Eyes::new(panel, &settings, seed, now_ms()));
    if let Err(e) = eyes.begin() {
        warn!("Initial frame failed: {:?}", e);
    }
    info!(
        "Eyes ready: {}x{}, expression {}",
        eyes.geometry().width,
        eyes.geometry().height,
        eyes.expression().name()
    );

    let status = STATUS.init_with(|| {
        StatusTicker::new(DEFAULT_Y, settings.ticker.color_for(settings.default_expression))
    });

    // Host link on UART0: TX=GPIO0, RX=GPIO1, 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();
    info!("UART initialized for host commands");

    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::face_task(eyes, status, settings.ticker))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse and resolve the embedded face.toml
///
/// Individual bad fields fall back to their defaults and are logged; a
/// document that cannot be parsed at all yields the built-in settings.
fn load_settings() -> FaceSettings {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in face settings");
            return FaceSettings::default();
        }
    };

    let (settings, issues) = config.resolve();
    for issue in &issues {
        warn!("Config issue, using default: {:?}", issue);
    }
    info!(
        "Configuration loaded: blink {}-{} ms, default {}",
        settings.blink_min_ms,
        settings.blink_max_ms,
        settings.default_expression.name()
    );
    settings
}

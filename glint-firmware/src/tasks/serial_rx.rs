//! Host serial receive task
//!
//! Assembles lines from UART0 and forwards parsed commands.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use glint_core::Expression;
use glint_protocol::{Command, LineBuffer, MAX_LINE_LEN};

use crate::channels::{FaceCommand, COMMAND_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - turns the host byte stream into face commands
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut lines = LineBuffer::<MAX_LINE_LEN>::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    let Some(line) = lines.feed(byte) else {
                        continue;
                    };
                    match Command::parse(line) {
                        Ok(command) => dispatch(command),
                        Err(e) => {
                            warn!("Ignoring line: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                lines.reset();
            }
        }
    }
}

fn dispatch(command: Command<'_>) {
    if let Command::Expression(name) = command {
        if Expression::from_name(name).is_none() {
            debug!("Unknown expression '{}', using normal", name);
        }
    }

    // Dropped if the face task falls behind
    if COMMAND_CHANNEL.try_send(FaceCommand::from(command)).is_err() {
        warn!("Command channel full, dropping command");
    }
}

//! Inter-task communication channels
//!
//! Commands parsed from the serial link are copied into owned
//! `FaceCommand`s and handed to the face task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;

use glint_core::Expression;
use glint_protocol::{Command, ScreenCommand, MAX_LINE_LEN};

/// Channel capacity for host commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// A command with its text copied out of the line buffer
#[derive(Debug, Clone, PartialEq, Eq, defmt::Format)]
pub enum FaceCommand {
    Status(String<MAX_LINE_LEN>),
    Clear,
    Screen(ScreenCommand),
    /// Unknown names are already mapped to `normal`
    Expression(Expression),
}

impl From<Command<'_>> for FaceCommand {
    fn from(command: Command<'_>) -> Self {
        match command {
            Command::Status(text) => {
                let mut owned = String::new();
                let _ = owned.push_str(text);
                FaceCommand::Status(owned)
            }
            Command::Clear => FaceCommand::Clear,
            Command::Screen(screen) => FaceCommand::Screen(screen),
            Command::Expression(name) => FaceCommand::Expression(Expression::parse(name)),
        }
    }
}

/// Host commands from the serial link
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, FaceCommand, COMMAND_CHANNEL_SIZE> =
    Channel::new();

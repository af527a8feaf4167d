//! Glint serial command protocol
//!
//! The host drives the face over a serial port with newline-terminated
//! ASCII lines:
//! ```text
//! S:<text>              status ticker text
//! CLEAR                 clear the ticker
//! SCREEN:ON             backlight on
//! SCREEN:OFF            backlight off
//! SCREEN:DIM:<0-100>    backlight level
//! E:<expression>        change expression
//! ```
//!
//! Lines end with `\n` or `\r` and are trimmed. Lines longer than the
//! line buffer are dropped whole.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;

pub use command::{Command, ParseError, ScreenCommand};
pub use line::{LineBuffer, MAX_LINE_LEN};

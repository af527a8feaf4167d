//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod face;
pub mod serial_rx;

pub use face::{face_task, now_ms, Panel};
pub use serial_rx::serial_rx_task;

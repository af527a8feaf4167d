//! Hardware abstraction traits
//!
//! These traits define the interface between the animation logic
//! and hardware-specific implementations.

pub mod display;

#[cfg(test)]
pub mod mock;

pub use display::{FaceDisplay, FaceDisplayExt};

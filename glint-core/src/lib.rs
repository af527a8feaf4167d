//! Board-agnostic core logic for the Glint face display
//!
//! This crate contains all animation logic that does not depend on
//! specific hardware implementations:
//!
//! - Display capability trait consumed by the eye engine
//! - Color packing and palette caching
//! - Eye geometry, compositor buffers and corner masks
//! - Blink, eyelid and gaze state machines
//! - Expression table and the top-level `Eyes` engine
//! - Configuration type definitions and a minimal TOML reader
//!
//! Everything here is `no_std` and allocation-free; the host test build
//! links `std` for the test harness only.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod color;
pub mod config;
pub mod eyes;
pub mod timing;
pub mod traits;

pub use color::{Palette, Rgb565, Rgb888};
pub use eyes::{Expression, Eyes};
pub use traits::{FaceDisplay, FaceDisplayExt};

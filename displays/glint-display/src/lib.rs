//! Text rendering for Glint face displays
//!
//! This crate provides the components that share the panel with the eyes:
//!
//! - `StatusTicker`: a one-line scrolling status strip below the eyes
//!
//! Rendering uses `embedded-graphics` bitmap fonts into fixed buffers that
//! are blitted through the `FaceDisplay` trait from glint-core.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod strip;
pub mod ticker;

pub use strip::PixelStrip;
pub use ticker::StatusTicker;

//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in glint-core:
//!
//! - Display panels (ST7789 over SPI with PWM backlight)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;

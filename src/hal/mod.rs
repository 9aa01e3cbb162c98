//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `graphics`: [`Canvas`](crate::traits::Canvas) over any embedded-graphics
//!   draw target (requires `display` feature)
//! - `esp32`: ESP32 board with buttons, buzzer and Wi-Fi (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "display")]
pub mod graphics;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "display")]
pub use graphics::GraphicsCanvas;

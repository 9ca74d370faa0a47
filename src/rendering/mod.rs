//! # Rendering Module
//!
//! Text rendering for the terminal interface.

pub mod display;

pub use display::*;

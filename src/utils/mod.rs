//! # Utilities Module
//!
//! Graph queries over the room graph and difficulty scaling math.

pub mod graph;
pub mod math;

pub use graph::*;
pub use math::*;

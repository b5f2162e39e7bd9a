//! Canvas 2D rendering
//!
//! The actors are DOM images; only the rope and the confetti are drawn here.

pub mod canvas;

pub use canvas::CanvasRenderer;

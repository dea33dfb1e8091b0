pub mod cli;
pub mod core;
pub mod games;
pub mod logging;

// Re-export for convenience
pub use crate::core::game::{Flow, Game, InputEvent};
pub use crate::core::renderer::{Color, DrawCommand, DrawList, Point, Rect, Renderer};

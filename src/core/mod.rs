pub mod engine;
pub mod game;
pub mod renderer;  // Draw primitives the games call
pub mod terminal;  // ratatui canvas backend

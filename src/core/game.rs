/// Core game interface for the frame-loop engine
use std::time::Duration;

use crossterm::event::KeyCode;

use crate::core::renderer::{Point, Renderer};

/// Input delivered to a game, already translated into virtual canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved(Point),
    PointerPressed(Point),
    Key(KeyCode),
}

/// What the host should do after an input has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main game trait that all games must implement.
/// The engine owns the game exclusively and calls it from a single loop.
pub trait Game {
    /// Shown in the terminal frame border
    fn title(&self) -> String;

    /// Target frame interval
    fn tick_rate(&self) -> Duration {
        Duration::from_micros(16_667)
    }

    /// Size of the virtual canvas the game draws into
    fn canvas_size(&self) -> (f32, f32);

    fn handle_input(&mut self, event: InputEvent) -> Flow;

    /// Advance one frame. `delta` is measured in 60 Hz frames.
    fn on_tick(&mut self, delta: f32);

    /// Issue this frame's draw requests
    fn render(&self, renderer: &mut dyn Renderer);
}

/// Pointer and key events to moves and commands
use crossterm::event::KeyCode;
use tracing::debug;

use super::board::GRID_SIZE;
use super::config::{Command, KeyBindings};
use super::controller::GameController;
use super::geometry::BoardGeometry;
use crate::core::renderer::Point;

/// What a pointer press ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressResult {
    Moved(usize, usize),
    Rejected,
    Restarted,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct InputMapper {
    geometry: BoardGeometry,
    keys: KeyBindings,
    hover: Option<(usize, usize)>,
    pointer: Option<Point>,
}

impl InputMapper {
    pub fn new(geometry: BoardGeometry, keys: KeyBindings) -> Self {
        Self {
            geometry,
            keys,
            hover: None,
            pointer: None,
        }
    }

    /// Track the pointer; returns the cell underneath, if any
    pub fn pointer_moved(&mut self, p: Point) -> Option<(usize, usize)> {
        self.pointer = Some(p);
        self.hover = self.geometry.cell_at(p);
        self.hover
    }

    pub fn pointer_pressed(&mut self, p: Point, game: &mut GameController) -> PressResult {
        self.pointer_moved(p);

        if game.is_over() {
            if self.geometry.restart_button().contains(p) {
                game.restart();
                return PressResult::Restarted;
            }
            return PressResult::Ignored;
        }

        match self.geometry.cell_at(p) {
            Some((row, col)) => match game.apply_move(row, col) {
                Ok(_) => PressResult::Moved(row, col),
                Err(_) => PressResult::Rejected,
            },
            None => PressResult::Ignored,
        }
    }

    /// Run the bound command, if any. `Quit` is handed back for the host to act on.
    /// Cell keys go through the same move checks as a click.
    pub fn key_pressed(&mut self, key: KeyCode, game: &mut GameController) -> Option<Command> {
        let Some(command) = self.keys.command_for(key) else {
            debug!(?key, "unbound key");
            return None;
        };
        match command {
            Command::Restart => game.restart(),
            Command::ResetScores => game.reset_scores(),
            Command::Quit => {}
            Command::Place(row, col) if row < GRID_SIZE && col < GRID_SIZE => {
                if let Err(e) = game.apply_move(row, col) {
                    debug!(?key, "key move rejected: {e}");
                }
            }
            Command::Place(row, col) => debug!(?key, row, col, "key bound off the board"),
        }
        Some(command)
    }

    pub fn hover(&self) -> Option<(usize, usize)> {
        self.hover
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn keys(&self) -> &KeyBindings {
        &self.keys
    }
}

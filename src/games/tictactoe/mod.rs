/// Tic-tac-toe with animated marks, a winning-line sweep and particle bursts
pub mod board;
pub mod config;
pub mod controller;
pub mod effects;
pub mod geometry;
pub mod input;
pub mod rules;
pub mod scene;

pub use board::{Board, Cell, CellOccupied, Player};
pub use config::{Command, Config, Theme};
pub use controller::{GameController, MoveRejected, Phase, Scoreboard};
pub use effects::EffectsEngine;
pub use input::{InputMapper, PressResult};
pub use rules::{GameOutcome, LineKind, WinningLine};

use tracing::info;

use crate::core::game::{Flow, Game, InputEvent};
use crate::core::renderer::Renderer;

/// The playable game: controller plus input mapping plus scene drawing
pub struct TicTacToe {
    config: Config,
    controller: GameController,
    input: InputMapper,
}

impl TicTacToe {
    pub fn new(config: Config) -> Self {
        let controller = GameController::new(&config);
        Self::with_controller(config, controller)
    }

    /// Seeded particle randomness
    pub fn with_seed(config: Config, seed: u64) -> Self {
        let controller = GameController::with_effects(&config, EffectsEngine::with_seed(&config, seed));
        Self::with_controller(config, controller)
    }

    fn with_controller(config: Config, controller: GameController) -> Self {
        let input = InputMapper::new(config.geometry, config.keys.clone());
        Self { config, controller, input }
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Game for TicTacToe {
    fn title(&self) -> String {
        format!(" Tic Tac Toe - {} ", self.config.theme.name)
    }

    fn canvas_size(&self) -> (f32, f32) {
        (self.config.geometry.width, self.config.geometry.height)
    }

    fn handle_input(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::PointerMoved(p) => {
                self.input.pointer_moved(p);
            }
            InputEvent::PointerPressed(p) => {
                self.input.pointer_pressed(p, &mut self.controller);
            }
            InputEvent::Key(key) => {
                if self.input.key_pressed(key, &mut self.controller) == Some(Command::Quit) {
                    info!(scores = ?self.controller.scoreboard(), "quit requested");
                    return Flow::Quit;
                }
            }
        }
        Flow::Continue
    }

    fn on_tick(&mut self, delta: f32) {
        self.controller.tick(delta);
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        scene::render_frame(renderer, &self.controller, &self.input, &self.config);
    }
}

/// Turn sequencing and the game state machine
use tracing::{debug, info};

use super::board::{Board, CellOccupied, Player};
use super::config::Config;
use super::effects::EffectsEngine;
use super::geometry::BoardGeometry;
use super::rules::{self, GameOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingMove(Player),
    GameOver(GameOutcome),
}

/// Why a move did not register
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveRejected {
    #[display("{_0}")]
    CellOccupied(CellOccupied),
    #[display("the game is already over")]
    GameOver,
}

/// Session tallies; survives restarts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub wins_x: u32,
    pub wins_o: u32,
    pub draws: u32,
}

impl Scoreboard {
    pub fn record(&mut self, outcome: &GameOutcome) {
        match outcome {
            GameOutcome::Win(Player::X, _) => self.wins_x += 1,
            GameOutcome::Win(Player::O, _) => self.wins_o += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::InProgress => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct GameController {
    board: Board,
    phase: Phase,
    scoreboard: Scoreboard,
    effects: EffectsEngine,
    geometry: BoardGeometry,
}

impl GameController {
    pub fn new(config: &Config) -> Self {
        Self::with_effects(config, EffectsEngine::new(config))
    }

    pub fn with_effects(config: &Config, effects: EffectsEngine) -> Self {
        Self {
            board: Board::new(),
            phase: Phase::AwaitingMove(Player::X),
            scoreboard: Scoreboard::default(),
            effects,
            geometry: config.geometry,
        }
    }

    /// Place the current player's mark. On success returns the resulting outcome.
    pub fn apply_move(&mut self, row: usize, col: usize) -> Result<GameOutcome, MoveRejected> {
        let player = match self.phase {
            Phase::AwaitingMove(player) => player,
            Phase::GameOver(_) => {
                debug!(row, col, "move ignored, game is over");
                return Err(MoveRejected::GameOver);
            }
        };

        if let Err(occupied) = self.board.place(row, col, player) {
            debug!(row, col, ?player, "move rejected: {occupied}");
            return Err(MoveRejected::CellOccupied(occupied));
        }
        info!(row, col, ?player, "move applied");
        self.effects.on_mark_placed(row, col);

        let outcome = rules::evaluate(&self.board);
        match outcome {
            GameOutcome::InProgress => {
                self.phase = Phase::AwaitingMove(player.opponent());
            }
            finished => {
                info!(outcome = ?finished, "game over");
                self.phase = Phase::GameOver(finished);
                self.scoreboard.record(&finished);
                self.effects.on_outcome(&finished, &self.geometry);
            }
        }
        Ok(outcome)
    }

    /// New round with X to move. The scoreboard is kept.
    pub fn restart(&mut self) {
        self.board.reset();
        self.effects.clear();
        self.phase = Phase::AwaitingMove(Player::X);
        info!(scores = ?self.scoreboard, "board restarted");
    }

    pub fn reset_scores(&mut self) {
        self.scoreboard.reset();
        info!("scoreboard cleared");
    }

    pub fn tick(&mut self, delta: f32) {
        self.effects.tick(delta);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.phase {
            Phase::AwaitingMove(_) => GameOutcome::InProgress,
            Phase::GameOver(outcome) => outcome,
        }
    }

    /// Player to move, `None` once the game is over
    pub fn current_player(&self) -> Option<Player> {
        match self.phase {
            Phase::AwaitingMove(player) => Some(player),
            Phase::GameOver(_) => None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn effects(&self) -> &EffectsEngine {
        &self.effects
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::board::Cell;
    use crate::games::tictactoe::rules::{LineKind, WinningLine};

    fn controller() -> GameController {
        let config = Config::default();
        GameController::with_effects(&config, EffectsEngine::with_seed(&config, 1))
    }

    fn play(game: &mut GameController, moves: &[(usize, usize)]) -> GameOutcome {
        let mut last = GameOutcome::InProgress;
        for &(r, c) in moves {
            last = game.apply_move(r, c).expect("legal move");
        }
        last
    }

    #[test]
    fn starts_with_x() {
        let game = controller();
        assert_eq!(game.phase(), Phase::AwaitingMove(Player::X));
        assert_eq!(game.current_player(), Some(Player::X));
        assert_eq!(game.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn players_alternate() {
        let mut game = controller();
        game.apply_move(0, 0).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingMove(Player::O));
        game.apply_move(1, 1).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingMove(Player::X));
        assert_eq!(game.board().at(0, 0), Cell::Mark(Player::X));
        assert_eq!(game.board().at(1, 1), Cell::Mark(Player::O));
    }

    #[test]
    fn occupied_cell_is_rejected_and_turn_kept() {
        let mut game = controller();
        game.apply_move(0, 0).unwrap();
        let err = game.apply_move(0, 0).unwrap_err();
        assert_eq!(err, MoveRejected::CellOccupied(CellOccupied { row: 0, col: 0 }));
        assert_eq!(game.board().at(0, 0), Cell::Mark(Player::X));
        assert_eq!(game.phase(), Phase::AwaitingMove(Player::O));
    }

    #[test]
    fn win_ends_game_and_scores() {
        let mut game = controller();
        let outcome = play(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let expected = GameOutcome::Win(Player::X, WinningLine::new(LineKind::Row(0)));

        assert_eq!(outcome, expected);
        assert_eq!(game.phase(), Phase::GameOver(expected));
        assert_eq!(game.current_player(), None);
        assert_eq!(game.scoreboard(), Scoreboard { wins_x: 1, wins_o: 0, draws: 0 });
        assert!(game.effects().sweep().is_some());
        assert!(!game.effects().particles().is_empty());
    }

    #[test]
    fn moves_after_game_over_are_no_ops() {
        let mut game = controller();
        play(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let board = game.board().clone();

        assert_eq!(game.apply_move(2, 2), Err(MoveRejected::GameOver));
        assert_eq!(game.board(), &board);
        assert_eq!(game.scoreboard().wins_x, 1);
    }

    #[test]
    fn draw_is_scored() {
        let mut game = controller();
        // X O X / X O O / O X X
        let outcome = play(
            &mut game,
            &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
        );
        assert_eq!(outcome, GameOutcome::Draw);
        assert_eq!(game.scoreboard(), Scoreboard { wins_x: 0, wins_o: 0, draws: 1 });
        assert!(game.effects().sweep().is_none());
    }

    #[test]
    fn restart_clears_board_and_effects_but_keeps_scores() {
        let mut game = controller();
        play(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        game.restart();

        assert_eq!(game.phase(), Phase::AwaitingMove(Player::X));
        assert!(game.board().cells().all(|(_, _, c)| c == Cell::Empty));
        assert!(game.effects().particles().is_empty());
        assert!(game.effects().sweep().is_none());
        assert_eq!(game.scoreboard().wins_x, 1);
    }

    #[test]
    fn restart_mid_game_hands_turn_back_to_x() {
        let mut game = controller();
        game.apply_move(2, 2).unwrap();
        game.restart();
        assert_eq!(game.phase(), Phase::AwaitingMove(Player::X));
        assert!(game.apply_move(2, 2).is_ok());
    }

    #[test]
    fn reset_scores_is_explicit() {
        let mut game = controller();
        play(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        game.restart();
        game.reset_scores();
        assert_eq!(game.scoreboard(), Scoreboard::default());
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(MoveRejected::GameOver.to_string(), "the game is already over");
        assert_eq!(
            MoveRejected::CellOccupied(CellOccupied { row: 1, col: 2 }).to_string(),
            "cell (1, 2) is already occupied"
        );
    }
}

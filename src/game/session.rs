use super::GameError;
use crate::chess_boards::chess_board::{ChessBoard, Color, Move};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    Over(Color),
}

/// Turn order, history and termination on top of a [`ChessBoard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    board: ChessBoard,
    current_side: Color,
    history: Vec<Move>,
    state: GameState,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            board: ChessBoard::new(),
            current_side: Color::White,
            history: Vec::new(),
            state: GameState::InProgress,
        }
    }

    /// Rebuilds a game from the starting layout by replaying `moves`.
    pub fn replay<I: IntoIterator<Item = Move>>(moves: I) -> Result<Self, GameError> {
        let mut session = Self::new();
        for mv in moves {
            session.make_move(mv)?;
        }
        Ok(session)
    }

    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    /// Direct access for setting up positions. Call [`Self::evaluate_termination`]
    /// after editing.
    pub fn board_mut(&mut self) -> &mut ChessBoard {
        &mut self.board
    }

    pub fn current_side(&self) -> Color {
        self.current_side
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, GameState::Over(_))
    }

    pub fn winner(&self) -> Option<Color> {
        match self.state {
            GameState::Over(winner) => Some(winner),
            GameState::InProgress => None,
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.all_legal_moves(self.current_side)
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    fn check_move(&self, mv: Move) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let piece = self.board.piece_at(mv.from).ok_or(GameError::EmptySquare(mv.from))?;
        if piece.color != self.current_side {
            return Err(GameError::WrongSide(mv));
        }
        if !piece.is_legal_move(mv.from, mv.to, &self.board) {
            return Err(GameError::IllegalMove(mv));
        }
        Ok(())
    }

    /// Validates and commits `mv` for the side to move, then hands the turn over.
    pub fn make_move(&mut self, mv: Move) -> Result<GameState, GameError> {
        self.check_move(mv)?;

        self.board.apply(mv);
        self.history.push(mv);
        self.current_side = self.current_side.opposite();
        debug!("{} played {}", self.current_side.opposite(), mv);

        Ok(self.evaluate_termination())
    }

    pub fn make_move_algebraic(&mut self, algebraic: &str) -> Result<GameState, GameError> {
        let mv = Move::from_algebraic(algebraic).map_err(GameError::InvalidMove)?;
        self.make_move(mv)
    }

    /// Scans the board for both kings. A side without one has lost.
    pub fn evaluate_termination(&mut self) -> GameState {
        let state = if !self.board.king_present(Color::White) {
            GameState::Over(Color::Black)
        } else if !self.board.king_present(Color::Black) {
            GameState::Over(Color::White)
        } else {
            GameState::InProgress
        };
        if state != self.state {
            if let GameState::Over(winner) = state {
                info!("game over after {} moves, {} wins", self.history.len(), winner);
            }
        }
        self.state = state;
        state
    }

    /// Takes back the last move by replaying the rest of the history on a fresh board,
    /// so captured pieces come back too.
    pub fn take_back(&mut self) -> Option<Move> {
        let (&last, rest) = self.history.split_last()?;
        match Self::replay(rest.iter().copied()) {
            Ok(session) => {
                *self = session;
                Some(last)
            }
            Err(_) => None,
        }
    }

    /// Space separated history in coordinate notation, as the engine protocol expects.
    pub fn uci_move_list(&self) -> String {
        self.history.iter().map(Move::as_algebraic).collect::<Vec<_>>().join(" ")
    }
}

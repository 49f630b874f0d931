use crate::chess_boards::chess_board::{ChessField, Move};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A king has been taken; the session accepts no more moves.
    GameOver,
    /// Nothing stands on the start square.
    EmptySquare(ChessField),
    /// The piece on the start square belongs to the side not on move.
    WrongSide(Move),
    /// The piece cannot reach the destination.
    IllegalMove(Move),
    /// Text that does not encode a move.
    InvalidMove(String),
    /// A saved game that cannot be decoded or replayed.
    MalformedRecord(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::GameOver => write!(f, "the game is over"),
            GameError::EmptySquare(field) => write!(f, "no piece on {field}"),
            GameError::WrongSide(mv) => write!(f, "{mv}: not your piece"),
            GameError::IllegalMove(mv) => write!(f, "{mv} is not a legal move"),
            GameError::InvalidMove(text) => write!(f, "invalid move: {text}"),
            GameError::MalformedRecord(reason) => write!(f, "malformed saved game: {reason}"),
        }
    }
}

impl std::error::Error for GameError {}

pub mod chess_boards;
pub mod engines;
pub mod game;

pub use chess_boards::chess_board::{ChessBoard, ChessField, Color, Move, Piece, PieceType, Square};
pub use game::{GameError, GameSession, GameState, SavedGame};

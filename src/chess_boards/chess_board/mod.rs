pub mod fen;
pub mod model;
pub use model::{to_algebraic_square, ChessField, Color, Move, Piece, PieceType, Square};

mod chess_board;
mod move_generation;
#[cfg(test)]
pub mod test_utils;
pub use chess_board::ChessBoard;
pub use move_generation::is_path_clear;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convertion_method() {
        assert_eq!(ChessField::from_algebraic("b2"), Ok(ChessField::new(1, 6)));
        assert_eq!(ChessField::from_algebraic("b2").unwrap().as_algebraic(), "b2");
        assert_eq!(ChessField::from_algebraic("a8"), Ok(ChessField::new(0, 0)));
        assert_eq!(Move::from_algebraic("e2e4").unwrap().as_algebraic(), "e2e4");
        assert_eq!(to_algebraic_square(7, 7), "h1");
    }

    #[test]
    fn test_short_game_on_bare_board() {
        let mut board = ChessBoard::new();
        for mv in ["e2e4", "e7e5", "d1h5", "b8c6", "h5f7"] {
            let mv = Move::from_algebraic(mv).unwrap();
            let piece = *board.piece_at(mv.from).unwrap();
            assert!(piece.is_legal_move(mv.from, mv.to, &board), "{}", mv);
            board.apply(mv);
        }
        // Queen took f7; the king may now take it back.
        let king = ChessField::from_algebraic("e8").unwrap();
        let queen = ChessField::from_algebraic("f7").unwrap();
        assert!(board.piece_at(king).unwrap().is_legal_move(king, queen, &board));
        assert_eq!(board.pieces_with_coordinates().count(), 31);
    }
}

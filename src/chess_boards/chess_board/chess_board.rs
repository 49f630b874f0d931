use super::{fen, ChessField, Color, Move, Piece, PieceType, Square};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessBoard {
    squares: [[Square; 8]; 8],
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessBoard {
    /// Creates a board in the standard starting layout.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for color in [Color::Black, Color::White] {
            let home = color.home_row() as usize;
            let pawns = color.pawn_start_row() as usize;
            for file in 0..8 {
                board.squares[pawns][file].place(Some(Piece::new(color, PieceType::Pawn)));
                board.squares[home][file].place(Some(Piece::new(color, BACK_RANK[file])));
            }
        }
        board
    }

    /// Creates an empty chess board
    pub fn empty() -> Self {
        let mut squares = [[Square::new(ChessField::new(0, 0)); 8]; 8];
        for field in ChessField::all() {
            squares[field.row as usize][field.file as usize] = Square::new(field);
        }
        Self { squares }
    }

    /// Delegates FEN parsing to the `fen` module.
    pub fn from_fen(fen: &str) -> Result<(Self, Color), String> {
        fen::from_fen(fen)
    }

    pub fn to_fen(&self, active_color: Color) -> String {
        fen::to_fen(self, active_color)
    }

    /// Out-of-range coordinates give `None`.
    pub fn square_at(&self, file: i32, row: i32) -> Option<&Square> {
        ChessField::try_new(file, row).map(|field| self.square(field))
    }

    pub fn square(&self, field: ChessField) -> &Square {
        &self.squares[field.row as usize][field.file as usize]
    }

    pub fn square_mut(&mut self, field: ChessField) -> &mut Square {
        &mut self.squares[field.row as usize][field.file as usize]
    }

    pub fn piece_at(&self, field: ChessField) -> Option<&Piece> {
        self.square(field).occupant()
    }

    pub fn place(&mut self, field: ChessField, piece: Option<Piece>) {
        self.square_mut(field).place(piece);
    }

    /// Returns an iterator over all pieces on the chessboard along with their coordinates.
    pub fn pieces_with_coordinates(&self) -> impl Iterator<Item = (ChessField, &Piece)> {
        self.squares
            .iter()
            .flatten()
            .filter_map(|square| square.occupant().map(|piece| (square.field(), piece)))
    }

    pub fn king_present(&self, color: Color) -> bool {
        self.pieces_with_coordinates()
            .any(|(_, piece)| piece.kind == PieceType::King && piece.color == color)
    }

    /// Moves whatever stands on `mv.from` to `mv.to`. Legality is the caller's business;
    /// a piece on `mv.to` is captured and dropped.
    pub fn apply(&mut self, mv: Move) {
        let mut piece = self.square_mut(mv.from).take();
        if let Some(piece) = piece.as_mut() {
            piece.on_move_committed();
        }
        self.square_mut(mv.to).place(piece);
    }

    /// Moves whatever stands on `mv.to` back to `mv.from`. A piece captured by the
    /// matching `apply` is not restored, since `Move` does not remember it.
    pub fn undo(&mut self, mv: Move) {
        let piece = self.square_mut(mv.to).take();
        self.square_mut(mv.from).place(piece);
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();

        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for row in 0..8 {
            board_representation.push_str(&format!("{} │", 8 - row));
            for file in 0..8 {
                let square = match self.squares[row][file].occupant() {
                    Some(piece) => piece.to_char(),
                    None => ' ',
                };
                board_representation.push_str(&format!(" {} │", square));
            }
            board_representation.push_str(&format!(" {}\n", 8 - row));

            // Add horizontal grid border between rows
            if row < 7 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_at(board: &ChessBoard, file: i32, row: i32) -> Option<(Color, PieceType)> {
        board
            .square_at(file, row)
            .and_then(|s| s.occupant())
            .map(|p| (p.color, p.kind))
    }

    #[test]
    fn test_initial_layout() {
        let board = ChessBoard::new();
        for file in 0..8 {
            assert_eq!(kind_at(&board, file, 6), Some((Color::White, PieceType::Pawn)));
            assert_eq!(kind_at(&board, file, 1), Some((Color::Black, PieceType::Pawn)));
            for row in 2..6 {
                assert_eq!(kind_at(&board, file, row), None);
            }
        }
        assert_eq!(kind_at(&board, 4, 7), Some((Color::White, PieceType::King)));
        assert_eq!(kind_at(&board, 4, 0), Some((Color::Black, PieceType::King)));
        assert_eq!(kind_at(&board, 3, 7), Some((Color::White, PieceType::Queen)));
        assert_eq!(kind_at(&board, 0, 0), Some((Color::Black, PieceType::Rook)));
        assert_eq!(kind_at(&board, 6, 7), Some((Color::White, PieceType::Knight)));
        assert_eq!(board.pieces_with_coordinates().count(), 32);
    }

    #[test]
    fn test_square_identity() {
        let board = ChessBoard::new();
        for field in ChessField::all() {
            assert_eq!(board.square(field).field(), field);
        }
    }

    #[test]
    fn test_square_at_out_of_range() {
        let board = ChessBoard::new();
        assert!(board.square_at(-1, 0).is_none());
        assert!(board.square_at(0, 8).is_none());
        assert!(board.square_at(8, 8).is_none());
        assert!(board.square_at(7, 7).is_some());
    }

    #[test]
    fn test_apply_and_undo_roundtrip() {
        let mut board = ChessBoard::new();
        let before = board.clone();
        let mv = Move::new(1, 7, 2, 5);
        board.apply(mv);
        assert!(board.piece_at(mv.from).is_none());
        assert_eq!(board.piece_at(mv.to).map(|p| p.kind), Some(PieceType::Knight));
        board.undo(mv);
        assert_eq!(board, before);
    }

    #[test]
    fn test_undo_keeps_pawn_marked_as_moved() {
        let mut board = ChessBoard::new();
        let mv = Move::new(0, 6, 0, 5);
        board.apply(mv);
        board.undo(mv);
        let pawn = board.piece_at(mv.from).unwrap();
        assert_eq!((pawn.color, pawn.kind), (Color::White, PieceType::Pawn));
        assert!(pawn.has_moved());
        assert!(board.piece_at(mv.to).is_none());
    }

    #[test]
    fn test_undo_does_not_restore_capture() {
        let mut board = ChessBoard::new();
        // Black rook on a8 "takes" the pawn on a7 without any legality check.
        let mv = Move::new(0, 0, 0, 1);
        board.apply(mv);
        assert_eq!(board.pieces_with_coordinates().count(), 31);
        board.undo(mv);
        assert_eq!(kind_at(&board, 0, 0), Some((Color::Black, PieceType::Rook)));
        assert_eq!(kind_at(&board, 0, 1), None);
        assert_eq!(board.pieces_with_coordinates().count(), 31);
    }

    #[test]
    fn test_apply_from_empty_square_clears_destination() {
        let mut board = ChessBoard::new();
        board.apply(Move::new(4, 4, 4, 6));
        assert!(board.piece_at(ChessField::new(4, 6)).is_none());
    }

    #[test]
    fn test_king_present() {
        let mut board = ChessBoard::new();
        assert!(board.king_present(Color::White));
        board.place(ChessField::new(4, 7), None);
        assert!(!board.king_present(Color::White));
        assert!(board.king_present(Color::Black));
    }

    #[test]
    fn test_render() {
        let rendered = ChessBoard::new().render_to_string();
        assert!(rendered.contains("8 │ r │ n │ b │ q │ k │ b │ n │ r │ 8"));
        assert!(rendered.contains("1 │ R │ N │ B │ Q │ K │ B │ N │ R │ 1"));
    }
}

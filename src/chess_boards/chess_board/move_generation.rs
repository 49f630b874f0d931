use super::{ChessBoard, ChessField, Color, Move, Piece, PieceType};

impl Piece {
    /// Whether this piece may go from `from` to `to` on `board`. Never mutates anything;
    /// `from` is taken to be where the piece stands.
    pub fn is_legal_move(&self, from: ChessField, to: ChessField, board: &ChessBoard) -> bool {
        if from == to || self.is_same_color_at(to, board) {
            return false;
        }
        let dx = to.file as i32 - from.file as i32;
        let dy = to.row as i32 - from.row as i32;

        match self.kind {
            PieceType::Pawn => self.is_legal_pawn_move(from, to, dx, dy, board),
            PieceType::Knight => is_knight_jump(dx, dy),
            PieceType::Bishop => is_diagonal(dx, dy) && is_path_clear(from, to, board),
            PieceType::Rook => is_straight(dx, dy) && is_path_clear(from, to, board),
            PieceType::Queen => (is_diagonal(dx, dy) || is_straight(dx, dy)) && is_path_clear(from, to, board),
            PieceType::King => dx.abs() <= 1 && dy.abs() <= 1,
        }
    }

    fn is_same_color_at(&self, field: ChessField, board: &ChessBoard) -> bool {
        board.piece_at(field).is_some_and(|p| p.color == self.color)
    }

    fn is_legal_pawn_move(&self, from: ChessField, to: ChessField, dx: i32, dy: i32, board: &ChessBoard) -> bool {
        let forward = self.color.forward() as i32;

        // Regular forward move
        if dx == 0 && dy == forward {
            return board.piece_at(to).is_none();
        }

        // Double move from start position
        if dx == 0 && dy == 2 * forward {
            let Some(between) = from.offset(0, forward) else {
                return false;
            };
            return !self.has_moved()
                && from.row == self.color.pawn_start_row()
                && board.piece_at(between).is_none()
                && board.piece_at(to).is_none();
        }

        // Capture diagonally
        if dx.abs() == 1 && dy == forward {
            return board.piece_at(to).is_some_and(|p| p.color != self.color);
        }

        false
    }
}

fn is_knight_jump(dx: i32, dy: i32) -> bool {
    matches!((dx.abs(), dy.abs()), (1, 2) | (2, 1))
}

fn is_diagonal(dx: i32, dy: i32) -> bool {
    dx.abs() == dy.abs() && dx != 0
}

fn is_straight(dx: i32, dy: i32) -> bool {
    (dx == 0) != (dy == 0)
}

/// Every square strictly between `from` and `to` must be empty. Only meaningful for
/// fields on a shared line or diagonal.
pub fn is_path_clear(from: ChessField, to: ChessField, board: &ChessBoard) -> bool {
    let step_x = (to.file as i32 - from.file as i32).signum();
    let step_y = (to.row as i32 - from.row as i32).signum();

    let mut current = from.offset(step_x, step_y);
    while let Some(field) = current {
        if field == to {
            return true;
        }
        if board.piece_at(field).is_some() {
            return false;
        }
        current = field.offset(step_x, step_y);
    }
    // Walked off the board without meeting `to`: not on a line.
    false
}

impl ChessBoard {
    /// Every move of `color` that passes the piece predicates. No check filtering.
    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);

        for (from, piece) in self.pieces_with_coordinates() {
            if piece.color != color {
                continue;
            }
            moves.extend(self.legal_moves_from(from, piece));
        }

        moves
    }

    pub fn legal_moves_from_field(&self, from: ChessField) -> Vec<Move> {
        match self.piece_at(from) {
            Some(piece) => self.legal_moves_from(from, piece),
            None => Vec::new(),
        }
    }

    fn legal_moves_from(&self, from: ChessField, piece: &Piece) -> Vec<Move> {
        ChessField::all()
            .filter(|&to| piece.is_legal_move(from, to, self))
            .map(|to| Move::between(from, to))
            .collect()
    }
}

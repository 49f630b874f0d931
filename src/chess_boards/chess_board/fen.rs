use super::ChessBoard;
use super::{ChessField, Color, Piece};

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// Parses the placement and active color of a FEN string. Castling, en passant and the
/// clocks have no meaning in this game and are ignored when present.
pub fn from_fen(fen: &str) -> Result<(ChessBoard, Color), String> {
    let mut board = ChessBoard::empty();
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 6 {
        return Err(String::from("Invalid FEN string: expected between 2 and 6 parts."));
    }

    // Parse board squares
    let rows: Vec<&str> = parts[0].split('/').collect();
    if rows.len() != 8 {
        return Err(String::from("Invalid FEN string: expected 8 rows"));
    }

    for (row_index, row) in rows.iter().enumerate() {
        let mut file_index = 0;

        for c in row.chars() {
            if file_index > 7 {
                return Err(String::from("Invalid FEN string: too many columns"));
            }
            if let Some(skip) = c.to_digit(10) {
                file_index += skip as usize;
            } else if let Some(piece) = Piece::from_char(c) {
                board.place(ChessField::new(file_index as u8, row_index as u8), Some(piece));
                file_index += 1;
            } else {
                return Err(format!("Invalid piece character in FEN string: {}", c));
            }
        }
        if file_index != 8 {
            return Err(format!("Wrong number of squares in row {} when parsing FEN", row_index));
        }
    }

    // Parse active color
    let active_color = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(String::from("Invalid FEN string: invalid active color.")),
    };

    Ok((board, active_color))
}

pub fn to_fen(board: &ChessBoard, active_color: Color) -> String {
    let mut board_representation = String::new();

    for row in 0..8u8 {
        let mut empty_count = 0;

        for file in 0..8u8 {
            match board.piece_at(ChessField::new(file, row)) {
                Some(piece) => {
                    if empty_count > 0 {
                        board_representation.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    board_representation.push(piece.to_char());
                }
                None => {
                    empty_count += 1;
                }
            }
        }

        if empty_count > 0 {
            board_representation.push_str(&empty_count.to_string());
        }

        if row < 7 {
            board_representation.push('/');
        }
    }

    let active_color = if active_color == Color::White { "w" } else { "b" };

    format!("{} {} - - 0 1", board_representation, active_color)
}

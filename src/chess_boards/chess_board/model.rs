use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn step. White advances toward row 0.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn home_row(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
    moved: bool,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Self {
            color,
            kind,
            moved: false,
        }
    }

    /// Only pawns track this; it gates the double step.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Called by the board once the piece has actually been relocated.
    pub fn on_move_committed(&mut self) {
        if self.kind == PieceType::Pawn {
            self.moved = true;
        }
    }

    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        if self.color == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(color, kind))
    }
}

/// A board coordinate. `row` 0 is Black's home rank, which reads as rank 8.
/// Outside the crate a field can only be built through the range-checked
/// constructors, so every `ChessField` is on the board.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct ChessField {
    pub(crate) file: u8,
    pub(crate) row: u8,
}

impl ChessField {
    pub(crate) fn new(file: u8, row: u8) -> Self {
        debug_assert!(file < 8 && row < 8, "field out of range: ({}, {})", file, row);
        Self { file, row }
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn try_new(file: i32, row: i32) -> Option<Self> {
        if (0..8).contains(&file) && (0..8).contains(&row) {
            Some(Self {
                file: file as u8,
                row: row as u8,
            })
        } else {
            None
        }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Option<Self> {
        Self::try_new(self.file as i32 + dx, self.row as i32 + dy)
    }

    pub fn all() -> impl Iterator<Item = ChessField> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |file| ChessField { file, row }))
    }

    pub fn from_algebraic(algebraic: &str) -> Result<Self, String> {
        let mut chars = algebraic.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("Invalid square: {}", algebraic));
        };
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(format!("Invalid square: {}", algebraic));
        }
        Ok(Self {
            file: file as u8 - b'a',
            row: b'8' - rank as u8,
        })
    }

    pub fn as_algebraic(&self) -> String {
        to_algebraic_square(self.file, self.row)
    }
}

impl TryFrom<(u8, u8)> for ChessField {
    type Error = String;

    fn try_from((file, row): (u8, u8)) -> Result<Self, Self::Error> {
        ChessField::try_new(file as i32, row as i32).ok_or_else(|| format!("field out of range: ({}, {})", file, row))
    }
}

impl From<ChessField> for (u8, u8) {
    fn from(field: ChessField) -> Self {
        (field.file, field.row)
    }
}

impl fmt::Display for ChessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

/// A cell of the board and whatever stands on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    field: ChessField,
    occupant: Option<Piece>,
}

impl Square {
    pub fn new(field: ChessField) -> Self {
        Self { field, occupant: None }
    }

    pub fn field(&self) -> ChessField {
        self.field
    }

    pub fn occupant(&self) -> Option<&Piece> {
        self.occupant.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Replaces the occupant. A piece already standing here is dropped.
    pub fn place(&mut self, piece: Option<Piece>) {
        self.occupant = piece;
    }

    pub fn take(&mut self) -> Option<Piece> {
        self.occupant.take()
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Move {
    pub from: ChessField,
    pub to: ChessField,
}

impl Move {
    // Create a new Move
    pub(crate) fn new(from_file: u8, from_row: u8, to_file: u8, to_row: u8) -> Self {
        Self {
            from: ChessField::new(from_file, from_row),
            to: ChessField::new(to_file, to_row),
        }
    }

    pub fn between(from: ChessField, to: ChessField) -> Self {
        Self { from, to }
    }

    pub fn as_algebraic(&self) -> String {
        format!(
            "{}{}",
            to_algebraic_square(self.from.file, self.from.row),
            to_algebraic_square(self.to.file, self.to.row)
        )
    }

    pub fn from_algebraic(algebraic: &str) -> Result<Self, String> {
        if algebraic.len() != 4 || !algebraic.is_ascii() {
            return Err(format!("Invalid move: {}", algebraic));
        }
        let from = ChessField::from_algebraic(&algebraic[0..2])?;
        let to = ChessField::from_algebraic(&algebraic[2..4])?;
        Ok(Self { from, to })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_algebraic(s.trim())
    }
}

pub fn to_algebraic_square(file: u8, row: u8) -> String {
    let file = (b'a' + file) as char; // Convert 0-7 file index to 'a'-'h'
    let rank = 8 - row; // Row 0 is rank 8
    format!("{}{}", file, rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uci_encoding() {
        let mv = Move::new(0, 6, 0, 4);
        assert_eq!(mv.as_algebraic(), "a2a4");
        assert_eq!(Move::from_algebraic("a2a4"), Ok(mv));
        assert_eq!("h8a1".parse::<Move>(), Ok(Move::new(7, 0, 0, 7)));
    }

    #[test]
    fn test_invalid_move_strings() {
        for s in ["", "a2", "a2a", "a2a4q", "i2a4", "a9a4", "a0a4", "A2a4", "ä2a4"] {
            assert!(Move::from_algebraic(s).is_err(), "{} should not parse", s);
        }
    }

    #[test]
    fn test_field_range() {
        assert_eq!(ChessField::try_new(7, 7), Some(ChessField::new(7, 7)));
        assert_eq!(ChessField::try_new(-1, 0), None);
        assert_eq!(ChessField::try_new(0, 8), None);
        assert_eq!(ChessField::new(3, 3).offset(5, 0), None);
        assert_eq!(ChessField::all().count(), 64);
    }

    #[test]
    fn test_out_of_range_fields_are_refused() {
        assert_eq!(ChessField::try_from((8, 0)), Err("field out of range: (8, 0)".to_string()));
        assert!(ChessField::try_from((0, 255)).is_err());
        assert_eq!(ChessField::try_from((4, 6)).map(|f| (f.file(), f.row())), Ok((4, 6)));
        assert!(serde_json::from_str::<Move>(r#"{"from":[0,6],"to":[0,8]}"#).is_err());
        assert_eq!(
            serde_json::from_str::<Move>(r#"{"from":[0,6],"to":[0,4]}"#).ok(),
            Some(Move::between(ChessField::new(0, 6), ChessField::new(0, 4)))
        );
    }

    #[test]
    fn test_field_serializes_as_pair() {
        let json = serde_json::to_string(&ChessField::new(4, 6)).unwrap();
        assert_eq!(json, "[4,6]");
        assert!(serde_json::from_str::<ChessField>("[8,0]").is_err());
    }

    #[test]
    fn test_commit_hook_only_marks_pawns() {
        let mut pawn = Piece::new(Color::Black, PieceType::Pawn);
        let mut rook = Piece::new(Color::Black, PieceType::Rook);
        pawn.on_move_committed();
        rook.on_move_committed();
        assert!(pawn.has_moved());
        assert!(!rook.has_moved());
    }

    #[test]
    fn test_place_drops_previous_occupant() {
        let mut square = Square::new(ChessField::new(0, 0));
        square.place(Some(Piece::new(Color::Black, PieceType::Rook)));
        square.place(Some(Piece::new(Color::White, PieceType::Queen)));
        assert_eq!(square.occupant().map(|p| p.kind), Some(PieceType::Queen));
        assert_eq!(square.take().map(|p| p.color), Some(Color::White));
        assert!(square.is_empty());
    }
}

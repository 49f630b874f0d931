//! Saved games. Only the move list and the side to move are stored; loading replays the
//! moves from the starting layout instead of trusting a board snapshot.

use super::{GameError, GameSession};
use crate::chess_boards::chess_board::{Color, Move};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub moves: Vec<Move>,
    pub side_to_move: Color,
}

impl SavedGame {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            moves: session.history().to_vec(),
            side_to_move: session.current_side(),
        }
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string(self).map_err(|e| GameError::MalformedRecord(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::MalformedRecord(e.to_string()))
    }

    /// Replays every stored move through the normal move path. The stored side to
    /// move has to agree with the side the replay ends on.
    pub fn restore(&self) -> Result<GameSession, GameError> {
        let mut session = GameSession::new();
        for (ply, &mv) in self.moves.iter().enumerate() {
            session.make_move(mv).map_err(|e| {
                warn!("saved game does not replay at ply {}: {}", ply + 1, e);
                GameError::MalformedRecord(format!("move {} ({}): {}", ply + 1, mv, e))
            })?;
        }
        if session.current_side() != self.side_to_move {
            warn!(
                "saved game says {} to move, replay ends with {} to move",
                self.side_to_move,
                session.current_side()
            );
            return Err(GameError::MalformedRecord(format!(
                "{} to move after {} moves, record says {}",
                session.current_side(),
                self.moves.len(),
                self.side_to_move
            )));
        }
        debug!("restored {} moves, {} to move", self.moves.len(), self.side_to_move);
        Ok(session)
    }
}

impl GameSession {
    pub fn to_record(&self) -> Result<String, GameError> {
        SavedGame::from_session(self).to_json()
    }

    pub fn from_record(record: &str) -> Result<Self, GameError> {
        SavedGame::from_json(record)?.restore()
    }

    /// Replaces this session with the saved one. On error nothing changes.
    pub fn load_record(&mut self, record: &str) -> Result<(), GameError> {
        *self = Self::from_record(record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    fn played(moves: &[&str]) -> GameSession {
        let mut session = GameSession::new();
        for mv in moves {
            session.make_move_algebraic(mv).unwrap();
        }
        session
    }

    #[test]
    fn test_record_format() {
        let record = played(&["a2a4"]).to_record().unwrap();
        assert_eq!(record, r#"{"moves":[{"from":[0,6],"to":[0,4]}],"side_to_move":"Black"}"#);
    }

    #[test]
    fn test_save_and_load() {
        let session = played(&["e2e4", "e7e5", "g1f3", "b8c6", "f3e5", "c6e5"]);
        let record = session.to_record().unwrap();

        let mut loaded = GameSession::new();
        loaded.load_record(&record).unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.board().pieces_with_coordinates().count(), 30);
    }

    #[test]
    fn test_load_keeps_state_on_bad_json() {
        let mut session = played(&["d2d4"]);
        let before = session.clone();
        assert!(matches!(session.load_record("not json"), Err(GameError::MalformedRecord(_))));
        assert!(matches!(
            session.load_record(r#"{"moves":[{"from":[0,9],"to":[0,4]}],"side_to_move":"Black"}"#),
            Err(GameError::MalformedRecord(_))
        ));
        assert!(matches!(session.load_record(r#"{"moves":[]}"#), Err(GameError::MalformedRecord(_))));
        assert_eq!(session, before);
    }

    #[test]
    fn test_load_rejects_illegal_history() {
        let mut session = played(&["d2d4"]);
        let before = session.clone();
        // The third move tries to double-step a pawn that has already moved.
        let record = r#"{"moves":[{"from":[0,6],"to":[0,5]},{"from":[0,1],"to":[0,2]},{"from":[0,5],"to":[0,3]}],"side_to_move":"Black"}"#;
        let err = session.load_record(record).unwrap_err();
        assert!(err.to_string().contains("move 3"), "{}", err);
        assert_eq!(session, before);
    }

    #[test]
    fn test_side_to_move_must_match_replay() {
        let mut session = played(&["d2d4"]);
        let before = session.clone();
        let record = r#"{"moves":[{"from":[4,6],"to":[4,4]}],"side_to_move":"White"}"#;
        let err = session.load_record(record).unwrap_err();
        assert!(matches!(err, GameError::MalformedRecord(_)));
        assert!(err.to_string().contains("record says White"), "{}", err);
        assert_eq!(session, before);

        let record = r#"{"moves":[],"side_to_move":"Black"}"#;
        assert!(GameSession::from_record(record).is_err());
        let record = r#"{"moves":[],"side_to_move":"White"}"#;
        assert_eq!(GameSession::from_record(record), Ok(GameSession::new()));
    }

    #[test]
    fn test_load_play_save_reload() {
        let record = r#"{"moves":[{"from":[4,6],"to":[4,4]}],"side_to_move":"Black"}"#;
        let mut session = GameSession::from_record(record).unwrap();
        session.make_move_algebraic("e7e5").unwrap();
        session.make_move_algebraic("d2d4").unwrap();

        let reloaded = GameSession::from_record(&session.to_record().unwrap()).unwrap();
        assert_eq!(reloaded, session);
        assert_eq!(reloaded.uci_move_list(), "e2e4 e7e5 d2d4");

        let mut taken_back = reloaded.clone();
        assert_eq!(taken_back.take_back(), Some(Move::from_algebraic("d2d4").unwrap()));
        assert_eq!(taken_back.uci_move_list(), "e2e4 e7e5");
        assert_eq!(taken_back.current_side(), Color::White);
    }

    #[test]
    fn test_finished_game_roundtrip() {
        let session = played(&["e2e4", "f7f6", "d1h5", "g7g6", "h5g6", "a7a6", "g6e8"]);
        let loaded = GameSession::from_record(&session.to_record().unwrap()).unwrap();
        assert_eq!(loaded.state(), GameState::Over(Color::White));

        let mut moves = loaded.history().to_vec();
        moves.push(Move::from_algebraic("a6a5").unwrap());
        let record = SavedGame {
            moves,
            side_to_move: Color::White,
        };
        assert!(record.restore().is_err());
    }
}

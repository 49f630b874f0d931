use crate::chess_boards::chess_board::Move;
use crate::game::GameSession;
use log::warn;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

pub mod random;
pub mod uci;

pub use random::RandomEngine;
pub use uci::UciEngine;

/// Something that proposes a move for the side to move. `None` means no move is
/// available, whatever the reason.
pub trait ChessEngine {
    fn name(&self) -> &str;
    fn find_best_move(&mut self, session: &GameSession) -> Option<Move>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Executable speaking UCI. Without one the random mover is used.
    pub path: Option<PathBuf>,
    pub movetime_ms: u64,
    pub skill_level: Option<u8>,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            movetime_ms: 2000,
            skill_level: None,
            seed: 42,
        }
    }
}

/// Asks `engine` for a move on a background thread so the caller can keep serving
/// input. The receiver yields exactly one answer unless the engine lock is poisoned.
pub fn find_best_move_in_background(
    engine: Arc<Mutex<dyn ChessEngine + Send>>,
    session: GameSession,
) -> Receiver<Option<Move>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let best_move = match engine.lock() {
            Ok(mut engine) => engine.find_best_move(&session),
            Err(_) => {
                warn!("engine lock poisoned");
                return;
            }
        };
        // The caller may have given up waiting.
        let _ = sender.send(best_move);
    });
    receiver
}

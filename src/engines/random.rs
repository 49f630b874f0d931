use super::ChessEngine;
use crate::chess_boards::chess_board::Move;
use crate::game::GameSession;
use rand::prelude::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Plays a uniformly random legal move. Seeded, so games are reproducible.
pub struct RandomEngine {
    rng: Pcg64,
}

impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl ChessEngine for RandomEngine {
    fn name(&self) -> &str {
        "Random Mover"
    }

    fn find_best_move(&mut self, session: &GameSession) -> Option<Move> {
        if session.is_over() {
            return None;
        }
        session.legal_moves().choose(&mut self.rng).copied()
    }
}

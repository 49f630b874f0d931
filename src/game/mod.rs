mod error;
pub mod record;
mod session;

pub use error::GameError;
pub use record::SavedGame;
pub use session::{GameSession, GameState};

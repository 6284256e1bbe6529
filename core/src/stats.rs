use serde::{Deserialize, Serialize};

use crate::*;

/// Scalar summary of a [`GameState`] for presentation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub status: GameStatus,
    pub flags_left: CellCount,
    pub revealed_cells: CellCount,
    pub mistakes: u32,
    pub hints_available: u8,
    pub time_ms: Millis,
}

impl From<&GameState> for GameStats {
    fn from(state: &GameState) -> Self {
        Self {
            status: state.status(),
            flags_left: state.flags_left(),
            revealed_cells: state.revealed_cells(),
            mistakes: state.mistakes(),
            hints_available: state.hints_available(),
            time_ms: state.time_ms(),
        }
    }
}

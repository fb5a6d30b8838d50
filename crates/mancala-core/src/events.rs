//! Events produced by applying a move.
//!
//! A successful move returns the events in the order they happened:
//! sowing first, then an optional capture, then the turn outcome, and
//! finally `GameFinished` if the move ended the game.

use crate::board::{Player, Position};
use crate::game::GamePhase;
use serde::{Deserialize, Serialize};

/// Events that occur as a result of a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Stones were lifted from a pit and sown around the board
    StonesSown {
        player: Player,
        pit: Position,
        stones: u32,
        /// Where the last stone landed
        last_position: Position,
    },

    /// The last stone landed in an empty own pit and took the opposite pit
    Captured {
        player: Player,
        pit: Position,
        opposite_pit: Position,
        /// Total moved into the store, the landing stone included
        stones: u32,
    },

    /// Last stone landed in the mover's store
    ExtraTurn { player: Player },

    /// Turn passed to the opponent
    TurnPassed { from: Player, to: Player },

    /// One side ran out of stones and the board was swept into the stores
    GameFinished {
        phase: GamePhase,
        store_a: u32,
        store_b: u32,
    },
}

impl GameEvent {
    /// The player the event concerns, if any
    pub fn player(&self) -> Option<Player> {
        match self {
            GameEvent::StonesSown { player, .. }
            | GameEvent::Captured { player, .. }
            | GameEvent::ExtraTurn { player } => Some(*player),
            GameEvent::TurnPassed { from, .. } => Some(*from),
            GameEvent::GameFinished { .. } => None,
        }
    }
}

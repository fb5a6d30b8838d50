//! Board geometry and pit storage.
//!
//! This module contains:
//! - The two players and the pits each of them owns
//! - Position lookups (stores, owners, opposite pits)
//! - `Board`, the fixed array of stone counters for all 14 positions
//!
//! Positions are numbered 1..=14 going around the board:
//!
//! ```text
//!        13  12  11  10   9   8
//!   14                           7
//!         1   2   3   4   5   6
//! ```
//!
//! Player A owns pits 1..=6 and store 7, player B owns pits 8..=13 and store 14.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A board position, 1..=14
pub type Position = usize;

/// Number of positions on the board (12 small pits + 2 stores)
pub const POSITION_COUNT: usize = 14;

/// Lowest valid position
pub const FIRST_POSITION: Position = 1;

/// Highest valid position
pub const LAST_POSITION: Position = 14;

/// Player A's store
pub const STORE_A: Position = 7;

/// Player B's store
pub const STORE_B: Position = 14;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Owns pits 1-6 and store 7
    A,
    /// Owns pits 8-13 and store 14
    B,
}

impl Player {
    /// Both players, A first
    pub const ALL: [Player; 2] = [Player::A, Player::B];

    /// The small pits this player sows from
    pub fn pits(self) -> RangeInclusive<Position> {
        match self {
            Player::A => 1..=6,
            Player::B => 8..=13,
        }
    }

    /// This player's store
    pub fn store(self) -> Position {
        match self {
            Player::A => STORE_A,
            Player::B => STORE_B,
        }
    }

    /// The other player
    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// The store sowing must skip when this player moves
    pub fn opponent_store(self) -> Position {
        self.opponent().store()
    }

    /// Whether `position` is one of this player's small pits
    pub fn owns_pit(self, position: Position) -> bool {
        self.pits().contains(&position)
    }
}

/// Whether `position` is on the board at all
pub fn is_on_board(position: Position) -> bool {
    (FIRST_POSITION..=LAST_POSITION).contains(&position)
}

/// Whether `position` is either player's store
pub fn is_store(position: Position) -> bool {
    position == STORE_A || position == STORE_B
}

/// Whether `position` is one of the twelve sowing pits
pub fn is_small_pit(position: Position) -> bool {
    is_on_board(position) && !is_store(position)
}

/// The player a position belongs to.
///
/// Stores are attributed to their player, so `owner_of(7)` is A and
/// `owner_of(14)` is B.
pub fn owner_of(position: Position) -> Player {
    if (1..=STORE_A).contains(&position) {
        Player::A
    } else {
        Player::B
    }
}

/// The pit directly across the board from a small pit.
///
/// Only meaningful for small pits: 1↔13, 2↔12, ..., 6↔8.
pub fn opposite_pit(position: Position) -> Position {
    debug_assert!(is_small_pit(position), "no opposite for {position}");
    LAST_POSITION - position
}

/// The position after `position` in sowing order, wrapping 14 → 1
pub fn next_position(position: Position) -> Position {
    if position >= LAST_POSITION {
        FIRST_POSITION
    } else {
        position + 1
    }
}

/// Stone counts for every position on the board.
///
/// Stored as a fixed array indexed by `position - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pits: [u32; POSITION_COUNT],
}

impl Board {
    /// A board with `stones` in every small pit and empty stores
    pub fn new(stones: u32) -> Self {
        let mut pits = [stones; POSITION_COUNT];
        pits[STORE_A - 1] = 0;
        pits[STORE_B - 1] = 0;
        Self { pits }
    }

    /// A board from explicit counts, position 1 first
    pub fn from_counts(pits: [u32; POSITION_COUNT]) -> Self {
        Self { pits }
    }

    /// Stones at a position
    pub fn get(&self, position: Position) -> u32 {
        self.pits[position - 1]
    }

    /// Overwrite the stones at a position
    pub fn set(&mut self, position: Position, stones: u32) {
        self.pits[position - 1] = stones;
    }

    /// Add stones to a position
    pub fn add(&mut self, position: Position, stones: u32) {
        self.pits[position - 1] += stones;
    }

    /// Empty a position, returning what it held
    pub fn take(&mut self, position: Position) -> u32 {
        std::mem::take(&mut self.pits[position - 1])
    }

    /// Stones left in a player's small pits
    pub fn side_stones(&self, player: Player) -> u32 {
        player.pits().map(|p| self.get(p)).sum()
    }

    /// Whether all of a player's small pits are empty
    pub fn side_is_empty(&self, player: Player) -> bool {
        player.pits().all(|p| self.get(p) == 0)
    }

    /// Stones on the whole board, stores included
    pub fn total(&self) -> u32 {
        self.pits.iter().sum()
    }

    /// Counts in position order, position 1 first
    pub fn counts(&self) -> &[u32; POSITION_COUNT] {
        &self.pits
    }

    /// Iterate `(position, stones)` over the whole board
    pub fn iter(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        self.pits.iter().enumerate().map(|(i, &s)| (i + 1, s))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(6)
    }
}

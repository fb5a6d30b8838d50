//! Core game state machine.
//!
//! This module contains the `GameState` struct and the move engine: move
//! validation, sowing, capture, turn switching and end-of-game settlement.

use crate::board::{
    is_on_board, is_small_pit, is_store, next_position, opposite_pit, owner_of, Board, Player,
    Position, POSITION_COUNT,
};
use crate::events::GameEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stones per small pit in a standard game
pub const DEFAULT_INITIAL_STONES: u32 = 6;

/// Most stones a small pit may start with.
///
/// Keeps the board total (twelve pits' worth) far from `u32::MAX` and a
/// single sowing pass short.
pub const MAX_INITIAL_STONES: u32 = 1_000;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Fresh game, nobody has moved yet
    Created,
    /// At least one move has been made
    InProgress,
    /// Player A finished with more stones
    WonA,
    /// Player B finished with more stones
    WonB,
    /// Both stores finished level
    Tied,
}

impl GamePhase {
    /// Whether no further moves are accepted
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::WonA | GamePhase::WonB | GamePhase::Tied)
    }

    /// The winning player for a won phase
    pub fn winner(self) -> Option<Player> {
        match self {
            GamePhase::WonA => Some(Player::A),
            GamePhase::WonB => Some(Player::B),
            _ => None,
        }
    }

    /// Terminal phase for the given final store counts
    fn settled(store_a: u32, store_b: u32) -> Self {
        match store_a.cmp(&store_b) {
            std::cmp::Ordering::Greater => GamePhase::WonA,
            std::cmp::Ordering::Less => GamePhase::WonB,
            std::cmp::Ordering::Equal => GamePhase::Tied,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Created => "CREATED",
            GamePhase::InProgress => "IN_PROGRESS",
            GamePhase::WonA => "WON_A",
            GamePhase::WonB => "WON_B",
            GamePhase::Tied => "TIED",
        };
        f.write_str(name)
    }
}

/// Why a requested pit cannot be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalMove {
    #[error("Your selected pit is out of range.")]
    OutOfRange,

    #[error("You cannot move any stones from a store.")]
    FromStore,

    #[error("It is not your turn.")]
    NotYourTurn,

    #[error("You cannot move any stones from an empty pit.")]
    EmptyPit,
}

/// A starting stone count outside `1..=MAX_INITIAL_STONES`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Initial stones must be between 1 and {max}, got {0}", max = MAX_INITIAL_STONES)]
pub struct InvalidInitialStones(pub u32);

/// Check a starting stone count from outside the engine
pub fn validate_initial_stones(stones: u32) -> Result<u32, InvalidInitialStones> {
    if (1..=MAX_INITIAL_STONES).contains(&stones) {
        Ok(stones)
    } else {
        Err(InvalidInitialStones(stones))
    }
}

/// Errors that can occur when applying a move
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("{0}")]
    IllegalMove(#[from] IllegalMove),

    #[error(
        "Game is finished, result: player A store is {store_a}, player B store is {store_b}, {phase}"
    )]
    FinishedGame {
        store_a: u32,
        store_b: u32,
        phase: GamePhase,
    },
}

/// The complete state of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Stones at every position
    pub board: Board,
    /// Who moves next; `None` until the first move picks a side
    pub current_player: Option<Player>,
    /// Lifecycle phase
    pub phase: GamePhase,
}

impl GameState {
    /// Create a new game with `initial_stones` in each small pit.
    ///
    /// # Panics
    ///
    /// If `initial_stones` exceeds [`MAX_INITIAL_STONES`]. Use
    /// [`GameState::try_new`] for counts that come from a client.
    pub fn new(initial_stones: u32) -> Self {
        assert!(
            initial_stones <= MAX_INITIAL_STONES,
            "{} stones per pit is over the limit of {}",
            initial_stones,
            MAX_INITIAL_STONES
        );
        Self {
            board: Board::new(initial_stones),
            current_player: None,
            phase: GamePhase::Created,
        }
    }

    /// Create a new game, rejecting empty or oversized stone counts
    pub fn try_new(initial_stones: u32) -> Result<Self, InvalidInitialStones> {
        validate_initial_stones(initial_stones).map(Self::new)
    }

    /// Create a standard game with six stones per pit
    pub fn new_standard() -> Self {
        Self::new(DEFAULT_INITIAL_STONES)
    }

    /// Rebuild a game from explicit pit counts (position 1 first)
    pub fn with_pits(
        pits: [u32; POSITION_COUNT],
        current_player: Option<Player>,
        phase: GamePhase,
    ) -> Self {
        Self {
            board: Board::from_counts(pits),
            current_player,
            phase,
        }
    }

    /// Stones at a position
    pub fn stones(&self, position: Position) -> u32 {
        self.board.get(position)
    }

    /// Stones in a player's store
    pub fn store(&self, player: Player) -> u32 {
        self.board.get(player.store())
    }

    /// Stones left in a player's small pits
    pub fn side_stones(&self, player: Player) -> u32 {
        self.board.side_stones(player)
    }

    /// Stones on the whole board; constant over the life of a game
    pub fn total_stones(&self) -> u32 {
        self.board.total()
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Get the winner if the game is finished and not tied
    pub fn winner(&self) -> Option<Player> {
        self.phase.winner()
    }

    /// Pits that may be selected right now
    pub fn legal_pits(&self) -> Vec<Position> {
        if self.is_finished() {
            return Vec::new();
        }

        let sides: &[Player] = match &self.current_player {
            Some(player) => std::slice::from_ref(player),
            None => &Player::ALL,
        };

        sides
            .iter()
            .flat_map(|player| player.pits())
            .filter(|&pit| self.board.get(pit) > 0)
            .collect()
    }

    /// Play the stones in `pit`.
    ///
    /// The request is validated in full before anything changes: on error the
    /// state is untouched. On success the board, turn and phase are updated in
    /// place and the resulting events are returned in order.
    pub fn apply_move(&mut self, pit: i64) -> Result<Vec<GameEvent>, GameError> {
        let (pit, player) = self.validate_move(pit)?;
        let mut events = Vec::new();

        self.phase = GamePhase::InProgress;

        let (stones, last_position) = self.sow(player, pit);
        events.push(GameEvent::StonesSown {
            player,
            pit,
            stones,
            last_position,
        });

        if let Some(event) = self.capture(player, last_position) {
            events.push(event);
        }

        events.push(self.switch_turn(player, last_position));

        if let Some(event) = self.check_game_end() {
            events.push(event);
        }

        Ok(events)
    }

    // ==================== Helper Methods ====================

    /// Run the pre-move checks in order; the first failure wins
    fn validate_move(&self, pit: i64) -> Result<(Position, Player), GameError> {
        if self.is_finished() {
            return Err(GameError::FinishedGame {
                store_a: self.store(Player::A),
                store_b: self.store(Player::B),
                phase: self.phase,
            });
        }

        let position = usize::try_from(pit)
            .ok()
            .filter(|&p| is_on_board(p))
            .ok_or(IllegalMove::OutOfRange)?;

        if is_store(position) {
            return Err(IllegalMove::FromStore.into());
        }

        // The very first move decides who is playing
        let player = match self.current_player {
            Some(current) if !current.owns_pit(position) => {
                return Err(IllegalMove::NotYourTurn.into());
            }
            Some(current) => current,
            None => owner_of(position),
        };

        if self.board.get(position) == 0 {
            return Err(IllegalMove::EmptyPit.into());
        }

        Ok((position, player))
    }

    /// Lift the stones from `pit` and drop one per position, skipping the
    /// opponent's store. Returns the stone count and the last landing spot.
    fn sow(&mut self, player: Player, pit: Position) -> (u32, Position) {
        let stones = self.board.take(pit);
        let skipped = player.opponent_store();

        let mut position = pit;
        let mut remaining = stones;
        while remaining > 0 {
            position = next_position(position);
            if position == skipped {
                continue;
            }
            self.board.add(position, 1);
            remaining -= 1;
        }

        (stones, position)
    }

    fn capture(&mut self, player: Player, last_position: Position) -> Option<GameEvent> {
        if !player.owns_pit(last_position) || self.board.get(last_position) != 1 {
            return None;
        }

        let opposite = opposite_pit(last_position);
        if self.board.get(opposite) == 0 {
            return None;
        }

        let stones = self.board.take(opposite) + self.board.take(last_position);
        self.board.add(player.store(), stones);

        Some(GameEvent::Captured {
            player,
            pit: last_position,
            opposite_pit: opposite,
            stones,
        })
    }

    fn switch_turn(&mut self, player: Player, last_position: Position) -> GameEvent {
        if last_position == player.store() {
            self.current_player = Some(player);
            GameEvent::ExtraTurn { player }
        } else {
            let next = player.opponent();
            self.current_player = Some(next);
            GameEvent::TurnPassed {
                from: player,
                to: next,
            }
        }
    }

    /// Once either side is empty, sweep both sides into their own stores
    /// and settle the result.
    fn check_game_end(&mut self) -> Option<GameEvent> {
        if !Player::ALL.iter().any(|&p| self.board.side_is_empty(p)) {
            return None;
        }

        for player in Player::ALL {
            let remaining: u32 = player.pits().map(|pit| self.board.take(pit)).sum();
            self.board.add(player.store(), remaining);
        }

        let store_a = self.store(Player::A);
        let store_b = self.store(Player::B);
        self.phase = GamePhase::settled(store_a, store_b);
        debug_assert!((1..=POSITION_COUNT)
            .filter(|&p| is_small_pit(p))
            .all(|p| self.board.get(p) == 0));

        Some(GameEvent::GameFinished {
            phase: self.phase,
            store_a,
            store_b,
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_standard()
    }
}

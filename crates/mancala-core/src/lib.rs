//! Mancala - a Kalaha rules engine
//!
//! This crate provides the core game logic for two-player Mancala on a
//! 2×6 board with one store per player, including:
//! - Board geometry: pit ownership, stores and opposite pits
//! - Game state with an explicit lifecycle phase
//! - The move engine: sowing, capture, extra turns and end-of-game sweep
//!
//! # Architecture
//!
//! The engine holds no state of its own. A [`GameState`] is transformed in
//! place by [`GameState::apply_move`], which validates the whole request
//! before touching anything, so a rejected move never leaves a partial
//! update behind. It can be compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly for local play in the browser (feature `wasm`)
//!
//! # Modules
//!
//! - [`board`]: Positions, players and the pit array
//! - [`game`]: Game state machine and move engine
//! - [`events`]: What a move did, in order

pub mod board;
pub mod events;
pub mod game;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::{Board, Player, Position, POSITION_COUNT, STORE_A, STORE_B};
pub use events::GameEvent;
pub use game::{
    validate_initial_stones, GameError, GamePhase, GameState, IllegalMove, InvalidInitialStones,
    DEFAULT_INITIAL_STONES, MAX_INITIAL_STONES,
};

//! WebSocket protocol messages for Mancala games.

use crate::service::{GameSnapshot, ServiceError};
use crate::store::GameId;
use mancala_core::{GameError, GameEvent, GamePhase, Player, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Start a new game, optionally overriding the stones per pit
    CreateGame { initial_stones: Option<u32> },

    /// Play a pit in a game
    Move { game_id: GameId, pit: i64 },

    /// Fetch the current state of a game
    GameStatus { game_id: GameId },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned connection ID
    Welcome { connection_id: Uuid },

    /// Game created successfully
    GameCreated { game: GameView },

    /// Move accepted, with what it did
    MoveApplied {
        game: GameView,
        events: Vec<GameEvent>,
    },

    /// Current game state
    GameStatus { game: GameView },

    /// Game finished
    GameOver {
        game_id: GameId,
        phase: GamePhase,
        store_a: u32,
        store_b: u32,
    },

    /// Request failed
    Error { kind: ErrorKind, message: String },

    /// Pong response
    Pong,
}

impl ServerMessage {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            kind,
            message: message.into(),
        }
    }
}

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    GameNotFound,
    IllegalMove,
    FinishedGame,
    InvalidMessage,
}

impl From<&ServiceError> for ErrorKind {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::GameNotFound(_) => ErrorKind::GameNotFound,
            ServiceError::Game(GameError::IllegalMove(_)) => ErrorKind::IllegalMove,
            ServiceError::Game(GameError::FinishedGame { .. }) => ErrorKind::FinishedGame,
            ServiceError::InvalidSetup(_) => ErrorKind::InvalidMessage,
        }
    }
}

impl From<ServiceError> for ServerMessage {
    fn from(err: ServiceError) -> Self {
        ServerMessage::error(ErrorKind::from(&err), err.to_string())
    }
}

/// Game information for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub game_id: GameId,
    /// Absent until the first move has been made
    pub current_player: Option<Player>,
    pub phase: GamePhase,
    /// Stones per position, 1..=14
    pub pits: BTreeMap<Position, u32>,
}

impl From<&GameSnapshot> for GameView {
    fn from(game: &GameSnapshot) -> Self {
        GameView {
            game_id: game.id,
            current_player: game.state.current_player,
            phase: game.state.phase,
            pits: game.state.board.iter().collect(),
        }
    }
}

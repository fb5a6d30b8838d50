//! Keyed storage for game state.

use dashmap::DashMap;
use mancala_core::GameState;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a stored game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// A fresh random id
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Where the lifecycle service keeps game state.
///
/// Implementations only need per-call atomicity; the service serializes
/// load-then-save sequences for one id itself.
pub trait GameStore: Send + Sync {
    /// Store a new game and assign its id
    fn insert(&self, state: GameState) -> GameId;

    /// The stored state for `id`, if any
    fn load(&self, id: GameId) -> Option<GameState>;

    /// Whether a game is stored under `id`
    fn contains(&self, id: GameId) -> bool;

    /// Overwrite the stored state for `id`
    fn save(&self, id: GameId, state: GameState);
}

/// Process-local store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    games: DashMap<GameId, GameState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }
}

impl GameStore for InMemoryStore {
    fn insert(&self, state: GameState) -> GameId {
        let id = GameId::new_v4();
        self.games.insert(id, state);
        id
    }

    fn load(&self, id: GameId) -> Option<GameState> {
        self.games.get(&id).map(|game| game.clone())
    }

    fn contains(&self, id: GameId) -> bool {
        self.games.contains_key(&id)
    }

    fn save(&self, id: GameId, state: GameState) {
        self.games.insert(id, state);
    }
}

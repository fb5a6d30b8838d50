//! Game lifecycle: create, move and status on top of a `GameStore`.

use crate::store::{GameId, GameStore};
use dashmap::DashMap;
use mancala_core::{GameError, GameEvent, GameState, InvalidInitialStones};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Game {0} not found")]
    GameNotFound(GameId),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    InvalidSetup(#[from] InvalidInitialStones),
}

/// A game as handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub id: GameId,
    pub state: GameState,
}

/// Runs the three public game operations against a store.
///
/// Moves on the same game id are serialized through a per-id mutex held
/// across load, validate/apply and save. Moves on different ids never wait
/// on each other.
pub struct GameService<S> {
    store: S,
    locks: DashMap<GameId, Arc<Mutex<()>>>,
}

impl<S: GameStore> GameService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a new game with `initial_stones` in every small pit
    pub fn create(&self, initial_stones: u32) -> Result<GameSnapshot, ServiceError> {
        let state = GameState::try_new(initial_stones).map_err(|e| {
            warn!(initial_stones, "Game not created: {}", e);
            e
        })?;
        let id = self.store.insert(state.clone());
        info!(game_id = %id, initial_stones, "Game created");

        Ok(GameSnapshot { id, state })
    }

    /// Play `pit` in game `id`.
    ///
    /// Nothing is saved unless the engine accepts the move.
    pub fn move_pit(
        &self,
        id: GameId,
        pit: i64,
    ) -> Result<(GameSnapshot, Vec<GameEvent>), ServiceError> {
        // Only stored games get a lock entry; games are never removed
        if !self.store.contains(id) {
            debug!(game_id = %id, "Game not found");
            return Err(ServiceError::GameNotFound(id));
        }

        let lock = self.lock_for(id);
        // The guarded state is only written after a successful move, so a
        // poisoned lock holds nothing half-done.
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut state = self.load(id)?;
        let events = state.apply_move(pit).map_err(|e| {
            warn!(game_id = %id, pit, error = %e, "Move rejected");
            e
        })?;

        self.store.save(id, state.clone());
        info!(
            game_id = %id,
            pit,
            mover = ?events.first().and_then(GameEvent::player),
            phase = %state.phase,
            next = ?state.current_player,
            "Move applied"
        );

        Ok((GameSnapshot { id, state }, events))
    }

    /// Current state of game `id`, unchanged
    pub fn status(&self, id: GameId) -> Result<GameSnapshot, ServiceError> {
        let state = self.load(id)?;
        Ok(GameSnapshot { id, state })
    }

    fn load(&self, id: GameId) -> Result<GameState, ServiceError> {
        self.store.load(id).ok_or_else(|| {
            debug!(game_id = %id, "Game not found");
            ServiceError::GameNotFound(id)
        })
    }

    fn lock_for(&self, id: GameId) -> Arc<Mutex<()>> {
        // Clone out of the map so the shard lock is released before waiting
        Arc::clone(&self.locks.entry(id).or_default())
    }
}

//! WebAssembly bindings for the Mancala engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen
//! for local two-player games in the browser.

use wasm_bindgen::prelude::*;

use crate::game::{GameState, DEFAULT_INITIAL_STONES};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game; `initial_stones` defaults to six when zero
    #[wasm_bindgen(constructor)]
    pub fn new(initial_stones: u32) -> Result<WasmGame, JsValue> {
        let stones = if initial_stones == 0 {
            DEFAULT_INITIAL_STONES
        } else {
            initial_stones
        };

        GameState::try_new(stones)
            .map(|state| WasmGame { state })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    /// Play a pit, returns events JSON or the rejection reason
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, pit: i32) -> Result<String, JsValue> {
        match self.state.apply_move(i64::from(pit)) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    /// Pits the current player may select, as a JSON array
    #[wasm_bindgen(js_name = getLegalPits)]
    pub fn get_legal_pits(&self) -> String {
        serde_json::to_string(&self.state.legal_pits()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Stones at a position (1-14), zero when off the board
    #[wasm_bindgen(js_name = getStones)]
    pub fn get_stones(&self, position: usize) -> u32 {
        if crate::board::is_on_board(position) {
            self.state.stones(position)
        } else {
            0
        }
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Get the current phase as a string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        self.state.phase.to_string()
    }
}

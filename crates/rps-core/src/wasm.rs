//! WASM bindings for the browser frontend

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::{GameEvent, Mode, Move, RoundController, Slot, Timings, UserProfile};

/// One game board: the controller plus whoever is signed in
#[wasm_bindgen]
pub struct GameHandle {
    controller: RoundController,
}

#[wasm_bindgen]
impl GameHandle {
    /// Create a board. `timings` is optional JSON-shaped
    /// `{cpuThinkMs, settleMs, clearMs, resetMs}`; missing fields keep the
    /// standard pacing.
    #[wasm_bindgen(constructor)]
    pub fn new(timings: JsValue) -> Result<GameHandle, JsError> {
        let timings = if timings.is_undefined() || timings.is_null() {
            Timings::standard()
        } else {
            serde_wasm_bindgen::from_value(timings)
                .map_err(|e| JsError::new(&format!("Invalid timings: {}", e)))?
        };
        Ok(Self { controller: RoundController::new(timings) })
    }

    /// Start a match. `target` is the raw form value; anything that is not a
    /// positive number becomes 10. `now_ms` is the host clock at the click.
    /// Returns the effective config.
    pub fn configure(&mut self, mode: &str, target: &str, now_ms: f64) -> Result<JsValue, JsError> {
        let mode: Mode = mode.parse().map_err(|e| JsError::new(&format!("{}", e)))?;
        let config = self.controller.configure_input_at(mode, target, host_millis(now_ms));
        to_js(&config)
    }

    /// `now_ms` is the host clock at the click; the CPU think and settle
    /// delays run from it. Returns false when the submission was ignored
    /// (slot already chosen, CPU slot, no match running).
    pub fn submit_move(&mut self, slot: &str, choice: &str, now_ms: f64) -> Result<bool, JsError> {
        let slot: Slot = slot.parse().map_err(|e| JsError::new(&format!("{}", e)))?;
        let choice: Move = choice.parse().map_err(|e| JsError::new(&format!("{}", e)))?;
        Ok(self.controller.submit_move_at(slot, choice, host_millis(now_ms)).is_ok())
    }

    /// Report the host clock (e.g. `performance.now()`); returns how many
    /// transitions fired
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        self.controller.advance(host_millis(now_ms)) as u32
    }

    /// Next instant worth calling `advance` at, or undefined when idle
    pub fn next_due(&self) -> Option<f64> {
        self.controller.next_due().map(|due| due as f64)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        to_js(&self.controller.snapshot())
    }

    pub fn history(&self) -> Result<JsValue, JsError> {
        to_js(self.controller.ledger())
    }

    /// Summary document data, or null when nobody is signed in
    pub fn summary(&self) -> Result<JsValue, JsError> {
        match self.controller.summary() {
            Some(summary) => to_js(&summary),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn sign_in(&mut self, name: String, portrait: Option<String>) {
        self.controller.set_identity(UserProfile { name, portrait });
    }

    pub fn sign_out(&mut self) {
        self.controller.set_identity(None::<UserProfile>);
    }

    /// Call `callback(event)` for every event from now on.
    ///
    /// The callback runs while the handle is busy, so it must not call back
    /// into it: read board state from the `stateChanged` event payload rather
    /// than `snapshot()`. A call back into the handle throws, and the throw is
    /// only logged.
    pub fn on_event(&mut self, callback: js_sys::Function) {
        self.controller.subscribe(move |event: &GameEvent| {
            if let Ok(value) = serde_wasm_bindgen::to_value(event) {
                if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                    tracing::warn!(?err, "event callback threw");
                }
            }
        });
    }
}

/// Negative, NaN and infinite readings count as zero
fn host_millis(now_ms: f64) -> u64 {
    if now_ms.is_finite() && now_ms > 0.0 {
        now_ms as u64
    } else {
        0
    }
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Outcome of a round for a one-off check without a board
#[wasm_bindgen]
pub fn resolve_round(one: &str, two: &str) -> Result<JsValue, JsError> {
    let one: Move = one.parse().map_err(|e| JsError::new(&format!("{}", e)))?;
    let two: Move = two.parse().map_err(|e| JsError::new(&format!("{}", e)))?;
    to_js(&crate::resolve(one, two))
}

//! WASM bindings for the outline module.
//!
//! JavaScript-friendly wrappers around the OutlineManager for use in
//! browser environments.

use automerge::ChangeHash;
use js_sys::{Array, Uint8Array};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::error::ScriptError;
use crate::outline::manager::OutlineManager;
use crate::outline::model::{Act, Beat};

/// Serialize a value to JsValue with HashMaps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: ScriptError| JsValue::from_str(&e.to_string()))
    };
}

/// JavaScript-friendly wrapper around OutlineManager.
#[wasm_bindgen]
pub struct JsOutlineManager {
    inner: OutlineManager,
}

#[wasm_bindgen]
impl JsOutlineManager {
    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Creates a new empty outline manager.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsOutlineManager {
        JsOutlineManager {
            inner: OutlineManager::new(),
        }
    }

    /// Loads from binary bytes (Uint8Array).
    #[wasm_bindgen(js_name = fromBytes)]
    pub fn from_bytes(bytes: &[u8]) -> Result<JsOutlineManager, JsValue> {
        let inner = js_result!(OutlineManager::from_bytes(bytes))?;
        Ok(JsOutlineManager { inner })
    }

    /// Saves to binary bytes (returns Uint8Array).
    #[wasm_bindgen(js_name = toBytes)]
    pub fn to_bytes(&mut self) -> Uint8Array {
        let bytes = self.inner.save();
        Uint8Array::from(&bytes[..])
    }

    /// Gets the actor ID for this document instance.
    #[wasm_bindgen(js_name = actorId)]
    pub fn actor_id(&self) -> String {
        self.inner.actor_id()
    }

    /// Gets the current heads (for sync protocol).
    #[wasm_bindgen(js_name = getHeads)]
    pub fn get_heads(&mut self) -> Array {
        let heads = self.inner.get_heads();
        heads
            .into_iter()
            .map(|h| JsValue::from_str(&h.to_string()))
            .collect()
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    /// Gets the full document state as a JavaScript object.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&mut self) -> Result<JsValue, JsValue> {
        let state = js_result!(self.inner.get_state())?;
        Ok(to_js_value(&state)?)
    }

    /// Sets the outline title (O(1)).
    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: &str) -> Result<(), JsValue> {
        js_result!(self.inner.set_title(title))
    }

    // =========================================================================
    // ACT OPERATIONS
    // =========================================================================

    /// Creates an act and appends it to the act order.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// manager.createAct('act-1', { id: 'act-1', title: 'Act One',
    ///                              beat_order: [], beats: {} });
    /// ```
    #[wasm_bindgen(js_name = createAct)]
    pub fn create_act(&mut self, id: &str, act: JsValue) -> Result<(), JsValue> {
        let act: Act = from_value(act)?;
        js_result!(self.inner.create_act(id, act))
    }

    /// Gets an act by ID, returns null if not found.
    #[wasm_bindgen(js_name = getAct)]
    pub fn get_act(&mut self, id: &str) -> Result<JsValue, JsValue> {
        let act = js_result!(self.inner.get_act(id))?;
        match act {
            Some(a) => Ok(to_js_value(&a)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Deletes an act by ID.
    #[wasm_bindgen(js_name = deleteAct)]
    pub fn delete_act(&mut self, id: &str) -> Result<(), JsValue> {
        js_result!(self.inner.delete_act(id))
    }

    /// Reorders acts.
    #[wasm_bindgen(js_name = reorderActs)]
    pub fn reorder_acts(&mut self, new_order: Vec<String>) -> Result<(), JsValue> {
        js_result!(self.inner.reorder_acts(new_order))
    }

    /// Sets an act title (O(1)).
    #[wasm_bindgen(js_name = setActTitle)]
    pub fn set_act_title(&mut self, act_id: &str, title: &str) -> Result<(), JsValue> {
        js_result!(self.inner.set_act_title(act_id, title))
    }

    // =========================================================================
    // BEAT OPERATIONS
    // =========================================================================

    /// Creates a beat in an act and appends it to the beat order.
    #[wasm_bindgen(js_name = createBeat)]
    pub fn create_beat(
        &mut self,
        act_id: &str,
        beat_id: &str,
        beat: JsValue,
    ) -> Result<(), JsValue> {
        let beat: Beat = from_value(beat)?;
        js_result!(self.inner.create_beat(act_id, beat_id, beat))
    }

    /// Gets a beat by ID, returns null if not found.
    #[wasm_bindgen(js_name = getBeat)]
    pub fn get_beat(&mut self, act_id: &str, beat_id: &str) -> Result<JsValue, JsValue> {
        let beat = js_result!(self.inner.get_beat(act_id, beat_id))?;
        match beat {
            Some(b) => Ok(to_js_value(&b)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Deletes a beat from an act.
    #[wasm_bindgen(js_name = deleteBeat)]
    pub fn delete_beat(&mut self, act_id: &str, beat_id: &str) -> Result<(), JsValue> {
        js_result!(self.inner.delete_beat(act_id, beat_id))
    }

    /// Reorders beats within an act.
    #[wasm_bindgen(js_name = reorderBeats)]
    pub fn reorder_beats(&mut self, act_id: &str, new_order: Vec<String>) -> Result<(), JsValue> {
        js_result!(self.inner.reorder_beats(act_id, new_order))
    }

    /// Moves a beat to another act.
    #[wasm_bindgen(js_name = moveBeat)]
    pub fn move_beat(
        &mut self,
        from_act: &str,
        to_act: &str,
        beat_id: &str,
    ) -> Result<(), JsValue> {
        js_result!(self.inner.move_beat(from_act, to_act, beat_id))
    }

    /// Sets a beat title (O(1)).
    #[wasm_bindgen(js_name = setBeatTitle)]
    pub fn set_beat_title(
        &mut self,
        act_id: &str,
        beat_id: &str,
        title: &str,
    ) -> Result<(), JsValue> {
        js_result!(self.inner.set_beat_title(act_id, beat_id, title))
    }

    /// Sets a beat synopsis (O(1), pass null to clear).
    #[wasm_bindgen(js_name = setBeatSynopsis)]
    pub fn set_beat_synopsis(
        &mut self,
        act_id: &str,
        beat_id: &str,
        synopsis: Option<String>,
    ) -> Result<(), JsValue> {
        js_result!(self
            .inner
            .set_beat_synopsis(act_id, beat_id, synopsis.as_deref()))
    }

    // =========================================================================
    // SYNC OPERATIONS
    // =========================================================================

    /// Merges another manager's changes into this one.
    #[wasm_bindgen]
    pub fn merge(&mut self, other: &mut JsOutlineManager) -> Result<(), JsValue> {
        js_result!(self.inner.merge(&mut other.inner))
    }

    /// Gets changes since the given heads (for incremental sync).
    ///
    /// Takes an array of hex-encoded change hashes and returns the diff bytes
    /// as a Uint8Array. Returns null if there are no changes.
    #[wasm_bindgen(js_name = getChangesSince)]
    pub fn get_changes_since(&mut self, their_heads: Array) -> Result<JsValue, JsValue> {
        // Parse hex strings to ChangeHash
        let heads: Vec<ChangeHash> = their_heads
            .iter()
            .filter_map(|v| {
                v.as_string().and_then(|s| {
                    let bytes = hex::decode(&s).ok()?;
                    if bytes.len() == 32 {
                        let mut arr = [0u8; 32];
                        arr.copy_from_slice(&bytes);
                        Some(ChangeHash(arr))
                    } else {
                        None
                    }
                })
            })
            .collect();

        let msg = self.inner.generate_sync_message(&heads);
        match msg {
            Some(bytes) => Ok(Uint8Array::from(&bytes[..]).into()),
            None => Ok(JsValue::NULL),
        }
    }

    /// Applies incremental changes from a diff (for incremental sync).
    #[wasm_bindgen(js_name = applyChanges)]
    pub fn apply_changes(&mut self, changes: &[u8]) -> Result<(), JsValue> {
        js_result!(self.inner.apply_sync_message(changes))
    }
}

impl Default for JsOutlineManager {
    fn default() -> Self {
        Self::new()
    }
}

//! OutlineManager implementation.
//!
//! Same hybrid pattern as the script manager: structural edits go through
//! hydrate/reconcile, single-field edits go through direct put operations.

use automerge::{
    transaction::Transactable, AutoCommit, ChangeHash, ObjId, ReadDoc, ScalarValue, Value, ROOT,
};
use autosurgeon::{hydrate, reconcile};

use super::model::{Act, Beat, OutlineRoot};
use crate::error::{ScriptError, ScriptResult};

/// The collaborative document manager for a story outline.
pub struct OutlineManager {
    doc: AutoCommit,
    /// Cached hydrated state - invalidated after direct document mutations.
    cached_state: Option<OutlineRoot>,
}

impl OutlineManager {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a new empty OutlineManager with an initialized document schema.
    pub fn new() -> Self {
        let mut doc = AutoCommit::new();
        let root = OutlineRoot::default();
        reconcile(&mut doc, &root).expect("Failed to initialize document");
        Self {
            doc,
            cached_state: Some(root),
        }
    }

    /// Creates an OutlineManager from saved binary data.
    pub fn from_bytes(bytes: &[u8]) -> ScriptResult<Self> {
        let doc = AutoCommit::load(bytes)?;
        Ok(Self {
            doc,
            cached_state: None,
        })
    }

    /// Saves the document to binary format.
    pub fn save(&mut self) -> Vec<u8> {
        self.doc.save()
    }

    /// Returns the current heads (for sync protocol).
    pub fn get_heads(&mut self) -> Vec<ChangeHash> {
        self.doc.get_heads()
    }

    /// Gets the actor ID for this document instance.
    pub fn actor_id(&self) -> String {
        self.doc.get_actor().to_hex_string()
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    /// Hydrates the entire document state to Rust structs.
    pub fn get_state(&mut self) -> ScriptResult<OutlineRoot> {
        if let Some(ref cached) = self.cached_state {
            return Ok(cached.clone());
        }
        let state: OutlineRoot = hydrate(&self.doc)?;
        self.cached_state = Some(state.clone());
        Ok(state)
    }

    /// Applies a function to mutate the state, then reconciles back to the document.
    pub fn update_state<F>(&mut self, f: F) -> ScriptResult<()>
    where
        F: FnOnce(&mut OutlineRoot),
    {
        let mut state = self.get_state()?;
        f(&mut state);
        reconcile(&mut self.doc, &state)?;
        self.cached_state = Some(state);
        Ok(())
    }

    /// Sets the outline title (O(1)).
    pub fn set_title(&mut self, title: &str) -> ScriptResult<()> {
        self.cached_state = None;
        self.doc.put(&ROOT, "title", ScalarValue::Str(title.into()))?;
        Ok(())
    }

    // =========================================================================
    // ACT OPERATIONS
    // =========================================================================

    /// Creates a new act and appends it to the order list.
    pub fn create_act(&mut self, id: &str, act: Act) -> ScriptResult<()> {
        self.update_state(|state| {
            let id_str = id.to_string();
            state.acts.insert(id_str.clone(), act);
            if !state.act_order.contains(&id_str) {
                state.act_order.push(id_str);
            }
        })
    }

    /// Gets an act by ID.
    pub fn get_act(&mut self, id: &str) -> ScriptResult<Option<Act>> {
        let state = self.get_state()?;
        Ok(state.acts.get(id).cloned())
    }

    /// Deletes an act by ID. Its beats go with it; script elements pointing
    /// at them keep their dangling ids and render as untagged.
    pub fn delete_act(&mut self, id: &str) -> ScriptResult<()> {
        self.update_state(|state| {
            state.acts.remove(id);
            state.act_order.retain(|a| a != id);
        })
    }

    /// Reorders acts.
    pub fn reorder_acts(&mut self, new_order: Vec<String>) -> ScriptResult<()> {
        self.update_state(|state| {
            state.act_order = new_order;
        })
    }

    /// Sets an act title (O(1)).
    pub fn set_act_title(&mut self, act_id: &str, title: &str) -> ScriptResult<()> {
        self.cached_state = None;
        let obj = self.get_obj_at_path(&["acts", act_id])?;
        self.doc.put(&obj, "title", ScalarValue::Str(title.into()))?;
        Ok(())
    }

    // =========================================================================
    // BEAT OPERATIONS
    // =========================================================================

    /// Creates a new beat in an act and appends it to the beat order.
    pub fn create_beat(&mut self, act_id: &str, beat_id: &str, beat: Beat) -> ScriptResult<()> {
        self.update_state(|state| {
            if let Some(act) = state.acts.get_mut(act_id) {
                let beat_id_str = beat_id.to_string();
                act.beats.insert(beat_id_str.clone(), beat);
                if !act.beat_order.contains(&beat_id_str) {
                    act.beat_order.push(beat_id_str);
                }
            }
        })
    }

    /// Gets a beat by ID from an act.
    pub fn get_beat(&mut self, act_id: &str, beat_id: &str) -> ScriptResult<Option<Beat>> {
        let state = self.get_state()?;
        Ok(state
            .acts
            .get(act_id)
            .and_then(|a| a.beats.get(beat_id).cloned()))
    }

    /// Deletes a beat from an act.
    pub fn delete_beat(&mut self, act_id: &str, beat_id: &str) -> ScriptResult<()> {
        self.update_state(|state| {
            if let Some(act) = state.acts.get_mut(act_id) {
                act.beats.remove(beat_id);
                act.beat_order.retain(|b| b != beat_id);
            }
        })
    }

    /// Reorders beats in an act.
    pub fn reorder_beats(&mut self, act_id: &str, new_order: Vec<String>) -> ScriptResult<()> {
        self.update_state(|state| {
            if let Some(act) = state.acts.get_mut(act_id) {
                act.beat_order = new_order;
            }
        })
    }

    /// Moves a beat to another act, appending it to the target's beat order.
    pub fn move_beat(&mut self, from_act: &str, to_act: &str, beat_id: &str) -> ScriptResult<()> {
        self.update_state(|state| {
            let beat = match state.acts.get_mut(from_act) {
                Some(act) => {
                    act.beat_order.retain(|b| b != beat_id);
                    act.beats.remove(beat_id)
                }
                None => None,
            };
            if let (Some(beat), Some(act)) = (beat, state.acts.get_mut(to_act)) {
                act.beats.insert(beat_id.to_string(), beat);
                if !act.beat_order.contains(&beat_id.to_string()) {
                    act.beat_order.push(beat_id.to_string());
                }
            }
        })
    }

    /// Sets a beat title (O(1)).
    pub fn set_beat_title(&mut self, act_id: &str, beat_id: &str, title: &str) -> ScriptResult<()> {
        self.cached_state = None;
        let beat_obj = self.get_beat_obj(act_id, beat_id)?;
        self.doc.put(&beat_obj, "title", ScalarValue::Str(title.into()))?;
        Ok(())
    }

    /// Sets a beat synopsis (O(1), pass None to clear).
    pub fn set_beat_synopsis(
        &mut self,
        act_id: &str,
        beat_id: &str,
        synopsis: Option<&str>,
    ) -> ScriptResult<()> {
        self.cached_state = None;
        let beat_obj = self.get_beat_obj(act_id, beat_id)?;
        match synopsis {
            Some(v) => self.doc.put(&beat_obj, "synopsis", ScalarValue::Str(v.into()))?,
            None => {
                self.doc.delete(&beat_obj, "synopsis")?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // SYNC OPERATIONS
    // =========================================================================

    /// Merges another document into this one.
    pub fn merge(&mut self, other: &mut Self) -> ScriptResult<()> {
        self.cached_state = None;
        self.doc.merge(&mut other.doc)?;
        Ok(())
    }

    /// Generates sync message for incremental sync.
    /// Returns None if there are no changes since their_heads.
    pub fn generate_sync_message(&mut self, their_heads: &[ChangeHash]) -> Option<Vec<u8>> {
        let changes = self.doc.get_changes(their_heads);
        if changes.is_empty() {
            return None;
        }
        let mut bytes = Vec::new();
        for change in changes {
            bytes.extend(change.raw_bytes());
        }
        Some(bytes)
    }

    /// Applies sync message from peer.
    pub fn apply_sync_message(&mut self, msg: &[u8]) -> ScriptResult<()> {
        self.cached_state = None;
        self.doc.load_incremental(msg)?;
        Ok(())
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    /// Gets ObjId at a path.
    fn get_obj_at_path(&self, path: &[&str]) -> ScriptResult<ObjId> {
        let mut current = ROOT;
        for key in path {
            current = self.get_obj_at_key(&current, key)?;
        }
        Ok(current)
    }

    /// Gets ObjId for a beat.
    fn get_beat_obj(&self, act_id: &str, beat_id: &str) -> ScriptResult<ObjId> {
        let acts_obj = self.get_obj_at_key(&ROOT, "acts")?;
        let act_obj = self.get_obj_at_key(&acts_obj, act_id)?;
        let beats_obj = self.get_obj_at_key(&act_obj, "beats")?;
        self.get_obj_at_key(&beats_obj, beat_id)
    }

    /// Gets an object ID at a map key.
    fn get_obj_at_key(&self, parent: &ObjId, key: &str) -> ScriptResult<ObjId> {
        match self.doc.get(parent, key) {
            Ok(Some((Value::Object(_), obj_id))) => Ok(obj_id),
            Ok(Some(_)) => Err(ScriptError::schema_violation(format!(
                "'{}' is not an object",
                key
            ))),
            Ok(None) => Err(ScriptError::field_not_found(key)),
            Err(e) => Err(ScriptError::Automerge(e)),
        }
    }
}

impl Default for OutlineManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

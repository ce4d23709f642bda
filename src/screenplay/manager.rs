//! Core ScriptManager implementation with hybrid operations pattern.
//!
//! This module provides the main `ScriptManager` struct that wraps an Automerge
//! document and provides:
//! - Composite editing operations via autosurgeon (hydrate/reconcile) that
//!   re-run classification, normalization and continuation refresh
//! - Targeted field updates via direct put operations (O(1) instead of O(N))

use automerge::{
    transaction::Transactable, AutoCommit, ChangeHash, ObjId, ReadDoc, ScalarValue, Value, ROOT,
};
use autosurgeon::{hydrate, reconcile};
use uuid::Uuid;

use super::classify::{classify, normalize};
use super::continuation::{refresh_all_continuations, refresh_continuations};
use super::layout::{self, Page};
use super::model::{Element, ElementType, ScriptRoot};
use crate::error::{ScriptError, ScriptResult};

/// The collaborative document manager for a screenplay.
///
/// Uses a hybrid approach:
/// - `update_state()` for bulk struct operations (uses hydrate/reconcile)
/// - composite edit operations (`set_element_text()`, `insert_element_after()`,
///   `change_element_type()`) that keep classification and continuation
///   suffixes consistent after every mutation
/// - `set_page_break()` / `set_element_beat()` / `set_title()` for targeted
///   field updates (direct put, O(1))
///
/// # Caching Strategy
///
/// - `cached_state`: Full ScriptRoot, invalidated on any direct mutation
/// - `cached_elements_obj`: ObjId of the "elements" map, invalidated on
///   load/merge
pub struct ScriptManager {
    doc: AutoCommit,
    /// Cached hydrated state - invalidated after direct document mutations.
    cached_state: Option<ScriptRoot>,
    /// Cached ObjId for the "elements" map - saves 2 lookups per operation.
    /// Invalidated on from_bytes() and merge().
    cached_elements_obj: Option<ObjId>,
}

impl ScriptManager {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a new empty ScriptManager with an initialized document schema.
    pub fn new() -> Self {
        let mut doc = AutoCommit::new();
        let root = ScriptRoot::default();
        reconcile(&mut doc, &root).expect("Failed to initialize document");
        Self {
            doc,
            cached_state: Some(root),
            cached_elements_obj: None, // Will be lazily populated
        }
    }

    /// Creates a ScriptManager from saved binary data.
    pub fn from_bytes(bytes: &[u8]) -> ScriptResult<Self> {
        let doc = AutoCommit::load(bytes)?;
        Ok(Self {
            doc,
            cached_state: None,
            cached_elements_obj: None, // Must re-discover after load
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

    /// Invalidates all caches. Call after any operation that might change document structure.
    fn invalidate_all_caches(&mut self) {
        self.cached_state = None;
        self.cached_elements_obj = None;
    }

    // =========================================================================
    // HIGH-LEVEL OPERATIONS (via Hydrate/Reconcile)
    // =========================================================================

    /// Hydrates the entire document state to Rust structs.
    pub fn get_state(&mut self) -> ScriptResult<ScriptRoot> {
        if let Some(ref cached) = self.cached_state {
            return Ok(cached.clone());
        }
        let state: ScriptRoot = hydrate(&self.doc)?;
        self.cached_state = Some(state.clone());
        Ok(state)
    }

    /// Applies a function to mutate the state, then reconciles back to the document.
    /// Use this for bulk updates; the composite edit operations below keep the
    /// derived continuation suffixes consistent for you.
    pub fn update_state<F>(&mut self, f: F) -> ScriptResult<()>
    where
        F: FnOnce(&mut ScriptRoot),
    {
        let mut state = self.get_state()?;
        f(&mut state);
        reconcile(&mut self.doc, &state)?;
        self.cached_state = Some(state);
        // Note: Don't invalidate cached_elements_obj - reconcile doesn't change ObjIds
        Ok(())
    }

    /// Appends an element to the end of the script, trusting the caller's
    /// element as-is except for the continuation suffix, which is re-derived.
    /// Used by importers and for bootstrapping an empty document.
    pub fn append_element(&mut self, id: &str, element: Element) -> ScriptResult<()> {
        self.update_state(|state| {
            let id_str = id.to_string();
            state.elements.insert(id_str.clone(), element);
            if !state.element_order.contains(&id_str) {
                state.element_order.push(id_str);
            }
            let from = state.element_order.len().saturating_sub(1);
            refresh_continuations(state, from);
        })
    }

    /// Inserts a new empty element after an existing one and returns its id.
    ///
    /// With no explicit type the new element takes the Enter-key type for the
    /// previous element (scene-heading -> action, character -> dialogue, ...).
    pub fn insert_element_after(
        &mut self,
        after_id: &str,
        explicit_type: Option<ElementType>,
    ) -> ScriptResult<String> {
        let state = self.get_state()?;
        let pos = state
            .position(after_id)
            .ok_or_else(|| ScriptError::element_not_found(after_id))?;
        let kind = explicit_type.unwrap_or_else(|| {
            state
                .get(after_id)
                .map(|e| e.element_type.next_on_enter())
                .unwrap_or_default()
        });

        let id = Uuid::new_v4().to_string();
        let new_id = id.clone();
        self.update_state(|state| {
            state
                .elements
                .insert(id.clone(), Element::new(id.clone(), kind));
            state.element_order.insert(pos + 1, id);
            refresh_continuations(state, pos + 1);
        })?;
        Ok(new_id)
    }

    /// Replaces an element's text: re-classifies against the previous
    /// element's type, normalizes for the classified type, and refreshes
    /// continuation suffixes from the edit point. Returns the classified type.
    ///
    /// Character cues come out fully derived, so a typed continuation marker
    /// is kept only while the sequence actually warrants one.
    pub fn set_element_text(&mut self, id: &str, text: &str) -> ScriptResult<ElementType> {
        let state = self.get_state()?;
        let pos = state
            .position(id)
            .ok_or_else(|| ScriptError::element_not_found(id))?;
        let previous = pos.checked_sub(1).and_then(|p| state.type_at(p));
        let kind = classify(text, previous);
        let normalized = normalize(kind, text);

        self.update_state(|state| {
            if let Some(element) = state.get_mut(id) {
                element.element_type = kind;
                element.text = normalized;
            }
            refresh_continuations(state, pos);
        })?;
        Ok(kind)
    }

    /// Explicitly sets an element's type (the menu/Tab path), re-normalizing
    /// its text for the new type and refreshing continuation suffixes.
    pub fn change_element_type(&mut self, id: &str, new_type: ElementType) -> ScriptResult<()> {
        let state = self.get_state()?;
        let pos = state
            .position(id)
            .ok_or_else(|| ScriptError::element_not_found(id))?;

        self.update_state(|state| {
            if let Some(element) = state.get_mut(id) {
                element.element_type = new_type;
                element.text = normalize(new_type, &element.text);
            }
            refresh_continuations(state, pos);
        })
    }

    /// Advances an element's type along the Tab cycle
    /// (scene-heading -> action -> character -> scene-heading) and returns
    /// the new type. Types outside the cycle enter at scene-heading.
    pub fn cycle_element_type(&mut self, id: &str) -> ScriptResult<ElementType> {
        let state = self.get_state()?;
        let current = state
            .get(id)
            .map(|e| e.element_type)
            .ok_or_else(|| ScriptError::element_not_found(id))?;
        let next = current.tab_cycle();
        self.change_element_type(id, next)?;
        Ok(next)
    }

    /// Removes an element from the document. Deletion never cascades, but
    /// continuation suffixes after the removed position are recomputed.
    pub fn delete_element(&mut self, id: &str) -> ScriptResult<()> {
        let state = self.get_state()?;
        let pos = state
            .position(id)
            .ok_or_else(|| ScriptError::element_not_found(id))?;

        self.update_state(|state| {
            state.elements.remove(id);
            state.element_order.retain(|e| e != id);
            refresh_continuations(state, pos);
        })
    }

    /// Moves an element from one position to another. Out-of-range positions
    /// are a no-op; the prior order is left untouched.
    ///
    /// A move can carry a cue across a scene boundary, out of reach of the
    /// local refresh window, so suffixes are recomputed document-wide.
    pub fn move_element(&mut self, from: usize, to: usize) -> ScriptResult<()> {
        self.update_state(|state| {
            let len = state.element_order.len();
            if from < len && to <= len && from != to {
                let id = state.element_order.remove(from);
                let adjusted_to = if from < to { to - 1 } else { to };
                state.element_order.insert(adjusted_to, id);
                refresh_all_continuations(state);
            }
        })
    }

    /// Adds a tag to an element. Membership is set-like; insertion order is
    /// kept for stable display.
    pub fn add_element_tag(&mut self, id: &str, tag: &str) -> ScriptResult<()> {
        self.update_state(|state| {
            if let Some(element) = state.get_mut(id) {
                let tag = tag.to_string();
                if !element.tags.contains(&tag) {
                    element.tags.push(tag);
                }
            }
        })
    }

    /// Removes a tag from an element.
    pub fn remove_element_tag(&mut self, id: &str, tag: &str) -> ScriptResult<()> {
        self.update_state(|state| {
            if let Some(element) = state.get_mut(id) {
                element.tags.retain(|t| t != tag);
            }
        })
    }

    /// Gets an element by ID.
    pub fn get_element(&mut self, id: &str) -> ScriptResult<Option<Element>> {
        let state = self.get_state()?;
        Ok(state.get(id).cloned())
    }

    /// Returns the ordered list of element IDs.
    pub fn get_order(&mut self) -> ScriptResult<Vec<String>> {
        let state = self.get_state()?;
        Ok(state.element_order.clone())
    }

    /// Materializes the ordered element sequence.
    pub fn sequence(&mut self) -> ScriptResult<Vec<Element>> {
        let state = self.get_state()?;
        Ok(state.sequence())
    }

    /// Returns the number of elements.
    pub fn element_count(&mut self) -> ScriptResult<usize> {
        let state = self.get_state()?;
        Ok(state.len())
    }

    // =========================================================================
    // LAYOUT
    // =========================================================================

    /// Partitions the current sequence into pages of at most `lines_per_page`
    /// estimated lines. See [`layout::paginate`] for the boundary rules.
    pub fn paginate(&mut self, lines_per_page: u32) -> ScriptResult<Vec<Page>> {
        let state = self.get_state()?;
        Ok(layout::paginate(&state.sequence(), lines_per_page))
    }

    // =========================================================================
    // TARGETED FIELD UPDATES (Direct put, O(1))
    // =========================================================================

    /// Sets a single element field directly, bypassing full reconcile.
    /// This is O(1) instead of O(N) where N is document size.
    fn set_element_value(
        &mut self,
        element_id: &str,
        key: &str,
        value: ScalarValue,
    ) -> ScriptResult<()> {
        self.cached_state = None; // Invalidate state cache
        let element_obj = self.get_element_obj(element_id)?;
        self.doc.put(&element_obj, key, value)?;
        Ok(())
    }

    /// Clears an element field (for Option::None).
    /// OPTIMIZATION: Use delete() instead of put(Null) - saves space.
    fn set_element_null(&mut self, element_id: &str, key: &str) -> ScriptResult<()> {
        self.cached_state = None;
        let element_obj = self.get_element_obj(element_id)?;
        let _ = self.doc.delete(&element_obj, key);
        Ok(())
    }

    /// Sets the explicit page-break flag directly (O(1)). Layout picks it up
    /// on the next `paginate()` call.
    pub fn set_page_break(&mut self, id: &str, page_break: bool) -> ScriptResult<()> {
        self.set_element_value(id, "page_break", ScalarValue::Boolean(page_break))
    }

    /// Tags an element against a story-structure beat directly (O(1)).
    /// References are not validated; a dangling id renders as untagged.
    pub fn set_element_beat(&mut self, id: &str, beat_id: &str, act_id: &str) -> ScriptResult<()> {
        self.set_element_value(id, "beat_id", ScalarValue::Str(beat_id.into()))?;
        self.set_element_value(id, "act_id", ScalarValue::Str(act_id.into()))
    }

    /// Clears an element's beat tag (O(1)).
    pub fn clear_element_beat(&mut self, id: &str) -> ScriptResult<()> {
        self.set_element_null(id, "beat_id")?;
        self.set_element_null(id, "act_id")
    }

    /// Sets the script title directly (O(1)).
    pub fn set_title(&mut self, title: &str) -> ScriptResult<()> {
        self.cached_state = None;
        self.doc.put(&ROOT, "title", ScalarValue::Str(title.into()))?;
        Ok(())
    }

    // =========================================================================
    // SYNC OPERATIONS
    // =========================================================================

    /// Merges another document into this one.
    pub fn merge(&mut self, other: &mut Self) -> ScriptResult<()> {
        self.invalidate_all_caches(); // Must invalidate topology cache on merge
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
            bytes.extend_from_slice(change.raw_bytes());
        }
        Some(bytes)
    }

    /// Applies sync message from peer.
    pub fn apply_sync_message(&mut self, msg: &[u8]) -> ScriptResult<()> {
        self.invalidate_all_caches(); // Must invalidate topology cache on sync
        self.doc.load_incremental(msg)?;
        Ok(())
    }

    // =========================================================================
    // INTERNAL HELPERS - WITH TOPOLOGY CACHING
    // =========================================================================

    /// Gets the cached "elements" map ObjId, or discovers it.
    fn get_elements_obj(&mut self) -> ScriptResult<ObjId> {
        if let Some(ref obj) = self.cached_elements_obj {
            return Ok(obj.clone());
        }
        let obj = self.get_obj_at_key(&ROOT, "elements")?;
        self.cached_elements_obj = Some(obj.clone());
        Ok(obj)
    }

    /// Gets an element's ObjId using the cached elements map.
    fn get_element_obj(&mut self, element_id: &str) -> ScriptResult<ObjId> {
        let elements_obj = self.get_elements_obj()?;
        self.get_obj_at_key(&elements_obj, element_id)
    }

    /// Gets an object ID at a map key.
    fn get_obj_at_key(&self, parent: &ObjId, key: &str) -> ScriptResult<ObjId> {
        match self.doc.get(parent, key) {
            Ok(Some((Value::Object(_), obj_id))) => Ok(obj_id),
            Ok(Some(_)) => Err(ScriptError::schema_violation(format!(
                "'{}' is not an object",
                key
            ))),
            Ok(None) => {
                if key.len() == 36 {
                    // Likely a UUID - element not found
                    Err(ScriptError::element_not_found(key))
                } else {
                    Err(ScriptError::field_not_found(key))
                }
            }
            Err(e) => Err(ScriptError::Automerge(e)),
        }
    }
}

impl Default for ScriptManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

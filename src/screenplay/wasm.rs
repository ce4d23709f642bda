//! WASM bindings for the screenplay module.
//!
//! This module provides JavaScript-friendly wrappers around the
//! ScriptManager, plus standalone helpers (classifyLine, normalizeLine,
//! estimateElementLines) so editors can run the formatting rules on
//! keystrokes without touching the document.

use automerge::ChangeHash;
use js_sys::{Array, Uint8Array};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::error::ScriptError;
use crate::screenplay::classify::{classify, normalize};
use crate::screenplay::layout::{estimate_lines, DEFAULT_LINES_PER_PAGE};
use crate::screenplay::manager::ScriptManager;
use crate::screenplay::model::{Element, ElementType};

/// Serialize a value to JsValue with HashMaps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: ScriptError| JsValue::from_str(&e.to_string()))
    };
}

// =============================================================================
// STANDALONE FORMATTING HELPERS
// =============================================================================

/// Classifies a line of text given the previous element's type.
///
/// Both the input and the return value use the kebab-case type names
/// ("scene-heading", "action", "character", "dialogue", "parenthetical",
/// "transition", "note"). Pass null for `previousType` at the top of a
/// document.
///
/// # Example (JavaScript)
/// ```js
/// classifyLine('INT. OFFICE - DAY', null); // "scene-heading"
/// classifyLine('Anyway.', 'character');    // "dialogue"
/// ```
#[wasm_bindgen(js_name = classifyLine)]
pub fn classify_line(text: &str, previous_type: Option<String>) -> String {
    let previous = previous_type.map(ElementType::from);
    classify(text, previous).to_string()
}

/// Normalizes text for a given element type (uppercasing, wrapping,
/// whitespace trimming). Idempotent.
///
/// # Example (JavaScript)
/// ```js
/// normalizeLine('scene-heading', 'int. office - day'); // "INT. OFFICE - DAY"
/// normalizeLine('parenthetical', 'beat');              // "(beat)"
/// ```
#[wasm_bindgen(js_name = normalizeLine)]
pub fn normalize_line(element_type: &str, text: &str) -> String {
    normalize(ElementType::parse(element_type), text)
}

/// Estimates how many printed lines an element occupies, including the
/// blank spacing line its type carries.
///
/// # Example (JavaScript)
/// ```js
/// estimateElementLines('He runs.', 'action'); // 2
/// ```
#[wasm_bindgen(js_name = estimateElementLines)]
pub fn estimate_element_lines(text: &str, element_type: &str) -> u32 {
    estimate_lines(text, ElementType::parse(element_type))
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around ScriptManager.
///
/// This provides a collaborative screenplay document that can be used
/// from JavaScript/TypeScript in the browser.
#[wasm_bindgen]
pub struct JsScriptManager {
    inner: ScriptManager,
}

#[wasm_bindgen]
impl JsScriptManager {
    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Creates a new empty script manager.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const manager = new JsScriptManager();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsScriptManager {
        JsScriptManager {
            inner: ScriptManager::new(),
        }
    }

    /// Loads from binary bytes (Uint8Array).
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const bytes = new Uint8Array([...]);
    /// const manager = JsScriptManager.fromBytes(bytes);
    /// ```
    #[wasm_bindgen(js_name = fromBytes)]
    pub fn from_bytes(bytes: &[u8]) -> Result<JsScriptManager, JsValue> {
        let inner = js_result!(ScriptManager::from_bytes(bytes))?;
        Ok(JsScriptManager { inner })
    }

    /// Saves to binary bytes (returns Uint8Array).
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const bytes = manager.toBytes();
    /// ```
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
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const state = manager.getState();
    /// console.log(state.element_order); // ['e1', 'e2']
    /// console.log(state.elements['e1'].text);
    /// ```
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&mut self) -> Result<JsValue, JsValue> {
        let state = js_result!(self.inner.get_state())?;
        Ok(to_js_value(&state)?)
    }

    /// Gets an element by ID, returns null if not found.
    #[wasm_bindgen(js_name = getElement)]
    pub fn get_element(&mut self, id: &str) -> Result<JsValue, JsValue> {
        let element = js_result!(self.inner.get_element(id))?;
        match element {
            Some(e) => Ok(to_js_value(&e)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Gets the current element order as an array of IDs.
    #[wasm_bindgen(js_name = getOrder)]
    pub fn get_order(&mut self) -> Result<Array, JsValue> {
        let order = js_result!(self.inner.get_order())?;
        Ok(order
            .into_iter()
            .map(|id| JsValue::from_str(&id))
            .collect())
    }

    /// Returns the number of elements.
    #[wasm_bindgen(js_name = elementCount)]
    pub fn element_count(&mut self) -> Result<usize, JsValue> {
        js_result!(self.inner.element_count())
    }

    // =========================================================================
    // EDITING OPERATIONS
    // =========================================================================

    /// Sets the script title (O(1)).
    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: &str) -> Result<(), JsValue> {
        js_result!(self.inner.set_title(title))
    }

    /// Appends an element to the end of the script.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// manager.appendElement('e1', {
    ///   id: 'e1',
    ///   element_type: 'scene-heading',
    ///   text: 'INT. OFFICE - DAY',
    ///   tags: [],
    ///   page_break: false
    /// });
    /// ```
    #[wasm_bindgen(js_name = appendElement)]
    pub fn append_element(&mut self, id: &str, element: JsValue) -> Result<(), JsValue> {
        let element: Element = from_value(element)?;
        js_result!(self.inner.append_element(id, element))
    }

    /// Inserts a new empty element after an existing one and returns its ID.
    ///
    /// Pass null for `explicitType` to let the Enter-key table pick the
    /// type from the previous element.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const id = manager.insertElementAfter('e1', null);
    /// const cue = manager.insertElementAfter(id, 'character');
    /// ```
    #[wasm_bindgen(js_name = insertElementAfter)]
    pub fn insert_element_after(
        &mut self,
        after_id: &str,
        explicit_type: Option<String>,
    ) -> Result<String, JsValue> {
        let kind = explicit_type.map(ElementType::from);
        js_result!(self.inner.insert_element_after(after_id, kind))
    }

    /// Replaces an element's text, re-running classification, normalization
    /// and continuation refresh. Returns the classified type name.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const kind = manager.setElementText('e2', 'ext. rooftop - night');
    /// // kind === "scene-heading", stored text is "EXT. ROOFTOP - NIGHT"
    /// ```
    #[wasm_bindgen(js_name = setElementText)]
    pub fn set_element_text(&mut self, id: &str, text: &str) -> Result<String, JsValue> {
        let kind = js_result!(self.inner.set_element_text(id, text))?;
        Ok(kind.to_string())
    }

    /// Explicitly sets an element's type, re-normalizing its text.
    #[wasm_bindgen(js_name = changeElementType)]
    pub fn change_element_type(&mut self, id: &str, new_type: &str) -> Result<(), JsValue> {
        js_result!(self
            .inner
            .change_element_type(id, ElementType::parse(new_type)))
    }

    /// Advances an element's type along the Tab cycle and returns the new
    /// type name (scene-heading -> action -> character -> scene-heading).
    #[wasm_bindgen(js_name = cycleElementType)]
    pub fn cycle_element_type(&mut self, id: &str) -> Result<String, JsValue> {
        let kind = js_result!(self.inner.cycle_element_type(id))?;
        Ok(kind.to_string())
    }

    /// Deletes an element by ID.
    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&mut self, id: &str) -> Result<(), JsValue> {
        js_result!(self.inner.delete_element(id))
    }

    /// Moves an element from one position to another.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// manager.moveElement(0, 2); // Move first element to third position
    /// ```
    #[wasm_bindgen(js_name = moveElement)]
    pub fn move_element(&mut self, from: usize, to: usize) -> Result<(), JsValue> {
        js_result!(self.inner.move_element(from, to))
    }

    /// Adds a tag to an element.
    #[wasm_bindgen(js_name = addElementTag)]
    pub fn add_element_tag(&mut self, id: &str, tag: &str) -> Result<(), JsValue> {
        js_result!(self.inner.add_element_tag(id, tag))
    }

    /// Removes a tag from an element.
    #[wasm_bindgen(js_name = removeElementTag)]
    pub fn remove_element_tag(&mut self, id: &str, tag: &str) -> Result<(), JsValue> {
        js_result!(self.inner.remove_element_tag(id, tag))
    }

    // =========================================================================
    // TARGETED FIELD UPDATES (O(1))
    // =========================================================================

    /// Sets the explicit page-break flag on an element (O(1)).
    #[wasm_bindgen(js_name = setPageBreak)]
    pub fn set_page_break(&mut self, id: &str, page_break: bool) -> Result<(), JsValue> {
        js_result!(self.inner.set_page_break(id, page_break))
    }

    /// Tags an element against a story-structure beat (O(1)).
    #[wasm_bindgen(js_name = setElementBeat)]
    pub fn set_element_beat(
        &mut self,
        id: &str,
        beat_id: &str,
        act_id: &str,
    ) -> Result<(), JsValue> {
        js_result!(self.inner.set_element_beat(id, beat_id, act_id))
    }

    /// Clears an element's beat tag (O(1)).
    #[wasm_bindgen(js_name = clearElementBeat)]
    pub fn clear_element_beat(&mut self, id: &str) -> Result<(), JsValue> {
        js_result!(self.inner.clear_element_beat(id))
    }

    // =========================================================================
    // LAYOUT
    // =========================================================================

    /// Paginates the script and returns an array of pages, each with a
    /// 1-based `number` and its `element_ids`.
    ///
    /// Pass null for `linesPerPage` to use the default (55).
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const pages = manager.paginate(null);
    /// console.log(pages.length, pages[0].element_ids);
    /// ```
    #[wasm_bindgen]
    pub fn paginate(&mut self, lines_per_page: Option<u32>) -> Result<JsValue, JsValue> {
        let capacity = lines_per_page.unwrap_or(DEFAULT_LINES_PER_PAGE);
        let pages = js_result!(self.inner.paginate(capacity))?;
        Ok(to_js_value(&pages)?)
    }

    // =========================================================================
    // SYNC OPERATIONS
    // =========================================================================

    /// Merges another manager's changes into this one.
    #[wasm_bindgen]
    pub fn merge(&mut self, other: &mut JsScriptManager) -> Result<(), JsValue> {
        js_result!(self.inner.merge(&mut other.inner))
    }

    /// Gets changes since the given heads (for incremental sync).
    ///
    /// Takes an array of hex-encoded change hashes and returns the diff bytes
    /// as a Uint8Array. Returns null if there are no changes.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const heads = manager.getHeads(); // Get current heads
    /// // ... make some changes ...
    /// const diff = manager.getChangesSince(heads);
    /// if (diff) {
    ///   await uploadDiff(diff); // Upload only the diff
    /// }
    /// ```
    #[wasm_bindgen(js_name = getChangesSince)]
    pub fn get_changes_since(&mut self, their_heads: Array) -> Result<JsValue, JsValue> {
        // Parse hex strings to ChangeHash
        let heads: Vec<ChangeHash> = their_heads
            .iter()
            .filter_map(|v| {
                v.as_string().and_then(|s| {
                    // Parse hex string to bytes, then to ChangeHash
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
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const diff = await downloadDiff(diffId);
    /// manager.applyChanges(diff);
    /// ```
    #[wasm_bindgen(js_name = applyChanges)]
    pub fn apply_changes(&mut self, changes: &[u8]) -> Result<(), JsValue> {
        js_result!(self.inner.apply_sync_message(changes))
    }
}

impl Default for JsScriptManager {
    fn default() -> Self {
        Self::new()
    }
}

//! Data models for the screenplay document.
//!
//! `ScriptRoot` uses autosurgeon derives for automatic CRDT serialization.
//! `Element` implements Reconcile/Hydrate manually for sparse serialization:
//! the TypeScript editor omits unset optional keys, and the element type is
//! stored as its kebab-case string with a lenient `action` fallback, so
//! documents written by newer clients load without erroring.

use automerge::{ObjType, ScalarValue, Value};
use autosurgeon::reconcile::{MapReconciler, NoKey};
use autosurgeon::{Hydrate, HydrateError, ReadDoc, Reconcile, Reconciler};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// ELEMENT TYPE
// =============================================================================

/// Screenplay element types, in industry vocabulary.
///
/// The string form is kebab-case (`"scene-heading"`, `"action"`, ...), which is
/// the shape shared with the TypeScript editor. Unknown strings fall back to
/// [`ElementType::Action`] at every boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum ElementType {
    /// Scene heading / slugline: "INT. OFFICE - DAY".
    SceneHeading,
    /// Scene description. The fallback for anything unclassified.
    #[default]
    Action,
    /// Character cue introducing dialogue: "SARAH" or "SARAH (CONT'D)".
    Character,
    /// Spoken lines. May contain soft line breaks.
    Dialogue,
    /// Actor direction inside dialogue: "(smiling)".
    Parenthetical,
    /// Editing transition: "CUT TO:".
    Transition,
    /// Production note; ignored by the classifier, laid out like action.
    Note,
}

impl ElementType {
    /// Every element type, in display order.
    pub const ALL: [ElementType; 7] = [
        ElementType::SceneHeading,
        ElementType::Action,
        ElementType::Character,
        ElementType::Dialogue,
        ElementType::Parenthetical,
        ElementType::Transition,
        ElementType::Note,
    ];

    /// Returns the kebab-case string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::SceneHeading => "scene-heading",
            ElementType::Action => "action",
            ElementType::Character => "character",
            ElementType::Dialogue => "dialogue",
            ElementType::Parenthetical => "parenthetical",
            ElementType::Transition => "transition",
            ElementType::Note => "note",
        }
    }

    /// Parses a type string leniently. Unknown input falls back to `Action`;
    /// this function never fails.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "scene-heading" => ElementType::SceneHeading,
            "action" => ElementType::Action,
            "character" => ElementType::Character,
            "dialogue" => ElementType::Dialogue,
            "parenthetical" => ElementType::Parenthetical,
            "transition" => ElementType::Transition,
            "note" => ElementType::Note,
            _ => ElementType::Action,
        }
    }

    /// The type a fresh element takes when Enter is pressed on an element of
    /// this type and no explicit type is supplied.
    pub fn next_on_enter(self) -> Self {
        match self {
            ElementType::SceneHeading => ElementType::Action,
            ElementType::Character => ElementType::Dialogue,
            ElementType::Dialogue => ElementType::Action,
            ElementType::Parenthetical => ElementType::Dialogue,
            ElementType::Transition => ElementType::SceneHeading,
            ElementType::Action | ElementType::Note => ElementType::Action,
        }
    }

    /// The next type in the Tab cycle
    /// (scene-heading -> action -> character -> scene-heading).
    /// Types outside the cycle enter it at scene-heading.
    pub fn tab_cycle(self) -> Self {
        match self {
            ElementType::SceneHeading => ElementType::Action,
            ElementType::Action => ElementType::Character,
            _ => ElementType::SceneHeading,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ElementType {
    fn from(s: String) -> Self {
        ElementType::parse(&s)
    }
}

impl From<&str> for ElementType {
    fn from(s: &str) -> Self {
        ElementType::parse(s)
    }
}

// =============================================================================
// ELEMENT
// =============================================================================

/// A single screenplay element with all collaborative fields.
///
/// The continuation suffix on character cues lives inside `text`; it is
/// derived state, recomputed after every sequence mutation, never stored as a
/// separate flag.
///
/// Note: Reconcile and Hydrate are implemented manually for sparse serialization.
/// - Reconcile: writes the beat fields only when set, deletes them when cleared
/// - Hydrate: treats missing keys as absent/default (instead of erroring)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// Unique identifier (stored for convenience, key in map is authoritative).
    pub id: String,

    /// Classified element type.
    pub element_type: ElementType,

    /// Raw element text. Soft line breaks (`\n`) are meaningful only inside
    /// dialogue.
    pub text: String,

    /// Free-form labels. Membership is set-like, insertion order is kept for
    /// stable display.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Story-structure beat this element is tagged against, if any.
    /// References are not validated here; a dangling id means "untagged".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beat_id: Option<String>,

    /// Act owning `beat_id`, carried alongside it for the structure panel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub act_id: Option<String>,

    /// Forces a page boundary immediately before this element.
    #[serde(default)]
    pub page_break: bool,
}

impl Element {
    /// Creates a new Element with the given id and type.
    pub fn new(id: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            text: String::new(),
            tags: Vec::new(),
            beat_id: None,
            act_id: None,
            page_break: false,
        }
    }

    /// Builder: Set text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builder: Tag against a story-structure beat.
    pub fn with_beat(mut self, beat_id: impl Into<String>, act_id: impl Into<String>) -> Self {
        self.beat_id = Some(beat_id.into());
        self.act_id = Some(act_id.into());
        self
    }

    /// Builder: Set the explicit page-break flag.
    pub fn with_page_break(mut self, page_break: bool) -> Self {
        self.page_break = page_break;
        self
    }

    /// Gets the text as a string slice.
    pub fn text_str(&self) -> &str {
        &self.text
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::new("", ElementType::default())
    }
}

/// Sparse Reconcile implementation: the beat reference is written only while
/// set and deleted when cleared, so untagged elements carry no stale keys.
/// The element type is stored as its kebab-case string.
impl Reconcile for Element {
    type Key<'a> = NoKey;

    fn reconcile<R: Reconciler>(&self, mut reconciler: R) -> Result<(), R::Error> {
        let mut m = reconciler.map()?;

        m.put("id", &self.id)?;
        m.put("element_type", self.element_type.as_str())?;
        m.put("text", &self.text)?;
        m.put("tags", &self.tags)?;
        match &self.beat_id {
            Some(v) => m.put("beat_id", v)?,
            None => {
                let _ = m.delete("beat_id");
            }
        }
        match &self.act_id {
            Some(v) => m.put("act_id", v)?,
            None => {
                let _ = m.delete("act_id");
            }
        }
        m.put("page_break", self.page_break)?;

        Ok(())
    }
}

/// Lenient Hydrate implementation: missing keys become defaults, the type
/// string parses with the `action` fallback, and text stored as an Automerge
/// Text object (older TypeScript clients) is read back as a plain string.
impl Hydrate for Element {
    fn hydrate_map<D: ReadDoc>(doc: &D, obj: &automerge::ObjId) -> Result<Self, HydrateError> {
        fn hydrate_str<D: ReadDoc>(
            doc: &D,
            obj: &automerge::ObjId,
            key: &str,
        ) -> Result<String, HydrateError> {
            match doc.get(obj, key)? {
                Some((Value::Scalar(s), _)) => match s.as_ref() {
                    ScalarValue::Str(st) => Ok(st.to_string()),
                    _ => Ok(String::new()),
                },
                Some((Value::Object(ObjType::Text), text_id)) => Ok(doc.text(&text_id)?),
                _ => Ok(String::new()),
            }
        }

        fn hydrate_opt_str<D: ReadDoc>(
            doc: &D,
            obj: &automerge::ObjId,
            key: &str,
        ) -> Result<Option<String>, HydrateError> {
            match doc.get(obj, key)? {
                None => Ok(None),
                Some((Value::Scalar(s), _)) => match s.as_ref() {
                    ScalarValue::Str(st) => Ok(Some(st.to_string())),
                    ScalarValue::Null => Ok(None),
                    _ => Ok(None),
                },
                _ => Ok(None),
            }
        }

        fn hydrate_bool<D: ReadDoc>(
            doc: &D,
            obj: &automerge::ObjId,
            key: &str,
        ) -> Result<bool, HydrateError> {
            match doc.get(obj, key)? {
                Some((Value::Scalar(s), _)) => match s.as_ref() {
                    ScalarValue::Boolean(b) => Ok(*b),
                    _ => Ok(false),
                },
                _ => Ok(false),
            }
        }

        fn hydrate_string_list<D: ReadDoc>(
            doc: &D,
            obj: &automerge::ObjId,
            key: &str,
        ) -> Result<Vec<String>, HydrateError> {
            match doc.get(obj, key)? {
                Some((Value::Object(ObjType::List), list_id)) => {
                    let len = doc.length(&list_id);
                    let mut items = Vec::with_capacity(len);
                    for i in 0..len {
                        if let Some((Value::Scalar(s), _)) = doc.get(&list_id, i)? {
                            if let ScalarValue::Str(st) = s.as_ref() {
                                items.push(st.to_string());
                            }
                        }
                    }
                    Ok(items)
                }
                _ => Ok(Vec::new()),
            }
        }

        Ok(Element {
            id: hydrate_str(doc, obj, "id")?,
            element_type: ElementType::parse(&hydrate_str(doc, obj, "element_type")?),
            text: hydrate_str(doc, obj, "text")?,
            tags: hydrate_string_list(doc, obj, "tags")?,
            beat_id: hydrate_opt_str(doc, obj, "beat_id")?,
            act_id: hydrate_opt_str(doc, obj, "act_id")?,
            page_break: hydrate_bool(doc, obj, "page_break")?,
        })
    }
}

// =============================================================================
// SCRIPT ROOT
// =============================================================================

/// Root document structure for a screenplay.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct ScriptRoot {
    /// Stable document identifier.
    pub id: String,

    /// Script title.
    pub title: String,

    /// Ordered list of element UUIDs (as strings). Canonical reading order.
    pub element_order: Vec<String>,

    /// Map of UUID string -> Element.
    pub elements: HashMap<String, Element>,
}

impl ScriptRoot {
    /// Creates a new empty script root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set the document id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder: Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Position of an element id in the reading order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.element_order.iter().position(|e| e == id)
    }

    /// Element lookup by id.
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Mutable element lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// The type of the element at a reading-order position.
    pub fn type_at(&self, index: usize) -> Option<ElementType> {
        self.element_order
            .get(index)
            .and_then(|id| self.elements.get(id))
            .map(|e| e.element_type)
    }

    /// Materializes the ordered element sequence. Order entries with no
    /// matching map entry (mid-sync partial state) are skipped.
    pub fn sequence(&self) -> Vec<Element> {
        self.element_order
            .iter()
            .filter_map(|id| self.elements.get(id))
            .cloned()
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_root_default() {
        let root = ScriptRoot::default();
        assert!(root.is_empty());
        assert_eq!(root.len(), 0);
        assert!(root.sequence().is_empty());
    }

    #[test]
    fn test_element_builder() {
        let element = Element::new("el-1", ElementType::SceneHeading)
            .with_text("INT. OFFICE - DAY")
            .with_tag("opening")
            .with_beat("beat-1", "act-1");

        assert_eq!(element.id, "el-1");
        assert_eq!(element.element_type, ElementType::SceneHeading);
        assert_eq!(element.text_str(), "INT. OFFICE - DAY");
        assert_eq!(element.tags, vec!["opening".to_string()]);
        assert_eq!(element.beat_id.as_deref(), Some("beat-1"));
        assert_eq!(element.act_id.as_deref(), Some("act-1"));
        assert!(!element.page_break);
    }

    #[test]
    fn test_type_parse_is_lenient() {
        assert_eq!(ElementType::parse("scene-heading"), ElementType::SceneHeading);
        assert_eq!(ElementType::parse("  Dialogue "), ElementType::Dialogue);
        assert_eq!(ElementType::parse("TRANSITION"), ElementType::Transition);
        // Unknown strings never fail, they fall back to action.
        assert_eq!(ElementType::parse("slug"), ElementType::Action);
        assert_eq!(ElementType::parse(""), ElementType::Action);
    }

    #[test]
    fn test_type_string_form_roundtrips() {
        for t in ElementType::ALL {
            assert_eq!(ElementType::parse(t.as_str()), t);
        }
    }

    #[test]
    fn test_enter_table() {
        assert_eq!(
            ElementType::SceneHeading.next_on_enter(),
            ElementType::Action
        );
        assert_eq!(ElementType::Character.next_on_enter(), ElementType::Dialogue);
        assert_eq!(ElementType::Dialogue.next_on_enter(), ElementType::Action);
        assert_eq!(
            ElementType::Parenthetical.next_on_enter(),
            ElementType::Dialogue
        );
        assert_eq!(
            ElementType::Transition.next_on_enter(),
            ElementType::SceneHeading
        );
        assert_eq!(ElementType::Action.next_on_enter(), ElementType::Action);
        assert_eq!(ElementType::Note.next_on_enter(), ElementType::Action);
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(ElementType::SceneHeading.tab_cycle(), ElementType::Action);
        assert_eq!(ElementType::Action.tab_cycle(), ElementType::Character);
        assert_eq!(ElementType::Character.tab_cycle(), ElementType::SceneHeading);
        // Types outside the cycle enter it at scene-heading.
        assert_eq!(ElementType::Dialogue.tab_cycle(), ElementType::SceneHeading);
    }

    #[test]
    fn test_sequence_skips_dangling_order_entries() {
        let mut root = ScriptRoot::new().with_id("doc-1").with_title("Untitled");
        root.elements.insert(
            "a".to_string(),
            Element::new("a", ElementType::Action).with_text("He runs."),
        );
        root.element_order = vec!["a".to_string(), "ghost".to_string()];

        let seq = root.sequence();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq[0].id, "a");
        assert_eq!(root.position("ghost"), Some(1));
        assert_eq!(root.type_at(0), Some(ElementType::Action));
        assert_eq!(root.type_at(1), None);
    }
}

//! Transformation logic from editor JSON structs to Rust model structs.
//!
//! Key transformations:
//! - Elements array → HashMap + element_order
//! - Per-type text normalization and continuation re-derivation
//! - structure.acts array → outline acts/beats maps

use std::collections::HashMap;

use uuid::Uuid;

use crate::input::*;
use slugline::outline::{Act, Beat, OutlineRoot};
use slugline::screenplay::classify::normalize;
use slugline::screenplay::continuation::refresh_all_continuations;
use slugline::{Element, ElementType, ScriptRoot};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Converts an array to HashMap + order vector, preserving original order.
fn array_to_hashmap<T, F>(items: Vec<T>, key_fn: F) -> (HashMap<String, T>, Vec<String>)
where
    F: Fn(&T) -> String,
{
    let order: Vec<String> = items.iter().map(&key_fn).collect();
    let map: HashMap<String, T> = items.into_iter().map(|item| (key_fn(&item), item)).collect();
    (map, order)
}

// =============================================================================
// SCRIPT DOCUMENT
// =============================================================================

impl From<InputElement> for Element {
    fn from(input: InputElement) -> Self {
        let kind = ElementType::parse(&input.element_type);
        Element {
            id: input.id,
            element_type: kind,
            text: normalize(kind, &input.text),
            tags: input.tags,
            beat_id: input.beat_id,
            act_id: input.act_id,
            page_break: input.page_break,
        }
    }
}

/// Builds the script document: keys elements by id, keeps the export order,
/// and re-derives every continuation suffix against the imported sequence.
pub fn build_script_root(id: &str, title: &str, content: InputContent) -> ScriptRoot {
    let mut elements: Vec<Element> = content.elements.into_iter().map(Element::from).collect();

    // Editor drafts occasionally omit ids; mint them before keying the map.
    for element in &mut elements {
        if element.id.is_empty() {
            element.id = Uuid::new_v4().to_string();
        }
    }

    let (elements, element_order) = array_to_hashmap(elements, |e| e.id.clone());

    let mut root = ScriptRoot {
        id: id.to_string(),
        title: title.to_string(),
        element_order,
        elements,
    };
    refresh_all_continuations(&mut root);
    root
}

// =============================================================================
// OUTLINE DOCUMENT
// =============================================================================

impl From<InputBeat> for Beat {
    fn from(input: InputBeat) -> Self {
        Self {
            id: input.id,
            title: input.title,
            synopsis: input.synopsis,
        }
    }
}

impl From<InputAct> for Act {
    fn from(input: InputAct) -> Self {
        let (beats, beat_order) = array_to_hashmap(input.beats, |b| b.id.clone());
        let beats: HashMap<String, Beat> = beats.into_iter().map(|(k, v)| (k, v.into())).collect();
        Self {
            id: input.id,
            title: input.title,
            beat_order,
            beats,
        }
    }
}

/// Builds the outline document from the export's structure section.
pub fn build_outline_root(id: &str, title: &str, structure: InputStructure) -> OutlineRoot {
    let (acts, act_order) = array_to_hashmap(structure.acts, |a| a.id.clone());
    let acts: HashMap<String, Act> = acts.into_iter().map(|(k, v)| (k, v.into())).collect();
    OutlineRoot {
        id: id.to_string(),
        title: title.to_string(),
        act_order,
        acts,
    }
}

//! Character continuation ("CONT'D") inference.
//!
//! When a character resumes speaking after intervening action, their cue takes
//! a continuation suffix: `BOB` ... `BOB (CONT'D)`. The suffix is derived
//! state, recomputed from the element sequence; it is never stored as a flag.
//!
//! # Decision rules (backward scan from the insertion point)
//!
//! 1. A scene heading or transition before any character cue severs
//!    continuation: `false`.
//! 2. A character cue with a different base name (suffix stripped,
//!    uppercased): `false`.
//! 3. A character cue with the same base name: `true` only when an action
//!    element sits between that cue and the insertion point. Dialogue and
//!    parentheticals alone mean the speech never stopped, so there is
//!    nothing to continue from.
//! 4. Dialogue, parentheticals and notes are skipped while scanning; they
//!    neither terminate nor redirect the search.
//! 5. Start of document without a character cue: `false`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{Element, ElementType, ScriptRoot};

/// Canonical continuation suffix appended to a resuming character cue.
pub const CONTINUATION_SUFFIX: &str = "(CONT'D)";

/// Matches a trailing continuation marker in either apostrophe form, any
/// casing, with tolerant interior spacing: `(CONT'D)`, `(cont’d)`, `( Cont'd )`.
static CONTINUATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\(\s*cont['’]d\s*\)\s*$").unwrap());

/// Splits a character cue into its base-name part and the trailing
/// continuation marker, when present. The base part keeps its original
/// casing and may carry trailing whitespace; the marker is trimmed.
pub fn split_continuation(text: &str) -> (&str, Option<&str>) {
    match CONTINUATION_REGEX.find(text) {
        Some(m) => (&text[..m.start()], Some(m.as_str().trim())),
        None => (text, None),
    }
}

/// Decides whether a character cue inserted at `insertion_index` should carry
/// the continuation suffix. `base_name` is compared suffix-stripped and
/// uppercased. An out-of-range index degrades to `false`.
pub fn should_continue(base_name: &str, insertion_index: usize, elements: &[Element]) -> bool {
    if insertion_index > elements.len() {
        return false;
    }
    let needle = base_name.trim().to_uppercase();

    let mut i = insertion_index;
    while i > 0 {
        i -= 1;
        match elements[i].element_type {
            ElementType::SceneHeading | ElementType::Transition => return false,
            ElementType::Character => {
                let (base, _) = split_continuation(&elements[i].text);
                if base.trim().to_uppercase() != needle {
                    return false;
                }
                // Same speaker: the suffix only makes sense when action
                // interrupted the speech.
                return elements[(i + 1)..insertion_index]
                    .iter()
                    .any(|e| e.element_type == ElementType::Action);
            }
            // Dialogue, parentheticals and notes neither terminate nor
            // redirect the scan.
            _ => {}
        }
    }
    false
}

/// Re-derives the cue text for a character element at `index`: extracts the
/// base name from `text` (dropping any existing marker), uppercases it, and
/// appends the canonical suffix when [`should_continue`] says so. An empty
/// base never takes a suffix.
pub fn apply_continuation(text: &str, index: usize, elements: &[Element]) -> String {
    let (base, _) = split_continuation(text);
    let base = base.trim().to_uppercase();
    if base.is_empty() {
        return base;
    }
    if should_continue(&base, index, elements) {
        format!("{} {}", base, CONTINUATION_SUFFIX)
    } else {
        base
    }
}

/// Recomputes continuation suffixes for every character cue from the edit
/// point forward. Stops after passing a scene heading or transition positioned
/// beyond the edit point: lookbacks from later elements terminate there, so
/// nothing past it can observe the edit.
pub fn refresh_continuations(root: &mut ScriptRoot, from: usize) {
    let mut seq = root.sequence();
    // Map the order index onto the materialized sequence; sequence() skips
    // order entries without a map entry.
    let start = root
        .element_order
        .iter()
        .take(from)
        .filter(|id| root.elements.contains_key(id.as_str()))
        .count();

    for i in start..seq.len() {
        match seq[i].element_type {
            ElementType::Character => {
                let updated = apply_continuation(&seq[i].text, i, &seq);
                if updated != seq[i].text {
                    if let Some(el) = root.elements.get_mut(&seq[i].id) {
                        el.text = updated.clone();
                    }
                    seq[i].text = updated;
                }
            }
            ElementType::SceneHeading | ElementType::Transition if i > start => break,
            _ => {}
        }
    }
}

/// Recomputes continuation suffixes for every character cue in the document.
/// Used after reordering and bulk import, where a cue may have crossed a
/// scene or transition boundary and the local refresh window cannot see it.
pub fn refresh_all_continuations(root: &mut ScriptRoot) {
    let mut seq = root.sequence();
    for i in 0..seq.len() {
        if seq[i].element_type != ElementType::Character {
            continue;
        }
        let updated = apply_continuation(&seq[i].text, i, &seq);
        if updated != seq[i].text {
            if let Some(el) = root.elements.get_mut(&seq[i].id) {
                el.text = updated.clone();
            }
            seq[i].text = updated;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

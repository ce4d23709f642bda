//! Element classification and per-type text normalization.
//!
//! Classification is a pure function of the trimmed text and the previous
//! element's type. Rules are tried in declaration order; the first match wins:
//!
//! 1. scene-heading - case-insensitive `INT`/`EXT`/`INT/EXT`/`I/E` prefix
//!    followed by a `.` or whitespace separator
//! 2. transition - entirely uppercase words ending in `TO:`
//! 3. character - entirely uppercase letters/spaces/apostrophes, optionally
//!    suffixed with a continuation marker; suppressed when the previous
//!    element is already a character so cues cannot oscillate
//! 4. parenthetical - fully wrapped in parentheses
//! 5. dialogue - previous element was a character, parenthetical or dialogue
//! 6. action - everything else
//!
//! Empty text fails rules 1-4 and falls through to 5/6; nothing here panics.

use once_cell::sync::Lazy;
use regex::Regex;

use super::continuation::split_continuation;
use super::model::ElementType;

/// Scene-heading prefix. Alternation order matters: `INT/EXT` must be tried
/// before `INT` so the compound form wins.
static SCENE_HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(INT/EXT|INT|EXT|I/E)[.\s]").unwrap());

/// Uppercase words ending in `TO:` - "CUT TO:", "SMASH CUT TO:", bare "TO:".
static TRANSITION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z ]*TO:$").unwrap());

/// Character cue base name: uppercase letters, spaces and apostrophes, after
/// any continuation marker has been stripped.
static CHARACTER_BASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z'’ ]*$").unwrap());

/// Classifies raw text into an element type given the previous element's
/// type. Deterministic and side-effect free.
pub fn classify(text: &str, previous: Option<ElementType>) -> ElementType {
    let t = text.trim();

    if SCENE_HEADING_REGEX.is_match(t) {
        return ElementType::SceneHeading;
    }
    if TRANSITION_REGEX.is_match(t) {
        return ElementType::Transition;
    }

    let (base, _) = split_continuation(t);
    if CHARACTER_BASE_REGEX.is_match(base.trim()) && previous != Some(ElementType::Character) {
        return ElementType::Character;
    }

    if is_wrapped(t) {
        return ElementType::Parenthetical;
    }

    match previous {
        Some(ElementType::Character)
        | Some(ElementType::Parenthetical)
        | Some(ElementType::Dialogue) => ElementType::Dialogue,
        _ => ElementType::Action,
    }
}

/// Applies the per-type formatting rules. Idempotent for every type.
///
/// - scene-heading, transition: trim and uppercase
/// - character: uppercase only the base name; a typed continuation marker
///   keeps its own casing
/// - parenthetical: wrap cleanly, never double-wrap
/// - action, dialogue, note: trim outer whitespace, keep interior breaks
pub fn normalize(kind: ElementType, text: &str) -> String {
    match kind {
        ElementType::SceneHeading | ElementType::Transition => text.trim().to_uppercase(),
        ElementType::Character => {
            let (base, suffix) = split_continuation(text);
            let base = base.trim().to_uppercase();
            match suffix {
                Some(s) if base.is_empty() => s.to_string(),
                Some(s) => format!("{} {}", base, s),
                None => base,
            }
        }
        ElementType::Parenthetical => {
            let t = text.trim();
            if is_wrapped(t) {
                t.to_string()
            } else {
                // Partially wrapped: strip stray edge parens, re-wrap.
                let inner = t.trim_matches(|c| c == '(' || c == ')').trim();
                format!("({})", inner)
            }
        }
        ElementType::Action | ElementType::Dialogue | ElementType::Note => {
            text.trim().to_string()
        }
    }
}

fn is_wrapped(t: &str) -> bool {
    t.len() >= 2 && t.starts_with('(') && t.ends_with(')')
}

// =============================================================================
// TESTS
// =============================================================================

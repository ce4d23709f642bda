//! Input structs for parsing editor script JSON exports.
//!
//! These structs match the editor's export shape. Key differences from the
//! Rust model:
//! - Uses an elements array instead of HashMap + order (transformed later)
//! - Uses camelCase for element-level fields (beatId, pageBreak, ...)
//! - Carries an optional `structure` section for the outline document

use serde::Deserialize;

// =============================================================================
// ROOT SCRIPT
// =============================================================================

/// Root script export from the editor.
#[derive(Debug, Deserialize)]
pub struct InputScript {
    pub id: String,
    pub title: String,
    pub content: InputContent,
    /// Beat-sheet section; absent for scripts that never opened the outline.
    pub structure: Option<InputStructure>,
}

/// Element list container.
#[derive(Debug, Deserialize, Default)]
pub struct InputContent {
    #[serde(default)]
    pub elements: Vec<InputElement>,
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// One script element. Type strings are matched leniently downstream;
/// unknown values fall back to action.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    pub text: String,
    pub tags: Vec<String>,
    pub beat_id: Option<String>,
    pub act_id: Option<String>,
    pub page_break: bool,
}

impl Default for InputElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            element_type: String::new(),
            text: String::new(),
            tags: Vec::new(),
            beat_id: None,
            act_id: None,
            page_break: false,
        }
    }
}

// =============================================================================
// STRUCTURE (OUTLINE)
// =============================================================================

/// Beat-sheet section with acts as an array.
#[derive(Debug, Deserialize, Default)]
pub struct InputStructure {
    #[serde(default)]
    pub acts: Vec<InputAct>,
}

/// One act with its beats as an array.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct InputAct {
    pub id: String,
    pub title: String,
    pub beats: Vec<InputBeat>,
}

/// One story beat.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct InputBeat {
    pub id: String,
    pub title: String,
    pub synopsis: Option<String>,
}

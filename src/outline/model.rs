//! Data models for the collaborative story outline.
//!
//! An outline is a beat sheet: ordered acts, each holding ordered beats.
//! Using autosurgeon derives for automatic CRDT serialization.

use autosurgeon::{Hydrate, Reconcile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// DOCUMENT ROOT
// =============================================================================

/// Root document structure for a collaborative story outline.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct OutlineRoot {
    /// Unique identifier
    pub id: String,
    /// Outline title (usually mirrors the script title)
    pub title: String,

    /// Act ordering (act IDs)
    pub act_order: Vec<String>,
    /// Act data keyed by act ID
    pub acts: HashMap<String, Act>,
}

impl OutlineRoot {
    /// Creates a new empty outline root with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder: Set title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Acts in display order, skipping IDs with no backing entry.
    pub fn acts_in_order(&self) -> Vec<&Act> {
        self.act_order
            .iter()
            .filter_map(|id| self.acts.get(id))
            .collect()
    }
}

// =============================================================================
// ACT
// =============================================================================

/// One act of the story, holding an ordered list of beats.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Act {
    pub id: String,
    /// Display title (e.g., "Act One", "Midpoint")
    pub title: String,

    /// Beat ordering (beat IDs)
    pub beat_order: Vec<String>,
    /// Beat data keyed by beat ID
    pub beats: HashMap<String, Beat>,
}

impl Act {
    /// Creates a new Act with the given ID and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Beats in display order, skipping IDs with no backing entry.
    pub fn beats_in_order(&self) -> Vec<&Beat> {
        self.beat_order
            .iter()
            .filter_map(|id| self.beats.get(id))
            .collect()
    }
}

// =============================================================================
// BEAT
// =============================================================================

/// One story beat within an act. Script elements reference beats through
/// their `beat_id` field; a beat does not know which elements point at it.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Beat {
    pub id: String,
    /// Display title (e.g., "Inciting Incident")
    pub title: String,
    /// Free-form synopsis of what happens in the beat
    pub synopsis: Option<String>,
}

impl Beat {
    /// Creates a new Beat with the given ID and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder: Set synopsis.
    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = Some(synopsis.into());
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_root_default() {
        let root = OutlineRoot::default();
        assert!(root.id.is_empty());
        assert!(root.acts.is_empty());
        assert!(root.act_order.is_empty());
    }

    #[test]
    fn test_outline_root_builder() {
        let root = OutlineRoot::new("outline-1").with_title("Untitled Pilot");
        assert_eq!(root.id, "outline-1");
        assert_eq!(root.title, "Untitled Pilot");
    }

    #[test]
    fn test_beat_builder() {
        let beat = Beat::new("beat-1", "Inciting Incident")
            .with_synopsis("The letter arrives a day early.");

        assert_eq!(beat.id, "beat-1");
        assert_eq!(beat.title, "Inciting Incident");
        assert_eq!(
            beat.synopsis,
            Some("The letter arrives a day early.".to_string())
        );
    }

    #[test]
    fn test_ordered_views_skip_dangling_ids() {
        let mut act = Act::new("act-1", "Act One");
        act.beats.insert("b1".into(), Beat::new("b1", "Opening"));
        act.beat_order = vec!["b1".into(), "b-gone".into()];

        let beats = act.beats_in_order();
        assert_eq!(beats.len(), 1);
        assert_eq!(beats[0].title, "Opening");

        let mut root = OutlineRoot::new("outline-1");
        root.acts.insert("act-1".into(), act);
        root.act_order = vec!["missing".into(), "act-1".into()];
        assert_eq!(root.acts_in_order().len(), 1);
    }
}

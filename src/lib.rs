//! Slugline - Real-time collaborative document engine for screenplays.
//!
//! This crate provides the document model behind a screenwriting editor:
//! typed script elements stored in an Automerge CRDT with Autosurgeon
//! serialization, plus the formatting brain the editor runs on every edit:
//!
//! - **Element classification**: Raw text plus the previous element's type
//!   decide whether a line is a scene heading, character cue, dialogue,
//!   parenthetical, transition or action
//! - **Industry normalization**: Uppercasing, parenthetical wrapping and
//!   derived (CONT'D) continuation suffixes, recomputed as the script changes
//! - **Pagination**: Line estimation per element type and page breaking with
//!   keep-together rules for character cues
//!
//! # Example
//!
//! ```rust
//! use slugline::{ElementType, ScriptManager};
//!
//! // Create a new collaborative script
//! let mut manager = ScriptManager::new();
//! manager.set_title("UNTITLED PILOT").unwrap();
//!
//! // Seed the first element, then type like an editor would
//! let state = manager.get_state().unwrap();
//! assert!(state.is_empty());
//! manager
//!     .append_element(
//!         "e1",
//!         slugline::Element::new("e1", ElementType::Action),
//!     )
//!     .unwrap();
//! let kind = manager.set_element_text("e1", "int. office - day").unwrap();
//! assert_eq!(kind, ElementType::SceneHeading);
//!
//! // Enter after a scene heading starts an action block
//! let e2 = manager.insert_element_after("e1", None).unwrap();
//! manager.set_element_text(&e2, "MIRA types, too fast.").unwrap();
//!
//! // Save for sync (one operation, not per-character)
//! let bytes = manager.save();
//! # let _ = bytes;
//! ```

pub mod error;

// Screenplay module
pub mod screenplay;

// Re-exports for convenience
pub use error::{ScriptError, ScriptResult};
pub use screenplay::{Element, ElementType, Page, ScriptManager, ScriptRoot};

#[cfg(feature = "wasm")]
pub use screenplay::JsScriptManager;

// Outline module (only compiled when outline feature enabled)
#[cfg(feature = "outline")]
pub mod outline;

#[cfg(feature = "outline")]
pub use outline::{Act, Beat, OutlineManager, OutlineRoot};

#[cfg(all(feature = "wasm", feature = "outline"))]
pub use outline::wasm::JsOutlineManager;

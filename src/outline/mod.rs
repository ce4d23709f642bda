//! Story outline module for collaborative beat-sheet editing.
//!
//! This module provides:
//! - `model`: Data structures for the outline (Act, Beat, OutlineRoot)
//! - `manager`: OutlineManager with CRUD operations and O(1) targeted updates
//! - `wasm`: WASM bindings for browser usage (JsOutlineManager)
//!
//! The outline is a separate document from the script itself. Script
//! elements point into it through their `beat_id` / `act_id` fields, so
//! either document can be loaded, edited and synced without the other.

pub mod manager;
pub mod model;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use manager::OutlineManager;
pub use model::{Act, Beat, OutlineRoot};

#[cfg(feature = "wasm")]
pub use wasm::JsOutlineManager;

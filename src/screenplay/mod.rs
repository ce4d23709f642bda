//! Screenplay CRDT module for collaborative script editing.
//!
//! This module provides:
//! - `model`: Data structures for the script (Element, ElementType, ScriptRoot)
//! - `classify`: Element type inference and per-type text normalization
//! - `continuation`: Derived (CONT'D) suffixes for re-entering speakers
//! - `layout`: Line estimation and pagination with keep-together rules
//! - `manager`: ScriptManager with editing operations and O(1) targeted updates
//! - `wasm`: WASM bindings for browser usage (JsScriptManager)

pub mod classify;
pub mod continuation;
pub mod layout;
pub mod manager;
pub mod model;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use classify::{classify, normalize};
pub use continuation::{
    apply_continuation, refresh_all_continuations, refresh_continuations, should_continue,
    split_continuation, CONTINUATION_SUFFIX,
};
pub use layout::{
    estimate_lines, metrics_for, paginate, Page, TypeMetrics, DEFAULT_LINES_PER_PAGE,
};
pub use manager::ScriptManager;
pub use model::{Element, ElementType, ScriptRoot};

#[cfg(feature = "wasm")]
pub use wasm::JsScriptManager;
